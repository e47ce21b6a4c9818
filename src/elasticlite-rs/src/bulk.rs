use serde_json::Value;

/// Payload for the bulk API.
///
/// The bulk endpoint takes newline-delimited JSON: action lines interleaved
/// with source lines. Callers either hand over a pre-formed NDJSON string or
/// a list of items to serialize one per line.
#[derive(Debug, Clone)]
pub enum BulkBody {
    /// Pre-formed newline-delimited JSON.
    Raw(String),
    /// Action and source items, serialized independently one per line.
    Items(Vec<Value>),
}

impl BulkBody {
    /// Encode into the wire payload. A trailing newline is always appended;
    /// the bulk API requires the data to end with one.
    pub(crate) fn into_ndjson(self) -> serde_json::Result<String> {
        match self {
            BulkBody::Raw(raw) => Ok(raw + "\n"),
            BulkBody::Items(items) => {
                let mut lines = Vec::with_capacity(items.len());
                for item in &items {
                    lines.push(serde_json::to_string(item)?);
                }
                Ok(lines.join("\n") + "\n")
            }
        }
    }
}

impl From<String> for BulkBody {
    fn from(raw: String) -> Self {
        BulkBody::Raw(raw)
    }
}

impl From<&str> for BulkBody {
    fn from(raw: &str) -> Self {
        BulkBody::Raw(raw.to_string())
    }
}

impl From<Vec<Value>> for BulkBody {
    fn from(items: Vec<Value>) -> Self {
        BulkBody::Items(items)
    }
}
