use futures::StreamExt;
use reqwest::{header, Client as HttpClient, Method, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::bulk::BulkBody;
use crate::uri::join_path;
use crate::{ClientError, Result};

/// Document type segment. Mapping types were removed in Elasticsearch 7;
/// `_doc` is the only accepted value.
const DOC_TYPE: &str = "_doc";

/// Ceiling on buffered response bodies, in bytes.
const MAX_RESPONSE_BODY_BYTES: usize = 15_000_000;

/// Elasticsearch REST API client.
///
/// Holds only the base URI and the underlying HTTP transport. Every call
/// issues exactly one request and returns an independent future, so a single
/// `Client` can be shared across concurrent tasks without locking. Dependent
/// calls (e.g. searching an index right after creating it) are ordered by
/// the caller awaiting them in sequence.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    http: HttpClient,
}

impl Client {
    /// Create a client for the cluster at `base_url` with a default
    /// transport. Trailing slashes on the base URL are trimmed.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http_client(base_url, HttpClient::new())
    }

    /// Create a client that dispatches through a caller-configured
    /// transport. Timeouts, TLS and connection pooling live there.
    pub fn with_http_client(base_url: impl Into<String>, http: HttpClient) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }

    pub async fn create_index(&self, index: &str) -> Result<Option<Value>> {
        let uri = join_path(&self.base_url, &[index]);
        self.dispatch(self.request(Method::PUT, uri, &[])).await
    }

    /// Succeeds with `None` when the index exists; a missing index surfaces
    /// as a 404 server error.
    pub async fn exists_index(&self, index: &str) -> Result<Option<Value>> {
        let uri = join_path(&self.base_url, &[index]);
        self.dispatch(self.request(Method::HEAD, uri, &[])).await
    }

    pub async fn get_index(&self, index: &str) -> Result<Option<Value>> {
        let uri = join_path(&self.base_url, &[index]);
        self.dispatch(self.request(Method::GET, uri, &[])).await
    }

    pub async fn delete_index(&self, index: &str) -> Result<Option<Value>> {
        let uri = join_path(&self.base_url, &[index]);
        self.dispatch(self.request(Method::DELETE, uri, &[])).await
    }

    /// Index statistics, filtered to `metric` (`_all` for everything).
    pub async fn stats_index(
        &self,
        index: &str,
        metric: &str,
        options: &[(&str, &str)],
    ) -> Result<Option<Value>> {
        let uri = join_path(&self.base_url, &[index, "_stats", metric]);
        self.dispatch(self.request(Method::GET, uri, options)).await
    }

    /// Store a document. An empty `id` asks the server to assign one (POST);
    /// a non-empty `id` stores under that id (PUT).
    pub async fn index_document<T: Serialize>(
        &self,
        index: &str,
        id: &str,
        body: &T,
        options: &[(&str, &str)],
    ) -> Result<Option<Value>> {
        let method = if id.is_empty() {
            Method::POST
        } else {
            Method::PUT
        };
        let uri = join_path(&self.base_url, &[index, DOC_TYPE, id]);
        self.dispatch(self.request(method, uri, options).json(body))
            .await
    }

    /// Succeeds with `None` when the document exists; a missing document
    /// surfaces as a 404 server error.
    pub async fn exists_document(&self, index: &str, id: &str) -> Result<Option<Value>> {
        let uri = join_path(&self.base_url, &[index, DOC_TYPE, id]);
        self.dispatch(self.request(Method::HEAD, uri, &[])).await
    }

    pub async fn get_document(
        &self,
        index: &str,
        id: &str,
        options: &[(&str, &str)],
    ) -> Result<Option<Value>> {
        let uri = join_path(&self.base_url, &[index, DOC_TYPE, id]);
        self.dispatch(self.request(Method::GET, uri, options)).await
    }

    pub async fn delete_document(
        &self,
        index: &str,
        id: &str,
        options: &[(&str, &str)],
    ) -> Result<Option<Value>> {
        let uri = join_path(&self.base_url, &[index, DOC_TYPE, id]);
        self.dispatch(self.request(Method::DELETE, uri, options))
            .await
    }

    /// Lucene query-string search against one index.
    pub async fn uri_search_one_index(
        &self,
        index: &str,
        query: &str,
        options: &[(&str, &str)],
    ) -> Result<Option<Value>> {
        self.uri_search(index, query, options).await
    }

    /// Lucene query-string search against a comma-joined list of indices.
    pub async fn uri_search_many_indices(
        &self,
        indices: &[&str],
        query: &str,
        options: &[(&str, &str)],
    ) -> Result<Option<Value>> {
        self.uri_search(&indices.join(","), query, options).await
    }

    /// Lucene query-string search against every index.
    pub async fn uri_search_all_indices(
        &self,
        query: &str,
        options: &[(&str, &str)],
    ) -> Result<Option<Value>> {
        self.uri_search("_all", query, options).await
    }

    pub async fn cat_indices(
        &self,
        index: Option<&str>,
        options: &[(&str, &str)],
    ) -> Result<Option<Value>> {
        let mut segments = vec!["_cat", "indices"];
        if let Some(index) = index {
            segments.push(index);
        }
        let uri = join_path(&self.base_url, &segments);
        self.dispatch(self.request(Method::GET, uri, options)).await
    }

    pub async fn cat_health(&self, options: &[(&str, &str)]) -> Result<Option<Value>> {
        let uri = join_path(&self.base_url, &["_cat", "health"]);
        self.dispatch(self.request(Method::GET, uri, options)).await
    }

    /// Make recently indexed documents searchable. `None` refreshes every
    /// index; a comma-joined list refreshes several at once.
    pub async fn refresh(
        &self,
        index_or_indices: Option<&str>,
        options: &[(&str, &str)],
    ) -> Result<Option<Value>> {
        let mut segments = Vec::new();
        if let Some(index_or_indices) = index_or_indices {
            segments.push(index_or_indices);
        }
        segments.push("_refresh");
        let uri = join_path(&self.base_url, &segments);
        self.dispatch(self.request(Method::POST, uri, options))
            .await
    }

    /// Structured search with a query DSL body. `None` searches every index.
    pub async fn search<T: Serialize>(
        &self,
        query: &T,
        index_or_indices: Option<&str>,
        options: &[(&str, &str)],
    ) -> Result<Option<Value>> {
        let mut segments = Vec::new();
        if let Some(index_or_indices) = index_or_indices {
            segments.push(index_or_indices);
        }
        segments.push("_search");
        let uri = join_path(&self.base_url, &segments);
        self.dispatch(self.request(Method::POST, uri, options).json(query))
            .await
    }

    /// Count the documents matching `query`, or all documents in the index
    /// when no query is given.
    pub async fn count(
        &self,
        index: &str,
        options: &[(&str, &str)],
        query: Option<&Value>,
    ) -> Result<Option<Value>> {
        let uri = join_path(&self.base_url, &[index, "_count"]);
        let mut request = self.request(Method::GET, uri, options);
        if let Some(query) = query {
            request = request.json(query);
        }
        self.dispatch(request).await
    }

    /// Submit a newline-delimited batch of actions. `None` requires every
    /// action line to name its index explicitly.
    pub async fn bulk(
        &self,
        body: impl Into<BulkBody>,
        index: Option<&str>,
        options: &[(&str, &str)],
    ) -> Result<Option<Value>> {
        let mut segments = Vec::new();
        if let Some(index) = index {
            segments.push(index);
        }
        segments.push("_bulk");
        let uri = join_path(&self.base_url, &segments);
        let payload = body.into().into_ndjson()?;
        self.dispatch(self.request(Method::POST, uri, options).body(payload))
            .await
    }

    pub async fn update_by_query<T: Serialize>(
        &self,
        body: &T,
        index_or_indices: Option<&str>,
        options: &[(&str, &str)],
    ) -> Result<Option<Value>> {
        let mut segments = Vec::new();
        if let Some(index_or_indices) = index_or_indices {
            segments.push(index_or_indices);
        }
        segments.push("_update_by_query");
        let uri = join_path(&self.base_url, &segments);
        self.dispatch(self.request(Method::POST, uri, options).json(body))
            .await
    }

    async fn uri_search(
        &self,
        index_or_indices_or_all: &str,
        query: &str,
        options: &[(&str, &str)],
    ) -> Result<Option<Value>> {
        let uri = join_path(&self.base_url, &[index_or_indices_or_all, "_search"]);
        let mut params: Vec<(&str, &str)> = options
            .iter()
            .filter(|(key, _)| *key != "q")
            .copied()
            .collect();
        if !query.is_empty() {
            params.push(("q", query));
        }
        self.dispatch(self.request(Method::GET, uri, &params)).await
    }

    /// Build a JSON request; the query string is appended only when the
    /// options are non-empty, so an empty map yields the same URI as
    /// omitting options.
    fn request(&self, method: Method, uri: String, options: &[(&str, &str)]) -> RequestBuilder {
        let mut request = self
            .http
            .request(method, uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json");
        if !options.is_empty() {
            request = request.query(options);
        }
        request
    }

    /// Issue the request and interpret the response: 2xx with an empty body
    /// is `None`, 2xx with a body decodes as JSON, anything else carries the
    /// raw body text and status back to the caller.
    async fn dispatch(&self, request: RequestBuilder) -> Result<Option<Value>> {
        let request = request.build()?;
        debug!("{} {}", request.method(), request.url());
        let response = self.http.execute(request).await?;
        let status = response.status();
        let body = read_body(response).await?;
        debug!("response status={} body_bytes={}", status.as_u16(), body.len());
        if !status.is_success() {
            return Err(ClientError::Server {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }
        if body.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&body)?))
    }
}

/// Buffer the response body chunk by chunk, bailing out before the ceiling
/// is crossed.
async fn read_body(response: reqwest::Response) -> Result<Vec<u8>> {
    let mut stream = response.bytes_stream();
    let mut body = Vec::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if body.len() + chunk.len() > MAX_RESPONSE_BODY_BYTES {
            return Err(ClientError::BodyTooLarge {
                limit: MAX_RESPONSE_BODY_BYTES,
            });
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slashes() {
        let client = Client::new("http://localhost:9200///");
        assert_eq!(client.base_url, "http://localhost:9200");
    }

    #[test]
    fn test_new_keeps_clean_base_url() {
        let client = Client::new("http://localhost:9200");
        assert_eq!(client.base_url, "http://localhost:9200");
    }
}
