use urlencoding::encode;

/// Join percent-encoded path segments onto a base URI.
///
/// Segments are encoded wholesale, so reserved characters in index or
/// document names (including `,` in multi-index lists) come out escaped.
/// An empty trailing segment is kept and yields a trailing slash.
pub(crate) fn join_path(base_url: &str, segments: &[&str]) -> String {
    let mut uri = String::from(base_url);
    for segment in segments {
        uri.push('/');
        uri.push_str(&encode(segment));
    }
    uri
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_path_plain_segments() {
        assert_eq!(
            join_path("http://localhost:9200", &["idx", "_doc", "42"]),
            "http://localhost:9200/idx/_doc/42"
        );
    }

    #[test]
    fn test_join_path_without_segments_returns_base() {
        assert_eq!(
            join_path("http://localhost:9200", &[]),
            "http://localhost:9200"
        );
    }

    #[test]
    fn test_join_path_encodes_reserved_characters() {
        assert_eq!(
            join_path("http://localhost:9200", &["logs/2024", "_doc", "a b"]),
            "http://localhost:9200/logs%2F2024/_doc/a%20b"
        );
    }

    #[test]
    fn test_join_path_encodes_index_lists() {
        assert_eq!(
            join_path("http://localhost:9200", &["an_index,another_index", "_search"]),
            "http://localhost:9200/an_index%2Canother_index/_search"
        );
    }

    #[test]
    fn test_join_path_keeps_empty_trailing_segment() {
        assert_eq!(
            join_path("http://localhost:9200", &["idx", "_doc", ""]),
            "http://localhost:9200/idx/_doc/"
        );
    }
}
