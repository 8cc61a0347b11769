//! URL helpers
//!
//! Resource names returned by the service ("fileSearchStores/abc",
//! "fileSearchStores/abc/documents/def") are appended verbatim to the base URL.

/// Join a base URL and a relative path with exactly one slash between them.
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Join several segments, collapsing duplicate slashes at the seams.
pub fn join_url_segments(segments: &[&str]) -> String {
    segments
        .iter()
        .map(|s| s.trim_matches('/'))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Append URL-encoded query parameters, skipping the `?` when there are none.
pub fn with_query(url: String, params: &[(&str, String)]) -> String {
    if params.is_empty() {
        return url;
    }
    let qs = params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{url}?{qs}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_handles_slashes() {
        assert_eq!(
            join_url("http://h/v1beta/", "/fileSearchStores"),
            "http://h/v1beta/fileSearchStores"
        );
        assert_eq!(
            join_url_segments(&["http://h/v1beta/", "fileSearchStores/a/documents"]),
            "http://h/v1beta/fileSearchStores/a/documents"
        );
    }

    #[test]
    fn query_is_encoded() {
        let url = with_query(
            "http://h/x".to_string(),
            &[("pageToken", "a b/c".to_string()), ("pageSize", "20".to_string())],
        );
        assert_eq!(url, "http://h/x?pageToken=a%20b%2Fc&pageSize=20");
        assert_eq!(with_query("http://h/x".to_string(), &[]), "http://h/x");
    }
}
