//! Request URL construction for domain queries.

/// Error type for query URL construction failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EndpointError {
    #[error("empty base URL")]
    EmptyBase,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Build the view URL for `domain`.
///
/// The domain text is appended to `base` as-is: no trimming and no syntax
/// checks. The only escaping applied is the percent-encoding the URL parser
/// performs (e.g. a space becomes `%20`). An empty domain yields the bare
/// base URL.
pub fn query_url(base: &str, domain: &str) -> Result<url::Url, EndpointError> {
    if base.is_empty() {
        return Err(EndpointError::EmptyBase);
    }

    let parsed = url::Url::parse(&format!("{base}{domain}")).map_err(|e| EndpointError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(EndpointError::UnsupportedScheme(scheme.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://bugmenot.com/view/";

    #[test]
    fn test_query_url_basic() {
        let url = query_url(BASE, "example.com").unwrap();
        assert_eq!(url.as_str(), "http://bugmenot.com/view/example.com");
    }

    #[test]
    fn test_query_url_empty_domain() {
        let url = query_url(BASE, "").unwrap();
        assert_eq!(url.as_str(), "http://bugmenot.com/view/");
        assert_eq!(url.path_segments().and_then(|mut s| s.next_back()), Some(""));
    }

    #[test]
    fn test_query_url_keeps_case() {
        let url = query_url(BASE, "Example.COM").unwrap();
        assert_eq!(url.path(), "/view/Example.COM");
    }

    #[test]
    fn test_query_url_not_validated() {
        let url = query_url(BASE, "not a domain").unwrap();
        assert_eq!(url.path(), "/view/not%20a%20domain");
    }

    #[test]
    fn test_query_url_empty_base() {
        assert!(matches!(query_url("", "example.com"), Err(EndpointError::EmptyBase)));
    }

    #[test]
    fn test_query_url_invalid_base() {
        assert!(matches!(query_url("bugmenot.com/view/", "x"), Err(EndpointError::InvalidUrl(_))));
    }

    #[test]
    fn test_query_url_unsupported_scheme() {
        let result = query_url("ftp://bugmenot.com/view/", "example.com");
        assert!(matches!(result, Err(EndpointError::UnsupportedScheme(s)) if s == "ftp"));
    }
}
