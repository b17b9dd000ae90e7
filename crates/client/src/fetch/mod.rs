//! HTTP fetch pipeline for credential-site view pages.
//!
//! ### Request
//! - One GET per query to `base_url + domain` (see [`query_url`]).
//! - `Accept` prefers HTML; User-Agent and timeout come from configuration.
//! - Max redirects: 5
//!
//! ### Response
//! - Non-2xx statuses are transport errors.
//! - Bodies over `max_bytes` are rejected (default 5MB).
//! - The body must be textual and valid UTF-8 before it reaches the parser.

pub mod endpoint;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Url;
use reqwest::{Client, StatusCode, header};
use std::time::{Duration, Instant};

pub use endpoint::{EndpointError, query_url};

use findlogin_core::{AppConfig, Error};

/// Source of HTML documents for the search controller.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// GET `url` and return its body decoded as text.
    async fn fetch_text(&self, url: &Url) -> Result<String, Error>;
}

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "findlogin/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "findlogin/0.1".to_string(),
            max_bytes: 5 * 1024 * 1024,
            timeout: Duration::from_millis(20000),
            max_redirects: 5,
        }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            ..Default::default()
        }
    }
}

/// Response from a fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// The URL requested
    pub url: Url,
    /// The final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status: StatusCode,
    /// Content-Type header
    pub content_type: Option<String>,
    /// Response body bytes
    pub bytes: Bytes,
    /// Time taken to fetch in milliseconds
    pub fetch_ms: u64,
}

impl FetchResponse {
    /// Decode the body as HTML text.
    pub fn text(&self) -> Result<String, Error> {
        decode_body(self.content_type.as_deref(), &self.bytes)
    }
}

/// HTTP fetch client.
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Fetch a URL, returning raw bytes and metadata.
    pub async fn fetch(&self, url: &Url) -> Result<FetchResponse, Error> {
        let start = Instant::now();

        let response = self
            .http
            .get(url.as_str())
            .header(header::ACCEPT, "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();

        if !status.is_success() {
            return Err(Error::HttpStatus { status: status.as_u16() });
        }

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", len, self.config.max_bytes)));
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let bytes = response.bytes().await.map_err(map_reqwest_error)?;

        if bytes.len() > self.config.max_bytes {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", bytes.len(), self.config.max_bytes)));
        }

        let fetch_ms = start.elapsed().as_millis() as u64;

        tracing::debug!("fetched {} -> {} in {}ms ({} bytes)", url, final_url, fetch_ms, bytes.len());

        Ok(FetchResponse { url: url.clone(), final_url, status, content_type, bytes, fetch_ms })
    }
}

#[async_trait]
impl Fetcher for FetchClient {
    async fn fetch_text(&self, url: &Url) -> Result<String, Error> {
        self.fetch(url).await?.text()
    }
}

fn map_reqwest_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::FetchTimeout(err.to_string())
    } else {
        Error::Transport(format!("network error: {}", err))
    }
}

/// Decode a response body as text, rejecting non-textual content types and
/// bodies that are not valid UTF-8.
pub fn decode_body(content_type: Option<&str>, bytes: &[u8]) -> Result<String, Error> {
    if let Some(ct) = content_type
        && !is_textual(ct)
    {
        return Err(Error::Parse(format!("non-text response body ({})", ct)));
    }

    String::from_utf8(bytes.to_vec()).map_err(|e| Error::Parse(format!("response body is not valid UTF-8: {}", e)))
}

fn is_textual(content_type: &str) -> bool {
    let mime = content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    mime.starts_with("text/") || mime.ends_with("+xml") || mime == "application/xml"
}

#[cfg(test)]
mod tests {
    use super::*;
    use findlogin_core::ErrorKind;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.user_agent, "findlogin/0.1");
        assert_eq!(config.max_bytes, 5 * 1024 * 1024);
        assert_eq!(config.timeout, Duration::from_millis(20000));
        assert_eq!(config.max_redirects, 5);
    }

    #[test]
    fn test_fetch_config_from_app_config() {
        let app = AppConfig { user_agent: "custom/1.0".into(), timeout_ms: 1500, max_bytes: 4096, ..Default::default() };
        let config = FetchConfig::from(&app);
        assert_eq!(config.user_agent, "custom/1.0");
        assert_eq!(config.timeout, Duration::from_millis(1500));
        assert_eq!(config.max_bytes, 4096);
        assert_eq!(config.max_redirects, 5);
    }

    #[test]
    fn test_fetch_response_text() {
        let response = FetchResponse {
            url: Url::parse("http://bugmenot.com/view/example.com").unwrap(),
            final_url: Url::parse("http://bugmenot.com/view/example.com").unwrap(),
            status: StatusCode::OK,
            content_type: Some("text/html; charset=utf-8".to_string()),
            bytes: Bytes::from_static(b"<p>hi</p>"),
            fetch_ms: 12,
        };

        assert_eq!(response.text().unwrap(), "<p>hi</p>");
    }

    #[test]
    fn test_decode_body_without_content_type() {
        assert_eq!(decode_body(None, b"<html></html>").unwrap(), "<html></html>");
    }

    #[test]
    fn test_decode_body_xhtml() {
        assert!(decode_body(Some("application/xhtml+xml"), b"<html/>").is_ok());
    }

    #[test]
    fn test_decode_body_binary_content_type() {
        let result = decode_body(Some("image/png"), b"\x89PNG");
        assert!(matches!(result, Err(Error::Parse(msg)) if msg.contains("non-text")));
    }

    #[test]
    fn test_decode_body_invalid_utf8() {
        let result = decode_body(Some("text/html"), &[0xff, 0xfe, 0x00]);
        assert!(matches!(result, Err(Error::Parse(msg)) if msg.contains("UTF-8")));
    }

    #[tokio::test]
    async fn test_fetch_client_new() {
        let client = FetchClient::new(FetchConfig::default());
        assert!(client.is_ok());
    }

    /// Serve a single canned HTTP response on a loopback port and return its URL.
    async fn serve_once(response: &'static str, delay: Duration) -> Url {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => return,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            tokio::time::sleep(delay).await;
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });

        Url::parse(&format!("http://{}/view/example.com", addr)).unwrap()
    }

    fn small_client(max_bytes: usize, timeout: Duration) -> FetchClient {
        FetchClient::new(FetchConfig { max_bytes, timeout, ..Default::default() }).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_returns_html_body() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 9\r\nConnection: close\r\n\r\n<p>hi</p>",
            Duration::ZERO,
        )
        .await;

        let client = small_client(1024, Duration::from_secs(5));
        assert_eq!(client.fetch_text(&url).await.unwrap(), "<p>hi</p>");
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let url = serve_once(
            "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            Duration::ZERO,
        )
        .await;

        let err = small_client(1024, Duration::from_secs(5)).fetch(&url).await.unwrap_err();
        assert!(matches!(err, Error::HttpStatus { status: 503 }));
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn test_fetch_declared_length_over_limit() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 64\r\nConnection: close\r\n\r\n\
             <html><body><article class=\"account\">padding...</article></body>",
            Duration::ZERO,
        )
        .await;

        let err = small_client(16, Duration::from_secs(5)).fetch(&url).await.unwrap_err();
        assert!(matches!(&err, Error::FetchTooLarge(msg) if msg.contains("64 bytes")));
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn test_fetch_undeclared_body_over_limit() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nConnection: close\r\n\r\n\
             <html><body><p>this body has no declared length</p></body></html>",
            Duration::ZERO,
        )
        .await;

        let err = small_client(16, Duration::from_secs(5)).fetch(&url).await.unwrap_err();
        assert!(matches!(err, Error::FetchTooLarge(_)));
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn test_fetch_timeout() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            Duration::from_secs(5),
        )
        .await;

        let err = small_client(1024, Duration::from_millis(200)).fetch(&url).await.unwrap_err();
        assert!(matches!(err, Error::FetchTimeout(_)));
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn test_fetch_text_rejects_binary_content_type() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: image/png\r\nContent-Length: 4\r\nConnection: close\r\n\r\nPNG!",
            Duration::ZERO,
        )
        .await;

        let err = small_client(1024, Duration::from_secs(5)).fetch_text(&url).await.unwrap_err();
        assert!(matches!(&err, Error::Parse(msg) if msg.contains("image/png")));
        assert_eq!(err.kind(), ErrorKind::Parse);
    }
}
