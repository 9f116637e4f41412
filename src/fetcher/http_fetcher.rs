use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::app::Result;
use crate::fetcher::Fetcher;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_USER_AGENT: &str = concat!("estuary/", env!("CARGO_PKG_VERSION"));

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn with_options(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        // Search URLs carry the API key, keep it out of error messages.
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        response
            .error_for_status_ref()
            .map_err(|e| e.without_url())?;

        let body = response
            .bytes()
            .await
            .map_err(reqwest::Error::without_url)?;
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Instant;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    use crate::domain::{SourceKind, SourceQuery};
    use crate::source::{FeedAdapter, SourceAdapter, SourceOutcome};

    fn fetcher(timeout: Duration) -> HttpFetcher {
        HttpFetcher::with_options(timeout, DEFAULT_USER_AGENT).unwrap()
    }

    async fn read_request(socket: &mut TcpStream) {
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            match socket.read(&mut buf).await {
                Ok(0) | Err(_) => return,
                Ok(n) => request.extend_from_slice(&buf[..n]),
            }
        }
    }

    /// Accepts connections and never answers.
    async fn silent_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut open = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                open.push(socket);
            }
        });
        format!("http://{}/feeds/videos.xml", addr)
    }

    /// Answers every request with the given status line and body.
    async fn server(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                read_request(&mut socket).await;
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_unresponsive_server_is_a_soft_failure_within_timeout() {
        let endpoint = silent_server().await;
        let adapter = FeedAdapter::new(
            Arc::new(fetcher(Duration::from_millis(300))),
            &endpoint,
        );
        let query = SourceQuery::new(SourceKind::Channel {
            channel_id: "UCabc".into(),
        });

        let started = Instant::now();
        let outcome = adapter.fetch_candidates(&query).await;

        assert!(matches!(outcome, SourceOutcome::Failed(_)));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_server_error_status_is_an_error() {
        let base = server("500 Internal Server Error", "boom").await;
        let url = format!("{}/v3/search?q=goals&key=secret-key", base);

        let err = fetcher(Duration::from_secs(5)).fetch(&url).await.unwrap_err();

        assert!(err.to_string().contains("500"));
        assert!(!err.to_string().contains("secret-key"));
    }

    #[tokio::test]
    async fn test_success_returns_body() {
        let base = server("200 OK", "{\"items\":[]}").await;

        let body = fetcher(Duration::from_secs(5))
            .fetch(&format!("{}/v3/search", base))
            .await
            .unwrap();

        assert_eq!(body, b"{\"items\":[]}");
    }
}
