//! HTTP client for the Google Civic Information API.

use super::{LookupError, RepresentativeLookup};
use crate::models::Official;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Configuration for the civic client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_seconds: u64,
    /// Government levels to include (e.g. `country`).
    pub levels: Vec<String>,
    /// Office roles to include (e.g. `legislatorUpperBody`).
    pub roles: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.googleapis.com/civicinfo/v2".to_string(),
            api_key: String::new(),
            timeout_seconds: 30,
            levels: vec!["country".to_string()],
            roles: vec![
                "legislatorUpperBody".to_string(),
                "legislatorLowerBody".to_string(),
            ],
        }
    }
}

/// `representativeInfoByAddress` response; only the officials are used.
#[derive(Debug, Deserialize)]
struct RepresentativeInfoResponse {
    #[serde(default)]
    officials: Vec<Official>,
}

/// Client for the representatives endpoint.
pub struct CivicClient {
    config: ClientConfig,
    http_client: reqwest::Client,
}

impl CivicClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        info!("Initializing civic client for {}", config.base_url);

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self::with_http_client(config, http_client))
    }

    /// Use a preconfigured HTTP client.
    pub fn with_http_client(config: ClientConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    fn query<'a>(&'a self, zipcode: &'a str) -> Vec<(&'static str, &'a str)> {
        let mut query = vec![("address", zipcode)];
        query.extend(self.config.levels.iter().map(|l| ("levels", l.as_str())));
        query.extend(self.config.roles.iter().map(|r| ("roles", r.as_str())));
        query.push(("key", self.config.api_key.as_str()));
        query
    }
}

impl RepresentativeLookup for CivicClient {
    async fn legislators_by_zipcode(&self, zipcode: &str) -> Result<Vec<Official>, LookupError> {
        let url = format!(
            "{}/representatives",
            self.config.base_url.trim_end_matches('/')
        );
        debug!("Looking up representatives for {}", zipcode);

        let response = self
            .http_client
            .get(&url)
            .query(&self.query(zipcode))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LookupError::Timeout(self.config.timeout_seconds)
                } else if e.is_connect() {
                    LookupError::Connect(self.config.base_url.clone())
                } else {
                    LookupError::Request(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LookupError::Api { status, body });
        }

        let info: RepresentativeInfoResponse =
            response.json().await.map_err(LookupError::Decode)?;

        Ok(info.officials)
    }
}

/// Read the API key from its secret file.
///
/// A missing or empty key file is fatal: no attendee is processed without it.
pub fn load_api_key(path: &Path) -> Result<String> {
    let key = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read API key file: {}", path.display()))?;

    let key = key.trim();
    if key.is_empty() {
        bail!("API key file is empty: {}", path.display());
    }

    Ok(key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Serve one canned HTTP response and report the request line.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let n = socket.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).to_string();
            let _ = tx.send(request.lines().next().unwrap_or_default().to_string());

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        (format!("http://{}", addr), rx)
    }

    fn client_for(base_url: String) -> CivicClient {
        let http_client = reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        CivicClient::with_http_client(
            ClientConfig {
                base_url,
                api_key: "test-key".to_string(),
                timeout_seconds: 5,
                ..ClientConfig::default()
            },
            http_client,
        )
    }

    #[test]
    fn test_new_client() {
        assert!(CivicClient::new(ClientConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_lookup_parses_officials() {
        let body = r#"{"officials":[{"name":"Chris Van Hollen","party":"Democratic Party"},{"name":"Steny H. Hoyer"}]}"#;
        let (base_url, request_line) = serve_once("200 OK", body).await;

        let officials = client_for(base_url)
            .legislators_by_zipcode("20010")
            .await
            .unwrap();

        assert_eq!(officials.len(), 2);
        assert_eq!(officials[0].name, "Chris Van Hollen");
        assert_eq!(officials[0].party.as_deref(), Some("Democratic Party"));
        assert_eq!(officials[1].party, None);

        let request_line = request_line.await.unwrap();
        assert!(request_line.starts_with("GET /representatives?"));
        assert!(request_line.contains("address=20010"));
        assert!(request_line.contains("levels=country"));
        assert!(request_line.contains("roles=legislatorUpperBody"));
        assert!(request_line.contains("roles=legislatorLowerBody"));
        assert!(request_line.contains("key=test-key"));
    }

    #[tokio::test]
    async fn test_lookup_error_status() {
        let (base_url, _) = serve_once("403 Forbidden", r#"{"error":"denied"}"#).await;

        let err = client_for(base_url)
            .legislators_by_zipcode("20010")
            .await
            .unwrap_err();

        assert!(matches!(err, LookupError::Api { status: 403, .. }));
    }

    #[tokio::test]
    async fn test_lookup_malformed_body() {
        let (base_url, _) = serve_once("200 OK", "not json").await;

        let err = client_for(base_url)
            .legislators_by_zipcode("20010")
            .await
            .unwrap_err();

        assert!(matches!(err, LookupError::Decode(_)));
    }

    #[test]
    fn test_load_api_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.key");
        std::fs::write(&path, "  abc123\n").unwrap();

        assert_eq!(load_api_key(&path).unwrap(), "abc123");
    }

    #[test]
    fn test_load_api_key_missing_or_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.key");
        assert!(load_api_key(&path).is_err());

        std::fs::write(&path, "\n").unwrap();
        assert!(load_api_key(&path).is_err());
    }
}
