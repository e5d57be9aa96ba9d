//! reqwest-backed HTTP client for the sync engine.

use padsync_engine::{HttpClient, HttpTransport, SyncConfig};
use std::time::Duration;

/// Blocking HTTP client over reqwest.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a client with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, String> {
        let response = self.client.get(url).send().map_err(|e| e.to_string())?;
        let bytes = response.bytes().map_err(|e| e.to_string())?;
        Ok(bytes.to_vec())
    }

    fn post(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>, String> {
        let response = self
            .client
            .post(url)
            .header("content-type", "application/json")
            .body(body)
            .send()
            .map_err(|e| e.to_string())?;
        let bytes = response.bytes().map_err(|e| e.to_string())?;
        Ok(bytes.to_vec())
    }

    fn is_healthy(&self) -> bool {
        true
    }
}

/// Builds an HTTP transport for the configured server.
pub fn transport(
    config: &SyncConfig,
) -> Result<HttpTransport<ReqwestClient>, Box<dyn std::error::Error>> {
    let client = ReqwestClient::new(config.timeout)?;
    Ok(HttpTransport::new(config.server_url.clone(), client))
}
