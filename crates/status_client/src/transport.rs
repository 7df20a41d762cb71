use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::error::StatusFailure;

/// Fetches the raw CSV body for a sheet URL.
#[async_trait]
pub trait SheetTransport: Send + Sync {
    async fn fetch_csv(&self, url: &str) -> Result<String, StatusFailure>;
}

pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new(request_timeout: Duration) -> Result<Self, StatusFailure> {
        let http = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|err| StatusFailure::network(format!("failed to build HTTP client: {err}")))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl SheetTransport for HttpTransport {
    async fn fetch_csv(&self, url: &str) -> Result<String, StatusFailure> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| StatusFailure::network(format!("request failed: {err}")))?
            .error_for_status()
            .map_err(|err| StatusFailure::network(format!("sheet responded with error: {err}")))?;

        response
            .text()
            .await
            .map_err(|err| StatusFailure::network(format!("failed to read sheet body: {err}")))
    }
}
