//! HTTP transport for upstream sports APIs.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

use statline_types::SourceFailure;

/// One GET against an upstream tier.
///
/// Implementations succeed only on a 2xx status with a JSON body.
#[async_trait]
pub trait SourceClient: Send + Sync {
    async fn get_json(
        &self,
        url: &str,
        headers: &BTreeMap<String, String>,
        timeout: Duration,
    ) -> Result<Value, SourceFailure>;
}

pub struct HttpSourceClient {
    client: reqwest::Client,
}

impl HttpSourceClient {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("statline/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(5))
            .pool_max_idle_per_host(8)
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn build_headers(headers: &BTreeMap<String, String>) -> Result<HeaderMap, SourceFailure> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            SourceFailure::InvalidRequest { message: format!("header name '{name}': {e}") }
        })?;
        let mut value = HeaderValue::from_str(value).map_err(|e| SourceFailure::InvalidRequest {
            message: format!("header value for '{}': {e}", name.as_str()),
        })?;
        value.set_sensitive(true);
        map.insert(name, value);
    }
    Ok(map)
}

fn classify(err: &reqwest::Error, timeout: Duration) -> SourceFailure {
    if err.is_timeout() {
        SourceFailure::Timeout { timeout_ms: timeout.as_millis() as u64 }
    } else if err.is_builder() {
        SourceFailure::InvalidRequest { message: err.to_string() }
    } else {
        SourceFailure::Network { message: err.to_string() }
    }
}

#[async_trait]
impl SourceClient for HttpSourceClient {
    async fn get_json(
        &self,
        url: &str,
        headers: &BTreeMap<String, String>,
        timeout: Duration,
    ) -> Result<Value, SourceFailure> {
        let response = self
            .client
            .get(url)
            .headers(build_headers(headers)?)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify(&e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceFailure::Status { status: status.as_u16() });
        }

        let body = response.bytes().await.map_err(|e| classify(&e, timeout))?;
        serde_json::from_slice(&body).map_err(|e| SourceFailure::Parse { message: e.to_string() })
    }
}
