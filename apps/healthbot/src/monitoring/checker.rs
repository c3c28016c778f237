use anyhow::Result;
use std::time::Duration;

use crate::error::TransportError;

/// Transport used by the prober: issue one GET and report the status code
#[async_trait::async_trait]
pub trait Checker: Send + Sync {
    /// Fetch `target` once, giving up after `timeout`
    async fn check(&self, target: &str, timeout: Duration) -> Result<u16, TransportError>;
}

/// HTTP/HTTPS checker backed by reqwest
pub struct HttpChecker {
    client: reqwest::Client,
}

impl HttpChecker {
    pub fn new(accept_invalid_certs: bool) -> Result<Self> {
        if accept_invalid_certs {
            tracing::warn!("TLS certificate verification is disabled for probes");
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("healthbot/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl Checker for HttpChecker {
    async fn check(&self, target: &str, timeout: Duration) -> Result<u16, TransportError> {
        let response = self.client.get(target).timeout(timeout).send().await?;
        Ok(response.status().as_u16())
    }
}
