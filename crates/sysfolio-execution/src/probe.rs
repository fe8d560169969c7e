//! Courtesy check of the portfolio API before a load test.
//!
//! The result never changes the simulation: a non-success status is surfaced
//! as an event and a transport failure is only logged.

use std::time::Duration;

use async_trait::async_trait;
use sysfolio_core::{FolioError, Result};
use tracing::debug;

/// What the probe saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Reachable,
    /// The server answered with a non-success status.
    Unavailable { status: u16 },
}

/// Something that can check whether the API answers.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn probe(&self) -> Result<ProbeOutcome>;
}

/// Issues `GET {base_url}/api/profile`.
pub struct HttpProfileProbe {
    client: reqwest::Client,
    url: String,
}

impl HttpProfileProbe {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FolioError::network(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: format!("{}/api/profile", base_url.trim_end_matches('/')),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl HealthProbe for HttpProfileProbe {
    async fn probe(&self) -> Result<ProbeOutcome> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FolioError::network(format!("GET {} failed: {}", self.url, e)))?;

        let status = response.status();
        debug!(url = %self.url, %status, "profile probe answered");
        if status.is_success() {
            Ok(ProbeOutcome::Reachable)
        } else {
            Ok(ProbeOutcome::Unavailable {
                status: status.as_u16(),
            })
        }
    }
}
