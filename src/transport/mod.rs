//! Remote write transport.
//!
//! The writer only depends on the [`MetricsTransport`] capability, so
//! tests (and alternative backends) can substitute their own. The
//! shipped implementation posts CloudWatch-style JSON over HTTP(S).

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::core::{MetricDataPoint, RelayError, Result, Settings};

/// Maximum request payload accepted by the remote API.
///
/// A serialized request above this size is rejected locally instead of
/// being sent.
pub const MAX_PAYLOAD_BYTES: usize = 40 * 1024;

/// Capability to write a batch of metric data points under a namespace.
#[async_trait]
pub trait MetricsTransport: Send + Sync {
    /// Issue one remote write call.
    async fn put_metric_data(&self, namespace: &str, points: &[MetricDataPoint]) -> Result<()>;
}

#[derive(Serialize)]
struct PutMetricDataRequest<'a> {
    #[serde(rename = "Namespace")]
    namespace: &'a str,
    #[serde(rename = "MetricData")]
    metric_data: &'a [MetricDataPoint],
}

/// HTTP(S) transport for a CloudWatch-style write-metrics API.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: reqwest::Url,
    access_key: String,
    secret_key: String,
}

impl HttpTransport {
    /// Construct a transport from validated settings.
    ///
    /// A malformed endpoint or credentials cannot be degraded, so the
    /// error propagates to the caller.
    pub fn new(settings: &Settings) -> Result<Self> {
        let endpoint = reqwest::Url::parse(&settings.endpoint)
            .map_err(|e| RelayError::config(format!("endpoint is not a valid URL: {}", e)))?;
        if settings.access_key.is_empty() || settings.secret_key.is_empty() {
            return Err(RelayError::config("transport requires access and secret keys"));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
            access_key: settings.access_key.clone(),
            secret_key: settings.secret_key.clone(),
        })
    }
}

#[async_trait]
impl MetricsTransport for HttpTransport {
    async fn put_metric_data(&self, namespace: &str, points: &[MetricDataPoint]) -> Result<()> {
        let request = PutMetricDataRequest {
            namespace,
            metric_data: points,
        };
        let body = serde_json::to_vec(&request)?;
        if body.len() > MAX_PAYLOAD_BYTES {
            // The remote API would reject this anyway; fail before sending.
            return Err(RelayError::transport(format!(
                "write request of {} bytes exceeds the {} byte payload limit",
                body.len(),
                MAX_PAYLOAD_BYTES
            )));
        }

        let response = self
            .client
            .post(self.endpoint.clone())
            .basic_auth(&self.access_key, Some(&self.secret_key))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::transport(format!(
                "write to namespace '{}' failed with status {}",
                namespace, status
            )));
        }

        debug!(namespace = %namespace, points = points.len(), "wrote metric batch");
        Ok(())
    }
}
