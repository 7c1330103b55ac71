//! Shared test helpers.
#![allow(dead_code)]

use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use cwrelay::core::{CounterSampleCollection, MetricDataPoint, RelayError, Sample};
use cwrelay::transport::MetricsTransport;

static TRACING: Once = Once::new();

/// Install a tracing subscriber once per test binary so pipeline logs
/// show up under `--nocapture`, filtered through `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// One recorded write call: target namespace and the points sent.
pub type RecordedCall = (String, Vec<MetricDataPoint>);

/// Transport that records every write call instead of sending it.
///
/// Namespaces listed in `fail_namespaces` are still recorded but return a
/// transport error, for exercising per-group failure handling.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    fail_namespaces: Arc<Mutex<Vec<String>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_namespace<S: Into<String>>(&self, namespace: S) {
        self.fail_namespaces.lock().unwrap().push(namespace.into());
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl MetricsTransport for RecordingTransport {
    async fn put_metric_data(
        &self,
        namespace: &str,
        points: &[MetricDataPoint],
    ) -> cwrelay::Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((namespace.to_string(), points.to_vec()));
        if self.fail_namespaces.lock().unwrap().iter().any(|ns| ns == namespace) {
            return Err(RelayError::transport(format!("injected failure for '{}'", namespace)));
        }
        Ok(())
    }
}

/// Fixed timestamp so assertions stay deterministic.
pub fn sample_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

/// A collection with a single sample, enough to produce one point.
pub fn collection(name: &str, value: f64) -> CounterSampleCollection {
    CounterSampleCollection::with_samples(name, vec![Sample::new(value, sample_time())])
}
