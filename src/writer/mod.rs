//! The forwarding writer.
//!
//! A writer consumes one batch of counter-sample collections per
//! reporting interval, aggregates each collection into a single metric
//! data point, and ships the points to the remote API in size-capped,
//! namespace-routed batches. The host drives it through the
//! [`MetricWriter`] trait: `start` once, `publish` once per interval,
//! `dispose` when done. Publish cycles are serial; the writer has no
//! internal parallelism and performs no retries of its own.

mod batch;
mod dimensions;
mod units;

pub use batch::{route_batches, RoutedBatch, MAX_BATCH_SIZE, MAX_METRIC_NAME_LEN};
pub use dimensions::{resolve_group_name, resolve_instance_id};
pub use units::infer_unit;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::core::{
    CounterSampleCollection, Dimension, MetricDataPoint, RelayError, Result, Settings,
    StatisticSet,
};
use crate::transport::{HttpTransport, MetricsTransport};

/// Smallest publish interval the writer accepts.
pub const MIN_SEND_INTERVAL: Duration = Duration::from_secs(60);

/// Notifications raised to the owning sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterEvent {
    /// The writer was asked to publish while not ready; nothing was sent.
    Disconnected,
}

/// Context supplied by the owning sender at start.
#[derive(Debug)]
pub struct SenderContext {
    /// Interval between publish cycles, at least [`MIN_SEND_INTERVAL`]
    pub interval: Duration,
    /// Identifier of the owning sender, attached as the `SenderId` dimension
    pub sender_id: String,
    /// Channel on which writer events are raised
    pub events: mpsc::UnboundedSender<WriterEvent>,
}

impl SenderContext {
    /// Create a context and the receiving half of its event channel.
    pub fn new<S: Into<String>>(
        interval: Duration,
        sender_id: S,
    ) -> (Self, mpsc::UnboundedReceiver<WriterEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        (
            Self {
                interval,
                sender_id: sender_id.into(),
                events,
            },
            rx,
        )
    }
}

/// A transport-agnostic metric writer.
///
/// The host dispatches over this capability set and never depends on a
/// concrete remote-API client.
#[async_trait]
pub trait MetricWriter: Send {
    /// One-time initialization. Fails on a second call or after dispose.
    async fn start(&mut self, ctx: SenderContext) -> Result<()>;

    /// Forward one interval's counter-sample collections.
    async fn publish(&mut self, collections: &[CounterSampleCollection]) -> Result<()>;

    /// Idempotent teardown; safe even if `start` was never called.
    fn dispose(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    Uninitialized,
    Started,
    Disposed,
}

/// Writer targeting a CloudWatch-style HTTP metrics API.
pub struct CloudWatchWriter {
    settings: Settings,
    state: WriterState,
    ready: Arc<AtomicBool>,
    transport: Option<Box<dyn MetricsTransport>>,
    dimensions: Vec<Dimension>,
    events: Option<mpsc::UnboundedSender<WriterEvent>>,
}

impl CloudWatchWriter {
    /// Create an unstarted writer owning the given settings.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            state: WriterState::Uninitialized,
            ready: Arc::new(AtomicBool::new(true)),
            transport: None,
            dimensions: Vec::new(),
            events: None,
        }
    }

    /// Create a writer with a pre-built transport.
    ///
    /// `start` skips HTTP transport construction when one is already
    /// present; used by tests and alternative backends.
    pub fn with_transport(settings: Settings, transport: Box<dyn MetricsTransport>) -> Self {
        let mut writer = Self::new(settings);
        writer.transport = Some(transport);
        writer
    }

    /// Shared readiness flag.
    ///
    /// The host flips this to `false` when it knows transmission cannot
    /// succeed (e.g. no network); publish then raises
    /// [`WriterEvent::Disconnected`] instead of writing.
    pub fn ready_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.ready)
    }

    /// Set the readiness flag.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    /// Aggregate one collection into a metric data point.
    ///
    /// The first sample seeds min and max rather than folding from zero,
    /// so the reported minimum of an all-positive interval is the actual
    /// smallest sample and never a spurious 0. An empty collection yields
    /// the all-zero statistic set with the epoch timestamp and is
    /// forwarded as-is.
    fn aggregate(&self, collection: &CounterSampleCollection) -> MetricDataPoint {
        let mut statistics = StatisticSet::default();
        let mut timestamp = DateTime::UNIX_EPOCH;

        for (i, sample) in collection.samples.iter().enumerate() {
            if i == 0 {
                statistics.minimum = sample.value;
                statistics.maximum = sample.value;
            } else {
                statistics.minimum = statistics.minimum.min(sample.value);
                statistics.maximum = statistics.maximum.max(sample.value);
            }
            statistics.sample_count += 1.0;
            statistics.sum += sample.value;
            if sample.timestamp > timestamp {
                timestamp = sample.timestamp;
            }
        }

        MetricDataPoint {
            name: collection.counter_name.clone(),
            unit: infer_unit(&collection.counter_name),
            statistics,
            timestamp,
            dimensions: self.dimensions.clone(),
        }
    }
}

/// Route one working batch and issue its write calls.
///
/// Every group is attempted even when an earlier one fails; the first
/// failure is returned once the whole batch has been processed.
async fn flush(
    transport: &dyn MetricsTransport,
    namespace: &str,
    auto_namespace: bool,
    points: Vec<MetricDataPoint>,
) -> Result<()> {
    let mut first_err = None;
    for routed in route_batches(namespace, auto_namespace, points) {
        match transport.put_metric_data(&routed.namespace, &routed.points).await {
            Ok(()) => {
                debug!(
                    namespace = %routed.namespace,
                    points = routed.points.len(),
                    "flushed metric batch"
                );
            },
            Err(e) => {
                error!(namespace = %routed.namespace, error = %e, "metric write failed");
                if first_err.is_none() {
                    first_err = Some(e);
                }
            },
        }
    }
    match first_err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[async_trait]
impl MetricWriter for CloudWatchWriter {
    async fn start(&mut self, ctx: SenderContext) -> Result<()> {
        match self.state {
            WriterState::Started => return Err(RelayError::invalid_state("already started")),
            WriterState::Disposed => return Err(RelayError::invalid_state("disposed")),
            WriterState::Uninitialized => {},
        }
        if ctx.interval < MIN_SEND_INTERVAL {
            return Err(RelayError::IntervalOutOfRange {
                actual: ctx.interval,
                minimum: MIN_SEND_INTERVAL,
            });
        }

        // Dimension lookups are best-effort and never fail the start.
        let lookup_client = reqwest::Client::new();
        let instance_id = resolve_instance_id(
            &lookup_client,
            self.settings.instance_lookup_url.as_deref(),
        )
        .await;
        let group_name = resolve_group_name(self.settings.group_file.as_deref()).await;

        let mut dimensions = Vec::new();
        if !instance_id.is_empty() {
            dimensions.push(Dimension::new("InstanceId", instance_id));
        }
        if let Some(group) = group_name {
            dimensions.push(Dimension::new("AutoScalingGroupName", group));
        }
        if !ctx.sender_id.is_empty() {
            dimensions.push(Dimension::new("SenderId", ctx.sender_id));
        }
        self.dimensions = dimensions;

        // A bad endpoint or credential format cannot be degraded.
        if self.transport.is_none() {
            self.transport = Some(Box::new(HttpTransport::new(&self.settings)?));
        }

        self.events = Some(ctx.events);
        self.state = WriterState::Started;
        info!(
            namespace = %self.settings.namespace,
            auto_namespace = self.settings.auto_namespace,
            dimensions = self.dimensions.len(),
            "metric writer started"
        );
        Ok(())
    }

    async fn publish(&mut self, collections: &[CounterSampleCollection]) -> Result<()> {
        match self.state {
            WriterState::Disposed => return Err(RelayError::invalid_state("disposed")),
            WriterState::Uninitialized => return Err(RelayError::invalid_state("not started")),
            WriterState::Started => {},
        }

        if !self.ready.load(Ordering::SeqCst) {
            debug!("writer not ready, raising disconnected event");
            if let Some(events) = &self.events {
                let _ = events.send(WriterEvent::Disconnected);
            }
            return Ok(());
        }

        let transport = self
            .transport
            .as_deref()
            .ok_or_else(|| RelayError::invalid_state("not started"))?;

        let mut working = Vec::with_capacity(MAX_BATCH_SIZE);
        for collection in collections {
            let point = self.aggregate(collection);
            if point.name.chars().count() > MAX_METRIC_NAME_LEN {
                warn!(
                    name_len = point.name.chars().count(),
                    limit = MAX_METRIC_NAME_LEN,
                    "dropping metric with oversized name"
                );
                continue;
            }
            working.push(point);
            if working.len() == MAX_BATCH_SIZE {
                flush(
                    transport,
                    &self.settings.namespace,
                    self.settings.auto_namespace,
                    std::mem::take(&mut working),
                )
                .await?;
            }
        }

        flush(
            transport,
            &self.settings.namespace,
            self.settings.auto_namespace,
            working,
        )
        .await
    }

    fn dispose(&mut self) {
        if self.state == WriterState::Disposed {
            return;
        }
        // Releases the transport exactly once; safe without a prior start.
        self.transport = None;
        self.events = None;
        self.state = WriterState::Disposed;
        debug!("metric writer disposed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Sample, SettingsBuilder, Unit};
    use chrono::{TimeZone, Utc};

    fn settings() -> Settings {
        SettingsBuilder::new()
            .access_key("AK")
            .secret_key("SK")
            .endpoint("https://monitoring.example.com/")
            .namespace("NS")
            .build()
            .unwrap()
    }

    fn writer() -> CloudWatchWriter {
        CloudWatchWriter::new(settings())
    }

    #[test]
    fn test_aggregation_statistics() {
        let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 30).unwrap();
        let collection = CounterSampleCollection::with_samples(
            "QueueLength",
            vec![
                Sample::new(5.0, t0),
                Sample::new(3.0, t1),
                Sample::new(8.0, t0),
            ],
        );

        let point = writer().aggregate(&collection);
        assert_eq!(point.name, "QueueLength");
        assert_eq!(point.unit, Unit::Count);
        assert_eq!(point.statistics.minimum, 3.0);
        assert_eq!(point.statistics.maximum, 8.0);
        assert_eq!(point.statistics.sample_count, 3.0);
        assert_eq!(point.statistics.sum, 16.0);
        assert_eq!(point.timestamp, t1);
    }

    #[test]
    fn test_aggregation_empty_collection() {
        let point = writer().aggregate(&CounterSampleCollection::new("Idle"));
        assert_eq!(point.statistics, StatisticSet::default());
        assert_eq!(point.timestamp, DateTime::UNIX_EPOCH);
    }

    #[test]
    fn test_aggregation_single_sample() {
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let collection =
            CounterSampleCollection::with_samples("CpuPercent", vec![Sample::new(42.5, t)]);
        let point = writer().aggregate(&collection);
        assert_eq!(point.statistics.minimum, 42.5);
        assert_eq!(point.statistics.maximum, 42.5);
        assert_eq!(point.statistics.sum, 42.5);
        assert_eq!(point.statistics.sample_count, 1.0);
        assert_eq!(point.unit, Unit::Percent);
    }

    #[test]
    fn test_unit_flows_from_name() {
        let point = writer().aggregate(&CounterSampleCollection::new("NetworkBytesPerSec"));
        assert_eq!(point.unit, Unit::BytesPerSecond);
    }
}
