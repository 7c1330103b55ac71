//! cwrelay - counter-sample forwarding for CloudWatch-style metric APIs.
//!
//! A host collector hands the writer a batch of counter-sample
//! collections once per reporting interval. The writer aggregates each
//! collection into one metric data point, infers a measurement unit from
//! the counter name, groups points into size-capped batches, optionally
//! routes them into dot-derived sub-namespaces, and issues one remote
//! write call per batch and namespace group.
//!
//! # Architecture
//!
//! - `core`: settings, domain types, and the error taxonomy
//! - `writer`: the aggregation, batching, and routing pipeline
//! - `transport`: the remote write capability and its HTTP implementation
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use cwrelay::core::{CounterSampleCollection, SettingsBuilder};
//! use cwrelay::writer::{CloudWatchWriter, MetricWriter, SenderContext};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = SettingsBuilder::new()
//!         .access_key("AKIA...")
//!         .secret_key("...")
//!         .endpoint("https://monitoring.example.com/")
//!         .namespace("Servers/Web")
//!         .build()?;
//!
//!     let mut writer = CloudWatchWriter::new(settings);
//!     let (ctx, _events) = SenderContext::new(Duration::from_secs(60), "sender-1");
//!     writer.start(ctx).await?;
//!
//!     let collections = vec![CounterSampleCollection::new("QueueLength")];
//!     writer.publish(&collections).await?;
//!     writer.dispose();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod core;
pub mod transport;
pub mod writer;

// Re-export core types for convenience
pub use crate::core::{RelayError, Result, Settings};
pub use crate::writer::{CloudWatchWriter, MetricWriter};
