//! Core domain models and configuration.

mod config;
mod error;
mod types;

pub use config::{Settings, SettingsBuilder};
pub use error::{RelayError, Result};
pub use types::{
    CounterSampleCollection, Dimension, MetricDataPoint, Sample, StatisticSet, Unit,
};
