//! Domain types for the forwarding pipeline.
//!
//! These mirror the wire shapes of a CloudWatch-style `PutMetricData`
//! call: a metric data point carries a statistic set rather than raw
//! samples, so one point per counter per interval is enough.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One timestamped sample of a counter, as delivered by the host collector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Sampled counter value
    pub value: f64,
    /// Collection time of this sample
    pub timestamp: DateTime<Utc>,
}

impl Sample {
    /// Creates a sample from a value and its collection time.
    pub fn new(value: f64, timestamp: DateTime<Utc>) -> Self {
        Self { value, timestamp }
    }
}

/// All samples gathered for one named counter during one reporting interval.
///
/// Consumed exactly once per interval by the writer; not retained after
/// it has been aggregated into a [`MetricDataPoint`].
#[derive(Debug, Clone, PartialEq)]
pub struct CounterSampleCollection {
    /// Name of the counter these samples belong to
    pub counter_name: String,
    /// Ordered samples for the interval
    pub samples: Vec<Sample>,
}

impl CounterSampleCollection {
    /// Creates an empty collection for the given counter.
    pub fn new<S: Into<String>>(counter_name: S) -> Self {
        Self {
            counter_name: counter_name.into(),
            samples: Vec::new(),
        }
    }

    /// Creates a collection from pre-gathered samples.
    pub fn with_samples<S: Into<String>>(counter_name: S, samples: Vec<Sample>) -> Self {
        Self {
            counter_name: counter_name.into(),
            samples,
        }
    }
}

/// Aggregated statistics for one counter over one reporting interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct StatisticSet {
    /// Smallest sampled value
    #[serde(rename = "Minimum")]
    pub minimum: f64,
    /// Largest sampled value
    #[serde(rename = "Maximum")]
    pub maximum: f64,
    /// Number of samples aggregated
    #[serde(rename = "SampleCount")]
    pub sample_count: f64,
    /// Sum of all sampled values
    #[serde(rename = "Sum")]
    pub sum: f64,
}

/// A name/value tag attached to a metric data point for filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    /// Dimension name, e.g. `InstanceId`
    #[serde(rename = "Name")]
    pub name: String,
    /// Dimension value
    #[serde(rename = "Value")]
    pub value: String,
}

impl Dimension {
    /// Creates a dimension from a name and value.
    pub fn new<N: Into<String>, V: Into<String>>(name: N, value: V) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// The unit of data sent to the remote metrics API.
///
/// Built from exactly one counter-sample collection per interval; never
/// mutated afterwards except when namespace routing strips a dotted
/// prefix off the name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDataPoint {
    /// Metric name, at most 255 characters or the point is dropped
    #[serde(rename = "MetricName")]
    pub name: String,
    /// Inferred measurement unit
    #[serde(rename = "Unit")]
    pub unit: Unit,
    /// Aggregated statistics over the interval
    #[serde(rename = "StatisticValues")]
    pub statistics: StatisticSet,
    /// Latest sample timestamp, or the Unix epoch for an empty interval
    #[serde(rename = "Timestamp")]
    pub timestamp: DateTime<Utc>,
    /// Dimensions in fixed order: InstanceId, AutoScalingGroupName, SenderId
    #[serde(rename = "Dimensions", skip_serializing_if = "Vec::is_empty", default)]
    pub dimensions: Vec<Dimension>,
}

/// Measurement units understood by the remote metrics API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    Seconds,
    Microseconds,
    Milliseconds,
    Bytes,
    Kilobytes,
    Megabytes,
    Gigabytes,
    Terabytes,
    Bits,
    Kilobits,
    Megabits,
    Gigabits,
    Terabits,
    Percent,
    Count,
    #[serde(rename = "Bytes/Second")]
    BytesPerSecond,
    #[serde(rename = "Kilobytes/Second")]
    KilobytesPerSecond,
    #[serde(rename = "Megabytes/Second")]
    MegabytesPerSecond,
    #[serde(rename = "Gigabytes/Second")]
    GigabytesPerSecond,
    #[serde(rename = "Terabytes/Second")]
    TerabytesPerSecond,
    #[serde(rename = "Bits/Second")]
    BitsPerSecond,
    #[serde(rename = "Kilobits/Second")]
    KilobitsPerSecond,
    #[serde(rename = "Megabits/Second")]
    MegabitsPerSecond,
    #[serde(rename = "Gigabits/Second")]
    GigabitsPerSecond,
    #[serde(rename = "Terabits/Second")]
    TerabitsPerSecond,
    #[serde(rename = "Count/Second")]
    CountPerSecond,
    None,
}

impl Default for Unit {
    fn default() -> Self {
        Unit::Count
    }
}

impl Unit {
    /// Wire name of the unit.
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Seconds => "Seconds",
            Unit::Microseconds => "Microseconds",
            Unit::Milliseconds => "Milliseconds",
            Unit::Bytes => "Bytes",
            Unit::Kilobytes => "Kilobytes",
            Unit::Megabytes => "Megabytes",
            Unit::Gigabytes => "Gigabytes",
            Unit::Terabytes => "Terabytes",
            Unit::Bits => "Bits",
            Unit::Kilobits => "Kilobits",
            Unit::Megabits => "Megabits",
            Unit::Gigabits => "Gigabits",
            Unit::Terabits => "Terabits",
            Unit::Percent => "Percent",
            Unit::Count => "Count",
            Unit::BytesPerSecond => "Bytes/Second",
            Unit::KilobytesPerSecond => "Kilobytes/Second",
            Unit::MegabytesPerSecond => "Megabytes/Second",
            Unit::GigabytesPerSecond => "Gigabytes/Second",
            Unit::TerabytesPerSecond => "Terabytes/Second",
            Unit::BitsPerSecond => "Bits/Second",
            Unit::KilobitsPerSecond => "Kilobits/Second",
            Unit::MegabitsPerSecond => "Megabits/Second",
            Unit::GigabitsPerSecond => "Gigabits/Second",
            Unit::TerabitsPerSecond => "Terabits/Second",
            Unit::CountPerSecond => "Count/Second",
            Unit::None => "None",
        }
    }

    /// The rate form of this unit, used for counters named `...PerSec`.
    ///
    /// Units with no rate form on the remote API fall back to
    /// `Count/Second`.
    pub fn per_second(self) -> Unit {
        match self {
            Unit::Bytes => Unit::BytesPerSecond,
            Unit::Kilobytes => Unit::KilobytesPerSecond,
            Unit::Megabytes => Unit::MegabytesPerSecond,
            Unit::Gigabytes => Unit::GigabytesPerSecond,
            Unit::Terabytes => Unit::TerabytesPerSecond,
            Unit::Bits => Unit::BitsPerSecond,
            Unit::Kilobits => Unit::KilobitsPerSecond,
            Unit::Megabits => Unit::MegabitsPerSecond,
            Unit::Gigabits => Unit::GigabitsPerSecond,
            Unit::Terabits => Unit::TerabitsPerSecond,
            Unit::BytesPerSecond
            | Unit::KilobytesPerSecond
            | Unit::MegabytesPerSecond
            | Unit::GigabytesPerSecond
            | Unit::TerabytesPerSecond
            | Unit::BitsPerSecond
            | Unit::KilobitsPerSecond
            | Unit::MegabitsPerSecond
            | Unit::GigabitsPerSecond
            | Unit::TerabitsPerSecond
            | Unit::CountPerSecond => self,
            _ => Unit::CountPerSecond,
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_wire_names() {
        assert_eq!(Unit::BytesPerSecond.as_str(), "Bytes/Second");
        assert_eq!(Unit::Count.as_str(), "Count");
        assert_eq!(serde_json::to_string(&Unit::MegabitsPerSecond).unwrap(), "\"Megabits/Second\"");
    }

    #[test]
    fn test_per_second_mapping() {
        assert_eq!(Unit::Bytes.per_second(), Unit::BytesPerSecond);
        assert_eq!(Unit::Count.per_second(), Unit::CountPerSecond);
        assert_eq!(Unit::Percent.per_second(), Unit::CountPerSecond);
        assert_eq!(Unit::BitsPerSecond.per_second(), Unit::BitsPerSecond);
    }

    #[test]
    fn test_point_serializes_pascal_case() {
        let point = MetricDataPoint {
            name: "QueueLength".to_string(),
            unit: Unit::Count,
            statistics: StatisticSet {
                minimum: 1.0,
                maximum: 4.0,
                sample_count: 3.0,
                sum: 7.0,
            },
            timestamp: DateTime::UNIX_EPOCH,
            dimensions: vec![Dimension::new("InstanceId", "i-0abc")],
        };
        let json = serde_json::to_value(&point).unwrap();
        assert_eq!(json["MetricName"], "QueueLength");
        assert_eq!(json["Unit"], "Count");
        assert_eq!(json["StatisticValues"]["SampleCount"], 3.0);
        assert_eq!(json["Dimensions"][0]["Name"], "InstanceId");
    }

    #[test]
    fn test_empty_dimensions_omitted() {
        let point = MetricDataPoint {
            name: "x".to_string(),
            unit: Unit::Count,
            statistics: StatisticSet::default(),
            timestamp: DateTime::UNIX_EPOCH,
            dimensions: Vec::new(),
        };
        let json = serde_json::to_value(&point).unwrap();
        assert!(json.get("Dimensions").is_none());
    }
}
