//! Unit inference from counter names.
//!
//! Counter names conventionally embed their unit ("NetworkBytesPerSec",
//! "ResponseTimeMilliseconds"). Two fixed tables are scanned in full and a
//! later match overwrites an earlier one; compatibility note: downstream
//! dashboards depend on the observed units, so the last-match-wins behavior
//! is kept as-is rather than given an explicit precedence.

use crate::core::Unit;

/// Data-size tokens, matched case-sensitively against the counter name.
const DATA_SIZE_UNITS: &[(&str, Unit)] = &[
    ("Bits", Unit::Bits),
    ("Bytes", Unit::Bytes),
    ("Kilobits", Unit::Kilobits),
    ("Kilobytes", Unit::Kilobytes),
    ("Megabits", Unit::Megabits),
    ("Megabytes", Unit::Megabytes),
    ("Gigabits", Unit::Gigabits),
    ("Gigabytes", Unit::Gigabytes),
    ("Terabits", Unit::Terabits),
    ("Terabytes", Unit::Terabytes),
];

/// Time/count/percent tokens, only consulted for non-rate counters.
const SCALAR_UNITS: &[(&str, Unit)] = &[
    ("Microseconds", Unit::Microseconds),
    ("Milliseconds", Unit::Milliseconds),
    ("Seconds", Unit::Seconds),
    ("Count", Unit::Count),
    ("Percent", Unit::Percent),
];

/// Infer the measurement unit for a counter name.
///
/// A name containing `PerSec` (any case) becomes the rate form of
/// whatever data-size unit matched, or `Count/Second` when none did.
/// Everything else defaults to `Count`.
pub fn infer_unit(counter_name: &str) -> Unit {
    let mut unit = None;
    for (token, candidate) in DATA_SIZE_UNITS {
        if counter_name.contains(token) {
            unit = Some(*candidate);
        }
    }

    if counter_name.to_ascii_lowercase().contains("persec") {
        return unit.unwrap_or_default().per_second();
    }

    for (token, candidate) in SCALAR_UNITS {
        if counter_name.contains(token) {
            unit = Some(*candidate);
        }
    }

    unit.unwrap_or_default()
}
