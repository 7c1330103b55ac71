//! Batch grouping and namespace routing.
//!
//! The remote API takes at most [`MAX_BATCH_SIZE`] points per call. With
//! auto-namespace enabled a batch is additionally partitioned by dotted
//! name prefix: points named `A.B.c1` and `A.B.c2` go out in one call
//! under `{namespace}/A/B` with names `c1` and `c2`, while dotless names
//! stay under the plain namespace. The partition works a stack from its
//! end; that scan order fixes the grouping when several points share a
//! prefix. Quadratic over the batch, which is capped at 20 points.

use crate::core::MetricDataPoint;

/// Maximum points per remote write call.
pub const MAX_BATCH_SIZE: usize = 20;

/// Maximum metric name length accepted by the remote API.
pub const MAX_METRIC_NAME_LEN: usize = 255;

/// One remote write call: a target namespace and the points to send.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedBatch {
    /// Namespace for the write call
    pub namespace: String,
    /// Points for the write call, at most [`MAX_BATCH_SIZE`]
    pub points: Vec<MetricDataPoint>,
}

/// Partition a batch of points into per-namespace write calls.
///
/// With `auto_namespace` off the whole batch goes out in one call under
/// `namespace`; an empty batch produces no calls. With it on, each group
/// of points sharing a dotted name prefix is rewritten (prefix stripped
/// from the names, dots becoming slashes in the sub-namespace) and
/// emitted as its own call.
pub fn route_batches(
    namespace: &str,
    auto_namespace: bool,
    batch: Vec<MetricDataPoint>,
) -> Vec<RoutedBatch> {
    if batch.is_empty() {
        return Vec::new();
    }
    if !auto_namespace {
        return vec![RoutedBatch {
            namespace: namespace.to_string(),
            points: batch,
        }];
    }

    let mut worklist = batch;
    let mut routed = Vec::new();

    while let Some(mut point) = worklist.pop() {
        // A leading dot does not start a sub-namespace.
        match point.name.rfind('.').filter(|&idx| idx > 0) {
            Some(dot) => {
                let prefix = point.name[..dot].to_string();
                let sub_namespace = prefix.replace('.', "/");
                point.name = point.name[dot + 1..].to_string();

                let mut points = vec![point];
                for i in (0..worklist.len()).rev() {
                    if shares_prefix(&worklist[i].name, &prefix) {
                        let mut sibling = worklist.remove(i);
                        sibling.name = sibling.name[dot + 1..].to_string();
                        points.push(sibling);
                    }
                }

                routed.push(RoutedBatch {
                    namespace: format!("{}/{}", namespace, sub_namespace),
                    points,
                });
            },
            None => {
                let mut points = vec![point];
                for i in (0..worklist.len()).rev() {
                    if !worklist[i].name.contains('.') {
                        points.push(worklist.remove(i));
                    }
                }

                routed.push(RoutedBatch {
                    namespace: namespace.to_string(),
                    points,
                });
            },
        }
    }

    routed
}

/// True when `name` begins with `prefix` followed by a dot.
///
/// Requiring the dot keeps `A.Bx.c` out of the `A.B` group while the
/// stripped name still starts at the same offset for every member.
fn shares_prefix(name: &str, prefix: &str) -> bool {
    name.len() > prefix.len()
        && name.starts_with(prefix)
        && name.as_bytes()[prefix.len()] == b'.'
}
