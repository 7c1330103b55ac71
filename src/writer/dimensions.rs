//! Best-effort resolution of the instance-id and group dimensions.
//!
//! Both lookups run once at writer start and are non-fatal: a failed
//! instance-identity fetch degrades to the local hostname, and a missing
//! group file simply leaves the dimension off every point.

use std::path::Path;

use tracing::{debug, warn};

/// Resolve the `InstanceId` dimension value.
///
/// Fetches `lookup_url` as plain text when configured; any failure falls
/// back to the local hostname. Returns an empty string only when the
/// hostname itself cannot be determined, in which case the dimension is
/// omitted.
pub async fn resolve_instance_id(client: &reqwest::Client, lookup_url: Option<&str>) -> String {
    if let Some(url) = lookup_url {
        match fetch_instance_id(client, url).await {
            Ok(id) if !id.is_empty() => {
                debug!(instance_id = %id, "resolved instance id from lookup URL");
                return id;
            },
            Ok(_) => {
                warn!(url = %url, "instance lookup returned an empty body, falling back to hostname");
            },
            Err(e) => {
                warn!(url = %url, error = %e, "instance lookup failed, falling back to hostname");
            },
        }
    }

    match hostname::get() {
        Ok(name) => name.to_string_lossy().into_owned(),
        Err(e) => {
            warn!(error = %e, "could not determine local hostname, omitting InstanceId");
            String::new()
        },
    }
}

async fn fetch_instance_id(client: &reqwest::Client, url: &str) -> reqwest::Result<String> {
    let body = client.get(url).send().await?.error_for_status()?.text().await?;
    Ok(body.trim().to_string())
}

/// Resolve the `AutoScalingGroupName` dimension value from a local file.
///
/// The file contents are trimmed; a missing or unreadable file leaves the
/// dimension absent.
pub async fn resolve_group_name(path: Option<&Path>) -> Option<String> {
    let path = path?;
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => {
            let trimmed = contents.trim();
            if trimmed.is_empty() {
                warn!(path = %path.display(), "group file is empty, omitting AutoScalingGroupName");
                None
            } else {
                Some(trimmed.to_string())
            }
        },
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read group file, omitting AutoScalingGroupName");
            None
        },
    }
}
