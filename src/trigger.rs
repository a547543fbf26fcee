//! Trigger events that start an aggregation run.

use anyhow::{Context, Result};
use serde::Deserialize;

/// A newly created object in the watched container.
///
/// Only used to decide whether to start a run; the object itself is not read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerEvent {
    /// Full path as reported by storage, e.g. `test-logs/segment_003.mp4.log`.
    pub path: String,
    /// The `{name}` part of `<container>/{name}.log`.
    pub name: String,
    pub length: u64,
}

impl TriggerEvent {
    /// Matches `path` against `<container>/{name}.log`.
    ///
    /// Returns `None` for objects outside the container, objects in nested
    /// folders, and anything not ending in `.log`.
    pub fn from_path(container: &str, path: &str, length: u64) -> Option<Self> {
        let rest = path.strip_prefix(container)?.strip_prefix('/')?;
        let name = rest.strip_suffix(".log")?;
        if name.is_empty() || name.contains('/') {
            return None;
        }

        Some(Self {
            path: path.to_string(),
            name: name.to_string(),
            length,
        })
    }
}

#[derive(Debug, Deserialize)]
struct Notification {
    #[serde(rename = "Records", default)]
    records: Vec<NotificationRecord>,
}

#[derive(Debug, Deserialize)]
struct NotificationRecord {
    s3: S3Entity,
}

#[derive(Debug, Deserialize)]
struct S3Entity {
    object: S3Object,
}

#[derive(Debug, Deserialize)]
struct S3Object {
    key: String,
    #[serde(default)]
    size: u64,
}

/// Extracts trigger events from an S3 event notification document.
///
/// Records whose key is outside `<container>/*.log` are dropped.
pub fn events_from_notification(container: &str, json: &str) -> Result<Vec<TriggerEvent>> {
    let notification: Notification =
        serde_json::from_str(json).context("invalid S3 event notification")?;

    Ok(notification
        .records
        .into_iter()
        .filter_map(|r| TriggerEvent::from_path(container, &r.s3.object.key, r.s3.object.size))
        .collect())
}
