//! Reads the expected segment logs from storage.

use anyhow::Result;
use tracing::{debug, warn};

use crate::analyzers::types::ParsedLogSet;
use crate::parser::parse_segment;
use crate::storage::ObjectStore;

/// Canonical object name for a segment index, e.g. `segment_007.mp4.log`.
pub fn segment_file_name(index: usize) -> String {
    format!("segment_{index:03}.mp4.log")
}

/// Reads and parses segments `0..segment_count` in ascending order.
///
/// A missing or non-UTF-8 log is logged and left out of the result. Storage
/// failures are returned as errors.
#[tracing::instrument(skip(store))]
pub async fn fetch_segments(store: &dyn ObjectStore, segment_count: usize) -> Result<ParsedLogSet> {
    let mut logs = ParsedLogSet::new();

    for index in 0..segment_count {
        let name = segment_file_name(index);

        let Some(bytes) = store.read(&name).await? else {
            warn!(file = %name, "Log file not found");
            continue;
        };

        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(e) => {
                warn!(file = %name, error = %e, "Log file is not valid UTF-8");
                continue;
            }
        };

        let record = parse_segment(&content);
        debug!(file = %name, ?record, "Segment parsed");
        logs.insert(index, record);
    }

    Ok(logs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_file_name_is_zero_padded() {
        assert_eq!(segment_file_name(0), "segment_000.mp4.log");
        assert_eq!(segment_file_name(17), "segment_017.mp4.log");
        assert_eq!(segment_file_name(123), "segment_123.mp4.log");
    }
}
