//! Runtime configuration read from the environment.

use anyhow::{Context, Result};

/// Settings shared by every run.
///
/// Values come from environment variables (a `.env` file is loaded first by
/// the binary); command-line flags override them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollupConfig {
    /// Name of the storage container the trigger watches, e.g. `test-logs`.
    pub container: String,
    /// Number of segment logs expected per run.
    pub segment_count: usize,
    /// Minimum number of `segment_*.log` objects before aggregating.
    pub min_segments: usize,
    /// Object the report is written to.
    pub output_name: String,
    pub s3_bucket: Option<String>,
    pub local_dir: Option<String>,
}

impl Default for RollupConfig {
    fn default() -> Self {
        Self {
            container: "test-logs".to_string(),
            segment_count: 18,
            min_segments: 17,
            output_name: "total.log".to_string(),
            s3_bucket: None,
            local_dir: None,
        }
    }
}

impl RollupConfig {
    /// Loads the config from `ROLLUP_*` environment variables, falling back
    /// to [`RollupConfig::default`] for anything unset.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let parse_usize = |key: &str, default: usize| -> Result<usize> {
            match lookup(key) {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .with_context(|| format!("{key} must be a non-negative integer, got '{raw}'")),
                None => Ok(default),
            }
        };

        Ok(Self {
            container: lookup("ROLLUP_CONTAINER").unwrap_or(defaults.container),
            segment_count: parse_usize("ROLLUP_SEGMENT_COUNT", defaults.segment_count)?,
            min_segments: parse_usize("ROLLUP_MIN_SEGMENTS", defaults.min_segments)?,
            output_name: lookup("ROLLUP_OUTPUT_NAME").unwrap_or(defaults.output_name),
            s3_bucket: lookup("ROLLUP_S3_BUCKET").filter(|b| !b.is_empty()),
            local_dir: lookup("ROLLUP_LOCAL_DIR").filter(|d| !d.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = RollupConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, RollupConfig::default());
        assert_eq!(config.min_segments, 17);
        assert_eq!(config.segment_count, 18);
        assert_eq!(config.output_name, "total.log");
    }

    #[test]
    fn test_overrides() {
        let config = RollupConfig::from_lookup(lookup_from(&[
            ("ROLLUP_CONTAINER", "prod-logs"),
            ("ROLLUP_MIN_SEGMENTS", " 12 "),
            ("ROLLUP_S3_BUCKET", "my-bucket"),
            ("ROLLUP_LOCAL_DIR", ""),
        ]))
        .unwrap();

        assert_eq!(config.container, "prod-logs");
        assert_eq!(config.min_segments, 12);
        assert_eq!(config.s3_bucket.as_deref(), Some("my-bucket"));
        assert_eq!(config.local_dir, None);
    }

    #[test]
    fn test_invalid_number_is_rejected() {
        let result = RollupConfig::from_lookup(lookup_from(&[("ROLLUP_SEGMENT_COUNT", "lots")]));
        assert!(result.is_err());
    }
}
