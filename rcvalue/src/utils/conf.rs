use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::{
    text::GrowthPolicy,
    utils::error::{RcError, RcResult},
};

/// Heap configuration, loadable from TOML.
///
/// ```toml
/// growth = "amortized"
/// initial-text-capacity = 16
/// max-live-values = 1024
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct HeapConfig {
    /// Growth policy of every text buffer created by the heap.
    pub growth: GrowthPolicy,
    /// Storage reserved for a fresh text value. Clamped to at least one byte.
    pub initial_text_capacity: usize,
    /// Maximum number of simultaneously live values. Creating more fails with
    /// [`RcError::AllocationFailed`].
    pub max_live_values: Option<usize>,
}

impl Default for HeapConfig {
    fn default() -> Self {
        Self {
            growth: GrowthPolicy::ExactFit,
            initial_text_capacity: 1,
            max_live_values: None,
        }
    }
}

impl HeapConfig {
    pub fn from_toml_str(source: &str) -> RcResult<Self> {
        Self::parse(source, "<inline>")
    }

    pub fn from_path(path: impl AsRef<Path>) -> RcResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        Self::parse(&source, &path.display().to_string())
    }

    fn parse(source: &str, file: &str) -> RcResult<Self> {
        let mut config: HeapConfig =
            toml::from_str(source).map_err(|source| RcError::ConfigParse {
                source,
                file: file.to_string(),
            })?;
        config.initial_text_capacity = config.initial_text_capacity.max(1);
        debug!("Loaded heap configuration from {}: {:?}", file, config);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        assert_eq!(HeapConfig::from_toml_str("").unwrap(), HeapConfig::default());
    }

    #[test]
    fn parses_all_keys() {
        let config = HeapConfig::from_toml_str(
            r#"
            growth = "amortized"
            initial-text-capacity = 0
            max-live-values = 8
            "#,
        )
        .unwrap();
        assert_eq!(config.growth, GrowthPolicy::Amortized);
        assert_eq!(config.initial_text_capacity, 1);
        assert_eq!(config.max_live_values, Some(8));
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = HeapConfig::from_toml_str("grwoth = \"exact-fit\"").unwrap_err();
        assert!(matches!(err, RcError::ConfigParse { ref file, .. } if file == "<inline>"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = HeapConfig::from_path("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, RcError::Io(_)));
    }
}
