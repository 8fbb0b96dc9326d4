//! Row resolution configuration.
//!
//! Loaded from YAML or built in code:
//!
//! ```yaml
//! row_tag: tr
//! index_base: one_based
//! ```

use crate::result::{RowscopeError, RowscopeResult};
use crate::selector::ChildFilter;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;
use std::path::Path;

/// Default element kind a resolver enumerates
pub const DEFAULT_ROW_TAG: &str = "row";

/// How caller-supplied row indices map onto 1-based positional filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexBase {
    /// `index(0)` is the first row (position 1)
    #[default]
    ZeroBased,
    /// `index(1)` is the first row; `index(0)` is rejected
    OneBased,
}

impl IndexBase {
    /// Translate a caller index into a 1-based sibling position
    pub fn position(self, index: usize) -> RowscopeResult<NonZeroUsize> {
        let position = match self {
            Self::ZeroBased => index.checked_add(1),
            Self::OneBased => Some(index),
        };
        position
            .and_then(NonZeroUsize::new)
            .ok_or(RowscopeError::InvalidRowIndex { index, base: self })
    }

    /// Display name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ZeroBased => "zero-based",
            Self::OneBased => "one-based",
        }
    }
}

impl fmt::Display for IndexBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration shared by a resolver template and every resolver bound from it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowConfig {
    /// Element kind enumerated by `index`
    pub row_tag: String,
    /// Index convention for `index`
    pub index_base: IndexBase,
}

impl Default for RowConfig {
    fn default() -> Self {
        Self {
            row_tag: DEFAULT_ROW_TAG.to_string(),
            index_base: IndexBase::ZeroBased,
        }
    }
}

impl RowConfig {
    /// Create new config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the row tag
    #[must_use]
    pub fn with_row_tag(mut self, tag: impl Into<String>) -> Self {
        self.row_tag = tag.into();
        self
    }

    /// Set the index base
    #[must_use]
    pub const fn with_index_base(mut self, base: IndexBase) -> Self {
        self.index_base = base;
        self
    }

    /// Reject configurations that cannot produce a row filter. The row tag
    /// must be a single element name such as `tr` or `order-row`.
    pub fn validate(&self) -> RowscopeResult<()> {
        let tag = self.row_tag.as_str();
        if tag.is_empty() {
            return Err(RowscopeError::config("row_tag must not be empty"));
        }
        if !is_element_name(tag) {
            return Err(RowscopeError::config(format!(
                "row_tag must be a single element name, got {tag:?}"
            )));
        }
        Ok(())
    }

    /// Filter selecting the row at `index`
    pub fn row_filter(&self, index: usize) -> RowscopeResult<ChildFilter> {
        self.validate()?;
        let position = self.index_base.position(index)?;
        Ok(ChildFilter::nth_of_kind(self.row_tag.as_str(), position))
    }

    /// Filter selecting every row
    pub fn rows_filter(&self) -> RowscopeResult<ChildFilter> {
        self.validate()?;
        Ok(ChildFilter::kind(self.row_tag.as_str()))
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> RowscopeResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> RowscopeResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> RowscopeResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }
}

fn is_element_name(tag: &str) -> bool {
    let mut chars = tag.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    mod index_base_tests {
        use super::*;

        #[test]
        fn test_zero_based_first_row() {
            assert_eq!(IndexBase::ZeroBased.position(0).unwrap().get(), 1);
            assert_eq!(IndexBase::ZeroBased.position(9).unwrap().get(), 10);
        }

        #[test]
        fn test_zero_based_overflow_rejected() {
            let err = IndexBase::ZeroBased.position(usize::MAX).unwrap_err();
            assert!(matches!(
                err,
                RowscopeError::InvalidRowIndex {
                    index: usize::MAX,
                    base: IndexBase::ZeroBased
                }
            ));
        }

        #[test]
        fn test_one_based_passthrough() {
            assert_eq!(IndexBase::OneBased.position(1).unwrap().get(), 1);
            assert_eq!(IndexBase::OneBased.position(usize::MAX).unwrap().get(), usize::MAX);
        }

        #[test]
        fn test_one_based_zero_rejected() {
            assert!(IndexBase::OneBased.position(0).is_err());
        }

        #[test]
        fn test_default_is_zero_based() {
            assert_eq!(IndexBase::default(), IndexBase::ZeroBased);
            assert_eq!(IndexBase::ZeroBased.to_string(), "zero-based");
        }
    }

    mod row_config_tests {
        use super::*;
        use std::io::Write;

        #[test]
        fn test_defaults() {
            let config = RowConfig::default();
            assert_eq!(config.row_tag, "row");
            assert_eq!(config.index_base, IndexBase::ZeroBased);
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_builder() {
            let config = RowConfig::new()
                .with_row_tag("tr")
                .with_index_base(IndexBase::OneBased);
            assert_eq!(config.row_tag, "tr");
            assert_eq!(config.index_base, IndexBase::OneBased);
        }

        #[test]
        fn test_from_yaml() {
            let config = RowConfig::from_yaml_str("row_tag: tr\nindex_base: one_based\n").unwrap();
            assert_eq!(config.row_tag, "tr");
            assert_eq!(config.index_base, IndexBase::OneBased);
        }

        #[test]
        fn test_from_yaml_partial_uses_defaults() {
            let config = RowConfig::from_yaml_str("row_tag: li\n").unwrap();
            assert_eq!(config.row_tag, "li");
            assert_eq!(config.index_base, IndexBase::ZeroBased);
        }

        #[test]
        fn test_empty_tag_rejected() {
            let err = RowConfig::from_yaml_str("row_tag: ''\n").unwrap_err();
            assert!(matches!(err, RowscopeError::Config { .. }));
        }

        #[test]
        fn test_compound_tag_rejected() {
            let config = RowConfig::new().with_row_tag("tr td");
            assert!(config.validate().is_err());
        }

        #[test]
        fn test_non_element_tags_rejected() {
            for tag in [" tr", "tr ", "tr.selected", "tr,td", "tr>td", "tr:first-child", "1tr", "[x]"] {
                let config = RowConfig::new().with_row_tag(tag);
                assert!(
                    matches!(config.validate(), Err(RowscopeError::Config { .. })),
                    "{tag:?} should be rejected"
                );
            }
        }

        #[test]
        fn test_element_tags_accepted() {
            for tag in ["tr", "li", "order-row", "_row", "h2"] {
                assert!(RowConfig::new().with_row_tag(tag).validate().is_ok(), "{tag:?}");
            }
        }

        #[test]
        fn test_row_filter_validates() {
            let config = RowConfig::new().with_row_tag("tr");
            assert_eq!(config.row_filter(0).unwrap().to_css(), "tr:nth-of-type(1)");
            assert_eq!(config.rows_filter().unwrap().to_css(), "tr");

            let broken = RowConfig::new().with_row_tag("");
            assert!(matches!(broken.row_filter(0), Err(RowscopeError::Config { .. })));
            assert!(matches!(broken.rows_filter(), Err(RowscopeError::Config { .. })));
        }

        #[test]
        fn test_row_filter_rejects_bad_index_after_tag() {
            let config = RowConfig::new().with_index_base(IndexBase::OneBased);
            assert!(matches!(
                config.row_filter(0),
                Err(RowscopeError::InvalidRowIndex { .. })
            ));
        }

        #[test]
        fn test_unknown_base_is_yaml_error() {
            let err = RowConfig::from_yaml_str("index_base: two_based\n").unwrap_err();
            assert!(matches!(err, RowscopeError::Yaml(_)));
        }

        #[test]
        fn test_from_yaml_file() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(file, "row_tag: tr").unwrap();
            let config = RowConfig::from_yaml_file(file.path()).unwrap();
            assert_eq!(config.row_tag, "tr");
        }

        #[test]
        fn test_missing_file_is_io_error() {
            let err = RowConfig::from_yaml_file("/nonexistent/rowscope.yaml").unwrap_err();
            assert!(matches!(err, RowscopeError::Io(_)));
        }

        #[test]
        fn test_to_yaml_mentions_fields() {
            let yaml = RowConfig::new().with_row_tag("tr").to_yaml().unwrap();
            assert!(yaml.contains("row_tag: tr"));
            assert!(yaml.contains("index_base: zero_based"));
        }
    }
}
