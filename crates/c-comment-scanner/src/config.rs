use serde::{Deserialize, Serialize};

/// Upper bound accepted for [`ScannerConfig::max_blank_lines`]
pub const MAX_BLANK_LINE_TOLERANCE: usize = 64;

/// Configuration for comment extraction and binding policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Blank lines allowed between a comment and the declaration it documents
    pub max_blank_lines: usize,

    /// Merge `//` comments on adjacent lines into one logical comment
    pub merge_line_comments: bool,

    /// Bind a comment that follows code on the same line to that line's declaration
    pub bind_trailing_comments: bool,

    /// Only emit doc comments (`/** */` and `///`)
    pub doc_comments_only: bool,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            max_blank_lines: 1,
            merge_line_comments: true,
            bind_trailing_comments: true,
            doc_comments_only: false,
        }
    }
}

impl ScannerConfig {
    /// Only comments directly touching their declaration are bound
    pub fn strict() -> Self {
        Self {
            max_blank_lines: 0,
            bind_trailing_comments: false,
            ..Default::default()
        }
    }

    /// gtk-doc style sources: only `/**` blocks matter
    pub fn gtk_doc() -> Self {
        Self {
            doc_comments_only: true,
            bind_trailing_comments: false,
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_blank_lines > MAX_BLANK_LINE_TOLERANCE {
            return Err(format!(
                "max_blank_lines ({}) cannot exceed {}",
                self.max_blank_lines, MAX_BLANK_LINE_TOLERANCE
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = ScannerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_blank_lines, 1);
        assert!(config.merge_line_comments);
    }

    #[test]
    fn test_preset_configs_valid() {
        assert!(ScannerConfig::strict().validate().is_ok());
        assert!(ScannerConfig::gtk_doc().validate().is_ok());
        assert_eq!(ScannerConfig::strict().max_blank_lines, 0);
        assert!(ScannerConfig::gtk_doc().doc_comments_only);
    }

    #[test]
    fn test_config_validation() {
        let mut config = ScannerConfig {
            max_blank_lines: MAX_BLANK_LINE_TOLERANCE + 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.max_blank_lines = MAX_BLANK_LINE_TOLERANCE;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: ScannerConfig =
            serde_json::from_str(r#"{ "max_blank_lines": 3 }"#).unwrap();
        assert_eq!(config.max_blank_lines, 3);
        assert!(config.merge_line_comments);
        assert!(config.bind_trailing_comments);
        assert!(!config.doc_comments_only);
    }
}
