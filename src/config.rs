//! Pipeline configuration loaded from TOML
//!
//! Every section and key is optional:
//!
//! ```toml
//! [inference]
//! grid_ratio_small = 1.10
//! pretty_print = false
//!
//! [[contracts.typography]]
//! size = "text-[32px]"
//! weight = "font-bold"
//! leading = "leading-[40px]"
//! tag = "h2"
//!
//! [responsive]
//! merge_overlap = 0.90
//!
//! [fonts]
//! "Inter" = "font-inter"
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::contracts::ContractConfig;
use crate::design::FontMap;
use crate::inference::InferenceConfig;
use crate::responsive::ReconcileConfig;

/// Errors that can occur when loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Policy for every stage of the pipeline
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub inference: InferenceConfig,
    pub contracts: ContractConfig,
    pub responsive: ReconcileConfig,
    /// Font family name to utility class
    pub fonts: FontMap,
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(content.as_str())
    }

    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn with_inference(mut self, config: InferenceConfig) -> Self {
        self.inference = config;
        self
    }

    pub fn with_contracts(mut self, config: ContractConfig) -> Self {
        self.contracts = config;
        self
    }

    pub fn with_responsive(mut self, config: ReconcileConfig) -> Self {
        self.responsive = config;
        self
    }

    pub fn with_fonts(mut self, fonts: FontMap) -> Self {
        self.fonts = fonts;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(PipelineConfig::from_str("").unwrap(), PipelineConfig::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = PipelineConfig::from_str(
            r#"
            [inference]
            pretty_print = false
            grid_ratio_small = 1.05

            [responsive]
            merge_order = 0.8

            [fonts]
            "Inter" = "font-inter"
            "#,
        )
        .unwrap();
        assert!(!config.inference.pretty_print);
        assert_eq!(config.inference.grid_ratio_small, 1.05);
        assert_eq!(config.inference.grid_ratio_large, 1.20);
        assert_eq!(config.responsive.merge_order, 0.8);
        assert_eq!(config.responsive.swap_overlap, 0.75);
        assert_eq!(config.fonts.class_for("inter"), Some("font-inter"));
        assert_eq!(config.contracts, ContractConfig::default());
    }

    #[test]
    fn test_invalid_toml_error() {
        let err = PipelineConfig::from_str("this is not valid toml {{{{").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = PipelineConfig::from_file(Path::new("/nonexistent/frame2html.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_builder_pattern() {
        let config = PipelineConfig::new()
            .with_fonts(FontMap::new().with_family("Inter", "font-inter"))
            .with_responsive(ReconcileConfig::new().with_merge_order(0.5));
        assert_eq!(config.responsive.merge_order, 0.5);
        assert!(!config.fonts.is_empty());
    }
}
