//! Policy constants for the contract passes

use serde::Deserialize;

/// A typography signature that identifies a semantic text element
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TypographyFingerprint {
    /// Font family class; any family matches when absent
    #[serde(default)]
    pub family: Option<String>,
    pub size: String,
    pub weight: String,
    pub leading: String,
    pub tag: String,
}

impl TypographyFingerprint {
    pub fn new(size: &str, weight: &str, leading: &str, tag: &str) -> Self {
        Self {
            family: None,
            size: size.to_string(),
            weight: weight.to_string(),
            leading: leading.to_string(),
            tag: tag.to_string(),
        }
    }

    pub fn with_family(mut self, family: &str) -> Self {
        self.family = Some(family.to_string());
        self
    }
}

/// Configuration options for the contract passes
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Fingerprints tried in order; the first match wins
    pub typography: Vec<TypographyFingerprint>,

    /// Breakpoint that restores full section padding
    pub padding_breakpoint: String,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            typography: vec![
                TypographyFingerprint::new("text-[32px]", "font-bold", "leading-[40px]", "h2"),
                TypographyFingerprint::new("text-[16px]", "font-normal", "leading-[24px]", "p"),
            ],
            padding_breakpoint: "md".to_string(),
        }
    }
}

impl ContractConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the typography fingerprints
    pub fn with_typography(mut self, typography: Vec<TypographyFingerprint>) -> Self {
        self.typography = typography;
        self
    }

    pub fn with_padding_breakpoint(mut self, breakpoint: impl Into<String>) -> Self {
        self.padding_breakpoint = breakpoint.into();
        self
    }
}
