//! Policy constants for layout inference

use regex::Regex;
use serde::Deserialize;

use super::error::InferenceError;

/// Configuration options for the inference engine
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Max/min width ratio for a 2-3 child grid
    pub grid_ratio_small: f64,

    /// Max/min width ratio for a grid of 4 or more children
    pub grid_ratio_large: f64,

    /// Share of CTA-like children that rules out a grid
    pub cta_grid_block_ratio: f64,

    /// Share of text-dominant children that makes a textual group
    pub textual_group_ratio: f64,

    /// Coverage (per axis) at which a media sibling counts as a background
    pub background_cover_ratio: f64,

    /// Host for deterministic image placeholders
    pub placeholder_host: String,

    /// Sibling names treated as decorative backgrounds
    pub background_name_pattern: String,

    /// Parent names implying a raw background image
    pub background_parent_pattern: String,

    /// Name hint for links
    pub link_name_pattern: String,

    /// Name hint for buttons
    pub button_name_pattern: String,

    /// Name hint for an explicit column count
    pub column_hint_pattern: String,

    /// Name hint for a heading level
    pub heading_name_pattern: String,

    /// Most text descendants a name-hinted control may have
    pub max_control_texts: usize,

    /// Indent nested elements
    pub pretty_print: bool,

    /// Emit `data-name` debug attributes
    pub debug_attributes: bool,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            grid_ratio_small: 1.10,
            grid_ratio_large: 1.20,
            cta_grid_block_ratio: 0.5,
            textual_group_ratio: 0.6,
            background_cover_ratio: 0.75,
            placeholder_host: "https://placehold.co".to_string(),
            background_name_pattern: r"(?i)(^|[^a-z])(bg|background|overlay|gradient)([^a-z]|$)"
                .to_string(),
            background_parent_pattern: r"(?i)(bg|background)[ _-]?(img|image|photo)".to_string(),
            link_name_pattern: r"(?i)\blink\b".to_string(),
            button_name_pattern: r"(?i)\b(button|btn|cta)\b".to_string(),
            column_hint_pattern: r"(?i)(?:\b([2-9])[ _-]?col(?:umn)?s?\b|\bcols?[ _-]?([2-9])\b|\bgrid[ _-]?([2-9])\b)"
                .to_string(),
            heading_name_pattern: r"(?i)\b(?:h|heading)[ _-]?([1-6])\b".to_string(),
            max_control_texts: 2,
            pretty_print: true,
            debug_attributes: false,
        }
    }
}

impl InferenceConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set both grid width-ratio thresholds
    pub fn with_grid_ratios(mut self, small: f64, large: f64) -> Self {
        self.grid_ratio_small = small;
        self.grid_ratio_large = large;
        self
    }

    /// Set the placeholder image host
    pub fn with_placeholder_host(mut self, host: impl Into<String>) -> Self {
        self.placeholder_host = host.into();
        self
    }

    /// Set whether nested elements are indented
    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    /// Set whether `data-name` debug attributes are emitted
    pub fn with_debug_attributes(mut self, debug: bool) -> Self {
        self.debug_attributes = debug;
        self
    }

    /// Compile the name patterns
    pub fn heuristics(&self) -> Result<Heuristics, InferenceError> {
        Ok(Heuristics {
            background_name: compile("background name", &self.background_name_pattern)?,
            background_parent: compile("background parent", &self.background_parent_pattern)?,
            link_name: compile("link name", &self.link_name_pattern)?,
            button_name: compile("button name", &self.button_name_pattern)?,
            column_hint: compile("column hint", &self.column_hint_pattern)?,
            heading_name: compile("heading name", &self.heading_name_pattern)?,
        })
    }
}

fn compile(name: &'static str, pattern: &str) -> Result<Regex, InferenceError> {
    Regex::new(pattern).map_err(|source| InferenceError::InvalidPattern { name, source })
}

/// Name patterns compiled once per engine
#[derive(Debug, Clone)]
pub struct Heuristics {
    pub background_name: Regex,
    pub background_parent: Regex,
    pub link_name: Regex,
    pub button_name: Regex,
    pub column_hint: Regex,
    pub heading_name: Regex,
}

impl Heuristics {
    /// Background, overlay, or gradient name, including camelCase names
    /// such as `heroBackground`
    pub fn is_background_name(&self, name: &str) -> bool {
        self.background_name.is_match(&split_camel_case(name))
    }
}

/// Insert a space at camelCase and acronym boundaries:
/// `GradientOverlay` -> `Gradient Overlay`, `BGImage` -> `BG Image`
pub fn split_camel_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() {
            let prev = chars[i - 1];
            let starts_word = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && starts_word) {
                out.push(' ');
            }
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let config = InferenceConfig::default();
        assert_eq!(config.grid_ratio_small, 1.10);
        assert_eq!(config.grid_ratio_large, 1.20);
        assert_eq!(config.cta_grid_block_ratio, 0.5);
        assert_eq!(config.textual_group_ratio, 0.6);
        assert_eq!(config.background_cover_ratio, 0.75);
    }

    #[test]
    fn test_builder_pattern() {
        let config = InferenceConfig::new()
            .with_pretty_print(false)
            .with_placeholder_host("https://img.example");
        assert!(!config.pretty_print);
        assert_eq!(config.placeholder_host, "https://img.example");
    }

    #[test]
    fn test_default_patterns_compile() {
        let heuristics = InferenceConfig::default().heuristics().unwrap();
        assert!(heuristics.background_name.is_match("Hero BG"));
        assert!(heuristics.background_name.is_match("overlay"));
        assert!(!heuristics.background_name.is_match("Bgood"));
        assert!(heuristics.button_name.is_match("CTA Button"));
        assert!(heuristics.link_name.is_match("Footer link"));
        assert!(heuristics.heading_name.is_match("Title H2"));
        assert!(heuristics.background_parent.is_match("bg-image"));
    }

    #[test]
    fn test_camel_case_background_names() {
        let heuristics = InferenceConfig::default().heuristics().unwrap();
        for name in ["heroBackground", "GradientOverlay", "bgImage", "BGImage", "Hero BG"] {
            assert!(heuristics.is_background_name(name), "{name}");
        }
        for name in ["Bgood", "Subgroup", "Card"] {
            assert!(!heuristics.is_background_name(name), "{name}");
        }
    }

    #[test]
    fn test_split_camel_case() {
        assert_eq!(split_camel_case("heroBackground"), "hero Background");
        assert_eq!(split_camel_case("BGImage"), "BG Image");
        assert_eq!(split_camel_case("Hero BG"), "Hero BG");
        assert_eq!(split_camel_case("card2Overlay"), "card2 Overlay");
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let mut config = InferenceConfig::default();
        config.button_name_pattern = "(".to_string();
        let err = config.heuristics().unwrap_err();
        assert!(matches!(err, InferenceError::InvalidPattern { name: "button name", .. }));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: InferenceConfig = toml::from_str("grid_ratio_small = 1.05").unwrap();
        assert_eq!(config.grid_ratio_small, 1.05);
        assert_eq!(config.grid_ratio_large, 1.20);
    }
}
