//! Configuration for a survey processing unit

use crate::error::SurveyError;
use serde::{Deserialize, Serialize};

/// Default palette used to color persons on review maps
pub const DEFAULT_PERSON_COLORS: [&str; 15] = [
    "#FFAE70", "#FFBCF2", "#F2ED6A", "#90E04A", "#61CAD8", "#9F70FF", "#FF6868", "#63A021", "#21A09E",
    "#4146B5", "#9F41B5", "#B5417B", "#B5B5B5", "#B59900", "#9E5135",
];

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

/// Survey object configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyConfig {
    /// Palette cycled through by person color assignment
    pub person_colors: Vec<String>,
    /// Logging setup
    pub logging: LoggingConfig,
}

impl SurveyConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from TOML, missing keys take defaults
    ///
    /// # Errors
    /// Returns [`SurveyError::ConfigParse`] on malformed TOML.
    pub fn from_toml_str(text: &str) -> Result<Self, SurveyError> {
        Ok(toml::from_str(text)?)
    }

    /// Render configuration as TOML
    ///
    /// # Errors
    /// Returns [`SurveyError::ConfigWrite`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, SurveyError> {
        Ok(toml::to_string(self)?)
    }

    /// With logging configuration
    #[inline]
    #[must_use]
    pub fn with_logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = logging;
        self
    }

    /// With person color palette
    #[inline]
    #[must_use]
    pub fn with_person_colors(mut self, colors: Vec<String>) -> Self {
        self.person_colors = colors;
        self
    }

    /// Color for the person at `index`, cycling through the palette
    #[must_use]
    pub fn person_color(&self, index: usize) -> Option<&str> {
        if self.person_colors.is_empty() {
            return None;
        }
        self.person_colors
            .get(index % self.person_colors.len())
            .map(String::as_str)
    }
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            person_colors: DEFAULT_PERSON_COLORS.iter().map(|color| (*color).to_string()).collect(),
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = SurveyConfig::new();
        assert_eq!(config.person_colors.len(), 15);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn config_from_partial_toml() {
        let config = SurveyConfig::from_toml_str(
            r##"
            person_colors = ["#000000", "#FFFFFF"]

            [logging]
            json = true
            "##,
        );
        let config = match config {
            Ok(config) => config,
            Err(error) => panic!("config should parse: {error}"),
        };
        assert_eq!(config.person_colors, vec!["#000000", "#FFFFFF"]);
        assert!(config.logging.json);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn config_rejects_bad_toml() {
        assert!(matches!(
            SurveyConfig::from_toml_str("person_colors = 3"),
            Err(SurveyError::ConfigParse(_))
        ));
    }

    #[test]
    fn person_color_cycles() {
        let config = SurveyConfig::new().with_person_colors(vec!["a".into(), "b".into()]);
        assert_eq!(config.person_color(0), Some("a"));
        assert_eq!(config.person_color(3), Some("b"));
        assert_eq!(SurveyConfig::new().with_person_colors(Vec::new()).person_color(0), None);
    }

    #[test]
    fn config_toml_round_trip() {
        let config = SurveyConfig::new().with_person_colors(vec!["#123456".into()]);
        let text = config.to_toml_string().unwrap_or_default();
        assert_eq!(SurveyConfig::from_toml_str(&text).ok(), Some(config));
    }
}
