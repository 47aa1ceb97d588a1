use crate::cleaning::TextCase;
use crate::error::{Result, ScrubError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default name of the configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "datascrub.toml";

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for a cleaning run
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub text_norm: ConfigValue<TextCase>,
    pub scale_numeric: ConfigValue<bool>,
    pub output: ConfigValue<PathBuf>,
    pub validity_column: ConfigValue<String>,
    pub longitude_column: ConfigValue<String>,
    pub latitude_column: ConfigValue<String>,
    pub strict: ConfigValue<bool>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            text_norm: ConfigValue::new(TextCase::None, ConfigSource::Default),
            scale_numeric: ConfigValue::new(false, ConfigSource::Default),
            output: ConfigValue::new(PathBuf::from("cleaned_data.csv"), ConfigSource::Default),
            validity_column: ConfigValue::new("geo_valid".to_string(), ConfigSource::Default),
            longitude_column: ConfigValue::new(
                "original_longitude".to_string(),
                ConfigSource::Default,
            ),
            latitude_column: ConfigValue::new(
                "original_latitude".to_string(),
                ConfigSource::Default,
            ),
            strict: ConfigValue::new(false, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ScrubError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| ScrubError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(text_norm) = file_config.text_norm {
            self.text_norm.update(text_norm, ConfigSource::File);
        }

        if let Some(scale_numeric) = file_config.scale_numeric {
            self.scale_numeric.update(scale_numeric, ConfigSource::File);
        }

        if let Some(output) = file_config.output {
            self.output.update(output, ConfigSource::File);
        }

        if let Some(geo) = file_config.geo {
            if let Some(name) = geo.validity_column {
                self.validity_column.update(name, ConfigSource::File);
            }
            if let Some(name) = geo.longitude_column {
                self.longitude_column.update(name, ConfigSource::File);
            }
            if let Some(name) = geo.latitude_column {
                self.latitude_column.update(name, ConfigSource::File);
            }
        }

        if let Some(strict) = file_config.strict {
            self.strict.update(strict, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from a TOML file if it exists
    pub fn load_from_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self> {
        if path.as_ref().exists() {
            self.load_from_file(path)
        } else {
            tracing::debug!("No config file at {}", path.as_ref().display());
            Ok(self)
        }
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // DATASCRUB_TEXT_NORM
        if let Ok(text_norm) = env::var("DATASCRUB_TEXT_NORM") {
            match text_norm.parse::<TextCase>() {
                Ok(case) => self.text_norm.update(case, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid DATASCRUB_TEXT_NORM value '{}': expected none, lower, upper, or title",
                    text_norm
                ),
            }
        }

        // DATASCRUB_SCALE_NUMERIC
        if let Ok(scale) = env::var("DATASCRUB_SCALE_NUMERIC") {
            match parse_flag("scale_numeric", &scale) {
                Ok(flag) => self.scale_numeric.update(flag, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid DATASCRUB_SCALE_NUMERIC value '{}': expected true or false",
                    scale
                ),
            }
        }

        // DATASCRUB_OUTPUT
        if let Ok(output) = env::var("DATASCRUB_OUTPUT") {
            self.output.update(PathBuf::from(output), ConfigSource::Environment);
        }

        // DATASCRUB_STRICT
        if let Ok(strict) = env::var("DATASCRUB_STRICT") {
            match parse_flag("strict", &strict) {
                Ok(flag) => self.strict.update(flag, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid DATASCRUB_STRICT value '{}': expected true or false",
                    strict
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(text_norm) = overrides.text_norm {
            self.text_norm.update(text_norm, ConfigSource::Cli);
        }

        if let Some(scale_numeric) = overrides.scale_numeric {
            self.scale_numeric.update(scale_numeric, ConfigSource::Cli);
        }

        if let Some(output) = overrides.output {
            self.output.update(output, ConfigSource::Cli);
        }

        if let Some(strict) = overrides.strict {
            self.strict.update(strict, ConfigSource::Cli);
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> BTreeMap<String, (String, ConfigSource)> {
        let mut map = BTreeMap::new();

        map.insert(
            "text_norm".to_string(),
            (self.text_norm.value.to_string(), self.text_norm.source),
        );
        map.insert(
            "scale_numeric".to_string(),
            (self.scale_numeric.value.to_string(), self.scale_numeric.source),
        );
        map.insert(
            "output".to_string(),
            (self.output.value.display().to_string(), self.output.source),
        );
        map.insert(
            "geo.validity_column".to_string(),
            (self.validity_column.value.clone(), self.validity_column.source),
        );
        map.insert(
            "geo.longitude_column".to_string(),
            (self.longitude_column.value.clone(), self.longitude_column.source),
        );
        map.insert(
            "geo.latitude_column".to_string(),
            (self.latitude_column.value.clone(), self.latitude_column.source),
        );
        map.insert("strict".to_string(), (self.strict.value.to_string(), self.strict.source));

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    text_norm: Option<TextCase>,
    scale_numeric: Option<bool>,
    output: Option<PathBuf>,
    strict: Option<bool>,
    geo: Option<GeoFileConfig>,
}

#[derive(Debug, Deserialize, Serialize)]
struct GeoFileConfig {
    validity_column: Option<String>,
    longitude_column: Option<String>,
    latitude_column: Option<String>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub text_norm: Option<TextCase>,
    pub scale_numeric: Option<bool>,
    pub output: Option<PathBuf>,
    pub strict: Option<bool>,
}

/// Parse a boolean flag from string
pub fn parse_flag(key: &str, s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ScrubError::ConfigInvalid {
            key: key.to_string(),
            reason: format!("Invalid flag value: {}. Use true or false", s),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = LayeredConfig::with_defaults();
        assert_eq!(config.text_norm.value, TextCase::None);
        assert_eq!(config.text_norm.source, ConfigSource::Default);
        assert!(!config.scale_numeric.value);
        assert_eq!(config.output.value, PathBuf::from("cleaned_data.csv"));
        assert_eq!(config.validity_column.value, "geo_valid");
    }

    #[test]
    fn test_config_precedence() {
        let mut value = ConfigValue::new(100, ConfigSource::Default);

        // File should override default
        value.update(200, ConfigSource::File);
        assert_eq!(value.value, 200);
        assert_eq!(value.source, ConfigSource::File);

        // Environment should override file
        value.update(300, ConfigSource::Environment);
        assert_eq!(value.value, 300);
        assert_eq!(value.source, ConfigSource::Environment);

        // CLI should override environment
        value.update(400, ConfigSource::Cli);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);

        // Lower precedence should not override
        value.update(500, ConfigSource::File);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
text_norm = "title"
scale_numeric = true
output = "out/clean.csv"

[geo]
validity_column = "inside_region"
"#
        )
        .unwrap();

        let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

        assert_eq!(config.text_norm.value, TextCase::Title);
        assert_eq!(config.text_norm.source, ConfigSource::File);
        assert!(config.scale_numeric.value);
        assert_eq!(config.output.value, PathBuf::from("out/clean.csv"));
        assert_eq!(config.validity_column.value, "inside_region");
        assert_eq!(config.longitude_column.source, ConfigSource::Default);
    }

    #[test]
    fn test_load_from_file_rejects_bad_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "text_norm = \"shouting\"").unwrap();

        let err = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, ScrubError::ConfigInvalid { key, .. } if key == "file"));
    }

    #[test]
    fn test_optional_file_missing_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = LayeredConfig::with_defaults()
            .load_from_optional_file(dir.path().join(CONFIG_FILE_NAME))
            .unwrap();
        assert_eq!(config.output.source, ConfigSource::Default);
    }

    #[test]
    #[serial]
    fn test_load_from_env() {
        env::set_var("DATASCRUB_TEXT_NORM", "upper");
        env::set_var("DATASCRUB_STRICT", "yes");
        env::set_var("DATASCRUB_SCALE_NUMERIC", "sometimes");

        let config = LayeredConfig::with_defaults().load_from_env();

        env::remove_var("DATASCRUB_TEXT_NORM");
        env::remove_var("DATASCRUB_STRICT");
        env::remove_var("DATASCRUB_SCALE_NUMERIC");

        assert_eq!(config.text_norm.value, TextCase::Upper);
        assert_eq!(config.text_norm.source, ConfigSource::Environment);
        assert!(config.strict.value);
        // Invalid values are ignored
        assert_eq!(config.scale_numeric.source, ConfigSource::Default);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = LayeredConfig::with_defaults();

        let overrides = CliConfigOverrides {
            text_norm: Some(TextCase::Lower),
            output: Some(PathBuf::from("result.csv")),
            ..Default::default()
        };

        config.update_from_cli(overrides);

        assert_eq!(config.text_norm.value, TextCase::Lower);
        assert_eq!(config.text_norm.source, ConfigSource::Cli);
        assert_eq!(config.output.value, PathBuf::from("result.csv"));
        assert_eq!(config.scale_numeric.source, ConfigSource::Default);
        assert_eq!(config.strict.source, ConfigSource::Default);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("strict", "TRUE").unwrap());
        assert!(!parse_flag("strict", "off").unwrap());
        assert!(parse_flag("strict", "maybe").is_err());
    }

    #[test]
    fn test_inspection_map() {
        let config = LayeredConfig::with_defaults();
        let map = config.to_inspection_map();

        assert!(map.contains_key("text_norm"));
        assert!(map.contains_key("geo.latitude_column"));

        let (output, source) = &map["output"];
        assert_eq!(output, "cleaned_data.csv");
        assert_eq!(*source, ConfigSource::Default);
    }
}
