use crate::core::phone::DEFAULT_COUNTRY_PREFIX;
use crate::core::repair::RepairOptions;
use crate::core::ConfigProvider;
use crate::utils::error::{NormalizerError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const SUPPORTED_OUTPUT_FORMATS: &[&str] = &["json", "csv"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub normalizer: NormalizerConfig,
    pub repair: RepairConfig,
    pub load: LoadConfig,
    pub photos: PhotosConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    pub default_country_prefix: String,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            default_country_prefix: DEFAULT_COUNTRY_PREFIX.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepairConfig {
    pub placeholder_sentinels: Option<Vec<String>>,
    pub min_recovered_username_len: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            output_path: "./output".to_string(),
            output_formats: vec!["json".to_string(), "csv".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhotosConfig {
    pub timeout_seconds: Option<u64>,
}

impl TomlConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(NormalizerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| NormalizerError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR}` references with environment values; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| NormalizerError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_country_prefix(
            "normalizer.default_country_prefix",
            &self.normalizer.default_country_prefix,
        )?;

        validation::validate_path("load.output_path", &self.load.output_path)?;

        if let Some(min_len) = self.repair.min_recovered_username_len {
            validation::validate_positive_number("repair.min_recovered_username_len", min_len, 1)?;
        }

        if let Some(sentinels) = &self.repair.placeholder_sentinels {
            for sentinel in sentinels {
                validation::validate_non_empty_string("repair.placeholder_sentinels", sentinel)?;
            }
        }

        if let Some(timeout) = self.photos.timeout_seconds {
            validation::validate_range("photos.timeout_seconds", timeout, 1, 120)?;
        }

        for format in &self.load.output_formats {
            if !SUPPORTED_OUTPUT_FORMATS.contains(&format.as_str()) {
                return Err(NormalizerError::InvalidConfigValueError {
                    field: "load.output_formats".to_string(),
                    value: format.clone(),
                    reason: format!(
                        "Unsupported format. Valid formats: {}",
                        SUPPORTED_OUTPUT_FORMATS.join(", ")
                    ),
                });
            }
        }

        Ok(())
    }

    pub fn photo_timeout(&self) -> Duration {
        Duration::from_secs(self.photos.timeout_seconds.unwrap_or(10))
    }
}

impl ConfigProvider for TomlConfig {
    fn default_country_prefix(&self) -> &str {
        &self.normalizer.default_country_prefix
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn repair_options(&self) -> RepairOptions {
        let defaults = RepairOptions::default();
        RepairOptions {
            placeholder_sentinels: self
                .repair
                .placeholder_sentinels
                .clone()
                .unwrap_or(defaults.placeholder_sentinels),
            min_recovered_username_len: self
                .repair
                .min_recovered_username_len
                .unwrap_or(defaults.min_recovered_username_len),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
