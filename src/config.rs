use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Application configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub openapi: OpenApiConfig,
}

/// OpenAPI-related behavior. `supported_majors` lists accepted major
/// versions (e.g. 3 -> 3.x).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpenApiConfig {
    #[serde(default = "default_supported_majors")]
    pub supported_majors: Vec<i64>,
}

fn default_supported_majors() -> Vec<i64> {
    vec![3]
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            openapi: OpenApiConfig::default(),
        }
    }
}

impl Default for OpenApiConfig {
    fn default() -> Self {
        Self {
            supported_majors: default_supported_majors(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid config: field {field:?} {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl AppConfig {
    /// Returns the effective configuration: the given YAML file when present,
    /// the built-in default otherwise. An unusable policy list fails here,
    /// before any service is built.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut cfg = match path {
            Some(p) => serde_yaml::from_str(&std::fs::read_to_string(p)?)?,
            None => Self::default(),
        };
        cfg.validate()?;
        cfg.openapi.supported_majors.sort_unstable();
        cfg.openapi.supported_majors.dedup();
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let majors = &self.openapi.supported_majors;
        if majors.iter().any(|&m| m <= 0) {
            return Err(ConfigError::Invalid {
                field: "openapi.supported_majors",
                reason: "must contain only positive integers (e.g., 3 for 3.x)",
            });
        }
        if majors.is_empty() {
            return Err(ConfigError::Invalid {
                field: "openapi.supported_majors",
                reason: "must not be empty",
            });
        }
        Ok(())
    }
}
