use std::env;
use std::fmt;

use crate::workflows::listing::validation::{
    ValidationConfig, DEFAULT_MAX_IMAGES, DEFAULT_REVIEW_DESCRIPTION_MIN_CHARS,
    DEFAULT_TITLE_MIN_CHARS,
};

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub validation: ValidationConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("LISTING_ENV").unwrap_or_else(|_| "development".to_string()),
        );
        let log_level = env::var("LISTING_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let validation = ValidationConfig {
            title_min_chars: read_count("LISTING_TITLE_MIN_CHARS", DEFAULT_TITLE_MIN_CHARS, 1)?,
            review_description_min_chars: read_count(
                "LISTING_REVIEW_DESCRIPTION_MIN_CHARS",
                DEFAULT_REVIEW_DESCRIPTION_MIN_CHARS,
                1,
            )?,
            max_images: read_count("LISTING_MAX_IMAGES", DEFAULT_MAX_IMAGES, 1)?,
        };

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            validation,
        })
    }
}

fn read_count(var: &'static str, default: usize, min: usize) -> Result<usize, ConfigError> {
    let Ok(raw) = env::var(var) else {
        return Ok(default);
    };

    let value = raw
        .trim()
        .parse::<usize>()
        .map_err(|_| ConfigError::InvalidNumber {
            var,
            value: raw.clone(),
        })?;
    if value < min {
        return Err(ConfigError::OutOfRange { var, value, min });
    }
    Ok(value)
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    InvalidNumber { var: &'static str, value: String },
    OutOfRange {
        var: &'static str,
        value: usize,
        min: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidNumber { var, value } => {
                write!(f, "{var} must be a non-negative integer, got '{value}'")
            }
            ConfigError::OutOfRange { var, value, min } => {
                write!(f, "{var} must be at least {min}, got {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
