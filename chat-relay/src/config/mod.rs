pub mod prompt;

use crate::services::providers::gemini::{GeminiConfig, GEMINI_API_BASE};
use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Process-wide configuration, built once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub common: core_config::Config,
    pub gemini: GeminiSettings,
    pub cors: CorsSettings,
    pub telemetry: TelemetrySettings,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: Secret<String>,
    pub model: String,
    pub api_base: String,
    /// Overall HTTP timeout for model calls; `None` keeps the client default.
    pub request_timeout: Option<Duration>,
    /// Probe the credential against the provider before serving.
    pub verify_on_startup: bool,
}

#[derive(Debug, Clone)]
pub struct CorsSettings {
    /// Empty means any origin.
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct TelemetrySettings {
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
}

impl RelayConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        Self::from_lookup(common, |key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let is_prod = lookup("ENVIRONMENT").unwrap_or_else(|| "dev".to_string()) == "prod";
        let get = |key: &str, default: Option<&str>| get_var(&lookup, key, default, is_prod);

        let api_key = get("GEMINI_API_KEY", None)?;
        if api_key.trim().is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "GEMINI_API_KEY is set but empty"
            )));
        }

        let request_timeout = match lookup("GEMINI_REQUEST_TIMEOUT_SECS") {
            Some(raw) => Some(Duration::from_secs(raw.trim().parse().map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!(
                    "GEMINI_REQUEST_TIMEOUT_SECS must be a whole number of seconds: {}",
                    e
                ))
            })?)),
            None => None,
        };

        let verify_on_startup = parse_bool(
            "GEMINI_VERIFY_ON_STARTUP",
            &get("GEMINI_VERIFY_ON_STARTUP", Some("true"))?,
        )?;

        let allowed_origins = get("CORS_ALLOWED_ORIGINS", Some("*"))?
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty() && *origin != "*")
            .map(str::to_string)
            .collect();

        Ok(RelayConfig {
            common,
            gemini: GeminiSettings {
                api_key: Secret::new(api_key),
                model: get("GEMINI_MODEL", Some(DEFAULT_MODEL))?,
                api_base: get("GEMINI_API_BASE", Some(GEMINI_API_BASE))?,
                request_timeout,
                verify_on_startup,
            },
            cors: CorsSettings { allowed_origins },
            telemetry: TelemetrySettings {
                log_level: lookup("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
                otlp_endpoint: lookup("OTLP_ENDPOINT").filter(|e| !e.trim().is_empty()),
            },
        })
    }

    /// Provider configuration with the fixed healthcare instruction.
    pub fn gemini_config(&self) -> GeminiConfig {
        GeminiConfig {
            api_key: self.gemini.api_key.clone(),
            model: self.gemini.model.clone(),
            api_base: self.gemini.api_base.clone(),
            system_instruction: prompt::HEALTHCARE_SYSTEM_PROMPT.to_string(),
            request_timeout: self.gemini.request_timeout,
        }
    }
}

fn get_var<F>(lookup: &F, key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(val) => Ok(val),
        None => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(AppError::ConfigError(anyhow::anyhow!(
            "{} must be a boolean, got '{}'",
            key,
            other
        ))),
    }
}
