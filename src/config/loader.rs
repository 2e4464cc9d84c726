//! Configuration Loader
//!
//! Environment-aware configuration loading. Handles YAML file discovery,
//! environment detection and environment variable overrides.

use super::error::{ConfigResult, ConfigurationError};
use super::KontrakConfig;
use config::{Config, Environment, File, FileFormat, Map};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Prefix for structured overrides, e.g. `KONTRAK__DATABASE__URL`
const ENV_PREFIX: &str = "KONTRAK";
const ENV_SEPARATOR: &str = "__";

/// Loaded configuration together with the environment it was resolved for
#[derive(Debug)]
pub struct ConfigManager {
    config: KontrakConfig,
    environment: String,
    config_directory: PathBuf,
}

impl ConfigManager {
    /// Load configuration with environment auto-detection
    pub fn load() -> ConfigResult<Arc<ConfigManager>> {
        Self::load_from_directory(None)
    }

    /// Load configuration from a specific directory
    pub fn load_from_directory(config_dir: Option<PathBuf>) -> ConfigResult<Arc<ConfigManager>> {
        let environment = Self::detect_environment();
        Self::load_from_directory_with_env(config_dir, &environment)
    }

    /// Load configuration from a specific directory with explicit environment
    pub fn load_from_directory_with_env(
        config_dir: Option<PathBuf>,
        environment: &str,
    ) -> ConfigResult<Arc<ConfigManager>> {
        let variables: Map<String, String> = std::env::vars().collect();
        Self::load_with_variables(config_dir, environment, &variables)
    }

    /// Load configuration using an explicit set of environment variables
    ///
    /// Tests pass their own map here so the process environment never leaks in.
    pub fn load_with_variables(
        config_dir: Option<PathBuf>,
        environment: &str,
        variables: &Map<String, String>,
    ) -> ConfigResult<Arc<ConfigManager>> {
        let config_directory = config_dir.unwrap_or_else(Self::default_config_directory);

        debug!(
            "Loading configuration for environment '{}' from directory: {}",
            environment,
            config_directory.display()
        );

        let config = Self::load_and_merge_config(&config_directory, environment, variables)?;
        config.validate(environment)?;

        let sanitized_config = Self::sanitize_config_for_logging(&config);
        debug!(
            "Configuration loaded successfully: {}",
            serde_json::to_string_pretty(&sanitized_config)
                .unwrap_or_else(|_| "[serialization error]".to_string())
        );

        info!(
            environment = %environment,
            bind_address = %config.server.bind_address,
            pool_size = config.database.max_connections,
            rate_limiting = config.rate_limiting.enabled,
            "Configuration loaded"
        );

        Ok(Arc::new(ConfigManager {
            config,
            environment: environment.to_string(),
            config_directory,
        }))
    }

    /// Wrap an already constructed configuration
    pub fn from_config(config: KontrakConfig, environment: &str) -> Arc<ConfigManager> {
        Arc::new(ConfigManager {
            config,
            environment: environment.to_string(),
            config_directory: Self::default_config_directory(),
        })
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &KontrakConfig {
        &self.config
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn config_directory(&self) -> &Path {
        &self.config_directory
    }

    /// Configuration as JSON with sensitive fields masked
    pub fn debug_config(&self) -> serde_json::Value {
        Self::sanitize_config_for_logging(&self.config)
    }

    /// Detect the active environment name
    pub fn detect_environment() -> String {
        std::env::var("KONTRAK_ENV")
            .or_else(|_| std::env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string())
    }

    fn default_config_directory() -> PathBuf {
        std::env::var("KONTRAK_CONFIG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config"))
    }

    fn load_and_merge_config(
        config_directory: &Path,
        environment: &str,
        variables: &Map<String, String>,
    ) -> ConfigResult<KontrakConfig> {
        let base_path = config_directory.join("base.yaml");
        let environment_path = config_directory.join(format!("{environment}.yaml"));

        let mut builder = Config::builder()
            .add_source(
                File::from(base_path)
                    .format(FileFormat::Yaml)
                    .required(false),
            )
            .add_source(
                File::from(environment_path)
                    .format(FileFormat::Yaml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true)
                    .source(Some(variables.clone())),
            );

        for (key, value) in Self::conventional_overrides(variables)? {
            builder = builder
                .set_override(key, value)
                .map_err(|e| ConfigurationError::environment_override_error(key, e))?;
        }

        builder
            .build()
            .and_then(|merged| merged.try_deserialize::<KontrakConfig>())
            .map_err(|e| ConfigurationError::load_error(environment, e))
    }

    /// Map the conventional platform variables onto configuration keys
    fn conventional_overrides(
        variables: &Map<String, String>,
    ) -> ConfigResult<Vec<(&'static str, String)>> {
        let mut overrides = Vec::new();

        if let Some(url) = variables.get("DATABASE_URL") {
            overrides.push(("database.url", url.clone()));
        }
        if let Some(secret) = variables.get("JWT_SECRET") {
            overrides.push(("auth.jwt_secret", secret.clone()));
        }
        if let Some(frontend) = variables.get("FRONTEND_URL") {
            overrides.push(("frontend.url", frontend.clone()));
        }
        if let Some(port) = variables.get("PORT") {
            let port: u16 = port
                .parse()
                .map_err(|e| ConfigurationError::environment_override_error("PORT", e))?;
            overrides.push(("server.bind_address", format!("0.0.0.0:{port}")));
        }

        Ok(overrides)
    }

    /// Sanitize configuration for safe logging by masking sensitive fields
    fn sanitize_config_for_logging(config: &KontrakConfig) -> serde_json::Value {
        let mut config_json = serde_json::json!(config);
        let sensitive_patterns = ["password", "secret", "key", "token", "credential", "url"];
        Self::sanitize_json_recursive(&mut config_json, &sensitive_patterns);
        config_json
    }

    fn sanitize_json_recursive(value: &mut serde_json::Value, sensitive_patterns: &[&str]) {
        match value {
            serde_json::Value::Object(map) => {
                for (key, val) in map.iter_mut() {
                    let key_lower = key.to_lowercase();
                    let is_sensitive = sensitive_patterns
                        .iter()
                        .any(|pattern| key_lower.contains(pattern));

                    if is_sensitive {
                        if let serde_json::Value::String(s) = val {
                            *val = serde_json::Value::String(Self::mask(s));
                        } else if !val.is_object() {
                            *val = serde_json::Value::String("[MASKED]".to_string());
                        }
                    } else {
                        Self::sanitize_json_recursive(val, sensitive_patterns);
                    }
                }
            }
            serde_json::Value::Array(items) => {
                for item in items {
                    Self::sanitize_json_recursive(item, sensitive_patterns);
                }
            }
            _ => {}
        }
    }

    fn mask(value: &str) -> String {
        if value.is_empty() {
            return "[EMPTY]".to_string();
        }
        let chars: Vec<char> = value.chars().collect();
        if chars.len() > 4 {
            let head: String = chars[..2].iter().collect();
            let tail: String = chars[chars.len() - 2..].iter().collect();
            format!("[MASKED: {head}***{tail}]")
        } else {
            "[MASKED: ***]".to_string()
        }
    }
}
