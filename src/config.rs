//! Application configuration with layered loading.
//!
//! Configuration is assembled from four sources, lowest priority first:
//!
//! 1. Built-in defaults ([`ShadowlinkConfig::default`])
//! 2. System config file (`/etc/shadowlink/config.json`)
//! 3. User config file (`$XDG_CONFIG_HOME/shadowlink/config.json`, falling
//!    back to `$HOME/.config/shadowlink/config.json`)
//! 4. `SHADOWLINK_*` environment variables
//!
//! Each layer only overrides a field when its loaded value differs from the
//! freshly-constructed default. This keeps an unset field in a later layer
//! from masking an earlier, intentionally-set value — with the known
//! surprising edge that explicitly writing a default value into a later
//! layer cannot restore that default over an earlier override. That
//! behavior is deliberate and kept for compatibility.
//!
//! Unparseable environment values are ignored; a config file that exists
//! but does not parse is a hard error.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::output::OutputFormat;

const ENV_PREFIX: &str = "SHADOWLINK_";
const SYSTEM_CONFIG_PATH: &str = "/etc/shadowlink/config.json";

/// All tunable settings for the CLI and the cloaking core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowlinkConfig {
    /// Upper bound for keyword length.
    pub max_keyword_length: usize,
    /// How many times interactive prompts re-ask on invalid input.
    pub max_input_attempts: usize,
    /// Per-backend HTTP timeout in seconds.
    pub request_timeout_secs: u64,
    pub show_banner: bool,
    pub colored_output: bool,
    pub output_format: OutputFormat,
    /// When set, rendered output is written here instead of stdout.
    pub output_file: Option<PathBuf>,
    /// Shortening services to query, in registration order.
    pub enabled_services: Vec<String>,
    /// Default tracing filter; `RUST_LOG` and `--log-level` take priority.
    pub log_level: String,
}

impl Default for ShadowlinkConfig {
    fn default() -> Self {
        Self {
            max_keyword_length: 15,
            max_input_attempts: 3,
            request_timeout_secs: 10,
            show_banner: true,
            colored_output: true,
            output_format: OutputFormat::Console,
            output_file: None,
            enabled_services: vec![
                "tinyurl".to_string(),
                "dagd".to_string(),
                "clckru".to_string(),
                "osdb".to_string(),
            ],
            log_level: "info".to_string(),
        }
    }
}

impl ShadowlinkConfig {
    /// Reads one configuration layer from a JSON file.
    ///
    /// Missing fields fall back to defaults via `#[serde(default)]`.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or is not valid JSON.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        serde_json::from_str(&raw)
            .with_context(|| format!("Invalid JSON in config file {}", path.display()))
    }

    /// Reads one configuration layer from `SHADOWLINK_*` environment
    /// variables.
    ///
    /// Values that fail to parse are silently ignored, leaving the default
    /// in place.
    pub fn load_from_env() -> Self {
        let mut config = Self::default();

        if let Some(v) = env_parsed::<usize>("MAX_KEYWORD_LENGTH") {
            config.max_keyword_length = v;
        }
        if let Some(v) = env_parsed::<usize>("MAX_INPUT_ATTEMPTS") {
            config.max_input_attempts = v;
        }
        if let Some(v) = env_parsed::<u64>("REQUEST_TIMEOUT") {
            config.request_timeout_secs = v;
        }
        if let Some(v) = env_var("SHOW_BANNER").as_deref().and_then(parse_bool) {
            config.show_banner = v;
        }
        if let Some(v) = env_var("COLORED_OUTPUT").as_deref().and_then(parse_bool) {
            config.colored_output = v;
        }
        if let Some(v) = env_parsed::<OutputFormat>("OUTPUT_FORMAT") {
            config.output_format = v;
        }
        if let Some(v) = env_var("OUTPUT_FILE") {
            config.output_file = Some(PathBuf::from(v));
        }
        if let Some(v) = env_var("SERVICES") {
            let services: Vec<String> = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !services.is_empty() {
                config.enabled_services = services;
            }
        }
        if let Some(v) = env_var("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }

    /// Applies `layer` on top of `self`, field by field.
    ///
    /// A field is only taken from `layer` when its value differs from the
    /// built-in default, so an untouched field never clobbers an earlier
    /// override.
    pub fn overlay(&mut self, layer: Self) {
        let defaults = Self::default();

        if layer.max_keyword_length != defaults.max_keyword_length {
            self.max_keyword_length = layer.max_keyword_length;
        }
        if layer.max_input_attempts != defaults.max_input_attempts {
            self.max_input_attempts = layer.max_input_attempts;
        }
        if layer.request_timeout_secs != defaults.request_timeout_secs {
            self.request_timeout_secs = layer.request_timeout_secs;
        }
        if layer.show_banner != defaults.show_banner {
            self.show_banner = layer.show_banner;
        }
        if layer.colored_output != defaults.colored_output {
            self.colored_output = layer.colored_output;
        }
        if layer.output_format != defaults.output_format {
            self.output_format = layer.output_format;
        }
        if layer.output_file != defaults.output_file {
            self.output_file = layer.output_file;
        }
        if layer.enabled_services != defaults.enabled_services {
            self.enabled_services = layer.enabled_services;
        }
        if layer.log_level != defaults.log_level {
            self.log_level = layer.log_level;
        }
    }

    /// Checks that the assembled configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error naming the offending field and value.
    pub fn validate(&self) -> Result<()> {
        if self.max_keyword_length == 0 || self.max_keyword_length > 64 {
            anyhow::bail!(
                "max_keyword_length must be between 1 and 64, got {}",
                self.max_keyword_length
            );
        }

        if self.max_input_attempts == 0 {
            anyhow::bail!("max_input_attempts must be at least 1");
        }

        if self.request_timeout_secs == 0 || self.request_timeout_secs > 300 {
            anyhow::bail!(
                "request_timeout_secs must be between 1 and 300, got {}",
                self.request_timeout_secs
            );
        }

        if self.enabled_services.is_empty() {
            anyhow::bail!("enabled_services must name at least one shortening service");
        }

        for service in &self.enabled_services {
            if !crate::infrastructure::shorteners::KNOWN_SERVICES.contains(&service.as_str()) {
                anyhow::bail!(
                    "enabled_services contains unknown service '{}' (known: {})",
                    service,
                    crate::infrastructure::shorteners::KNOWN_SERVICES.join(", ")
                );
            }
        }

        Ok(())
    }

    /// Logs the effective configuration at startup.
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Services: {}", self.enabled_services.join(", "));
        tracing::info!("  Request timeout: {}s", self.request_timeout_secs);
        tracing::info!("  Output format: {}", self.output_format);
        if let Some(ref path) = self.output_file {
            tracing::info!("  Output file: {}", path.display());
        }
        tracing::info!("  Max keyword length: {}", self.max_keyword_length);
    }
}

/// The user-level config file location.
///
/// `$XDG_CONFIG_HOME/shadowlink/config.json` when `XDG_CONFIG_HOME` is set,
/// otherwise `$HOME/.config/shadowlink/config.json`. `None` when neither
/// variable is available.
pub fn user_config_path() -> Option<PathBuf> {
    let base = match env::var_os("XDG_CONFIG_HOME") {
        Some(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => PathBuf::from(env::var_os("HOME")?).join(".config"),
    };

    Some(base.join("shadowlink").join("config.json"))
}

/// Assembles the full configuration cascade and validates the result.
///
/// # Errors
///
/// Fails when an existing config file is malformed or the merged
/// configuration fails validation.
pub fn load_cascade() -> Result<ShadowlinkConfig> {
    let mut config = ShadowlinkConfig::default();

    let system_path = Path::new(SYSTEM_CONFIG_PATH);
    if system_path.exists() {
        config.overlay(ShadowlinkConfig::load_from_file(system_path)?);
    }

    if let Some(user_path) = user_config_path()
        && user_path.exists()
    {
        config.overlay(ShadowlinkConfig::load_from_file(&user_path)?);
    }

    config.overlay(ShadowlinkConfig::load_from_env());

    config.validate()?;
    Ok(config)
}

fn env_var(suffix: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}{suffix}")).ok()
}

fn env_parsed<T: std::str::FromStr>(suffix: &str) -> Option<T> {
    env_var(suffix).and_then(|v| v.parse().ok())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config_validates() {
        assert!(ShadowlinkConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = ShadowlinkConfig::default();

        config.max_keyword_length = 0;
        assert!(config.validate().is_err());
        config.max_keyword_length = 15;

        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());
        config.request_timeout_secs = 10;

        config.enabled_services.clear();
        assert!(config.validate().is_err());

        config.enabled_services = vec!["bitly".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overlay_takes_non_default_values() {
        let mut base = ShadowlinkConfig::default();
        base.request_timeout_secs = 30;

        let mut layer = ShadowlinkConfig::default();
        layer.max_keyword_length = 20;

        base.overlay(layer);

        assert_eq!(base.max_keyword_length, 20);
        // The layer's untouched timeout does not clobber the earlier override.
        assert_eq!(base.request_timeout_secs, 30);
    }

    #[test]
    fn test_overlay_default_value_cannot_restore_default() {
        // Known surprising edge: a later layer explicitly set to the default
        // value is indistinguishable from "unset" and does not override.
        let mut base = ShadowlinkConfig::default();
        base.show_banner = false;

        let layer = ShadowlinkConfig {
            show_banner: true, // same as default
            ..ShadowlinkConfig::default()
        };

        base.overlay(layer);
        assert!(!base.show_banner);
    }

    #[test]
    fn test_load_from_file_accepts_partial_config() {
        let path = std::env::temp_dir().join(format!(
            "shadowlink-config-test-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{ "request_timeout_secs": 25, "output_format": "json" }"#)
            .unwrap();

        let config = ShadowlinkConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.request_timeout_secs, 25);
        assert_eq!(config.output_format, OutputFormat::Json);
        // Unspecified fields keep their defaults.
        assert_eq!(config.max_keyword_length, 15);
    }

    #[test]
    fn test_load_from_file_rejects_malformed_json() {
        let path = std::env::temp_dir().join(format!(
            "shadowlink-config-bad-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, "{ not json").unwrap();

        let result = ShadowlinkConfig::load_from_file(&path);
        std::fs::remove_file(&path).ok();

        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_load_from_env_parses_known_variables() {
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::set_var("SHADOWLINK_MAX_KEYWORD_LENGTH", "20");
            env::set_var("SHADOWLINK_SHOW_BANNER", "no");
            env::set_var("SHADOWLINK_SERVICES", "dagd, tinyurl");
            env::set_var("SHADOWLINK_OUTPUT_FORMAT", "csv");
        }

        let config = ShadowlinkConfig::load_from_env();

        assert_eq!(config.max_keyword_length, 20);
        assert!(!config.show_banner);
        assert_eq!(config.enabled_services, vec!["dagd", "tinyurl"]);
        assert_eq!(config.output_format, OutputFormat::Csv);

        // Cleanup
        unsafe {
            env::remove_var("SHADOWLINK_MAX_KEYWORD_LENGTH");
            env::remove_var("SHADOWLINK_SHOW_BANNER");
            env::remove_var("SHADOWLINK_SERVICES");
            env::remove_var("SHADOWLINK_OUTPUT_FORMAT");
        }
    }

    #[test]
    #[serial]
    fn test_load_from_env_ignores_unparseable_values() {
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::set_var("SHADOWLINK_REQUEST_TIMEOUT", "soon");
            env::set_var("SHADOWLINK_COLORED_OUTPUT", "maybe");
        }

        let config = ShadowlinkConfig::load_from_env();

        assert_eq!(config.request_timeout_secs, 10);
        assert!(config.colored_output);

        // Cleanup
        unsafe {
            env::remove_var("SHADOWLINK_REQUEST_TIMEOUT");
            env::remove_var("SHADOWLINK_COLORED_OUTPUT");
        }
    }

    #[test]
    #[serial]
    fn test_user_config_path_honours_xdg() {
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::set_var("XDG_CONFIG_HOME", "/tmp/xdg");
        }

        let path = user_config_path().unwrap();
        assert_eq!(path, PathBuf::from("/tmp/xdg/shadowlink/config.json"));

        // Cleanup
        unsafe {
            env::remove_var("XDG_CONFIG_HOME");
        }
    }
}
