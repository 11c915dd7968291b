//! Layered application configuration.
//!
//! Precedence, lowest first: built-in defaults, the YAML file (if given),
//! then `FLAGS__*` environment variables with `__` as the nesting
//! separator, e.g. `FLAGS__FEATURE_FLAGS__LOCK_WAIT=5s`.

use std::path::Path;

use anyhow::{Context, Result};
use feature_flags::FeatureFlagsConfig;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use static_flags_plugin::{GuildFlagsConfig, StaticFlagsPluginConfig};

pub const ENV_PREFIX: &str = "FLAGS__";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub feature_flags: FeatureFlagsConfig,
    pub store: StoreConfig,
    /// Static flag provider plugins, loaded in this order.
    pub plugins: Vec<StaticFlagsPluginConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

/// In-memory store settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Flags written to the store before any command runs.
    pub seed: Vec<GuildFlagsConfig>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Loads the layered configuration.
    ///
    /// # Errors
    /// Returns an error if the file is unreadable or any layer fails to
    /// deserialize into the expected shape.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::figment(path)
            .extract()
            .context("Failed to load configuration")
    }

    fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file_exact(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Renders the effective configuration as YAML.
    ///
    /// # Errors
    /// Returns an error if YAML serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize configuration to YAML")
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    fn write_yaml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_without_file() {
        let cfg: AppConfig = Figment::new()
            .merge(Serialized::defaults(AppConfig::default()))
            .extract()
            .unwrap();
        assert_eq!(cfg.logging.level, "info");
        assert!(!cfg.logging.json);
        assert_eq!(cfg.feature_flags.lock_wait, Duration::from_secs(60));
        assert!(cfg.plugins.is_empty());
        assert!(cfg.store.seed.is_empty());
    }

    #[test]
    fn file_overrides_defaults() {
        let file = write_yaml(
            r"
logging:
  level: debug
feature_flags:
  lock_wait: 5s
  invalidate_cache_after_reconcile: false
store:
  seed:
    - id: 42
      active: [legacy]
plugins:
  - sys_name: music
    flags: [music_premium]
    guilds:
      - id: 42
        active: [music_premium]
",
        );

        let cfg: AppConfig = Figment::new()
            .merge(Serialized::defaults(AppConfig::default()))
            .merge(Yaml::file_exact(file.path()))
            .extract()
            .unwrap();

        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.feature_flags.lock_wait, Duration::from_secs(5));
        assert_eq!(cfg.feature_flags.lock_ttl, Duration::from_secs(60));
        assert!(!cfg.feature_flags.invalidate_cache_after_reconcile);
        assert_eq!(cfg.plugins.len(), 1);
        assert_eq!(cfg.plugins[0].guilds[0].id, 42);
        assert_eq!(cfg.store.seed[0].active, vec!["legacy"]);
    }

    #[test]
    fn env_overrides_file() {
        let file = write_yaml("logging:\n  level: debug\n");
        figment::Jail::expect_with(|jail| {
            jail.set_env("FLAGS__LOGGING__LEVEL", "warn");
            jail.set_env("FLAGS__FEATURE_FLAGS__LOCK_TTL", "2m");

            let cfg = AppConfig::load(Some(file.path())).map_err(|e| e.to_string())?;
            assert_eq!(cfg.logging.level, "warn");
            assert_eq!(cfg.feature_flags.lock_ttl, Duration::from_secs(120));
            Ok(())
        });
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = AppConfig::load(Some(Path::new("/nonexistent/flags.yaml")));
        assert!(result.is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let file = write_yaml("feature_flag: {}\n");
        let result: Result<AppConfig, _> = Figment::new()
            .merge(Serialized::defaults(AppConfig::default()))
            .merge(Yaml::file_exact(file.path()))
            .extract();
        assert!(result.is_err());
    }

    #[test]
    fn yaml_dump_parses_back() {
        let cfg = AppConfig::default();
        let yaml = cfg.to_yaml().unwrap();
        let parsed: AppConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(parsed.feature_flags.lock_wait, cfg.feature_flags.lock_wait);
        assert_eq!(parsed.logging.level, cfg.logging.level);
    }
}
