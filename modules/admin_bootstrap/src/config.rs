//! Configuration for the admin bootstrap
//!
//! Values are layered with figment: serde defaults, an optional YAML file,
//! the conventional `DB_*` environment variables and finally
//! `SHOP_ADMIN_*` variables with `__` as the nesting separator.
//!
//! Figment's `Env` provider parses values, which turns `DB_PASS=00123` into
//! the number 123. String-typed keys are therefore read from the environment
//! verbatim and layered with `Serialized` providers instead.

use crate::contract::{BootstrapError, ConnectionTarget, DatabaseDriver, ResolvedConfig, SiteUrls};
use chrono_tz::Tz;
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Prefix for structured environment overrides
pub const ENV_PREFIX: &str = "SHOP_ADMIN_";

/// Keys whose environment values are taken verbatim, never parsed
const STRING_KEYS: &[&str] = &[
    "database.host",
    "database.name",
    "database.user",
    "database.password",
    "database.url",
    "site.base_url",
    "site.admin_path",
    "runtime.timezone",
    "logging.level",
];

/// Mask written in place of secrets
pub const REDACTED: &str = "***";

/// Admin bootstrap configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub site: SiteConfig,
    pub runtime: RuntimeConfig,
    pub logging: LoggingConfig,
}

/// Database connection parameters
#[derive(Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub driver: DatabaseDriver,

    /// Host name
    pub host: String,

    /// Port; the driver default when absent
    pub port: Option<u16>,

    /// Database name (file path or `:memory:` for sqlite)
    pub name: String,

    /// Database username
    pub user: String,

    /// Database password; never has a default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Full connection URL, overrides the individual parts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    pub pool: PoolConfig,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            driver: DatabaseDriver::default(),
            host: "localhost".to_string(),
            port: None,
            name: "ecommerce_db".to_string(),
            user: "root".to_string(),
            password: None,
            url: None,
            pool: PoolConfig::default(),
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("driver", &self.driver)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| REDACTED))
            .field("url", &self.url.as_deref().map(redact_url))
            .field("pool", &self.pool)
            .finish()
    }
}

/// Connection pool settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolConfig {
    /// Upper bound on open connections
    pub max_connections: u32,

    /// Time allowed to establish a connection
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,

    /// Time allowed to check a connection out of the pool
    #[serde(with = "humantime_serde")]
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 1,
            connect_timeout: Duration::from_secs(5),
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// Public site addressing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Public site root
    pub base_url: String,

    /// Path segment of the admin panel below the base URL
    pub admin_path: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8888/PHP-MySQL-ecommerce-website-master/".to_string(),
            admin_path: "admin".to_string(),
        }
    }
}

/// Process-level runtime settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// IANA timezone used for wall-clock times shown in the admin panel
    pub timezone: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            timezone: "Asia/Dubai".to_string(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "debug".to_string(),
            format: LogFormat::Text,
        }
    }
}

impl AppConfig {
    /// Build the provider stack, lowest precedence first
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::new();
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        let conventional = Env::raw().filter_map(|key| {
            conventional_key(key.as_str())
                .filter(|mapped| !is_string_key(mapped))
                .map(Into::into)
        });
        let prefixed = Env::prefixed(ENV_PREFIX)
            .ignore(&["config"])
            .split("__")
            .filter(|key| !is_string_key(key.as_str()));

        figment = figment.merge(conventional);
        for (key, value) in verbatim_env(|var| conventional_key(var).map(str::to_string)) {
            figment = figment.merge(Serialized::default(&key, value));
        }
        figment = figment.merge(prefixed);
        for (key, value) in verbatim_env(prefixed_key) {
            figment = figment.merge(Serialized::default(&key, value));
        }
        figment
    }

    /// Load configuration from an optional YAML file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self, BootstrapError> {
        if let Some(path) = path {
            if !path.exists() {
                return Err(BootstrapError::ConfigFileMissing(path.to_path_buf()));
            }
        }
        Self::from_figment(&Self::figment(path))
    }

    pub fn from_figment(figment: &Figment) -> Result<Self, BootstrapError> {
        Ok(figment.extract()?)
    }

    /// Validate and derive URLs, timezone and connection target
    pub fn resolve(&self) -> Result<ResolvedConfig, BootstrapError> {
        if self.database.pool.max_connections == 0 {
            return Err(BootstrapError::invalid(
                "database.pool.max_connections",
                "must be at least 1",
            ));
        }

        let timezone: Tz = self
            .runtime
            .timezone
            .parse()
            .map_err(|_| BootstrapError::UnknownTimezone(self.runtime.timezone.clone()))?;

        Ok(ResolvedConfig {
            urls: SiteUrls::compose(&self.site.base_url, &self.site.admin_path)?,
            timezone,
            target: ConnectionTarget::from_config(&self.database)?,
        })
    }

    /// Copy of the configuration that is safe to print
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.database.password.is_some() {
            copy.database.password = Some(REDACTED.to_string());
        }
        copy.database.url = copy.database.url.as_deref().map(redact_url);
        copy
    }
}

/// Flat variables conventionally used by PHP/MySQL deployments
fn conventional_key(var: &str) -> Option<&'static str> {
    let mapped = match var.to_ascii_uppercase().as_str() {
        "DB_HOST" => "database.host",
        "DB_PORT" => "database.port",
        "DB_NAME" => "database.name",
        "DB_USER" => "database.user",
        "DB_PASS" => "database.password",
        "DB_URL" => "database.url",
        "BASE_URL" => "site.base_url",
        "APP_TIMEZONE" => "runtime.timezone",
        _ => return None,
    };
    Some(mapped)
}

/// `SHOP_ADMIN_DATABASE__PASSWORD` -> `database.password`
fn prefixed_key(var: &str) -> Option<String> {
    let head = var.get(..ENV_PREFIX.len())?;
    if !head.eq_ignore_ascii_case(ENV_PREFIX) {
        return None;
    }
    Some(var[ENV_PREFIX.len()..].to_ascii_lowercase().replace("__", "."))
}

fn is_string_key(key: &str) -> bool {
    STRING_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

/// String-typed settings present in the environment, unparsed
fn verbatim_env(map: impl Fn(&str) -> Option<String>) -> Vec<(String, String)> {
    let mut found: Vec<(String, String)> = std::env::vars_os()
        .filter_map(|(var, value)| {
            let key = map(var.to_str()?)?;
            if !is_string_key(&key) {
                return None;
            }
            Some((key, value.into_string().ok()?))
        })
        .collect();
    found.sort();
    found
}

/// Mask the password component of a connection URL
pub(crate) fn redact_url(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(mut parsed) if parsed.password().is_some() => {
            if parsed.set_password(Some(REDACTED)).is_ok() {
                parsed.to_string()
            } else {
                REDACTED.to_string()
            }
        }
        Ok(_) => raw.to_string(),
        Err(_) => REDACTED.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    fn load_in_jail(path: Option<&str>) -> figment::error::Result<AppConfig> {
        AppConfig::load(path.map(Path::new)).map_err(|e| e.to_string().into())
    }

    #[test]
    fn defaults_match_local_development_setup() {
        Jail::expect_with(|_jail| {
            let cfg = load_in_jail(None)?;
            assert_eq!(cfg.database.driver, DatabaseDriver::Mysql);
            assert_eq!(cfg.database.host, "localhost");
            assert_eq!(cfg.database.name, "ecommerce_db");
            assert_eq!(cfg.database.user, "root");
            assert_eq!(cfg.database.password, None);
            assert_eq!(cfg.database.pool.max_connections, 1);
            assert_eq!(cfg.runtime.timezone, "Asia/Dubai");
            assert_eq!(cfg.site.admin_path, "admin");
            assert_eq!(cfg.logging.level, "debug");
            Ok(())
        });
    }

    #[test]
    fn yaml_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "admin.yaml",
                r#"
database:
  host: db.internal
  name: shop
  password: s3cret
  pool:
    max_connections: 4
    connect_timeout: 250ms
site:
  base_url: "https://shop.example.com/"
runtime:
  timezone: Europe/Berlin
logging:
  format: json
"#,
            )?;

            let cfg = load_in_jail(Some("admin.yaml"))?;
            assert_eq!(cfg.database.host, "db.internal");
            assert_eq!(cfg.database.name, "shop");
            assert_eq!(cfg.database.user, "root");
            assert_eq!(cfg.database.password.as_deref(), Some("s3cret"));
            assert_eq!(cfg.database.pool.max_connections, 4);
            assert_eq!(cfg.database.pool.connect_timeout, Duration::from_millis(250));
            assert_eq!(cfg.site.base_url, "https://shop.example.com/");
            assert_eq!(cfg.runtime.timezone, "Europe/Berlin");
            assert_eq!(cfg.logging.format, LogFormat::Json);
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("admin.yaml", "database:\n  host: from-file\n  user: file_user\n")?;
            jail.set_env("DB_HOST", "from-conventional-env");
            jail.set_env("SHOP_ADMIN_DATABASE__USER", "prefixed_user");
            jail.set_env("SHOP_ADMIN_DATABASE__POOL__MAX_CONNECTIONS", "3");

            let cfg = load_in_jail(Some("admin.yaml"))?;
            assert_eq!(cfg.database.host, "from-conventional-env");
            assert_eq!(cfg.database.user, "prefixed_user");
            assert_eq!(cfg.database.pool.max_connections, 3);
            Ok(())
        });
    }

    #[test]
    fn prefixed_env_wins_over_conventional_env() {
        Jail::expect_with(|jail| {
            jail.set_env("DB_NAME", "conventional");
            jail.set_env("SHOP_ADMIN_DATABASE__NAME", "prefixed");

            let cfg = load_in_jail(None)?;
            assert_eq!(cfg.database.name, "prefixed");
            Ok(())
        });
    }

    #[test]
    fn numeric_password_from_env_is_kept_as_string() {
        Jail::expect_with(|jail| {
            jail.set_env("DB_PASS", "12345");
            jail.set_env("DB_USER", "42");

            let cfg = load_in_jail(None)?;
            assert_eq!(cfg.database.password.as_deref(), Some("12345"));
            assert_eq!(cfg.database.user, "42");
            Ok(())
        });
    }

    #[test]
    fn string_settings_from_env_are_taken_verbatim() {
        for raw in ["00123", "1.50", "[x]", "true", "{a: 1}", " padded "] {
            Jail::expect_with(|jail| {
                jail.set_env("DB_PASS", raw);
                jail.set_env("DB_NAME", raw);

                let cfg = load_in_jail(None)?;
                assert_eq!(cfg.database.password.as_deref(), Some(raw));
                assert_eq!(cfg.database.name, raw);
                Ok(())
            });
        }
    }

    #[test]
    fn prefixed_string_settings_are_taken_verbatim() {
        Jail::expect_with(|jail| {
            jail.set_env("DB_PASS", "conventional");
            jail.set_env("SHOP_ADMIN_DATABASE__PASSWORD", "00123");
            jail.set_env("SHOP_ADMIN_DATABASE__USER", "007");
            jail.set_env("SHOP_ADMIN_DATABASE__HOST", "10.0.0.1");
            jail.set_env("SHOP_ADMIN_DATABASE__URL", "mysql://u:1.50@db/shop");

            let cfg = load_in_jail(None)?;
            assert_eq!(cfg.database.password.as_deref(), Some("00123"));
            assert_eq!(cfg.database.user, "007");
            assert_eq!(cfg.database.host, "10.0.0.1");
            assert_eq!(cfg.database.url.as_deref(), Some("mysql://u:1.50@db/shop"));
            Ok(())
        });
    }

    #[test]
    fn numeric_settings_from_env_are_still_parsed() {
        Jail::expect_with(|jail| {
            jail.set_env("DB_PORT", "3307");
            jail.set_env("SHOP_ADMIN_DATABASE__POOL__CONNECT_TIMEOUT", "2s");

            let cfg = load_in_jail(None)?;
            assert_eq!(cfg.database.port, Some(3307));
            assert_eq!(cfg.database.pool.connect_timeout, Duration::from_secs(2));
            Ok(())
        });
    }

    #[test]
    fn env_string_overrides_file_string() {
        Jail::expect_with(|jail| {
            jail.create_file("admin.yaml", "database:\n  password: from-file\n")?;
            jail.set_env("DB_PASS", "0042");

            let cfg = load_in_jail(Some("admin.yaml"))?;
            assert_eq!(cfg.database.password.as_deref(), Some("0042"));
            Ok(())
        });
    }

    #[test]
    fn config_path_variable_is_not_treated_as_a_setting() {
        Jail::expect_with(|jail| {
            jail.set_env("SHOP_ADMIN_CONFIG", "/etc/shop-admin.yaml");
            load_in_jail(None)?;
            Ok(())
        });
    }

    #[test]
    fn unknown_keys_are_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("admin.yaml", "database:\n  hostname: typo\n")?;
            let err = AppConfig::load(Some(Path::new("admin.yaml"))).unwrap_err();
            assert!(matches!(err, BootstrapError::Config(_)), "got {err:?}");
            Ok(())
        });
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        Jail::expect_with(|_jail| {
            let err = AppConfig::load(Some(Path::new("does-not-exist.yaml"))).unwrap_err();
            assert!(matches!(err, BootstrapError::ConfigFileMissing(_)));
            Ok(())
        });
    }

    #[test]
    fn resolve_rejects_unknown_timezone() {
        let mut cfg = AppConfig::default();
        cfg.runtime.timezone = "Mars/Olympus_Mons".to_string();
        let err = cfg.resolve().unwrap_err();
        assert!(matches!(err, BootstrapError::UnknownTimezone(tz) if tz == "Mars/Olympus_Mons"));
    }

    #[test]
    fn resolve_rejects_empty_pool() {
        let mut cfg = AppConfig::default();
        cfg.database.pool.max_connections = 0;
        let err = cfg.resolve().unwrap_err();
        assert!(matches!(
            err,
            BootstrapError::InvalidSetting { field: "database.pool.max_connections", .. }
        ));
    }

    #[test]
    fn resolve_defaults() {
        let resolved = AppConfig::default().resolve().unwrap();
        assert_eq!(resolved.timezone, chrono_tz::Asia::Dubai);
        assert_eq!(
            resolved.urls.admin(),
            "http://localhost:8888/PHP-MySQL-ecommerce-website-master/admin/"
        );
        assert_eq!(resolved.target.dsn(), "mysql://root@localhost:3306/ecommerce_db");
    }

    #[test]
    fn redacted_copy_and_debug_hide_password() {
        let mut cfg = AppConfig::default();
        cfg.database.password = Some("hunter2".to_string());
        cfg.database.url = Some("mysql://root:hunter2@db:3306/shop".to_string());

        let redacted = cfg.redacted();
        assert_eq!(redacted.database.password.as_deref(), Some(REDACTED));
        assert_eq!(
            redacted.database.url.as_deref(),
            Some("mysql://root:***@db:3306/shop")
        );
        assert!(!format!("{cfg:?}").contains("hunter2"));
        assert_eq!(cfg.database.password.as_deref(), Some("hunter2"));
    }
}
