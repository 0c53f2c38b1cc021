//! Connection target construction

use crate::config::{redact_url, DatabaseConfig, REDACTED};
use crate::contract::{BootstrapError, ConnectionTarget, DatabaseDriver};
use sea_orm::{DbErr, RuntimeErr};
use urlencoding::{decode, encode};

const SQLITE_MEMORY: &str = ":memory:";

impl ConnectionTarget {
    /// Build the connection string from configuration
    ///
    /// `database.url`, when present, wins over the individual parts.
    pub fn from_config(cfg: &DatabaseConfig) -> Result<Self, BootstrapError> {
        match cfg.url.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Self::from_url(raw),
            _ => Self::from_parts(cfg),
        }
    }

    fn from_url(raw: &str) -> Result<Self, BootstrapError> {
        let parsed = url::Url::parse(raw)
            .map_err(|e| BootstrapError::invalid("database.url", e.to_string()))?;
        let driver = DatabaseDriver::from_scheme(parsed.scheme()).ok_or_else(|| {
            BootstrapError::invalid(
                "database.url",
                format!("unsupported scheme '{}'", parsed.scheme()),
            )
        })?;

        // sqlx only recognises the canonical scheme, e.g. `mysql:` for `mariadb:`
        let rest = raw.split_once(':').map_or("", |(_, rest)| rest);
        let dsn = format!("{}:{rest}", driver.scheme());

        let mut secrets = Vec::new();
        if let Some(encoded) = parsed.password() {
            if let Ok(decoded) = decode(encoded) {
                secrets.push(decoded.into_owned());
            }
            secrets.push(encoded.to_string());
        }

        Ok(Self {
            driver,
            redacted: redact_url(&dsn),
            dsn,
            secrets: normalize(secrets),
        })
    }

    fn from_parts(cfg: &DatabaseConfig) -> Result<Self, BootstrapError> {
        let name = cfg.name.trim();
        if name.is_empty() {
            return Err(BootstrapError::invalid("database.name", "must not be empty"));
        }

        if cfg.driver == DatabaseDriver::Sqlite {
            if name.contains(['?', '#']) {
                return Err(BootstrapError::invalid(
                    "database.name",
                    "sqlite file name must not contain '?' or '#'",
                ));
            }
            let dsn = if name == SQLITE_MEMORY {
                "sqlite::memory:".to_string()
            } else {
                format!("sqlite://{name}?mode=rwc")
            };
            return Ok(Self {
                driver: cfg.driver,
                redacted: dsn.clone(),
                dsn,
                secrets: Vec::new(),
            });
        }

        let host = cfg.host.trim();
        if host.is_empty() {
            return Err(BootstrapError::invalid("database.host", "must not be empty"));
        }
        let user = cfg.user.trim();
        if user.is_empty() {
            return Err(BootstrapError::invalid("database.user", "must not be empty"));
        }

        let authority = |password: Option<&str>| {
            let mut out = encode(user).into_owned();
            if let Some(password) = password {
                out.push(':');
                out.push_str(password);
            }
            out.push('@');
            out.push_str(host);
            if let Some(port) = cfg.port.or(cfg.driver.default_port()) {
                out.push(':');
                out.push_str(&port.to_string());
            }
            out
        };

        let scheme = cfg.driver.scheme();
        let name = encode(name);
        let password = cfg.password.as_deref().map(|p| encode(p).into_owned());

        Ok(Self {
            driver: cfg.driver,
            dsn: format!("{scheme}://{}/{name}", authority(password.as_deref())),
            redacted: format!(
                "{scheme}://{}/{name}",
                authority(password.as_ref().map(|_| REDACTED))
            ),
            secrets: normalize(cfg.password.iter().cloned().chain(password).collect()),
        })
    }

    /// Strip credentials from a driver error
    ///
    /// Drivers may echo the connection string in their messages.
    pub fn scrub(&self, err: DbErr) -> DbErr {
        let text = err.to_string();
        let leaks = text.contains(&self.dsn)
            || self.secrets.iter().any(|s| text.contains(s.as_str()));
        if !leaks {
            return err;
        }
        match err {
            DbErr::Conn(RuntimeErr::Internal(msg)) => {
                DbErr::Conn(RuntimeErr::Internal(self.scrub_text(&msg)))
            }
            DbErr::Custom(msg) => DbErr::Custom(self.scrub_text(&msg)),
            _ => DbErr::Custom(self.scrub_text(&text)),
        }
    }

    fn scrub_text(&self, text: &str) -> String {
        let mut out = text.replace(&self.dsn, &self.redacted);
        for secret in &self.secrets {
            out = out.replace(secret.as_str(), REDACTED);
        }
        out
    }
}

/// Longest first so an encoded form is masked before its decoded substring
fn normalize(mut secrets: Vec<String>) -> Vec<String> {
    secrets.retain(|s| !s.is_empty());
    secrets.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    secrets.dedup();
    secrets
}
