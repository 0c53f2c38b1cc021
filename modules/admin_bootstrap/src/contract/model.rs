//! Contract models
//!
//! Construction and validation live in the domain layer; these are the
//! plain values the admin pages consume.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Database driver behind the admin connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseDriver {
    /// MySQL / MariaDB
    #[default]
    Mysql,
    /// PostgreSQL
    Postgres,
    /// SQLite file or in-memory database
    Sqlite,
}

impl DatabaseDriver {
    /// URL scheme used in connection strings
    pub fn scheme(self) -> &'static str {
        match self {
            Self::Mysql => "mysql",
            Self::Postgres => "postgres",
            Self::Sqlite => "sqlite",
        }
    }

    /// Port used when none is configured; `None` for file-backed drivers
    pub fn default_port(self) -> Option<u16> {
        match self {
            Self::Mysql => Some(3306),
            Self::Postgres => Some(5432),
            Self::Sqlite => None,
        }
    }

    /// Map a connection URL scheme back to a driver
    pub fn from_scheme(scheme: &str) -> Option<Self> {
        match scheme.to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Some(Self::Mysql),
            "postgres" | "postgresql" => Some(Self::Postgres),
            "sqlite" => Some(Self::Sqlite),
            _ => None,
        }
    }
}

impl fmt::Display for DatabaseDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scheme())
    }
}

/// Base and admin URLs used for link generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteUrls {
    pub(crate) base: String,
    pub(crate) admin: String,
}

impl SiteUrls {
    /// Public site root, always ending in `/`
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Admin panel root: base URL, admin path and a trailing `/`
    pub fn admin(&self) -> &str {
        &self.admin
    }
}

/// Where the admin connection points
///
/// The raw DSN contains credentials and is only reachable through
/// [`ConnectionTarget::dsn`]; `Display` and `Debug` show the redacted form.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    pub(crate) driver: DatabaseDriver,
    pub(crate) dsn: String,
    pub(crate) redacted: String,
    /// Password in raw and percent-encoded form, longest first
    pub(crate) secrets: Vec<String>,
}

impl ConnectionTarget {
    pub fn driver(&self) -> DatabaseDriver {
        self.driver
    }

    /// Full connection string including the password
    pub fn dsn(&self) -> &str {
        &self.dsn
    }

    /// Connection string with the password masked
    pub fn redacted(&self) -> &str {
        &self.redacted
    }
}

impl fmt::Display for ConnectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted)
    }
}

impl fmt::Debug for ConnectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionTarget")
            .field("driver", &self.driver)
            .field("dsn", &self.redacted)
            .finish()
    }
}

/// Validated values derived from an [`crate::AppConfig`]
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub urls: SiteUrls,
    pub timezone: Tz,
    pub target: ConnectionTarget,
}
