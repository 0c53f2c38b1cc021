//! Bootstrap error types
//!
//! None of the variants carry a database password; connection targets are
//! always stored in their redacted form.

use std::path::PathBuf;

/// Errors raised while loading configuration or opening the database
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// An explicitly requested configuration file does not exist
    #[error("configuration file not found: {}", .0.display())]
    ConfigFileMissing(PathBuf),

    /// Configuration could not be extracted from its providers
    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// A configuration value is present but unusable
    #[error("invalid setting `{field}`: {reason}")]
    InvalidSetting {
        /// Dotted configuration key
        field: &'static str,
        /// What is wrong with the value
        reason: String,
    },

    /// Timezone name is not in the IANA database
    #[error("unknown timezone '{0}'")]
    UnknownTimezone(String),

    /// Logging subscriber could not be installed
    #[error("logging setup failed: {0}")]
    Logging(String),

    /// Database connection could not be established
    #[error("database connection to {target} failed: {source}")]
    Connection {
        /// Redacted connection target
        target: String,
        /// Underlying driver error
        #[source]
        source: sea_orm::DbErr,
    },
}

impl BootstrapError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidSetting {
            field,
            reason: reason.into(),
        }
    }
}

impl From<figment::Error> for BootstrapError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}
