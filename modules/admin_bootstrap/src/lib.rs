//! Admin Bootstrap Module
//!
//! Configuration, site URLs and database connection for the shop admin panel.
//! Everything the admin pages need at startup is carried by an explicit
//! [`AdminContext`] instead of process-wide globals.

// Public exports
pub mod contract;
pub use contract::{
    error::BootstrapError, ConnectionTarget, DatabaseDriver, ResolvedConfig, SiteUrls,
};

pub mod config;
pub use config::{AppConfig, DatabaseConfig, LogFormat, LoggingConfig, PoolConfig};

pub mod context;
pub use context::AdminContext;

pub mod domain;
pub use domain::DatabaseConnector;

pub mod infra;
pub use infra::{db::SeaOrmConnector, logging::init_logging};
