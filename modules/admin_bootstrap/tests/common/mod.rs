//! Common test utilities: config builders and mock connectors

#![allow(dead_code)]

use admin_bootstrap::{AppConfig, ConnectionTarget, DatabaseConnector, DatabaseDriver, PoolConfig};
use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DbErr, RuntimeErr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Config pointing at a private in-memory sqlite database
pub fn sqlite_memory_config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.database.driver = DatabaseDriver::Sqlite;
    cfg.database.name = ":memory:".to_string();
    cfg
}

/// MySQL config aimed at a port nothing listens on
pub fn unreachable_mysql_config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.database.host = "127.0.0.1".to_string();
    cfg.database.port = Some(1);
    cfg.database.password = Some("hunter2".to_string());
    cfg.database.pool.connect_timeout = Duration::from_secs(1);
    cfg.database.pool.acquire_timeout = Duration::from_secs(1);
    cfg
}

/// Connector that always fails and counts how often it was asked
#[derive(Default)]
pub struct FailingConnector {
    attempts: AtomicUsize,
    seen_dsn: std::sync::Mutex<Option<String>>,
}

impl FailingConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// DSN of the last attempt
    pub fn seen_dsn(&self) -> Option<String> {
        self.seen_dsn.lock().ok().and_then(|dsn| dsn.clone())
    }
}

#[async_trait]
impl DatabaseConnector for FailingConnector {
    async fn connect(
        &self,
        target: &ConnectionTarget,
        _pool: &PoolConfig,
    ) -> Result<DatabaseConnection, DbErr> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.seen_dsn.lock() {
            *seen = Some(target.dsn().to_string());
        }
        Err(DbErr::Conn(RuntimeErr::Internal(
            "Access denied for user 'root'@'localhost'".to_string(),
        )))
    }
}

/// Connector whose error message repeats the full connection string
pub struct EchoingConnector;

#[async_trait]
impl DatabaseConnector for EchoingConnector {
    async fn connect(
        &self,
        target: &ConnectionTarget,
        _pool: &PoolConfig,
    ) -> Result<DatabaseConnection, DbErr> {
        Err(DbErr::Conn(RuntimeErr::Internal(format!(
            "The connection string '{}' has no supporting driver.",
            target.dsn()
        ))))
    }
}
