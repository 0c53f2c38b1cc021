//! Connector trait for opening the admin database connection
//!
//! The SeaORM implementation lives in infra/db.rs

use crate::config::PoolConfig;
use crate::contract::ConnectionTarget;
use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DbErr};

/// Opens the admin database connection
#[async_trait]
pub trait DatabaseConnector: Send + Sync {
    /// Establish a verified connection to `target`
    async fn connect(
        &self,
        target: &ConnectionTarget,
        pool: &PoolConfig,
    ) -> Result<DatabaseConnection, DbErr>;
}
