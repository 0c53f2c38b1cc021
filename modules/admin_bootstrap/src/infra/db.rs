//! SeaORM connector implementation

use crate::config::PoolConfig;
use crate::contract::ConnectionTarget;
use crate::domain::DatabaseConnector;
use async_trait::async_trait;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};

/// Opens a SeaORM connection and pings it before handing it out
#[derive(Debug, Clone, Copy, Default)]
pub struct SeaOrmConnector;

impl SeaOrmConnector {
    pub fn new() -> Self {
        Self
    }

    fn options(target: &ConnectionTarget, pool: &PoolConfig) -> ConnectOptions {
        let mut opts = ConnectOptions::new(target.dsn().to_owned());
        opts.max_connections(pool.max_connections)
            .min_connections(1)
            .connect_timeout(pool.connect_timeout)
            .acquire_timeout(pool.acquire_timeout)
            .sqlx_logging(false);
        opts
    }
}

#[async_trait]
impl DatabaseConnector for SeaOrmConnector {
    async fn connect(
        &self,
        target: &ConnectionTarget,
        pool: &PoolConfig,
    ) -> Result<DatabaseConnection, DbErr> {
        tracing::debug!(
            db = %target,
            max_connections = pool.max_connections,
            connect_timeout = ?pool.connect_timeout,
            "opening database connection"
        );

        let conn = Database::connect(Self::options(target, pool)).await?;
        conn.ping().await?;

        tracing::info!(
            db = %target,
            backend = ?conn.get_database_backend(),
            "database connection established"
        );
        Ok(conn)
    }
}
