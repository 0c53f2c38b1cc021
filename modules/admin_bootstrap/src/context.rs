//! Admin context - configuration, URLs and connection handed to collaborators

use crate::config::AppConfig;
use crate::contract::{BootstrapError, ConnectionTarget, SiteUrls};
use crate::domain::DatabaseConnector;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Everything an admin page needs, passed explicitly
#[derive(Debug, Clone)]
pub struct AdminContext {
    config: Arc<AppConfig>,
    urls: SiteUrls,
    timezone: Tz,
    target: ConnectionTarget,
    db: DatabaseConnection,
}

impl AdminContext {
    /// Resolve the configuration and open the database connection
    ///
    /// Configuration problems are reported before any connection attempt.
    /// A failed connection is returned as [`BootstrapError::Connection`].
    pub async fn bootstrap(
        config: AppConfig,
        connector: &dyn DatabaseConnector,
    ) -> Result<Self, BootstrapError> {
        let resolved = config.resolve()?;

        let db = connector
            .connect(&resolved.target, &config.database.pool)
            .await
            .map_err(|source| {
                let source = resolved.target.scrub(source);
                tracing::error!(
                    db = %resolved.target,
                    error = %source,
                    "database connection failed"
                );
                BootstrapError::Connection {
                    target: resolved.target.redacted().to_string(),
                    source,
                }
            })?;

        tracing::info!(
            base_url = resolved.urls.base(),
            admin_url = resolved.urls.admin(),
            timezone = %resolved.timezone,
            "admin context ready"
        );

        Ok(Self {
            config: Arc::new(config),
            urls: resolved.urls,
            timezone: resolved.timezone,
            target: resolved.target,
            db,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn urls(&self) -> &SiteUrls {
        &self.urls
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Where the connection points, password masked on display
    pub fn target(&self) -> &ConnectionTarget {
        &self.target
    }

    /// Shared connection handle
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Current wall-clock time in the configured timezone
    pub fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.timezone)
    }

    /// Close the underlying connection
    pub async fn close(self) -> Result<(), BootstrapError> {
        let target = self.target.redacted().to_string();
        self.db.close().await.map_err(|source| BootstrapError::Connection {
            source: self.target.scrub(source),
            target,
        })
    }
}
