//! Deployment store

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tracing::{debug, info};

use crate::errors::AgentError;
use crate::models::deployment::Deployment;

/// Persistence for deployment records
#[async_trait]
pub trait DeploymentStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Deployment, AgentError>;

    /// Every record, oldest first
    async fn all(&self) -> Result<Vec<Deployment>, AgentError>;

    /// Insert `deployment` and set its id
    async fn save(&self, deployment: &mut Deployment) -> Result<(), AgentError>;

    /// Delete the record if present
    async fn remove(&self, id: i64) -> Result<(), AgentError>;
}

/// SQLite-backed deployment store
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open the database at `url`, creating it and its schema when missing.
    pub async fn connect(url: &str) -> Result<Self, AgentError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        // A single long-lived connection keeps `sqlite::memory:` databases
        // alive and serializes writes.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.initialize_schema().await?;
        info!("Opened deployment store at {}", url);
        Ok(store)
    }

    async fn initialize_schema(&self) -> Result<(), AgentError> {
        let statements = [r#"
            CREATE TABLE IF NOT EXISTS deployments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                template TEXT NOT NULL DEFAULT '',
                service_ids TEXT NOT NULL DEFAULT ''
            );
            "#];

        for statement in statements {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    fn row_to_deployment(row: &SqliteRow) -> Result<Deployment, AgentError> {
        Ok(Deployment {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            template: row.try_get("template")?,
            service_ids: row.try_get("service_ids")?,
        })
    }
}

#[async_trait]
impl DeploymentStore for SqliteStore {
    async fn find_by_id(&self, id: i64) -> Result<Deployment, AgentError> {
        let row = sqlx::query(
            "SELECT id, name, template, service_ids FROM deployments WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Self::row_to_deployment(&row),
            None => Err(AgentError::NotFound(format!("deployment '{}' not found", id))),
        }
    }

    async fn all(&self) -> Result<Vec<Deployment>, AgentError> {
        let rows = sqlx::query("SELECT id, name, template, service_ids FROM deployments ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::row_to_deployment).collect()
    }

    async fn save(&self, deployment: &mut Deployment) -> Result<(), AgentError> {
        let result =
            sqlx::query("INSERT INTO deployments (name, template, service_ids) VALUES (?, ?, ?)")
                .bind(&deployment.name)
                .bind(&deployment.template)
                .bind(&deployment.service_ids)
                .execute(&self.pool)
                .await?;

        deployment.id = result.last_insert_rowid();
        debug!("Saved deployment {} as '{}'", deployment.name, deployment.id);
        Ok(())
    }

    async fn remove(&self, id: i64) -> Result<(), AgentError> {
        sqlx::query("DELETE FROM deployments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        debug!("Removed deployment '{}'", id);
        Ok(())
    }
}
