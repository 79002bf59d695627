//! Database connection and initialization.

use std::future::Future;
use std::time::Duration;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database as SeaDatabase, DatabaseConnection, DbErr, Statement,
};
use sea_orm_migration::MigratorTrait;

use crate::config::{Config, QUERY_TIMEOUT_SECONDS};

pub mod migrations;

pub use migrations::Migrator;

/// Bound a single database call by the query deadline.
///
/// A timeout surfaces as `DbErr::Custom`, which callers treat like any other
/// persistence failure.
pub async fn with_deadline<F, T>(fut: F) -> Result<T, DbErr>
where
    F: Future<Output = Result<T, DbErr>>,
{
    match tokio::time::timeout(Duration::from_secs(QUERY_TIMEOUT_SECONDS), fut).await {
        Ok(result) => result,
        Err(_) => Err(DbErr::Custom(format!(
            "query exceeded the {}s deadline",
            QUERY_TIMEOUT_SECONDS
        ))),
    }
}

/// Database wrapper for connection management
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    /// Open the pool and apply pending migrations.
    pub async fn connect(config: &Config) -> Result<Self, DbErr> {
        let database = Self::connect_without_migrations(config).await?;

        if let Err(e) = database.run_migrations().await {
            tracing::error!("Failed to run migrations: {}", e);
            return Err(e);
        }

        tracing::info!(
            max_conns = config.db_max_open_conns,
            min_conns = config.db_min_idle_conns,
            "Database connected and migrations applied"
        );

        Ok(database)
    }

    /// Connect without running migrations (for CLI commands).
    pub async fn connect_without_migrations(config: &Config) -> Result<Self, DbErr> {
        let connection = SeaDatabase::connect(Self::connect_options(config)).await?;
        Ok(Self { connection })
    }

    fn connect_options(config: &Config) -> ConnectOptions {
        let mut options = ConnectOptions::new(config.database_url.clone());
        options
            .max_connections(config.db_max_open_conns)
            .min_connections(config.db_min_idle_conns.min(config.db_max_open_conns))
            .idle_timeout(Duration::from_secs(
                config.db_max_idle_time_minutes.saturating_mul(60),
            ))
            .acquire_timeout(Duration::from_secs(QUERY_TIMEOUT_SECONDS))
            .sqlx_logging(false);
        options
    }

    /// Get a reference to the database connection.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }

    /// Get a clone of the database connection.
    pub fn get_connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    /// Run pending migrations.
    pub async fn run_migrations(&self) -> Result<(), DbErr> {
        Migrator::up(&self.connection, None).await
    }

    /// Rollback the last migration.
    pub async fn rollback_migration(&self) -> Result<(), DbErr> {
        Migrator::down(&self.connection, Some(1)).await
    }

    /// Get migration status (list all migrations with applied status).
    pub async fn migration_status(&self) -> Result<Vec<(String, bool)>, DbErr> {
        use sea_orm::{EntityTrait, QueryOrder};
        use sea_orm_migration::seaql_migrations;

        let applied: std::collections::HashSet<String> = seaql_migrations::Entity::find()
            .order_by_asc(seaql_migrations::Column::Version)
            .all(&self.connection)
            .await?
            .into_iter()
            .map(|m| m.version)
            .collect();

        let migrations: Vec<(String, bool)> = Migrator::migrations()
            .iter()
            .map(|m| {
                let name = m.name().to_string();
                let is_applied = applied.contains(&name);
                (name, is_applied)
            })
            .collect();

        Ok(migrations)
    }

    /// Reset database and run all migrations fresh.
    pub async fn fresh_migrations(&self) -> Result<(), DbErr> {
        Migrator::fresh(&self.connection).await
    }

    /// Check database connectivity by executing a simple query.
    pub async fn ping(&self) -> Result<(), DbErr> {
        with_deadline(self.connection.execute(Statement::from_string(
            self.connection.get_database_backend(),
            "SELECT 1".to_string(),
        )))
        .await?;
        Ok(())
    }
}
