//! Configuración de base de datos
//!
//! Este módulo maneja la configuración del pool de PostgreSQL con SQLx.

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use super::EnvironmentConfig;

/// Configuración de la base de datos
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(60),
            idle_timeout: Duration::from_secs(300),
            max_lifetime: Duration::from_secs(3600),
        }
    }

    /// `None` si no hay `DATABASE_URL`
    pub fn from_environment(config: &EnvironmentConfig) -> Option<Self> {
        let url = config.database_url.as_ref()?;
        Some(Self {
            max_connections: config.database_max_connections,
            acquire_timeout: Duration::from_secs(config.database_acquire_timeout_secs),
            ..Self::new(url.clone())
        })
    }

    /// Crear un nuevo pool de conexiones
    pub async fn create_pool(&self) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections.min(self.max_connections))
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(self.idle_timeout)
            .max_lifetime(self.max_lifetime)
            .connect(&self.url)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_environment() {
        assert!(DatabaseConfig::from_environment(&EnvironmentConfig::default()).is_none());

        let env = EnvironmentConfig {
            database_url: Some("postgres://localhost/rentacar".into()),
            database_max_connections: 4,
            ..EnvironmentConfig::default()
        };
        let config = DatabaseConfig::from_environment(&env).unwrap();
        assert_eq!(config.max_connections, 4);
        assert_eq!(config.acquire_timeout, Duration::from_secs(60));
    }
}
