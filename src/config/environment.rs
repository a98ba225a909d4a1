//! Configuración de variables de entorno
//!
//! Este módulo lee la configuración del servidor desde el entorno. Todas las
//! variables tienen un valor por defecto salvo `DATABASE_URL`, que es opcional:
//! sin ella el servidor arranca con el backend en memoria.

use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::services::image_storage::DEFAULT_MAX_UPLOAD_BYTES;

/// Backend de almacenamiento de vehículos, clientes y reservas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" | "demo" => Ok(StorageBackend::Memory),
            other => bail!("STORAGE_BACKEND inválido: '{}' (usa postgres o memory)", other),
        }
    }
}

/// Qué hacer cuando una edición cambia vehículo, fechas o reactiva una reserva
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateEditPolicy {
    /// Se confía en el operador: no se vuelve a verificar disponibilidad
    #[default]
    Trusted,
    /// Se verifica el nuevo rango excluyendo la propia reserva
    Recheck,
}

impl DateEditPolicy {
    pub fn rechecks(&self) -> bool {
        matches!(self, DateEditPolicy::Recheck)
    }
}

impl FromStr for DateEditPolicy {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "trusted" => Ok(DateEditPolicy::Trusted),
            "recheck" => Ok(DateEditPolicy::Recheck),
            other => bail!(
                "RESERVATION_DATE_EDIT_POLICY inválido: '{}' (usa trusted o recheck)",
                other
            ),
        }
    }
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub database_url: Option<String>,
    pub storage_backend: StorageBackend,
    /// Vacío = CORS permisivo
    pub cors_origins: Vec<String>,
    pub upload_dir: PathBuf,
    pub upload_max_bytes: usize,
    pub request_timeout_secs: u64,
    pub date_edit_policy: DateEditPolicy,
    pub database_max_connections: u32,
    pub database_acquire_timeout_secs: u64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            database_url: None,
            storage_backend: StorageBackend::Memory,
            cors_origins: Vec::new(),
            upload_dir: PathBuf::from("public/uploads"),
            upload_max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            request_timeout_secs: 30,
            date_edit_policy: DateEditPolicy::Trusted,
            database_max_connections: 10,
            database_acquire_timeout_secs: 60,
        }
    }
}

fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parsed<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match var(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} inválido ('{}'): {}", name, raw, e)),
        None => Ok(default),
    }
}

impl EnvironmentConfig {
    /// Construye la configuración desde variables de entorno
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let database_url = var("DATABASE_URL");

        let storage_backend = match var("STORAGE_BACKEND") {
            Some(raw) => raw.parse().context("Configuración de almacenamiento")?,
            None if database_url.is_some() => StorageBackend::Postgres,
            None => StorageBackend::Memory,
        };
        if storage_backend == StorageBackend::Postgres && database_url.is_none() {
            bail!("STORAGE_BACKEND=postgres requiere DATABASE_URL");
        }

        let cors_origins = var("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            environment: var("ENVIRONMENT").unwrap_or(defaults.environment),
            port: parsed("PORT", defaults.port)?,
            host: var("HOST").unwrap_or(defaults.host),
            database_url,
            storage_backend,
            cors_origins,
            upload_dir: var("UPLOAD_DIR").map(PathBuf::from).unwrap_or(defaults.upload_dir),
            upload_max_bytes: parsed("UPLOAD_MAX_BYTES", defaults.upload_max_bytes)?,
            request_timeout_secs: parsed("REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs)?,
            date_edit_policy: parsed("RESERVATION_DATE_EDIT_POLICY", defaults.date_edit_policy)?,
            database_max_connections: parsed("DATABASE_MAX_CONNECTIONS", defaults.database_max_connections)?,
            database_acquire_timeout_secs: parsed(
                "DATABASE_ACQUIRE_TIMEOUT_SECS",
                defaults.database_acquire_timeout_secs,
            )?,
        })
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Ajustes válidos pero riesgosos fuera de desarrollo
    pub fn startup_warnings(&self) -> Vec<&'static str> {
        let mut warnings = Vec::new();
        if !self.is_production() {
            return warnings;
        }
        if self.cors_origins.is_empty() {
            warnings.push("CORS permisivo en producción: configura CORS_ORIGINS");
        }
        if self.storage_backend == StorageBackend::Memory {
            warnings.push("Backend en memoria en producción: configura DATABASE_URL");
        }
        warnings
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EnvironmentConfig::default();
        assert_eq!(config.server_url(), "0.0.0.0:3000");
        assert_eq!(config.storage_backend, StorageBackend::Memory);
        assert_eq!(config.date_edit_policy, DateEditPolicy::Trusted);
        assert_eq!(config.upload_max_bytes, 5 * 1024 * 1024);
        assert!(!config.is_production());
        assert!(config.startup_warnings().is_empty());
    }

    #[test]
    fn test_production_warnings() {
        let config = EnvironmentConfig {
            environment: "production".to_string(),
            ..EnvironmentConfig::default()
        };
        assert_eq!(config.startup_warnings().len(), 2);

        let config = EnvironmentConfig {
            environment: "production".to_string(),
            cors_origins: vec!["https://rentacar.cl".to_string()],
            storage_backend: StorageBackend::Postgres,
            ..EnvironmentConfig::default()
        };
        assert!(config.startup_warnings().is_empty());
    }

    #[test]
    fn test_parse_policy() {
        assert_eq!("recheck".parse::<DateEditPolicy>().unwrap(), DateEditPolicy::Recheck);
        assert_eq!(" Trusted ".parse::<DateEditPolicy>().unwrap(), DateEditPolicy::Trusted);
        assert!("strict".parse::<DateEditPolicy>().is_err());
        assert!(DateEditPolicy::Recheck.rechecks());
    }

    #[test]
    fn test_parse_backend() {
        assert_eq!("postgresql".parse::<StorageBackend>().unwrap(), StorageBackend::Postgres);
        assert_eq!("MEMORY".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
        assert!("redis".parse::<StorageBackend>().is_err());
    }
}
