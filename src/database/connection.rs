//! Configuración de conexión a PostgreSQL
//!
//! Este módulo abre el pool y aplica las migraciones de `migrations/`.

use sqlx::PgPool;
use tracing::info;

use crate::config::DatabaseConfig;

/// Crear un pool de conexiones a la base de datos
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    info!(
        "🐘 Conectando a PostgreSQL {} (máx. {} conexiones)",
        mask_database_url(&config.url),
        config.max_connections
    );

    let pool = config.create_pool().await?;

    info!("✅ Conexión a PostgreSQL establecida");
    Ok(pool)
}

/// Ejecutar migraciones de la base de datos
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("📦 Aplicando migraciones...");
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("✅ Migraciones aplicadas");
    Ok(())
}

/// Enmascara las credenciales de la URL para los logs
pub fn mask_database_url(url: &str) -> String {
    let Some(at_pos) = url.rfind('@') else {
        return url.to_string();
    };
    let scheme_end = url.find("://").map(|p| p + 3).unwrap_or(0);
    if scheme_end > at_pos {
        return url.to_string();
    }
    format!("{}***:***@{}", &url[..scheme_end], &url[at_pos + 1..])
}
