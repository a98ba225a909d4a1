use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use rentacar::config::{DatabaseConfig, EnvironmentConfig, StorageBackend};
use rentacar::database::{create_pool, run_migrations};
use rentacar::repositories::MemoryStore;
use rentacar::routes::create_app;
use rentacar::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,rentacar=debug")),
        )
        .init();

    info!("🚗 Rent a Car - API de reservas");
    info!("================================================");

    let config = EnvironmentConfig::from_env().context("Configuración inválida")?;
    for warning in config.startup_warnings() {
        warn!("⚠️ {}", warning);
    }

    let app_state = match config.storage_backend {
        StorageBackend::Postgres => {
            let db_config = DatabaseConfig::from_environment(&config).context("DATABASE_URL no configurada")?;
            let pool = match create_pool(&db_config).await {
                Ok(pool) => pool,
                Err(e) => {
                    error!("❌ Error conectando a la base de datos: {}", e);
                    return Err(anyhow::anyhow!("Error de base de datos: {}", e));
                }
            };
            run_migrations(&pool).await.context("Error aplicando migraciones")?;
            AppState::with_postgres(pool, config.clone())
        }
        StorageBackend::Memory => {
            warn!("🧪 Backend en memoria: los datos se pierden al reiniciar (solo demo)");
            AppState::from_memory(MemoryStore::with_demo_fleet(), config.clone())
        }
    };

    let app = create_app(app_state);
    let addr: SocketAddr = config.server_url().parse().context("HOST/PORT inválidos")?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🚗 Vehículos:");
    info!("   GET    /api/vehicles[?id=|?available=true|?category=]");
    info!("   POST   /api/vehicles");
    info!("   PUT    /api/vehicles?id=");
    info!("   DELETE /api/vehicles?id=");
    info!("👤 Clientes:");
    info!("   GET    /api/customers[?id=|?email=]");
    info!("   POST   /api/customers");
    info!("   PUT    /api/customers?id=");
    info!("   DELETE /api/customers?id=");
    info!("📅 Reservas:");
    info!("   GET    /api/reservations[?id=|?status=|?vehicleId=]");
    info!("   POST   /api/reservations");
    info!("   PUT    /api/reservations?id=");
    info!("   DELETE /api/reservations?id=");
    info!("   POST   /api/reservations/check-availability");
    info!("   POST   /api/reservations/transition");
    info!("🖼️ Imágenes:");
    info!("   POST   /api/upload");
    info!("   GET    /uploads/*");
    info!("📊 Panel:");
    info!("   GET    /api/dashboard/stats");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
