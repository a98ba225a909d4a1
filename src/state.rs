//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. Los stores son trait objects: el mismo router
//! sirve PostgreSQL o el backend en memoria.

use sqlx::PgPool;
use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::{
    CustomerRepository, CustomerStore, MemoryStore, ReservationRepository, ReservationStore, VehicleRepository,
    VehicleStore,
};
use crate::services::{AvailabilityChecker, ImageStorage};

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub vehicles: Arc<dyn VehicleStore>,
    pub customers: Arc<dyn CustomerStore>,
    pub reservations: Arc<dyn ReservationStore>,
    pub images: ImageStorage,
}

impl AppState {
    pub fn with_postgres(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self {
            vehicles: Arc::new(VehicleRepository::new(pool.clone())),
            customers: Arc::new(CustomerRepository::new(pool.clone())),
            reservations: Arc::new(ReservationRepository::new(pool)),
            images: ImageStorage::new(config.upload_dir.clone(), config.upload_max_bytes),
            config,
        }
    }

    pub fn from_memory(store: MemoryStore, config: EnvironmentConfig) -> Self {
        Self {
            vehicles: Arc::new(store.clone()),
            customers: Arc::new(store.clone()),
            reservations: Arc::new(store),
            images: ImageStorage::new(config.upload_dir.clone(), config.upload_max_bytes),
            config,
        }
    }

    pub fn availability(&self) -> AvailabilityChecker {
        AvailabilityChecker::new(self.reservations.clone())
    }
}
