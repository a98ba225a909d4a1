//! Services module
//!
//! Este módulo contiene la lógica de negocio que no pertenece a un único
//! repositorio: disponibilidad de vehículos y almacenamiento de imágenes.

pub mod availability;
pub mod image_storage;

pub use availability::{AvailabilityChecker, DateRange};
pub use image_storage::ImageStorage;
