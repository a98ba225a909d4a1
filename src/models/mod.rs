//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL (`migrations/`).

pub mod customer;
pub mod reservation;
pub mod vehicle;

pub use customer::Customer;
pub use reservation::{NewReservation, Reservation, ReservationChanges, ReservationFilter, ReservationStatus};
pub use vehicle::{FuelType, Transmission, Vehicle, VehicleFilter};

/// Valor de texto que no corresponde a ninguna variante conocida
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown {field} value '{value}'")]
pub struct UnknownValue {
    pub field: &'static str,
    pub value: String,
}

impl UnknownValue {
    pub fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }
}
