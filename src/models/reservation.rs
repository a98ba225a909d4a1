//! Modelo de Reservation
//!
//! Este módulo contiene la reserva, su ciclo de vida (`ReservationStatus`)
//! y los datos de entrada ya validados que consumen los repositorios.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use super::UnknownValue;
use crate::services::availability::DateRange;
use crate::utils::errors::{AppError, AppResult};

/// Estado de la reserva.
///
/// `pending -> active -> completed`, y `pending|active -> cancelled`.
/// `completed` y `cancelled` son terminales.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    #[serde(alias = "pendiente")]
    Pending,
    #[serde(alias = "activa")]
    Active,
    #[serde(alias = "completada")]
    Completed,
    #[serde(alias = "cancelada")]
    Cancelled,
}

impl ReservationStatus {
    /// Estados que ocupan el vehículo
    pub const BLOCKING: [ReservationStatus; 2] = [ReservationStatus::Pending, ReservationStatus::Active];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Active => "active",
            ReservationStatus::Completed => "completed",
            ReservationStatus::Cancelled => "cancelled",
        }
    }

    pub fn blocks_vehicle(&self) -> bool {
        Self::BLOCKING.contains(self)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ReservationStatus::Completed | ReservationStatus::Cancelled)
    }

    /// Transiciones legales del ciclo de vida. Repetir el estado actual es un no-op válido.
    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;

        if *self == next {
            return true;
        }
        matches!(
            (self, next),
            (Pending, Active) | (Pending, Cancelled) | (Active, Completed) | (Active, Cancelled)
        )
    }

    /// `can_transition_to` como error 409 listo para devolver
    pub fn check_transition(&self, next: ReservationStatus) -> AppResult<()> {
        if self.can_transition_to(next) {
            return Ok(());
        }
        let message = if self.is_terminal() {
            format!("La reserva ya está {} y no admite más cambios de estado", self)
        } else {
            format!("Transición de estado no permitida: {} -> {}", self, next)
        };
        Err(AppError::Conflict(message))
    }
}

impl Default for ReservationStatus {
    fn default() -> Self {
        ReservationStatus::Pending
    }
}

impl FromStr for ReservationStatus {
    type Err = UnknownValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "pending" | "pendiente" => Ok(ReservationStatus::Pending),
            "active" | "activa" => Ok(ReservationStatus::Active),
            "completed" | "completada" => Ok(ReservationStatus::Completed),
            "cancelled" | "canceled" | "cancelada" => Ok(ReservationStatus::Cancelled),
            _ => Err(UnknownValue::new("status", value)),
        }
    }
}

impl TryFrom<String> for ReservationStatus {
    type Error = UnknownValue;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reservation principal - mapea exactamente a la tabla reservations.
///
/// `customer`, `email` y `phone` son una copia del contacto tomada al reservar,
/// no datos vivos del cliente.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: i32,
    pub customer: String,
    pub email: String,
    pub phone: String,
    pub customer_id: Option<i32>,
    pub vehicle_id: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub pickup_time: String,
    pub return_time: String,
    #[sqlx(try_from = "String")]
    pub status: ReservationStatus,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    pub fn range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }

    /// Verdadero si esta reserva impide reservar `range` del mismo vehículo
    pub fn blocks(&self, vehicle_id: i32, range: &DateRange) -> bool {
        self.vehicle_id == vehicle_id && self.status.blocks_vehicle() && self.range().overlaps(range)
    }
}

/// Datos validados para insertar una reserva
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub customer: String,
    pub email: String,
    pub phone: String,
    pub customer_id: Option<i32>,
    pub vehicle_id: i32,
    pub range: DateRange,
    pub pickup_time: String,
    pub return_time: String,
    pub status: ReservationStatus,
    pub total: Decimal,
}

/// Cambios parciales sobre una reserva; `None` conserva el valor actual
#[derive(Debug, Clone, Default)]
pub struct ReservationChanges {
    pub customer: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub vehicle_id: Option<i32>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub pickup_time: Option<String>,
    pub return_time: Option<String>,
    pub status: Option<ReservationStatus>,
    pub total: Option<Decimal>,
}

impl ReservationChanges {
    /// Aplica los cambios sobre una copia de la reserva
    pub fn apply_to(&self, current: &Reservation) -> Reservation {
        let mut updated = current.clone();
        if let Some(customer) = &self.customer {
            updated.customer = customer.clone();
        }
        if let Some(email) = &self.email {
            updated.email = email.clone();
        }
        if let Some(phone) = &self.phone {
            updated.phone = phone.clone();
        }
        if let Some(vehicle_id) = self.vehicle_id {
            updated.vehicle_id = vehicle_id;
        }
        if let Some(start_date) = self.start_date {
            updated.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            updated.end_date = end_date;
        }
        if let Some(pickup_time) = &self.pickup_time {
            updated.pickup_time = pickup_time.clone();
        }
        if let Some(return_time) = &self.return_time {
            updated.return_time = return_time.clone();
        }
        if let Some(status) = self.status {
            updated.status = status;
        }
        if let Some(total) = self.total {
            updated.total = total;
        }
        updated
    }

    /// Verdadero si el cambio puede ocupar un rango distinto del actual
    pub fn touches_booking(&self) -> bool {
        self.vehicle_id.is_some()
            || self.start_date.is_some()
            || self.end_date.is_some()
            || self.status.map(|s| s.blocks_vehicle()).unwrap_or(false)
    }
}

/// Filtros de listado de reservas
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ReservationFilter {
    #[default]
    All,
    Status(ReservationStatus),
    Vehicle(i32),
}

#[cfg(test)]
mod tests {
    use super::*;
    use ReservationStatus::*;

    #[test]
    fn test_status_parsing_accepts_legacy_values() {
        assert_eq!("pendiente".parse::<ReservationStatus>().unwrap(), Pending);
        assert_eq!("ACTIVE".parse::<ReservationStatus>().unwrap(), Active);
        assert_eq!("completada".parse::<ReservationStatus>().unwrap(), Completed);
        assert_eq!("cancelada".parse::<ReservationStatus>().unwrap(), Cancelled);
        assert!("archived".parse::<ReservationStatus>().is_err());
    }

    #[test]
    fn test_status_serde() {
        let s: ReservationStatus = serde_json::from_str("\"activa\"").unwrap();
        assert_eq!(s, Active);
        assert_eq!(serde_json::to_string(&Cancelled).unwrap(), "\"cancelled\"");
        assert!(serde_json::from_str::<ReservationStatus>("\"whatever\"").is_err());
    }

    #[test]
    fn test_only_pending_and_active_block() {
        assert!(Pending.blocks_vehicle());
        assert!(Active.blocks_vehicle());
        assert!(!Completed.blocks_vehicle());
        assert!(!Cancelled.blocks_vehicle());
    }

    #[test]
    fn test_transitions() {
        assert!(Pending.can_transition_to(Active));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Active.can_transition_to(Completed));
        assert!(Active.can_transition_to(Cancelled));
        assert!(Cancelled.can_transition_to(Cancelled));

        assert!(!Pending.can_transition_to(Completed));
        assert!(!Active.can_transition_to(Pending));
        assert!(!Completed.can_transition_to(Active));
        assert!(!Cancelled.can_transition_to(Pending));
        assert!(Completed.is_terminal() && Cancelled.is_terminal());
    }

    #[test]
    fn test_check_transition_messages() {
        assert!(Pending.check_transition(Active).is_ok());

        match Pending.check_transition(Completed) {
            Err(AppError::Conflict(message)) => assert!(message.contains("pending -> completed")),
            other => panic!("unexpected: {:?}", other),
        }
        match Cancelled.check_transition(Active) {
            Err(AppError::Conflict(message)) => assert!(message.contains("ya está cancelled")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_touches_booking() {
        assert!(!ReservationChanges::default().touches_booking());

        let changes = ReservationChanges { phone: Some("555".into()), ..Default::default() };
        assert!(!changes.touches_booking());

        let changes = ReservationChanges { status: Some(Cancelled), ..Default::default() };
        assert!(!changes.touches_booking());

        let changes = ReservationChanges { status: Some(Active), ..Default::default() };
        assert!(changes.touches_booking());

        let changes = ReservationChanges { end_date: Some(Utc::now()), ..Default::default() };
        assert!(changes.touches_booking());
    }
}
