//! Verificación de disponibilidad de vehículos
//!
//! Una reserva `pending` o `active` bloquea su vehículo durante su rango.
//! La comparación es inclusiva en ambos extremos: si un rango termina el mismo
//! instante en que empieza otro, se considera solapado (no hay entrega
//! "back-to-back" en el mismo instante).

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::repositories::ReservationStore;
use crate::utils::errors::{bad_request_error, AppResult};
use crate::utils::validation::max_amount;

/// Rango cerrado `[start, end]` de una reserva
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Igual que `new` pero rechaza rangos invertidos
    pub fn checked(start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<Self> {
        if start > end {
            return Err(bad_request_error("startDate debe ser anterior o igual a endDate"));
        }
        Ok(Self::new(start, end))
    }

    /// `self.start <= other.end AND self.end >= other.start`
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    /// Días facturables: redondeo hacia arriba, mínimo 1
    pub fn rental_days(&self) -> i64 {
        let seconds = (self.end - self.start).num_seconds().max(0);
        let day = Duration::days(1).num_seconds();
        ((seconds + day - 1) / day).max(1)
    }

    /// Total de la reserva para un precio por día.
    ///
    /// Falla con 400 si el total no cabe en NUMERIC(10,2).
    pub fn quote(&self, price_per_day: Decimal) -> AppResult<Decimal> {
        price_per_day
            .checked_mul(Decimal::from(self.rental_days()))
            .filter(|total| *total <= max_amount())
            .ok_or_else(|| bad_request_error("El total calculado excede el máximo permitido"))
    }
}

/// Fachada sobre el repositorio de reservas para consultar disponibilidad
#[derive(Clone)]
pub struct AvailabilityChecker {
    reservations: Arc<dyn ReservationStore>,
}

impl AvailabilityChecker {
    pub fn new(reservations: Arc<dyn ReservationStore>) -> Self {
        Self { reservations }
    }

    /// Disponible si ninguna reserva pending/active del vehículo solapa el rango
    pub async fn is_available(&self, vehicle_id: i32, range: DateRange) -> AppResult<bool> {
        let available = self.reservations.is_available(vehicle_id, &range, None).await?;
        debug!(
            "🔍 Disponibilidad vehículo {} [{} - {}]: {}",
            vehicle_id, range.start, range.end, available
        );
        Ok(available)
    }
}
