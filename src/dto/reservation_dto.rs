use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Reservation, ReservationChanges, ReservationFilter, ReservationStatus, Vehicle};
use crate::utils::serde_helpers::{
    deserialize_datetime, deserialize_id, deserialize_optional_datetime, deserialize_optional_id,
};
use crate::utils::validation::{validate_amount, validate_not_empty};

// Request para crear una reserva
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    #[validate(length(min = 1, max = 255), custom = "validate_not_empty")]
    pub customer: String,

    #[validate(email, length(max = 255))]
    pub email: String,

    #[validate(length(min = 1, max = 50))]
    pub phone: String,

    #[serde(deserialize_with = "deserialize_id")]
    pub vehicle_id: i32,

    #[serde(deserialize_with = "deserialize_datetime")]
    pub start_date: DateTime<Utc>,

    #[serde(deserialize_with = "deserialize_datetime")]
    pub end_date: DateTime<Utc>,

    #[serde(default)]
    #[validate(length(max = 10))]
    pub pickup_time: String,

    #[serde(default)]
    #[validate(length(max = 10))]
    pub return_time: String,

    #[serde(default)]
    pub status: Option<ReservationStatus>,

    /// Si se omite, se calcula como precio por día × días
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[validate(custom = "validate_amount")]
    pub total: Option<Decimal>,
}

// Request para actualizar una reserva; los campos ausentes no cambian
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReservationRequest {
    #[validate(length(min = 1, max = 255), custom = "validate_not_empty")]
    pub customer: Option<String>,

    #[validate(email, length(max = 255))]
    pub email: Option<String>,

    #[validate(length(min = 1, max = 50))]
    pub phone: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub vehicle_id: Option<i32>,

    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub start_date: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub end_date: Option<DateTime<Utc>>,

    #[validate(length(max = 10))]
    pub pickup_time: Option<String>,

    #[validate(length(max = 10))]
    pub return_time: Option<String>,

    pub status: Option<ReservationStatus>,

    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[validate(custom = "validate_amount")]
    pub total: Option<Decimal>,
}

impl From<UpdateReservationRequest> for ReservationChanges {
    fn from(request: UpdateReservationRequest) -> Self {
        Self {
            customer: request.customer,
            email: request.email,
            phone: request.phone,
            vehicle_id: request.vehicle_id,
            start_date: request.start_date,
            end_date: request.end_date,
            pickup_time: request.pickup_time,
            return_time: request.return_time,
            status: request.status,
            total: request.total,
        }
    }
}

// Request de POST /api/reservations/check-availability.
// Todos opcionales para poder responder 400 con un mensaje propio.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckAvailabilityRequest {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub vehicle_id: Option<i32>,

    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub start_date: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub available: bool,
}

// Request de POST /api/reservations/transition
#[derive(Debug, Clone, Deserialize)]
pub struct TransitionRequest {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: i32,
    pub status: ReservationStatus,
}

// Reserva con el vehículo embebido
#[derive(Debug, Serialize)]
pub struct ReservationResponse {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub vehicle: Option<Vehicle>,
}

// Selectores de GET /api/reservations
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationQuery {
    pub id: Option<i32>,
    pub status: Option<ReservationStatus>,
    pub vehicle_id: Option<i32>,
}

impl ReservationQuery {
    pub fn filter(&self) -> ReservationFilter {
        match (self.status, self.vehicle_id) {
            (Some(status), _) => ReservationFilter::Status(status),
            (None, Some(vehicle_id)) => ReservationFilter::Vehicle(vehicle_id),
            (None, None) => ReservationFilter::All,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_from_booking_form() {
        let request: CreateReservationRequest = serde_json::from_value(json!({
            "customer": "Juan Soto",
            "email": "juan@example.com",
            "phone": "+56911112222",
            "vehicleId": "1",
            "startDate": "2024-06-01",
            "endDate": "2024-06-05",
            "pickupTime": "10:00",
            "returnTime": "10:00",
            "status": "pendiente",
            "total": 180
        }))
        .unwrap();

        assert_eq!(request.vehicle_id, 1);
        assert_eq!(request.status, Some(ReservationStatus::Pending));
        assert_eq!(request.total, Some(Decimal::new(180, 0)));
        assert!(request.start_date < request.end_date);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_unknown_status() {
        let result = serde_json::from_value::<CreateReservationRequest>(json!({
            "customer": "Juan",
            "email": "juan@example.com",
            "phone": "1",
            "vehicleId": 1,
            "startDate": "2024-06-01",
            "endDate": "2024-06-05",
            "status": "archivada"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_check_availability_allows_missing_fields() {
        let request: CheckAvailabilityRequest =
            serde_json::from_value(json!({ "vehicleId": 1 })).unwrap();
        assert_eq!(request.vehicle_id, Some(1));
        assert!(request.start_date.is_none());
        assert!(request.end_date.is_none());
    }

    #[test]
    fn test_update_into_changes() {
        let request: UpdateReservationRequest =
            serde_json::from_value(json!({ "status": "cancelada" })).unwrap();
        let changes = ReservationChanges::from(request);
        assert_eq!(changes.status, Some(ReservationStatus::Cancelled));
        assert!(changes.start_date.is_none());
    }

    #[test]
    fn test_query_filter() {
        let q = ReservationQuery { status: Some(ReservationStatus::Active), ..Default::default() };
        assert_eq!(q.filter(), ReservationFilter::Status(ReservationStatus::Active));
        let q = ReservationQuery { vehicle_id: Some(3), ..Default::default() };
        assert_eq!(q.filter(), ReservationFilter::Vehicle(3));
    }
}
