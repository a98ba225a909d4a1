//! Ciclo de vida de las reservas
//!
//! Valida los datos de entrada, completa lo que el cliente puede omitir
//! (estado, total, vínculo con el cliente) y delega en el store la parte
//! atómica: verificar disponibilidad e insertar.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

use crate::config::DateEditPolicy;
use crate::dto::reservation_dto::{
    AvailabilityResponse, CheckAvailabilityRequest, CreateReservationRequest, ReservationResponse,
    TransitionRequest, UpdateReservationRequest,
};
use crate::models::{NewReservation, Reservation, ReservationChanges, ReservationFilter, Vehicle};
use crate::repositories::{CustomerStore, ReservationStore, VehicleStore};
use crate::services::{AvailabilityChecker, DateRange};
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, not_found_error, AppResult};

pub struct ReservationController {
    reservations: Arc<dyn ReservationStore>,
    vehicles: Arc<dyn VehicleStore>,
    customers: Arc<dyn CustomerStore>,
    availability: AvailabilityChecker,
    date_edit_policy: DateEditPolicy,
}

impl ReservationController {
    pub fn new(state: &AppState) -> Self {
        Self {
            reservations: state.reservations.clone(),
            vehicles: state.vehicles.clone(),
            customers: state.customers.clone(),
            availability: state.availability(),
            date_edit_policy: state.config.date_edit_policy,
        }
    }

    async fn with_vehicle(&self, reservation: Reservation) -> AppResult<ReservationResponse> {
        let vehicle = self.vehicles.find_by_id(reservation.vehicle_id).await?;
        Ok(ReservationResponse { reservation, vehicle })
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<ReservationResponse> {
        let reservation = self
            .reservations
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Reservation", &id.to_string()))?;

        self.with_vehicle(reservation).await
    }

    /// Lista con el vehículo embebido; los vehículos se cargan en una sola consulta
    pub async fn list(&self, filter: &ReservationFilter) -> AppResult<Vec<ReservationResponse>> {
        let reservations = self.reservations.list(filter).await?;

        let mut ids: Vec<i32> = reservations.iter().map(|r| r.vehicle_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let vehicles: HashMap<i32, Vehicle> = self
            .vehicles
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|v| (v.id, v))
            .collect();

        Ok(reservations
            .into_iter()
            .map(|reservation| {
                let vehicle = vehicles.get(&reservation.vehicle_id).cloned();
                ReservationResponse { reservation, vehicle }
            })
            .collect())
    }

    pub async fn create(&self, request: CreateReservationRequest) -> AppResult<ReservationResponse> {
        request.validate()?;
        let range = DateRange::checked(request.start_date, request.end_date)?;

        let vehicle = self
            .vehicles
            .find_by_id(request.vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &request.vehicle_id.to_string()))?;

        let total = match request.total {
            Some(total) => total,
            None => range.quote(vehicle.price)?,
        };
        let customer_id = self.customers.find_by_email(&request.email).await?.map(|c| c.id);
        debug!(
            "🧾 Reserva para vehículo {}: {} día(s), total {}, cliente {:?}",
            vehicle.id,
            range.rental_days(),
            total,
            customer_id
        );

        let reservation = self
            .reservations
            .create(NewReservation {
                customer: request.customer,
                email: request.email,
                phone: request.phone,
                customer_id,
                vehicle_id: vehicle.id,
                range,
                pickup_time: request.pickup_time,
                return_time: request.return_time,
                status: request.status.unwrap_or_default(),
                total,
            })
            .await?;

        Ok(ReservationResponse {
            reservation,
            vehicle: Some(vehicle),
        })
    }

    pub async fn update(&self, id: i32, request: UpdateReservationRequest) -> AppResult<ReservationResponse> {
        request.validate()?;
        if let (Some(start), Some(end)) = (request.start_date, request.end_date) {
            DateRange::checked(start, end)?;
        }

        let changes: ReservationChanges = request.into();
        let reservation = self
            .reservations
            .update(id, &changes, self.date_edit_policy.rechecks())
            .await?
            .ok_or_else(|| not_found_error("Reservation", &id.to_string()))?;

        info!("✏️ Reserva {} actualizada", id);
        self.with_vehicle(reservation).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        if !self.reservations.delete(id).await? {
            return Err(not_found_error("Reservation", &id.to_string()));
        }
        info!("🗑️ Reserva {} eliminada", id);
        Ok(())
    }

    pub async fn transition(&self, request: TransitionRequest) -> AppResult<ReservationResponse> {
        let reservation = self
            .reservations
            .transition(request.id, request.status)
            .await?
            .ok_or_else(|| not_found_error("Reservation", &request.id.to_string()))?;

        self.with_vehicle(reservation).await
    }

    pub async fn check_availability(&self, request: CheckAvailabilityRequest) -> AppResult<AvailabilityResponse> {
        let (Some(vehicle_id), Some(start), Some(end)) = (request.vehicle_id, request.start_date, request.end_date)
        else {
            return Err(bad_request_error("vehicleId, startDate y endDate son requeridos"));
        };

        // Sin validación de orden: devuelve el predicado tal cual
        let range = DateRange::new(start, end);
        let available = self.availability.is_available(vehicle_id, range).await?;
        Ok(AvailabilityResponse { available })
    }
}
