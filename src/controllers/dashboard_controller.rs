use chrono::{Datelike, Utc};
use rust_decimal::Decimal;

use crate::dto::dashboard_dto::DashboardStats;
use crate::models::{ReservationFilter, ReservationStatus, VehicleFilter};
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub struct DashboardController {
    state: AppState,
}

impl DashboardController {
    pub fn new(state: &AppState) -> Self {
        Self { state: state.clone() }
    }

    /// Resumen del panel de administración
    pub async fn stats(&self) -> AppResult<DashboardStats> {
        let vehicles = self.state.vehicles.list(&VehicleFilter::All).await?;
        let reservations = self.state.reservations.list(&ReservationFilter::All).await?;
        let customers = self.state.customers.list().await?;

        let now = Utc::now();
        let monthly_revenue: Decimal = reservations
            .iter()
            .filter(|r| r.created_at.year() == now.year() && r.created_at.month() == now.month())
            .map(|r| r.total)
            .sum();

        let count = |status: ReservationStatus| reservations.iter().filter(|r| r.status == status).count();

        Ok(DashboardStats {
            total_vehicles: vehicles.len(),
            available_vehicles: vehicles.iter().filter(|v| v.available).count(),
            pending_reservations: count(ReservationStatus::Pending),
            active_reservations: count(ReservationStatus::Active),
            monthly_revenue,
            total_customers: customers.len(),
        })
    }
}
