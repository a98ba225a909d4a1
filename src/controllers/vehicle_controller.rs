use std::sync::Arc;
use tracing::info;
use validator::Validate;

use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest};
use crate::models::{Vehicle, VehicleFilter};
use crate::repositories::VehicleStore;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppResult};

pub struct VehicleController {
    vehicles: Arc<dyn VehicleStore>,
}

impl VehicleController {
    pub fn new(state: &AppState) -> Self {
        Self {
            vehicles: state.vehicles.clone(),
        }
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Vehicle> {
        self.vehicles
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))
    }

    pub async fn list(&self, filter: &VehicleFilter) -> AppResult<Vec<Vehicle>> {
        self.vehicles.list(filter).await
    }

    pub async fn create(&self, request: CreateVehicleRequest) -> AppResult<Vehicle> {
        request.validate()?;

        let vehicle = self.vehicles.create(&request).await?;
        info!("🚗 Vehículo creado: {} ({})", vehicle.name, vehicle.id);
        Ok(vehicle)
    }

    pub async fn update(&self, id: i32, request: UpdateVehicleRequest) -> AppResult<Vehicle> {
        request.validate()?;

        self.vehicles
            .update(id, &request)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        if !self.vehicles.delete(id).await? {
            return Err(not_found_error("Vehicle", &id.to_string()));
        }
        info!("🗑️ Vehículo {} eliminado", id);
        Ok(())
    }
}
