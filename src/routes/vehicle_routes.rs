use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::common_dto::{IdQuery, MessageResponse, OneOrMany};
use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest, VehicleQuery};
use crate::models::Vehicle;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new().route(
        "/vehicles",
        get(get_vehicles)
            .post(create_vehicle)
            .put(update_vehicle)
            .delete(delete_vehicle),
    )
}

async fn get_vehicles(
    State(state): State<AppState>,
    query: Result<Query<VehicleQuery>, QueryRejection>,
) -> Result<Json<OneOrMany<Vehicle>>, AppError> {
    let Query(query) = query?;
    let controller = VehicleController::new(&state);

    match query.id {
        Some(id) => Ok(Json(OneOrMany::One(controller.get_by_id(id).await?))),
        None => Ok(Json(OneOrMany::Many(controller.list(&query.filter()).await?))),
    }
}

async fn create_vehicle(
    State(state): State<AppState>,
    payload: Result<Json<CreateVehicleRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Vehicle>), AppError> {
    let Json(request) = payload?;
    let vehicle = VehicleController::new(&state).create(request).await?;
    Ok((StatusCode::CREATED, Json(vehicle)))
}

async fn update_vehicle(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
    payload: Result<Json<UpdateVehicleRequest>, JsonRejection>,
) -> Result<Json<Vehicle>, AppError> {
    let id = query?.require()?;
    let Json(request) = payload?;
    let vehicle = VehicleController::new(&state).update(id, request).await?;
    Ok(Json(vehicle))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = query?.require()?;
    VehicleController::new(&state).delete(id).await?;
    Ok(Json(MessageResponse::new("Vehículo eliminado exitosamente")))
}
