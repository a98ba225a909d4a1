use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::controllers::reservation_controller::ReservationController;
use crate::dto::common_dto::{IdQuery, MessageResponse, OneOrMany};
use crate::dto::reservation_dto::{
    AvailabilityResponse, CheckAvailabilityRequest, CreateReservationRequest, ReservationQuery,
    ReservationResponse, TransitionRequest, UpdateReservationRequest,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_reservation_router() -> Router<AppState> {
    Router::new()
        .route(
            "/reservations",
            get(get_reservations)
                .post(create_reservation)
                .put(update_reservation)
                .delete(delete_reservation),
        )
        .route("/reservations/check-availability", post(check_availability))
        .route("/reservations/transition", post(transition_reservation))
}

async fn get_reservations(
    State(state): State<AppState>,
    query: Result<Query<ReservationQuery>, QueryRejection>,
) -> Result<Json<OneOrMany<ReservationResponse>>, AppError> {
    let Query(query) = query?;
    let controller = ReservationController::new(&state);

    match query.id {
        Some(id) => Ok(Json(OneOrMany::One(controller.get_by_id(id).await?))),
        None => Ok(Json(OneOrMany::Many(controller.list(&query.filter()).await?))),
    }
}

async fn create_reservation(
    State(state): State<AppState>,
    payload: Result<Json<CreateReservationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ReservationResponse>), AppError> {
    let Json(request) = payload?;
    let reservation = ReservationController::new(&state).create(request).await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

async fn update_reservation(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
    payload: Result<Json<UpdateReservationRequest>, JsonRejection>,
) -> Result<Json<ReservationResponse>, AppError> {
    let id = query?.require()?;
    let Json(request) = payload?;
    let reservation = ReservationController::new(&state).update(id, request).await?;
    Ok(Json(reservation))
}

async fn delete_reservation(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = query?.require()?;
    ReservationController::new(&state).delete(id).await?;
    Ok(Json(MessageResponse::new("Reserva eliminada exitosamente")))
}

async fn check_availability(
    State(state): State<AppState>,
    payload: Result<Json<CheckAvailabilityRequest>, JsonRejection>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let Json(request) = payload?;
    let response = ReservationController::new(&state).check_availability(request).await?;
    Ok(Json(response))
}

async fn transition_reservation(
    State(state): State<AppState>,
    payload: Result<Json<TransitionRequest>, JsonRejection>,
) -> Result<Json<ReservationResponse>, AppError> {
    let Json(request) = payload?;
    let reservation = ReservationController::new(&state).transition(request).await?;
    Ok(Json(reservation))
}
