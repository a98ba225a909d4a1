use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::controllers::customer_controller::CustomerController;
use crate::dto::common_dto::{IdQuery, MessageResponse, OneOrMany};
use crate::dto::customer_dto::{CreateCustomerRequest, CustomerQuery, UpdateCustomerRequest};
use crate::models::Customer;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_customer_router() -> Router<AppState> {
    Router::new().route(
        "/customers",
        get(get_customers)
            .post(create_customer)
            .put(update_customer)
            .delete(delete_customer),
    )
}

async fn get_customers(
    State(state): State<AppState>,
    query: Result<Query<CustomerQuery>, QueryRejection>,
) -> Result<Json<OneOrMany<Customer>>, AppError> {
    let Query(query) = query?;
    let controller = CustomerController::new(&state);

    if let Some(id) = query.id {
        return Ok(Json(OneOrMany::One(controller.get_by_id(id).await?)));
    }
    if let Some(email) = query.email.as_deref().filter(|e| !e.is_empty()) {
        return Ok(Json(OneOrMany::One(controller.get_by_email(email).await?)));
    }
    Ok(Json(OneOrMany::Many(controller.list().await?)))
}

async fn create_customer(
    State(state): State<AppState>,
    payload: Result<Json<CreateCustomerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Customer>), AppError> {
    let Json(request) = payload?;
    let customer = CustomerController::new(&state).create(request).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

async fn update_customer(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
    payload: Result<Json<UpdateCustomerRequest>, JsonRejection>,
) -> Result<Json<Customer>, AppError> {
    let id = query?.require()?;
    let Json(request) = payload?;
    let customer = CustomerController::new(&state).update(id, request).await?;
    Ok(Json(customer))
}

async fn delete_customer(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = query?.require()?;
    CustomerController::new(&state).delete(id).await?;
    Ok(Json(MessageResponse::new("Cliente eliminado exitosamente")))
}
