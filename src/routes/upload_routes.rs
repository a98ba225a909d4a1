use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};

use crate::controllers::upload_controller::UploadController;
use crate::dto::upload_dto::UploadResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// El límite del body deja margen sobre el máximo de imagen para que un
/// archivo demasiado grande llegue al controlador y reciba un 400.
pub fn create_upload_router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload_image))
        .layer(DefaultBodyLimit::max(max_upload_bytes.saturating_mul(2)))
}

async fn upload_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let response = UploadController::new(&state).upload(multipart).await?;
    Ok(Json(response))
}
