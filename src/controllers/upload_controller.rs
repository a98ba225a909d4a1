use axum::extract::Multipart;
use tracing::warn;

use crate::dto::upload_dto::UploadResponse;
use crate::services::ImageStorage;
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, AppError, AppResult};

/// Nombre del campo multipart con la imagen
const FILE_FIELD: &str = "file";

pub struct UploadController {
    images: ImageStorage,
}

fn multipart_error(error: axum::extract::multipart::MultipartError) -> AppError {
    warn!("📎 Multipart inválido: {}", error);
    AppError::BadRequest(format!("Formulario multipart inválido: {}", error.body_text()))
}

impl UploadController {
    pub fn new(state: &AppState) -> Self {
        Self {
            images: state.images.clone(),
        }
    }

    /// Lee el campo `file`, valida tipo y tamaño, y guarda la imagen
    pub async fn upload(&self, mut multipart: Multipart) -> AppResult<UploadResponse> {
        while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
            if field.name() != Some(FILE_FIELD) {
                continue;
            }

            self.images.check_content_type(field.content_type())?;
            let file_name = field.file_name().unwrap_or("image").to_string();

            let mut bytes = Vec::new();
            while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
                bytes.extend_from_slice(&chunk);
                self.images.check_size(bytes.len())?;
            }

            let image_url = self.images.store(&file_name, &bytes).await?;
            return Ok(UploadResponse {
                success: true,
                image_url,
            });
        }

        Err(bad_request_error("No se ha enviado ningún archivo"))
    }
}
