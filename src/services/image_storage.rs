//! Almacenamiento de imágenes de vehículos
//!
//! Guarda las imágenes subidas en el directorio de uploads y devuelve la URL
//! pública bajo `/uploads`.

use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

use crate::utils::errors::{bad_request_error, internal_error, AppError, AppResult};

/// Prefijo público de las imágenes subidas
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// Tipos MIME permitidos
pub const ALLOWED_CONTENT_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// 5 MiB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

lazy_static! {
    static ref UNSAFE_FILE_CHARS: Regex = Regex::new(r"[^a-zA-Z0-9.]").unwrap();
}

/// Reemplaza cualquier carácter fuera de `[a-zA-Z0-9.]` por `-`
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned = UNSAFE_FILE_CHARS.replace_all(base, "-").into_owned();
    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        "image".to_string()
    } else {
        cleaned
    }
}

#[derive(Debug, Clone)]
pub struct ImageStorage {
    root: PathBuf,
    max_bytes: usize,
}

impl ImageStorage {
    pub fn new(root: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            root: root.into(),
            max_bytes,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Verifica el tipo MIME declarado
    pub fn check_content_type(&self, content_type: Option<&str>) -> AppResult<()> {
        let allowed = content_type
            .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_lowercase())
            .map(|ct| ALLOWED_CONTENT_TYPES.contains(&ct.as_str()))
            .unwrap_or(false);

        if !allowed {
            return Err(bad_request_error("Tipo de archivo no permitido. Solo JPG, PNG o WEBP"));
        }
        Ok(())
    }

    /// Verifica que el tamaño acumulado no exceda el máximo
    pub fn check_size(&self, size: usize) -> AppResult<()> {
        if size > self.max_bytes {
            return Err(AppError::BadRequest(format!(
                "El archivo es demasiado grande. Máximo {}MB",
                self.max_bytes / (1024 * 1024)
            )));
        }
        Ok(())
    }

    /// Escribe el archivo con un nombre único y devuelve su URL pública
    pub async fn store(&self, original_name: &str, bytes: &[u8]) -> AppResult<String> {
        self.check_size(bytes.len())?;

        let unique = Uuid::new_v4().simple().to_string();
        let file_name = format!(
            "{}-{}-{}",
            Utc::now().timestamp_millis(),
            &unique[..8],
            sanitize_file_name(original_name)
        );

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| internal_error(&format!("Error creando directorio de uploads: {}", e)))?;
        tokio::fs::write(self.root.join(&file_name), bytes)
            .await
            .map_err(|e| internal_error(&format!("Error guardando archivo: {}", e)))?;

        info!("🖼️ Imagen guardada: {} ({} bytes)", file_name, bytes.len());
        Ok(format!("{}/{}", UPLOADS_URL_PREFIX, file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("mi auto (1).jpg"), "mi-auto--1-.jpg");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("cámara.png"), "c-mara.png");
        assert_eq!(sanitize_file_name(""), "image");
    }

    #[test]
    fn test_content_types() {
        let storage = ImageStorage::new("/tmp/unused", 5 * 1024 * 1024);
        assert!(storage.check_content_type(Some("image/png")).is_ok());
        assert!(storage.check_content_type(Some("IMAGE/JPEG")).is_ok());
        assert!(storage.check_content_type(Some("image/gif")).is_err());
        assert!(storage.check_content_type(None).is_err());
    }

    #[test]
    fn test_size_limit() {
        let storage = ImageStorage::new("/tmp/unused", 10);
        assert!(storage.check_size(10).is_ok());
        assert!(storage.check_size(11).is_err());
    }

    #[tokio::test]
    async fn test_store_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = ImageStorage::new(dir.path(), 1024);
        let url = storage.store("foto.png", b"\x89PNG").await.unwrap();
        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with("-foto.png"));

        let name = url.trim_start_matches("/uploads/");
        let written = std::fs::read(dir.path().join(name)).unwrap();
        assert_eq!(written, b"\x89PNG");
    }

    #[tokio::test]
    async fn test_store_reports_io_failure_as_internal() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("uploads");
        std::fs::write(&blocker, b"no es un directorio").unwrap();

        let storage = ImageStorage::new(&blocker, 1024);
        let err = storage.store("foto.png", b"\x89PNG").await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
