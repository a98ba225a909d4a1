use serde::{Deserialize, Serialize};

use crate::utils::errors::{bad_request_error, AppResult};

// Respuesta de operaciones sin payload (DELETE)
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// Selector `?id=` obligatorio de PUT/DELETE
#[derive(Debug, Default, Deserialize)]
pub struct IdQuery {
    pub id: Option<i32>,
}

impl IdQuery {
    pub fn require(&self) -> AppResult<i32> {
        self.id.ok_or_else(|| bad_request_error("El parámetro id es requerido"))
    }
}

// GET con `?id=` devuelve un objeto; sin selector, una lista
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}
