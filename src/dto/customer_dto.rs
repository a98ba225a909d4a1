use serde::Deserialize;
use validator::Validate;

use crate::utils::validation::{validate_not_empty, validate_phone};

// Request para crear un cliente
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, max = 255), custom = "validate_not_empty")]
    pub name: String,

    #[validate(email, length(max = 255))]
    pub email: String,

    #[validate(length(max = 50), custom = "validate_phone")]
    pub phone: String,

    pub address: Option<String>,

    #[validate(length(max = 100))]
    pub city: Option<String>,

    #[validate(length(max = 100))]
    pub country: Option<String>,
}

// Request para actualizar un cliente
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerRequest {
    #[validate(length(min = 1, max = 255), custom = "validate_not_empty")]
    pub name: Option<String>,

    #[validate(email, length(max = 255))]
    pub email: Option<String>,

    #[validate(length(max = 50), custom = "validate_phone")]
    pub phone: Option<String>,

    pub address: Option<String>,

    #[validate(length(max = 100))]
    pub city: Option<String>,

    #[validate(length(max = 100))]
    pub country: Option<String>,
}

// Selectores de GET /api/customers
#[derive(Debug, Default, Deserialize)]
pub struct CustomerQuery {
    pub id: Option<i32>,
    pub email: Option<String>,
}
