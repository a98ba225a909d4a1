use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::models::vehicle::{FuelType, Transmission, VehicleFilter};
use crate::utils::validation::{validate_amount, validate_not_empty};

// Request para crear un vehículo
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleRequest {
    #[validate(length(min = 1, max = 255), custom = "validate_not_empty")]
    pub name: String,

    #[validate(length(min = 1, max = 50), custom = "validate_not_empty")]
    pub category: String,

    #[serde(default)]
    pub description: String,

    #[validate(range(min = 1900, max = 2100))]
    pub year: i32,

    #[serde(default)]
    #[validate(length(max = 50))]
    pub color: String,

    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom = "validate_amount")]
    pub price: Decimal,

    #[validate(range(min = 0))]
    pub passengers: i32,

    #[validate(range(min = 0))]
    pub luggage: i32,

    pub transmission: Transmission,

    pub fuel: FuelType,

    #[validate(range(min = 0))]
    pub doors: i32,

    #[serde(default)]
    pub features: String,

    #[serde(default)]
    #[validate(length(max = 500))]
    pub image: String,

    #[serde(default)]
    pub available: Option<bool>,
}

// Request para actualizar un vehículo; los campos ausentes no cambian
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehicleRequest {
    #[validate(length(min = 1, max = 255), custom = "validate_not_empty")]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 50), custom = "validate_not_empty")]
    pub category: Option<String>,

    pub description: Option<String>,

    #[validate(range(min = 1900, max = 2100))]
    pub year: Option<i32>,

    #[validate(length(max = 50))]
    pub color: Option<String>,

    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[validate(custom = "validate_amount")]
    pub price: Option<Decimal>,

    #[validate(range(min = 0))]
    pub passengers: Option<i32>,

    #[validate(range(min = 0))]
    pub luggage: Option<i32>,

    pub transmission: Option<Transmission>,

    pub fuel: Option<FuelType>,

    #[validate(range(min = 0))]
    pub doors: Option<i32>,

    pub features: Option<String>,

    #[validate(length(max = 500))]
    pub image: Option<String>,

    pub available: Option<bool>,
}

// Selectores de GET /api/vehicles
#[derive(Debug, Default, Deserialize)]
pub struct VehicleQuery {
    pub id: Option<i32>,
    pub available: Option<bool>,
    pub category: Option<String>,
}

impl VehicleQuery {
    pub fn filter(&self) -> VehicleFilter {
        match (&self.category, self.available) {
            (Some(category), _) if !category.trim().is_empty() => {
                VehicleFilter::Category(category.trim().to_string())
            }
            (_, Some(true)) => VehicleFilter::Available,
            _ => VehicleFilter::All,
        }
    }
}
