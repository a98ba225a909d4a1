//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y los enums de transmisión y combustible.
//! Mapea exactamente a la tabla `vehicles` con primary key `id`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use super::UnknownValue;

/// Tipo de transmisión
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Transmission {
    Manual,
    #[serde(alias = "automatico", alias = "automático")]
    Automatic,
}

impl Transmission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transmission::Manual => "manual",
            Transmission::Automatic => "automatic",
        }
    }
}

impl FromStr for Transmission {
    type Err = UnknownValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "manual" => Ok(Transmission::Manual),
            "automatic" | "automatico" | "automático" => Ok(Transmission::Automatic),
            _ => Err(UnknownValue::new("transmission", value)),
        }
    }
}

impl TryFrom<String> for Transmission {
    type Error = UnknownValue;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Transmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tipo de combustible
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    #[serde(alias = "gasolina")]
    Gasoline,
    Diesel,
    #[serde(alias = "hibrido", alias = "híbrido")]
    Hybrid,
    #[serde(alias = "electrico", alias = "eléctrico")]
    Electric,
}

impl FuelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FuelType::Gasoline => "gasoline",
            FuelType::Diesel => "diesel",
            FuelType::Hybrid => "hybrid",
            FuelType::Electric => "electric",
        }
    }
}

impl FromStr for FuelType {
    type Err = UnknownValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "gasoline" | "gasolina" => Ok(FuelType::Gasoline),
            "diesel" => Ok(FuelType::Diesel),
            "hybrid" | "hibrido" | "híbrido" => Ok(FuelType::Hybrid),
            "electric" | "electrico" | "eléctrico" => Ok(FuelType::Electric),
            _ => Err(UnknownValue::new("fuel", value)),
        }
    }
}

impl TryFrom<String> for FuelType {
    type Error = UnknownValue;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: i32,
    pub name: String,
    pub category: String,
    pub description: String,
    pub year: i32,
    pub color: String,
    /// Precio por día
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub passengers: i32,
    pub luggage: i32,
    #[sqlx(try_from = "String")]
    pub transmission: Transmission,
    #[sqlx(try_from = "String")]
    pub fuel: FuelType,
    pub doors: i32,
    /// Lista separada por comas
    pub features: String,
    pub image: String,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    /// Características como lista, sin entradas vacías
    pub fn feature_list(&self) -> Vec<&str> {
        self.features
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .collect()
    }
}

/// Filtros de listado de vehículos
#[derive(Debug, Clone, Default, PartialEq)]
pub enum VehicleFilter {
    #[default]
    All,
    /// Solo disponibles, ordenados por precio ascendente
    Available,
    /// Disponibles de una categoría, ordenados por precio ascendente
    Category(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transmission_accepts_legacy_spelling() {
        assert_eq!("automatico".parse::<Transmission>().unwrap(), Transmission::Automatic);
        assert_eq!("Manual".parse::<Transmission>().unwrap(), Transmission::Manual);
        assert!("cvt".parse::<Transmission>().is_err());

        let t: Transmission = serde_json::from_str("\"automatico\"").unwrap();
        assert_eq!(t, Transmission::Automatic);
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"automatic\"");
    }

    #[test]
    fn test_fuel_accepts_legacy_spelling() {
        assert_eq!("gasolina".parse::<FuelType>().unwrap(), FuelType::Gasoline);
        assert_eq!("eléctrico".parse::<FuelType>().unwrap(), FuelType::Electric);
        assert!("kerosene".parse::<FuelType>().is_err());

        let f: FuelType = serde_json::from_str("\"hibrido\"").unwrap();
        assert_eq!(f, FuelType::Hybrid);
    }

    #[test]
    fn test_feature_list() {
        let now = Utc::now();
        let vehicle = Vehicle {
            id: 1,
            name: "Toyota Corolla 2024".into(),
            category: "sedan".into(),
            description: String::new(),
            year: 2024,
            color: "Plateado".into(),
            price: Decimal::new(45, 0),
            passengers: 5,
            luggage: 3,
            transmission: Transmission::Automatic,
            fuel: FuelType::Gasoline,
            doors: 4,
            features: "Bluetooth, , USB ,Cámara Trasera".into(),
            image: String::new(),
            available: true,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(vehicle.feature_list(), vec!["Bluetooth", "USB", "Cámara Trasera"]);
    }
}
