//! Helpers de deserialización para los payloads JSON
//!
//! El frontend envía fechas como `YYYY-MM-DD` o ISO y a veces ids como string,
//! así que se aceptan ambas formas.

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer};

use super::validation::parse_booking_datetime;

#[derive(Deserialize)]
#[serde(untagged)]
enum IdInput {
    Number(i64),
    Text(String),
}

fn id_from_input<E: de::Error>(input: IdInput) -> Result<i32, E> {
    let value = match input {
        IdInput::Number(n) => n,
        IdInput::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| E::custom(format!("invalid id '{}'", s)))?,
    };
    i32::try_from(value)
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| E::custom(format!("id out of range: {}", value)))
}

/// Fecha obligatoria en cualquiera de los formatos aceptados
pub fn deserialize_datetime<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_booking_datetime(&raw).map_err(|_| de::Error::custom(format!("invalid date '{}'", raw)))
}

/// Fecha opcional; `null` o ausente se traduce en `None`
pub fn deserialize_optional_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => parse_booking_datetime(&raw)
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid date '{}'", raw))),
        _ => Ok(None),
    }
}

/// Id obligatorio, numérico o string numérico
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    id_from_input(IdInput::deserialize(deserializer)?)
}

/// Id opcional, numérico o string numérico
pub fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<IdInput>::deserialize(deserializer)?
        .map(id_from_input)
        .transpose()
}
