//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use validator::ValidationError;

/// Formatos de fecha/hora sin zona horaria aceptados (se interpretan en UTC)
const NAIVE_DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// Validar y convertir un string a fecha de reserva.
///
/// Acepta RFC3339, fecha/hora sin zona (UTC) o solo fecha (medianoche UTC).
pub fn parse_booking_datetime(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }

    let mut error = ValidationError::new("datetime");
    error.add_param("value".into(), &value.to_string());
    error.add_param("format".into(), &"RFC3339 | YYYY-MM-DDTHH:MM:SS | YYYY-MM-DD".to_string());
    Err(error)
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Máximo representable en las columnas NUMERIC(10,2) de precios y totales
pub fn max_amount() -> Decimal {
    Decimal::new(9_999_999_999, 2)
}

/// Variante para `#[validate(custom)]` sobre precios y totales: no negativo y
/// dentro de NUMERIC(10,2)
pub fn validate_amount(value: &Decimal) -> Result<(), ValidationError> {
    validate_non_negative(*value)?;
    if *value > max_amount() {
        let mut error = ValidationError::new("max_amount");
        error.add_param("value".into(), value);
        error.add_param("max".into(), &max_amount());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de teléfono (básico)
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    if !(6..=15).contains(&digits) {
        let mut error = ValidationError::new("phone");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_booking_datetime_date_only() {
        let dt = parse_booking_datetime("2024-06-01").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 6, 1));
        assert_eq!(dt.hour(), 0);
    }

    #[test]
    fn test_parse_booking_datetime_rfc3339() {
        let dt = parse_booking_datetime("2024-06-01T10:30:00-03:00").unwrap();
        assert_eq!(dt.hour(), 13);
        assert_eq!(dt.minute(), 30);

        let dt = parse_booking_datetime("2024-06-05T00:00:00.000Z").unwrap();
        assert_eq!(dt.day(), 5);
    }

    #[test]
    fn test_parse_booking_datetime_naive() {
        let dt = parse_booking_datetime("2024-06-01T09:15").unwrap();
        assert_eq!((dt.hour(), dt.minute()), (9, 15));

        let dt = parse_booking_datetime("2024-06-01 18:00:00").unwrap();
        assert_eq!(dt.hour(), 18);
    }

    #[test]
    fn test_parse_booking_datetime_invalid() {
        assert!(parse_booking_datetime("01/06/2024").is_err());
        assert!(parse_booking_datetime("").is_err());
        assert!(parse_booking_datetime("2024-13-01").is_err());
    }

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("Toyota").is_ok());
        assert!(validate_not_empty("   ").is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative(0).is_ok());
        assert!(validate_non_negative(5).is_ok());
        assert!(validate_non_negative(-1).is_err());
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(&Decimal::new(4500, 2)).is_ok());
        assert!(validate_amount(&Decimal::ZERO).is_ok());
        assert!(validate_amount(&max_amount()).is_ok());
        assert!(validate_amount(&Decimal::new(-1, 0)).is_err());
        assert!(validate_amount(&Decimal::new(100_000_000, 0)).is_err());
        assert!(validate_amount(&Decimal::from_i128_with_scale(10i128.pow(27), 0)).is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("+56 9 1234 5678").is_ok());
        assert!(validate_phone("123").is_err());
        assert!(validate_phone("1234567890123456").is_err());
    }
}
