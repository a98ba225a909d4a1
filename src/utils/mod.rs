//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación
//! y deserialización de payloads.

pub mod errors;
pub mod serde_helpers;
pub mod validation;
