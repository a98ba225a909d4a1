//! DTOs de la API
//!
//! Tipos de request/response tal como viajan por HTTP (claves camelCase).

pub mod common_dto;
pub mod customer_dto;
pub mod dashboard_dto;
pub mod reservation_dto;
pub mod upload_dto;
pub mod vehicle_dto;
