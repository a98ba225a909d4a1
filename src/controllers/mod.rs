//! Controladores
//!
//! Lógica de cada recurso entre las rutas HTTP y los stores.

pub mod customer_controller;
pub mod dashboard_controller;
pub mod reservation_controller;
pub mod upload_controller;
pub mod vehicle_controller;
