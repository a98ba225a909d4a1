//! Backend de renta de autos
//!
//! Catálogo de vehículos, clientes y reservas con verificación de
//! disponibilidad, expuesto como API JSON sobre Axum.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
