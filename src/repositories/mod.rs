//! Repositorios
//!
//! Cada recurso tiene un trait de almacenamiento con dos implementaciones:
//! los repositorios PostgreSQL (autoritativos) y `MemoryStore`, un backend de
//! demostración que nunca comparte estado con la base de datos.

pub mod customer_repository;
pub mod memory;
pub mod reservation_repository;
pub mod vehicle_repository;

use async_trait::async_trait;

use crate::dto::customer_dto::{CreateCustomerRequest, UpdateCustomerRequest};
use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest};
use crate::models::{
    Customer, NewReservation, Reservation, ReservationChanges, ReservationFilter, ReservationStatus, Vehicle,
    VehicleFilter,
};
use crate::services::availability::DateRange;
use crate::utils::errors::AppResult;

pub use customer_repository::CustomerRepository;
pub use memory::MemoryStore;
pub use reservation_repository::ReservationRepository;
pub use vehicle_repository::VehicleRepository;

#[async_trait]
pub trait VehicleStore: Send + Sync {
    async fn list(&self, filter: &VehicleFilter) -> AppResult<Vec<Vehicle>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Vehicle>>;

    async fn find_by_ids(&self, ids: &[i32]) -> AppResult<Vec<Vehicle>>;

    async fn create(&self, request: &CreateVehicleRequest) -> AppResult<Vehicle>;

    /// `None` si el vehículo no existe
    async fn update(&self, id: i32, request: &UpdateVehicleRequest) -> AppResult<Option<Vehicle>>;

    /// `false` si no existe; `Conflict` si alguna reserva lo referencia
    async fn delete(&self, id: i32) -> AppResult<bool>;
}

#[async_trait]
pub trait CustomerStore: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Customer>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Customer>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Customer>>;

    /// `Conflict` si el email ya existe
    async fn create(&self, request: &CreateCustomerRequest) -> AppResult<Customer>;

    async fn update(&self, id: i32, request: &UpdateCustomerRequest) -> AppResult<Option<Customer>>;

    async fn delete(&self, id: i32) -> AppResult<bool>;
}

#[async_trait]
pub trait ReservationStore: Send + Sync {
    async fn list(&self, filter: &ReservationFilter) -> AppResult<Vec<Reservation>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Reservation>>;

    /// Ninguna reserva pending/active del vehículo solapa `range`.
    /// `exclude` omite una reserva (la que se está editando).
    async fn is_available(&self, vehicle_id: i32, range: &DateRange, exclude: Option<i32>) -> AppResult<bool>;

    /// Verifica disponibilidad e inserta de forma atómica por vehículo.
    /// `VehicleUnavailable` si el rango está ocupado, `NotFound` si el vehículo no existe.
    async fn create(&self, reservation: NewReservation) -> AppResult<Reservation>;

    /// Aplica cambios parciales. Con `recheck_availability` el nuevo rango se
    /// verifica en la misma transacción.
    async fn update(
        &self,
        id: i32,
        changes: &ReservationChanges,
        recheck_availability: bool,
    ) -> AppResult<Option<Reservation>>;

    /// Cambia el estado respetando el ciclo de vida; `Conflict` si la transición es ilegal
    async fn transition(&self, id: i32, status: ReservationStatus) -> AppResult<Option<Reservation>>;

    async fn delete(&self, id: i32) -> AppResult<bool>;
}
