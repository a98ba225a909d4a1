//! Backend en memoria
//!
//! Reemplaza al antiguo catálogo guardado en el navegador: sirve para demos y
//! desarrollo sin PostgreSQL. Aplica las mismas reglas que los repositorios SQL
//! (solapamiento, bloqueo de borrado, email único) y nunca se mezcla con la base
//! de datos. Un único `RwLock` serializa todas las escrituras, así que verificar
//! disponibilidad e insertar es atómico.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{CustomerStore, ReservationStore, VehicleStore};
use crate::dto::customer_dto::{CreateCustomerRequest, UpdateCustomerRequest};
use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest};
use crate::models::{
    Customer, FuelType, NewReservation, Reservation, ReservationChanges, ReservationFilter, ReservationStatus,
    Transmission, Vehicle, VehicleFilter,
};
use crate::services::availability::DateRange;
use crate::utils::errors::{bad_request_error, not_found_error, AppError, AppResult};

#[derive(Debug, Default)]
struct MemoryState {
    vehicles: BTreeMap<i32, Vehicle>,
    customers: BTreeMap<i32, Customer>,
    reservations: BTreeMap<i32, Reservation>,
    next_vehicle_id: i32,
    next_customer_id: i32,
    next_reservation_id: i32,
}

impl MemoryState {
    fn next_id(counter: &mut i32) -> i32 {
        *counter += 1;
        *counter
    }

    fn has_overlap(&self, vehicle_id: i32, range: &DateRange, exclude: Option<i32>) -> bool {
        self.reservations
            .values()
            .filter(|r| Some(r.id) != exclude)
            .any(|r| r.blocks(vehicle_id, range))
    }

    fn email_taken(&self, email: &str, except: Option<i32>) -> bool {
        self.customers
            .values()
            .any(|c| c.email == email && Some(c.id) != except)
    }
}

fn unavailable(vehicle_id: i32) -> AppError {
    AppError::VehicleUnavailable(format!(
        "El vehículo {} no está disponible en esas fechas",
        vehicle_id
    ))
}

fn duplicate_email(email: &str) -> AppError {
    AppError::Conflict(format!("Ya existe un cliente con el email '{}'", email))
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    /// Store vacío
    pub fn new() -> Self {
        Self::default()
    }

    /// Store con la flota de demostración (ids 1..=6)
    pub fn with_demo_fleet() -> Self {
        let now = Utc::now();
        let mut state = MemoryState::default();
        for vehicle in demo_fleet() {
            let id = MemoryState::next_id(&mut state.next_vehicle_id);
            state.vehicles.insert(
                id,
                Vehicle {
                    id,
                    created_at: now,
                    updated_at: now,
                    ..vehicle
                },
            );
        }
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }
}

#[async_trait]
impl VehicleStore for MemoryStore {
    async fn list(&self, filter: &VehicleFilter) -> AppResult<Vec<Vehicle>> {
        let state = self.state.read().await;
        let mut vehicles: Vec<Vehicle> = state
            .vehicles
            .values()
            .filter(|v| match filter {
                VehicleFilter::All => true,
                VehicleFilter::Available => v.available,
                VehicleFilter::Category(category) => v.available && &v.category == category,
            })
            .cloned()
            .collect();

        match filter {
            VehicleFilter::All => vehicles.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id))),
            _ => vehicles.sort_by(|a, b| a.price.cmp(&b.price).then(a.id.cmp(&b.id))),
        }
        Ok(vehicles)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Vehicle>> {
        Ok(self.state.read().await.vehicles.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[i32]) -> AppResult<Vec<Vehicle>> {
        let state = self.state.read().await;
        Ok(ids.iter().filter_map(|id| state.vehicles.get(id).cloned()).collect())
    }

    async fn create(&self, request: &CreateVehicleRequest) -> AppResult<Vehicle> {
        let mut state = self.state.write().await;
        let id = MemoryState::next_id(&mut state.next_vehicle_id);
        let now = Utc::now();
        let vehicle = Vehicle {
            id,
            name: request.name.clone(),
            category: request.category.clone(),
            description: request.description.clone(),
            year: request.year,
            color: request.color.clone(),
            price: request.price,
            passengers: request.passengers,
            luggage: request.luggage,
            transmission: request.transmission,
            fuel: request.fuel,
            doors: request.doors,
            features: request.features.clone(),
            image: request.image.clone(),
            available: request.available.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        state.vehicles.insert(id, vehicle.clone());
        Ok(vehicle)
    }

    async fn update(&self, id: i32, request: &UpdateVehicleRequest) -> AppResult<Option<Vehicle>> {
        let mut state = self.state.write().await;
        let Some(vehicle) = state.vehicles.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = &request.name {
            vehicle.name = name.clone();
        }
        if let Some(category) = &request.category {
            vehicle.category = category.clone();
        }
        if let Some(description) = &request.description {
            vehicle.description = description.clone();
        }
        if let Some(year) = request.year {
            vehicle.year = year;
        }
        if let Some(color) = &request.color {
            vehicle.color = color.clone();
        }
        if let Some(price) = request.price {
            vehicle.price = price;
        }
        if let Some(passengers) = request.passengers {
            vehicle.passengers = passengers;
        }
        if let Some(luggage) = request.luggage {
            vehicle.luggage = luggage;
        }
        if let Some(transmission) = request.transmission {
            vehicle.transmission = transmission;
        }
        if let Some(fuel) = request.fuel {
            vehicle.fuel = fuel;
        }
        if let Some(doors) = request.doors {
            vehicle.doors = doors;
        }
        if let Some(features) = &request.features {
            vehicle.features = features.clone();
        }
        if let Some(image) = &request.image {
            vehicle.image = image.clone();
        }
        if let Some(available) = request.available {
            vehicle.available = available;
        }
        vehicle.updated_at = Utc::now();

        Ok(Some(vehicle.clone()))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let mut state = self.state.write().await;
        if !state.vehicles.contains_key(&id) {
            return Ok(false);
        }
        if state.reservations.values().any(|r| r.vehicle_id == id) {
            return Err(AppError::Conflict(
                "No se puede eliminar el vehículo porque tiene reservas asociadas. Cancela las reservas primero."
                    .to_string(),
            ));
        }
        state.vehicles.remove(&id);
        Ok(true)
    }
}

#[async_trait]
impl CustomerStore for MemoryStore {
    async fn list(&self) -> AppResult<Vec<Customer>> {
        let state = self.state.read().await;
        let mut customers: Vec<Customer> = state.customers.values().cloned().collect();
        customers.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(customers)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Customer>> {
        Ok(self.state.read().await.customers.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Customer>> {
        let state = self.state.read().await;
        Ok(state.customers.values().find(|c| c.email == email).cloned())
    }

    async fn create(&self, request: &CreateCustomerRequest) -> AppResult<Customer> {
        let mut state = self.state.write().await;
        if state.email_taken(&request.email, None) {
            return Err(duplicate_email(&request.email));
        }

        let id = MemoryState::next_id(&mut state.next_customer_id);
        let now = Utc::now();
        let customer = Customer {
            id,
            name: request.name.clone(),
            email: request.email.clone(),
            phone: request.phone.clone(),
            address: request.address.clone(),
            city: request.city.clone(),
            country: request.country.clone(),
            created_at: now,
            updated_at: now,
        };
        state.customers.insert(id, customer.clone());
        Ok(customer)
    }

    async fn update(&self, id: i32, request: &UpdateCustomerRequest) -> AppResult<Option<Customer>> {
        let mut state = self.state.write().await;
        if let Some(email) = &request.email {
            if state.customers.contains_key(&id) && state.email_taken(email, Some(id)) {
                return Err(duplicate_email(email));
            }
        }

        let Some(customer) = state.customers.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &request.name {
            customer.name = name.clone();
        }
        if let Some(email) = &request.email {
            customer.email = email.clone();
        }
        if let Some(phone) = &request.phone {
            customer.phone = phone.clone();
        }
        if request.address.is_some() {
            customer.address = request.address.clone();
        }
        if request.city.is_some() {
            customer.city = request.city.clone();
        }
        if request.country.is_some() {
            customer.country = request.country.clone();
        }
        customer.updated_at = Utc::now();

        Ok(Some(customer.clone()))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let mut state = self.state.write().await;
        if state.customers.remove(&id).is_none() {
            return Ok(false);
        }
        // ON DELETE SET NULL
        for reservation in state.reservations.values_mut() {
            if reservation.customer_id == Some(id) {
                reservation.customer_id = None;
            }
        }
        Ok(true)
    }
}

#[async_trait]
impl ReservationStore for MemoryStore {
    async fn list(&self, filter: &ReservationFilter) -> AppResult<Vec<Reservation>> {
        let state = self.state.read().await;
        let mut reservations: Vec<Reservation> = state
            .reservations
            .values()
            .filter(|r| match filter {
                ReservationFilter::All => true,
                ReservationFilter::Status(status) => r.status == *status,
                ReservationFilter::Vehicle(vehicle_id) => r.vehicle_id == *vehicle_id,
            })
            .cloned()
            .collect();

        match filter {
            ReservationFilter::All => {
                reservations.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)))
            }
            _ => reservations.sort_by(|a, b| b.start_date.cmp(&a.start_date).then(b.id.cmp(&a.id))),
        }
        Ok(reservations)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Reservation>> {
        Ok(self.state.read().await.reservations.get(&id).cloned())
    }

    async fn is_available(&self, vehicle_id: i32, range: &DateRange, exclude: Option<i32>) -> AppResult<bool> {
        Ok(!self.state.read().await.has_overlap(vehicle_id, range, exclude))
    }

    async fn create(&self, reservation: NewReservation) -> AppResult<Reservation> {
        let mut state = self.state.write().await;

        if !state.vehicles.contains_key(&reservation.vehicle_id) {
            return Err(not_found_error("Vehicle", &reservation.vehicle_id.to_string()));
        }
        if state.has_overlap(reservation.vehicle_id, &reservation.range, None) {
            return Err(unavailable(reservation.vehicle_id));
        }

        let id = MemoryState::next_id(&mut state.next_reservation_id);
        let now = Utc::now();
        let created = Reservation {
            id,
            customer: reservation.customer,
            email: reservation.email,
            phone: reservation.phone,
            customer_id: reservation.customer_id,
            vehicle_id: reservation.vehicle_id,
            start_date: reservation.range.start,
            end_date: reservation.range.end,
            pickup_time: reservation.pickup_time,
            return_time: reservation.return_time,
            status: reservation.status,
            total: reservation.total,
            created_at: now,
            updated_at: now,
        };
        state.reservations.insert(id, created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: i32,
        changes: &ReservationChanges,
        recheck_availability: bool,
    ) -> AppResult<Option<Reservation>> {
        let mut state = self.state.write().await;
        let Some(current) = state.reservations.get(&id) else {
            return Ok(None);
        };

        let mut merged = changes.apply_to(current);
        if merged.start_date > merged.end_date {
            return Err(bad_request_error("startDate debe ser anterior o igual a endDate"));
        }
        if !state.vehicles.contains_key(&merged.vehicle_id) {
            return Err(not_found_error("Vehicle", &merged.vehicle_id.to_string()));
        }
        if recheck_availability
            && changes.touches_booking()
            && merged.status.blocks_vehicle()
            && state.has_overlap(merged.vehicle_id, &merged.range(), Some(id))
        {
            return Err(unavailable(merged.vehicle_id));
        }

        merged.updated_at = Utc::now();
        state.reservations.insert(id, merged.clone());
        Ok(Some(merged))
    }

    async fn transition(&self, id: i32, status: ReservationStatus) -> AppResult<Option<Reservation>> {
        let mut state = self.state.write().await;
        let Some(reservation) = state.reservations.get_mut(&id) else {
            return Ok(None);
        };

        reservation.status.check_transition(status)?;
        reservation.status = status;
        reservation.updated_at = Utc::now();
        Ok(Some(reservation.clone()))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        Ok(self.state.write().await.reservations.remove(&id).is_some())
    }
}

#[allow(clippy::too_many_arguments)]
fn demo_vehicle(
    name: &str,
    category: &str,
    description: &str,
    year: i32,
    color: &str,
    price: i64,
    (passengers, luggage, doors): (i32, i32, i32),
    transmission: Transmission,
    features: &str,
    image: &str,
) -> Vehicle {
    let now = Utc::now();
    Vehicle {
        id: 0,
        name: name.to_string(),
        category: category.to_string(),
        description: description.to_string(),
        year,
        color: color.to_string(),
        price: Decimal::from(price),
        passengers,
        luggage,
        transmission,
        fuel: FuelType::Gasoline,
        doors,
        features: features.to_string(),
        image: image.to_string(),
        available: true,
        created_at: now,
        updated_at: now,
    }
}

/// Flota de demostración del catálogo
pub fn demo_fleet() -> Vec<Vehicle> {
    vec![
        demo_vehicle(
            "Toyota Corolla 2024",
            "sedan",
            "Sedán confiable y eficiente",
            2024,
            "Plateado",
            45,
            (5, 3, 4),
            Transmission::Automatic,
            "Aire Acondicionado, Bluetooth, Cámara Trasera, Control de Crucero, USB",
            "/silver-toyota-corolla-2024-sedan-modern-elegant.jpg",
        ),
        demo_vehicle(
            "Honda CR-V 2024",
            "suv",
            "SUV espaciosa ideal para familias",
            2024,
            "Blanco",
            65,
            (7, 5, 5),
            Transmission::Automatic,
            "4x4, Aire Acondicionado, Sistema de Navegación, Asientos de Cuero, Bluetooth",
            "/white-honda-crv-2024-suv-modern-spacious.jpg",
        ),
        demo_vehicle(
            "Nissan Sentra 2024",
            "sedan",
            "Sedán compacto perfecto para la ciudad",
            2024,
            "Azul",
            40,
            (5, 2, 4),
            Transmission::Automatic,
            "Aire Acondicionado, USB, Control Crucero, Bluetooth, Cámara Trasera",
            "/blue-nissan-sentra-2024-compact-sedan-modern.jpg",
        ),
        demo_vehicle(
            "Kia Rio 2023",
            "compacto",
            "Sedán compacto ideal para la ciudad",
            2023,
            "Blanco",
            35,
            (5, 2, 4),
            Transmission::Manual,
            "Aire Acondicionado, Radio, USB, Dirección Asistida, Económico",
            "/white-kia-rio-2023-compact-sedan-efficient.jpg",
        ),
        demo_vehicle(
            "Chevrolet Spark 2024",
            "compacto",
            "Auto perfecto para moverse por la ciudad",
            2024,
            "Rojo",
            30,
            (4, 2, 5),
            Transmission::Manual,
            "Aire Acondicionado, Radio, Económico, USB, Dirección Asistida",
            "/red-chevrolet-spark-2024-mini-compact-car-city.jpg",
        ),
        demo_vehicle(
            "Suzuki Swift 2023",
            "hatchback",
            "Hatchback versátil y económico",
            2023,
            "Azul",
            32,
            (5, 2, 5),
            Transmission::Manual,
            "Aire Acondicionado, USB, Bluetooth, Económico, Dirección Asistida",
            "/blue-suzuki-swift-2023-hatchback-compact-city.jpg",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone};

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, d, 0, 0, 0).unwrap()
    }

    fn booking(vehicle_id: i32, from: u32, to: u32) -> NewReservation {
        NewReservation {
            customer: "Juan Soto".into(),
            email: "juan@example.com".into(),
            phone: "+56911112222".into(),
            customer_id: None,
            vehicle_id,
            range: DateRange::new(day(from), day(to)),
            pickup_time: "10:00".into(),
            return_time: "10:00".into(),
            status: ReservationStatus::Pending,
            total: Decimal::from(100),
        }
    }

    #[tokio::test]
    async fn test_demo_fleet_is_seeded() {
        let store = MemoryStore::with_demo_fleet();
        let vehicles = VehicleStore::list(&store, &VehicleFilter::All).await.unwrap();
        assert_eq!(vehicles.len(), 6);
        let corolla = VehicleStore::find_by_id(&store, 1).await.unwrap().unwrap();
        assert_eq!(corolla.name, "Toyota Corolla 2024");
    }

    #[tokio::test]
    async fn test_category_filter_sorted_by_price() {
        let store = MemoryStore::with_demo_fleet();
        let compacts = VehicleStore::list(&store, &VehicleFilter::Category("compacto".into()))
            .await
            .unwrap();
        let names: Vec<_> = compacts.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Chevrolet Spark 2024", "Kia Rio 2023"]);
    }

    #[tokio::test]
    async fn test_overlapping_create_is_rejected() {
        let store = MemoryStore::with_demo_fleet();
        ReservationStore::create(&store, booking(1, 1, 5)).await.unwrap();

        let err = ReservationStore::create(&store, booking(1, 5, 8)).await.unwrap_err();
        assert!(matches!(err, AppError::VehicleUnavailable(_)));

        // otro vehículo, mismo rango
        assert!(ReservationStore::create(&store, booking(2, 1, 5)).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_for_missing_vehicle() {
        let store = MemoryStore::with_demo_fleet();
        let err = ReservationStore::create(&store, booking(99, 1, 5)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_recheck_on_update_excludes_self() {
        let store = MemoryStore::with_demo_fleet();
        let first = ReservationStore::create(&store, booking(1, 1, 5)).await.unwrap();
        ReservationStore::create(&store, booking(1, 10, 12)).await.unwrap();

        // extender sobre sí misma es válido
        let changes = ReservationChanges { end_date: Some(day(7)), ..Default::default() };
        assert!(ReservationStore::update(&store, first.id, &changes, true).await.unwrap().is_some());

        // pisar la segunda reserva no
        let changes = ReservationChanges { end_date: Some(day(11)), ..Default::default() };
        let err = ReservationStore::update(&store, first.id, &changes, true).await.unwrap_err();
        assert!(matches!(err, AppError::VehicleUnavailable(_)));

        // sin recheck se acepta
        let updated = ReservationStore::update(&store, first.id, &changes, false).await.unwrap().unwrap();
        assert_eq!(updated.end_date, day(11));
    }

    #[tokio::test]
    async fn test_customer_delete_unlinks_reservations() {
        let store = MemoryStore::new();
        let request = CreateCustomerRequest {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            phone: "+56 9 8765 4321".into(),
            address: None,
            city: None,
            country: None,
        };
        let customer = CustomerStore::create(&store, &request).await.unwrap();
        assert!(matches!(
            CustomerStore::create(&store, &request).await.unwrap_err(),
            AppError::Conflict(_)
        ));

        let vehicle = VehicleStore::create(
            &store,
            &CreateVehicleRequest {
                name: "Kia Rio".into(),
                category: "compacto".into(),
                description: String::new(),
                year: 2023,
                color: "Blanco".into(),
                price: Decimal::from(35),
                passengers: 5,
                luggage: 2,
                transmission: Transmission::Manual,
                fuel: FuelType::Gasoline,
                doors: 4,
                features: String::new(),
                image: String::new(),
                available: None,
            },
        )
        .await
        .unwrap();

        let mut new = booking(vehicle.id, 1, 2);
        new.customer_id = Some(customer.id);
        let reservation = ReservationStore::create(&store, new).await.unwrap();

        assert!(CustomerStore::delete(&store, customer.id).await.unwrap());
        let reservation = ReservationStore::find_by_id(&store, reservation.id).await.unwrap().unwrap();
        assert_eq!(reservation.customer_id, None);
        assert_eq!(reservation.email, "juan@example.com");
    }
}
