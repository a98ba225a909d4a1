//! Tests contra PostgreSQL real
//!
//! Requieren `DATABASE_URL` apuntando a una base desechable:
//! `DATABASE_URL=postgres://... cargo test --test postgres_tests -- --ignored`
//! Cada test crea sus propios vehículos, así que pueden correr en paralelo.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{DateTime, TimeZone, Utc};
use futures::future::join_all;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use rentacar::config::{DatabaseConfig, EnvironmentConfig};
use rentacar::database::{create_pool, run_migrations};
use rentacar::dto::customer_dto::CreateCustomerRequest;
use rentacar::dto::vehicle_dto::CreateVehicleRequest;
use rentacar::models::{NewReservation, Reservation, ReservationChanges, ReservationFilter, ReservationStatus, Vehicle};
use rentacar::repositories::{
    CustomerRepository, CustomerStore, ReservationRepository, ReservationStore, VehicleRepository, VehicleStore,
};
use rentacar::routes::create_app;
use rentacar::services::availability::DateRange;
use rentacar::state::AppState;
use rentacar::utils::errors::AppError;

const REQUIRES_DB: &str = "requiere PostgreSQL (DATABASE_URL)";

async fn setup_pool() -> Option<PgPool> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let config = DatabaseConfig {
        max_connections: 20,
        ..DatabaseConfig::new(url)
    };
    let pool = create_pool(&config).await.expect("Failed to connect to DATABASE_URL");
    run_migrations(&pool).await.expect("Failed to run migrations");
    Some(pool)
}

async fn create_vehicle(pool: &PgPool) -> Vehicle {
    let request: CreateVehicleRequest = serde_json::from_value(json!({
        "name": format!("Test {}", Uuid::new_v4().simple()),
        "category": "sedan",
        "year": 2024,
        "price": 45,
        "passengers": 5,
        "luggage": 2,
        "transmission": "automatic",
        "fuel": "gasoline",
        "doors": 4
    }))
    .unwrap();
    VehicleRepository::new(pool.clone()).create(&request).await.unwrap()
}

fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, d, 0, 0, 0).unwrap()
}

fn new_reservation(vehicle_id: i32, start: u32, end: u32) -> NewReservation {
    NewReservation {
        customer: "Juan Soto".to_string(),
        email: "juan@example.com".to_string(),
        phone: "+56911112222".to_string(),
        customer_id: None,
        vehicle_id,
        range: DateRange::new(day(start), day(end)),
        pickup_time: "10:00".to_string(),
        return_time: "10:00".to_string(),
        status: ReservationStatus::Pending,
        total: Decimal::new(180, 0),
    }
}

async fn reservations_for(repo: &ReservationRepository, vehicle_id: i32) -> Vec<Reservation> {
    repo.list(&ReservationFilter::Vehicle(vehicle_id)).await.unwrap()
}

#[tokio::test]
#[ignore = "requiere PostgreSQL (DATABASE_URL)"]
async fn test_overlap_count_is_inclusive_and_ignores_finished_reservations() {
    let Some(pool) = setup_pool().await else {
        eprintln!("{}", REQUIRES_DB);
        return;
    };
    let vehicle = create_vehicle(&pool).await;
    let repo = ReservationRepository::new(pool.clone());

    let booked = repo.create(new_reservation(vehicle.id, 10, 15)).await.unwrap();

    let range = |a: u32, b: u32| DateRange::new(day(a), day(b));
    assert!(!repo.is_available(vehicle.id, &range(12, 20), None).await.unwrap());
    assert!(!repo.is_available(vehicle.id, &range(15, 18), None).await.unwrap());
    assert!(!repo.is_available(vehicle.id, &range(5, 10), None).await.unwrap());
    assert!(repo.is_available(vehicle.id, &range(16, 20), None).await.unwrap());
    assert!(repo.is_available(vehicle.id, &range(1, 9), None).await.unwrap());

    // la reserva editada no se bloquea a sí misma
    assert!(repo.is_available(vehicle.id, &range(12, 20), Some(booked.id)).await.unwrap());

    let other = create_vehicle(&pool).await;
    assert!(repo.is_available(other.id, &range(12, 20), None).await.unwrap());

    repo.transition(booked.id, ReservationStatus::Active).await.unwrap();
    assert!(!repo.is_available(vehicle.id, &range(12, 20), None).await.unwrap());

    repo.transition(booked.id, ReservationStatus::Completed).await.unwrap();
    assert!(repo.is_available(vehicle.id, &range(12, 20), None).await.unwrap());

    let cancelled = repo.create(new_reservation(vehicle.id, 20, 25)).await.unwrap();
    repo.transition(cancelled.id, ReservationStatus::Cancelled).await.unwrap();
    assert!(repo.is_available(vehicle.id, &range(22, 23), None).await.unwrap());
}

#[tokio::test]
#[ignore = "requiere PostgreSQL (DATABASE_URL)"]
async fn test_unavailable_create_writes_nothing() {
    let Some(pool) = setup_pool().await else {
        eprintln!("{}", REQUIRES_DB);
        return;
    };
    let vehicle = create_vehicle(&pool).await;
    let repo = ReservationRepository::new(pool.clone());

    repo.create(new_reservation(vehicle.id, 1, 5)).await.unwrap();
    let before = reservations_for(&repo, vehicle.id).await.len();

    let err = repo.create(new_reservation(vehicle.id, 5, 8)).await.unwrap_err();
    assert!(matches!(err, AppError::VehicleUnavailable(_)));
    assert_eq!(reservations_for(&repo, vehicle.id).await.len(), before);

    let err = repo.create(new_reservation(i32::MAX, 1, 2)).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    repo.create(new_reservation(vehicle.id, 6, 8)).await.unwrap();
    assert_eq!(reservations_for(&repo, vehicle.id).await.len(), before + 1);
}

#[tokio::test]
#[ignore = "requiere PostgreSQL (DATABASE_URL)"]
async fn test_referenced_vehicle_delete_is_conflict() {
    let Some(pool) = setup_pool().await else {
        eprintln!("{}", REQUIRES_DB);
        return;
    };
    let vehicle = create_vehicle(&pool).await;
    let vehicles = VehicleRepository::new(pool.clone());
    let reservations = ReservationRepository::new(pool.clone());

    let booked = reservations.create(new_reservation(vehicle.id, 1, 3)).await.unwrap();

    let err = vehicles.delete(vehicle.id).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert!(vehicles.find_by_id(vehicle.id).await.unwrap().is_some());

    assert!(reservations.delete(booked.id).await.unwrap());
    assert!(vehicles.delete(vehicle.id).await.unwrap());
    assert!(vehicles.find_by_id(vehicle.id).await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "requiere PostgreSQL (DATABASE_URL)"]
async fn test_concurrent_creates_have_single_winner() {
    let Some(pool) = setup_pool().await else {
        eprintln!("{}", REQUIRES_DB);
        return;
    };
    let vehicle = create_vehicle(&pool).await;
    let repo = Arc::new(ReservationRepository::new(pool.clone()));

    let attempts = (0..10).map(|_| {
        let repo = Arc::clone(&repo);
        let vehicle_id = vehicle.id;
        tokio::spawn(async move { repo.create(new_reservation(vehicle_id, 10, 12)).await })
    });
    let results: Vec<_> = join_all(attempts).await.into_iter().map(|joined| joined.unwrap()).collect();

    let created = results.iter().filter(|r| r.is_ok()).count();
    let rejected = results
        .iter()
        .filter(|r| matches!(r, Err(AppError::VehicleUnavailable(_))))
        .count();
    assert_eq!(created, 1);
    assert_eq!(rejected, 9);
    assert_eq!(reservations_for(&repo, vehicle.id).await.len(), 1);
}

#[tokio::test]
#[ignore = "requiere PostgreSQL (DATABASE_URL)"]
async fn test_recheck_update_rejects_overlap() {
    let Some(pool) = setup_pool().await else {
        eprintln!("{}", REQUIRES_DB);
        return;
    };
    let vehicle = create_vehicle(&pool).await;
    let repo = ReservationRepository::new(pool.clone());

    repo.create(new_reservation(vehicle.id, 1, 5)).await.unwrap();
    let second = repo.create(new_reservation(vehicle.id, 10, 12)).await.unwrap();

    let changes = ReservationChanges {
        start_date: Some(day(4)),
        ..Default::default()
    };
    let err = repo.update(second.id, &changes, true).await.unwrap_err();
    assert!(matches!(err, AppError::VehicleUnavailable(_)));

    let unchanged = repo.find_by_id(second.id).await.unwrap().unwrap();
    assert_eq!(unchanged.start_date, day(10));

    // sin recheck el cambio se guarda tal cual
    let updated = repo.update(second.id, &changes, false).await.unwrap().unwrap();
    assert_eq!(updated.start_date, day(4));
}

#[tokio::test]
#[ignore = "requiere PostgreSQL (DATABASE_URL)"]
async fn test_duplicate_customer_email_is_conflict() {
    let Some(pool) = setup_pool().await else {
        eprintln!("{}", REQUIRES_DB);
        return;
    };
    let customers = CustomerRepository::new(pool.clone());
    let email = format!("{}@example.com", Uuid::new_v4().simple());

    let request: CreateCustomerRequest = serde_json::from_value(json!({
        "name": "Ana Pérez",
        "email": email,
        "phone": "+56922223333"
    }))
    .unwrap();
    let created = customers.create(&request).await.unwrap();

    let err = customers.create(&request).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(customers.find_by_email(&email).await.unwrap().map(|c| c.id), Some(created.id));

    // la misma violación 23505 llega como 409 por HTTP
    let app = create_app(AppState::with_postgres(pool.clone(), EnvironmentConfig::default()));
    let body = json!({ "name": "Ana Pérez", "email": email, "phone": "+56922223333" });
    let request = Request::builder()
        .method("POST")
        .uri("/api/customers")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "CONFLICT");

    assert!(customers.delete(created.id).await.unwrap());
}
