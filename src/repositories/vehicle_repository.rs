use async_trait::async_trait;
use sqlx::PgPool;
use tracing::warn;

use super::VehicleStore;
use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest};
use crate::models::{Vehicle, VehicleFilter};
use crate::utils::errors::{is_foreign_key_violation, AppError, AppResult};

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VehicleStore for VehicleRepository {
    async fn list(&self, filter: &VehicleFilter) -> AppResult<Vec<Vehicle>> {
        let vehicles = match filter {
            VehicleFilter::All => {
                sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles ORDER BY created_at DESC, id DESC")
                    .fetch_all(&self.pool)
                    .await?
            }
            VehicleFilter::Available => {
                sqlx::query_as::<_, Vehicle>(
                    "SELECT * FROM vehicles WHERE available = TRUE ORDER BY price ASC, id ASC",
                )
                .fetch_all(&self.pool)
                .await?
            }
            VehicleFilter::Category(category) => {
                sqlx::query_as::<_, Vehicle>(
                    "SELECT * FROM vehicles WHERE category = $1 AND available = TRUE ORDER BY price ASC, id ASC",
                )
                .bind(category)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(vehicles)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    async fn find_by_ids(&self, ids: &[i32]) -> AppResult<Vec<Vehicle>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let vehicles = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(vehicles)
    }

    async fn create(&self, request: &CreateVehicleRequest) -> AppResult<Vehicle> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (
                name, category, description, year, color, price, passengers, luggage,
                transmission, fuel, doors, features, image, available, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, NOW(), NOW()
            )
            RETURNING *
            "#,
        )
        .bind(&request.name)
        .bind(&request.category)
        .bind(&request.description)
        .bind(request.year)
        .bind(&request.color)
        .bind(request.price)
        .bind(request.passengers)
        .bind(request.luggage)
        .bind(request.transmission.as_str())
        .bind(request.fuel.as_str())
        .bind(request.doors)
        .bind(&request.features)
        .bind(&request.image)
        .bind(request.available.unwrap_or(true))
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    async fn update(&self, id: i32, request: &UpdateVehicleRequest) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles SET
                name = COALESCE($2, name),
                category = COALESCE($3, category),
                description = COALESCE($4, description),
                year = COALESCE($5, year),
                color = COALESCE($6, color),
                price = COALESCE($7, price),
                passengers = COALESCE($8, passengers),
                luggage = COALESCE($9, luggage),
                transmission = COALESCE($10, transmission),
                fuel = COALESCE($11, fuel),
                doors = COALESCE($12, doors),
                features = COALESCE($13, features),
                image = COALESCE($14, image),
                available = COALESCE($15, available),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(&request.category)
        .bind(&request.description)
        .bind(request.year)
        .bind(&request.color)
        .bind(request.price)
        .bind(request.passengers)
        .bind(request.luggage)
        .bind(request.transmission.map(|t| t.as_str()))
        .bind(request.fuel.map(|f| f.as_str()))
        .bind(request.doors)
        .bind(&request.features)
        .bind(&request.image)
        .bind(request.available)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    warn!("🚫 Vehículo {} referenciado por reservas, no se elimina", id);
                    AppError::Conflict(
                        "No se puede eliminar el vehículo porque tiene reservas asociadas. Cancela las reservas primero."
                            .to_string(),
                    )
                } else {
                    AppError::Database(e)
                }
            })?;

        Ok(result.rows_affected() > 0)
    }
}
