use async_trait::async_trait;
use sqlx::{PgConnection, PgExecutor, PgPool};
use tracing::{info, warn};

use super::ReservationStore;
use crate::models::{NewReservation, Reservation, ReservationChanges, ReservationFilter, ReservationStatus};
use crate::services::availability::DateRange;
use crate::utils::errors::{bad_request_error, is_foreign_key_violation, not_found_error, AppError, AppResult};

/// Reservas pending/active del vehículo que solapan `[$2, $3]`, opcionalmente excluyendo `$4`
const OVERLAP_COUNT_SQL: &str = r#"
    SELECT COUNT(*)
    FROM reservations
    WHERE vehicle_id = $1
      AND status IN ('pending', 'active')
      AND start_date <= $3
      AND end_date >= $2
      AND ($4::INT IS NULL OR id <> $4)
"#;

pub struct ReservationRepository {
    pool: PgPool,
}

impl ReservationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn count_overlaps<'e, E>(
    executor: E,
    vehicle_id: i32,
    range: &DateRange,
    exclude: Option<i32>,
) -> Result<i64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar::<_, i64>(OVERLAP_COUNT_SQL)
        .bind(vehicle_id)
        .bind(range.start)
        .bind(range.end)
        .bind(exclude)
        .fetch_one(executor)
        .await
}

/// Bloquea la fila del vehículo hasta el fin de la transacción.
/// Serializa las reservas concurrentes del mismo vehículo.
async fn lock_vehicle(conn: &mut PgConnection, vehicle_id: i32) -> AppResult<()> {
    let locked = sqlx::query_scalar::<_, i32>("SELECT id FROM vehicles WHERE id = $1 FOR UPDATE")
        .bind(vehicle_id)
        .fetch_optional(conn)
        .await?;

    match locked {
        Some(_) => Ok(()),
        None => Err(not_found_error("Vehicle", &vehicle_id.to_string())),
    }
}

fn unavailable(vehicle_id: i32) -> AppError {
    AppError::VehicleUnavailable(format!(
        "El vehículo {} no está disponible en esas fechas",
        vehicle_id
    ))
}

#[async_trait]
impl ReservationStore for ReservationRepository {
    async fn list(&self, filter: &ReservationFilter) -> AppResult<Vec<Reservation>> {
        let reservations = match filter {
            ReservationFilter::All => {
                sqlx::query_as::<_, Reservation>("SELECT * FROM reservations ORDER BY created_at DESC, id DESC")
                    .fetch_all(&self.pool)
                    .await?
            }
            ReservationFilter::Status(status) => {
                sqlx::query_as::<_, Reservation>(
                    "SELECT * FROM reservations WHERE status = $1 ORDER BY start_date DESC, id DESC",
                )
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            ReservationFilter::Vehicle(vehicle_id) => {
                sqlx::query_as::<_, Reservation>(
                    "SELECT * FROM reservations WHERE vehicle_id = $1 ORDER BY start_date DESC, id DESC",
                )
                .bind(vehicle_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(reservations)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Reservation>> {
        let reservation = sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(reservation)
    }

    async fn is_available(&self, vehicle_id: i32, range: &DateRange, exclude: Option<i32>) -> AppResult<bool> {
        let overlapping = count_overlaps(&self.pool, vehicle_id, range, exclude).await?;
        Ok(overlapping == 0)
    }

    async fn create(&self, reservation: NewReservation) -> AppResult<Reservation> {
        let mut tx = self.pool.begin().await?;

        lock_vehicle(&mut *tx, reservation.vehicle_id).await?;

        let overlapping = count_overlaps(&mut *tx, reservation.vehicle_id, &reservation.range, None).await?;
        if overlapping > 0 {
            warn!(
                "🚫 Vehículo {} ocupado: {} reserva(s) solapadas",
                reservation.vehicle_id, overlapping
            );
            return Err(unavailable(reservation.vehicle_id));
        }

        let created = sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservations (
                customer, email, phone, customer_id, vehicle_id, start_date, end_date,
                pickup_time, return_time, status, total, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, NOW(), NOW()
            )
            RETURNING *
            "#,
        )
        .bind(&reservation.customer)
        .bind(&reservation.email)
        .bind(&reservation.phone)
        .bind(reservation.customer_id)
        .bind(reservation.vehicle_id)
        .bind(reservation.range.start)
        .bind(reservation.range.end)
        .bind(&reservation.pickup_time)
        .bind(&reservation.return_time)
        .bind(reservation.status.as_str())
        .bind(reservation.total)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!("📅 Reserva {} creada para vehículo {}", created.id, created.vehicle_id);
        Ok(created)
    }

    async fn update(
        &self,
        id: i32,
        changes: &ReservationChanges,
        recheck_availability: bool,
    ) -> AppResult<Option<Reservation>> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(current) = current else {
            return Ok(None);
        };

        let merged = changes.apply_to(&current);
        if merged.start_date > merged.end_date {
            return Err(bad_request_error("startDate debe ser anterior o igual a endDate"));
        }

        if recheck_availability && changes.touches_booking() && merged.status.blocks_vehicle() {
            lock_vehicle(&mut *tx, merged.vehicle_id).await?;
            let overlapping = count_overlaps(&mut *tx, merged.vehicle_id, &merged.range(), Some(id)).await?;
            if overlapping > 0 {
                return Err(unavailable(merged.vehicle_id));
            }
        }

        let updated = sqlx::query_as::<_, Reservation>(
            r#"
            UPDATE reservations SET
                customer = $2,
                email = $3,
                phone = $4,
                vehicle_id = $5,
                start_date = $6,
                end_date = $7,
                pickup_time = $8,
                return_time = $9,
                status = $10,
                total = $11,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&merged.customer)
        .bind(&merged.email)
        .bind(&merged.phone)
        .bind(merged.vehicle_id)
        .bind(merged.start_date)
        .bind(merged.end_date)
        .bind(&merged.pickup_time)
        .bind(&merged.return_time)
        .bind(merged.status.as_str())
        .bind(merged.total)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                not_found_error("Vehicle", &merged.vehicle_id.to_string())
            } else {
                AppError::Database(e)
            }
        })?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    async fn transition(&self, id: i32, status: ReservationStatus) -> AppResult<Option<Reservation>> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(current) = current else {
            return Ok(None);
        };

        current.status.check_transition(status)?;

        let updated = sqlx::query_as::<_, Reservation>(
            "UPDATE reservations SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!("🔄 Reserva {}: {} -> {}", id, current.status, status);
        Ok(Some(updated))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
