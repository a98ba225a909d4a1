use async_trait::async_trait;
use sqlx::PgPool;

use super::CustomerStore;
use crate::dto::customer_dto::{CreateCustomerRequest, UpdateCustomerRequest};
use crate::models::Customer;
use crate::utils::errors::{is_unique_violation, AppError, AppResult};

pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn duplicate_email(error: sqlx::Error, email: &str) -> AppError {
    if is_unique_violation(&error) {
        AppError::Conflict(format!("Ya existe un cliente con el email '{}'", email))
    } else {
        AppError::Database(error)
    }
}

#[async_trait]
impl CustomerStore for CustomerRepository {
    async fn list(&self) -> AppResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>("SELECT * FROM customers ORDER BY created_at DESC, id DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(customers)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(customer)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(customer)
    }

    async fn create(&self, request: &CreateCustomerRequest) -> AppResult<Customer> {
        sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (name, email, phone, address, city, country, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(&request.name)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(&request.address)
        .bind(&request.city)
        .bind(&request.country)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| duplicate_email(e, &request.email))
    }

    async fn update(&self, id: i32, request: &UpdateCustomerRequest) -> AppResult<Option<Customer>> {
        sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                address = COALESCE($5, address),
                city = COALESCE($6, city),
                country = COALESCE($7, country),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(&request.address)
        .bind(&request.city)
        .bind(&request.country)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| duplicate_email(e, request.email.as_deref().unwrap_or_default()))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
