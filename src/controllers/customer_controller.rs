use std::sync::Arc;
use tracing::info;
use validator::Validate;

use crate::dto::customer_dto::{CreateCustomerRequest, UpdateCustomerRequest};
use crate::models::Customer;
use crate::repositories::CustomerStore;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppResult};

pub struct CustomerController {
    customers: Arc<dyn CustomerStore>,
}

impl CustomerController {
    pub fn new(state: &AppState) -> Self {
        Self {
            customers: state.customers.clone(),
        }
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Customer> {
        self.customers
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Customer", &id.to_string()))
    }

    pub async fn get_by_email(&self, email: &str) -> AppResult<Customer> {
        self.customers
            .find_by_email(email)
            .await?
            .ok_or_else(|| not_found_error("Customer", email))
    }

    pub async fn list(&self) -> AppResult<Vec<Customer>> {
        self.customers.list().await
    }

    pub async fn create(&self, request: CreateCustomerRequest) -> AppResult<Customer> {
        request.validate()?;

        let customer = self.customers.create(&request).await?;
        info!("👤 Cliente creado: {} ({})", customer.email, customer.id);
        Ok(customer)
    }

    pub async fn update(&self, id: i32, request: UpdateCustomerRequest) -> AppResult<Customer> {
        request.validate()?;

        self.customers
            .update(id, &request)
            .await?
            .ok_or_else(|| not_found_error("Customer", &id.to_string()))
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        if !self.customers.delete(id).await? {
            return Err(not_found_error("Customer", &id.to_string()));
        }
        Ok(())
    }
}
