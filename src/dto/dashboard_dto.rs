use rust_decimal::Decimal;
use serde::Serialize;

// Resumen del panel de administración
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_vehicles: usize,
    pub available_vehicles: usize,
    pub pending_reservations: usize,
    pub active_reservations: usize,
    /// Suma de `total` de las reservas creadas en el mes en curso (UTC)
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_revenue: Decimal,
    pub total_customers: usize,
}
