use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// An employment contract. At most one row per employee may have
/// `activo = true`; activation deactivates the previous one in the same
/// transaction.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Contract {
    #[schema(example = 10)]
    pub id: u64,

    #[schema(example = 1)]
    pub employee_id: u64,

    #[schema(value_type = f64, example = 2000.0)]
    pub base_monthly: Decimal,

    /// 12 for plain monthly pay, 14 with the two extra installments.
    #[schema(example = 14)]
    pub annual_payments: u32,

    pub activo: bool,
}
