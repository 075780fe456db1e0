use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Hours worked by one employee in one month. Natural key
/// (employee_id, year, month); writes go through an upsert.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct WorkedHours {
    #[schema(example = 7)]
    pub id: u64,

    #[schema(example = 1)]
    pub employee_id: u64,

    #[schema(example = 2025)]
    pub year: i32,

    #[schema(example = 6)]
    pub month: u32,

    /// NULL means no record was kept; payroll assumes the full-time
    /// baseline for the month.
    #[schema(value_type = f64, nullable = true, example = 160.0)]
    pub ordinary: Option<Decimal>,

    #[schema(value_type = f64, example = 8.0)]
    pub overtime_normal: Decimal,

    #[schema(value_type = f64, example = 0.0)]
    pub overtime_night: Decimal,
}
