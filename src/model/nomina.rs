use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A frozen payslip. One row per (employee_id, year, month); the payroll
/// run upserts on that key so retries replace instead of duplicating.
/// Once written the row is treated as audit history and never edited.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Nomina {
    pub id: u64,
    pub employee_id: u64,

    #[schema(example = 2025)]
    pub year: i32,

    #[schema(example = 6)]
    pub month: u32,

    #[schema(value_type = f64, example = 2000.0)]
    pub total_bruto: Decimal,

    #[schema(value_type = f64, example = 415.93)]
    pub total_deducciones: Decimal,

    #[schema(value_type = f64, example = 1584.07)]
    pub neto: Decimal,

    #[schema(value_type = f64, example = 2000.0)]
    pub contribution_base: Decimal,

    #[schema(value_type = f64, example = 0.143)]
    pub effective_rate: Decimal,

    /// Serialized itemized statement (earnings and deduction lines).
    #[schema(value_type = String)]
    pub detail: String,
}
