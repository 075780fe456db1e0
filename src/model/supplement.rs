use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A named recurring monthly amount paid on top of the contract's base
/// salary (transport, seniority, language bonus, ...).
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Supplement {
    #[schema(example = 3)]
    pub id: u64,

    #[schema(example = 10)]
    pub contract_id: u64,

    #[schema(example = "Transport")]
    pub concept: String,

    #[schema(value_type = f64, example = 95.5)]
    pub amount: Decimal,
}
