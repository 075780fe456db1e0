use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One day's time punch for an employee. A single row per
/// (employee_id, date); check-out fills in the open punch.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Punch {
    pub id: u64,
    pub employee_id: u64,

    #[schema(example = "2025-06-02", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "08:58:12", value_type = String, nullable = true)]
    pub check_in: Option<NaiveTime>,

    #[schema(example = "17:31:40", value_type = String, nullable = true)]
    pub check_out: Option<NaiveTime>,
}
