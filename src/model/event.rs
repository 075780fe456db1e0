use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Append-only change notification. The UI polls these instead of holding
/// a realtime subscription; rows are never updated or deleted.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct ChangeEvent {
    pub id: u64,

    #[schema(example = "nomina")]
    pub entity: String,

    #[schema(example = 42)]
    pub entity_id: u64,

    #[schema(example = "created")]
    pub action: String,

    #[schema(example = "2025-06-30T18:00:00Z", format = "date-time", value_type = String)]
    pub created_at: Option<DateTime<Utc>>,
}
