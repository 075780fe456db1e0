use crate::{auth::auth::AuthUser, model::event::ChangeEvent};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use serde::Deserialize;
use sqlx::MySqlPool;
use tracing::{error, warn};
use utoipa::{IntoParams, ToSchema};

/// Append a change notification. Best effort: a lost event only delays a
/// poller by one cycle, so failures are logged and swallowed instead of
/// failing the write that triggered them.
pub async fn record_event(pool: &MySqlPool, entity: &str, entity_id: u64, action: &str) {
    if let Err(e) =
        sqlx::query("INSERT INTO change_events (entity, entity_id, action) VALUES (?, ?, ?)")
            .bind(entity)
            .bind(entity_id)
            .bind(action)
            .execute(pool)
            .await
    {
        warn!(error = %e, entity, entity_id, action, "Failed to record change event");
    }
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct EventQuery {
    /// Return only events with id greater than this (poll cursor)
    #[schema(example = 100)]
    pub after_id: Option<u64>,

    #[schema(example = 50)]
    pub limit: Option<u32>,
}

/// Poll recent change events
#[utoipa::path(
    get,
    path = "/api/v1/events",
    params(EventQuery),
    responses(
        (status = 200, description = "Events after the cursor, oldest first", body = [ChangeEvent])
    ),
    security(("bearer_auth" = [])),
    tag = "Events"
)]
pub async fn list_events(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<EventQuery>,
) -> actix_web::Result<impl Responder> {
    let after_id = query.after_id.unwrap_or(0);
    let limit = query.limit.unwrap_or(50).clamp(1, 500);

    let events = sqlx::query_as::<_, ChangeEvent>(
        r#"
        SELECT id, entity, entity_id, action, created_at
        FROM change_events
        WHERE id > ?
        ORDER BY id
        LIMIT ?
        "#,
    )
    .bind(after_id)
    .bind(limit)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch change events");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(events))
}
