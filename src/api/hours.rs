use crate::{auth::auth::AuthUser, model::worked_hours::WorkedHours};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct UpsertHours {
    #[schema(example = 1)]
    pub employee_id: u64,

    #[schema(example = 2025)]
    pub year: i32,

    #[schema(example = 6)]
    pub month: u32,

    /// Omit to mean "no record kept"; payroll then assumes the
    /// full-time baseline.
    #[schema(value_type = f64, nullable = true, example = 152.0)]
    pub ordinary: Option<Decimal>,

    #[schema(value_type = f64, example = 8.0)]
    pub overtime_normal: Option<Decimal>,

    #[schema(value_type = f64, example = 0.0)]
    pub overtime_night: Option<Decimal>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct HoursQuery {
    #[schema(example = 1)]
    pub employee_id: Option<u64>,

    #[schema(example = 2025)]
    pub year: Option<i32>,

    #[schema(example = 6)]
    pub month: Option<u32>,
}

enum FilterValue {
    U64(u64),
    I32(i32),
    U32(u32),
}

/// Record worked hours for a month (idempotent upsert)
#[utoipa::path(
    put,
    path = "/api/v1/hours",
    request_body = UpsertHours,
    responses(
        (status = 200, description = "Hours recorded"),
        (status = 422, description = "Invalid hours")
    ),
    security(("bearer_auth" = [])),
    tag = "Hours"
)]
pub async fn upsert_hours(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<UpsertHours>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    if !(1..=12).contains(&payload.month) {
        return Ok(HttpResponse::UnprocessableEntity().json(json!({
            "message": "month must be between 1 and 12"
        })));
    }

    let overtime_normal = payload.overtime_normal.unwrap_or(Decimal::ZERO);
    let overtime_night = payload.overtime_night.unwrap_or(Decimal::ZERO);

    for (label, value) in [
        ("ordinary", payload.ordinary.unwrap_or(Decimal::ZERO)),
        ("overtime_normal", overtime_normal),
        ("overtime_night", overtime_night),
    ] {
        if value < Decimal::ZERO {
            return Ok(HttpResponse::UnprocessableEntity().json(json!({
                "message": format!("{label} hours must not be negative")
            })));
        }
    }

    // One row per (employee, year, month): retries replace, never duplicate
    sqlx::query(
        r#"
        INSERT INTO worked_hours (employee_id, year, month, ordinary, overtime_normal, overtime_night)
        VALUES (?, ?, ?, ?, ?, ?)
        ON DUPLICATE KEY UPDATE
            ordinary = VALUES(ordinary),
            overtime_normal = VALUES(overtime_normal),
            overtime_night = VALUES(overtime_night)
        "#,
    )
    .bind(payload.employee_id)
    .bind(payload.year)
    .bind(payload.month)
    .bind(payload.ordinary)
    .bind(overtime_normal)
    .bind(overtime_night)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id = payload.employee_id, "Failed to upsert worked hours");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Hours recorded"
    })))
}

/// List worked-hours records
#[utoipa::path(
    get,
    path = "/api/v1/hours",
    params(HoursQuery),
    responses(
        (status = 200, description = "Worked hours list", body = [WorkedHours])
    ),
    security(("bearer_auth" = [])),
    tag = "Hours"
)]
pub async fn list_hours(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<HoursQuery>,
) -> actix_web::Result<impl Responder> {
    // employees may read their own hours; HR/Admin anyone's
    if let Some(employee_id) = query.employee_id {
        if !auth.may_read_employee(employee_id) {
            return Err(actix_web::error::ErrorForbidden("Not your records"));
        }
    } else {
        auth.require_hr_or_admin()?;
    }

    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(employee_id) = query.employee_id {
        where_sql.push_str(" AND employee_id = ?");
        args.push(FilterValue::U64(employee_id));
    }
    if let Some(year) = query.year {
        where_sql.push_str(" AND year = ?");
        args.push(FilterValue::I32(year));
    }
    if let Some(month) = query.month {
        where_sql.push_str(" AND month = ?");
        args.push(FilterValue::U32(month));
    }

    let sql = format!(
        r#"
        SELECT id, employee_id, year, month, ordinary, overtime_normal, overtime_night
        FROM worked_hours
        {}
        ORDER BY year DESC, month DESC
        "#,
        where_sql
    );

    let mut q = sqlx::query_as::<_, WorkedHours>(&sql);
    for arg in args {
        q = match arg {
            FilterValue::U64(v) => q.bind(v),
            FilterValue::I32(v) => q.bind(v),
            FilterValue::U32(v) => q.bind(v),
        };
    }

    let hours = q.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to fetch worked hours");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(hours))
}
