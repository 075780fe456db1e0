use crate::{auth::auth::AuthUser, api::events, model::contract::Contract};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateContract {
    #[schema(example = 1)]
    pub employee_id: u64,

    #[schema(value_type = f64, example = 2000.0)]
    pub base_monthly: Decimal,

    #[schema(example = 14)]
    pub annual_payments: u32,

    /// Created as the active contract by default; the previous active one
    /// is deactivated in the same transaction.
    pub activo: Option<bool>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateContract {
    #[schema(value_type = f64, example = 2100.0)]
    pub base_monthly: Option<Decimal>,

    #[schema(example = 12)]
    pub annual_payments: Option<u32>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct ContractQuery {
    #[schema(example = 1)]
    pub employee_id: Option<u64>,

    /// Only return active contracts
    pub activo: Option<bool>,
}

/// Create a contract
#[utoipa::path(
    post,
    path = "/api/v1/contracts",
    request_body = CreateContract,
    responses(
        (status = 201, description = "Contract created"),
        (status = 422, description = "Invalid contract terms"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Contract"
)]
pub async fn create_contract(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateContract>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    if payload.annual_payments < 12 {
        return Ok(HttpResponse::UnprocessableEntity().json(json!({
            "message": "annual_payments must be at least 12"
        })));
    }
    if payload.base_monthly < Decimal::ZERO {
        return Ok(HttpResponse::UnprocessableEntity().json(json!({
            "message": "base_monthly must not be negative"
        })));
    }

    let activo = payload.activo.unwrap_or(true);

    // One active contract per employee: deactivation and insert must be a
    // single transaction or a crash in between leaves the employee with
    // none active.
    let mut tx = pool.begin().await.map_err(|e| {
        error!(error = %e, "Failed to begin transaction");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if activo {
        sqlx::query("UPDATE contracts SET activo = FALSE WHERE employee_id = ? AND activo = TRUE")
            .bind(payload.employee_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                error!(error = %e, employee_id = payload.employee_id, "Failed to deactivate contracts");
                ErrorInternalServerError("Internal Server Error")
            })?;
    }

    let result = sqlx::query(
        r#"
        INSERT INTO contracts (employee_id, base_monthly, annual_payments, activo)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(payload.employee_id)
    .bind(payload.base_monthly)
    .bind(payload.annual_payments)
    .bind(activo)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        error!(error = %e, employee_id = payload.employee_id, "Failed to create contract");
        ErrorInternalServerError("Internal Server Error")
    })?;

    tx.commit().await.map_err(|e| {
        error!(error = %e, "Failed to commit contract transaction");
        ErrorInternalServerError("Internal Server Error")
    })?;

    events::record_event(
        pool.get_ref(),
        "contract",
        result.last_insert_id(),
        "created",
    )
    .await;

    Ok(HttpResponse::Created().json(json!({
        "message": "Contract created",
        "id": result.last_insert_id()
    })))
}

/// List contracts
#[utoipa::path(
    get,
    path = "/api/v1/contracts",
    params(ContractQuery),
    responses(
        (status = 200, description = "Contract list", body = [Contract])
    ),
    security(("bearer_auth" = [])),
    tag = "Contract"
)]
pub async fn list_contracts(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<ContractQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let mut sql = String::from(
        "SELECT id, employee_id, base_monthly, annual_payments, activo FROM contracts WHERE 1=1",
    );
    if query.employee_id.is_some() {
        sql.push_str(" AND employee_id = ?");
    }
    if query.activo.is_some() {
        sql.push_str(" AND activo = ?");
    }
    sql.push_str(" ORDER BY id DESC");

    let mut q = sqlx::query_as::<_, Contract>(&sql);
    if let Some(employee_id) = query.employee_id {
        q = q.bind(employee_id);
    }
    if let Some(activo) = query.activo {
        q = q.bind(activo);
    }

    let contracts = q.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to fetch contracts");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(contracts))
}

/// Get one contract
#[utoipa::path(
    get,
    path = "/api/v1/contracts/{contract_id}",
    params(("contract_id", description = "Contract ID")),
    responses(
        (status = 200, body = Contract),
        (status = 404)
    ),
    security(("bearer_auth" = [])),
    tag = "Contract"
)]
pub async fn get_contract(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let contract_id = path.into_inner();

    let contract = sqlx::query_as::<_, Contract>(
        "SELECT id, employee_id, base_monthly, annual_payments, activo FROM contracts WHERE id = ?",
    )
    .bind(contract_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, contract_id, "Failed to fetch contract");
        ErrorInternalServerError("Internal Server Error")
    })?;

    match contract {
        Some(c) => Ok(HttpResponse::Ok().json(c)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Contract not found"
        }))),
    }
}

/// Update contract terms
#[utoipa::path(
    put,
    path = "/api/v1/contracts/{contract_id}",
    request_body = UpdateContract,
    params(("contract_id", description = "Contract ID")),
    responses(
        (status = 200, description = "Contract updated"),
        (status = 404, description = "Contract not found"),
        (status = 422, description = "Invalid contract terms")
    ),
    security(("bearer_auth" = [])),
    tag = "Contract"
)]
pub async fn update_contract(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<UpdateContract>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let contract_id = path.into_inner();

    let current = sqlx::query_as::<_, (Decimal, u32)>(
        "SELECT base_monthly, annual_payments FROM contracts WHERE id = ?",
    )
    .bind(contract_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, contract_id, "Failed to fetch contract");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let Some((current_base, current_payments)) = current else {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Contract not found"
        })));
    };

    let base_monthly = body.base_monthly.unwrap_or(current_base);
    let annual_payments = body.annual_payments.unwrap_or(current_payments);

    if annual_payments < 12 {
        return Ok(HttpResponse::UnprocessableEntity().json(json!({
            "message": "annual_payments must be at least 12"
        })));
    }
    if base_monthly < Decimal::ZERO {
        return Ok(HttpResponse::UnprocessableEntity().json(json!({
            "message": "base_monthly must not be negative"
        })));
    }

    sqlx::query("UPDATE contracts SET base_monthly = ?, annual_payments = ? WHERE id = ?")
        .bind(base_monthly)
        .bind(annual_payments)
        .bind(contract_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, contract_id, "Failed to update contract");
            ErrorInternalServerError("Internal Server Error")
        })?;

    events::record_event(pool.get_ref(), "contract", contract_id, "updated").await;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Contract updated"
    })))
}

/// Deactivate a contract
#[utoipa::path(
    put,
    path = "/api/v1/contracts/{contract_id}/deactivate",
    params(("contract_id", description = "Contract ID")),
    responses(
        (status = 200, description = "Contract deactivated"),
        (status = 400, description = "Contract not found or already inactive")
    ),
    security(("bearer_auth" = [])),
    tag = "Contract"
)]
pub async fn deactivate_contract(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let contract_id = path.into_inner();

    let result = sqlx::query("UPDATE contracts SET activo = FALSE WHERE id = ? AND activo = TRUE")
        .bind(contract_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, contract_id, "Failed to deactivate contract");
            ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Contract not found or already inactive"
        })));
    }

    events::record_event(pool.get_ref(), "contract", contract_id, "deactivated").await;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Contract deactivated"
    })))
}
