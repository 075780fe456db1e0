use crate::{auth::auth::AuthUser, model::supplement::Supplement};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreateSupplement {
    #[schema(example = "Transport")]
    pub concept: String,

    #[schema(value_type = f64, example = 95.5)]
    pub amount: Decimal,
}

/// Add a supplement to a contract
#[utoipa::path(
    post,
    path = "/api/v1/contracts/{contract_id}/supplements",
    request_body = CreateSupplement,
    params(("contract_id", description = "Contract ID")),
    responses(
        (status = 201, description = "Supplement created"),
        (status = 404, description = "Contract not found"),
        (status = 422, description = "Invalid supplement")
    ),
    security(("bearer_auth" = [])),
    tag = "Contract"
)]
pub async fn create_supplement(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<CreateSupplement>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let contract_id = path.into_inner();

    if payload.concept.trim().is_empty() {
        return Ok(HttpResponse::UnprocessableEntity().json(json!({
            "message": "concept must not be empty"
        })));
    }
    if payload.amount < Decimal::ZERO {
        return Ok(HttpResponse::UnprocessableEntity().json(json!({
            "message": "amount must not be negative"
        })));
    }

    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM contracts WHERE id = ? LIMIT 1)",
    )
    .bind(contract_id)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, contract_id, "Failed to check contract");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if !exists {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Contract not found"
        })));
    }

    sqlx::query("INSERT INTO supplements (contract_id, concept, amount) VALUES (?, ?, ?)")
        .bind(contract_id)
        .bind(payload.concept.trim())
        .bind(payload.amount)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, contract_id, "Failed to create supplement");
            ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Supplement created"
    })))
}

/// List a contract's supplements
#[utoipa::path(
    get,
    path = "/api/v1/contracts/{contract_id}/supplements",
    params(("contract_id", description = "Contract ID")),
    responses(
        (status = 200, description = "Supplement list", body = [Supplement])
    ),
    security(("bearer_auth" = [])),
    tag = "Contract"
)]
pub async fn list_supplements(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let contract_id = path.into_inner();

    let supplements = sqlx::query_as::<_, Supplement>(
        "SELECT id, contract_id, concept, amount FROM supplements WHERE contract_id = ? ORDER BY id",
    )
    .bind(contract_id)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, contract_id, "Failed to fetch supplements");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(supplements))
}

/// Remove a supplement
#[utoipa::path(
    delete,
    path = "/api/v1/supplements/{supplement_id}",
    params(("supplement_id", description = "Supplement ID")),
    responses(
        (status = 200, description = "Supplement deleted"),
        (status = 404, description = "Supplement not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Contract"
)]
pub async fn delete_supplement(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let supplement_id = path.into_inner();

    let result = sqlx::query("DELETE FROM supplements WHERE id = ?")
        .bind(supplement_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, supplement_id, "Failed to delete supplement");
            ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Supplement not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Supplement deleted"
    })))
}
