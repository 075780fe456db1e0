use crate::auth::auth::AuthUser;
use crate::auth::jwt::verify_token;
use crate::config::Config;
use crate::model::role::Role;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};
use serde_json::json;

/// Pulls the bearer token out of the Authorization header.
fn bearer_token(req: &ServiceRequest) -> Result<&str, &'static str> {
    let header = req
        .headers()
        .get("Authorization")
        .ok_or("Missing Authorization header")?;
    header
        .to_str()
        .map_err(|_| "Invalid Authorization header encoding")?
        .strip_prefix("Bearer ")
        .ok_or("Authorization header must start with Bearer")
}

/// Verifies the access token and resolves the caller. Every protected
/// route downstream can then extract `AuthUser` from request extensions.
fn authenticate(req: &ServiceRequest, secret: &str) -> Result<AuthUser, String> {
    let token = bearer_token(req).map_err(str::to_owned)?;

    let claims = verify_token(token, secret).map_err(|e| format!("Invalid or expired token: {e}"))?;

    let role = Role::from_id(claims.role).ok_or_else(|| "Invalid role".to_owned())?;

    Ok(AuthUser {
        user_id: claims.user_id,
        username: claims.sub,
        role,
        employee_id: claims.employee_id,
    })
}

pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let config = req
        .app_data::<Data<Config>>()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("App config missing"))?;

    match authenticate(&req, &config.jwt_secret) {
        Ok(auth_user) => {
            req.extensions_mut().insert(auth_user);
            next.call(req).await
        }
        Err(reason) => {
            let resp = HttpResponse::Unauthorized().json(json!({ "error": reason }));
            Ok(req.into_response(resp.map_into_boxed_body()))
        }
    }
}
