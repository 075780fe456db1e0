use actix_web::{HttpResponse, http::StatusCode};
use serde_json::json;

/// Engine and boundary error taxonomy. The engine itself only ever produces
/// `Validation` and `Configuration`; `External` covers the data-source and
/// persistence boundary around it.
#[derive(Debug, thiserror::Error)]
pub enum PayrollError {
    /// Malformed or out-of-domain input (negative hours, fewer than 12
    /// annual payments, missing employee attribute, no active contract).
    #[error("invalid payroll input: {0}")]
    Validation(String),

    /// Broken rate tables (zero hour baseline, empty or unordered bracket
    /// table, missing year).
    #[error("invalid rate tables: {0}")]
    Configuration(String),

    /// Data-source fetch or persistence failure. Recoverable by the caller
    /// via retry; the engine never retries internally.
    #[error("data source failure: {0}")]
    External(#[from] sqlx::Error),
}

pub type PayrollResult<T> = Result<T, PayrollError>;

impl actix_web::ResponseError for PayrollError {
    fn status_code(&self) -> StatusCode {
        match self {
            PayrollError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PayrollError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PayrollError::External(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            // Do not leak SQL detail to clients; it is already logged.
            PayrollError::External(_) => "Internal Server Error".to_string(),
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}
