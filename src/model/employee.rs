use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_code": "EMP-001",
        "first_name": "Lucia",
        "last_name": "Fernandez",
        "email": "lucia.fernandez@company.com",
        "phone": "+34600123456",
        "birth_date": "1988-04-12",
        "marital_status": "single",
        "dependents": 1,
        "disability": false,
        "hire_date": "2021-09-01",
        "status": "active"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "EMP-001")]
    pub employee_code: String,

    #[schema(example = "Lucia")]
    pub first_name: String,

    #[schema(example = "Fernandez")]
    pub last_name: String,

    #[schema(example = "lucia.fernandez@company.com")]
    pub email: String,

    #[schema(example = "+34600123456", nullable = true)]
    pub phone: Option<String>,

    #[schema(example = "1988-04-12", value_type = String, format = "date")]
    pub birth_date: NaiveDate,

    /// single | married_sole_earner | other
    #[schema(example = "single")]
    pub marital_status: String,

    #[schema(example = 1)]
    pub dependents: u32,

    pub disability: bool,

    #[schema(example = "2021-09-01", value_type = String, format = "date")]
    pub hire_date: NaiveDate,

    #[schema(example = "active")]
    pub status: String,
}
