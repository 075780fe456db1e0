use crate::{
    api::events,
    auth::auth::AuthUser,
    model::nomina::Nomina,
    payroll::{
        ContractTerms, EmployeeAttrs, HoursWorked, MaritalStatus, PayslipResult, Supplement,
        compute_payroll,
        error::{PayrollError, PayrollResult},
        tables::TableSet,
    },
};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{error, info};
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct RunPayroll {
    #[schema(example = 1)]
    pub employee_id: u64,

    #[schema(example = 2025)]
    pub year: i32,

    #[schema(example = 6)]
    pub month: u32,
}

#[derive(Serialize, ToSchema)]
pub struct PayslipResponse {
    pub nomina_id: u64,
    pub employee_id: u64,
    pub year: i32,
    pub month: u32,
    pub payslip: PayslipResult,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct NominaQuery {
    #[schema(example = 1)]
    pub page: Option<u32>,

    #[schema(example = 10)]
    pub per_page: Option<u32>,

    #[schema(example = 1)]
    pub employee_id: Option<u64>,

    #[schema(example = 2025)]
    pub year: Option<i32>,
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedNominaResponse {
    pub data: Vec<Nomina>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

/// Everything the engine needs for one (employee, period), fetched through
/// the explicitly passed pool. No global data client anywhere.
struct PayrollInputs {
    attrs: EmployeeAttrs,
    contract: ContractTerms,
    supplements: Vec<Supplement>,
    hours: HoursWorked,
}

async fn load_inputs(
    pool: &MySqlPool,
    employee_id: u64,
    year: i32,
    month: u32,
) -> PayrollResult<PayrollInputs> {
    let employee = sqlx::query_as::<_, (String, u32, bool)>(
        "SELECT marital_status, dependents, disability FROM employees WHERE id = ?",
    )
    .bind(employee_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| PayrollError::Validation(format!("unknown employee {employee_id}")))?;

    let (marital_status, dependents, disability) = employee;
    let marital_status = MaritalStatus::parse(&marital_status).ok_or_else(|| {
        PayrollError::Validation(format!(
            "employee {employee_id} has an unrecognized marital status '{marital_status}'"
        ))
    })?;

    let contract = sqlx::query_as::<_, (u64, Decimal, u32)>(
        "SELECT id, base_monthly, annual_payments FROM contracts WHERE employee_id = ? AND activo = TRUE",
    )
    .bind(employee_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| {
        PayrollError::Validation(format!("employee {employee_id} has no active contract"))
    })?;

    let (contract_id, base_monthly, annual_payments) = contract;

    let supplements = sqlx::query_as::<_, (String, Decimal)>(
        "SELECT concept, amount FROM supplements WHERE contract_id = ? ORDER BY id",
    )
    .bind(contract_id)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(|(concept, amount)| Supplement { concept, amount })
    .collect();

    let hours = sqlx::query_as::<_, (Option<Decimal>, Decimal, Decimal)>(
        r#"
        SELECT ordinary, overtime_normal, overtime_night
        FROM worked_hours
        WHERE employee_id = ? AND year = ? AND month = ?
        "#,
    )
    .bind(employee_id)
    .bind(year)
    .bind(month)
    .fetch_optional(pool)
    .await?
    .map(|(ordinary, overtime_normal, overtime_night)| HoursWorked {
        ordinary,
        overtime_normal,
        overtime_night,
    })
    .unwrap_or_default();

    Ok(PayrollInputs {
        attrs: EmployeeAttrs { marital_status, dependents, disability },
        contract: ContractTerms { base_monthly, annual_payments },
        supplements,
        hours,
    })
}

fn check_period(month: u32) -> PayrollResult<()> {
    if !(1..=12).contains(&month) {
        return Err(PayrollError::Validation(format!(
            "month must be between 1 and 12, got {month}"
        )));
    }
    Ok(())
}

/// Compute and persist one payslip
#[utoipa::path(
    post,
    path = "/api/v1/payroll/run",
    request_body = RunPayroll,
    responses(
        (status = 200, description = "Payslip computed and stored", body = PayslipResponse),
        (status = 422, description = "Invalid input (no active contract, bad period, ...)"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn run_payroll(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    tables: web::Data<TableSet>,
    payload: web::Json<RunPayroll>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    check_period(payload.month)?;

    let inputs = load_inputs(pool.get_ref(), payload.employee_id, payload.year, payload.month)
        .await
        .map_err(|e| {
            if matches!(e, PayrollError::External(_)) {
                error!(error = %e, employee_id = payload.employee_id, "Failed to load payroll inputs");
            }
            e
        })?;

    let yearly = tables.for_year(payload.year)?;

    let payslip = compute_payroll(
        &inputs.contract,
        &inputs.supplements,
        &inputs.hours,
        &inputs.attrs,
        yearly,
    )?
    .rounded();

    let detail = serde_json::to_string(&payslip).map_err(|e| {
        error!(error = %e, "Failed to serialize payslip");
        ErrorInternalServerError("Internal Server Error")
    })?;

    // Idempotent per (employee, year, month): a retry replaces the row.
    // The LAST_INSERT_ID(id) trick makes last_insert_id() report the
    // existing row's id on the update path.
    let result = sqlx::query(
        r#"
        INSERT INTO nominas
        (employee_id, year, month, total_bruto, total_deducciones, neto,
         contribution_base, effective_rate, detail)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON DUPLICATE KEY UPDATE
            id = LAST_INSERT_ID(id),
            total_bruto = VALUES(total_bruto),
            total_deducciones = VALUES(total_deducciones),
            neto = VALUES(neto),
            contribution_base = VALUES(contribution_base),
            effective_rate = VALUES(effective_rate),
            detail = VALUES(detail)
        "#,
    )
    .bind(payload.employee_id)
    .bind(payload.year)
    .bind(payload.month)
    .bind(payslip.total_bruto)
    .bind(payslip.total_deducciones)
    .bind(payslip.neto)
    .bind(payslip.contribution_base)
    .bind(payslip.effective_rate)
    .bind(&detail)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id = payload.employee_id, "Failed to persist payslip");
        actix_web::Error::from(PayrollError::External(e))
    })?;

    let nomina_id = result.last_insert_id();

    events::record_event(pool.get_ref(), "nomina", nomina_id, "generated").await;

    info!(
        employee_id = payload.employee_id,
        year = payload.year,
        month = payload.month,
        nomina_id,
        "Payslip generated"
    );

    Ok(HttpResponse::Ok().json(PayslipResponse {
        nomina_id,
        employee_id: payload.employee_id,
        year: payload.year,
        month: payload.month,
        payslip,
    }))
}

/// Compute a payslip without persisting anything
#[utoipa::path(
    post,
    path = "/api/v1/payroll/preview",
    request_body = RunPayroll,
    responses(
        (status = 200, description = "Payslip preview", body = PayslipResult),
        (status = 422, description = "Invalid input"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn preview_payroll(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    tables: web::Data<TableSet>,
    payload: web::Json<RunPayroll>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    check_period(payload.month)?;

    let inputs =
        load_inputs(pool.get_ref(), payload.employee_id, payload.year, payload.month).await?;
    let yearly = tables.for_year(payload.year)?;

    let payslip = compute_payroll(
        &inputs.contract,
        &inputs.supplements,
        &inputs.hours,
        &inputs.attrs,
        yearly,
    )?
    .rounded();

    Ok(HttpResponse::Ok().json(payslip))
}

/// Payslip history
#[utoipa::path(
    get,
    path = "/api/v1/payroll",
    params(NominaQuery),
    responses(
        (status = 200, body = PaginatedNominaResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn list_nominas(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<NominaQuery>,
) -> actix_web::Result<impl Responder> {
    // employees see their own history; HR/Admin anyone's
    if let Some(employee_id) = query.employee_id {
        if !auth.may_read_employee(employee_id) {
            return Err(actix_web::error::ErrorForbidden("Not your records"));
        }
    } else {
        auth.require_hr_or_admin()?;
    }

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);
    let offset = (page - 1) * per_page;

    let mut where_sql = String::from(" WHERE 1=1");
    if query.employee_id.is_some() {
        where_sql.push_str(" AND employee_id = ?");
    }
    if query.year.is_some() {
        where_sql.push_str(" AND year = ?");
    }

    let count_sql = format!("SELECT COUNT(*) FROM nominas{}", where_sql);
    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    if let Some(employee_id) = query.employee_id {
        count_q = count_q.bind(employee_id);
    }
    if let Some(year) = query.year {
        count_q = count_q.bind(year);
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to count payslips");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let data_sql = format!(
        r#"
        SELECT id, employee_id, year, month, total_bruto, total_deducciones,
               neto, contribution_base, effective_rate, detail
        FROM nominas
        {}
        ORDER BY year DESC, month DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, Nomina>(&data_sql);
    if let Some(employee_id) = query.employee_id {
        data_q = data_q.bind(employee_id);
    }
    if let Some(year) = query.year {
        data_q = data_q.bind(year);
    }

    let nominas = data_q
        .bind(per_page as i64)
        .bind(offset as i64)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch payslips");
            ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(PaginatedNominaResponse {
        data: nominas,
        page,
        per_page,
        total,
    }))
}

/// One stored payslip, with its itemized lines
#[utoipa::path(
    get,
    path = "/api/v1/payroll/{nomina_id}",
    params(("nomina_id", description = "Payslip ID")),
    responses(
        (status = 200, body = PayslipResponse),
        (status = 404)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn get_nomina(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let nomina_id = path.into_inner();

    let nomina = sqlx::query_as::<_, Nomina>(
        r#"
        SELECT id, employee_id, year, month, total_bruto, total_deducciones,
               neto, contribution_base, effective_rate, detail
        FROM nominas
        WHERE id = ?
        "#,
    )
    .bind(nomina_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, nomina_id, "Failed to fetch payslip");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let Some(nomina) = nomina else {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Payslip not found"
        })));
    };

    if !auth.may_read_employee(nomina.employee_id) {
        return Err(actix_web::error::ErrorForbidden("Not your records"));
    }

    let payslip: PayslipResult = serde_json::from_str(&nomina.detail).map_err(|e| {
        error!(error = %e, nomina_id, "Stored payslip detail is corrupt");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(PayslipResponse {
        nomina_id: nomina.id,
        employee_id: nomina.employee_id,
        year: nomina.year,
        month: nomina.month,
        payslip,
    }))
}
