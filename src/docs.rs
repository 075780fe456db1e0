use crate::api::contract::{ContractQuery, CreateContract, UpdateContract};
use crate::api::employee::{CreateEmployee, EmployeeListResponse, EmployeeQuery};
use crate::api::events::EventQuery;
use crate::api::hours::{HoursQuery, UpsertHours};
use crate::api::payroll::{
    NominaQuery, PaginatedNominaResponse, PayslipResponse, RunPayroll,
};
use crate::api::punch::PunchQuery;
use crate::api::supplement::CreateSupplement;
use crate::model::contract::Contract;
use crate::model::employee::Employee;
use crate::model::event::ChangeEvent;
use crate::model::nomina::Nomina;
use crate::model::punch::Punch;
use crate::model::supplement::Supplement;
use crate::model::worked_hours::WorkedHours;
use crate::payroll::{MaritalStatus, PayslipLine, PayslipResult};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Nomina API",
        version = "1.0.0",
        description = r#"
## HR administration backend with a deterministic payroll engine

Employee directory, contracts with salary supplements, monthly worked-hours
records, daily time punches, and payslip generation.

### Payroll
Payslips are computed by a deterministic in-process engine from the active
contract, its supplements, the month's worked hours and the employee's tax
attributes, against yearly rate tables (social security items, progressive
income-tax brackets, personal/family allowances). One frozen payslip per
employee and month; re-running a period replaces it.

### Security
Endpoints under the API prefix require **JWT Bearer authentication**.
Payroll runs and directory writes need the **Admin** or **HR** role;
employees can read their own hours, punches and payslips.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::list_employees,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::contract::create_contract,
        crate::api::contract::list_contracts,
        crate::api::contract::get_contract,
        crate::api::contract::update_contract,
        crate::api::contract::deactivate_contract,

        crate::api::supplement::create_supplement,
        crate::api::supplement::list_supplements,
        crate::api::supplement::delete_supplement,

        crate::api::hours::upsert_hours,
        crate::api::hours::list_hours,

        crate::api::punch::check_in,
        crate::api::punch::check_out,
        crate::api::punch::list_punches,

        crate::api::payroll::run_payroll,
        crate::api::payroll::preview_payroll,
        crate::api::payroll::list_nominas,
        crate::api::payroll::get_nomina,

        crate::api::events::list_events
    ),
    components(
        schemas(
            Employee,
            CreateEmployee,
            EmployeeQuery,
            EmployeeListResponse,
            Contract,
            CreateContract,
            UpdateContract,
            ContractQuery,
            Supplement,
            CreateSupplement,
            WorkedHours,
            UpsertHours,
            HoursQuery,
            Punch,
            PunchQuery,
            Nomina,
            RunPayroll,
            NominaQuery,
            PaginatedNominaResponse,
            PayslipResponse,
            PayslipResult,
            PayslipLine,
            MaritalStatus,
            ChangeEvent,
            EventQuery
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Employee", description = "Employee directory APIs"),
        (name = "Contract", description = "Contract and supplement APIs"),
        (name = "Hours", description = "Monthly worked-hours APIs"),
        (name = "Punch", description = "Daily time punch APIs"),
        (name = "Payroll", description = "Payslip computation and history APIs"),
        (name = "Events", description = "Change-event polling APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
