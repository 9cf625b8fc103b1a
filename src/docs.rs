use crate::api::payroll::{ComputePayroll, PaginatedPayrollResponse, PayrollQuery};
use crate::api::statutory::{StatutoryQuery, UpsertStatutoryRates};
use crate::api::tax::{FinancialYearQuery, SlabQuery, UpsertDeclaration, UpsertSlabSet};
use crate::model::payroll::{PayrollRecord, PayrollStatus};
use crate::model::payslip::{PayslipSnapshot, TaxStatement};
use crate::model::salary::SalaryStructure;
use crate::model::statutory::StatutoryRates;
use crate::model::tax::{TaxBracket, TaxDeclaration, TaxSlabSet};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Payrun API",
        version = "1.0.0",
        description = r#"
## Payroll & Tax Computation Service

Computes employee pay for a period from the salary structure, attendance
facts, statutory rates, and tax slabs, then locks the result behind an
approval step and issues immutable payslip / tax-statement artifacts.

### Key Features
- **Payroll Computation**
  - LOP proration, overtime, statutory deductions, progressive tax slabs
- **Lifecycle**
  - PENDING -> APPROVED, single-use approval, locked records
- **Artifacts**
  - Idempotent payslip regeneration, annual tax statements
- **Configuration**
  - Statutory rates per jurisdiction, slab sets per regime and year

### Security
Endpoints are protected with **JWT Bearer authentication**; tokens are
issued by the external identity service. Mutations need HR, Finance, or
Admin roles; employees can read their own artifacts.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::payroll::compute_payroll,
        crate::api::payroll::get_payroll,
        crate::api::payroll::list_payrolls,
        crate::api::payroll::approve_payroll,
        crate::api::payroll::generate_payslip,
        crate::api::payroll::get_payslip,

        crate::api::tax::upsert_slabs,
        crate::api::tax::get_slabs,
        crate::api::tax::upsert_declaration,
        crate::api::tax::get_declaration,
        crate::api::tax::generate_statement,
        crate::api::tax::get_statement,

        crate::api::statutory::upsert_rates,
        crate::api::statutory::get_rates
    ),
    components(
        schemas(
            ComputePayroll,
            PayrollQuery,
            PaginatedPayrollResponse,
            PayrollRecord,
            PayrollStatus,
            PayslipSnapshot,
            TaxStatement,
            SalaryStructure,
            StatutoryRates,
            StatutoryQuery,
            UpsertStatutoryRates,
            TaxBracket,
            TaxSlabSet,
            TaxDeclaration,
            SlabQuery,
            FinancialYearQuery,
            UpsertDeclaration,
            UpsertSlabSet
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Payroll", description = "Payroll computation and lifecycle APIs"),
        (name = "Payslip", description = "Payslip artifact APIs"),
        (name = "Tax", description = "Tax slab, declaration, and statement APIs"),
        (name = "Statutory", description = "Statutory rate configuration APIs"),
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
