use crate::api::{payroll, statutory, tax};
use crate::config::Config;
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-scope limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let protected_limiter = build_limiter(config.rate_protected_per_min);

    // All routes authenticate through the AuthUser extractor; tokens come
    // from the external identity service.
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(protected_limiter)
            .service(
                web::scope("/payroll")
                    // /payroll/compute
                    .service(
                        web::resource("/compute").route(web::post().to(payroll::compute_payroll)),
                    )
                    // /payroll
                    .service(web::resource("").route(web::get().to(payroll::list_payrolls)))
                    // /payroll/{id}/approve
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(payroll::approve_payroll)),
                    )
                    // /payroll/{id}/payslip
                    .service(
                        web::resource("/{id}/payslip")
                            .route(web::post().to(payroll::generate_payslip))
                            .route(web::get().to(payroll::get_payslip)),
                    )
                    // /payroll/{id}
                    .service(web::resource("/{id}").route(web::get().to(payroll::get_payroll))),
            )
            .service(
                web::scope("/tax")
                    // /tax/slabs
                    .service(
                        web::resource("/slabs")
                            .route(web::put().to(tax::upsert_slabs))
                            .route(web::get().to(tax::get_slabs)),
                    )
                    // /tax/declarations
                    .service(
                        web::resource("/declarations")
                            .route(web::put().to(tax::upsert_declaration)),
                    )
                    // /tax/declarations/{employee_id}/statement
                    .service(
                        web::resource("/declarations/{employee_id}/statement")
                            .route(web::post().to(tax::generate_statement))
                            .route(web::get().to(tax::get_statement)),
                    )
                    // /tax/declarations/{employee_id}
                    .service(
                        web::resource("/declarations/{employee_id}")
                            .route(web::get().to(tax::get_declaration)),
                    ),
            )
            .service(
                web::scope("/statutory").service(
                    web::resource("")
                        .route(web::put().to(statutory::upsert_rates))
                        .route(web::get().to(statutory::get_rates)),
                ),
            ),
    );
}

// COMPUTE  -> PENDING payroll record
// APPROVE  -> status flips once, approver + timestamp stamped
// PAYSLIP  -> regenerate any number of times, one snapshot per payroll
