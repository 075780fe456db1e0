use crate::{
    api::{contract, employee, events, hours, payroll, punch, supplement},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
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

    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let register_limiter = Arc::new(build_limiter(config.rate_register_per_min));
    let refresh_limiter = Arc::new(build_limiter(config.rate_refresh_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/register")
                    .wrap(register_limiter.clone())
                    .route(web::post().to(handlers::register)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(refresh_limiter.clone())
                    .route(web::post().to(handlers::refresh_token)),
            )
            .service(
                web::resource("/logout")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(protected_limiter) // rate limiting
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    // /employees/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(employee::update_employee))
                            .route(web::get().to(employee::get_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    ),
            )
            .service(
                web::scope("/contracts")
                    // /contracts
                    .service(
                        web::resource("")
                            .route(web::post().to(contract::create_contract))
                            .route(web::get().to(contract::list_contracts)),
                    )
                    // /contracts/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(contract::get_contract))
                            .route(web::put().to(contract::update_contract)),
                    )
                    // /contracts/{id}/deactivate
                    .service(
                        web::resource("/{id}/deactivate")
                            .route(web::put().to(contract::deactivate_contract)),
                    )
                    // /contracts/{id}/supplements
                    .service(
                        web::resource("/{id}/supplements")
                            .route(web::post().to(supplement::create_supplement))
                            .route(web::get().to(supplement::list_supplements)),
                    ),
            )
            .service(
                web::scope("/supplements").service(
                    web::resource("/{id}").route(web::delete().to(supplement::delete_supplement)),
                ),
            )
            .service(
                web::scope("/hours").service(
                    web::resource("")
                        .route(web::put().to(hours::upsert_hours))
                        .route(web::get().to(hours::list_hours)),
                ),
            )
            .service(
                web::scope("/punches")
                    .service(web::resource("").route(web::get().to(punch::list_punches)))
                    .service(web::resource("/check-in").route(web::post().to(punch::check_in)))
                    .service(web::resource("/check-out").route(web::post().to(punch::check_out))),
            )
            .service(
                web::scope("/payroll")
                    // /payroll
                    .service(web::resource("").route(web::get().to(payroll::list_nominas)))
                    // /payroll/run
                    .service(web::resource("/run").route(web::post().to(payroll::run_payroll)))
                    // /payroll/preview
                    .service(
                        web::resource("/preview").route(web::post().to(payroll::preview_payroll)),
                    )
                    // /payroll/{id}
                    .service(web::resource("/{id}").route(web::get().to(payroll::get_nomina))),
            )
            .service(
                web::scope("/events")
                    .service(web::resource("").route(web::get().to(events::list_events))),
            ),
    );
}
