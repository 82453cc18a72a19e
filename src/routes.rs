use crate::{
    api::{attendance, employee, leave, payroll, task},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

fn limiter_config(requests_per_min: u32) -> GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        60_000 / requests_per_min as u64
    };
    GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .unwrap()
}

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    let login_limiter = limiter_config(config.rate_login_per_min);
    let protected_limiter = limiter_config(config.rate_protected_per_min);

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/admin/login")
                    .wrap(Governor::new(&login_limiter))
                    .route(web::post().to(handlers::admin_login)),
            )
            .service(
                web::resource("/employee/login")
                    .wrap(Governor::new(&login_limiter))
                    .route(web::post().to(handlers::employee_login)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware))
            .wrap(Governor::new(&protected_limiter))
            .service(
                web::scope("/employees")
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    .service(
                        web::resource("/{employee_code}")
                            .route(web::get().to(employee::get_employee))
                            .route(web::put().to(employee::update_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    .service(
                        web::resource("")
                            .route(web::get().to(attendance::my_attendance)),
                    )
                    .service(
                        web::resource("/punch-in")
                            .route(web::post().to(attendance::punch_in)),
                    )
                    .service(
                        web::resource("/punch-out")
                            .route(web::put().to(attendance::punch_out)),
                    )
                    .service(
                        web::resource("/all")
                            .route(web::get().to(attendance::all_attendance)),
                    )
                    .service(
                        web::resource("/export")
                            .route(web::get().to(attendance::export_attendance)),
                    ),
            )
            .service(
                web::scope("/leave")
                    .service(
                        web::resource("")
                            .route(web::get().to(leave::list_leaves))
                            .route(web::post().to(leave::submit_leave)),
                    )
                    .service(
                        web::resource("/{leave_id}")
                            .route(web::put().to(leave::decide_leave)),
                    ),
            )
            .service(
                web::scope("/payslip")
                    .service(
                        web::resource("/generate")
                            .route(web::post().to(payroll::generate_payslip)),
                    )
                    .service(
                        web::resource("/email")
                            .route(web::post().to(payroll::email_payslip)),
                    ),
            )
            .service(
                web::scope("/tasks")
                    .service(
                        web::resource("")
                            .route(web::post().to(task::assign_task))
                            .route(web::get().to(task::list_tasks)),
                    )
                    .service(
                        web::resource("/{task_id}")
                            .route(web::put().to(task::update_task_status)),
                    ),
            ),
    );
}
