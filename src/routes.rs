use crate::{api::attendance, auth::handlers, config::Config, error::ApiError, model::attendance::MealType};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_cors::Cors;
use actix_web::{http::header, web};
use strum::IntoEnumIterator;

// Helper to build per-route limiter
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        (60_000 / requests_per_min as u64).max(1)
    };
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .expect("period and burst size are non-zero");
    Governor::new(&cfg)
}

/// Any origin may call the API with credentials; the guest frontend is served
/// from a different host. Preflight requests are answered here before routing.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .supports_credentials()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(3600)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    let login_limiter = build_limiter(config.rate_login_per_min);
    let register_limiter = build_limiter(config.rate_register_per_min);

    // Malformed bodies and query strings use the same error shape as everything else
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::validation(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| ApiError::validation(err.to_string()).into()),
    );

    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/register")
                    .wrap(register_limiter)
                    .route(web::post().to(handlers::register)),
            )
            .service(
                web::resource("/login")
                    .wrap(login_limiter)
                    .route(web::post().to(handlers::login)),
            ),
    );

    // /lunch, /dinner
    for meal in MealType::iter() {
        cfg.service(
            web::scope(&meal.scope())
                .app_data(web::Data::new(meal))
                .service(
                    web::resource("")
                        .route(web::get().to(attendance::get_attendance))
                        .route(web::post().to(attendance::submit_attendance)),
                )
                // public
                .service(web::resource("/report").route(web::get().to(attendance::report))),
        );
    }
}
