use crate::api::{employee, export, scan};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use std::sync::Arc;

pub type ApiLimiter = Governor<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-IP limiter shared by every worker
pub fn build_limiter(requests_per_min: u32) -> anyhow::Result<ApiLimiter> {
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
        .ok_or_else(|| anyhow::anyhow!("invalid rate limit: {requests_per_min} per minute"))?;
    Ok(Governor::new(&cfg))
}

pub fn configure(cfg: &mut web::ServiceConfig, api_prefix: &str, limiter: Arc<ApiLimiter>) {
    cfg.service(
        web::scope(api_prefix)
            .wrap(limiter) // rate limiting
            .configure(api_routes),
    );
}

/// Routes under the API prefix
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/scans")
            // /scans
            .service(
                web::resource("")
                    .route(web::get().to(scan::list_scans))
                    .route(web::post().to(scan::check_in))
                    .route(web::put().to(scan::check_out)),
            )
            // /scans/export/{format}
            .service(web::resource("/export/{format}").route(web::get().to(export::export_day))),
    )
    .service(web::resource("/export/{format}").route(web::post().to(export::export_scans)))
    .service(
        web::resource("/employee/validate/{id}").route(web::get().to(employee::validate_employee)),
    );
}
