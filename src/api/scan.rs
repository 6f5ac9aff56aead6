use actix_web::{HttpResponse, web};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use super::error::ApiError;
use crate::storage::scans::ScanLog;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckIn {
    #[schema(example = "f881234")]
    pub employee: String,
    #[schema(example = "D1")]
    pub device: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckOut {
    #[schema(example = "D1")]
    pub device: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DateQuery {
    /// Day to read, `YYYY-MM-DD`; defaults to today
    #[param(value_type = Option<String>, format = "date", example = "2024-01-15")]
    pub date: Option<NaiveDate>,
}

impl DateQuery {
    pub fn day(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| Local::now().date_naive())
    }
}

/// Check a device in
#[utoipa::path(
    post,
    path = "/scans",
    request_body = CheckIn,
    responses(
        (status = 201, description = "Checked in", body = crate::model::scan::Scan),
        (status = 400, description = "Invalid employee id", body = Object, example = json!({
            "message": "invalid employee id: x12"
        })),
        (status = 409, description = "Device already checked in", body = Object, example = json!({
            "message": "device D1 is already checked in"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Scans"
)]
pub async fn check_in(
    log: web::Data<ScanLog>,
    payload: web::Json<CheckIn>,
) -> Result<HttpResponse, ApiError> {
    let now = Local::now().naive_local();
    let scan = log
        .check_in(payload.employee.trim(), payload.device.trim(), now)
        .await?;

    Ok(HttpResponse::Created().json(scan))
}

/// Check a device out
#[utoipa::path(
    put,
    path = "/scans",
    request_body = CheckOut,
    responses(
        (status = 200, description = "Checked out", body = crate::model::scan::Scan),
        (status = 404, description = "Device not checked in today", body = Object, example = json!({
            "message": "device D1 is not checked in"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Scans"
)]
pub async fn check_out(
    log: web::Data<ScanLog>,
    payload: web::Json<CheckOut>,
) -> Result<HttpResponse, ApiError> {
    let now = Local::now().naive_local();
    let scan = log.check_out(payload.device.trim(), now).await?;

    Ok(HttpResponse::Ok().json(scan))
}

/// List the scans of a day
#[utoipa::path(
    get,
    path = "/scans",
    params(DateQuery),
    responses(
        (status = 200, description = "Scans checked in on the day", body = [crate::model::scan::Scan]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Scans"
)]
pub async fn list_scans(
    log: web::Data<ScanLog>,
    query: web::Query<DateQuery>,
) -> Result<HttpResponse, ApiError> {
    let scans = log.scans_on(query.day()).await?;
    Ok(HttpResponse::Ok().json(scans))
}
