use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;

use super::error::ApiError;
use super::scan::DateQuery;
use crate::export::{ExportError, ExportFormat, save_scans_as_csv, save_scans_as_excel};
use crate::host::AttachmentSurface;
use crate::model::scan::Scan;
use crate::storage::scans::ScanLog;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ExportRequest {
    pub scans: Vec<Scan>,
    /// Reference date used in the file name
    #[schema(example = "2024-01-15", value_type = String, format = "date")]
    pub date: NaiveDate,
}

fn parse_format(raw: &str) -> Result<ExportFormat, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::UnknownFormat(raw.to_string()))
}

async fn download(
    scans: &[Scan],
    date: NaiveDate,
    format: ExportFormat,
) -> Result<HttpResponse, ApiError> {
    let mut surface = AttachmentSurface::default();

    match format {
        ExportFormat::Xlsx => save_scans_as_excel(scans, date, &mut surface).await?,
        ExportFormat::Csv => save_scans_as_csv(scans, date, &mut surface)?,
    }

    attachment_response(surface)
}

fn attachment_response(surface: AttachmentSurface) -> Result<HttpResponse, ApiError> {
    surface
        .into_response()
        .ok_or(ApiError::Export(ExportError::NothingDownloaded))
}

/// Export the posted scans
#[utoipa::path(
    post,
    path = "/export/{format}",
    params(
        ("format", Path, description = "`xlsx` or `csv`")
    ),
    request_body = ExportRequest,
    responses(
        (status = 200, description = "File download"),
        (status = 400, description = "Unknown export format", body = Object, example = json!({
            "message": "unknown export format: pdf"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Export"
)]
pub async fn export_scans(
    path: web::Path<String>,
    payload: web::Json<ExportRequest>,
) -> Result<HttpResponse, ApiError> {
    let format = parse_format(&path)?;
    download(&payload.scans, payload.date, format).await
}

/// Export the stored scans of a day
#[utoipa::path(
    get,
    path = "/scans/export/{format}",
    params(
        ("format", Path, description = "`xlsx` or `csv`"),
        DateQuery
    ),
    responses(
        (status = 200, description = "File download"),
        (status = 400, description = "Unknown export format", body = Object, example = json!({
            "message": "unknown export format: pdf"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Export"
)]
pub async fn export_day(
    log: web::Data<ScanLog>,
    path: web::Path<String>,
    query: web::Query<DateQuery>,
) -> Result<HttpResponse, ApiError> {
    let format = parse_format(&path)?;
    let date = query.day();
    let scans = log.scans_on(date).await?;
    download(&scans, date, format).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_download_reports_format_neutral_error() {
        let err = attachment_response(AttachmentSurface::default()).unwrap_err();
        assert!(matches!(err, ApiError::Export(ExportError::NothingDownloaded)));
        assert_eq!(err.to_string(), "export produced no file");
    }
}
