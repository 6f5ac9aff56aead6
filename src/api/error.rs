use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use derive_more::{Display, From};
use serde_json::json;

use crate::export::ExportError;
use crate::storage::scans::ScanError;

#[derive(Debug, Display, From)]
pub enum ApiError {
    #[display(fmt = "{}", _0)]
    Scan(ScanError),
    #[display(fmt = "{}", _0)]
    Export(ExportError),
    #[display(fmt = "unknown export format: {}", _0)]
    #[from(ignore)]
    UnknownFormat(String),
}

impl std::error::Error for ApiError {}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Scan(ScanError::InvalidEmployee(_)) | ApiError::UnknownFormat(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Scan(ScanError::AlreadyCheckedIn(_)) => StatusCode::CONFLICT,
            ApiError::Scan(ScanError::NotCheckedIn(_)) => StatusCode::NOT_FOUND,
            ApiError::Scan(ScanError::Storage(_)) | ApiError::Export(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "Internal Server Error".to_string()
        } else {
            self.to_string()
        };

        HttpResponse::build(status).json(json!({ "message": message }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageError;

    #[test]
    fn scan_errors_map_to_client_statuses() {
        let cases = [
            (ScanError::InvalidEmployee("x".into()), StatusCode::BAD_REQUEST),
            (ScanError::AlreadyCheckedIn("D1".into()), StatusCode::CONFLICT),
            (ScanError::NotCheckedIn("D1".into()), StatusCode::NOT_FOUND),
            (ScanError::Storage(StorageError::Closed), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status_code(), status);
        }
    }
}
