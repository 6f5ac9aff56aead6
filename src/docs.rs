use crate::api::employee::EmployeeIdCheck;
use crate::api::export::ExportRequest;
use crate::api::scan::{CheckIn, CheckOut};
use crate::model::scan::Scan;
use utoipa::OpenApi;
use utoipa::openapi::{self, server::Server};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Scan Tracker API",
        version = "0.1.0",
        description = r#"
## Device check-in / check-out tracking

Operators scan an employee badge and a device tag to check a device in, and
scan the device again to check it out.

### Key Features
- **Scans**: check in, check out, list a day's scans
- **Export**: download scans as an Excel workbook or a CSV file
- **Badges**: validate an employee id before scanning

Exports are named `scans-MM-DD-YYYY.xlsx` / `.csv` after the reference date.
Paths are relative to the server URL, which carries the configured API prefix.
"#,
    ),
    paths(
        crate::api::scan::check_in,
        crate::api::scan::check_out,
        crate::api::scan::list_scans,

        crate::api::export::export_scans,
        crate::api::export::export_day,

        crate::api::employee::validate_employee
    ),
    components(
        schemas(
            Scan,
            CheckIn,
            CheckOut,
            ExportRequest,
            EmployeeIdCheck
        )
    ),
    tags(
        (name = "Scans", description = "Check-in and check-out APIs"),
        (name = "Export", description = "Spreadsheet and CSV downloads"),
        (name = "Employee", description = "Badge validation"),
    )
)]
pub struct ApiDoc;

/// OpenAPI document served under `api_prefix`.
pub fn api_doc(api_prefix: &str) -> openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.servers = Some(vec![Server::new(api_prefix)]);
    doc
}
