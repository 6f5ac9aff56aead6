//! Scan exports: an Excel workbook or a CSV file, handed to the host as a
//! download named after the reference date.

use chrono::{NaiveDate, NaiveDateTime};
use derive_more::{Display, From};
use strum_macros::{Display as StrumDisplay, EnumString};

use crate::host::HostError;
use crate::model::scan::Scan;

pub mod csv;
pub mod xlsx;

pub use self::csv::save_scans_as_csv;
pub use self::xlsx::save_scans_as_excel;

pub const HEADERS: [&str; 4] = ["Employee ID", "Device ID", "Scan In Date", "Scan Out Date"];

/// e.g. `Jan 15, 2024 9:30 AM`
pub const TIMESTAMP_FORMAT: &str = "%b %d, %Y %-I:%M %p";

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum ExportFormat {
    Xlsx,
    Csv,
}

#[derive(Debug, Display, From)]
pub enum ExportError {
    #[display(fmt = "failed to write workbook: {}", _0)]
    Workbook(rust_xlsxwriter::XlsxError),
    #[display(fmt = "workbook serialization did not complete")]
    #[from(ignore)]
    Interrupted,
    #[display(fmt = "export produced no file")]
    #[from(ignore)]
    NothingDownloaded,
    #[display(fmt = "{}", _0)]
    Host(HostError),
}

impl std::error::Error for ExportError {}

pub fn format_timestamp(at: &NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// `scans-MM-DD-YYYY.{ext}`
pub fn file_name(date: NaiveDate, format: ExportFormat) -> String {
    format!("scans-{}.{}", date.format("%m-%d-%Y"), format)
}

/// Display values for one export row; an open scan has an empty scan-out cell.
pub(crate) fn scan_row(scan: &Scan) -> [String; 4] {
    [
        scan.employee.clone(),
        scan.device.clone(),
        format_timestamp(&scan.scanned_in),
        scan.scanned_out.as_ref().map(format_timestamp).unwrap_or_default(),
    ]
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::model::scan::Scan;

    pub fn jan_15() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    pub fn jan_15_at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        jan_15().and_hms_opt(h, m, s).unwrap()
    }

    pub fn open_scan() -> Scan {
        Scan::new("f881234", "D1", jan_15_at(9, 30, 0))
    }

    pub fn closed_scan() -> Scan {
        Scan {
            scanned_out: Some(jan_15_at(17, 5, 42)),
            ..Scan::new("881000", "D2", jan_15_at(0, 7, 0))
        }
    }
}
