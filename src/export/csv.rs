use chrono::NaiveDate;

use super::{ExportError, ExportFormat, HEADERS, file_name, format_timestamp};
use crate::host::{FileDownload, HostSurface};
use crate::model::scan::Scan;

pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Quote a field only when it would otherwise break the row.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Header plus one line per scan, `\n`-joined with no trailing newline.
/// Dates are always quoted since the rendered form contains a comma.
pub fn scans_to_csv(scans: &[Scan]) -> String {
    let mut lines = Vec::with_capacity(scans.len() + 1);
    lines.push(HEADERS.join(","));

    for scan in scans {
        let scanned_out = scan
            .scanned_out
            .as_ref()
            .map(|at| format!("\"{}\"", format_timestamp(at)))
            .unwrap_or_default();

        lines.push(format!(
            "{},{},\"{}\",{}",
            escape(&scan.employee),
            escape(&scan.device),
            format_timestamp(&scan.scanned_in),
            scanned_out
        ));
    }

    lines.join("\n")
}

pub fn save_scans_as_csv(
    scans: &[Scan],
    date: NaiveDate,
    host: &mut impl HostSurface,
) -> Result<(), ExportError> {
    let name = file_name(date, ExportFormat::Csv);
    let csv = scans_to_csv(scans);

    tracing::info!(file_name = %name, rows = scans.len(), "exporting scans as csv");

    host.download(FileDownload {
        file_name: name,
        content_type: CSV_CONTENT_TYPE,
        bytes: csv.into_bytes(),
    })?;

    Ok(())
}
