use chrono::NaiveDate;
use rust_xlsxwriter::{Format, FormatAlign, Workbook, XlsxError};

use super::{ExportError, ExportFormat, HEADERS, file_name, scan_row};
use crate::host::{FileDownload, HostSurface};
use crate::model::scan::Scan;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Display widths, in characters, matching `HEADERS`.
const COLUMN_WIDTHS: [f64; 4] = [15.0, 15.0, 20.0, 20.0];

fn build_workbook(sheet_name: &str, rows: &[[String; 4]]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let centered = Format::new()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col, (header, width)) in HEADERS.iter().zip(COLUMN_WIDTHS).enumerate() {
        let col = col as u16;
        worksheet.set_column_width(col, width)?;
        worksheet.set_column_format(col, &centered)?;
        worksheet.write_string_with_format(0, col, *header, &centered)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let row_num = i as u32 + 1;
        for (col, value) in row.iter().enumerate() {
            let col = col as u16;
            if value.is_empty() {
                worksheet.write_blank(row_num, col, &centered)?;
            } else {
                worksheet.write_string_with_format(row_num, col, value, &centered)?;
            }
        }
    }

    workbook.save_to_buffer()
}

/// Write `scans` to a single-sheet workbook and hand it to `host`.
///
/// The sheet shares the file's name. Serialization runs on the blocking pool,
/// so the caller's thread is free until the buffer is ready.
pub async fn save_scans_as_excel(
    scans: &[Scan],
    date: NaiveDate,
    host: &mut impl HostSurface,
) -> Result<(), ExportError> {
    let name = file_name(date, ExportFormat::Xlsx);
    let rows: Vec<[String; 4]> = scans.iter().map(scan_row).collect();

    tracing::info!(file_name = %name, rows = rows.len(), "exporting scans as xlsx");

    let sheet_name = name.clone();
    let bytes = actix_web::rt::task::spawn_blocking(move || build_workbook(&sheet_name, &rows))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "workbook task failed");
            ExportError::Interrupted
        })??;

    host.download(FileDownload {
        file_name: name,
        content_type: XLSX_CONTENT_TYPE,
        bytes,
    })?;

    Ok(())
}
