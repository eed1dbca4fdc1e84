use crate::core::aggregate::coerce_quantity;
use crate::domain::model::{PivotTable, COMPANY_COLUMN, TOTAL_COLUMN};
use crate::utils::error::{HoldingsError, Result};
use chrono::{DateTime, Utc};
use rust_xlsxwriter::Workbook;

/// Fixed name for the CSV download.
pub const CSV_EXPORT_NAME: &str = "pivoted_shareholding.csv";

/// Content type served alongside the spreadsheet download.
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Serializes the pivot to UTF-8 comma-delimited text: one header row with
/// the owner columns and the trailing total, one row per company.
pub fn to_csv_bytes(pivot: &PivotTable) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec![COMPANY_COLUMN.to_string()];
    header.extend(pivot.owners().iter().cloned());
    header.push(TOTAL_COLUMN.to_string());
    writer.write_record(&header)?;

    for (row, company) in pivot.companies().iter().enumerate() {
        let mut fields = vec![company.clone()];
        for col in 0..pivot.owners().len() {
            fields.push(pivot.value_at(row, col).to_string());
        }
        fields.push(pivot.row_total(row).to_string());
        writer.write_record(&fields)?;
    }

    writer
        .into_inner()
        .map_err(|e| HoldingsError::ProcessingError {
            message: format!("Failed to finish CSV export: {}", e),
        })
}

/// Reconstructs a pivot from its CSV serialization (first column as row
/// index). A trailing total column is recognized by name and re-derived
/// rather than stored.
pub fn from_csv_bytes(bytes: &[u8]) -> Result<PivotTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = reader.records();
    let header = match rows.next() {
        Some(record) => record?,
        None => {
            return Err(HoldingsError::ProcessingError {
                message: "Pivot CSV has no header row".to_string(),
            })
        }
    };

    let mut owners: Vec<String> = header.iter().skip(1).map(str::to_string).collect();
    if owners.last().map(String::as_str) == Some(TOTAL_COLUMN) {
        owners.pop();
    }

    let mut companies = Vec::new();
    let mut values = Vec::new();
    for record in rows {
        let record = record?;
        companies.push(record.get(0).unwrap_or_default().to_string());
        values.push(
            (0..owners.len())
                .map(|col| coerce_quantity(record.get(col + 1).unwrap_or_default()))
                .collect(),
        );
    }

    Ok(PivotTable::new(companies, owners, values))
}

/// Serializes the pivot to a single-sheet XLSX workbook with the same
/// layout as the CSV export.
pub fn to_xlsx_bytes(pivot: &PivotTable) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    worksheet.write_string(0, 0, COMPANY_COLUMN)?;
    for (col, owner) in pivot.owners().iter().enumerate() {
        worksheet.write_string(0, col as u16 + 1, owner)?;
    }
    worksheet.write_string(0, pivot.owners().len() as u16 + 1, TOTAL_COLUMN)?;

    for (row, company) in pivot.companies().iter().enumerate() {
        let row_num = row as u32 + 1;
        worksheet.write_string(row_num, 0, company)?;
        for col in 0..pivot.owners().len() {
            worksheet.write_number(row_num, col as u16 + 1, pivot.value_at(row, col))?;
        }
        worksheet.write_number(
            row_num,
            pivot.owners().len() as u16 + 1,
            pivot.row_total(row),
        )?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// Renders the pivot as aligned plain text for terminal display.
pub fn to_text(pivot: &PivotTable) -> String {
    let mut header = vec![COMPANY_COLUMN.to_string()];
    header.extend(pivot.owners().iter().cloned());
    header.push(TOTAL_COLUMN.to_string());

    let mut lines = vec![header];
    for (row, company) in pivot.companies().iter().enumerate() {
        let mut fields = vec![company.clone()];
        for col in 0..pivot.owners().len() {
            fields.push(pivot.value_at(row, col).to_string());
        }
        fields.push(pivot.row_total(row).to_string());
        lines.push(fields);
    }

    let mut widths = vec![0usize; lines[0].len()];
    for line in &lines {
        for (i, field) in line.iter().enumerate() {
            widths[i] = widths[i].max(field.len());
        }
    }

    lines
        .iter()
        .map(|line| {
            line.iter()
                .enumerate()
                .map(|(i, field)| format!("{:width$}", field, width = widths[i]))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Timestamp-qualified download name for the spreadsheet export, in UTC.
pub fn timestamped_xlsx_name(now: DateTime<Utc>) -> String {
    now.format("pivot - %d-%m-%Y - %H-%M-%S.xlsx").to_string()
}

/// Auto-generated snapshot name when the user does not provide one.
pub fn timestamped_snapshot_name(now: DateTime<Utc>) -> String {
    now.format("pivot - %d-%m-%Y - %H-%M-%S").to_string()
}
