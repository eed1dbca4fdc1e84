use crate::config::profile::{ColumnSelector, NormalizerProfile};
use crate::core::extract::owner_from_filename;
use crate::domain::model::{FileFormat, Record, RecordSet, UploadedFile};
use crate::utils::error::{HoldingsError, Result};
use calamine::{Data, Reader, Xlsx};
use std::io::Cursor;

/// Normalizes one uploaded statement into canonical records.
///
/// Structural problems (too few columns, missing named columns) and parse
/// failures are per-file errors; the caller decides whether the batch
/// continues.
pub fn normalize(file: &UploadedFile, profile: &NormalizerProfile) -> Result<RecordSet> {
    let owner = owner_from_filename(&file.name);

    let rows = match file.format {
        FileFormat::Csv => read_csv_rows(&file.bytes)?,
        FileFormat::Xlsx => read_xlsx_rows(&file.name, &file.bytes, profile.skip_rows)?,
    };

    let Some((header, data)) = rows.split_first() else {
        return Err(HoldingsError::ParseError {
            file: file.name.clone(),
            message: "file contains no rows".to_string(),
        });
    };

    let mut data = data.to_vec();
    // The last data row is assumed to be a report-level totals row. This is
    // a layout assumption, not a detection; see NormalizerProfile.
    if data.len() > 1 && profile.drop_footer {
        data.pop();
    }

    let (company_idx, quantity_idx) = resolve_columns(&file.name, header, &profile.columns)?;

    let records = data
        .iter()
        .map(|row| Record {
            company: row.get(company_idx).cloned().unwrap_or_default(),
            quantity: row.get(quantity_idx).cloned().unwrap_or_default(),
            owner: owner.clone(),
        })
        .collect();

    Ok(RecordSet {
        source: file.name.clone(),
        records,
    })
}

fn resolve_columns(
    file: &str,
    header: &[String],
    selector: &ColumnSelector,
) -> Result<(usize, usize)> {
    match selector {
        ColumnSelector::ByIndex { company, quantity } => {
            let needed = company.max(quantity) + 1;
            if header.len() < needed {
                return Err(HoldingsError::StructuralError {
                    file: file.to_string(),
                    reason: format!(
                        "{} column(s) found, at least {} required",
                        header.len(),
                        needed
                    ),
                });
            }
            Ok((*company, *quantity))
        }
        ColumnSelector::ByName { company, quantity } => {
            let find = |name: &str| header.iter().position(|cell| cell == name);
            match (find(company), find(quantity)) {
                (Some(c), Some(q)) => Ok((c, q)),
                (company_idx, quantity_idx) => {
                    let mut missing = Vec::new();
                    if company_idx.is_none() {
                        missing.push(company.as_str());
                    }
                    if quantity_idx.is_none() {
                        missing.push(quantity.as_str());
                    }
                    Err(HoldingsError::StructuralError {
                        file: file.to_string(),
                        reason: format!("missing required column(s): {}", missing.join(", ")),
                    })
                }
            }
        }
    }
}

fn read_csv_rows(bytes: &[u8]) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

fn read_xlsx_rows(name: &str, bytes: &[u8], skip_rows: usize) -> Result<Vec<Vec<String>>> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| HoldingsError::ParseError {
            file: name.to_string(),
            message: "workbook has no worksheets".to_string(),
        })??;

    Ok(range
        .rows()
        .skip(skip_rows)
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect())
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}
