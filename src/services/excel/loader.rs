use super::utils::*;
use std::io::Cursor;
use std::path::Path;
use bytes::Bytes;
use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};
use crate::error::AppError;
use crate::models::{Record, Sheet, Workbook};

/// Reads every sheet of an `.xlsx` workbook into memory.
pub struct SheetLoader;

impl SheetLoader {
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Workbook, AppError> {
        let path = path.as_ref();
        tracing::info!("Opening workbook {}", path.display());

        let file_data = std::fs::read(path)
            .map(Bytes::from)
            .map_err(|source| {
                tracing::error!("Cannot read {}: {}", path.display(), source);
                AppError::FileNotAccessible {
                    path: path.to_path_buf(),
                    source,
                }
            })?;

        self.load_from_bytes(file_data)
    }

    pub fn load_from_bytes(&self, file_data: Bytes) -> Result<Workbook, AppError> {
        let start = std::time::Instant::now();
        let cursor = Cursor::new(file_data);

        let mut workbook: Xlsx<_> = open_workbook_from_rs(cursor)
            .map_err(|e| {
                tracing::error!("Failed to open workbook: {}", e);
                AppError::LoadError(format!("Failed to open workbook: {}", e))
            })?;

        let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
        tracing::info!("Found {} sheets: {:?}", sheet_names.len(), sheet_names);

        let mut loaded = Workbook::new();
        for sheet_name in &sheet_names {
            let range = workbook.worksheet_range(sheet_name)
                .map_err(|e| {
                    tracing::error!("Failed to read worksheet {}: {}", sheet_name, e);
                    AppError::LoadError(format!("Failed to read worksheet {}: {}", sheet_name, e))
                })?;

            let sheet = sheet_from_rows(sheet_name, range.rows());
            tracing::info!("Loaded sheet {} with {} rows", sheet_name, sheet.len());
            loaded.push(sheet);
        }

        tracing::info!("Workbook loaded in {:?}", start.elapsed());
        Ok(loaded)
    }
}

/// First row is the header; fully blank rows after it are dropped.
pub fn sheet_from_rows<'a, I>(name: &str, rows: I) -> Sheet
where
    I: IntoIterator<Item = &'a [Data]>,
{
    let mut rows = rows.into_iter();
    let headers = match rows.next() {
        Some(header_row) => unique_headers(header_row),
        None => {
            tracing::warn!("Sheet {} is empty", name);
            return Sheet::new(name, Vec::new(), Vec::new());
        }
    };

    let records: Vec<Record> = rows
        .map(|row| {
            headers.iter()
                .enumerate()
                .map(|(idx, header)| {
                    let value = row.get(idx).map(cell_value).unwrap_or_default();
                    (header.clone(), value)
                })
                .collect::<Record>()
        })
        .filter(|record| !record.is_blank())
        .collect();

    Sheet::new(name, headers, records)
}
