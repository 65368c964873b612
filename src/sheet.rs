use std::path::PathBuf;

use thiserror::Error;

use crate::base::{PriceField, PriceRecord, PLACEHOLDER};

pub mod workbook;
pub mod writer;

pub use workbook::Workbook;
pub use writer::{ensure_file_exists, try_write, write};

/// Row reserved for a header. Item rows start right after it.
pub const HEADER_ROW: u32 = 1;
pub const NAME_COLUMN: u32 = 1;
/// Last row an xlsx worksheet can hold
pub const MAX_ROW: u32 = 1_048_576;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("Could not locate file {}", .0.display())]
    NotFound(PathBuf),
    #[error("Could not load workbook {}: {source}", .path.display())]
    Read { path: PathBuf, source: umya_spreadsheet::reader::xlsx::XlsxError },
    #[error("Workbook {} has no worksheet", .0.display())]
    NoWorksheet(PathBuf),
    #[error("Entry {position} at offset {offset} is past the last worksheet row")]
    RowOutOfRange { offset: usize, position: usize },
    #[error("Could not save workbook {}: {source}", .path.display())]
    Write { path: PathBuf, source: umya_spreadsheet::writer::xlsx::XlsxError },
}

/// Text written for `field`, or the placeholder when the record lacks it
pub fn cell_value(record: &PriceRecord, field: PriceField) -> &str {
    record.get(field).unwrap_or(PLACEHOLDER)
}

/// 1-based row of the `position`-th written entry, `None` past `MAX_ROW`
pub fn row_for(offset: usize, position: usize) -> Option<u32> {
    let row = offset
        .checked_add(position)?
        .checked_add(HEADER_ROW as usize + 1)?;
    u32::try_from(row).ok().filter(|row| *row <= MAX_ROW)
}
