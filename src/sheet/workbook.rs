use std::path::Path;

use umya_spreadsheet::{reader, writer, Spreadsheet};

use super::SheetError;

/// An xlsx document held in memory between `open` and `save`.
///
/// Cells are written to the active worksheet with 1-based (row, column)
/// coordinates. Everything else in the document (other sheets, formulas,
/// styles) is carried through a save untouched.
pub struct Workbook {
    book: Spreadsheet,
}

impl Default for Workbook {
    fn default() -> Self {
        Workbook { book: umya_spreadsheet::new_file() }
    }
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(path: &Path) -> Result<Self, SheetError> {
        if !path.exists() {
            return Err(SheetError::NotFound(path.to_owned()));
        }
        let book = reader::xlsx::read(path)
            .map_err(|source| SheetError::Read { path: path.to_owned(), source })?;
        if book.get_sheet_collection().is_empty() {
            return Err(SheetError::NoWorksheet(path.to_owned()));
        }
        Ok(Workbook { book })
    }

    pub fn set_text(&mut self, row: u32, col: u32, value: &str) {
        debug_assert!(row >= 1 && col >= 1, "cell coordinates are 1-based");
        self.book
            .get_active_sheet_mut()
            .get_cell_mut((col, row))
            .set_value_string(value);
    }

    pub fn save(&self, path: &Path) -> Result<(), SheetError> {
        writer::xlsx::write(&self.book, path)
            .map_err(|source| SheetError::Write { path: path.to_owned(), source })
    }

    #[cfg(test)]
    pub(crate) fn text(&self, row: u32, col: u32) -> Option<String> {
        self.book
            .get_active_sheet()
            .get_cell((col, row))
            .map(|cell| cell.get_value().to_string())
    }
}
