use std::path::Path;

use tracing::{error, info};

use crate::base::{PriceField, ResultSet};
use super::{cell_value, row_for, SheetError, Workbook, NAME_COLUMN};

/// Creates an empty workbook at `path` if nothing is there yet.
/// Returns whether a file was created.
pub fn ensure_file_exists(path: &Path) -> Result<bool, SheetError> {
    if path.exists() {
        return Ok(false);
    }
    info!("Could not locate file {}", path.display());
    info!("Creating new excel document {}", path.display());
    Workbook::new().save(path)?;
    Ok(true)
}

/// Writes every entry of `results` into the active sheet of the workbook at
/// `path`, one row per entry starting right after the header row plus
/// `offset`. The workbook is saved once, after all rows are filled in.
/// Returns the number of rows written.
pub fn try_write(path: &Path, results: &ResultSet, offset: usize) -> Result<usize, SheetError> {
    let mut book = Workbook::open(path)?;

    for (position, (item, record)) in results.iter().enumerate() {
        let row = row_for(offset, position).ok_or(SheetError::RowOutOfRange { offset, position })?;
        book.set_text(row, NAME_COLUMN, item);
        for field in PriceField::ALL.iter() {
            book.set_text(row, field.column(), cell_value(record, *field));
        }
        info!("Added: {}", item);
    }

    book.save(path)?;
    Ok(results.len())
}

/// `try_write` that reports failures instead of returning them
pub fn write(path: &Path, results: &ResultSet, offset: usize) -> Option<usize> {
    info!("*** SAVING ITEMS ***");
    match try_write(path, results, offset) {
        Ok(rows) => Some(rows),
        Err(err) => {
            error!("Error: {}", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{PriceRecord, PLACEHOLDER};
    use crate::sheet::MAX_ROW;

    fn priced(lowest: &str) -> PriceRecord {
        PriceRecord {
            success: true,
            lowest_price: Some(lowest.to_owned()),
            volume: Some("12".to_owned()),
            median_price: None,
        }
    }

    fn text(book: &Workbook, row: u32, col: u32) -> Option<String> {
        book.text(row, col)
    }

    #[test]
    fn ensure_creates_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        assert!(ensure_file_exists(&path).unwrap());
        assert!(path.exists());
        assert!(!ensure_file_exists(&path).unwrap());
    }

    #[test]
    fn ensure_leaves_existing_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        std::fs::write(&path, "not a workbook").unwrap();
        assert!(!ensure_file_exists(&path).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "not a workbook");
    }

    #[test]
    fn rows_follow_offset_and_fill_placeholders() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        ensure_file_exists(&path).unwrap();

        let mut results = ResultSet::new();
        results.insert("first".to_owned(), priced("$1.00"));
        results.insert("second".to_owned(), PriceRecord::unavailable());

        assert_eq!(try_write(&path, &results, 3).unwrap(), 2);

        let book = Workbook::open(&path).unwrap();
        assert_eq!(text(&book, 5, 1).as_deref(), Some("first"));
        assert_eq!(text(&book, 5, 2).as_deref(), Some("$1.00"));
        assert_eq!(text(&book, 5, 3).as_deref(), Some("12"));
        assert_eq!(text(&book, 5, 4).as_deref(), Some(PLACEHOLDER));
        assert_eq!(text(&book, 6, 1).as_deref(), Some("second"));
        for col in 2..=4 {
            assert_eq!(text(&book, 6, col).as_deref(), Some(PLACEHOLDER));
        }
        assert_eq!(text(&book, 4, 1), None);
        assert_eq!(text(&book, 7, 1), None);
    }

    #[test]
    fn existing_cells_are_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        let mut book = Workbook::new();
        book.set_text(1, 1, "Item");
        book.set_text(1, 2, "Lowest");
        book.set_text(2, 1, "old row");
        book.set_text(2, 6, "kept");
        book.save(&path).unwrap();

        let mut results = ResultSet::new();
        results.insert("new row".to_owned(), priced("$3.00"));
        try_write(&path, &results, 1).unwrap();

        let book = Workbook::open(&path).unwrap();
        assert_eq!(text(&book, 1, 1).as_deref(), Some("Item"));
        assert_eq!(text(&book, 1, 2).as_deref(), Some("Lowest"));
        assert_eq!(text(&book, 2, 1).as_deref(), Some("old row"));
        assert_eq!(text(&book, 2, 6).as_deref(), Some("kept"));
        assert_eq!(text(&book, 3, 1).as_deref(), Some("new row"));
    }

    #[test]
    fn other_sheets_and_formulas_survive_a_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");

        let mut original = umya_spreadsheet::new_file();
        {
            let prices = original.get_sheet_by_name_mut("Sheet1").unwrap();
            prices.get_cell_mut("F1").set_value_number(21);
            prices.get_cell_mut("G1").set_formula("F1*2");
        }
        original.new_sheet("Notes").unwrap().get_cell_mut("A1").set_value("keep me");
        umya_spreadsheet::writer::xlsx::write(&original, &path).unwrap();

        let mut results = ResultSet::new();
        results.insert("item".to_owned(), priced("$1.00"));
        assert_eq!(write(&path, &results, 0), Some(1));

        let saved = umya_spreadsheet::reader::xlsx::read(&path).unwrap();
        let notes = saved.get_sheet_by_name("Notes").unwrap();
        assert_eq!(notes.get_value("A1"), "keep me");

        let prices = saved.get_sheet_by_name("Sheet1").unwrap();
        assert_eq!(prices.get_cell("G1").unwrap().get_formula(), "F1*2");
        assert_eq!(prices.get_value("F1"), "21");
        assert_eq!(prices.get_value("A2"), "item");
        assert_eq!(prices.get_value("B2"), "$1.00");
    }

    #[test]
    fn save_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        ensure_file_exists(&path).unwrap();
        let before = std::fs::read(&path).unwrap();

        // Saving stages the document in `<file>tmp` beside the target; a
        // directory in that spot makes the save fail even for root.
        std::fs::create_dir(dir.path().join("out.xlsxtmp")).unwrap();

        let mut results = ResultSet::new();
        results.insert("item".to_owned(), priced("$1.00"));

        assert!(matches!(try_write(&path, &results, 0), Err(SheetError::Write { .. })));
        assert_eq!(write(&path, &results, 0), None);
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[test]
    fn rows_past_the_sheet_are_rejected_before_saving() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        ensure_file_exists(&path).unwrap();
        let before = std::fs::read(&path).unwrap();

        let mut results = ResultSet::new();
        results.insert("first".to_owned(), priced("$1.00"));
        results.insert("second".to_owned(), priced("$2.00"));

        let offset = MAX_ROW as usize - 2;
        match try_write(&path, &results, offset) {
            Err(SheetError::RowOutOfRange { position, .. }) => assert_eq!(position, 1),
            other => panic!("unexpected result {:?}", other),
        }
        assert_eq!(write(&path, &results, 2_000_000), None);
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[test]
    fn missing_file_is_reported_not_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.xlsx");
        let results = ResultSet::new();

        assert!(matches!(try_write(&path, &results, 0), Err(SheetError::NotFound(_))));
        assert_eq!(write(&path, &results, 0), None);
        assert!(!path.exists());
    }

    #[test]
    fn unreadable_workbook_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.xlsx");
        std::fs::write(&path, "garbage").unwrap();

        let mut results = ResultSet::new();
        results.insert("item".to_owned(), priced("$1.00"));

        assert_eq!(write(&path, &results, 0), None);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "garbage");
    }

    #[test]
    fn empty_results_write_no_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        ensure_file_exists(&path).unwrap();

        assert_eq!(write(&path, &ResultSet::new(), 1), Some(0));
        let book = Workbook::open(&path).unwrap();
        assert_eq!(text(&book, 2, 1), None);
        assert_eq!(text(&book, 3, 1), None);
    }
}
