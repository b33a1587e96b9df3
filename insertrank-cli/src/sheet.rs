/// Spreadsheet adapters: reading named columns and the ranked store.
///
/// Reading goes through calamine (xlsx, xlsm, xlsb, xls, ods); the store is
/// written as xlsx with rust_xlsxwriter.
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use insertrank_core::{Item, RankedStore};
use rust_xlsxwriter::{Format, Workbook};
use tracing::debug;

use crate::error::AdapterError;

/// Extensions read as spreadsheets. Anything else is read as text.
const SPREADSHEET_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

pub fn is_spreadsheet(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SPREADSHEET_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Undo the OOXML `_xHHHH_` escaping that xlsx writers apply to control
/// characters and to literal `_xHHHH_` text. `_x005F_` stands for `_`, and
/// decoded output is never scanned again.
fn decode_ooxml_escapes(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut rest = 0;
    let mut i = 0;

    while i + 7 <= bytes.len() {
        let escaped = bytes[i] == b'_'
            && bytes[i + 1] == b'x'
            && bytes[i + 6] == b'_'
            && bytes[i + 2..i + 6].iter().all(u8::is_ascii_hexdigit);
        let decoded = if escaped {
            u32::from_str_radix(&text[i + 2..i + 6], 16).ok().and_then(char::from_u32)
        } else {
            None
        };

        match decoded {
            Some(c) => {
                out.push_str(&text[rest..i]);
                out.push(c);
                i += 7;
                rest = i;
            }
            None => i += 1,
        }
    }
    out.push_str(&text[rest..]);
    out
}

/// Render a cell as text. Whole floats lose their ".0" so a column of numbers
/// reads the way it looks in the spreadsheet.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => decode_ooxml_escapes(s.trim()),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

/// Read the named columns of a sheet. The first row is the header; each
/// returned row holds the requested columns' cell text, in request order.
pub fn read_columns(path: &Path, sheet: &str, columns: &[String]) -> Result<Vec<Vec<String>>, AdapterError> {
    let spreadsheet_err = |source| AdapterError::Spreadsheet {
        path: path.to_path_buf(),
        source,
    };

    let mut workbook = open_workbook_auto(path).map_err(spreadsheet_err)?;
    let range = workbook.worksheet_range(sheet).map_err(spreadsheet_err)?;

    let mut rows = range.rows();
    let header: Vec<String> = rows.next().map(|r| r.iter().map(cell_text).collect()).unwrap_or_default();

    let mut indices = Vec::with_capacity(columns.len());
    for column in columns {
        let idx = header.iter().position(|h| h == column).ok_or_else(|| AdapterError::MissingColumn {
            path: path.to_path_buf(),
            sheet: sheet.to_string(),
            column: column.clone(),
            header: header.clone(),
        })?;
        indices.push(idx);
    }

    let data: Vec<Vec<String>> = rows
        .map(|row| {
            indices
                .iter()
                .map(|&i| row.get(i).map(cell_text).unwrap_or_default())
                .collect()
        })
        .collect();

    debug!(path = %path.display(), sheet, rows = data.len(), "read spreadsheet columns");
    Ok(data)
}

/// The ranked list as a one-column spreadsheet, most preferred first.
pub struct SheetStore {
    path: PathBuf,
    sheet: String,
    column: String,
}

impl SheetStore {
    pub fn new(path: PathBuf, sheet: String, column: String) -> Self {
        SheetStore { path, sheet, column }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file the workbook is written to before it replaces the store.
    fn staging_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "ranking.xlsx".to_string());
        self.path.with_file_name(format!(".{name}.partial"))
    }
}

impl RankedStore for SheetStore {
    type Error = AdapterError;

    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn load(&self) -> Result<Vec<Item>, AdapterError> {
        let rows = read_columns(&self.path, &self.sheet, std::slice::from_ref(&self.column))?;
        Ok(rows
            .into_iter()
            .filter_map(|mut row| row.pop())
            .filter(|label| !label.is_empty())
            .collect())
    }

    fn save(&mut self, ranked: &[Item]) -> Result<(), AdapterError> {
        let staging = self.staging_path();
        let write_err = |source| AdapterError::Write {
            path: staging.clone(),
            source,
        };

        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&self.sheet).map_err(write_err)?;
        worksheet
            .write_string_with_format(0, 0, &self.column, &header)
            .map_err(write_err)?;
        for (row, item) in ranked.iter().enumerate() {
            worksheet.write_string(row as u32 + 1, 0, item).map_err(write_err)?;
        }
        workbook.save(&staging).map_err(write_err)?;

        std::fs::rename(&staging, &self.path).map_err(|source| AdapterError::Replace {
            path: self.path.clone(),
            source,
        })?;

        debug!(path = %self.path.display(), items = ranked.len(), "saved ranking");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_at(path: PathBuf) -> SheetStore {
        SheetStore::new(path, "Sheet1".to_string(), "Elements".to_string())
    }

    #[test]
    fn test_is_spreadsheet() {
        assert!(is_spreadsheet(Path::new("input.xlsx")));
        assert!(is_spreadsheet(Path::new("INPUT.XLSX")));
        assert!(is_spreadsheet(Path::new("data.ods")));
        assert!(!is_spreadsheet(Path::new("items.txt")));
        assert!(!is_spreadsheet(Path::new("items")));
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::String("  Pizza ".to_string())), "Pizza");
        assert_eq!(cell_text(&Data::Float(1984.0)), "1984");
        assert_eq!(cell_text(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_text(&Data::Int(7)), "7");
    }

    #[test]
    fn test_store_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("output.xlsx");
        let mut store = store_at(path.clone());
        assert!(!store.exists());

        let ranked: Vec<Item> = vec!["Sushi".into(), "Pizza".into(), "Tacos".into()];
        store.save(&ranked).unwrap();
        assert!(store.exists());
        assert_eq!(store.load().unwrap(), ranked);

        // Overwrite, not append.
        store.save(&ranked[..1]).unwrap();
        assert_eq!(store.load().unwrap(), vec!["Sushi".to_string()]);
        assert!(!store.staging_path().exists());
    }

    #[test]
    fn test_decode_ooxml_escapes() {
        assert_eq!(decode_ooxml_escapes("plain"), "plain");
        assert_eq!(decode_ooxml_escapes("x_x0001_y"), "x\u{1}y");
        assert_eq!(decode_ooxml_escapes("_x005F_x0041_"), "_x0041_");
        assert_eq!(decode_ooxml_escapes("_x0041_"), "A");
        // Not an escape: too short, or not hex.
        assert_eq!(decode_ooxml_escapes("_x00_"), "_x00_");
        assert_eq!(decode_ooxml_escapes("_xZZZZ_ é"), "_xZZZZ_ é");
        // A lone surrogate is not a char and stays as written.
        assert_eq!(decode_ooxml_escapes("_xD800_"), "_xD800_");
    }

    #[test]
    fn test_store_labels_survive_repeated_saves() {
        let dir = tempdir().unwrap();
        let mut store = store_at(dir.path().join("output.xlsx"));
        let ranked: Vec<Item> = vec!["_x0041_".into(), "x\u{1}y".into(), "snake_case_x".into()];

        store.save(&ranked).unwrap();
        let first = store.load().unwrap();
        assert_eq!(first, ranked);

        store.save(&first).unwrap();
        assert_eq!(store.load().unwrap(), ranked);
    }

    #[test]
    fn test_store_with_wrong_header_fails_to_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("output.xlsx");
        let mut writer = SheetStore::new(path.clone(), "Sheet1".to_string(), "Other".to_string());
        writer.save(&["A".to_string()]).unwrap();

        let err = store_at(path).load().unwrap_err();
        assert!(matches!(err, AdapterError::MissingColumn { ref column, .. } if column == "Elements"));
    }

    #[test]
    fn test_store_with_garbage_file_fails_to_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("output.xlsx");
        std::fs::write(&path, "not a workbook").unwrap();

        let store = store_at(path);
        assert!(store.exists());
        assert!(matches!(store.load(), Err(AdapterError::Spreadsheet { .. })));
    }

    #[test]
    fn test_read_columns_in_request_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("input.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Movies").unwrap();
        sheet.write_string(0, 0, "Title").unwrap();
        sheet.write_string(0, 1, "Year").unwrap();
        sheet.write_string(1, 0, "Alien").unwrap();
        sheet.write_number(1, 1, 1979).unwrap();
        sheet.write_string(2, 0, "Heat").unwrap();
        sheet.write_number(2, 1, 1995).unwrap();
        workbook.save(&path).unwrap();

        let rows = read_columns(&path, "Movies", &["Year".to_string(), "Title".to_string()]).unwrap();
        assert_eq!(
            rows,
            vec![
                vec!["1979".to_string(), "Alien".to_string()],
                vec!["1995".to_string(), "Heat".to_string()],
            ]
        );

        let err = read_columns(&path, "Movies", &["Director".to_string()]).unwrap_err();
        assert!(matches!(err, AdapterError::MissingColumn { .. }));
    }
}
