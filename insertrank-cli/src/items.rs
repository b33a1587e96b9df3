/// Item source: spreadsheet columns or a plain list, turned into labels.
use std::path::{Path, PathBuf};

use insertrank_core::{Item, ItemSource};

use crate::error::AdapterError;
use crate::sheet::{is_spreadsheet, read_columns};

/// Join a row's fields into one label. Empty fields are dropped so a missing
/// optional column does not leave a dangling separator.
pub fn compose_label(fields: &[String], separator: &str) -> String {
    fields
        .iter()
        .map(|f| f.trim())
        .filter(|f| !f.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Parse a string as either a JSON array of strings or plain text (one item per line).
pub fn parse_items_from_str(content: &str) -> Result<Vec<Item>, AdapterError> {
    let trimmed = content.trim();
    if trimmed.starts_with('[') {
        let items: Vec<String> = serde_json::from_str(trimmed)?;
        Ok(items
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect())
    } else {
        Ok(trimmed
            .lines()
            .map(|l| l.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect())
    }
}

/// Items read from a file. Spreadsheets use `sheet` and `columns`; any other
/// file is a plain list and ignores both.
pub struct FileItemSource {
    path: PathBuf,
    sheet: String,
    columns: Vec<String>,
    separator: String,
}

impl FileItemSource {
    pub fn new(path: PathBuf, sheet: String, columns: Vec<String>, separator: String) -> Self {
        FileItemSource {
            path,
            sheet,
            columns,
            separator,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ItemSource for FileItemSource {
    type Error = AdapterError;

    fn load_items(&self) -> Result<Vec<Item>, AdapterError> {
        if is_spreadsheet(&self.path) {
            let rows = read_columns(&self.path, &self.sheet, &self.columns)?;
            Ok(rows
                .iter()
                .map(|fields| compose_label(fields, &self.separator))
                .filter(|label| !label.is_empty())
                .collect())
        } else {
            let content = std::fs::read_to_string(&self.path).map_err(|source| AdapterError::Read {
                path: self.path.clone(),
                source,
            })?;
            parse_items_from_str(&content)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use tempfile::tempdir;

    #[test]
    fn test_compose_label() {
        let fields = vec!["Alien".to_string(), "1979".to_string()];
        assert_eq!(compose_label(&fields, " "), "Alien 1979");
        assert_eq!(compose_label(&fields, " - "), "Alien - 1979");

        let sparse = vec!["Alien".to_string(), String::new()];
        assert_eq!(compose_label(&sparse, " - "), "Alien");
        assert_eq!(compose_label(&[String::new()], " "), "");
    }

    #[test]
    fn test_parse_items_plain_text() {
        let items = parse_items_from_str("  Pizza\n\nSushi  \n Tacos\n").unwrap();
        assert_eq!(items, vec!["Pizza", "Sushi", "Tacos"]);
    }

    #[test]
    fn test_parse_items_json_array() {
        let items = parse_items_from_str(r#"["Pizza", " ", "Sushi"]"#).unwrap();
        assert_eq!(items, vec!["Pizza", "Sushi"]);
    }

    #[test]
    fn test_parse_items_bad_json() {
        let err = parse_items_from_str("[\"Pizza\", ").unwrap_err();
        assert!(matches!(err, AdapterError::Json(_)));
    }

    #[test]
    fn test_text_file_source() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("items.txt");
        std::fs::write(&path, "B\nA\nC\n").unwrap();

        let source = FileItemSource::new(path, "Sheet1".into(), vec!["Elements".into()], " ".into());
        assert_eq!(source.load_items().unwrap(), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_missing_text_file() {
        let dir = tempdir().unwrap();
        let source = FileItemSource::new(dir.path().join("nope.txt"), "Sheet1".into(), vec![], " ".into());
        assert!(matches!(source.load_items(), Err(AdapterError::Read { .. })));
    }

    #[test]
    fn test_spreadsheet_source_joins_columns_and_skips_blank_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("input.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Title").unwrap();
        sheet.write_string(0, 1, "Year").unwrap();
        sheet.write_string(1, 0, "Alien").unwrap();
        sheet.write_number(1, 1, 1979).unwrap();
        sheet.write_string(3, 0, "Heat").unwrap();
        sheet.write_number(3, 1, 1995).unwrap();
        workbook.save(&path).unwrap();

        let source = FileItemSource::new(
            path,
            "Sheet1".into(),
            vec!["Title".into(), "Year".into()],
            " / ".into(),
        );
        assert_eq!(source.load_items().unwrap(), vec!["Alien / 1979", "Heat / 1995"]);
    }
}
