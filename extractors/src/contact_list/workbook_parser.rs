use super::ParseError;
use calamine::{open_workbook_auto, Data, Reader};
use std::collections::HashMap;
use std::path::Path;

/// Reads the first worksheet of an XLSX/XLS workbook. The first row supplies
/// the headers; rows without any non-empty cell are dropped.
pub struct WorkbookParser;

impl WorkbookParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_to_maps(
        &self,
        path: &Path,
    ) -> Result<Vec<HashMap<String, String>>, ParseError> {
        let mut workbook =
            open_workbook_auto(path).map_err(|e| ParseError::Workbook(e.to_string()))?;

        let range = match workbook.worksheet_range_at(0) {
            Some(range) => range.map_err(|e| ParseError::Workbook(e.to_string()))?,
            None => return Ok(Vec::new()),
        };

        let mut rows = range.rows();

        let headers: Vec<String> = match rows.next() {
            Some(header_row) => header_row.iter().map(cell_text).collect(),
            None => return Ok(Vec::new()),
        };

        let mut records = Vec::new();

        for row in rows {
            if row.iter().all(|cell| cell_text(cell).is_empty()) {
                continue;
            }

            let mut map = HashMap::new();
            for (header, cell) in headers.iter().zip(row.iter()) {
                if header.is_empty() {
                    continue;
                }
                map.insert(header.clone(), cell_text(cell));
            }
            records.push(map);
        }

        Ok(records)
    }
}

impl Default for WorkbookParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders a cell the way it reads in the sheet. Whole numbers lose the
/// trailing `.0` so phone numbers stored as numbers stay intact.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string().trim().to_string(),
    }
}
