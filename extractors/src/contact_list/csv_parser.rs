use super::ParseError;
use csv::{ReaderBuilder, Trim};
use std::collections::HashMap;
use std::io::Read;

pub struct CsvParser {
    delimiter: u8,
    has_headers: bool,
}

impl CsvParser {
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            has_headers: true,
        }
    }

    /// Reads every data row into a map keyed by (trimmed) header name.
    ///
    /// Rows with fewer or more cells than the header row are accepted; extra
    /// cells are dropped and missing cells are absent from the map. Bytes that
    /// are not valid UTF-8 (legacy Excel exports) are replaced rather than
    /// rejected. A row the CSV reader cannot split aborts the parse so that row
    /// numbers reported later still match the file.
    pub fn parse_to_maps<R: Read>(
        &self,
        reader: R,
    ) -> Result<Vec<HashMap<String, String>>, ParseError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(self.has_headers)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = reader.byte_headers()?.iter().map(lossy).collect();

        let mut records = Vec::new();

        for result in reader.byte_records() {
            let record = result?;
            let mut map = HashMap::new();
            for (i, field) in record.iter().enumerate() {
                if let Some(header) = headers.get(i) {
                    map.insert(header.clone(), lossy(field));
                }
            }
            records.push(map);
        }

        Ok(records)
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new()
    }
}
