mod aliases;
mod csv_parser;
mod validation;
mod workbook_parser;

pub use aliases::{FieldAliases, FIRST_NAME_ALIASES, NOTES_ALIASES, PHONE_ALIASES};
pub use validation::validate_records;

use csv_parser::CsvParser;
use shared_types::ContactRecord;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use workbook_parser::WorkbookParser;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Unsupported file format")]
    UnsupportedFormat(String),

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid CSV data: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid spreadsheet: {0}")]
    Workbook(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Xlsx,
    Xls,
}

impl FileFormat {
    /// Detects the format from a file extension, ignoring case and an
    /// optional leading dot.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "csv" => Some(FileFormat::Csv),
            "xlsx" => Some(FileFormat::Xlsx),
            "xls" => Some(FileFormat::Xls),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ParseError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();

        Self::from_extension(extension)
            .ok_or_else(|| ParseError::UnsupportedFormat(extension.to_string()))
    }

    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Csv => "csv",
            FileFormat::Xlsx => "xlsx",
            FileFormat::Xls => "xls",
        }
    }
}

/// Parses an uploaded contact list into records, preserving file row order.
pub struct ContactListParser {
    aliases: FieldAliases,
    csv_parser: CsvParser,
    workbook_parser: WorkbookParser,
}

impl ContactListParser {
    pub fn new() -> Self {
        Self::with_aliases(FieldAliases::default())
    }

    pub fn with_aliases(aliases: FieldAliases) -> Self {
        Self {
            aliases,
            csv_parser: CsvParser::new(),
            workbook_parser: WorkbookParser::new(),
        }
    }

    pub fn parse_path(&self, path: impl AsRef<Path>) -> Result<Vec<ContactRecord>, ParseError> {
        let path = path.as_ref();

        match FileFormat::from_path(path)? {
            FileFormat::Csv => {
                let file = File::open(path)?;
                self.parse_csv(BufReader::new(file))
            }
            FileFormat::Xlsx | FileFormat::Xls => {
                let rows = self.workbook_parser.parse_to_maps(path)?;
                Ok(rows.iter().map(|row| self.aliases.resolve(row)).collect())
            }
        }
    }

    pub fn parse_csv<R: std::io::Read>(&self, reader: R) -> Result<Vec<ContactRecord>, ParseError> {
        let rows = self.csv_parser.parse_to_maps(reader)?;
        Ok(rows.iter().map(|row| self.aliases.resolve(row)).collect())
    }
}

impl Default for ContactListParser {
    fn default() -> Self {
        Self::new()
    }
}
