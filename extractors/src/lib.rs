//! Extractors Crate
//!
//! Turns uploaded contact spreadsheets into normalized [`ContactRecord`]s and
//! checks them before they are handed to the distribution pipeline.
//!
//! # Supported formats
//!
//! - CSV, read with the `csv` crate
//! - XLSX / XLS, first worksheet only, read with `calamine`
//!
//! Column headers are matched against a fixed alias table, so "First Name",
//! "FirstName" and "name" all land in [`ContactRecord::first_name`].
//!
//! # Example
//!
//! ```rust,ignore
//! use extractors::{validate_records, ContactListParser};
//!
//! let records = ContactListParser::new().parse_path("uploads/leads.csv")?;
//! let errors = validate_records(&records);
//! ```
//!
//! [`ContactRecord`]: shared_types::ContactRecord
//! [`ContactRecord::first_name`]: shared_types::ContactRecord::first_name

pub mod contact_list;

pub use contact_list::{
    validate_records, ContactListParser, FieldAliases, FileFormat, ParseError,
};
