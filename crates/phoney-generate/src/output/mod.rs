//! Serialization of generated documents into non-JSON output formats.

pub mod csv;

pub use self::csv::{documents_to_csv, write_documents_csv};
