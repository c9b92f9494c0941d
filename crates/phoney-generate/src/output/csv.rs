use std::collections::{HashMap, HashSet};
use std::io::Write;

use serde_json::Value;

use crate::errors::GenerationError;

/// Column used when a document is not a mapping.
pub const VALUE_COLUMN: &str = "value";

/// Write documents as CSV, one row per document.
///
/// Nested mappings flatten to dotted column names, sequences are rendered
/// as JSON text and null becomes an empty cell. The header is the union of
/// all columns in first-seen order. Returns the number of bytes written.
pub fn write_documents_csv<W: Write>(writer: W, documents: &[Value]) -> Result<u64, csv::Error> {
    let rows: Vec<Vec<(String, String)>> = documents.iter().map(flatten_document).collect();

    let mut columns: Vec<&str> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for row in &rows {
        for (column, _) in row {
            if seen.insert(column.as_str()) {
                columns.push(column.as_str());
            }
        }
    }

    let counting = CountingWriter::new(writer);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(counting);
    writer.write_record(&columns)?;

    for row in &rows {
        let cells: HashMap<&str, &str> = row
            .iter()
            .map(|(column, cell)| (column.as_str(), cell.as_str()))
            .collect();
        let record: Vec<&str> = columns
            .iter()
            .map(|column| cells.get(column).copied().unwrap_or_default())
            .collect();
        writer.write_record(&record)?;
    }

    writer.flush()?;
    let counting = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(counting.bytes_written())
}

/// CSV rendering of `documents` as a string.
pub fn documents_to_csv(documents: &[Value]) -> Result<String, GenerationError> {
    let mut buffer = Vec::new();
    write_documents_csv(&mut buffer, documents)?;
    String::from_utf8(buffer).map_err(|err| {
        GenerationError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err))
    })
}

fn flatten_document(document: &Value) -> Vec<(String, String)> {
    let mut cells = Vec::new();
    match document {
        Value::Object(map) => {
            for (key, value) in map {
                flatten_into(key.clone(), value, &mut cells);
            }
        }
        other => cells.push((VALUE_COLUMN.to_string(), cell(other))),
    }
    cells
}

fn flatten_into(column: String, value: &Value, cells: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                flatten_into(format!("{column}.{key}"), child, cells);
            }
        }
        other => cells.push((column, cell(other))),
    }
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn flattens_nested_objects_to_dotted_columns() {
        let documents = vec![
            json!({"name": "Ada", "address": {"city": "Paris", "zip": "75001"}, "tags": ["a", "b"]}),
            json!({"name": "Bob", "address": {"city": "Lyon"}, "extra": null}),
        ];
        let csv = documents_to_csv(&documents).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "name,address.city,address.zip,tags,extra");
        assert_eq!(lines[1], r#"Ada,Paris,75001,"[""a"",""b""]","#);
        assert_eq!(lines[2], "Bob,Lyon,,,");
    }

    #[test]
    fn scalar_documents_use_a_value_column() {
        let csv = documents_to_csv(&[json!(1), json!("x")]).unwrap();
        assert_eq!(csv, "value\n1\nx\n");
    }

    #[test]
    fn reports_bytes_written() {
        let mut buffer = Vec::new();
        let bytes = write_documents_csv(&mut buffer, &[json!({"a": 1})]).unwrap();
        assert_eq!(bytes, buffer.len() as u64);
    }
}
