//! CSV and JSON export of the list currently shown on a screen.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("export rows must be flat records, got {0}")]
    NotARecord(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// A file ready to be handed to the browser as a download.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl ExportFile {
    /// `Content-Disposition` value that makes the browser save the file.
    pub fn disposition(&self) -> String {
        format!(
            "attachment; filename=\"{}\"",
            self.filename.replace('"', "")
        )
    }
}

/// Quotes a field when it contains a comma, quote, semicolon or line break.
fn escape_field(value: &str) -> String {
    if value.contains([',', '"', ';', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn to_record<T: Serialize>(row: &T) -> ExportResult<Map<String, Value>> {
    match serde_json::to_value(row)? {
        Value::Object(map) => Ok(map),
        other => Err(ExportError::NotARecord(other.to_string())),
    }
}

/// Serializes rows as CSV using the first record's keys as the header row.
///
/// Later rows are written in header order; keys they lack become empty cells.
/// An empty input yields an empty body without a header.
pub fn export_csv<T: Serialize>(rows: &[T], filename: &str) -> ExportResult<ExportFile> {
    let records = rows.iter().map(to_record).collect::<ExportResult<Vec<_>>>()?;

    let body = match records.first() {
        None => Vec::new(),
        Some(first) => {
            let header: Vec<String> = first.keys().cloned().collect();
            let mut writer = csv::WriterBuilder::new()
                .quote_style(csv::QuoteStyle::Never)
                .terminator(csv::Terminator::Any(b'\n'))
                .from_writer(Vec::new());

            writer.write_record(header.iter().map(|h| escape_field(h)))?;
            for record in &records {
                writer.write_record(
                    header
                        .iter()
                        .map(|key| escape_field(&cell(record.get(key)))),
                )?;
            }
            writer.flush()?;

            let mut bytes = writer
                .into_inner()
                .map_err(|err| ExportError::Io(err.into_error()))?;
            if bytes.last() == Some(&b'\n') {
                bytes.pop();
            }
            bytes
        }
    };

    Ok(ExportFile {
        filename: filename.to_string(),
        content_type: "text/csv; charset=utf-8",
        body,
    })
}

/// Pretty-prints data as JSON with two-space indentation.
pub fn export_json<T: Serialize + ?Sized>(data: &T, filename: &str) -> ExportResult<ExportFile> {
    let body = serde_json::to_vec_pretty(data)?;
    Ok(ExportFile {
        filename: filename.to_string(),
        content_type: "application/json",
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(file: &ExportFile) -> &str {
        std::str::from_utf8(&file.body).unwrap()
    }

    #[test]
    fn comma_containing_field_is_quoted() {
        let file = export_csv(&[json!({"id": 1, "name": "A,B"})], "rows.csv").unwrap();
        assert_eq!(body(&file), "id,name\n1,\"A,B\"");
    }

    #[test]
    fn quotes_are_doubled_and_semicolons_quoted() {
        let rows = [json!({"note": "say \"hi\"", "list": "a;b", "plain": "x"})];
        let file = export_csv(&rows, "rows.csv").unwrap();
        assert_eq!(
            body(&file),
            "note,list,plain\n\"say \"\"hi\"\"\",\"a;b\",x"
        );
    }

    #[test]
    fn empty_input_is_an_empty_file() {
        let rows: [Value; 0] = [];
        let file = export_csv(&rows, "empty.csv").unwrap();
        assert!(file.body.is_empty());
        assert_eq!(file.filename, "empty.csv");
    }

    #[test]
    fn missing_keys_and_nulls_become_empty_cells() {
        let rows = [json!({"a": 1, "b": null}), json!({"a": 2})];
        let file = export_csv(&rows, "rows.csv").unwrap();
        assert_eq!(body(&file), "a,b\n1,\n2,");
    }

    #[test]
    fn non_record_rows_are_rejected() {
        let result = export_csv(&[1, 2], "rows.csv");
        assert!(matches!(result, Err(ExportError::NotARecord(_))));
    }

    #[test]
    fn json_uses_two_space_indentation() {
        let file = export_json(&json!({"id": 1}), "rows.json").unwrap();
        assert_eq!(body(&file), "{\n  \"id\": 1\n}");
        assert_eq!(file.disposition(), "attachment; filename=\"rows.json\"");
    }
}
