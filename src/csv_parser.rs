use crate::errors::AppError;
use crate::models::RawRow;
use serde_json::Value;

/// Parsed CSV upload: header names in file order plus one row object per
/// data line.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCsv {
    /// Header names, order preserved from the file. Duplicates are allowed
    /// and kept as distinct positions here; they collide once used as row
    /// keys (known limitation).
    pub headers: Vec<String>,
    /// Data rows, one per non-blank line after the header.
    pub rows: Vec<RawRow>,
}

/// Parses raw CSV text into headers and rows.
///
/// Flat split only: lines on `\n`, fields on `,`, whitespace trimmed and
/// literal double quotes stripped. Quoted commas and embedded newlines are
/// not supported. Rows shorter than the header pad with empty strings; extra
/// trailing fields are dropped. Pure and deterministic.
///
/// # Errors
///
/// * `MalformedInput` - fewer than two non-blank lines (no header, or a
///   header with zero data rows).
pub fn parse_csv(text: &str) -> Result<ParsedCsv, AppError> {
    let lines: Vec<&str> = text.split('\n').filter(|l| !l.trim().is_empty()).collect();

    if lines.len() < 2 {
        return Err(AppError::MalformedInput(
            "CSV must have at least a header row and one data row".to_string(),
        ));
    }

    let headers = split_fields(lines[0]);

    let rows: Vec<RawRow> = lines[1..]
        .iter()
        .map(|line| {
            let values = split_fields(line);
            let mut row = RawRow::new();
            for (i, header) in headers.iter().enumerate() {
                let value = values.get(i).cloned().unwrap_or_default();
                row.insert(header.clone(), Value::String(value));
            }
            row
        })
        .collect();

    tracing::debug!(
        "Parsed CSV: {} header(s), {} row(s)",
        headers.len(),
        rows.len()
    );

    Ok(ParsedCsv { headers, rows })
}

/// Splits one CSV line on commas, trimming whitespace and stripping literal
/// double-quote characters from each field.
fn split_fields(line: &str) -> Vec<String> {
    line.split(',')
        .map(|f| f.trim().replace('"', ""))
        .collect()
}
