//! Dataset format conversion
//!
//! Produces the JSON and SQLite variants that the export command downloads:
//! - CSV → JSON + SQLite (`repos` table, one TEXT column per header)
//! - SQLite → CSV + JSON (rows ordered by `problem_type`)

mod table;

pub use table::{parse_rows, write_row, Table};

use crate::error::{Result, ToxicError};
use crate::source::ExportFormat;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value as JsonValue};
use std::path::{Path, PathBuf};

/// Name of the table holding the dataset rows
pub const TABLE_NAME: &str = "repos";

/// Summary of one conversion run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionReport {
    pub records: usize,
    pub written: Vec<PathBuf>,
}

/// Convert a CSV dataset into `<output_dir>/json/` and `<output_dir>/sqlite/`
pub fn csv_to_formats(csv_path: &Path, output_dir: &Path) -> Result<ConversionReport> {
    tracing::info!("Converting {} to JSON and SQLite formats", csv_path.display());

    let text = std::fs::read_to_string(csv_path).map_err(|e| ToxicError::Io {
        source: e,
        context: format!("Failed to read CSV file: {}", csv_path.display()),
    })?;
    let table = Table::parse(&text);
    if table.headers.is_empty() {
        return Err(ToxicError::Conversion(format!(
            "{} has no header row",
            csv_path.display()
        )));
    }
    validate_columns(&table.headers)?;
    tracing::info!("Read {} records from CSV", table.rows.len());

    let json_path = output_path(output_dir, ExportFormat::Json)?;
    let objects: Vec<JsonValue> = table
        .rows
        .iter()
        .map(|row| {
            let object: Map<String, JsonValue> = table
                .headers
                .iter()
                .enumerate()
                .map(|(i, header)| {
                    (
                        header.clone(),
                        Table::cell(row, i)
                            .map_or(JsonValue::Null, |v| JsonValue::String(v.to_string())),
                    )
                })
                .collect();
            JsonValue::Object(object)
        })
        .collect();
    write_json(&json_path, &objects)?;
    tracing::info!("Created JSON: {}", json_path.display());

    let sqlite_path = output_path(output_dir, ExportFormat::Sqlite)?;
    write_sqlite(&sqlite_path, &table)?;
    tracing::info!("Created SQLite: {}", sqlite_path.display());

    Ok(ConversionReport {
        records: table.rows.len(),
        written: vec![json_path, sqlite_path],
    })
}

/// Convert a SQLite dataset into `<output_dir>/csv/` and `<output_dir>/json/`
pub fn sqlite_to_formats(db_path: &Path, output_dir: &Path) -> Result<ConversionReport> {
    tracing::info!("Converting {} to CSV and JSON formats", db_path.display());

    if !db_path.exists() {
        return Err(ToxicError::Conversion(format!(
            "Database not found: {}",
            db_path.display()
        )));
    }
    let conn = Connection::open(db_path)?;
    let (columns, rows) = read_repos(&conn)?;
    tracing::info!("Read {} records from SQLite", rows.len());

    let csv_path = output_path(output_dir, ExportFormat::Csv)?;
    let mut buf = Vec::new();
    let io_error = |e| ToxicError::Io {
        source: e,
        context: "Failed to encode CSV row".to_string(),
    };
    write_row(&mut buf, &columns).map_err(io_error)?;
    for row in &rows {
        let cells: Vec<String> = row.iter().map(value_to_text).collect();
        write_row(&mut buf, &cells).map_err(io_error)?;
    }
    std::fs::write(&csv_path, buf).map_err(|e| ToxicError::Io {
        source: e,
        context: format!("Failed to write CSV file: {}", csv_path.display()),
    })?;
    tracing::info!("Created CSV: {}", csv_path.display());

    let json_path = output_path(output_dir, ExportFormat::Json)?;
    let objects: Vec<JsonValue> = rows
        .iter()
        .map(|row| {
            let object: Map<String, JsonValue> = columns
                .iter()
                .cloned()
                .zip(row.iter().map(value_to_json))
                .collect();
            JsonValue::Object(object)
        })
        .collect();
    write_json(&json_path, &objects)?;
    tracing::info!("Created JSON: {}", json_path.display());

    Ok(ConversionReport {
        records: rows.len(),
        written: vec![csv_path, json_path],
    })
}

/// Column names may only contain alphanumerics, `_` and `-`
pub fn validate_columns(headers: &[String]) -> Result<()> {
    for header in headers {
        let safe = !header.is_empty()
            && header
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_' || c == '-');
        if !safe {
            return Err(ToxicError::InvalidColumn(header.clone()));
        }
    }
    Ok(())
}

/// `<output_dir>/<format dir>/toxic-repos.<ext>`, creating the directory
fn output_path(output_dir: &Path, format: ExportFormat) -> Result<PathBuf> {
    let dir = output_dir.join(format.directory());
    std::fs::create_dir_all(&dir).map_err(|e| ToxicError::Io {
        source: e,
        context: format!("Failed to create output directory: {}", dir.display()),
    })?;
    Ok(dir.join(format.remote_file_name()))
}

fn write_json(path: &Path, objects: &[JsonValue]) -> Result<()> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    objects
        .serialize(&mut serializer)
        .map_err(|e| ToxicError::Json {
            source: e,
            context: "Failed to serialize dataset".to_string(),
        })?;

    std::fs::write(path, buf).map_err(|e| ToxicError::Io {
        source: e,
        context: format!("Failed to write JSON file: {}", path.display()),
    })
}

fn write_sqlite(path: &Path, table: &Table) -> Result<()> {
    if path.exists() {
        std::fs::remove_file(path).map_err(|e| ToxicError::Io {
            source: e,
            context: format!("Failed to remove existing database: {}", path.display()),
        })?;
    }

    let mut conn = Connection::open(path)?;
    let columns: Vec<String> = table
        .headers
        .iter()
        .map(|header| format!("\"{}\" TEXT", header))
        .collect();
    conn.execute(
        &format!("CREATE TABLE {} ({})", TABLE_NAME, columns.join(", ")),
        [],
    )?;

    let placeholders = vec!["?"; table.headers.len()].join(", ");
    let insert = format!("INSERT INTO {} VALUES ({})", TABLE_NAME, placeholders);

    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(&insert)?;
        for row in &table.rows {
            // Short rows leave the trailing columns NULL
            let values = (0..table.headers.len()).map(|i| Table::cell(row, i));
            stmt.execute(params_from_iter(values))?;
        }
    }
    tx.commit()?;
    Ok(())
}

fn read_repos(conn: &Connection) -> Result<(Vec<String>, Vec<Vec<Value>>)> {
    let mut stmt = conn.prepare(&format!(
        "SELECT * FROM {} ORDER BY problem_type",
        TABLE_NAME
    ))?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let width = columns.len();

    let rows = stmt
        .query_map([], |row| {
            (0..width)
                .map(|i| row.get::<_, Value>(i))
                .collect::<rusqlite::Result<Vec<Value>>>()
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok((columns, rows))
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Integer(i) => i.to_string(),
        Value::Real(f) => f.to_string(),
        Value::Text(s) => s.clone(),
        Value::Blob(b) => String::from_utf8_lossy(b).into_owned(),
    }
}

fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Integer(i) => JsonValue::from(*i),
        Value::Real(f) => JsonValue::from(*f),
        Value::Text(s) => JsonValue::String(s.clone()),
        Value::Blob(b) => JsonValue::String(String::from_utf8_lossy(b).into_owned()),
    }
}
