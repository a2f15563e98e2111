use std::fmt::Write as _;

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, TypeInfo, ValueRef};

use crate::executor::ExecutorError;

/// Column separator inside a rendered row.
pub const COLUMN_SEPARATOR: &str = " | ";

fn ser<E: core::fmt::Display>(e: E) -> ExecutorError {
    ExecutorError::Sql(e.to_string())
}

/// Render one cell using the value's storage class.
fn render_cell(row: &SqliteRow, index: usize) -> Result<String, ExecutorError> {
    let raw = row.try_get_raw(index).map_err(ser)?;
    if raw.is_null() {
        return Ok("NULL".to_string());
    }
    let class = raw.type_info().name().to_ascii_uppercase();

    let rendered = match class.as_str() {
        "INTEGER" | "INT" | "BIGINT" | "BOOLEAN" => {
            row.try_get_unchecked::<i64, _>(index).map_err(ser)?.to_string()
        }
        "REAL" | "FLOAT" | "DOUBLE" => {
            format!("{:?}", row.try_get_unchecked::<f64, _>(index).map_err(ser)?)
        }
        "BLOB" => {
            let bytes = row.try_get_unchecked::<Vec<u8>, _>(index).map_err(ser)?;
            let mut hex = String::with_capacity(bytes.len() * 2);
            for byte in bytes {
                let _ = write!(hex, "{byte:02x}");
            }
            hex
        }
        _ => row.try_get_unchecked::<String, _>(index).map_err(ser)?,
    };
    Ok(rendered)
}

/// Canonical string form of a result row: cells joined by [`COLUMN_SEPARATOR`].
pub(crate) fn render_row(row: &SqliteRow) -> Result<String, ExecutorError> {
    let mut cells = Vec::with_capacity(row.len());
    for index in 0..row.len() {
        cells.push(render_cell(row, index)?);
    }
    Ok(cells.join(COLUMN_SEPARATOR))
}
