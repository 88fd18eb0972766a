//! Persister stage: write a frame into a SQLite table.

use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};

use crate::{cli::IfExists, error::EtlError, frame::Frame};

pub const DEFAULT_TABLE_NAME: &str = "DisasterResponse";

/// Writes `frame` as table `table` of the database at `database`, returning
/// the number of rows inserted.
pub fn save_data(frame: &Frame, database: &Path, table: &str, if_exists: IfExists) -> Result<usize> {
    let mut conn = Connection::open(database)
        .with_context(|| format!("Opening SQLite database {database:?}"))?;
    let written = write_frame(&mut conn, frame, table, if_exists)?;
    info!("Wrote {written} row(s) to table '{table}' in {database:?}");
    Ok(written)
}

/// Name of the stored table matching `table`, compared case-insensitively
/// the way SQLite resolves table names.
pub fn existing_table_name(conn: &Connection, table: &str) -> Result<Option<String>> {
    conn.query_row(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1 COLLATE NOCASE",
        params![table],
        |row| row.get(0),
    )
    .optional()
    .with_context(|| format!("Looking up table '{table}'"))
}

pub fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    Ok(existing_table_name(conn, table)?.is_some())
}

pub fn write_frame(
    conn: &mut Connection,
    frame: &Frame,
    table: &str,
    if_exists: IfExists,
) -> Result<usize> {
    let tx = conn.transaction().context("Starting write transaction")?;

    let create = match existing_table_name(&tx, table)? {
        None => true,
        Some(existing) => match if_exists {
            IfExists::Fail => {
                return Err(EtlError::TableExists {
                    table: table.to_string(),
                }
                .into());
            }
            IfExists::Replace => {
                debug!("Dropping existing table '{existing}'");
                tx.execute(&format!("DROP TABLE {}", quote_identifier(&existing)), [])
                    .with_context(|| format!("Dropping table '{existing}'"))?;
                true
            }
            IfExists::Append => false,
        },
    };

    if create {
        let ddl = create_table_sql(frame, table);
        debug!("{ddl}");
        tx.execute(&ddl, [])
            .with_context(|| format!("Creating table '{table}'"))?;
    }

    let insert = insert_sql(frame, table);
    {
        let mut statement = tx
            .prepare(&insert)
            .with_context(|| format!("Preparing insert into '{table}'"))?;
        for (row_idx, row) in frame.rows.iter().enumerate() {
            let values = row
                .iter()
                .map(|cell| cell.as_ref().map(rusqlite::types::Value::from));
            statement
                .execute(params_from_iter(values))
                .with_context(|| format!("Inserting row {} into '{table}'", row_idx + 1))?;
        }
    }
    tx.commit().context("Committing write transaction")?;
    Ok(frame.len())
}

fn create_table_sql(frame: &Frame, table: &str) -> String {
    let columns = frame
        .headers
        .iter()
        .zip(frame.types.iter())
        .map(|(name, ty)| format!("{} {}", quote_identifier(name), ty.sql_type()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE {} ({columns})", quote_identifier(table))
}

fn insert_sql(frame: &Frame, table: &str) -> String {
    let columns = frame
        .headers
        .iter()
        .map(|name| quote_identifier(name))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = (1..=frame.headers.len())
        .map(|idx| format!("?{idx}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({columns}) VALUES ({placeholders})",
        quote_identifier(table)
    )
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
