//! SQLite catalog queries
//!
//! Synchronous functions over a borrowed connection. The provider takes the
//! connection lock and calls into these.

use rusqlite::{Connection, OptionalExtension};
use serde_json::{Map, Value};

use crate::error::{ProviderError, ProviderResult};
use crate::types::{
    base_type, declared_length, CompleteSchema, DatabaseColumn, DatabaseTable, DatabaseTrigger,
    DatabaseView, ProcedureSummary, QualifiedName, QueryResult, TableSummary, TriggerSummary,
    ViewSummary,
};

const BASE_TABLE: &str = "BASE TABLE";

/// Whether the text is a SELECT statement (leading whitespace ignored)
pub fn is_select_statement(query: &str) -> bool {
    query
        .trim_start()
        .get(..6)
        .is_some_and(|keyword| keyword.eq_ignore_ascii_case("select"))
}

fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

fn master_table(schema: &str) -> String {
    format!("{}.sqlite_master", quote_ident(schema))
}

/// Attached databases, `main` first
pub fn schemas(conn: &Connection) -> ProviderResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_database_list ORDER BY seq")?;
    let names = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(names)
}

/// Resolve `raw` to an attached schema, or report `kind` as missing
fn resolve(conn: &Connection, kind: &'static str, raw: &str) -> ProviderResult<QualifiedName> {
    let target = QualifiedName::parse(raw);
    if schemas(conn)?.contains(&target.schema) {
        Ok(target)
    } else {
        Err(ProviderError::not_found(kind, raw))
    }
}

/// `(schema, row)` for every catalog row of `object_type` across attached databases
fn catalog<T, F>(conn: &Connection, object_type: &str, columns: &str, mut map: F) -> ProviderResult<Vec<T>>
where
    F: FnMut(&str, &rusqlite::Row<'_>) -> rusqlite::Result<T>,
{
    let mut items = Vec::new();
    for schema in schemas(conn)? {
        // Internal tables are exactly `sqlite_` prefixed, case-sensitive
        let sql = format!(
            "SELECT {columns} FROM {} \
             WHERE type = ?1 AND substr(name, 1, 7) <> 'sqlite_' \
             ORDER BY tbl_name, name",
            master_table(&schema)
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([object_type], |row| map(schema.as_str(), row))?
            .collect::<Result<Vec<_>, _>>()?;
        items.extend(rows);
    }
    Ok(items)
}

pub fn list_tables(conn: &Connection) -> ProviderResult<Vec<TableSummary>> {
    catalog(conn, "table", "name", |schema, row| {
        Ok(TableSummary {
            schema: schema.to_string(),
            table_name: row.get(0)?,
            table_type: BASE_TABLE.to_string(),
        })
    })
}

/// Columns of a table or view, in declaration order
pub fn columns(conn: &Connection, target: &QualifiedName) -> ProviderResult<Vec<DatabaseColumn>> {
    let mut stmt = conn.prepare(
        "SELECT name, type, \"notnull\", dflt_value, pk \
         FROM pragma_table_info(?1, ?2) ORDER BY cid",
    )?;

    let raw = stmt
        .query_map([&target.name, &target.schema], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                row.get::<_, i64>(2)? != 0,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, i64>(4)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    // A lone INTEGER PRIMARY KEY aliases the rowid and is auto-assigned.
    let pk_count = raw.iter().filter(|(_, _, _, _, pk)| *pk > 0).count();

    let columns = raw
        .into_iter()
        .map(|(name, data_type, not_null, default_value, pk)| {
            let is_primary_key = pk > 0;
            let is_identity = is_primary_key && pk_count == 1 && base_type(&data_type) == "INTEGER";
            DatabaseColumn {
                column_name: name,
                max_length: declared_length(&data_type),
                data_type,
                is_nullable: !not_null && !is_identity,
                is_primary_key,
                is_identity,
                default_value,
            }
        })
        .collect();

    Ok(columns)
}

pub fn describe_table(conn: &Connection, table_name: &str) -> ProviderResult<DatabaseTable> {
    let target = resolve(conn, "table", table_name)?;
    let columns = columns(conn, &target)?;

    if columns.is_empty() {
        return Err(ProviderError::not_found("table", table_name));
    }

    Ok(DatabaseTable {
        table_name: target.name,
        schema: target.schema,
        columns,
    })
}

pub fn execute_query(conn: &Connection, query: &str) -> ProviderResult<QueryResult> {
    if !is_select_statement(query) {
        return Err(ProviderError::ReadOnlyViolation);
    }

    let mut stmt = conn.prepare(query)?;

    // Catches SELECT-prefixed text that still writes.
    if !stmt.readonly() {
        return Err(ProviderError::ReadOnlyViolation);
    }

    let columns: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(str::to_string)
        .collect();

    let mut rows = stmt.query([])?;
    let mut data = Vec::new();

    while let Some(row) = rows.next()? {
        let mut record = Map::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            let value: rusqlite::types::Value = row.get(i)?;
            record.insert(column.clone(), to_json(value));
        }
        data.push(record);
    }

    Ok(QueryResult { columns, data })
}

fn to_json(value: rusqlite::types::Value) -> Value {
    match value {
        rusqlite::types::Value::Null => Value::Null,
        rusqlite::types::Value::Integer(i) => serde_json::json!(i),
        rusqlite::types::Value::Real(f) => serde_json::json!(f),
        rusqlite::types::Value::Text(s) => Value::String(s),
        rusqlite::types::Value::Blob(b) => Value::String(format!("<blob {} bytes>", b.len())),
    }
}

/// SQLite has no stored procedures; the list is always empty and every
/// lookup by name is [`ProviderError::NotFound`]
pub fn list_stored_procedures(_conn: &Connection) -> ProviderResult<Vec<ProcedureSummary>> {
    Ok(Vec::new())
}

pub fn list_views(conn: &Connection) -> ProviderResult<Vec<ViewSummary>> {
    catalog(conn, "view", "name", |schema, row| {
        Ok(ViewSummary {
            schema: schema.to_string(),
            view_name: row.get(0)?,
        })
    })
}

pub fn describe_view(conn: &Connection, view_name: &str) -> ProviderResult<DatabaseView> {
    let target = resolve(conn, "view", view_name)?;

    let definition: Option<Option<String>> = conn
        .query_row(
            &format!(
                "SELECT sql FROM {} WHERE type = 'view' AND name = ?1",
                master_table(&target.schema)
            ),
            [&target.name],
            |row| row.get(0),
        )
        .optional()?;

    let Some(definition) = definition else {
        return Err(ProviderError::not_found("view", view_name));
    };

    let columns = columns(conn, &target)?;

    Ok(DatabaseView {
        view_name: target.name,
        schema: target.schema,
        definition: definition.unwrap_or_default(),
        columns,
    })
}

pub fn list_triggers(conn: &Connection) -> ProviderResult<Vec<TriggerSummary>> {
    catalog(conn, "trigger", "name, tbl_name, sql", |schema, row| {
        let sql: Option<String> = row.get(2)?;
        let header = TriggerHeader::parse(sql.as_deref().unwrap_or_default());
        Ok(TriggerSummary {
            trigger_name: row.get(0)?,
            table_name: row.get(1)?,
            schema: schema.to_string(),
            trigger_type: header.timing.to_string(),
            events: header.event.to_string(),
        })
    })
}

pub fn describe_trigger(conn: &Connection, trigger_name: &str) -> ProviderResult<DatabaseTrigger> {
    let target = resolve(conn, "trigger", trigger_name)?;

    let found: Option<(String, Option<String>)> = conn
        .query_row(
            &format!(
                "SELECT tbl_name, sql FROM {} WHERE type = 'trigger' AND name = ?1",
                master_table(&target.schema)
            ),
            [&target.name],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    let Some((table_name, sql)) = found else {
        return Err(ProviderError::not_found("trigger", trigger_name));
    };

    let definition = sql.unwrap_or_default();
    let header = TriggerHeader::parse(&definition);

    Ok(DatabaseTrigger {
        trigger_name: target.name,
        table_name,
        schema: target.schema,
        trigger_type: header.timing.to_string(),
        events: header.event.to_string(),
        definition,
    })
}

pub fn complete_schema(conn: &Connection) -> ProviderResult<CompleteSchema> {
    Ok(CompleteSchema {
        tables: list_tables(conn)?,
        stored_procedures: list_stored_procedures(conn)?,
        views: list_views(conn)?,
        triggers: list_triggers(conn)?,
    })
}

/// Timing and event of a `CREATE TRIGGER` statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerHeader {
    pub timing: &'static str,
    pub event: &'static str,
}

impl TriggerHeader {
    /// Read the clause between `TRIGGER <name>` and `ON <table>`
    ///
    /// SQLite defaults the timing to BEFORE when it is omitted.
    pub fn parse(sql: &str) -> Self {
        let upper = sql.to_ascii_uppercase();
        let tokens: Vec<&str> = upper.split_whitespace().collect();

        let start = tokens
            .iter()
            .position(|t| *t == "TRIGGER")
            .map_or(0, |i| i + 1);

        let mut header = TriggerHeader {
            timing: "BEFORE",
            event: "",
        };

        for token in tokens.iter().skip(start) {
            match *token {
                "ON" => break,
                "BEFORE" => header.timing = "BEFORE",
                "AFTER" => header.timing = "AFTER",
                "INSTEAD" => header.timing = "INSTEAD OF",
                "DELETE" if header.event.is_empty() => header.event = "DELETE",
                "INSERT" if header.event.is_empty() => header.event = "INSERT",
                "UPDATE" if header.event.is_empty() => header.event = "UPDATE",
                _ => {}
            }
        }

        header
    }
}
