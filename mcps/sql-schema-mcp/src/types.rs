//! Metadata records returned by the provider
//!
//! All records serialize with camelCase keys.

use serde::{Deserialize, Serialize};

/// Default schema for unqualified names
pub const DEFAULT_SCHEMA: &str = "main";

/// `schema.name` split into its parts, defaulting the schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    pub schema: String,
    pub name: String,
}

impl QualifiedName {
    /// Split `schema.name`; an unqualified name lives in [`DEFAULT_SCHEMA`]
    ///
    /// An unquoted schema ends at the first `.`, so `a.b.c` is table `b.c`
    /// in schema `a`. Either part may be double-quoted with `""` as an
    /// escaped quote: `"a.b"` is table `a.b` in `main`. Anything that does
    /// not parse is taken whole as a name in `main`.
    pub fn parse(raw: &str) -> Self {
        let (schema, rest) = match quoted(raw) {
            Some((ident, "")) if !ident.is_empty() => return Self::unqualified(ident),
            Some((ident, rest)) if !ident.is_empty() => match rest.strip_prefix('.') {
                Some(rest) => (ident, rest),
                None => return Self::unqualified(raw.to_string()),
            },
            Some(_) => return Self::unqualified(raw.to_string()),
            None => match raw.split_once('.') {
                Some((schema, name)) if !schema.is_empty() && !schema.starts_with('"') => {
                    (schema.to_string(), name)
                }
                _ => return Self::unqualified(raw.to_string()),
            },
        };

        let name = match quoted(rest) {
            Some((ident, "")) => ident,
            _ => rest.to_string(),
        };
        Self { schema, name }
    }

    fn unqualified(name: String) -> Self {
        Self {
            schema: DEFAULT_SCHEMA.to_string(),
            name,
        }
    }
}

/// A leading double-quoted identifier and the text after its closing quote
fn quoted(raw: &str) -> Option<(String, &str)> {
    let body = raw.strip_prefix('"')?;
    let mut ident = String::new();
    let mut chars = body.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c != '"' {
            ident.push(c);
        } else if chars.peek().is_some_and(|&(_, next)| next == '"') {
            ident.push('"');
            chars.next();
        } else {
            return Some((ident, &body[i + 1..]));
        }
    }
    None
}

/// Declared type without its size suffix, uppercased
///
/// `varchar(255)` becomes `VARCHAR`, `UNSIGNED BIG INT` stays as is.
pub fn base_type(declared: &str) -> String {
    declared
        .split('(')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_uppercase()
}

/// Length from a `CHAR(n)`-family declaration
pub fn declared_length(declared: &str) -> Option<u32> {
    let base = base_type(declared);
    if !(base.contains("CHAR") || base.contains("BINARY")) {
        return None;
    }
    let (_, rest) = declared.split_once('(')?;
    let (size, _) = rest.split_once(')')?;
    size.split(',').next()?.trim().parse().ok()
}

/// Entry of `list_tables`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSummary {
    pub schema: String,
    pub table_name: String,
    pub table_type: String,
}

/// Column of a table or view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseColumn {
    pub column_name: String,
    pub data_type: String,
    pub is_nullable: bool,
    pub is_primary_key: bool,
    pub is_identity: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

/// Result of `describe_table`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseTable {
    pub table_name: String,
    pub schema: String,
    pub columns: Vec<DatabaseColumn>,
}

impl DatabaseTable {
    /// First primary key column, if any
    pub fn primary_key(&self) -> Option<&DatabaseColumn> {
        self.columns.iter().find(|c| c.is_primary_key)
    }

    /// `schema.table` as used in generated SQL
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.table_name)
    }
}

/// Entry of `list_stored_procedures`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcedureSummary {
    pub schema: String,
    pub name: String,
    #[serde(rename = "type")]
    pub routine_type: String,
}

/// Entry of `list_views`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSummary {
    pub schema: String,
    pub view_name: String,
}

/// Result of `describe_view`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseView {
    pub view_name: String,
    pub schema: String,
    pub definition: String,
    pub columns: Vec<DatabaseColumn>,
}

/// Entry of `list_triggers`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerSummary {
    pub trigger_name: String,
    pub table_name: String,
    pub schema: String,
    pub trigger_type: String,
    pub events: String,
}

/// Result of `describe_trigger`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseTrigger {
    pub trigger_name: String,
    pub table_name: String,
    pub schema: String,
    pub trigger_type: String,
    pub events: String,
    pub definition: String,
}

/// Result of `execute_query`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub data: Vec<serde_json::Map<String, serde_json::Value>>,
}

/// Aggregate served as the `database://schema` resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteSchema {
    pub tables: Vec<TableSummary>,
    pub stored_procedures: Vec<ProcedureSummary>,
    pub views: Vec<ViewSummary>,
    pub triggers: Vec<TriggerSummary>,
}
