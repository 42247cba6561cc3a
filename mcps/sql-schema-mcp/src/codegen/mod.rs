//! CRUD endpoint generators
//!
//! Turns a [`DatabaseTable`] description into route/controller source for
//! one of three web frameworks. The output is plain text; nothing here
//! touches the database.

mod aspnet;
mod express;
mod fastapi;
pub mod typemap;

use std::str::FromStr;

use crate::error::ProviderError;
use crate::types::DatabaseTable;

/// Target framework for generated endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framework {
    AspNet,
    FastApi,
    Express,
}

impl Framework {
    pub const ALL: [Framework; 3] = [Framework::AspNet, Framework::FastApi, Framework::Express];

    pub fn as_str(self) -> &'static str {
        match self {
            Framework::AspNet => "aspnet",
            Framework::FastApi => "fastapi",
            Framework::Express => "express",
        }
    }
}

impl FromStr for Framework {
    type Err = ProviderError;

    /// Case-insensitive; anything else is [`ProviderError::UnsupportedFramework`]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ProviderError::UnsupportedFramework(s.to_string()))
    }
}

/// Render CRUD endpoints for `table`
pub fn generate(table: &DatabaseTable, framework: Framework) -> String {
    match framework {
        Framework::AspNet => aspnet::render(table),
        Framework::FastApi => fastapi::render(table),
        Framework::Express => express::render(table),
    }
}

/// Line-oriented source buffer
#[derive(Debug, Default)]
struct Source {
    text: String,
}

impl Source {
    fn line(&mut self, line: impl AsRef<str>) {
        self.text.push_str(line.as_ref());
        self.text.push('\n');
    }

    fn blank(&mut self) {
        self.text.push('\n');
    }

    fn finish(self) -> String {
        self.text
    }
}

/// `order_items` -> `OrderItems`
pub fn to_pascal_case(input: &str) -> String {
    input
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::types::{DatabaseColumn, DatabaseTable};

    pub fn column(name: &str, data_type: &str, pk: bool, identity: bool) -> DatabaseColumn {
        DatabaseColumn {
            column_name: name.to_string(),
            data_type: data_type.to_string(),
            is_nullable: !pk,
            is_primary_key: pk,
            is_identity: identity,
            max_length: None,
            default_value: None,
        }
    }

    pub fn customers() -> DatabaseTable {
        DatabaseTable {
            table_name: "customer_accounts".to_string(),
            schema: "main".to_string(),
            columns: vec![
                column("id", "INTEGER", true, true),
                column("name", "VARCHAR(120)", false, false),
                column("balance", "DECIMAL(10,2)", false, false),
            ],
        }
    }

    pub fn keyless() -> DatabaseTable {
        DatabaseTable {
            table_name: "events".to_string(),
            schema: "main".to_string(),
            columns: vec![column("payload", "TEXT", false, false)],
        }
    }
}
