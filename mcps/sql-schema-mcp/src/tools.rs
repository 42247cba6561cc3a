//! Tool catalog and argument extraction

use std::sync::LazyLock;

use mcp_common::{internal_error, JsonObject, McpResult, Tool as ToolDescriptor};
use serde_json::{json, Map, Value};

use crate::codegen::Framework;
use crate::error::{ProviderError, ProviderResult};
use crate::provider::CapabilityProvider;

/// The ten tools served by this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    ListTables,
    DescribeTable,
    ExecuteQuery,
    ListStoredProcedures,
    DescribeStoredProcedure,
    ListViews,
    DescribeView,
    ListTriggers,
    DescribeTrigger,
    GenerateCrudEndpoints,
}

/// A string argument in a tool's input schema
struct Argument {
    name: &'static str,
    description: &'static str,
}

const TABLE_NAME: Argument = Argument {
    name: "tableName",
    description: "Name of the table, optionally prefixed with its schema",
};

impl Tool {
    pub const ALL: [Tool; 10] = [
        Tool::ListTables,
        Tool::DescribeTable,
        Tool::ExecuteQuery,
        Tool::ListStoredProcedures,
        Tool::DescribeStoredProcedure,
        Tool::ListViews,
        Tool::DescribeView,
        Tool::ListTriggers,
        Tool::DescribeTrigger,
        Tool::GenerateCrudEndpoints,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tool::ListTables => "list_tables",
            Tool::DescribeTable => "describe_table",
            Tool::ExecuteQuery => "execute_query",
            Tool::ListStoredProcedures => "list_stored_procedures",
            Tool::DescribeStoredProcedure => "describe_stored_procedure",
            Tool::ListViews => "list_views",
            Tool::DescribeView => "describe_view",
            Tool::ListTriggers => "list_triggers",
            Tool::DescribeTrigger => "describe_trigger",
            Tool::GenerateCrudEndpoints => "generate_crud_endpoints",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    fn description(self) -> &'static str {
        match self {
            Tool::ListTables => "List every table in the database",
            Tool::DescribeTable => "Describe the columns and keys of a table",
            Tool::ExecuteQuery => "Run a read-only SQL SELECT query and return its rows",
            Tool::ListStoredProcedures => "List every stored procedure in the database",
            Tool::DescribeStoredProcedure => "Show the definition and parameters of a stored procedure",
            Tool::ListViews => "List every view in the database",
            Tool::DescribeView => "Show the definition and columns of a view",
            Tool::ListTriggers => "List every trigger in the database",
            Tool::DescribeTrigger => "Show the timing, event and definition of a trigger",
            Tool::GenerateCrudEndpoints => "Generate CRUD endpoint source code for a table",
        }
    }

    fn arguments(self) -> &'static [Argument] {
        match self {
            Tool::ListTables | Tool::ListStoredProcedures | Tool::ListViews | Tool::ListTriggers => &[],
            Tool::DescribeTable => &[TABLE_NAME],
            Tool::ExecuteQuery => &[Argument {
                name: "query",
                description: "SQL SELECT statement to run",
            }],
            Tool::DescribeStoredProcedure => &[Argument {
                name: "procedureName",
                description: "Name of the stored procedure",
            }],
            Tool::DescribeView => &[Argument {
                name: "viewName",
                description: "Name of the view, optionally prefixed with its schema",
            }],
            Tool::DescribeTrigger => &[Argument {
                name: "triggerName",
                description: "Name of the trigger, optionally prefixed with its schema",
            }],
            Tool::GenerateCrudEndpoints => &[
                TABLE_NAME,
                Argument {
                    name: "framework",
                    description: "Target framework (aspnet, fastapi, express)",
                },
            ],
        }
    }

    /// Catalog entry with a JSON Schema for the arguments
    pub fn descriptor(self) -> ToolDescriptor {
        let mut properties = Map::new();
        for arg in self.arguments() {
            let mut property = json!({"type": "string", "description": arg.description});
            if arg.name == "framework" {
                let names: Vec<&str> = Framework::ALL.iter().map(|f| f.as_str()).collect();
                property["enum"] = json!(names);
            }
            properties.insert(arg.name.to_string(), property);
        }
        let required: Vec<&str> = self.arguments().iter().map(|arg| arg.name).collect();

        let mut schema = JsonObject::new();
        schema.insert("type".to_string(), json!("object"));
        schema.insert("properties".to_string(), Value::Object(properties));
        schema.insert("required".to_string(), json!(required));

        ToolDescriptor::new(self.name(), self.description(), schema)
    }
}

/// Descriptors for [`Tool::ALL`], built once
pub static TOOLS: LazyLock<Vec<ToolDescriptor>> =
    LazyLock::new(|| Tool::ALL.into_iter().map(Tool::descriptor).collect());

/// A tool invocation with its arguments extracted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    ListTables,
    DescribeTable { table_name: String },
    ExecuteQuery { query: String },
    ListStoredProcedures,
    DescribeStoredProcedure { procedure_name: String },
    ListViews,
    DescribeView { view_name: String },
    ListTriggers,
    DescribeTrigger { trigger_name: String },
    GenerateCrudEndpoints { table_name: String, framework: String },
}

impl ToolCall {
    /// Resolve `name` and pull its arguments
    pub fn parse(name: &str, arguments: Option<&Value>) -> McpResult<Self> {
        let tool = Tool::from_name(name).ok_or_else(|| internal_error(format!("unknown tool: {}", name)))?;
        let arg = |key: &'static str| string_arg(arguments, key);

        let call = match tool {
            Tool::ListTables => ToolCall::ListTables,
            Tool::DescribeTable => ToolCall::DescribeTable {
                table_name: arg("tableName")?,
            },
            Tool::ExecuteQuery => ToolCall::ExecuteQuery { query: arg("query")? },
            Tool::ListStoredProcedures => ToolCall::ListStoredProcedures,
            Tool::DescribeStoredProcedure => ToolCall::DescribeStoredProcedure {
                procedure_name: arg("procedureName")?,
            },
            Tool::ListViews => ToolCall::ListViews,
            Tool::DescribeView => ToolCall::DescribeView {
                view_name: arg("viewName")?,
            },
            Tool::ListTriggers => ToolCall::ListTriggers,
            Tool::DescribeTrigger => ToolCall::DescribeTrigger {
                trigger_name: arg("triggerName")?,
            },
            Tool::GenerateCrudEndpoints => ToolCall::GenerateCrudEndpoints {
                table_name: arg("tableName")?,
                framework: arg("framework")?,
            },
        };
        Ok(call)
    }

    /// Invoke the matching provider operation
    pub async fn run<P: CapabilityProvider + ?Sized>(&self, provider: &P) -> ProviderResult<String> {
        match self {
            ToolCall::ListTables => provider.list_tables().await,
            ToolCall::DescribeTable { table_name } => provider.describe_table(table_name).await,
            ToolCall::ExecuteQuery { query } => provider.execute_query(query).await,
            ToolCall::ListStoredProcedures => provider.list_stored_procedures().await,
            ToolCall::DescribeStoredProcedure { procedure_name } => {
                provider.describe_stored_procedure(procedure_name).await
            }
            ToolCall::ListViews => provider.list_views().await,
            ToolCall::DescribeView { view_name } => provider.describe_view(view_name).await,
            ToolCall::ListTriggers => provider.list_triggers().await,
            ToolCall::DescribeTrigger { trigger_name } => provider.describe_trigger(trigger_name).await,
            ToolCall::GenerateCrudEndpoints { table_name, framework } => {
                provider.generate_crud_endpoints(table_name, framework).await
            }
        }
    }
}

/// A string argument; absent or null reads as empty
fn string_arg(arguments: Option<&Value>, key: &'static str) -> Result<String, ProviderError> {
    match arguments.and_then(|args| args.get(key)) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ProviderError::InvalidArgument(key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcp_common::required_arguments;

    #[test]
    fn test_catalog_has_ten_unique_tools() {
        assert_eq!(TOOLS.len(), 10);
        let mut names: Vec<_> = TOOLS.iter().map(|t| t.name.as_ref()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 10);
        assert!(TOOLS
            .iter()
            .all(|t| t.description.as_deref().is_some_and(|d| !d.is_empty())));
    }

    #[test]
    fn test_required_arguments() {
        let required = |name: &str| {
            TOOLS
                .iter()
                .find(|t| t.name == name)
                .map(required_arguments)
                .unwrap()
        };
        assert!(required("list_tables").is_empty());
        assert_eq!(required("describe_table"), vec!["tableName"]);
        assert_eq!(required("execute_query"), vec!["query"]);
        assert_eq!(required("describe_stored_procedure"), vec!["procedureName"]);
        assert_eq!(required("describe_view"), vec!["viewName"]);
        assert_eq!(required("describe_trigger"), vec!["triggerName"]);
        assert_eq!(required("generate_crud_endpoints"), vec!["tableName", "framework"]);
    }

    #[test]
    fn test_framework_schema_has_enum() {
        let schema = Tool::GenerateCrudEndpoints.descriptor().input_schema;
        assert_eq!(schema["type"], "object");
        assert_eq!(
            schema["properties"]["framework"]["enum"],
            json!(["aspnet", "fastapi", "express"])
        );
        assert_eq!(schema["properties"]["tableName"]["type"], "string");
        assert!(schema["properties"]["tableName"].get("enum").is_none());
    }

    #[test]
    fn test_name_round_trip() {
        for tool in Tool::ALL {
            assert_eq!(Tool::from_name(tool.name()), Some(tool));
        }
        assert_eq!(Tool::from_name("List_Tables"), None);
    }

    #[test]
    fn test_parse_unknown_tool() {
        let err = ToolCall::parse("foo", None).unwrap_err();
        assert_eq!(err.message, "unknown tool: foo");
    }

    #[test]
    fn test_parse_defaults_missing_arguments_to_empty() {
        assert_eq!(
            ToolCall::parse("describe_table", None).unwrap(),
            ToolCall::DescribeTable {
                table_name: String::new()
            }
        );
        let args = json!({"tableName": null, "framework": "express"});
        assert_eq!(
            ToolCall::parse("generate_crud_endpoints", Some(&args)).unwrap(),
            ToolCall::GenerateCrudEndpoints {
                table_name: String::new(),
                framework: "express".into()
            }
        );
    }

    #[test]
    fn test_parse_rejects_non_string_argument() {
        let args = json!({"query": 42});
        let err = ToolCall::parse("execute_query", Some(&args)).unwrap_err();
        assert_eq!(err.code.0, -32603);
        assert_eq!(err.message, "argument 'query' must be a string");
    }

    #[test]
    fn test_parse_ignores_extra_arguments() {
        let args = json!({"viewName": "v", "unused": [1, 2]});
        assert_eq!(
            ToolCall::parse("describe_view", Some(&args)).unwrap(),
            ToolCall::DescribeView {
                view_name: "v".into()
            }
        );
    }
}
