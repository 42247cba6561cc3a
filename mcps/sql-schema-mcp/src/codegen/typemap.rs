//! Declared SQL type -> target language type
//!
//! Lookups go by [`base_type`], so `VARCHAR(40)` and `varchar` map alike.
//! SQLite's affinity names are covered next to the SQL Server names.

use crate::types::base_type;

/// C# type for a column
pub fn csharp_type(declared: &str) -> &'static str {
    match base_type(declared).as_str() {
        "INT" | "MEDIUMINT" => "int",
        "INTEGER" | "BIGINT" => "long",
        "SMALLINT" => "short",
        "TINYINT" => "byte",
        "BIT" | "BOOL" | "BOOLEAN" => "bool",
        "DECIMAL" | "NUMERIC" | "MONEY" | "SMALLMONEY" => "decimal",
        "FLOAT" | "DOUBLE" | "DOUBLE PRECISION" | "REAL" => "double",
        "VARCHAR" | "NVARCHAR" | "CHAR" | "NCHAR" | "TEXT" | "NTEXT" | "CLOB" | "CHARACTER"
        | "VARYING CHARACTER" | "NATIVE CHARACTER" => "string",
        "DATETIME" | "DATETIME2" | "SMALLDATETIME" | "TIMESTAMP" => "DateTime",
        "DATE" => "DateOnly",
        "TIME" => "TimeOnly",
        "UNIQUEIDENTIFIER" | "UUID" => "Guid",
        "VARBINARY" | "BINARY" | "IMAGE" | "BLOB" => "byte[]",
        _ => "object",
    }
}

/// Python annotation for a column
pub fn python_type(declared: &str) -> &'static str {
    match base_type(declared).as_str() {
        "INT" | "INTEGER" | "BIGINT" | "SMALLINT" | "TINYINT" | "MEDIUMINT" => "int",
        "BIT" | "BOOL" | "BOOLEAN" => "bool",
        "DECIMAL" | "NUMERIC" | "MONEY" | "SMALLMONEY" | "FLOAT" | "DOUBLE" | "DOUBLE PRECISION"
        | "REAL" => "float",
        "VARBINARY" | "BINARY" | "IMAGE" | "BLOB" => "bytes",
        _ => "str",
    }
}

/// `mssql` driver type constant for a column (`sql.<Type>`)
pub fn mssql_js_type(declared: &str) -> &'static str {
    match base_type(declared).as_str() {
        "INT" | "INTEGER" | "MEDIUMINT" => "Int",
        "BIGINT" => "BigInt",
        "SMALLINT" => "SmallInt",
        "TINYINT" => "TinyInt",
        "BIT" | "BOOL" | "BOOLEAN" => "Bit",
        "DECIMAL" | "NUMERIC" | "MONEY" | "SMALLMONEY" => "Decimal",
        "FLOAT" | "DOUBLE" | "DOUBLE PRECISION" => "Float",
        "REAL" => "Real",
        "NVARCHAR" | "NCHAR" => "NVarChar",
        "TEXT" | "CLOB" => "Text",
        "NTEXT" => "NText",
        "DATETIME" | "SMALLDATETIME" | "TIMESTAMP" => "DateTime",
        "DATETIME2" => "DateTime2",
        "DATE" => "Date",
        "TIME" => "Time",
        "UNIQUEIDENTIFIER" | "UUID" => "UniqueIdentifier",
        "VARBINARY" | "BINARY" | "BLOB" => "VarBinary",
        "IMAGE" => "Image",
        _ => "VarChar",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csharp_types() {
        assert_eq!(csharp_type("INTEGER"), "long");
        assert_eq!(csharp_type("int"), "int");
        assert_eq!(csharp_type("varchar(255)"), "string");
        assert_eq!(csharp_type("DECIMAL(10,2)"), "decimal");
        assert_eq!(csharp_type("BLOB"), "byte[]");
        assert_eq!(csharp_type(""), "object");
        assert_eq!(csharp_type("GEOGRAPHY"), "object");
    }

    #[test]
    fn test_python_types() {
        assert_eq!(python_type("INTEGER"), "int");
        assert_eq!(python_type("REAL"), "float");
        assert_eq!(python_type("boolean"), "bool");
        assert_eq!(python_type("TEXT"), "str");
        assert_eq!(python_type("datetime"), "str");
        assert_eq!(python_type("blob"), "bytes");
    }

    #[test]
    fn test_mssql_js_types() {
        assert_eq!(mssql_js_type("INTEGER"), "Int");
        assert_eq!(mssql_js_type("nvarchar(50)"), "NVarChar");
        assert_eq!(mssql_js_type("datetime2"), "DateTime2");
        assert_eq!(mssql_js_type(""), "VarChar");
    }
}
