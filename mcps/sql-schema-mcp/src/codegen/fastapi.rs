//! FastAPI router using pyodbc

use super::typemap::python_type;
use super::Source;
use crate::types::DatabaseTable;

pub(super) fn render(table: &DatabaseTable) -> String {
    let route = table.table_name.to_lowercase();
    let qualified = table.qualified_name();
    let mut src = Source::default();

    src.line(format!("# FastAPI endpoints for {}", table.table_name));
    src.line("from fastapi import APIRouter, HTTPException");
    src.line("from typing import List, Optional");
    src.line("import pyodbc");
    src.blank();
    src.line(format!("router = APIRouter(prefix=\"/{route}\", tags=[\"{route}\"])"));
    src.blank();

    src.line("@router.get(\"/\")");
    src.line(format!("async def get_all_{route}():"));
    src.line("    connection = pyodbc.connect(CONNECTION_STRING)");
    src.line("    cursor = connection.cursor()");
    src.line(format!("    cursor.execute(\"SELECT * FROM {qualified}\")"));
    src.line("    results = cursor.fetchall()");
    src.line("    connection.close()");
    src.line("    return results");
    src.blank();

    if let Some(pk) = table.primary_key() {
        src.line("@router.get(\"/{id}\")");
        src.line(format!(
            "async def get_{route}_by_id(id: {}):",
            python_type(&pk.data_type)
        ));
        src.line("    connection = pyodbc.connect(CONNECTION_STRING)");
        src.line("    cursor = connection.cursor()");
        src.line(format!(
            "    cursor.execute(\"SELECT * FROM {qualified} WHERE {} = ?\", id)",
            pk.column_name
        ));
        src.line("    result = cursor.fetchone()");
        src.line("    connection.close()");
        src.line("    if not result:");
        src.line("        raise HTTPException(status_code=404, detail=\"Item not found\")");
        src.line("    return result");
        src.blank();
    }

    src.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::fixtures;

    #[test]
    fn test_router_with_primary_key() {
        let code = render(&fixtures::customers());
        assert!(code.contains("APIRouter(prefix=\"/customer_accounts\""));
        assert!(code.contains("async def get_all_customer_accounts():"));
        assert!(code.contains("async def get_customer_accounts_by_id(id: int):"));
        assert!(code.contains("WHERE id = ?\", id)"));
    }

    #[test]
    fn test_router_without_primary_key() {
        let code = render(&fixtures::keyless());
        assert!(code.contains("async def get_all_events():"));
        assert!(!code.contains("by_id"));
    }
}
