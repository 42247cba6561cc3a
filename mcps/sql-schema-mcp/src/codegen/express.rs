//! Express router using the `mssql` driver

use super::typemap::mssql_js_type;
use super::Source;
use crate::types::DatabaseTable;

pub(super) fn render(table: &DatabaseTable) -> String {
    let route = table.table_name.to_lowercase();
    let qualified = table.qualified_name();
    let mut src = Source::default();

    src.line(format!("// Express.js routes for {}", table.table_name));
    src.line("const express = require('express');");
    src.line("const sql = require('mssql');");
    src.line("const router = express.Router();");
    src.blank();

    src.line(format!("// GET /{route}"));
    src.line("router.get('/', async (req, res) => {");
    src.line("    try {");
    src.line("        const request = new sql.Request();");
    src.line(format!("        const result = await request.query('SELECT * FROM {qualified}');"));
    src.line("        res.json(result.recordset);");
    src.line("    } catch (err) {");
    src.line("        res.status(500).json({ error: err.message });");
    src.line("    }");
    src.line("});");
    src.blank();

    if let Some(pk) = table.primary_key() {
        src.line(format!("// GET /{route}/:id"));
        src.line("router.get('/:id', async (req, res) => {");
        src.line("    try {");
        src.line("        const request = new sql.Request();");
        src.line(format!(
            "        request.input('id', sql.{}, req.params.id);",
            mssql_js_type(&pk.data_type)
        ));
        src.line(format!(
            "        const result = await request.query('SELECT * FROM {qualified} WHERE {} = @id');",
            pk.column_name
        ));
        src.line("        if (result.recordset.length === 0) {");
        src.line("            return res.status(404).json({ error: 'Item not found' });");
        src.line("        }");
        src.line("        res.json(result.recordset[0]);");
        src.line("    } catch (err) {");
        src.line("        res.status(500).json({ error: err.message });");
        src.line("    }");
        src.line("});");
        src.blank();
    }

    src.line("module.exports = router;");
    src.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::fixtures;

    #[test]
    fn test_routes_with_primary_key() {
        let code = render(&fixtures::customers());
        assert!(code.contains("// GET /customer_accounts/:id"));
        assert!(code.contains("request.input('id', sql.Int, req.params.id);"));
        assert!(code.contains("WHERE id = @id"));
        assert!(code.trim_end().ends_with("module.exports = router;"));
    }

    #[test]
    fn test_routes_without_primary_key() {
        let code = render(&fixtures::keyless());
        assert!(code.contains("router.get('/',"));
        assert!(!code.contains(":id"));
    }
}
