//! ASP.NET Core controller using Dapper

use super::typemap::csharp_type;
use super::{to_pascal_case, Source};
use crate::types::DatabaseTable;

pub(super) fn render(table: &DatabaseTable) -> String {
    let class_name = to_pascal_case(&table.table_name);
    let qualified = table.qualified_name();
    let primary_key = table.primary_key();
    let mut src = Source::default();

    src.line(format!("// ASP.NET Core controller for {}", table.table_name));
    src.line("using Microsoft.AspNetCore.Mvc;");
    src.line("using System.Data.SqlClient;");
    src.line("using Dapper;");
    src.blank();
    src.line("[ApiController]");
    src.line("[Route(\"api/[controller]\")]");
    src.line(format!("public class {class_name}Controller : ControllerBase"));
    src.line("{");
    src.line("    private readonly string _connectionString;");
    src.blank();
    src.line(format!("    public {class_name}Controller(IConfiguration configuration)"));
    src.line("    {");
    src.line("        _connectionString = configuration.GetConnectionString(\"DefaultConnection\");");
    src.line("    }");
    src.blank();

    src.line("    [HttpGet]");
    src.line("    public async Task<IActionResult> GetAll()");
    src.line("    {");
    src.line("        using var connection = new SqlConnection(_connectionString);");
    src.line(format!("        var query = \"SELECT * FROM {qualified}\";"));
    src.line("        var results = await connection.QueryAsync(query);");
    src.line("        return Ok(results);");
    src.line("    }");
    src.blank();

    if let Some(pk) = primary_key {
        src.line("    [HttpGet(\"{id}\")]");
        src.line(format!(
            "    public async Task<IActionResult> GetById({} id)",
            csharp_type(&pk.data_type)
        ));
        src.line("    {");
        src.line("        using var connection = new SqlConnection(_connectionString);");
        src.line(format!(
            "        var query = \"SELECT * FROM {qualified} WHERE {} = @Id\";",
            pk.column_name
        ));
        src.line("        var result = await connection.QueryFirstOrDefaultAsync(query, new { Id = id });");
        src.line("        return result != null ? Ok(result) : NotFound();");
        src.line("    }");
        src.blank();
    }

    let insertable: Vec<&str> = table
        .columns
        .iter()
        .filter(|c| !c.is_identity)
        .map(|c| c.column_name.as_str())
        .collect();
    let placeholders: Vec<String> = insertable.iter().map(|name| format!("@{name}")).collect();

    src.line("    [HttpPost]");
    src.line("    public async Task<IActionResult> Create([FromBody] dynamic entity)");
    src.line("    {");
    src.line("        using var connection = new SqlConnection(_connectionString);");
    src.line(format!(
        "        var query = \"INSERT INTO {qualified} ({}) VALUES ({})\";",
        insertable.join(", "),
        placeholders.join(", ")
    ));
    src.line("        var result = await connection.ExecuteAsync(query, entity);");
    src.line("        return result > 0 ? Ok() : BadRequest();");
    src.line("    }");

    if let Some(pk) = primary_key {
        let key_type = csharp_type(&pk.data_type);
        let assignments: Vec<String> = table
            .columns
            .iter()
            .filter(|c| !c.is_primary_key && !c.is_identity)
            .map(|c| format!("{0} = @{0}", c.column_name))
            .collect();

        src.blank();
        src.line("    [HttpPut(\"{id}\")]");
        src.line(format!(
            "    public async Task<IActionResult> Update({key_type} id, [FromBody] dynamic entity)"
        ));
        src.line("    {");
        src.line("        using var connection = new SqlConnection(_connectionString);");
        src.line(format!(
            "        var query = \"UPDATE {qualified} SET {} WHERE {} = @Id\";",
            assignments.join(", "),
            pk.column_name
        ));
        src.line("        var result = await connection.ExecuteAsync(query, entity);");
        src.line("        return result > 0 ? Ok() : NotFound();");
        src.line("    }");
        src.blank();

        src.line("    [HttpDelete(\"{id}\")]");
        src.line(format!("    public async Task<IActionResult> Delete({key_type} id)"));
        src.line("    {");
        src.line("        using var connection = new SqlConnection(_connectionString);");
        src.line(format!(
            "        var query = \"DELETE FROM {qualified} WHERE {} = @Id\";",
            pk.column_name
        ));
        src.line("        var result = await connection.ExecuteAsync(query, new { Id = id });");
        src.line("        return result > 0 ? Ok() : NotFound();");
        src.line("    }");
    }

    src.line("}");
    src.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::fixtures;

    #[test]
    fn test_controller_with_primary_key() {
        let code = render(&fixtures::customers());
        assert!(code.contains("public class CustomerAccountsController : ControllerBase"));
        assert!(code.contains("SELECT * FROM main.customer_accounts\""));
        assert!(code.contains("GetById(long id)"));
        assert!(code.contains("INSERT INTO main.customer_accounts (name, balance) VALUES (@name, @balance)"));
        assert!(code.contains("SET name = @name, balance = @balance WHERE id = @Id"));
        assert!(code.contains("[HttpDelete(\"{id}\")]"));
        assert!(code.trim_end().ends_with('}'));
    }

    #[test]
    fn test_controller_without_primary_key_has_no_id_routes() {
        let code = render(&fixtures::keyless());
        assert!(code.contains("GetAll()"));
        assert!(code.contains("INSERT INTO main.events (payload) VALUES (@payload)"));
        assert!(!code.contains("{id}"));
        assert!(!code.contains("UPDATE"));
    }
}
