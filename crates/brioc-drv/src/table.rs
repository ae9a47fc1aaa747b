//! Symbol-table rendering.
//!
//! Renders the global scope of an analysis: one row per symbol with its
//! category, name, type, and declaration position; function parameters,
//! nested functions, and class members are indented under their owner.

use std::fmt::Write;

use brioc_sem::{ClassSymbol, FuncSymbol, ScopeStack, Symbol};

/// Render the symbol table rooted at the global scope.
pub fn render_symbol_table(scopes: &ScopeStack) -> String {
    let mut out = String::new();
    out.push_str("Tabla de Símbolos\n");
    out.push_str("====================\n");

    let global = scopes.global();
    let _ = writeln!(out, "Scope ({})", global.kind.as_str());
    for sym in global.symbols() {
        render_symbol(&mut out, sym);
    }
    out
}

fn render_symbol(out: &mut String, sym: &Symbol) {
    let span = sym.span();
    let _ = writeln!(
        out,
        "- {:<8} {:<12} : {} (line {}, col {})",
        sym.category(),
        sym.name(),
        sym.ty(),
        span.line,
        span.column
    );

    match sym {
        Symbol::Function(func) => render_function_details(out, func),
        Symbol::Class(class) => render_class_details(out, class),
        _ => {}
    }
}

fn render_function_details(out: &mut String, func: &FuncSymbol) {
    for param in &func.params {
        let _ = writeln!(
            out,
            "    param {} : {} (index {})",
            param.name, param.ty, param.index
        );
    }
    for (name, nested) in &func.nested {
        let _ = writeln!(out, "    nested function {} : {}", name, nested.ty);
        for param in &nested.params {
            let _ = writeln!(
                out,
                "        param {} : {} (index {})",
                param.name, param.ty, param.index
            );
        }
    }
}

fn render_class_details(out: &mut String, class: &ClassSymbol) {
    for (name, field) in &class.fields {
        let _ = writeln!(out, "    field {} : {}", name, field.ty);
    }
    for (name, method) in &class.methods {
        let _ = writeln!(out, "    method {} : {}", name, method.ty);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brioc_par::parse;
    use brioc_sem::analyze;

    fn table_for(source: &str) -> String {
        render_symbol_table(&analyze(&parse(source).unwrap()).scopes)
    }

    #[test]
    fn test_renders_globals_with_positions() {
        let table = table_for("let x: integer = 5;\nconst PI: integer = 314;");
        assert!(table.contains("Tabla de Símbolos"));
        assert!(table.contains("Scope (global)"));
        assert!(table.contains("variable"));
        assert!(table.contains("x"));
        assert!(table.contains("(line 1, col 1)"));
        assert!(table.contains("const"));
        assert!(table.contains("PI"));
    }

    #[test]
    fn test_renders_function_params_and_nested() {
        let table = table_for(
            "function externo(x: integer): integer {
               function interno(y: integer): integer { return x + y; }
               return interno(5);
             }",
        );
        assert!(table.contains("function externo"));
        assert!(table.contains("param x : integer (index 0)"));
        assert!(table.contains("nested function interno : (integer) -> integer"));
        assert!(table.contains("param y : integer (index 0)"));
    }

    #[test]
    fn test_renders_class_members_in_order() {
        let table = table_for(
            "class Point {
               let x: integer;
               let y: integer;
               function constructor(x: integer, y: integer) { this.x = x; this.y = y; }
             }",
        );
        assert!(table.contains("class    Point"));
        assert!(table.contains("field x : integer"));
        assert!(table.contains("field y : integer"));
        assert!(table.contains("method constructor : (integer, integer) -> void"));
        let x_pos = table.find("field x").unwrap();
        let y_pos = table.find("field y").unwrap();
        assert!(x_pos < y_pos);
    }
}
