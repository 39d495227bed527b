//! Declaration report over wire-tree JSON.
//!
//! This module is deliberately a *consumer* of the documented wire format:
//! it queries plain JSON by `NodeType`, never the codec's native types, the
//! way any downstream tool would.

use log::{debug, info};
use serde_json::Value;

/// Counts of what the report found.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReportSummary {
    pub functions: usize,
    pub imports: usize,
    pub types: usize,
    pub values: usize,
}

fn node_type(v: &Value) -> &str {
    v.get("NodeType").and_then(Value::as_str).unwrap_or("")
}

fn ident_name(v: &Value) -> &str {
    v.get("Name").and_then(Value::as_str).unwrap_or("_")
}

/// Parameter names and type names of a `FuncDecl` value, best effort: only
/// identifier-typed parameters report a type name, everything else reports
/// its discriminant.
fn func_params(decl: &Value) -> Vec<(String, String)> {
    let mut params = Vec::new();
    let list = decl
        .pointer("/Type/Params/List")
        .and_then(Value::as_array);
    for field in list.into_iter().flatten() {
        let type_name = match field.get("Type") {
            Some(t) if node_type(t) == "Ident" => ident_name(t).to_string(),
            Some(t) => node_type(t).to_string(),
            None => String::new(),
        };
        let names = field.get("Names").and_then(Value::as_array);
        match names {
            Some(names) if !names.is_empty() => {
                for name in names {
                    params.push((ident_name(name).to_string(), type_name.clone()));
                }
            }
            _ => params.push((String::new(), type_name)),
        }
    }
    params
}

/// Walks the declarations of a wire file and logs what it finds.
pub fn report_file(wire: &Value) -> ReportSummary {
    let mut summary = ReportSummary::default();

    let package = wire
        .pointer("/Name/Name")
        .and_then(Value::as_str)
        .unwrap_or("?");
    info!("package {package}");

    let decls = wire.get("Decls").and_then(Value::as_array);
    for decl in decls.into_iter().flatten() {
        match node_type(decl) {
            "FuncDecl" => {
                summary.functions += 1;
                let name = decl.get("Name").map(ident_name).unwrap_or("_");
                let params = func_params(decl)
                    .into_iter()
                    .map(|(n, t)| if n.is_empty() { t } else { format!("{n} {t}") })
                    .collect::<Vec<_>>()
                    .join(", ");
                info!("func {name}({params})");
            }
            "GenDecl" => {
                let specs = decl.get("Specs").and_then(Value::as_array);
                for spec in specs.into_iter().flatten() {
                    match node_type(spec) {
                        "ImportSpec" => {
                            summary.imports += 1;
                            let path = spec
                                .pointer("/Path/Value")
                                .and_then(Value::as_str)
                                .unwrap_or("")
                                .trim_matches('"');
                            info!("import {path}");
                        }
                        "TypeSpec" => {
                            summary.types += 1;
                            let name = spec.get("Name").map(ident_name).unwrap_or("_");
                            let kind = spec.get("Type").map(node_type).unwrap_or("");
                            info!("type {name} ({kind})");
                        }
                        "ValueSpec" => {
                            summary.values += 1;
                            let names = spec
                                .get("Names")
                                .and_then(Value::as_array)
                                .map(|names| {
                                    names
                                        .iter()
                                        .map(ident_name)
                                        .collect::<Vec<_>>()
                                        .join(", ")
                                })
                                .unwrap_or_default();
                            info!("var/const {names}");
                        }
                        other => debug!("skipping spec {other}"),
                    }
                }
            }
            other => debug!("skipping declaration {other}"),
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::AstArena;
    use crate::encode::Marshaller;
    use crate::parser::parse_file;
    use crate::position::FileSet;
    use crate::Options;

    fn wire_for(src: &str) -> Value {
        let mut fset = FileSet::new();
        let mut arena = AstArena::new();
        let file = parse_file(&mut fset, &mut arena, "r.go", src).unwrap();
        let wire = Marshaller::new(Options::all(), &fset).marshal_file(&arena, &file);
        serde_json::to_value(wire).unwrap()
    }

    #[test]
    fn counts_declarations() {
        let wire = wire_for(
            r#"package demo

import "fmt"

const answer = 42

type point struct {
	x, y int
}

func scale(p point, factor int) point {
	return point{x: p.x * factor, y: p.y * factor}
}

func main() {
	fmt.Println(scale(point{x: 1, y: 2}, answer))
}
"#,
        );
        let summary = report_file(&wire);
        assert_eq!(
            summary,
            ReportSummary {
                functions: 2,
                imports: 1,
                types: 1,
                values: 1,
            }
        );
    }

    #[test]
    fn reports_parameter_names_and_types() {
        let wire = wire_for("package p\n\nfunc f(a, b int, c string) {}\n");
        let decl = &wire["Decls"][0];
        let params = func_params(decl);
        assert_eq!(
            params,
            vec![
                ("a".to_string(), "int".to_string()),
                ("b".to_string(), "int".to_string()),
                ("c".to_string(), "string".to_string()),
            ]
        );
    }
}
