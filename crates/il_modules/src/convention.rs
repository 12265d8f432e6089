//! Per-convention shapes: how a dependency is reached, where exports go,
//! and the wrapper text around the body.

use il_ast::builder::{call, ident_expr, member, str_lit};
use il_ast::quote::js_string;
use il_ast::{Expr, ModuleType};

pub(crate) const EXPORTS_PARAM: &str = "__exports__";

/// A distinct import/re-export source, numbered from 1 in order of first use.
#[derive(Debug, Clone)]
pub(crate) struct Dependency {
    pub index: usize,
    pub source: String,
}

fn dependency_param(index: usize) -> String {
    format!("__dependency{index}__")
}

/// The object all of this unit's exports are assigned onto.
pub(crate) fn exports_object(module_type: ModuleType) -> Expr {
    match module_type {
        ModuleType::Amd | ModuleType::Globals => ident_expr(EXPORTS_PARAM),
        ModuleType::Cjs => ident_expr("exports"),
    }
}

/// An expression evaluating to the exports object of `dep`.
pub(crate) fn dependency_object(module_type: ModuleType, dep: &Dependency) -> Expr {
    match module_type {
        ModuleType::Amd => ident_expr(&dependency_param(dep.index)),
        ModuleType::Cjs => call(ident_expr("require"), vec![str_lit(&dep.source)]),
        ModuleType::Globals => ident_expr(EXPORTS_PARAM),
    }
}

/// The value bound by `import local from "dep"`.
///
/// Globals share one mapping, so a default import is looked up under the
/// local name it is imported as.
pub(crate) fn default_import(module_type: ModuleType, dep: &Dependency, local: &str) -> Expr {
    match module_type {
        ModuleType::Globals => member(ident_expr(EXPORTS_PARAM), local),
        ModuleType::Amd | ModuleType::Cjs => member(dependency_object(module_type, dep), "default"),
    }
}

/// The key `export default <expr>` is stored under.
pub(crate) fn default_export_key(module_type: ModuleType, module_id: &str, expr: &Expr) -> String {
    match (module_type, expr) {
        (ModuleType::Globals, Expr::Ident(ident)) => ident.sym.to_string(),
        (ModuleType::Globals, _) => module_id.to_string(),
        (ModuleType::Amd | ModuleType::Cjs, _) => "default".to_string(),
    }
}

/// Wrap an already-emitted body in the module convention.
pub(crate) fn wrap(module_type: ModuleType, module_id: &str, deps: &[Dependency], body: &str) -> String {
    let body = body.trim_end();
    match module_type {
        ModuleType::Amd => {
            let mut names: Vec<String> = deps.iter().map(|d| js_string(&d.source)).collect();
            names.push(js_string("exports"));
            let mut params: Vec<String> = deps.iter().map(|d| dependency_param(d.index)).collect();
            params.push(EXPORTS_PARAM.to_string());

            format!(
                "define({},\n  [{}],\n  function({}) {{\n    \"use strict\";\n{}\n  }});\n",
                js_string(module_id),
                names.join(","),
                params.join(", "),
                body
            )
        }
        ModuleType::Cjs => format!("(function() {{\n  \"use strict\";\n{body}\n}})();\n"),
        ModuleType::Globals => {
            format!("(function({EXPORTS_PARAM}) {{\n  \"use strict\";\n{body}\n}})(this);\n")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deps() -> Vec<Dependency> {
        vec![
            Dependency {
                index: 1,
                source: "bar".into(),
            },
            Dependency {
                index: 2,
                source: "lib/baz".into(),
            },
        ]
    }

    #[test]
    fn amd_lists_dependencies_then_exports() {
        let out = wrap(ModuleType::Amd, "app/app", &deps(), "var a = 1;\n");
        assert!(out.starts_with("define(\"app/app\",\n"), "{out}");
        assert!(out.contains("[\"bar\",\"lib/baz\",\"exports\"]"), "{out}");
        assert!(
            out.contains("function(__dependency1__, __dependency2__, __exports__) {"),
            "{out}"
        );
        assert!(out.contains("\"use strict\";\nvar a = 1;\n  });"), "{out}");
    }

    #[test]
    fn cjs_is_an_iife() {
        let out = wrap(ModuleType::Cjs, "x", &deps(), "var a = 1;");
        assert!(out.starts_with("(function() {"), "{out}");
        assert!(out.trim_end().ends_with("})();"), "{out}");
    }

    #[test]
    fn globals_take_the_shared_exports_mapping() {
        let out = wrap(ModuleType::Globals, "x", &[], "var a = 1;");
        assert!(out.starts_with("(function(__exports__) {"), "{out}");
        assert!(out.trim_end().ends_with("})(this);"), "{out}");
    }

    #[test]
    fn default_export_keys() {
        let foo = ident_expr("Foo");
        let lit = str_lit("x");
        assert_eq!(default_export_key(ModuleType::Amd, "m", &foo), "default");
        assert_eq!(default_export_key(ModuleType::Cjs, "m", &foo), "default");
        assert_eq!(default_export_key(ModuleType::Globals, "m", &foo), "Foo");
        assert_eq!(default_export_key(ModuleType::Globals, "m", &lit), "m");
    }
}
