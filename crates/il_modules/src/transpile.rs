//! ES module syntax → AMD / CommonJS / globals.
//!
//! ```js
//! import Bar from "bar";
//! class Foo extends Bar {}
//! export default Foo;
//! ```
//!
//! becomes, for AMD:
//!
//! ```js
//! define("foo",
//!   ["bar","exports"],
//!   function(__dependency1__, __exports__) {
//!     "use strict";
//! var Bar = __dependency1__["default"];
//! class Foo extends Bar {}
//! __exports__["default"] = Foo;
//!   });
//! ```
//!
//! Import bindings and re-exports are hoisted to the top of the body.
//! `export default <expr>` is assigned where it appears; exported
//! declarations and `export { ... }` lists are assigned at the end, after
//! every declaration has run.

use il_ast::builder::{
    assign, declarator, expr_stmt, ident_expr, member, member_expr, own_keys_copy,
    var_stmt,
};
use il_ast::quote::{export_name_text, str_text};
use il_ast::*;
use il_parser::{emit_script, parse_module, StageError};
use swc_common::DUMMY_SP;

use crate::convention::{self, Dependency};

/// Rewrite the module syntax of `source` into the `module_type` convention,
/// registering it as `module_id`.
pub fn transpile_modules(
    source: &str,
    file_name: &str,
    module_id: &str,
    module_type: ModuleType,
) -> Result<String, StageError> {
    let parsed = parse_module(source, file_name)?;

    let mut layout = ModuleLayout::new(module_type, module_id);
    for item in parsed.module.body {
        layout.push(item);
    }
    tracing::debug!(
        module = module_id,
        %module_type,
        dependencies = layout.deps.len(),
        exports = layout.epilogue.len(),
        "collected module declarations"
    );

    let ModuleLayout {
        deps,
        prologue,
        body,
        epilogue,
        ..
    } = layout;
    let script = Script {
        span: DUMMY_SP,
        body: prologue.into_iter().chain(body).chain(epilogue).collect(),
        shebang: None,
    };
    let body_text = emit_script(
        &script,
        &parsed.source_map,
        Some(&parsed.comments),
        EsVersion::latest(),
    )
    .map_err(|source| StageError::Emit {
        file: file_name.to_string(),
        source,
    })?;

    Ok(convention::wrap(module_type, module_id, &deps, &body_text))
}

/// A module split into the three regions of the wrapped body.
struct ModuleLayout<'a> {
    module_type: ModuleType,
    module_id: &'a str,
    deps: Vec<Dependency>,
    /// Import bindings and re-exports.
    prologue: Vec<Stmt>,
    body: Vec<Stmt>,
    /// Assignments for exported declarations and export lists.
    epilogue: Vec<Stmt>,
}

impl<'a> ModuleLayout<'a> {
    fn new(module_type: ModuleType, module_id: &'a str) -> Self {
        Self {
            module_type,
            module_id,
            deps: Vec::new(),
            prologue: Vec::new(),
            body: Vec::new(),
            epilogue: Vec::new(),
        }
    }

    fn dependency(&mut self, source: &Str) -> Dependency {
        let source = str_text(source);
        if let Some(dep) = self.deps.iter().find(|d| d.source == source) {
            return dep.clone();
        }
        let dep = Dependency {
            index: self.deps.len() + 1,
            source,
        };
        self.deps.push(dep.clone());
        dep
    }

    fn exports(&self) -> Expr {
        convention::exports_object(self.module_type)
    }

    fn push(&mut self, item: ModuleItem) {
        match item {
            ModuleItem::Stmt(stmt) => self.body.push(stmt),
            ModuleItem::ModuleDecl(decl) => self.push_decl(decl),
        }
    }

    fn push_decl(&mut self, decl: ModuleDecl) {
        match decl {
            ModuleDecl::Import(import) => self.import(import),
            ModuleDecl::ExportDecl(export) => self.export_decl(export.decl),
            ModuleDecl::ExportNamed(named) => self.export_named(named),
            ModuleDecl::ExportDefaultDecl(default) => self.export_default_decl(default.decl),
            ModuleDecl::ExportDefaultExpr(default) => self.export_default(*default.expr),
            ModuleDecl::ExportAll(all) => self.export_all(&all.src),
            // TypeScript-only forms never come out of the ES parser.
            _ => {}
        }
    }

    fn import(&mut self, import: ImportDecl) {
        let dep = self.dependency(&import.src);

        if import.specifiers.is_empty() {
            if self.module_type == ModuleType::Cjs {
                let require = convention::dependency_object(self.module_type, &dep);
                self.prologue.push(expr_stmt(require));
            }
            return;
        }

        for specifier in import.specifiers {
            let (local, value) = match specifier {
                ImportSpecifier::Default(s) => {
                    let value = convention::default_import(self.module_type, &dep, &s.local.sym);
                    (s.local, value)
                }
                ImportSpecifier::Named(s) => {
                    let imported = s
                        .imported
                        .as_ref()
                        .map(export_name_text)
                        .unwrap_or_else(|| s.local.sym.to_string());
                    let object = convention::dependency_object(self.module_type, &dep);
                    (s.local, member(object, &imported))
                }
                ImportSpecifier::Namespace(s) => {
                    (s.local, convention::dependency_object(self.module_type, &dep))
                }
            };
            self.prologue
                .push(var_stmt(vec![declarator(Pat::Ident(local.into()), Some(value))]));
        }
    }

    /// `exports.<exported> = <local>;` once the body has run.
    fn export_local(&mut self, exported: &str, local: &str) {
        let target = member_expr(self.exports(), exported);
        self.epilogue
            .push(expr_stmt(assign(target, ident_expr(local))));
    }

    fn export_decl(&mut self, decl: Decl) {
        let names = declared_names(&decl);
        self.body.push(Stmt::Decl(decl));
        for name in names {
            self.export_local(&name, &name);
        }
    }

    fn export_named(&mut self, named: NamedExport) {
        let Some(src) = named.src else {
            for specifier in named.specifiers {
                if let ExportSpecifier::Named(s) = specifier {
                    let local = export_name_text(&s.orig);
                    let exported = match s.exported.as_ref().map(export_name_text) {
                        Some(name) if name == "default" => convention::default_export_key(
                            self.module_type,
                            self.module_id,
                            &ident_expr(&local),
                        ),
                        Some(name) => name,
                        None => local.clone(),
                    };
                    self.export_local(&exported, &local);
                }
            }
            return;
        };

        let dep = self.dependency(&src);
        for specifier in named.specifiers {
            let (exported, value) = match specifier {
                ExportSpecifier::Named(s) => {
                    let orig = export_name_text(&s.orig);
                    let exported = s
                        .exported
                        .as_ref()
                        .map(export_name_text)
                        .unwrap_or_else(|| orig.clone());
                    let object = convention::dependency_object(self.module_type, &dep);
                    (exported, member(object, &orig))
                }
                ExportSpecifier::Namespace(s) => (
                    export_name_text(&s.name),
                    convention::dependency_object(self.module_type, &dep),
                ),
                ExportSpecifier::Default(s) => (
                    s.exported.sym.to_string(),
                    member(convention::dependency_object(self.module_type, &dep), "default"),
                ),
            };
            let target = member_expr(self.exports(), &exported);
            self.prologue.push(expr_stmt(assign(target, value)));
        }
    }

    fn export_default_decl(&mut self, decl: DefaultDecl) {
        match decl {
            DefaultDecl::Fn(FnExpr {
                ident: Some(ident),
                function,
            }) => {
                let name = ident.sym.to_string();
                self.body.push(Stmt::Decl(Decl::Fn(FnDecl {
                    ident,
                    declare: false,
                    function,
                })));
                self.export_default(ident_expr(&name));
            }
            DefaultDecl::Class(ClassExpr {
                ident: Some(ident),
                class,
            }) => {
                let name = ident.sym.to_string();
                self.body.push(Stmt::Decl(Decl::Class(ClassDecl {
                    ident,
                    declare: false,
                    class,
                })));
                self.export_default(ident_expr(&name));
            }
            DefaultDecl::Fn(anonymous) => self.export_default(Expr::Fn(anonymous)),
            DefaultDecl::Class(anonymous) => self.export_default(Expr::Class(anonymous)),
            _ => {}
        }
    }

    /// `exports["default"] = <expr>;` where the export appears.
    fn export_default(&mut self, expr: Expr) {
        let key = convention::default_export_key(self.module_type, self.module_id, &expr);
        let target = member_expr(self.exports(), &key);
        self.body.push(expr_stmt(assign(target, expr)));
    }

    fn export_all(&mut self, src: &Str) {
        let dep = self.dependency(src);
        // Globals already share one mapping.
        if self.module_type == ModuleType::Globals {
            return;
        }
        let source = convention::dependency_object(self.module_type, &dep);
        self.prologue
            .push(own_keys_copy(source, self.exports(), "__key__", Some("default")));
    }
}

/// Names bound by a declaration, in source order.
fn declared_names(decl: &Decl) -> Vec<String> {
    let mut names = Vec::new();
    match decl {
        Decl::Class(class) => names.push(class.ident.sym.to_string()),
        Decl::Fn(function) => names.push(function.ident.sym.to_string()),
        Decl::Var(var) => {
            for d in &var.decls {
                pattern_names(&d.name, &mut names);
            }
        }
        _ => {}
    }
    names
}

fn pattern_names(pat: &Pat, names: &mut Vec<String>) {
    match pat {
        Pat::Ident(binding) => names.push(binding.id.sym.to_string()),
        Pat::Array(array) => {
            for elem in array.elems.iter().flatten() {
                pattern_names(elem, names);
            }
        }
        Pat::Object(object) => {
            for prop in &object.props {
                match prop {
                    ObjectPatProp::KeyValue(kv) => pattern_names(&kv.value, names),
                    ObjectPatProp::Assign(assign) => names.push(assign.key.id.sym.to_string()),
                    ObjectPatProp::Rest(rest) => pattern_names(&rest.arg, names),
                }
            }
        }
        Pat::Rest(rest) => pattern_names(&rest.arg, names),
        Pat::Assign(assign) => pattern_names(&assign.left, names),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUT: &str = "\nimport Bar from \"bar\";\nclass Foo {\n  constructor() {}\n}\nexport default Foo;";

    fn binds(out: &str, name: &str) -> bool {
        out.contains(&format!("var {name} ="))
    }

    fn amd(source: &str) -> String {
        transpile_modules(source, "stdin", "stdin", ModuleType::Amd).unwrap()
    }

    #[test]
    fn amd_registers_under_module_id() {
        let out = amd(INPUT);
        assert!(out.contains("define(\"stdin\""), "{out}");
        assert!(out.contains("[\"bar\",\"exports\"]"), "{out}");
        assert!(out.contains("function(__dependency1__, __exports__)"), "{out}");
        assert!(out.contains("var Bar = __dependency1__[\"default\"];"), "{out}");
        assert!(out.contains("__exports__[\"default\"] = Foo;"), "{out}");
        assert!(out.contains("class Foo"), "{out}");
    }

    #[test]
    fn explicit_module_id_is_used_verbatim() {
        let out = transpile_modules(INPUT, "stdin", "some/dir/my-module", ModuleType::Amd).unwrap();
        assert!(out.contains("define(\"some/dir/my-module\""), "{out}");
    }

    #[test]
    fn cjs_assigns_onto_exports_inside_an_iife() {
        let out = transpile_modules(INPUT, "stdin", "stdin", ModuleType::Cjs).unwrap();
        assert!(out.starts_with("(function() {"), "{out}");
        assert!(out.contains("var Bar = require(\"bar\")[\"default\"];"), "{out}");
        assert!(out.contains("exports[\"default\"] = Foo;"), "{out}");
        assert!(!out.contains("define("), "{out}");
    }

    #[test]
    fn globals_assign_by_name() {
        let out = transpile_modules(INPUT, "stdin", "stdin", ModuleType::Globals).unwrap();
        assert!(out.starts_with("(function(__exports__"), "{out}");
        assert!(out.contains("var Bar = __exports__.Bar;"), "{out}");
        assert!(out.contains("__exports__.Foo = Foo;"), "{out}");
    }

    #[test]
    fn named_and_namespace_imports_bind_locals() {
        let out = amd("import { a, b as c } from \"m\";\nimport * as ns from \"n\";\nimport \"side\";\nuse(a, c, ns);");
        assert!(out.contains("[\"m\",\"n\",\"side\",\"exports\"]"), "{out}");
        assert!(out.contains("var a = __dependency1__.a;"), "{out}");
        assert!(out.contains("var c = __dependency1__.b;"), "{out}");
        assert!(out.contains("var ns = __dependency2__;"), "{out}");
        assert!(binds(&out, "a") && binds(&out, "c") && binds(&out, "ns"));
    }

    #[test]
    fn repeated_sources_share_one_dependency() {
        let out = amd("import a from \"m\";\nimport { b } from \"m\";\nuse(a, b);");
        assert!(out.contains("[\"m\",\"exports\"]"), "{out}");
        assert!(!out.contains("__dependency2__"), "{out}");
    }

    #[test]
    fn exported_declarations_are_assigned_after_the_body() {
        let out = amd("export var x = 1, { y, z: [w] } = o;\nexport function f() {}\nexport class C {}\nrun();");
        let run = out.find("run();").unwrap();
        for assignment in [
            "__exports__.x = x;",
            "__exports__.y = y;",
            "__exports__.w = w;",
            "__exports__.f = f;",
            "__exports__.C = C;",
        ] {
            let at = out.find(assignment).unwrap_or_else(|| panic!("missing {assignment}: {out}"));
            assert!(at > run, "{assignment} should follow the body: {out}");
        }
        assert!(out.contains("function f()"), "{out}");
    }

    #[test]
    fn export_lists_may_precede_their_declarations() {
        let out = amd("export { Foo, helper as util };\nclass Foo {}\nfunction helper() {}");
        let class_at = out.find("class Foo").unwrap();
        let export_at = out.find("__exports__.Foo = Foo;").unwrap();
        assert!(export_at > class_at, "{out}");
        assert!(out.contains("__exports__.util = helper;"), "{out}");
    }

    #[test]
    fn default_function_declaration_keeps_its_name() {
        let out = transpile_modules("export default function main() {}", "a.js", "a", ModuleType::Cjs).unwrap();
        assert!(out.contains("function main()"), "{out}");
        assert!(out.contains("exports[\"default\"] = main;"), "{out}");
    }

    #[test]
    fn anonymous_default_class_is_assigned_directly() {
        let out = amd("export default class {}");
        assert!(out.contains("__exports__[\"default\"] = class"), "{out}");
    }

    #[test]
    fn globals_default_expression_uses_module_id() {
        let out = transpile_modules("export default 42;", "a.js", "app/answer", ModuleType::Globals).unwrap();
        assert!(out.contains("__exports__[\"app/answer\"] = 42;"), "{out}");
    }

    #[test]
    fn re_exports_read_from_the_dependency() {
        let out = amd("export { a as b } from \"m\";\nexport * from \"n\";\nexport * as ns from \"o\";");
        assert!(out.contains("__exports__.b = __dependency1__.a;"), "{out}");
        assert!(out.contains("__key__ in __dependency2__"), "{out}");
        assert!(out.contains("__key__ !== \"default\""), "{out}");
        assert!(out.contains("__exports__.ns = __dependency3__;"), "{out}");
    }

    #[test]
    fn default_in_an_export_list_matches_export_default() {
        let listed = transpile_modules("class X {}\nexport { X as default };", "a.js", "a", ModuleType::Globals).unwrap();
        assert!(listed.contains("__exports__.X = X;"), "{listed}");
        assert!(!listed.contains("\"default\""), "{listed}");

        let listed = amd("class X {}\nexport { X as default };");
        assert!(listed.contains("__exports__[\"default\"] = X;"), "{listed}");
    }

    #[test]
    fn escaped_specifiers_are_decoded() {
        let out = amd("import a from \"lib/\\u0061pp\";\nimport b from 'x\\x2Fy';\nuse(a, b);");
        assert!(out.contains("[\"lib/app\",\"x/y\",\"exports\"]"), "{out}");
    }

    #[test]
    fn cjs_side_effect_import_still_requires() {
        let out = transpile_modules("import \"polyfill\";", "a.js", "a", ModuleType::Cjs).unwrap();
        assert!(out.contains("require(\"polyfill\");"), "{out}");
    }

    #[test]
    fn module_without_imports_or_exports_is_still_wrapped() {
        let out = amd("var a = 1;");
        assert!(out.contains("define(\"stdin\",\n  [\"exports\"],"), "{out}");
        assert!(out.contains("var a = 1;"), "{out}");
    }

    #[test]
    fn invalid_source_is_a_parse_error() {
        let err = transpile_modules("import from;", "bad.js", "bad", ModuleType::Amd).unwrap_err();
        assert!(matches!(err, StageError::Parse(ref e) if e.file == "bad.js"), "{err}");
    }

    #[test]
    fn output_is_deterministic() {
        for module_type in ModuleType::ALL {
            let a = transpile_modules(INPUT, "stdin", "stdin", module_type).unwrap();
            let b = transpile_modules(INPUT, "stdin", "stdin", module_type).unwrap();
            assert_eq!(a, b);
        }
    }
}
