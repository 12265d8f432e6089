//! Scans for the bindings a body inherits from its enclosing function.
//!
//! Traversal stops at nested functions, accessors and class bodies: each of
//! those binds its own `this`, `arguments` and `super`.

use il_ast::*;
use swc_ecma_visit::{Visit, VisitWith};

#[derive(Default)]
struct Finder {
    context: bool,
    super_ref: bool,
}

impl Visit for Finder {
    fn visit_super(&mut self, _: &Super) {
        self.super_ref = true;
    }

    fn visit_this_expr(&mut self, _: &ThisExpr) {
        self.context = true;
    }

    fn visit_ident(&mut self, ident: &Ident) {
        if &*ident.sym == "arguments" {
            self.context = true;
        }
    }

    fn visit_function(&mut self, _: &Function) {}

    fn visit_getter_prop(&mut self, _: &GetterProp) {}

    fn visit_setter_prop(&mut self, _: &SetterProp) {}

    fn visit_class(&mut self, class: &Class) {
        class.super_class.visit_with(self);
    }
}

fn scan_function(function: &Function) -> Finder {
    let mut finder = Finder::default();
    function.visit_children_with(&mut finder);
    finder
}

fn scan_arrow(arrow: &ArrowExpr) -> Finder {
    let mut finder = Finder::default();
    arrow.visit_children_with(&mut finder);
    finder
}

/// Whether `function` refers to its own `super`.
pub(crate) fn function_uses_super(function: &Function) -> bool {
    scan_function(function).super_ref
}

/// Whether `arrow` refers to the `super` of the function around it.
pub(crate) fn arrow_uses_super(arrow: &ArrowExpr) -> bool {
    scan_arrow(arrow).super_ref
}

/// Whether `arrow` refers to the `this` or `arguments` of the function around it.
pub(crate) fn arrow_uses_context(arrow: &ArrowExpr) -> bool {
    scan_arrow(arrow).context
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_arrow(src: &str) -> ArrowExpr {
        let parsed = il_parser::parse_script(src, "a.js").unwrap();
        let Some(Stmt::Expr(ExprStmt { expr, .. })) = parsed.script.body.into_iter().next() else {
            panic!("expected an expression statement");
        };
        match *expr {
            Expr::Arrow(arrow) => arrow,
            other => panic!("expected an arrow, got {other:?}"),
        }
    }

    #[test]
    fn context_is_found_through_nested_arrows() {
        assert!(arrow_uses_context(&first_arrow("() => () => this.x;")));
        assert!(arrow_uses_context(&first_arrow("(a = arguments[0]) => a;")));
        assert!(!arrow_uses_context(&first_arrow("() => 1;")));
    }

    #[test]
    fn nested_functions_bind_their_own_context() {
        assert!(!arrow_uses_context(&first_arrow("() => function () { return this; };")));
        assert!(!arrow_uses_context(&first_arrow("() => ({ get a() { return arguments; } });")));
    }
}
