//! Arrow functions become function expressions.
//!
//! `this` and `arguments` inside an arrow are redirected to variables the
//! nearest enclosing function declares at the top of its body:
//!
//! ```text
//! function f() { return () => this.x; }
//! // becomes
//! function f() { var _this = this; return function () { return _this.x; }; }
//! ```
//!
//! A parameter default cannot see variables declared in its function's body,
//! so an arrow there that uses `this` or `arguments` is left as an arrow.
//! So is any arrow using `super`.

use std::mem;

use il_ast::builder::{
    binding, block, declarator, fn_expr, ident_expr, invalid_expr, paren, param, prepend_after_directives,
    this_expr, var_stmt,
};
use il_ast::*;
use swc_common::DUMMY_SP;
use swc_ecma_visit::{VisitMut, VisitMutWith};

use crate::lexical::{arrow_uses_context, arrow_uses_super};
use crate::names::NameGen;
use crate::pass::DownlevelPass;

pub struct ArrowPass;

impl DownlevelPass for ArrowPass {
    fn name(&self) -> &'static str {
        "arrow-functions"
    }

    fn rewrite(&self, script: &mut Script) -> usize {
        let mut rewriter = ArrowRewriter {
            names: NameGen::for_script(script),
            scopes: Vec::new(),
            arrow_depth: 0,
            in_params: false,
            rewritten: 0,
        };
        script.visit_mut_with(&mut rewriter);
        rewriter.rewritten
    }
}

/// A `this`-binding scope: the script itself or a non-arrow function.
struct Scope {
    has_arguments: bool,
    this_name: Option<String>,
    arguments_name: Option<String>,
}

struct ArrowRewriter {
    names: NameGen,
    scopes: Vec<Scope>,
    /// Arrows entered since the innermost scope was pushed.
    arrow_depth: usize,
    /// Inside the parameter list of the innermost scope's function.
    in_params: bool,
    rewritten: usize,
}

/// Traversal state of the enclosing scope, restored on leaving a function.
struct Saved {
    arrow_depth: usize,
    in_params: bool,
}

impl ArrowRewriter {
    fn enter(&mut self, has_arguments: bool) -> Saved {
        self.scopes.push(Scope {
            has_arguments,
            this_name: None,
            arguments_name: None,
        });
        Saved {
            arrow_depth: mem::replace(&mut self.arrow_depth, 0),
            in_params: mem::replace(&mut self.in_params, false),
        }
    }

    /// Pop the scope and return the capture declarations it needs.
    fn leave(&mut self, saved: Saved) -> Vec<Stmt> {
        self.arrow_depth = saved.arrow_depth;
        self.in_params = saved.in_params;
        let Some(scope) = self.scopes.pop() else {
            return Vec::new();
        };

        let mut decls = Vec::new();
        if let Some(name) = scope.this_name {
            decls.push(declarator(binding(&name), Some(this_expr())));
        }
        if let Some(name) = scope.arguments_name {
            decls.push(declarator(binding(&name), Some(ident_expr("arguments"))));
        }
        if decls.is_empty() {
            Vec::new()
        } else {
            vec![var_stmt(decls)]
        }
    }

    fn lexical_this(&mut self) -> Expr {
        let Some(scope) = self.scopes.last_mut() else {
            return this_expr();
        };
        let name = scope
            .this_name
            .get_or_insert_with(|| self.names.fresh("_this"))
            .clone();
        ident_expr(&name)
    }

    /// `None` at script level, where `arguments` is not bound.
    fn lexical_arguments(&mut self) -> Option<Expr> {
        let scope = self.scopes.last_mut().filter(|s| s.has_arguments)?;
        let name = scope
            .arguments_name
            .get_or_insert_with(|| self.names.fresh("_arguments"))
            .clone();
        Some(ident_expr(&name))
    }

    fn lower(&mut self, arrow: ArrowExpr) -> Expr {
        self.rewritten += 1;
        let body = match *arrow.body {
            BlockStmtOrExpr::BlockStmt(body) => body,
            BlockStmtOrExpr::Expr(expr) => block(vec![Stmt::Return(ReturnStmt {
                span: DUMMY_SP,
                arg: Some(expr),
            })]),
        };

        fn_expr(Function {
            params: arrow.params.into_iter().map(param).collect(),
            body: Some(body),
            span: arrow.span,
            is_async: arrow.is_async,
            is_generator: arrow.is_generator,
            ..Default::default()
        })
    }

    /// Whether `this` and `arguments` here are redirected to captures.
    fn captures(&self) -> bool {
        self.arrow_depth > 0 && !self.in_params
    }

    fn finish(&mut self, saved: Saved, body: Option<&mut BlockStmt>) {
        let decls = self.leave(saved);
        if let Some(body) = body {
            prepend_after_directives(&mut body.stmts, decls);
        }
    }
}

/// Whether a statement starting with `expr` would be read as a declaration.
fn starts_with_function(expr: &Expr) -> bool {
    match expr {
        Expr::Fn(_) | Expr::Class(_) | Expr::Object(_) => true,
        Expr::Seq(seq) => seq.exprs.first().is_some_and(|e| starts_with_function(e)),
        Expr::Bin(bin) => starts_with_function(&bin.left),
        Expr::Cond(cond) => starts_with_function(&cond.test),
        Expr::Member(m) => starts_with_function(&m.obj),
        Expr::Call(CallExpr {
            callee: Callee::Expr(callee),
            ..
        }) => starts_with_function(callee),
        Expr::TaggedTpl(t) => starts_with_function(&t.tag),
        _ => false,
    }
}

impl VisitMut for ArrowRewriter {
    fn visit_mut_script(&mut self, script: &mut Script) {
        let saved = self.enter(false);
        script.visit_mut_children_with(self);
        let decls = self.leave(saved);
        prepend_after_directives(&mut script.body, decls);
    }

    fn visit_mut_function(&mut self, function: &mut Function) {
        let saved = self.enter(true);
        self.in_params = true;
        function.params.visit_mut_with(self);
        self.in_params = false;
        function.body.visit_mut_with(self);
        self.finish(saved, function.body.as_mut());
    }

    fn visit_mut_constructor(&mut self, ctor: &mut Constructor) {
        ctor.key.visit_mut_with(self);
        let saved = self.enter(true);
        self.in_params = true;
        ctor.params.visit_mut_with(self);
        self.in_params = false;
        ctor.body.visit_mut_with(self);
        self.finish(saved, ctor.body.as_mut());
    }

    fn visit_mut_getter_prop(&mut self, getter: &mut GetterProp) {
        getter.key.visit_mut_with(self);
        let saved = self.enter(true);
        if let Some(body) = &mut getter.body {
            body.visit_mut_with(self);
        }
        self.finish(saved, getter.body.as_mut());
    }

    fn visit_mut_setter_prop(&mut self, setter: &mut SetterProp) {
        setter.key.visit_mut_with(self);
        let saved = self.enter(true);
        self.in_params = true;
        setter.param.as_mut().visit_mut_with(self);
        self.in_params = false;
        setter.body.visit_mut_with(self);
        self.finish(saved, setter.body.as_mut());
    }

    // Field initializers and static blocks of classes that stay as classes
    // have their own `this`; leave them as written.
    fn visit_mut_class_prop(&mut self, _: &mut ClassProp) {}

    fn visit_mut_private_prop(&mut self, _: &mut PrivateProp) {}

    fn visit_mut_static_block(&mut self, _: &mut StaticBlock) {}

    fn visit_mut_prop(&mut self, prop: &mut Prop) {
        let shorthand_arguments = self.captures()
            && matches!(prop, Prop::Shorthand(id) if &*id.sym == "arguments");
        if shorthand_arguments {
            if let Some(value) = self.lexical_arguments() {
                *prop = Prop::KeyValue(KeyValueProp {
                    key: PropName::Ident(IdentName::new("arguments".into(), DUMMY_SP)),
                    value: Box::new(value),
                });
            }
            return;
        }
        prop.visit_mut_children_with(self);
    }

    fn visit_mut_expr(&mut self, expr: &mut Expr) {
        if let Expr::Arrow(arrow) = expr {
            let keep = arrow_uses_super(arrow) || (self.in_params && arrow_uses_context(arrow));
            self.arrow_depth += 1;
            expr.visit_mut_children_with(self);
            self.arrow_depth -= 1;
            if keep {
                return;
            }
            if let Expr::Arrow(arrow) = mem::replace(expr, invalid_expr()) {
                *expr = self.lower(arrow);
            }
            return;
        }

        if self.captures() {
            if matches!(expr, Expr::This(_)) {
                *expr = self.lexical_this();
                return;
            }
            if matches!(expr, Expr::Ident(id) if &*id.sym == "arguments") {
                if let Some(value) = self.lexical_arguments() {
                    *expr = value;
                }
                return;
            }
        }

        expr.visit_mut_children_with(self);
    }

    fn visit_mut_expr_stmt(&mut self, stmt: &mut ExprStmt) {
        stmt.visit_mut_children_with(self);
        if starts_with_function(&stmt.expr) {
            let expr = mem::replace(&mut *stmt.expr, invalid_expr());
            *stmt.expr = paren(expr);
        }
    }
}
