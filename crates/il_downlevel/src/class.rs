//! Classes become constructor functions wired up inside an IIFE.
//!
//! ```text
//! class Post extends Model { constructor(a) { super(a); } save() {} }
//! // becomes
//! var Post = (function (_super) {
//!     "use strict";
//!     function Post(a) { _super.call(this, a); }
//!     if (_super !== null) { if (Object.setPrototypeOf) Object.setPrototypeOf(Post, _super); else Post.__proto__ = _super; }
//!     Post.prototype = Object.create(_super === null ? null : _super.prototype, {...});
//!     Post.prototype.save = function () {};
//!     return Post;
//! })(Model);
//! ```
//!
//! Classes using private names, static blocks, accessor fields or
//! decorators are left as written.

use std::mem;

use il_ast::builder::{
    arg, array_lit_with, assign, bin, binding, block_stmt, bool_lit, call, call_with, declarator, empty_stmt,
    expr_stmt, fn_decl, fn_expr, function, ident_expr, if_stmt, invalid_expr, is_directive, member,
    member_expr, null_lit, object_lit, param, paren, path, return_stmt, str_lit, this_expr, undefined,
    use_strict, var_stmt,
};
use il_ast::*;
use swc_common::DUMMY_SP;
use swc_ecma_visit::{VisitMut, VisitMutWith};

use crate::names::NameGen;
use crate::pass::DownlevelPass;

pub struct ClassPass;

impl DownlevelPass for ClassPass {
    fn name(&self) -> &'static str {
        "classes"
    }

    fn rewrite(&self, script: &mut Script) -> usize {
        let mut rewriter = ClassRewriter {
            names: NameGen::for_script(script),
            rewritten: 0,
        };
        script.visit_mut_with(&mut rewriter);
        rewriter.rewritten
    }
}

fn is_lowerable(class: &Class) -> bool {
    class.decorators.is_empty()
        && class.body.iter().all(|member| match member {
            ClassMember::Constructor(ctor) => ctor
                .params
                .iter()
                .all(|p| matches!(p, ParamOrTsParamProp::Param(_))),
            ClassMember::Method(_) | ClassMember::ClassProp(_) | ClassMember::Empty(_) => true,
            _ => false,
        })
}

fn is_super_call(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Expr(ExprStmt { expr, .. }) => matches!(
            &**expr,
            Expr::Call(CallExpr {
                callee: Callee::Super(_),
                ..
            })
        ),
        _ => false,
    }
}

fn key_as_member(key: PropName) -> MemberProp {
    let computed = |expr: Expr| {
        MemberProp::Computed(ComputedPropName {
            span: DUMMY_SP,
            expr: Box::new(expr),
        })
    };
    match key {
        PropName::Ident(name) => MemberProp::Ident(name),
        PropName::Str(s) => computed(Expr::Lit(Lit::Str(s))),
        PropName::Num(n) => computed(Expr::Lit(Lit::Num(n))),
        PropName::BigInt(b) => computed(Expr::Lit(Lit::BigInt(b))),
        PropName::Computed(c) => MemberProp::Computed(c),
    }
}

fn key_as_expr(key: PropName) -> Expr {
    match key {
        PropName::Ident(name) => str_lit(&name.sym),
        PropName::Str(s) => Expr::Lit(Lit::Str(s)),
        PropName::Num(n) => Expr::Lit(Lit::Num(n)),
        PropName::BigInt(b) => Expr::Lit(Lit::BigInt(b)),
        PropName::Computed(c) => *c.expr,
    }
}

/// The constructor chained to the parent for static lookups, then a
/// prototype chained to the parent's (or to `null` for `extends null`).
fn inherit(class_name: &str, super_name: &str) -> Vec<Stmt> {
    let class = ident_expr(class_name);
    let parent = ident_expr(super_name);

    let proto = Expr::Cond(CondExpr {
        span: DUMMY_SP,
        test: Box::new(bin(BinaryOp::EqEqEq, parent.clone(), null_lit())),
        cons: Box::new(null_lit()),
        alt: Box::new(member(parent.clone(), "prototype")),
    });
    let descriptors = object_lit(vec![(
        "constructor",
        object_lit(vec![
            ("value", class.clone()),
            ("enumerable", bool_lit(false)),
            ("writable", bool_lit(true)),
            ("configurable", bool_lit(true)),
        ]),
    )]);

    let link = if_stmt(
        path("Object.setPrototypeOf"),
        expr_stmt(call(path("Object.setPrototypeOf"), vec![class.clone(), parent.clone()])),
        Some(expr_stmt(assign(member_expr(class.clone(), "__proto__"), parent.clone()))),
    );

    vec![
        if_stmt(
            bin(BinaryOp::NotEqEq, parent.clone(), null_lit()),
            block_stmt(vec![link]),
            None,
        ),
        expr_stmt(assign(
            member_expr(class, "prototype"),
            call(path("Object.create"), vec![proto, descriptors]),
        )),
    ]
}

/// Rewrites `super` inside one member body.
///
/// Nested functions, accessors and classes bind their own `super`, so
/// traversal stops at them; arrows share the member's.
struct SuperRewriter {
    /// `_super`, or `Object` for a class without a heritage clause.
    parent: Expr,
    is_static: bool,
    /// Replaces `this` in static field initializers, which run with the
    /// class as receiver.
    receiver: Option<Expr>,
}

impl SuperRewriter {
    fn new(parent: &Expr, is_static: bool) -> Self {
        SuperRewriter {
            parent: parent.clone(),
            is_static,
            receiver: None,
        }
    }

    fn receiver(&self) -> Expr {
        self.receiver.clone().unwrap_or_else(this_expr)
    }

    fn home(&self, prop: &SuperProp) -> Expr {
        let obj = if self.is_static {
            self.parent.clone()
        } else {
            member(self.parent.clone(), "prototype")
        };
        Expr::Member(MemberExpr {
            span: DUMMY_SP,
            obj: Box::new(obj),
            prop: super_member_prop(prop),
        })
    }

    /// `super.x = v` stores on the receiver; compound forms read through
    /// the parent first.
    fn lower_assign(&mut self, op: AssignOp, mut prop: SuperProp, value: Expr) -> Expr {
        prop.visit_mut_with(self);
        let target = MemberExpr {
            span: DUMMY_SP,
            obj: Box::new(self.receiver()),
            prop: super_member_prop(&prop),
        };
        match op.to_update() {
            None => assign(target, value),
            Some(logical) if op.may_short_circuit() => bin(logical, self.home(&prop), paren(assign(target, value))),
            Some(arith) => assign(target, bin(arith, self.home(&prop), paren(value))),
        }
    }

    fn lower_call(&mut self, call: &mut CallExpr) -> Option<Expr> {
        let target = match &call.callee {
            Callee::Super(_) => self.parent.clone(),
            Callee::Expr(callee) => match &**callee {
                Expr::SuperProp(sp) => self.home(&sp.prop),
                _ => return None,
            },
            Callee::Import(_) => return None,
        };

        for a in &mut call.args {
            a.visit_mut_with(self);
        }
        Some(call_on(target, self.receiver(), mem::take(&mut call.args)))
    }
}

fn super_member_prop(prop: &SuperProp) -> MemberProp {
    match prop {
        SuperProp::Ident(name) => MemberProp::Ident(name.clone()),
        SuperProp::Computed(c) => MemberProp::Computed(c.clone()),
    }
}

/// `f.call(receiver, args...)`, or `f.apply(receiver, [args...])` when any argument spreads.
fn call_on(func: Expr, receiver: Expr, args: Vec<ExprOrSpread>) -> Expr {
    if args.iter().any(|a| a.spread.is_some()) {
        return call(member(func, "apply"), vec![receiver, array_lit_with(args)]);
    }
    let mut all = vec![arg(receiver)];
    all.extend(args);
    call_with(member(func, "call"), all)
}

impl VisitMut for SuperRewriter {
    fn visit_mut_function(&mut self, _: &mut Function) {}

    fn visit_mut_getter_prop(&mut self, _: &mut GetterProp) {}

    fn visit_mut_setter_prop(&mut self, _: &mut SetterProp) {}

    fn visit_mut_class(&mut self, _: &mut Class) {}

    fn visit_mut_expr(&mut self, expr: &mut Expr) {
        if let Expr::Call(call) = expr {
            if let Some(lowered) = self.lower_call(call) {
                *expr = lowered;
                return;
            }
        }

        if let Expr::Assign(AssignExpr {
            op,
            left: AssignTarget::Simple(SimpleAssignTarget::SuperProp(target)),
            right,
            ..
        }) = expr
        {
            let (op, prop) = (*op, target.prop.clone());
            let mut value = mem::replace(&mut **right, invalid_expr());
            value.visit_mut_with(self);
            *expr = self.lower_assign(op, prop, value);
            return;
        }

        if matches!(expr, Expr::This(_)) {
            if let Some(receiver) = &self.receiver {
                *expr = receiver.clone();
                return;
            }
        }

        expr.visit_mut_children_with(self);

        if let Expr::SuperProp(sp) = expr {
            let home = self.home(&sp.prop);
            *expr = home;
        }
    }
}

struct ClassRewriter {
    names: NameGen,
    rewritten: usize,
}

impl ClassRewriter {
    /// The IIFE expression that evaluates to the constructor named `name`.
    fn lower(&mut self, name: &str, class: Class) -> Expr {
        self.rewritten += 1;
        let Class {
            body, super_class, ..
        } = class;

        let super_name = super_class.as_ref().map(|_| self.names.fresh("_super"));
        let parent = match &super_name {
            Some(n) => ident_expr(n),
            None => ident_expr("Object"),
        };

        let mut ctor = None;
        let mut methods = Vec::new();
        let mut fields = Vec::new();
        let mut static_fields = Vec::new();
        for member in body {
            match member {
                ClassMember::Constructor(c) => ctor = Some(c),
                ClassMember::Method(m) => methods.push(m),
                ClassMember::ClassProp(p) if p.is_static => static_fields.push(p),
                ClassMember::ClassProp(p) => fields.push(p),
                _ => {}
            }
        }

        let mut stmts = vec![use_strict()];
        stmts.push(fn_decl(
            name,
            constructor(ctor, super_name.is_some(), &parent, fields),
        ));
        if let Some(super_name) = &super_name {
            stmts.extend(inherit(name, super_name));
        }
        for method in methods {
            stmts.push(define_method(name, &parent, method));
        }
        for field in static_fields {
            let mut value = field.value.map(|v| *v).unwrap_or_else(undefined);
            value.visit_mut_with(&mut SuperRewriter {
                receiver: Some(ident_expr(name)),
                ..SuperRewriter::new(&parent, true)
            });
            let target = MemberExpr {
                span: DUMMY_SP,
                obj: Box::new(ident_expr(name)),
                prop: key_as_member(field.key),
            };
            stmts.push(expr_stmt(assign(target, value)));
        }
        stmts.push(return_stmt(ident_expr(name)));

        let params = super_name.iter().map(|n| param(binding(n))).collect();
        let args = super_class.into_iter().map(|e| *e).collect();
        call(paren(fn_expr(function(params, stmts))), args)
    }
}

fn constructor(ctor: Option<Constructor>, derived: bool, parent: &Expr, fields: Vec<ClassProp>) -> Function {
    let implicit_super = ctor.is_none() && derived;
    let (params, mut stmts) = match ctor {
        Some(ctor) => (
            ctor.params
                .into_iter()
                .filter_map(|p| match p {
                    ParamOrTsParamProp::Param(p) => Some(p),
                    ParamOrTsParamProp::TsParamProp(_) => None,
                })
                .collect(),
            ctor.body.map(|b| b.stmts).unwrap_or_default(),
        ),
        None if derived => (
            Vec::new(),
            vec![expr_stmt(call(
                member(parent.clone(), "apply"),
                vec![this_expr(), ident_expr("arguments")],
            ))],
        ),
        None => (Vec::new(), Vec::new()),
    };

    if !fields.is_empty() {
        let at = match stmts.iter().position(is_super_call) {
            _ if implicit_super => 1,
            Some(i) => i + 1,
            None => stmts.iter().take_while(|s| is_directive(s)).count(),
        };
        let inits = fields.into_iter().map(|field| {
            let target = MemberExpr {
                span: DUMMY_SP,
                obj: Box::new(this_expr()),
                prop: key_as_member(field.key),
            };
            expr_stmt(assign(target, field.value.map(|v| *v).unwrap_or_else(undefined)))
        });
        stmts.splice(at..at, inits);
    }

    let mut func = function(params, stmts);
    let mut supers = SuperRewriter::new(parent, false);
    for p in &mut func.params {
        p.visit_mut_with(&mut supers);
    }
    if let Some(body) = &mut func.body {
        body.visit_mut_with(&mut supers);
    }
    func
}

fn define_method(class_name: &str, parent: &Expr, method: ClassMethod) -> Stmt {
    let ClassMethod {
        key,
        function: func,
        kind,
        is_static,
        ..
    } = method;

    let mut func = *func;
    let mut supers = SuperRewriter::new(parent, is_static);
    for p in &mut func.params {
        p.visit_mut_with(&mut supers);
    }
    if let Some(body) = &mut func.body {
        body.visit_mut_with(&mut supers);
    }

    let target = if is_static {
        ident_expr(class_name)
    } else {
        member(ident_expr(class_name), "prototype")
    };

    let slot = match kind {
        MethodKind::Method => {
            let target = MemberExpr {
                span: DUMMY_SP,
                obj: Box::new(target),
                prop: key_as_member(key),
            };
            return expr_stmt(assign(target, fn_expr(func)));
        }
        MethodKind::Getter => "get",
        MethodKind::Setter => "set",
    };
    expr_stmt(call(
        path("Object.defineProperty"),
        vec![
            target,
            key_as_expr(key),
            object_lit(vec![(slot, fn_expr(func)), ("configurable", bool_lit(true))]),
        ],
    ))
}

impl VisitMut for ClassRewriter {
    fn visit_mut_stmt(&mut self, stmt: &mut Stmt) {
        stmt.visit_mut_children_with(self);

        let lowerable = matches!(stmt, Stmt::Decl(Decl::Class(decl)) if is_lowerable(&decl.class));
        if !lowerable {
            return;
        }
        if let Stmt::Decl(Decl::Class(decl)) = mem::replace(stmt, empty_stmt()) {
            let name = decl.ident.sym.to_string();
            let init = self.lower(&name, *decl.class);
            *stmt = var_stmt(vec![declarator(binding(&name), Some(init))]);
        }
    }

    fn visit_mut_expr(&mut self, expr: &mut Expr) {
        expr.visit_mut_children_with(self);

        let lowerable = matches!(expr, Expr::Class(c) if is_lowerable(&c.class));
        if !lowerable {
            return;
        }
        if let Expr::Class(ClassExpr { ident: name, class }) = mem::replace(expr, invalid_expr()) {
            let name = match name {
                Some(name) => name.sym.to_string(),
                None => self.names.fresh("_class"),
            };
            *expr = self.lower(&name, *class);
        }
    }
}
