//! Constructors for the handful of AST shapes the compiler synthesizes.
//!
//! Every node is built with `DUMMY_SP`; generated code has no source position.

use swc_common::DUMMY_SP;
use swc_ecma_ast::*;

use crate::quote::is_plain_identifier;

pub fn ident(name: &str) -> Ident {
    Ident::new_no_ctxt(name.into(), DUMMY_SP)
}

pub fn ident_expr(name: &str) -> Expr {
    Expr::Ident(ident(name))
}

pub fn this_expr() -> Expr {
    Expr::This(ThisExpr { span: DUMMY_SP })
}

pub fn str_lit(value: &str) -> Expr {
    Expr::Lit(Lit::Str(Str {
        span: DUMMY_SP,
        value: value.into(),
        raw: None,
    }))
}

pub fn num_lit(value: f64) -> Expr {
    Expr::Lit(Lit::Num(Number {
        span: DUMMY_SP,
        value,
        raw: None,
    }))
}

pub fn bool_lit(value: bool) -> Expr {
    Expr::Lit(Lit::Bool(Bool {
        span: DUMMY_SP,
        value,
    }))
}

pub fn null_lit() -> Expr {
    Expr::Lit(Lit::Null(Null { span: DUMMY_SP }))
}

/// `void 0`
pub fn undefined() -> Expr {
    Expr::Unary(UnaryExpr {
        span: DUMMY_SP,
        op: UnaryOp::Void,
        arg: Box::new(num_lit(0.0)),
    })
}

pub fn paren(expr: Expr) -> Expr {
    Expr::Paren(ParenExpr {
        span: DUMMY_SP,
        expr: Box::new(expr),
    })
}

pub fn bin(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Bin(BinExpr {
        span: DUMMY_SP,
        op,
        left: Box::new(left),
        right: Box::new(right),
    })
}

/// `obj.prop`, or `obj["prop"]` when `prop` is not a plain identifier.
pub fn member_expr(obj: Expr, prop: &str) -> MemberExpr {
    if is_plain_identifier(prop) {
        MemberExpr {
            span: DUMMY_SP,
            obj: Box::new(obj),
            prop: MemberProp::Ident(IdentName::new(prop.into(), DUMMY_SP)),
        }
    } else {
        computed_member_expr(obj, str_lit(prop))
    }
}

/// `obj[prop]`
pub fn computed_member_expr(obj: Expr, prop: Expr) -> MemberExpr {
    MemberExpr {
        span: DUMMY_SP,
        obj: Box::new(obj),
        prop: MemberProp::Computed(ComputedPropName {
            span: DUMMY_SP,
            expr: Box::new(prop),
        }),
    }
}

pub fn member(obj: Expr, prop: &str) -> Expr {
    Expr::Member(member_expr(obj, prop))
}

/// A dotted access path such as `Array.prototype.slice.call`.
pub fn path(dotted: &str) -> Expr {
    let mut segments = dotted.split('.');
    let root = ident_expr(segments.next().unwrap_or_default());
    segments.fold(root, member)
}

pub fn arg(expr: Expr) -> ExprOrSpread {
    ExprOrSpread {
        spread: None,
        expr: Box::new(expr),
    }
}

pub fn call(callee: Expr, args: Vec<Expr>) -> Expr {
    call_with(callee, args.into_iter().map(arg).collect())
}

pub fn call_with(callee: Expr, args: Vec<ExprOrSpread>) -> Expr {
    Expr::Call(CallExpr {
        span: DUMMY_SP,
        callee: Callee::Expr(Box::new(callee)),
        args,
        ..Default::default()
    })
}

/// `target = value`
pub fn assign(target: MemberExpr, value: Expr) -> Expr {
    Expr::Assign(AssignExpr {
        span: DUMMY_SP,
        op: AssignOp::Assign,
        left: AssignTarget::Simple(SimpleAssignTarget::Member(target)),
        right: Box::new(value),
    })
}

pub fn expr_stmt(expr: Expr) -> Stmt {
    Stmt::Expr(ExprStmt {
        span: DUMMY_SP,
        expr: Box::new(expr),
    })
}

pub fn return_stmt(expr: Expr) -> Stmt {
    Stmt::Return(ReturnStmt {
        span: DUMMY_SP,
        arg: Some(Box::new(expr)),
    })
}

pub fn binding(name: &str) -> Pat {
    Pat::Ident(BindingIdent {
        id: ident(name),
        type_ann: None,
    })
}

pub fn declarator(name: Pat, init: Option<Expr>) -> VarDeclarator {
    VarDeclarator {
        span: DUMMY_SP,
        name,
        init: init.map(Box::new),
        definite: false,
    }
}

pub fn var_decl(decls: Vec<VarDeclarator>) -> VarDecl {
    VarDecl {
        kind: VarDeclKind::Var,
        decls,
        ..Default::default()
    }
}

pub fn var_stmt(decls: Vec<VarDeclarator>) -> Stmt {
    Stmt::Decl(Decl::Var(Box::new(var_decl(decls))))
}

pub fn param(pat: Pat) -> Param {
    Param {
        span: DUMMY_SP,
        decorators: Vec::new(),
        pat,
    }
}

pub fn block(stmts: Vec<Stmt>) -> BlockStmt {
    BlockStmt {
        stmts,
        ..Default::default()
    }
}

pub fn function(params: Vec<Param>, stmts: Vec<Stmt>) -> Function {
    Function {
        params,
        body: Some(block(stmts)),
        ..Default::default()
    }
}

pub fn fn_expr(function: Function) -> Expr {
    Expr::Fn(FnExpr {
        ident: None,
        function: Box::new(function),
    })
}

/// `function name(...) { ... }` as a statement.
pub fn fn_decl(name: &str, function: Function) -> Stmt {
    Stmt::Decl(Decl::Fn(FnDecl {
        ident: ident(name),
        declare: false,
        function: Box::new(function),
    }))
}

pub fn key_value(key: PropName, value: Expr) -> PropOrSpread {
    PropOrSpread::Prop(Box::new(Prop::KeyValue(KeyValueProp {
        key,
        value: Box::new(value),
    })))
}

/// An object literal with plain identifier keys.
pub fn object_lit(props: Vec<(&str, Expr)>) -> Expr {
    Expr::Object(ObjectLit {
        span: DUMMY_SP,
        props: props
            .into_iter()
            .map(|(key, value)| key_value(PropName::Ident(IdentName::new(key.into(), DUMMY_SP)), value))
            .collect(),
    })
}

pub fn array_lit(elems: Vec<Expr>) -> Expr {
    array_lit_with(elems.into_iter().map(arg).collect())
}

pub fn array_lit_with(elems: Vec<ExprOrSpread>) -> Expr {
    Expr::Array(ArrayLit {
        span: DUMMY_SP,
        elems: elems.into_iter().map(Some).collect(),
    })
}

/// Copy every own enumerable property of `source` onto `target`:
///
/// ```js
/// for (var key in source) if (Object.prototype.hasOwnProperty.call(source, key)) target[key] = source[key];
/// ```
///
/// With `skip`, keys equal to it are left out.
pub fn own_keys_copy(source: Expr, target: Expr, key: &str, skip: Option<&str>) -> Stmt {
    let owns = call(
        path("Object.prototype.hasOwnProperty.call"),
        vec![source.clone(), ident_expr(key)],
    );
    let test = match skip {
        Some(skip) => bin(
            BinaryOp::LogicalAnd,
            bin(BinaryOp::NotEqEq, ident_expr(key), str_lit(skip)),
            owns,
        ),
        None => owns,
    };
    let copy = expr_stmt(assign(
        computed_member_expr(target, ident_expr(key)),
        Expr::Member(computed_member_expr(source.clone(), ident_expr(key))),
    ));

    Stmt::ForIn(ForInStmt {
        span: DUMMY_SP,
        left: ForHead::VarDecl(Box::new(var_decl(vec![declarator(binding(key), None)]))),
        right: Box::new(source),
        body: Box::new(if_stmt(test, copy, None)),
    })
}

pub fn if_stmt(test: Expr, cons: Stmt, alt: Option<Stmt>) -> Stmt {
    Stmt::If(IfStmt {
        span: DUMMY_SP,
        test: Box::new(test),
        cons: Box::new(cons),
        alt: alt.map(Box::new),
    })
}

pub fn block_stmt(stmts: Vec<Stmt>) -> Stmt {
    Stmt::Block(block(stmts))
}

pub fn empty_stmt() -> Stmt {
    Stmt::Empty(EmptyStmt { span: DUMMY_SP })
}

/// Placeholder left behind while a node is moved out and rebuilt.
pub fn invalid_expr() -> Expr {
    Expr::Invalid(Invalid { span: DUMMY_SP })
}

/// Whether `stmt` is part of a directive prologue (`"use strict";`).
pub fn is_directive(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Expr(ExprStmt { expr, .. }) => matches!(&**expr, Expr::Lit(Lit::Str(_))),
        _ => false,
    }
}

/// Insert `new` at the top of a body, after its directive prologue.
pub fn prepend_after_directives(stmts: &mut Vec<Stmt>, new: Vec<Stmt>) {
    let at = stmts.iter().take_while(|s| is_directive(s)).count();
    stmts.splice(at..at, new);
}

/// `"use strict";`
pub fn use_strict() -> Stmt {
    expr_stmt(str_lit("use strict"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_builds_nested_members() {
        let expr = path("Array.prototype.slice");
        let Expr::Member(outer) = expr else {
            panic!("expected member expression");
        };
        assert!(matches!(outer.prop, MemberProp::Ident(ref p) if &*p.sym == "slice"));
        assert!(matches!(*outer.obj, Expr::Member(_)));
    }

    #[test]
    fn member_falls_back_to_computed_for_reserved_words() {
        let expr = member_expr(ident_expr("exports"), "default");
        assert!(matches!(expr.prop, MemberProp::Computed(_)));
        let expr = member_expr(ident_expr("exports"), "Foo");
        assert!(matches!(expr.prop, MemberProp::Ident(_)));
    }

    #[test]
    fn prepend_keeps_directive_prologue_first() {
        let mut stmts = vec![use_strict(), expr_stmt(ident_expr("a"))];
        let capture = var_stmt(vec![declarator(binding("_this"), Some(this_expr()))]);
        prepend_after_directives(&mut stmts, vec![capture]);
        assert!(is_directive(&stmts[0]));
        assert!(matches!(stmts[1], Stmt::Decl(Decl::Var(_))));
        assert_eq!(stmts.len(), 3);
    }
}
