//! `{ a, m() {} }` becomes `{ a: a, m: function () {} }`.
//!
//! Methods that reference `super` keep the method form: a plain function
//! value has no home object to resolve `super` against.

use il_ast::*;
use swc_ecma_visit::{VisitMut, VisitMutWith};

use crate::lexical::function_uses_super;
use crate::pass::DownlevelPass;

pub struct ShorthandPass;

impl DownlevelPass for ShorthandPass {
    fn name(&self) -> &'static str {
        "object-shorthand"
    }

    fn rewrite(&self, script: &mut Script) -> usize {
        let mut rewriter = ShorthandRewriter { rewritten: 0 };
        script.visit_mut_with(&mut rewriter);
        rewriter.rewritten
    }
}

struct ShorthandRewriter {
    rewritten: usize,
}

impl VisitMut for ShorthandRewriter {
    fn visit_mut_prop(&mut self, prop: &mut Prop) {
        prop.visit_mut_children_with(self);

        let lowered = match prop {
            Prop::Shorthand(name) => KeyValueProp {
                key: PropName::Ident(IdentName::new(name.sym.clone(), name.span)),
                value: Box::new(Expr::Ident(name.clone())),
            },
            Prop::Method(method) if !function_uses_super(&method.function) => KeyValueProp {
                key: method.key.clone(),
                value: Box::new(Expr::Fn(FnExpr {
                    ident: None,
                    function: method.function.clone(),
                })),
            },
            _ => return,
        };
        *prop = Prop::KeyValue(lowered);
        self.rewritten += 1;
    }
}
