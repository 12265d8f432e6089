//! A trailing `...rest` parameter becomes a slice of `arguments`.

use il_ast::builder::{call, declarator, ident_expr, num_lit, path, prepend_after_directives, var_stmt};
use il_ast::*;
use swc_ecma_visit::{VisitMut, VisitMutWith};

use crate::pass::DownlevelPass;

pub struct RestPass;

impl DownlevelPass for RestPass {
    fn name(&self) -> &'static str {
        "rest-parameters"
    }

    fn rewrite(&self, script: &mut Script) -> usize {
        let mut rewriter = RestRewriter { rewritten: 0 };
        script.visit_mut_with(&mut rewriter);
        rewriter.rewritten
    }
}

/// `var <pat> = Array.prototype.slice.call(arguments, <index>);`
fn slice_arguments(pat: Pat, index: usize) -> Stmt {
    let init = call(
        path("Array.prototype.slice.call"),
        vec![ident_expr("arguments"), num_lit(index as f64)],
    );
    var_stmt(vec![declarator(pat, Some(init))])
}

struct RestRewriter {
    rewritten: usize,
}

impl VisitMut for RestRewriter {
    fn visit_mut_function(&mut self, function: &mut Function) {
        function.visit_mut_children_with(self);

        let Some(body) = &mut function.body else {
            return;
        };
        if !matches!(function.params.last(), Some(Param { pat: Pat::Rest(_), .. })) {
            return;
        }
        if let Some(Param {
            pat: Pat::Rest(rest), ..
        }) = function.params.pop()
        {
            let index = function.params.len();
            prepend_after_directives(&mut body.stmts, vec![slice_arguments(*rest.arg, index)]);
            self.rewritten += 1;
        }
    }

    fn visit_mut_constructor(&mut self, ctor: &mut Constructor) {
        ctor.visit_mut_children_with(self);

        let Some(body) = &mut ctor.body else {
            return;
        };
        let is_rest = matches!(
            ctor.params.last(),
            Some(ParamOrTsParamProp::Param(Param { pat: Pat::Rest(_), .. }))
        );
        if !is_rest {
            return;
        }
        if let Some(ParamOrTsParamProp::Param(Param {
            pat: Pat::Rest(rest), ..
        })) = ctor.params.pop()
        {
            let index = ctor.params.len();
            prepend_after_directives(&mut body.stmts, vec![slice_arguments(*rest.arg, index)]);
            self.rewritten += 1;
        }
    }
}
