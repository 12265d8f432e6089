//! Template literals become `String.prototype.concat` calls; tagged templates
//! become calls with a frozen strings array carrying a `raw` property.
//!
//! `concat` converts each substitution with ToString, as a template does.
//! `+` would call `valueOf` first.

use std::mem;

use il_ast::builder::{array_lit, call, invalid_expr, member, object_lit, paren, path, str_lit, undefined};
use il_ast::*;
use swc_common::DUMMY_SP;
use swc_ecma_visit::{VisitMut, VisitMutWith};

use crate::pass::DownlevelPass;

pub struct TemplatePass;

impl DownlevelPass for TemplatePass {
    fn name(&self) -> &'static str {
        "template-literals"
    }

    fn rewrite(&self, script: &mut Script) -> usize {
        let mut rewriter = TemplateRewriter { rewritten: 0 };
        script.visit_mut_with(&mut rewriter);
        rewriter.rewritten
    }
}

fn cooked(quasi: &TplElement) -> Option<Expr> {
    quasi.cooked.clone().map(|value| {
        Expr::Lit(Lit::Str(Str {
            span: DUMMY_SP,
            value,
            raw: None,
        }))
    })
}

/// A sequence expression would read as several arguments.
fn argument(expr: Expr) -> Expr {
    match expr {
        Expr::Seq(_) => paren(expr),
        other => other,
    }
}

/// `"a".concat(x, "b")`; a template without substitutions is just its string.
fn concat(tpl: &mut Tpl) -> Expr {
    let mut quasis = tpl.quasis.iter();
    let head = quasis.next().and_then(cooked).unwrap_or_else(|| str_lit(""));
    let exprs = mem::take(&mut tpl.exprs);
    if exprs.is_empty() {
        return head;
    }

    let mut args = Vec::with_capacity(exprs.len() * 2);
    for (expr, quasi) in exprs.into_iter().zip(quasis) {
        args.push(argument(*expr));
        if !quasi.raw.is_empty() {
            if let Some(text) = cooked(quasi) {
                args.push(text);
            }
        }
    }
    call(member(head, "concat"), args)
}

/// `tag(Object.freeze(Object.defineProperty([cooked...], "raw", { value: Object.freeze([raw...]) })), exprs...)`
fn tag_call(tagged: &mut TaggedTpl) -> Expr {
    let tag = mem::replace(&mut *tagged.tag, invalid_expr());
    let tpl = &mut *tagged.tpl;

    // Invalid escapes have no cooked value; the strings array holds `undefined`.
    let cooked_strings = tpl
        .quasis
        .iter()
        .map(|q| cooked(q).unwrap_or_else(undefined))
        .collect();
    let raw_strings = tpl.quasis.iter().map(|q| str_lit(&q.raw)).collect();

    let strings = call(
        path("Object.freeze"),
        vec![call(
            path("Object.defineProperty"),
            vec![
                array_lit(cooked_strings),
                str_lit("raw"),
                object_lit(vec![(
                    "value",
                    call(path("Object.freeze"), vec![array_lit(raw_strings)]),
                )]),
            ],
        )],
    );

    let mut args = vec![strings];
    args.extend(mem::take(&mut tpl.exprs).into_iter().map(|e| *e));
    call(tag, args)
}

struct TemplateRewriter {
    rewritten: usize,
}

impl VisitMut for TemplateRewriter {
    fn visit_mut_expr(&mut self, expr: &mut Expr) {
        expr.visit_mut_children_with(self);

        let lowered = match expr {
            Expr::Tpl(tpl) => concat(tpl),
            Expr::TaggedTpl(tagged) => tag_call(tagged),
            _ => return,
        };
        *expr = lowered;
        self.rewritten += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use il_parser::{emit_script, parse_script};

    fn run(src: &str) -> (String, usize) {
        let mut parsed = parse_script(src, "a.js").unwrap();
        let count = TemplatePass.rewrite(&mut parsed.script);
        let out = emit_script(&parsed.script, &parsed.source_map, None, EsVersion::Es5).unwrap();
        (out, count)
    }

    #[test]
    fn substitutions_become_concatenation() {
        let (out, count) = run("var s = `Hello ${name}!`;");
        assert_eq!(count, 1);
        assert!(out.contains("\"Hello \".concat(name, \"!\")"), "{out}");
    }

    #[test]
    fn plain_template_is_a_string() {
        let (out, _) = run("var s = `plain`;");
        assert!(out.contains("var s = \"plain\";"), "{out}");
    }

    #[test]
    fn substitutions_are_arguments() {
        let (out, _) = run("var s = `${a + b}${c ? 1 : 2}${(d, e)}`;");
        assert!(out.contains("\"\".concat(a + b, c ? 1 : 2, (d, e))"), "{out}");
    }

    #[test]
    fn nested_templates_are_lowered() {
        let (out, count) = run("var s = `a${`b${c}`}`;");
        assert_eq!(count, 2);
        assert!(!out.contains('`'), "{out}");
    }

    #[test]
    fn tagged_template_calls_the_tag() {
        let (out, count) = run("var s = html`<p>${x}</p>`;");
        assert_eq!(count, 1);
        assert!(out.contains("html(Object.freeze(Object.defineProperty(["), "{out}");
        assert!(out.contains("\"raw\""), "{out}");
        assert!(out.contains(", x)"), "{out}");
    }

    #[test]
    fn tagged_raw_strings_keep_escapes() {
        let (out, _) = run("var s = String.raw`a\\nb`;");
        assert!(out.contains("\"a\\\\nb\""), "{out}");
    }
}
