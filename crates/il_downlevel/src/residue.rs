//! Detects syntax the canonical passes are meant to remove.

use std::collections::BTreeSet;

use il_ast::{ArrowExpr, Class, Param, Pat, Prop, Script, TaggedTpl, Tpl};
use swc_ecma_visit::{Visit, VisitWith};

#[derive(Default)]
struct ResidueFinder {
    found: BTreeSet<&'static str>,
}

impl Visit for ResidueFinder {
    fn visit_class(&mut self, class: &Class) {
        self.found.insert("class");
        class.visit_children_with(self);
    }

    fn visit_arrow_expr(&mut self, arrow: &ArrowExpr) {
        self.found.insert("arrow function");
        arrow.visit_children_with(self);
    }

    fn visit_tpl(&mut self, tpl: &Tpl) {
        self.found.insert("template literal");
        tpl.visit_children_with(self);
    }

    // The quasi of a tagged template is part of the call, not a literal.
    fn visit_tagged_tpl(&mut self, tagged: &TaggedTpl) {
        self.found.insert("tagged template");
        tagged.tag.visit_with(self);
        tagged.tpl.exprs.visit_with(self);
    }

    fn visit_prop(&mut self, prop: &Prop) {
        match prop {
            Prop::Shorthand(_) => {
                self.found.insert("shorthand property");
            }
            Prop::Method(_) => {
                self.found.insert("shorthand method");
            }
            _ => {}
        }
        prop.visit_children_with(self);
    }

    fn visit_param(&mut self, param: &Param) {
        if matches!(param.pat, Pat::Rest(_)) {
            self.found.insert("rest parameter");
        }
        param.visit_children_with(self);
    }
}

/// Names of the lowered syntax families still present in `script`, sorted.
///
/// Shorthand methods that use `super` are reported too, even though the
/// shorthand pass keeps them on purpose.
pub fn residue(script: &Script) -> Vec<&'static str> {
    let mut finder = ResidueFinder::default();
    script.visit_with(&mut finder);
    finder.found.into_iter().collect()
}
