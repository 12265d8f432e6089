//! Fresh helper names (`_this`, `_super`, ...) that cannot capture user bindings.

use std::collections::HashSet;

use il_ast::{Ident, Script};
use swc_ecma_visit::{Visit, VisitWith};

#[derive(Default)]
struct IdentCollector {
    names: HashSet<String>,
}

impl Visit for IdentCollector {
    fn visit_ident(&mut self, ident: &Ident) {
        self.names.insert(ident.sym.to_string());
    }
}

pub(crate) struct NameGen {
    taken: HashSet<String>,
}

impl NameGen {
    /// Reserve every identifier already used anywhere in `script`.
    pub(crate) fn for_script(script: &Script) -> Self {
        let mut collector = IdentCollector::default();
        script.visit_with(&mut collector);
        Self {
            taken: collector.names,
        }
    }

    /// `base`, or `base1`, `base2`, ... if taken.
    pub(crate) fn fresh(&mut self, base: &str) -> String {
        let mut candidate = base.to_string();
        let mut n = 0;
        while self.taken.contains(&candidate) {
            n += 1;
            candidate = format!("{base}{n}");
        }
        self.taken.insert(candidate.clone());
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_names_skip_existing_identifiers() {
        let parsed = il_parser::parse_script("var _this = 1, _this1 = 2;", "a.js").unwrap();
        let mut names = NameGen::for_script(&parsed.script);
        assert_eq!(names.fresh("_this"), "_this2");
        assert_eq!(names.fresh("_this"), "_this3");
        assert_eq!(names.fresh("_super"), "_super");
    }
}
