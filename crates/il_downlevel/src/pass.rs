//! The pass abstraction and the ordered registry the down-leveler runs.

use il_ast::Script;

use crate::arrow::ArrowPass;
use crate::class::ClassPass;
use crate::rest::RestPass;
use crate::shorthand::ShorthandPass;
use crate::template::TemplatePass;

/// One rewrite rule over a single syntax family.
///
/// A pass must leave every construct outside its family untouched.
pub trait DownlevelPass: Send + Sync {
    fn name(&self) -> &'static str;

    /// Rewrite the script in place, returning how many constructs were lowered.
    fn rewrite(&self, script: &mut Script) -> usize;
}

/// An explicit, ordered list of passes.
pub struct PassRegistry {
    passes: Vec<Box<dyn DownlevelPass>>,
}

impl PassRegistry {
    pub fn empty() -> Self {
        Self { passes: Vec::new() }
    }

    /// The order every unit is compiled with.
    ///
    /// Classes come before arrows: `super` inside an arrow is lowered while
    /// the arrow's `this` is still lexical, then the arrow pass captures it.
    pub fn canonical() -> Self {
        Self::empty()
            .with(ClassPass)
            .with(ArrowPass)
            .with(ShorthandPass)
            .with(RestPass)
            .with(TemplatePass)
    }

    pub fn with(mut self, pass: impl DownlevelPass + 'static) -> Self {
        self.passes.push(Box::new(pass));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Run every pass in order; returns the total number of rewrites.
    pub fn run(&self, script: &mut Script) -> usize {
        let mut total = 0;
        for pass in &self.passes {
            let count = pass.rewrite(script);
            tracing::debug!(pass = pass.name(), rewritten = count, "ran down-level pass");
            total += count;
        }
        total
    }
}

impl Default for PassRegistry {
    fn default() -> Self {
        Self::canonical()
    }
}
