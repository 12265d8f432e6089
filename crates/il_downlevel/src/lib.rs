//! Down-leveling passes that rewrite newer syntax into ES5-compatible syntax.
//!
//! Transforms, in canonical order:
//! - `class C extends B {}` → constructor function + prototype assignments
//! - `(a) => this.x`        → `function (a) { return _this.x; }`
//! - `{ a, m() {} }`        → `{ a: a, m: function () {} }`
//! - `function f(a, ...r)`  → `var r = Array.prototype.slice.call(arguments, 1)`
//! - `` `a${b}` ``          → `"a".concat(b)`, tagged templates → tag calls
//!
//! Arrows that use `super`, and arrows in parameter defaults that use `this`
//! or `arguments`, stay arrows: no ES5 function can see those bindings.
//! Anything else is left as written.

pub mod arrow;
pub mod class;
pub mod downlevel;
mod lexical;
mod names;
pub mod pass;
pub mod residue;
pub mod rest;
pub mod shorthand;
pub mod template;

pub use downlevel::{downlevel, downlevel_with};
pub use pass::{DownlevelPass, PassRegistry};
pub use residue::residue;
