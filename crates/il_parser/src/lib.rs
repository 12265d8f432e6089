//! ECMAScript parser and emitter for illusionist.
//!
//! Wraps the standard SWC parser and code generator:
//!
//! - Source units are parsed as modules (they may contain `import`/`export`)
//! - Intermediate text is parsed as scripts (it is already module-wrapped)
//! - Rewritten trees are printed back to text with `swc_ecma_codegen`

pub mod emit;
pub mod error;
pub mod parse;

pub use emit::emit_script;
pub use error::{ParseError, StageError};
pub use parse::{parse_module, parse_script, ParsedModule, ParsedScript};
