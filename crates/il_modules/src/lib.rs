//! Module-syntax stage of the illusionist pipeline.
//!
//! - `resolve`: derive the identifier a unit registers itself under
//! - `transpile`: replace `import`/`export` declarations with bindings and
//!   assignments, then wrap the body in the selected module convention

mod convention;
pub mod resolve;
pub mod transpile;

pub use resolve::{resolve_module_id, DEFAULT_MODULE_NAME};
pub use transpile::transpile_modules;
