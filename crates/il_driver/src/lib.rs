//! The illusionist pipeline: ES6 source in, ES5 module-wrapped source out.
//!
//! `compile` runs, in order:
//! 1. module id resolution (`il_modules::resolve_module_id`)
//! 2. module syntax → AMD / CommonJS / globals (`il_modules::transpile_modules`)
//! 3. down-leveling of classes, arrows, shorthand, rest and templates (`il_downlevel`)
//! 4. a final re-parse of the output as a classic script

pub mod compile;
pub mod config;
pub mod error;

pub use compile::{compile, compile_batch, compile_with, spawn_compile};
pub use config::load_options;
pub use error::{CompileError, ConfigError};
pub use il_ast::{CompileOptions, ModuleType, SourceUnit, UnknownModuleType};

/// Version of the compiler, as reported by `illusionist -v`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
