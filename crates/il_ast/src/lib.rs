//! Shared vocabulary for the illusionist pipeline.
//!
//! Re-exports the standard SWC AST and adds:
//! - the module conventions the compiler can target (`ModuleType`)
//! - the per-file compilation input (`SourceUnit`)
//! - the per-invocation configuration (`CompileOptions`)
//! - small AST builders shared by the module and down-level stages

pub use swc_ecma_ast::*;

pub mod builder;
pub mod quote;

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Module convention the compiled output is wrapped in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleType {
    /// `define("name", [deps], function (...) { ... })`.
    #[default]
    Amd,
    /// `require(...)` bindings and an `exports` object, inside an IIFE.
    Cjs,
    /// A self-invoking function over a shared `__exports__` mapping.
    Globals,
}

impl ModuleType {
    pub const ALL: [ModuleType; 3] = [ModuleType::Amd, ModuleType::Cjs, ModuleType::Globals];

    pub fn as_str(self) -> &'static str {
        match self {
            ModuleType::Amd => "amd",
            ModuleType::Cjs => "cjs",
            ModuleType::Globals => "globals",
        }
    }
}

impl std::fmt::Display for ModuleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A module type string that names none of the supported conventions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown module type `{0}` (expected one of: amd, cjs, globals)")]
pub struct UnknownModuleType(pub String);

impl FromStr for ModuleType {
    type Err = UnknownModuleType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModuleType::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| UnknownModuleType(s.to_string()))
    }
}

/// One logical compilation input: a file, or standard input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub text: String,
    pub file_name: String,
    /// Root the file name is relative to, when the unit came from a directory walk.
    pub base_path: Option<PathBuf>,
}

impl SourceUnit {
    pub fn new(text: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            file_name: file_name.into(),
            base_path: None,
        }
    }

    /// The synthetic unit used for standard input.
    pub fn stdin(text: impl Into<String>) -> Self {
        Self::new(text, "stdin")
    }

    pub fn with_base_path(mut self, base_path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }
}

/// Per-invocation configuration shared by every unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct CompileOptions {
    /// Explicit module identifier; overrides any path-derived name.
    pub module_name: Option<String>,
    pub module_type: ModuleType,
    /// Root for hierarchical module names.
    pub base_path: Option<PathBuf>,
}

impl CompileOptions {
    pub fn new(module_type: ModuleType) -> Self {
        Self {
            module_type,
            ..Default::default()
        }
    }

    pub fn with_module_name(mut self, name: impl Into<String>) -> Self {
        self.module_name = Some(name.into());
        self
    }

    pub fn with_base_path(mut self, base_path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_type_defaults_to_amd() {
        assert_eq!(ModuleType::default(), ModuleType::Amd);
        assert_eq!(CompileOptions::default().module_type, ModuleType::Amd);
    }

    #[test]
    fn module_type_parses_known_names() {
        assert_eq!("amd".parse::<ModuleType>(), Ok(ModuleType::Amd));
        assert_eq!("cjs".parse::<ModuleType>(), Ok(ModuleType::Cjs));
        assert_eq!("globals".parse::<ModuleType>(), Ok(ModuleType::Globals));
    }

    #[test]
    fn module_type_rejects_unknown_names() {
        let err = "unknown_type".parse::<ModuleType>().unwrap_err();
        assert_eq!(err, UnknownModuleType("unknown_type".to_string()));
        assert!(err.to_string().contains("unknown_type"));
        assert!("AMD".parse::<ModuleType>().is_err());
    }

    #[test]
    fn options_deserialize_from_camel_case_json() {
        let json = r#"{ "moduleName": "app/main", "moduleType": "globals", "basePath": "src" }"#;
        let options: CompileOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.module_name.as_deref(), Some("app/main"));
        assert_eq!(options.module_type, ModuleType::Globals);
        assert_eq!(options.base_path, Some(PathBuf::from("src")));
    }

    #[test]
    fn options_reject_unknown_module_type_in_json() {
        let json = r#"{ "moduleType": "umd" }"#;
        assert!(serde_json::from_str::<CompileOptions>(json).is_err());
    }
}
