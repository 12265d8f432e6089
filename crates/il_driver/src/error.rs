use std::io;
use std::path::PathBuf;

use il_ast::UnknownModuleType;
use il_parser::{ParseError, StageError};
use thiserror::Error;

/// Invalid compiler configuration. Raised before any source is read.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    ModuleType(#[from] UnknownModuleType),
    #[error("failed to read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config file {}: {source}", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Why a unit failed to compile.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    /// The compiler produced something it cannot stand behind: an emitter
    /// failure or output that does not re-parse.
    #[error("internal error in {file}: {message}")]
    Internal { file: String, message: String },
}

impl CompileError {
    pub(crate) fn internal(file: &str, message: impl Into<String>) -> Self {
        CompileError::Internal {
            file: file.to_string(),
            message: message.into(),
        }
    }

    /// For the module stage: bad input is the user's parse error.
    pub(crate) fn from_module_stage(file: &str, err: StageError) -> Self {
        match err {
            StageError::Parse(e) => CompileError::Parse(e),
            StageError::Emit { source, .. } => Self::internal(file, format!("emitting module body: {source}")),
        }
    }

    /// For the down-level stage: its input is our own output, so any
    /// failure there is ours.
    pub(crate) fn from_downlevel_stage(file: &str, err: StageError) -> Self {
        match err {
            StageError::Parse(e) => Self::internal(file, format!("module stage produced unparsable text: {e}")),
            StageError::Emit { source, .. } => Self::internal(file, format!("emitting down-leveled script: {source}")),
        }
    }
}
