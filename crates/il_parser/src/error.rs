use std::io;

use swc_common::{SourceMap, Spanned};
use thiserror::Error;

/// Source text that is not valid ECMAScript.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{file}:{line}:{column}: {message}")]
pub struct ParseError {
    pub file: String,
    /// 1-based; 0 when the parser reported no position.
    pub line: usize,
    /// 1-based; 0 when the parser reported no position.
    pub column: usize,
    pub message: String,
}

impl ParseError {
    pub(crate) fn from_swc(source_map: &SourceMap, file: &str, err: &swc_ecma_parser::error::Error) -> Self {
        let span = err.span();
        let (line, column) = if span.is_dummy() {
            (0, 0)
        } else {
            let loc = source_map.lookup_char_pos(span.lo);
            (loc.line, loc.col_display + 1)
        };

        Self {
            file: file.to_string(),
            line,
            column,
            message: err.kind().msg().to_string(),
        }
    }
}

/// Failure of one text-to-text stage: parsing its input or printing its output.
#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("failed to emit {file}: {source}")]
    Emit {
        file: String,
        #[source]
        source: io::Error,
    },
}
