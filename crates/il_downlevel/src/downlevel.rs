use il_ast::EsVersion;
use il_parser::{emit_script, parse_script, StageError};

use crate::pass::PassRegistry;

/// Down-level module-wrapped script text with the canonical passes.
pub fn downlevel(source: &str, file_name: &str) -> Result<String, StageError> {
    downlevel_with(&PassRegistry::canonical(), source, file_name)
}

/// Down-level with an explicit pass list.
///
/// Text with nothing to rewrite comes back unchanged, byte for byte.
pub fn downlevel_with(registry: &PassRegistry, source: &str, file_name: &str) -> Result<String, StageError> {
    let mut parsed = parse_script(source, file_name)?;
    let rewritten = registry.run(&mut parsed.script);
    if rewritten == 0 {
        tracing::debug!(file = file_name, "nothing to down-level");
        return Ok(source.to_string());
    }

    tracing::debug!(file = file_name, rewritten, "down-leveled");
    emit_script(
        &parsed.script,
        &parsed.source_map,
        Some(&parsed.comments),
        EsVersion::Es5,
    )
    .map_err(|source| StageError::Emit {
        file: file_name.to_string(),
        source,
    })
}
