use std::sync::mpsc;
use std::thread;

use il_ast::{CompileOptions, SourceUnit};
use il_downlevel::downlevel;
use il_modules::{resolve_module_id, transpile_modules};
use il_parser::parse_script;
use rayon::prelude::*;

use crate::error::CompileError;

/// Compile one unit to ES5 in the configured module convention.
pub fn compile(unit: &SourceUnit, options: &CompileOptions) -> Result<String, CompileError> {
    let file = unit.file_name.as_str();
    let module_id = resolve_module_id(unit, options);
    let span = tracing::debug_span!("compile", file, module = %module_id);
    let _guard = span.enter();

    let wrapped = transpile_modules(&unit.text, file, &module_id, options.module_type)
        .map_err(|e| CompileError::from_module_stage(file, e))?;
    tracing::trace!(bytes = wrapped.len(), "module stage done");

    let lowered = downlevel(&wrapped, file).map_err(|e| CompileError::from_downlevel_stage(file, e))?;
    tracing::trace!(bytes = lowered.len(), "down-level stage done");

    parse_script(&lowered, file)
        .map_err(|e| CompileError::internal(file, format!("output does not parse as a script: {e}")))?;

    tracing::debug!(bytes = lowered.len(), "compiled");
    Ok(lowered)
}

/// Compile and hand the result to `completion`, which runs exactly once.
pub fn compile_with<F>(unit: &SourceUnit, options: &CompileOptions, completion: F)
where
    F: FnOnce(Result<String, CompileError>),
{
    completion(compile(unit, options))
}

/// Compile on a worker thread; the result arrives on the returned channel.
pub fn spawn_compile(unit: SourceUnit, options: CompileOptions) -> mpsc::Receiver<Result<String, CompileError>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        // The caller may have dropped the receiver; nothing to report to then.
        let _ = tx.send(compile(&unit, &options));
    });
    rx
}

/// Compile many units in parallel. Results are in input order and one unit's
/// failure does not affect the others.
pub fn compile_batch(units: &[SourceUnit], options: &CompileOptions) -> Vec<Result<String, CompileError>> {
    units.par_iter().map(|unit| compile(unit, options)).collect()
}
