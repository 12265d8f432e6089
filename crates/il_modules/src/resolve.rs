//! Module identifier resolution.
//!
//! Priority: explicit `module_name`, then the file path relative to the base
//! path (`app/models/post`), then the bare file name (`post`).

use std::path::{Component, Path};

use il_ast::{CompileOptions, SourceUnit};

/// Used when a unit carries no usable file name at all.
pub const DEFAULT_MODULE_NAME: &str = "illusionist";

/// Compute the identifier a unit's output registers itself under.
///
/// Never fails and never returns an empty string.
pub fn resolve_module_id(unit: &SourceUnit, options: &CompileOptions) -> String {
    if let Some(name) = options.module_name.as_deref().filter(|n| !n.is_empty()) {
        return name.to_string();
    }

    let file = Path::new(&unit.file_name);
    let base = unit.base_path.as_deref().or(options.base_path.as_deref());
    if let Some(id) = base.and_then(|base| relative_id(file, base)) {
        return id;
    }

    bare_id(&unit.file_name).unwrap_or_else(|| DEFAULT_MODULE_NAME.to_string())
}

fn strip_js(name: &str) -> &str {
    name.strip_suffix(".js").unwrap_or(name)
}

fn relative_id(file: &Path, base: &Path) -> Option<String> {
    let rel = file.strip_prefix(base).unwrap_or(file);
    if rel.has_root() {
        return None;
    }

    let segments: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    let joined = segments.join("/").replace('\\', "/");
    let id = strip_js(&joined);
    (!id.is_empty()).then(|| id.to_string())
}

fn bare_id(file_name: &str) -> Option<String> {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let id = strip_js(base);
    (!id.is_empty()).then(|| id.to_string())
}
