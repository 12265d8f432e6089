//! String and identifier helpers for text emitted outside the code generator.

use swc_ecma_ast::{ModuleExportName, Str};

/// Words that cannot be used as bare property names by ES3-era engines.
const RESERVED: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete",
    "do", "else", "enum", "export", "extends", "false", "finally", "for", "function", "if",
    "implements", "import", "in", "instanceof", "interface", "let", "new", "null", "package",
    "private", "protected", "public", "return", "static", "super", "switch", "this", "throw",
    "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

/// Render `value` as a double-quoted JavaScript string literal.
pub fn js_string(value: &str) -> String {
    // JSON strings are JS strings except for the two line separators.
    serde_json::Value::String(value.to_owned())
        .to_string()
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}

/// Whether `name` can be written as `obj.name` rather than `obj["name"]`.
pub fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first == '$' || first == '_' || first.is_alphabetic())
        && chars.all(|c| c == '$' || c == '_' || c.is_alphanumeric())
        && !RESERVED.contains(&name)
}

/// The value of a string literal with its escapes decoded.
///
/// Lone surrogates cannot appear in a module specifier; they are replaced.
pub fn str_text(lit: &Str) -> String {
    lit.value.to_string_lossy().into_owned()
}

/// The name an import/export specifier refers to.
pub fn export_name_text(name: &ModuleExportName) -> String {
    match name {
        ModuleExportName::Ident(ident) => ident.sym.to_string(),
        ModuleExportName::Str(lit) => str_text(lit),
        #[allow(unreachable_patterns)]
        _ => String::new(),
    }
}
