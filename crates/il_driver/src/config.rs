//! JSON configuration file: `{ "moduleName": ..., "moduleType": ..., "basePath": ... }`.

use std::fs;
use std::path::Path;

use il_ast::CompileOptions;

use crate::error::ConfigError;

/// Read compile options from a JSON file. Missing keys take their defaults;
/// unknown keys and unknown module types are rejected.
pub fn load_options(path: &Path) -> Result<CompileOptions, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let options = serde_json::from_str(&text).map_err(|source| ConfigError::Invalid {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), ?options, "loaded config");
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use il_ast::ModuleType;
    use std::io::Write;

    fn config_file(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_every_key() {
        let file = config_file(r#"{ "moduleName": "lib/x", "moduleType": "globals", "basePath": "src" }"#);
        let options = load_options(file.path()).unwrap();
        assert_eq!(options.module_name.as_deref(), Some("lib/x"));
        assert_eq!(options.module_type, ModuleType::Globals);
        assert_eq!(options.base_path.as_deref(), Some(Path::new("src")));
    }

    #[test]
    fn missing_keys_default() {
        let file = config_file("{}");
        assert_eq!(load_options(file.path()).unwrap(), CompileOptions::default());
    }

    #[test]
    fn unknown_module_type_is_invalid() {
        let file = config_file(r#"{ "moduleType": "unknown_type" }"#);
        let err = load_options(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }), "{err}");
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = load_options(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }), "{err}");
    }
}
