use swc_common::{comments::SingleThreadedComments, sync::Lrc, FileName, SourceFile, SourceMap};
use swc_ecma_ast::{EsVersion, Module, Script};
use swc_ecma_parser::{EsSyntax, Syntax};

use crate::error::ParseError;

/// Result of parsing a source unit as an ES module.
pub struct ParsedModule {
    pub module: Module,
    pub comments: SingleThreadedComments,
    pub source_map: Lrc<SourceMap>,
}

/// Result of parsing module-wrapped text as a classic script.
pub struct ParsedScript {
    pub script: Script,
    pub comments: SingleThreadedComments,
    pub source_map: Lrc<SourceMap>,
}

fn syntax() -> Syntax {
    Syntax::Es(EsSyntax {
        jsx: false,
        ..Default::default()
    })
}

fn load(source: &str, filename: &str) -> (Lrc<SourceMap>, Lrc<SourceFile>) {
    let source_map: Lrc<SourceMap> = Default::default();
    let source_file = source_map.new_source_file(
        Lrc::new(FileName::Custom(filename.to_string())),
        source.to_string(),
    );
    (source_map, source_file)
}

/// Parse an ECMAScript source string as a module.
///
/// Errors the parser recovered from are still reported: a unit that only
/// parses with recovery is not valid input.
pub fn parse_module(source: &str, filename: &str) -> Result<ParsedModule, ParseError> {
    let (source_map, source_file) = load(source, filename);
    let comments = SingleThreadedComments::default();
    let mut recovered = vec![];

    let module = swc_ecma_parser::parse_file_as_module(
        &source_file,
        syntax(),
        EsVersion::latest(),
        Some(&comments),
        &mut recovered,
    )
    .map_err(|e| ParseError::from_swc(&source_map, filename, &e))?;

    if let Some(e) = recovered.first() {
        return Err(ParseError::from_swc(&source_map, filename, e));
    }

    tracing::trace!(file = filename, items = module.body.len(), "parsed module");
    Ok(ParsedModule {
        module,
        comments,
        source_map,
    })
}

/// Parse an ECMAScript source string as a script.
pub fn parse_script(source: &str, filename: &str) -> Result<ParsedScript, ParseError> {
    let (source_map, source_file) = load(source, filename);
    let comments = SingleThreadedComments::default();
    let mut recovered = vec![];

    let script = swc_ecma_parser::parse_file_as_script(
        &source_file,
        syntax(),
        EsVersion::latest(),
        Some(&comments),
        &mut recovered,
    )
    .map_err(|e| ParseError::from_swc(&source_map, filename, &e))?;

    if let Some(e) = recovered.first() {
        return Err(ParseError::from_swc(&source_map, filename, e));
    }

    tracing::trace!(file = filename, stmts = script.body.len(), "parsed script");
    Ok(ParsedScript {
        script,
        comments,
        source_map,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_import_export_as_module() {
        let parsed = parse_module("import Bar from \"bar\";\nexport default Bar;", "a.js").unwrap();
        assert_eq!(parsed.module.body.len(), 2);
    }

    #[test]
    fn module_syntax_is_not_a_script() {
        let Err(err) = parse_script("import Bar from \"bar\";", "a.js") else {
            panic!("import parsed as a script");
        };
        assert_eq!(err.file, "a.js");
        assert_eq!(err.line, 1);
    }

    #[test]
    fn reports_position_of_syntax_errors() {
        let Err(err) = parse_module("var a = 1;\nclass {", "broken.js") else {
            panic!("broken module parsed");
        };
        assert_eq!(err.file, "broken.js");
        assert_eq!(err.line, 2);
        assert!(err.column >= 1);
        assert!(!err.message.is_empty());
        assert!(err.to_string().starts_with("broken.js:2:"), "{err}");
    }
}
