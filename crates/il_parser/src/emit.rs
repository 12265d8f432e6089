use std::io;

use swc_common::{comments::Comments, sync::Lrc, SourceMap};
use swc_ecma_ast::{EsVersion, Script};
use swc_ecma_codegen::{text_writer::JsWriter, Emitter, Node};

fn emit_node<N: Node>(
    node: &N,
    source_map: &Lrc<SourceMap>,
    comments: Option<&dyn Comments>,
    target: EsVersion,
) -> io::Result<String> {
    let mut buf = Vec::new();
    {
        let writer = JsWriter::new(source_map.clone(), "\n", &mut buf, None);
        let mut emitter = Emitter {
            cfg: swc_ecma_codegen::Config::default().with_target(target),
            cm: source_map.clone(),
            comments,
            wr: writer,
        };
        node.emit_with(&mut emitter)?;
    }

    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Print a script back to source text.
pub fn emit_script(
    script: &Script,
    source_map: &Lrc<SourceMap>,
    comments: Option<&dyn Comments>,
    target: EsVersion,
) -> io::Result<String> {
    emit_node(script, source_map, comments, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_script;

    #[test]
    fn script_round_trips_through_the_emitter() {
        let parsed = parse_script("var a = 1;\nfoo(a);", "a.js").unwrap();
        let out = emit_script(&parsed.script, &parsed.source_map, None, EsVersion::Es5).unwrap();
        assert!(out.contains("var a = 1;"), "{out}");
        assert!(out.contains("foo(a);"), "{out}");
    }

    #[test]
    fn emitter_keeps_comments_when_given() {
        let parsed = parse_script("// header\nvar a = 1;", "a.js").unwrap();
        let out = emit_script(
            &parsed.script,
            &parsed.source_map,
            Some(&parsed.comments),
            EsVersion::Es5,
        )
        .unwrap();
        assert!(out.contains("// header"), "{out}");
        assert!(out.contains("var a = 1;"), "{out}");
    }
}
