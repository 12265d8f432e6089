//! `--watch`: recompile inputs as they change.

use std::io;
use std::path::Path;
use std::sync::mpsc::channel;

use anyhow::{Context, Result};
use il_driver::{compile, CompileOptions};
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::inputs::Root;

/// Events carry absolute paths, so roots are matched in canonical form.
fn canonical(root: &Root) -> Result<Root> {
    let path = root
        .path()
        .canonicalize()
        .with_context(|| format!("failed to resolve {}", root.path().display()))?;
    Ok(match root {
        Root::File(_) => Root::File(path),
        Root::Tree(_) => Root::Tree(path),
    })
}

/// Block until the watcher shuts down, rebuilding each changed input.
pub fn run(roots: &[Root], options: &CompileOptions, output: Option<&Path>) -> Result<()> {
    let roots = roots.iter().map(canonical).collect::<Result<Vec<_>>>()?;

    let (tx, rx) = channel();
    let mut watcher = RecommendedWatcher::new(tx, Config::default()).context("failed to start file watcher")?;
    for root in &roots {
        let mode = match root {
            Root::Tree(_) => RecursiveMode::Recursive,
            Root::File(_) => RecursiveMode::NonRecursive,
        };
        watcher
            .watch(root.path(), mode)
            .with_context(|| format!("failed to watch {}", root.path().display()))?;
    }

    let listed: Vec<String> = roots.iter().map(|r| r.path().display().to_string()).collect();
    eprintln!("Watching {}", listed.join(", "));

    for res in rx {
        match res {
            Ok(event) => {
                if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
                    continue;
                }
                for path in &event.paths {
                    rebuild(&roots, path, options, output);
                }
            }
            Err(e) => eprintln!("Watch error: {e}"),
        }
    }
    Ok(())
}

fn rebuild(roots: &[Root], changed: &Path, options: &CompileOptions, output: Option<&Path>) {
    for root in roots {
        let input = match root.input_for(changed) {
            Ok(Some(input)) => input,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("error: {e:#}");
                return;
            }
        };

        tracing::debug!(path = %changed.display(), "rebuilding");
        match compile(&input.unit, options) {
            Ok(code) => match crate::write_output(&input, &code, output, &mut io::stdout().lock()) {
                Ok(()) => eprintln!("Compiled {}", changed.display()),
                Err(e) => eprintln!("error: {e:#}"),
            },
            Err(e) => eprintln!("error: {e}"),
        }
        return;
    }
}
