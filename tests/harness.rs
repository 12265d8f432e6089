//! Fixture harness for illusionist.
//!
//! Discovers `.input.js` files under `tests/fixtures/`, compiles each one,
//! and checks the output against the sibling `.expect` file: every
//! non-empty line of it must appear in the output, compared with all
//! whitespace removed. Header lines select options:
//!
//! ```text
//! # module-type: cjs
//! # module-name: some/name
//! ```
//!
//! Every output must also re-parse as a classic script, carry no syntax the
//! down-leveler is meant to remove, and be a fixed point of the down-leveler.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use il_ast::{CompileOptions, SourceUnit};
use il_downlevel::{downlevel, residue};
use il_driver::compile;
use il_parser::parse_script;
use walkdir::WalkDir;

fn fixtures_dir() -> PathBuf {
    // CARGO_MANIFEST_DIR is crates/il_test/, so go up two levels to workspace root.
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
}

fn collect_input_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .flatten()
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(".input.js"))
        })
        .collect();
    files.sort();
    files
}

/// Options and required fragments parsed from an `.expect` file.
struct Expectation {
    options: CompileOptions,
    fragments: Vec<String>,
}

fn parse_expectation(text: &str) -> Result<Expectation> {
    let mut options = CompileOptions::default();
    let mut fragments = Vec::new();

    for line in text.lines() {
        if let Some(header) = line.strip_prefix('#') {
            let Some((key, value)) = header.split_once(':') else {
                continue;
            };
            match key.trim() {
                "module-type" => options.module_type = value.trim().parse()?,
                "module-name" => options.module_name = Some(value.trim().to_string()),
                other => bail!("unknown header `{other}`"),
            }
        } else if !line.trim().is_empty() {
            fragments.push(line.trim().to_string());
        }
    }

    Ok(Expectation { options, fragments })
}

/// Code generator layout is not part of what a fixture pins down.
fn squash(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// `foo.input.js` compiles as `foo.js`, so its module id is `foo`.
fn unit_for(input_path: &Path, source: String) -> SourceUnit {
    let name = input_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .replace(".input.js", ".js");
    SourceUnit::new(source, name)
}

fn run_fixture(input_path: &Path) -> Result<()> {
    let expect_path = PathBuf::from(input_path.to_str().unwrap().replace(".input.js", ".expect"));
    let source = std::fs::read_to_string(input_path).context("failed to read input")?;
    let expect = std::fs::read_to_string(&expect_path)
        .with_context(|| format!("missing expect file: {}", expect_path.display()))?;
    let expectation = parse_expectation(&expect)?;

    let output = compile(&unit_for(input_path, source), &expectation.options)?;

    let squashed = squash(&output);
    let missing: Vec<&String> = expectation
        .fragments
        .iter()
        .filter(|f| !squashed.contains(&squash(f)))
        .collect();
    if !missing.is_empty() {
        bail!("missing fragments {missing:#?}\n--- output ---\n{}", output.trim());
    }

    let parsed = parse_script(&output, "output.js").context("output is not a valid script")?;
    let left = residue(&parsed.script);
    if !left.is_empty() {
        bail!("residual syntax {left:?}\n--- output ---\n{}", output.trim());
    }

    let again = downlevel(&output, "output.js")?;
    if again != output {
        bail!("down-leveling the output changed it\n--- output ---\n{}", output.trim());
    }
    Ok(())
}

#[test]
fn fixture_tests() {
    let fixtures = fixtures_dir();
    let input_files = collect_input_files(&fixtures);

    assert!(
        !input_files.is_empty(),
        "No test fixtures found in {}",
        fixtures.display()
    );

    let mut failures = Vec::new();
    for input_path in &input_files {
        let test_name = input_path
            .strip_prefix(&fixtures)
            .unwrap()
            .display()
            .to_string();
        if let Err(e) = run_fixture(input_path) {
            failures.push(format!("{test_name}: {e:#}"));
        }
    }

    if !failures.is_empty() {
        panic!(
            "\n{} fixture test(s) failed:\n\n{}",
            failures.len(),
            failures.join("\n\n")
        );
    }
}

#[test]
fn outputs_are_deterministic() {
    let mut failures = Vec::new();

    for input_path in &collect_input_files(&fixtures_dir()) {
        let source = std::fs::read_to_string(input_path).unwrap();
        let unit = unit_for(input_path, source);
        let options = CompileOptions::default();
        match (compile(&unit, &options), compile(&unit, &options)) {
            (Ok(a), Ok(b)) if a == b => {}
            (Ok(_), Ok(_)) => failures.push(format!("{}: outputs differ", input_path.display())),
            // Fixtures for other module types may still compile as AMD;
            // failure here is covered by fixture_tests.
            _ => {}
        }
    }

    assert!(failures.is_empty(), "{}", failures.join("\n"));
}
