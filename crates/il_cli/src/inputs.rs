//! Turning command-line paths into source units.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use il_driver::SourceUnit;
use walkdir::WalkDir;

/// A unit to compile and where its output goes, relative to `--output`.
pub struct Input {
    pub unit: SourceUnit,
    pub output_name: PathBuf,
}

/// A path given on the command line.
#[derive(Debug, Clone)]
pub enum Root {
    File(PathBuf),
    Tree(PathBuf),
}

impl Root {
    pub fn path(&self) -> &Path {
        match self {
            Root::File(p) | Root::Tree(p) => p,
        }
    }

    /// Every input under this root, in a stable order.
    pub fn inputs(&self) -> Result<Vec<Input>> {
        match self {
            Root::File(path) => Ok(vec![read_file(path)?]),
            Root::Tree(dir) => read_tree(dir),
        }
    }

    /// The input for `changed` if it belongs to this root.
    pub fn input_for(&self, changed: &Path) -> Result<Option<Input>> {
        match self {
            Root::File(path) if path == changed => Ok(Some(read_file(path)?)),
            Root::Tree(dir) if changed.starts_with(dir) && is_js(changed) => {
                Ok(Some(read_tree_file(dir, changed)?))
            }
            _ => Ok(None),
        }
    }
}

pub fn roots(paths: &[PathBuf], tree: bool) -> Result<Vec<Root>> {
    paths
        .iter()
        .map(|path| {
            if tree {
                if !path.is_dir() {
                    bail!("{} is not a directory", path.display());
                }
                Ok(Root::Tree(path.clone()))
            } else {
                Ok(Root::File(path.clone()))
            }
        })
        .collect()
}

pub fn read_stdin() -> Result<Input> {
    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .context("failed to read stdin")?;
    Ok(Input {
        unit: SourceUnit::stdin(text),
        output_name: PathBuf::from("stdin.js"),
    })
}

fn is_js(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "js")
}

fn read_file(path: &Path) -> Result<Input> {
    let text = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let output_name = path
        .file_name()
        .map(PathBuf::from)
        .with_context(|| format!("{} has no file name", path.display()))?;
    Ok(Input {
        unit: SourceUnit::new(text, path.display().to_string()),
        output_name,
    })
}

fn read_tree_file(dir: &Path, path: &Path) -> Result<Input> {
    let text = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let output_name = path.strip_prefix(dir).unwrap_or(path).to_path_buf();
    Ok(Input {
        unit: SourceUnit::new(text, path.display().to_string()).with_base_path(dir),
        output_name,
    })
}

fn read_tree(dir: &Path) -> Result<Vec<Input>> {
    let mut inputs = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("failed to walk {}", dir.display()))?;
        if entry.file_type().is_file() && is_js(entry.path()) {
            inputs.push(read_tree_file(dir, entry.path())?);
        }
    }
    tracing::debug!(dir = %dir.display(), files = inputs.len(), "collected tree");
    Ok(inputs)
}
