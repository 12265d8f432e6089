mod inputs;
mod logging;
mod watch;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};
use il_driver::{compile_batch, load_options, CompileError, CompileOptions, ModuleType, SourceUnit};

use crate::inputs::Input;

#[derive(Parser)]
#[command(
    name = "illusionist",
    version = il_driver::VERSION,
    disable_version_flag = true,
    about = "Compile ES6 modules and syntax to ES5 AMD, CommonJS or globals"
)]
struct Cli {
    /// Input files, or directories with --tree. Reads stdin when omitted.
    paths: Vec<PathBuf>,
    /// Write outputs under DIR instead of stdout.
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,
    /// Module identifier to register the output under.
    #[arg(short = 'm', long, value_name = "NAME")]
    module_name: Option<String>,
    /// Output module convention: amd, cjs or globals.
    #[arg(short = 'M', long, value_name = "TYPE")]
    module_type: Option<String>,
    /// Compile every .js file below each PATH, mirroring the directory structure.
    #[arg(short, long)]
    tree: bool,
    /// Keep running and recompile inputs when they change.
    #[arg(short, long)]
    watch: bool,
    /// JSON config file with moduleName, moduleType and basePath; flags take precedence.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Print version.
    #[arg(short = 'v', long, action = ArgAction::Version)]
    #[allow(dead_code)]
    version: Option<bool>,
}

impl Cli {
    /// Defaults, then the config file, then flags.
    fn options(&self) -> Result<CompileOptions, CompileError> {
        let mut options = match &self.config {
            Some(path) => load_options(path)?,
            None => CompileOptions::default(),
        };
        if let Some(module_type) = &self.module_type {
            options.module_type = module_type
                .parse::<ModuleType>()
                .map_err(|e| CompileError::Config(e.into()))?;
        }
        if let Some(name) = &self.module_name {
            options.module_name = Some(name.clone());
        }
        Ok(options)
    }
}

pub(crate) fn write_output(input: &Input, code: &str, output: Option<&Path>, stdout: &mut impl Write) -> Result<()> {
    match output {
        Some(dir) => {
            let path = dir.join(&input.output_name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).with_context(|| format!("failed to create {}", parent.display()))?;
            }
            fs::write(&path, code).with_context(|| format!("failed to write {}", path.display()))?;
            tracing::debug!(path = %path.display(), "wrote output");
        }
        None => stdout.write_all(code.as_bytes()).context("failed to write to stdout")?,
    }
    Ok(())
}

/// Compile every input and write what succeeded. Returns the failure count.
fn build(inputs: &[Input], options: &CompileOptions, output: Option<&Path>) -> Result<usize> {
    let units: Vec<SourceUnit> = inputs.iter().map(|i| i.unit.clone()).collect();
    let results = compile_batch(&units, options);

    let mut failed = 0;
    let mut stdout = io::stdout().lock();
    for (input, result) in inputs.iter().zip(results) {
        match result {
            Ok(code) => write_output(input, &code, output, &mut stdout)?,
            Err(err) => {
                failed += 1;
                eprintln!("error: {err}");
            }
        }
    }
    stdout.flush().context("failed to write to stdout")?;
    Ok(failed)
}

fn main() -> Result<()> {
    logging::init_tracing();
    let cli = Cli::parse();

    let options = cli.options()?;
    let roots = inputs::roots(&cli.paths, cli.tree)?;
    if cli.watch && roots.is_empty() {
        bail!("--watch needs at least one path");
    }

    let mut inputs = Vec::new();
    if roots.is_empty() {
        inputs.push(inputs::read_stdin()?);
    }
    for root in &roots {
        inputs.extend(root.inputs()?);
    }

    let failed = build(&inputs, &options, cli.output.as_deref())?;
    if cli.watch {
        return watch::run(&roots, &options, cli.output.as_deref());
    }
    if failed > 0 {
        bail!("{failed} of {} inputs failed to compile", inputs.len());
    }
    Ok(())
}
