//! CLI tool for compiling plain-text lesson slides.

use anyhow::{Context, Result};
use clap::Parser;
use deck_core::{compile_bytes, CompileResult, ExportBundle, StyleConfig};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Compile lesson slide text into a JSON bundle for the presentation writer.
#[derive(Parser, Debug)]
#[command(name = "deck-compile")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input lesson file(s)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Output directory (default: same as input file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Style configuration JSON (vocabulary/question/answer/emphasis colors)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the bundle to stdout instead of writing to file
    #[arg(short, long)]
    print: bool,

    /// Only report findings, never export
    #[arg(long)]
    check: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let styles = match &args.config {
        Some(path) => load_styles(path)?,
        None => StyleConfig::default(),
    };

    let mut blocked = false;

    for input_path in &args.input {
        if args.verbose {
            eprintln!("Processing: {}", input_path.display());
        }

        match process_file(input_path, &args, &styles) {
            Ok(true) => {}
            Ok(false) => blocked = true,
            Err(e) => {
                eprintln!("Error processing {}: {:#}", input_path.display(), e);
                blocked = true;
            }
        }
    }

    Ok(if blocked {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Read a style configuration file.
fn load_styles(path: &Path) -> Result<StyleConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read style config {}", path.display()))?;
    StyleConfig::from_json(&json)
        .with_context(|| format!("Failed to parse style config {}", path.display()))
}

/// Compile a single lesson file. Returns false when export was blocked.
fn process_file(input_path: &Path, args: &Args, styles: &StyleConfig) -> Result<bool> {
    let bytes = std::fs::read(input_path)
        .with_context(|| format!("Failed to read {}", input_path.display()))?;

    let result = compile_bytes(&bytes)
        .with_context(|| format!("Failed to compile {}", input_path.display()))?;

    report(input_path, &result);

    if result.has_errors() {
        eprintln!(
            "{}: export blocked by {} error(s)",
            input_path.display(),
            result.errors().count()
        );
        return Ok(false);
    }

    if args.check {
        return Ok(true);
    }

    let bundle = ExportBundle::new(&result, styles.clone())?;
    let json = bundle.to_json()?;

    if args.print {
        println!("{}", json);
    } else {
        let output_path = get_output_path(input_path, args.output.as_ref())?;
        write_output(&output_path, &json)?;
        if args.verbose {
            eprintln!("Written to: {}", output_path.display());
        }
    }

    Ok(true)
}

/// Print findings to stderr, errors first.
fn report(input_path: &Path, result: &CompileResult) {
    for finding in result.errors().chain(result.warnings()) {
        eprintln!("{}: {}", input_path.display(), finding);
    }
    log::info!(
        "{}: {} slide(s), {} finding(s)",
        input_path.display(),
        result.slides.len(),
        result.findings.len()
    );
}

/// Determine the output path for a compiled file.
fn get_output_path(input_path: &Path, output_dir: Option<&PathBuf>) -> Result<PathBuf> {
    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");

    let output_filename = format!("{}.deck.json", stem);

    let output_path = match output_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
            dir.join(output_filename)
        }
        None => match input_path.parent() {
            Some(parent) => parent.join(output_filename),
            None => PathBuf::from(output_filename),
        },
    };

    Ok(output_path)
}

/// Write output to a file.
fn write_output(path: &Path, content: &str) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_next_to_input() {
        let path = get_output_path(Path::new("lessons/week1.txt"), None).unwrap();
        assert_eq!(path, PathBuf::from("lessons/week1.deck.json"));
    }

    #[test]
    fn test_output_path_without_parent() {
        let path = get_output_path(Path::new("week1.txt"), None).unwrap();
        assert_eq!(path, PathBuf::from("week1.deck.json"));
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from(["deck-compile", "a.txt", "--check", "-c", "styles.json"]);
        assert!(args.check);
        assert_eq!(args.config, Some(PathBuf::from("styles.json")));
        assert_eq!(args.input, vec![PathBuf::from("a.txt")]);
    }
}
