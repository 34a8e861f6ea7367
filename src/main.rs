// Derives denotational-semantics terms for a catalog of while-programs.
// Each task gets its own output directory with the step-by-step derivation
// trace and a DOT rendering of the parse tree.

mod notation;
mod parse;
mod rewrite;
mod surface;
mod tasks;
mod tree;
mod util;


use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use codespan_reporting::{
    diagnostic::{Diagnostic, Label},
    files::SimpleFile,
    term::{self, termcolor::StandardStream},
};

use parse::ParseError;
use rewrite::RewriteError;

#[derive(Debug)]
pub enum Error {
    ParseError(ParseError),
    RewriteError(RewriteError),
    IoError(std::io::Error),
}

#[derive(Debug, Parser)]
struct Cli {
    /// Directory to create the per-task output directories in.
    #[arg(short, long, default_value = ".")]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut writer = StandardStream::stderr(term::termcolor::ColorChoice::Always);
    let config = codespan_reporting::term::Config::default();

    // one failing task must not take the rest of the catalog down with it
    for (name, code) in tasks::catalog() {
        if let Err(e) = run_task(&cli.out, name, code) {
            let file = SimpleFile::new(name, code);
            let diagnostic = match &e {
                Error::ParseError(e) => Diagnostic::error()
                    .with_message(e.message.clone())
                    .with_labels(vec![Label::primary((), e.start..e.end)]),
                Error::RewriteError(
                    e @ RewriteError::UnsupportedConstruct { location, .. },
                ) => Diagnostic::error()
                    .with_message(e.to_string())
                    .with_labels(vec![Label::primary((), location.start..location.end)]),
                Error::RewriteError(e @ RewriteError::EngineStalled { .. }) => {
                    Diagnostic::error().with_message(e.to_string())
                }
                Error::IoError(e) => Diagnostic::error().with_message(e.to_string()),
            };

            term::emit(&mut writer, &config, &file, &diagnostic)?;
        }
    }

    Ok(())
}

fn run_task(out_root: &Path, name: &str, code: &str) -> Result<(), Error> {
    let prog = parse::parse(code).map_err(Error::ParseError)?;

    let dir = out_root.join(name);
    if dir.exists() {
        fs::remove_dir_all(&dir).map_err(Error::IoError)?;
    }
    fs::create_dir_all(&dir).map_err(Error::IoError)?;

    fs::write(
        dir.join("syntax_tree.dot"),
        tree::to_dot(&tree::prog_tree(&prog)),
    )
    .map_err(Error::IoError)?;

    let mut lines: Vec<String> = Vec::new();
    let result = rewrite::rewrite(&prog, &mut lines);
    if let Err(e) = &result {
        // the partial trace is still written, marked incomplete
        lines.push(format!("(incomplete: {})", e));
    }
    fs::write(dir.join("semantic_term.txt"), lines.join("\n") + "\n")
        .map_err(Error::IoError)?;

    result.map_err(Error::RewriteError)
}

/// Parses and rewrites one program, returning the whole derivation trace.
pub fn full_trace(code: &str) -> Result<Vec<String>, Error> {
    let prog = parse::parse(code).map_err(Error::ParseError)?;

    let mut lines: Vec<String> = Vec::new();
    rewrite::rewrite(&prog, &mut lines).map_err(Error::RewriteError)?;

    Ok(lines)
}

/// Parses and fully rewrites one program, returning its denotational term
/// (the last trace line).
pub fn fully_rewrite(code: &str) -> Result<String, Error> {
    Ok(full_trace(code)?.pop().unwrap_or_default())
}
