use std::fmt::{self, Display};
use std::io::Write;

use annotate_snippets::Renderer;
use clap::ValueEnum;
use colored::Colorize;
use lintel_core::Problem;
use lintel_core::diagnostic::render_diagnostic;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Print problems with the source lines they point at
    #[default]
    Full,
    /// Print problems in a concise format, one per line
    Concise,
    /// Print problems as JSON
    Json,
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::Concise => write!(f, "concise"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// The outcome of linting one file.
#[derive(Debug, Clone)]
pub struct FileReport {
    /// Path as shown to the user.
    pub path: String,
    /// The text the problems refer to, fixed if fixes were applied.
    pub source: String,
    pub problems: Vec<Problem>,
    pub fix_not_converged: bool,
}

pub trait Emitter {
    fn emit<W: Write>(&self, writer: &mut W, files: &[FileReport]) -> anyhow::Result<()>;
}

pub struct ConciseEmitter;

impl Emitter for ConciseEmitter {
    fn emit<W: Write>(&self, writer: &mut W, files: &[FileReport]) -> anyhow::Result<()> {
        for file in files {
            for problem in &file.problems {
                writeln!(
                    writer,
                    "{} [{}:{}] {} {}",
                    file.path.white(),
                    problem.start.line,
                    problem.start.column,
                    problem.rule_name().red(),
                    problem.message
                )?;
            }
        }
        Ok(())
    }
}

pub struct FullEmitter {
    pub no_color: bool,
}

impl Emitter for FullEmitter {
    fn emit<W: Write>(&self, writer: &mut W, files: &[FileReport]) -> anyhow::Result<()> {
        let renderer = if self.no_color { Renderer::plain() } else { Renderer::styled() };
        for file in files {
            for problem in &file.problems {
                let rendered = render_diagnostic(&file.source, &file.path, problem, &renderer);
                writeln!(writer, "{rendered}\n")?;
            }
        }
        Ok(())
    }
}

pub struct JsonEmitter;

#[derive(Serialize)]
struct JsonProblem<'a> {
    path: &'a str,
    #[serde(flatten)]
    problem: &'a Problem,
}

impl Emitter for JsonEmitter {
    fn emit<W: Write>(&self, writer: &mut W, files: &[FileReport]) -> anyhow::Result<()> {
        let problems: Vec<JsonProblem<'_>> = files
            .iter()
            .flat_map(|file| {
                file.problems
                    .iter()
                    .map(|problem| JsonProblem { path: &file.path, problem })
            })
            .collect();
        serde_json::to_writer_pretty(&mut *writer, &problems)?;
        writeln!(writer)?;
        Ok(())
    }
}

/// `Found N errors.` and how many of them `--fix` would handle.
pub fn print_summary(files: &[FileReport], has_errors: bool) {
    let problems: Vec<&Problem> = files.iter().flat_map(|file| file.problems.iter()).collect();
    let total = problems.len();

    if total == 0 {
        if !has_errors {
            println!("All checks passed!");
        }
        return;
    }

    println!("Found {} error{}.", total, if total == 1 { "" } else { "s" });

    let fixable = problems.iter().filter(|problem| problem.has_fix()).count();
    if fixable > 0 {
        println!("{fixable} fixable with the `--fix` option.");
    }
}

pub fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        eprintln!("{}: {}", "Warning".yellow().bold(), warning);
    }
}
