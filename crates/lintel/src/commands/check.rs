use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use lintel_core::{ActiveRuleSet, Config, LintOptions, Registry, lint};
use rayon::prelude::*;

use crate::args::{CheckCommand, split_rule_list};
use crate::discovery::{discover_js_files, relativize_path};
use crate::output_format::{
    ConciseEmitter, Emitter, FileReport, FullEmitter, JsonEmitter, OutputFormat, print_summary,
    print_warnings,
};
use crate::status::ExitStatus;

pub fn check(args: CheckCommand, no_color: bool) -> Result<ExitStatus> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let select = split_rule_list(&args.select);
    if !select.is_empty() {
        config.lint.select = Some(select);
    }
    config.lint.ignore.extend(split_rule_list(&args.ignore));

    let rules = ActiveRuleSet::resolve(&Registry::builtin(), &config);
    let options = LintOptions::from_config(&config).with_fix(args.fix);

    let mut warnings: Vec<String> = rules
        .config_errors()
        .iter()
        .map(|error| format!("{error}, the rule is skipped."))
        .collect();

    let mut all_errors: Vec<(String, anyhow::Error)> = Vec::new();
    let mut paths: Vec<PathBuf> = Vec::new();
    for result in discover_js_files(&args.files) {
        match result {
            Ok(path) => paths.push(path),
            Err(err) => all_errors.push((String::new(), err)),
        }
    }
    paths.sort();
    paths.dedup();

    if paths.is_empty() && all_errors.is_empty() {
        println!(
            "{}: {}",
            "Warning".yellow().bold(),
            "No JavaScript files found under the given path(s).".white().bold()
        );
        return Ok(ExitStatus::Success);
    }

    tracing::info!(files = paths.len(), rules = rules.len(), fix = args.fix, "Checking files");

    let file_results: Vec<(String, Result<FileReport>)> = paths
        .par_iter()
        .map(|path| {
            let display = relativize_path(path);
            let result = check_file(path, &display, &rules, &options);
            (display, result)
        })
        .collect();

    let mut reports = Vec::new();
    for (path, result) in file_results {
        match result {
            Ok(report) => reports.push(report),
            Err(err) => all_errors.push((path, err)),
        }
    }

    for report in &reports {
        if report.fix_not_converged {
            warnings.push(format!(
                "Fixes for {} did not converge after {} passes, some fixable problems are left.",
                report.path, options.max_passes
            ));
        }
    }

    let mut stdout = std::io::stdout();
    match args.output_format {
        OutputFormat::Full => FullEmitter { no_color }.emit(&mut stdout, &reports)?,
        OutputFormat::Concise => ConciseEmitter.emit(&mut stdout, &reports)?,
        OutputFormat::Json => JsonEmitter.emit(&mut stdout, &reports)?,
    }

    for (path, err) in &all_errors {
        if path.is_empty() {
            eprintln!("{}: {err:#}", "Error".red().bold());
        } else {
            eprintln!("{}: {path}: {err:#}", "Error".red().bold());
        }
    }

    if args.output_format != OutputFormat::Json {
        print_summary(&reports, !all_errors.is_empty());
    }
    print_warnings(&warnings);

    let has_fatal = reports
        .iter()
        .any(|report| report.problems.iter().any(|problem| problem.fatal));
    if !all_errors.is_empty() || has_fatal {
        return Ok(ExitStatus::Error);
    }

    if reports.iter().all(|report| report.problems.is_empty()) {
        return Ok(ExitStatus::Success);
    }

    Ok(ExitStatus::Failure)
}

/// Lint one file, writing the fixed text back when fixes were applied.
fn check_file(
    path: &Path,
    display_path: &str,
    rules: &ActiveRuleSet,
    options: &LintOptions,
) -> Result<FileReport> {
    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {display_path}"))?;

    let result = lint(&source, rules, options)
        .with_context(|| format!("Failed to check file: {display_path}"))?;

    if result.fix_not_converged {
        tracing::debug!(path = display_path, passes = result.passes, "Fixes did not converge");
    }

    let source = match result.output {
        Some(fixed) => {
            fs::write(path, &fixed).with_context(|| format!("Failed to write file: {display_path}"))?;
            tracing::debug!(path = display_path, passes = result.passes, "Wrote fixed file");
            fixed
        }
        None => source,
    };

    Ok(FileReport {
        path: display_path.to_string(),
        source,
        problems: result.problems,
        fix_not_converged: result.fix_not_converged,
    })
}
