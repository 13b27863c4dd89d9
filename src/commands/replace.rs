use clap::Args;
use std::path::{Path, PathBuf};

use wordswap::config;
use wordswap::log_status;
use wordswap::rewrap::{Rewriter, TransformWarning};
use wordswap::utils::{io, validation};
use wordswap::{files, Error, RunSummary};

use super::CmdResult;

#[derive(Args, Debug)]
pub struct ReplaceArgs {
    /// The config JSON file
    #[arg(short, long, value_name = "FILE")]
    pub config: PathBuf,

    /// Report what would change without writing any file
    #[arg(long)]
    pub dry_run: bool,
}

enum FileResult {
    Updated {
        destination: PathBuf,
        replacements: usize,
        warnings: Vec<TransformWarning>,
    },
    Unchanged {
        warnings: Vec<TransformWarning>,
    },
}

pub fn run(args: &ReplaceArgs) -> CmdResult<RunSummary> {
    let raw = args.config.to_string_lossy();
    validation::require_non_empty(&raw, "config", "Config path cannot be empty")?;
    let path = validation::require_file(&args.config, "config")?;

    let config = config::load(path)?;
    let rewriter = Rewriter::new(&config.mappings, &config.para_endings, config.policy.clone())?;
    let sources = files::select_files(&config.select)?;

    let mut summary = RunSummary::new(path.display().to_string(), args.dry_run);
    summary.warnings = config
        .mappings
        .duplicates()
        .iter()
        .map(TransformWarning::duplicate_alias)
        .collect();

    if sources.is_empty() {
        log_status!("replace", "No files match {}", config.select.join(", "));
    }

    for source in &sources {
        let id = source.display().to_string();
        let destination = files::destination(source, config.restore.as_deref());

        if config.min_update && files::is_up_to_date(source, &destination) {
            log_status!("replace", "Skipping {} (up to date)", id);
            summary.record_skipped(id);
            continue;
        }

        match process_file(&rewriter, source, &destination, args.dry_run) {
            Ok(FileResult::Updated {
                destination,
                replacements,
                warnings,
            }) => {
                log_status!(
                    "replace",
                    "{} {} ({} replacements)",
                    if args.dry_run { "Would write" } else { "Wrote" },
                    destination.display(),
                    replacements
                );
                summary.record_updated(id, destination.display().to_string(), replacements, warnings);
            }
            Ok(FileResult::Unchanged { warnings }) => {
                summary.record_unchanged(id, warnings);
            }
            Err(err) if !err.code.is_fatal() => {
                log_status!("replace", "Failed {}: {}", id, describe(&err));
                summary.record_error(id, describe(&err));
            }
            Err(err) => return Err(err),
        }
    }

    crate::tty::status(&format!(
        "{} updated, {} unchanged, {} skipped, {} failed",
        summary.updated, summary.unchanged, summary.skipped, summary.errors
    ));

    let exit_code = if summary.has_errors() { 1 } else { 0 };
    Ok((summary, exit_code))
}

fn process_file(
    rewriter: &Rewriter,
    source: &Path,
    destination: &Path,
    dry_run: bool,
) -> wordswap::Result<FileResult> {
    let original = io::read_file(source)?;
    let outcome = rewriter.rewrite(&original);

    for warning in &outcome.warnings {
        log_status!("replace", "{}: {}", source.display(), warning.message);
    }

    if !files::needs_write(source, destination, &original, &outcome.content) {
        return Ok(FileResult::Unchanged {
            warnings: outcome.warnings,
        });
    }

    if !dry_run {
        files::write_output(source, destination, &original, &outcome.content)?;
    }

    Ok(FileResult::Updated {
        destination: destination.to_path_buf(),
        replacements: outcome.replacements,
        warnings: outcome.warnings,
    })
}

fn describe(err: &Error) -> String {
    match err.details["error"].as_str() {
        Some(detail) => format!("{}: {}", err.message, detail),
        None => err.message.clone(),
    }
}
