//! Orchestration logic for moving a Go file between packages.
//!
//! All file system modifications go through a `Transaction`: every file is
//! rewritten in memory first, then the writes and the file move are applied
//! together.

use crate::error::{MoveError, Result};
use crate::format::{CommandFormatter, DEFAULT_FORMATTER, Formatter, format_all};
use crate::fs::{FileFailure, Transaction, go_source_files};
use crate::golang::{
    FileRelationship, MoveFacts, extract_symbols, find_project_root, normalize_path,
    read_module_name,
};
use crate::rewrite::RewriteContext;
use crate::verify::{AutoConfirm, Confirmation, TerminalPrompt, preflight_checks};

use clap::Parser;
use colored::Colorize;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Arguments for the `move` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct RelocateArgs {
    /// Go file to move
    pub old_path: PathBuf,

    /// Destination path of the file
    pub new_path: PathBuf,

    /// Project root (searches upward from OLD_PATH for go.mod if not specified)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Preview changes without applying them
    #[arg(long, short = 'n')]
    pub dry_run: bool,

    /// Skip interactive confirmation
    #[arg(long = "yes", short = 'y')]
    pub skip_confirmation: bool,

    /// Rewrite references only; the caller moves the file itself
    #[arg(long)]
    pub refs_only: bool,

    /// Do not run the formatter on changed files
    #[arg(long)]
    pub no_format: bool,

    /// Formatter invoked as `<PROGRAM> -w <file>` on every changed file
    #[arg(
        long,
        value_name = "PROGRAM",
        env = "GO_MOVE_FORMATTER",
        default_value = DEFAULT_FORMATTER
    )]
    pub formatter: String,

    /// Worker threads for rewriting and formatting (default: one per CPU)
    #[arg(long, short = 'j', value_name = "N")]
    pub jobs: Option<usize>,
}

/// One move, ready for [`relocate`].
///
/// Paths may be relative; they are normalized against the current directory.
#[derive(Debug, Clone)]
pub struct MoveRequest {
    pub old_path: PathBuf,
    pub new_path: PathBuf,
    /// `None` turns the request into a no-op.
    pub root: Option<PathBuf>,
    pub dry_run: bool,
    /// Also relocate the file after rewriting (off for `--refs-only`).
    pub move_file: bool,
    pub jobs: Option<usize>,
}

/// What a move is about to do, shown to the confirmation gate.
#[derive(Debug, Clone)]
pub struct MovePlan {
    pub facts: MoveFacts,
    pub symbols: Vec<String>,
    /// Every project file with its relationship to the move.
    pub files: Vec<(PathBuf, FileRelationship)>,
    pub move_file: bool,
}

impl MovePlan {
    pub fn count(&self, relationship: FileRelationship) -> usize {
        self.files.iter().filter(|(_, r)| *r == relationship).count()
    }

    /// Formats `path` relative to the project root.
    pub fn display(&self, path: &Path) -> String {
        display_relative(path, &self.facts.root)
    }
}

/// Outcome of one move.
#[derive(Debug, Default)]
pub struct MoveReport {
    pub dry_run: bool,
    /// `(from, to)` when the file was moved.
    pub moved: Option<(PathBuf, PathBuf)>,
    /// Files whose content changed, at their final location.
    pub affected: BTreeMap<PathBuf, FileRelationship>,
    /// Files that could not be read or written.
    pub failures: Vec<FileFailure>,
    /// Files the formatter rejected. Their rewrites are kept.
    pub format_failures: Vec<MoveError>,
}

impl MoveReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Prints the colored summary grouped by relationship.
    pub fn print_summary(&self, root: &Path) {
        if self.affected.is_empty() && self.moved.is_none() {
            println!("\n{}", "No changes needed".yellow());
            return;
        }

        if self.dry_run {
            println!("\n{}", "DRY RUN - No changes will be made".yellow().bold());
        } else {
            println!("\n{}", "Changes applied:".green().bold());
        }

        if let Some((from, to)) = &self.moved {
            println!("\n{} File", "📁".bold());
            let from_display = display_relative(from, root);
            let to_display = display_relative(to, root);
            if self.dry_run {
                println!("   {} → {}", from_display.yellow(), to_display.green());
            } else {
                println!("   {} → {}", from_display, to_display.green());
            }
        }

        for relationship in [
            FileRelationship::IsMovedFile,
            FileRelationship::SameDirectory,
            FileRelationship::TargetDirectory,
            FileRelationship::OtherDirectory,
        ] {
            let files: Vec<_> = self
                .affected
                .iter()
                .filter(|(_, r)| **r == relationship)
                .map(|(p, _)| display_relative(p, root))
                .collect();

            if files.is_empty() {
                continue;
            }

            println!(
                "\n{} {} ({} file{})",
                "📝".bold(),
                capitalize(relationship.label()),
                files.len(),
                if files.len() == 1 { "" } else { "s" }
            );
            for path in files.iter().take(10) {
                if self.dry_run {
                    println!("   • {}", path.dimmed());
                } else {
                    println!("   {} {}", "✓".green(), path.dimmed());
                }
            }
            if files.len() > 10 {
                println!("   • ... and {} more", files.len() - 10);
            }
        }

        if !self.format_failures.is_empty() {
            println!("\n{} Formatter warnings", "⚠".yellow().bold());
            for failure in &self.format_failures {
                println!("   {}", failure.to_string().yellow());
            }
        }

        if !self.failures.is_empty() {
            println!("\n{} Not updated", "✗".red().bold());
            for failure in &self.failures {
                println!(
                    "   {} {}",
                    display_relative(&failure.path, root).red(),
                    failure.message.dimmed()
                );
            }
        }
    }
}

/// Executes the `move` subcommand.
///
/// ## Phases
///
/// 1. Normalize paths and resolve the project root
/// 2. Pre-flight checks
/// 3. Plan, confirm, rewrite and commit ([`relocate`])
/// 4. Print the summary
///
/// Files that could not be updated turn into an error after the summary,
/// so the exit status reflects a partial move.
pub fn execute(args: RelocateArgs) -> Result<()> {
    let old_path = normalize_path(&args.old_path)?;
    let new_path = normalize_path(&args.new_path)?;
    let root = resolve_root(args.root.as_deref(), &old_path)?;

    log::debug!("Project root: {}", root.display());
    preflight_checks(&old_path, &new_path, &root, args.refs_only)?;

    let request = MoveRequest {
        old_path,
        new_path,
        root: Some(root.clone()),
        dry_run: args.dry_run,
        move_file: !args.refs_only,
        jobs: args.jobs,
    };

    let confirmation: Box<dyn Confirmation> = if args.skip_confirmation || args.dry_run {
        Box::new(AutoConfirm)
    } else {
        Box::new(TerminalPrompt)
    };

    let command_formatter = CommandFormatter::new(&args.formatter);
    let formatter: Option<&dyn Formatter> = if args.no_format || args.dry_run {
        None
    } else if command_formatter.is_available() {
        Some(&command_formatter)
    } else {
        log::warn!(
            "Formatter '{}' not found, skipping formatting (use --no-format to silence)",
            args.formatter
        );
        None
    };

    let report = match relocate(&request, Some(confirmation.as_ref()), formatter) {
        Err(MoveError::Cancelled) => {
            println!("\n{}", "Operation cancelled.".yellow());
            return Err(MoveError::Cancelled);
        }
        result => result?,
    };

    report.print_summary(&root);

    if !report.is_clean() {
        return Err(MoveError::Other(anyhow::anyhow!(
            "{} file(s) could not be updated",
            report.failures.len()
        )));
    }

    if !args.dry_run {
        println!(
            "\n{} {} → {}",
            "✓ Successfully moved".green().bold(),
            display_relative(&request.old_path, &root).yellow(),
            display_relative(&request.new_path, &root).green().bold()
        );
    }

    Ok(())
}

/// Moves one file and rewrites every reference to it.
///
/// `confirmation` sees the plan before anything is written; a decline
/// returns [`MoveError::Cancelled`] with nothing changed. `formatter` runs
/// over the affected files after a real (non dry-run) commit.
///
/// Per-file read and write failures are collected in the report; only
/// failures that concern the move as a whole are returned as errors.
pub fn relocate(
    request: &MoveRequest,
    confirmation: Option<&dyn Confirmation>,
    formatter: Option<&dyn Formatter>,
) -> Result<MoveReport> {
    let Some(root) = request.root.as_deref() else {
        log::info!("No project root available, nothing to do");
        return Ok(MoveReport {
            dry_run: request.dry_run,
            ..MoveReport::default()
        });
    };

    let module_name = read_module_name(root);
    let facts = MoveFacts::new(root, &module_name, &request.old_path, &request.new_path)?;
    log::info!(
        "Moving {} ({} → {})",
        facts.old_path.display(),
        display_import_path(&facts.old_import_path),
        display_import_path(&facts.new_import_path)
    );

    let source = moved_file_location(&facts, request.move_file)?;
    let original = fs::read_to_string(&source)?;
    let symbols = extract_symbols(&original)?;
    log::debug!("Symbols: {:?}", symbols);

    let context = RewriteContext::new(facts, &symbols)?;
    let plan = plan_move(&context, &source, request.move_file);

    if let Some(confirmation) = confirmation
        && !confirmation.confirm(&plan)?
    {
        return Err(MoveError::Cancelled);
    }

    let pool = build_pool(request.jobs)?;
    let mut report = MoveReport {
        dry_run: request.dry_run,
        ..MoveReport::default()
    };

    let outcomes: Vec<_> = pool.install(|| {
        plan.files
            .par_iter()
            .map(|(path, relationship)| rewrite_file(&context, path, *relationship))
            .collect()
    });

    let mut txn = Transaction::new(request.dry_run);
    let mut relationships = BTreeMap::new();

    for outcome in outcomes {
        match outcome {
            FileOutcome::Unchanged => {}
            FileOutcome::Changed {
                path,
                relationship,
                original,
                rewritten,
            } => {
                relationships.insert(path.clone(), relationship);
                txn.update_file(path, original, rewritten);
            }
            FileOutcome::Failed(failure) => {
                log::warn!("Skipping {}: {}", failure.path.display(), failure.message);
                report.failures.push(failure);
            }
        }
    }

    let facts = context.facts();
    if request.move_file {
        txn.move_file(facts.old_path.clone(), facts.new_path.clone())?;
        relationships.insert(facts.new_path.clone(), FileRelationship::IsMovedFile);
    }

    if txn.is_empty() {
        log::info!("Nothing to rewrite or move");
    } else {
        log::debug!("Staged {} operations", txn.len());
    }
    let commit = txn.commit()?;

    report.moved = commit.moved;
    report.failures.extend(commit.failures);
    report.affected = commit
        .written
        .into_iter()
        .map(|path| {
            let relationship = relationships
                .get(&path)
                .copied()
                .unwrap_or(FileRelationship::OtherDirectory);
            (path, relationship)
        })
        .collect();

    if let Some(formatter) = formatter
        && !request.dry_run
        && !report.affected.is_empty()
    {
        let paths: Vec<PathBuf> = report.affected.keys().cloned().collect();
        report.format_failures = pool.install(|| format_all(formatter, &paths));
    }

    Ok(report)
}

enum FileOutcome {
    Unchanged,
    Changed {
        path: PathBuf,
        relationship: FileRelationship,
        original: String,
        rewritten: String,
    },
    Failed(FileFailure),
}

fn rewrite_file(context: &RewriteContext, path: &Path, relationship: FileRelationship) -> FileOutcome {
    let original = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            return FileOutcome::Failed(FileFailure {
                path: path.to_path_buf(),
                message: format!("read failed: {}", e),
            });
        }
    };

    let rewritten = context.rewrite(relationship, &original);
    if rewritten == original {
        return FileOutcome::Unchanged;
    }

    log::debug!("Rewrote {} ({})", path.display(), relationship.label());
    FileOutcome::Changed {
        path: path.to_path_buf(),
        relationship,
        original,
        rewritten,
    }
}

/// Classifies every project file against the move.
///
/// `source` is where the moved file currently is: its old path, or its new
/// path when the caller already relocated it (`--refs-only`).
///
/// Walks the normalized root so walked paths compare equal to the facts.
fn plan_move(context: &RewriteContext, source: &Path, move_file: bool) -> MovePlan {
    let facts = context.facts();
    let mut files: Vec<(PathBuf, FileRelationship)> = go_source_files(&facts.root)
        .into_iter()
        .map(|path| {
            let relationship = if path == source {
                FileRelationship::IsMovedFile
            } else {
                facts.classify(&path)
            };
            (path, relationship)
        })
        .collect();

    if !files.iter().any(|(p, _)| p == source) {
        log::debug!("Moved file is not part of the walk, adding it: {}", source.display());
        files.push((source.to_path_buf(), FileRelationship::IsMovedFile));
    }

    MovePlan {
        facts: facts.clone(),
        symbols: context.symbols().to_vec(),
        files,
        move_file,
    }
}

fn moved_file_location(facts: &MoveFacts, move_file: bool) -> Result<PathBuf> {
    if facts.old_path.is_file() {
        return Ok(facts.old_path.clone());
    }

    if !move_file && facts.new_path.is_file() {
        log::debug!("File already at {}", facts.new_path.display());
        return Ok(facts.new_path.clone());
    }

    Err(MoveError::SourceNotFound(facts.old_path.clone()))
}

fn resolve_root(explicit: Option<&Path>, old_path: &Path) -> Result<PathBuf> {
    if let Some(root) = explicit {
        return normalize_path(root);
    }

    if let Some(root) = old_path.parent().and_then(find_project_root) {
        return Ok(root);
    }

    log::warn!("No go.mod found above {}, using the current directory", old_path.display());
    normalize_path(&std::env::current_dir()?)
}

fn build_pool(jobs: Option<usize>) -> Result<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.unwrap_or(0))
        .build()
        .map_err(|e| MoveError::Other(anyhow::anyhow!("Failed to start worker pool: {}", e)))
}

fn display_relative(path: &Path, root: &Path) -> String {
    let relative = pathdiff::diff_paths(path, root).unwrap_or_else(|| path.to_path_buf());
    relative.to_string_lossy().replace('\\', "/")
}

fn display_import_path(path: &str) -> &str {
    if path.is_empty() { "<root>" } else { path }
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
