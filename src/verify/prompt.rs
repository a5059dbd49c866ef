//! User confirmation before a move is applied.
//!
//! Displays the plan of what will be changed and waits for the user.
//! Skipped entirely with `--yes` or `--dry-run`.

use crate::error::Result;
use crate::golang::FileRelationship;
use crate::steps::relocate::MovePlan;
use colored::Colorize;
use std::io::{self, BufRead, IsTerminal, Write};

/// Decides whether a planned move goes ahead.
///
/// Called once per move, after the plan is computed and before any file is
/// written. Returning `Ok(false)` aborts the move with no side effects.
pub trait Confirmation {
    fn confirm(&self, plan: &MovePlan) -> Result<bool>;
}

/// Accepts every plan (`--yes`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

impl Confirmation for AutoConfirm {
    fn confirm(&self, _plan: &MovePlan) -> Result<bool> {
        Ok(true)
    }
}

/// Prints the plan and asks on the terminal.
///
/// A non-interactive stdin declines, since there is nobody to answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

impl Confirmation for TerminalPrompt {
    fn confirm(&self, plan: &MovePlan) -> Result<bool> {
        if !io::stdin().is_terminal() {
            log::warn!("Non-interactive terminal detected. Use --yes to confirm automatically.");
            return Ok(false);
        }

        print_plan(plan);

        print!("{} {} ", "Continue?".bold(), "(y/N)".dimmed());
        io::stdout().flush()?;

        let mut response = String::new();
        io::stdin().lock().read_line(&mut response)?;

        let confirmed = is_yes(&response);
        if !confirmed {
            log::info!("Move cancelled by user");
        }

        Ok(confirmed)
    }
}

fn is_yes(response: &str) -> bool {
    let response = response.trim();
    response.eq_ignore_ascii_case("y") || response.eq_ignore_ascii_case("yes")
}

fn print_plan(plan: &MovePlan) {
    let facts = &plan.facts;

    println!("\n{}", "Move Plan:".bold().cyan());
    println!(
        "  {} {} → {}",
        "File:".bold(),
        plan.display(&facts.old_path).yellow(),
        plan.display(&facts.new_path).green()
    );

    if facts.package_changed() {
        println!(
            "  {} {} → {}",
            "Package:".bold(),
            facts.old_import_path.yellow(),
            facts.new_import_path.green()
        );
    }

    if !plan.symbols.is_empty() {
        let shown: Vec<_> = plan.symbols.iter().take(8).map(String::as_str).collect();
        let more = plan.symbols.len().saturating_sub(shown.len());
        println!(
            "  {} {}{}",
            "Symbols:".bold(),
            shown.join(", "),
            if more > 0 {
                format!(", ... and {} more", more)
            } else {
                String::new()
            }
        );
    }

    for (relationship, label) in [
        (FileRelationship::SameDirectory, "Qualify references in"),
        (FileRelationship::TargetDirectory, "Unqualify references in"),
        (FileRelationship::OtherDirectory, "Update imports in up to"),
    ] {
        let count = plan.count(relationship);
        if count > 0 {
            println!(
                "  {} {} {} file{}",
                "✓".green(),
                label,
                count,
                if count == 1 { "" } else { "s" }
            );
        }
    }

    if plan.move_file {
        println!("  {} Move the file", "✓".green());
    }

    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes("  YES "));
        assert!(!is_yes("\n"));
        assert!(!is_yes("no"));
        assert!(!is_yes("yep"));
    }
}
