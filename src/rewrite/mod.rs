//! Go source rewriting for file moves.
//!
//! Every project file is rewritten by exactly one strategy, picked by its
//! [`FileRelationship`] to the moved file:
//!
//! ```text
//! a/foo.go  →  b/foo.go
//!
//! a/foo.go   moved file        package a  →  package b
//! a/bar.go   same package      Helper()   →  b.Helper()   + import "m/b"
//! b/baz.go   destination       a.Helper() →  Helper()     - import "m/a"
//! c/main.go  importer          import "m/a" → "m/b",  a.  →  b.
//! ```
//!
//! ## Approach
//!
//! Uses regex over raw text instead of a Go parser to:
//! - Preserve formatting, comments, and whitespace exactly
//! - Keep working on files that do not parse
//!
//! Patterns use word boundaries (`\b`) and skip the package and import
//! clauses. Every strategy is idempotent: running it again on its own output
//! changes nothing.

pub mod imports;
mod strategies;

pub use imports::{ImportRewrite, ImportSyntax};

use crate::error::Result;
use crate::golang::{FileRelationship, MoveFacts};
use regex::{Match, Regex};
use std::collections::HashSet;
use std::ops::Range;

/// Compiled patterns and facts for one move.
///
/// Built once, then shared read-only by all worker threads.
#[derive(Debug)]
pub struct RewriteContext {
    facts: MoveFacts,
    symbols: Vec<String>,
    syntax: ImportSyntax,
    /// `\b(Sym1|Sym2)\b`
    bare_symbols: Option<Regex>,
    /// `\b(qualifier)\.(Sym1|Sym2)\b` for any qualifier
    qualified_symbols: Option<Regex>,
    /// `\bold_pkg\.`
    old_prefix: Option<Regex>,
    /// `\bnew_pkg\.`
    new_prefix: Option<Regex>,
}

impl RewriteContext {
    /// Compiles all patterns for the move.
    ///
    /// Duplicate symbols are collapsed; order of first appearance is kept.
    pub fn new(facts: MoveFacts, symbols: &[String]) -> Result<Self> {
        let mut seen = HashSet::new();
        let symbols: Vec<String> = symbols
            .iter()
            .filter(|s| seen.insert(s.as_str()))
            .cloned()
            .collect();

        let alternation = symbols
            .iter()
            .map(|s| regex::escape(s))
            .collect::<Vec<_>>()
            .join("|");

        let bare_symbols = if symbols.is_empty() {
            None
        } else {
            Some(Regex::new(&format!(r"\b(?:{})\b", alternation))?)
        };

        let qualified_symbols = if symbols.is_empty() {
            None
        } else {
            Some(Regex::new(&format!(r"\b(\w+)\.({})\b", alternation))?)
        };

        let old_prefix = prefix_pattern(&facts.old_package)?;
        let new_prefix = prefix_pattern(&facts.new_package)?;

        Ok(Self {
            facts,
            symbols,
            syntax: ImportSyntax::new()?,
            bare_symbols,
            qualified_symbols,
            old_prefix,
            new_prefix,
        })
    }

    pub fn facts(&self) -> &MoveFacts {
        &self.facts
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn syntax(&self) -> &ImportSyntax {
        &self.syntax
    }

    /// Rewrites `text` according to how its file relates to the move.
    ///
    /// External test packages (`package x_test`) import the package under
    /// test like any other client, so they are always treated as importers.
    pub fn rewrite(&self, relationship: FileRelationship, text: &str) -> String {
        match relationship {
            FileRelationship::IsMovedFile => strategies::moved_file(self, text),
            FileRelationship::SameDirectory | FileRelationship::TargetDirectory
                if self.is_external_test(text) =>
            {
                strategies::other_directory(self, text)
            }
            FileRelationship::SameDirectory => strategies::same_directory(self, text),
            FileRelationship::TargetDirectory => strategies::target_directory(self, text),
            FileRelationship::OtherDirectory => strategies::other_directory(self, text),
        }
    }

    fn is_external_test(&self, text: &str) -> bool {
        self.syntax
            .package_name(text)
            .is_some_and(|name| text[name].ends_with("_test"))
    }
}

fn prefix_pattern(package: &str) -> Result<Option<Regex>> {
    if package.is_empty() {
        return Ok(None);
    }
    Ok(Some(Regex::new(&format!(r"\b{}\.", regex::escape(package)))?))
}

/// Applies `replace` to every match of `pattern` that lies outside
/// `protected` and is not the right-hand side of a selector (`x.Name`).
///
/// `replace` returns `None` to keep a match as is.
fn replace_outside<F>(text: &str, pattern: &Regex, protected: &[Range<usize>], mut replace: F) -> String
where
    F: FnMut(&str, Match<'_>) -> Option<String>,
{
    let mut result = String::with_capacity(text.len());
    let mut pos = 0;

    for m in pattern.find_iter(text) {
        if text[..m.start()].ends_with('.') {
            continue;
        }
        if protected.iter().any(|r| r.contains(&m.start())) {
            continue;
        }
        let Some(replacement) = replace(text, m) else {
            continue;
        };

        result.push_str(&text[pos..m.start()]);
        result.push_str(&replacement);
        pos = m.end();
    }

    if pos == 0 {
        return text.to_string();
    }

    result.push_str(&text[pos..]);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn context(symbols: &[&str]) -> RewriteContext {
        let facts = MoveFacts::new(
            Path::new("/p"),
            "m",
            Path::new("/p/a/foo.go"),
            Path::new("/p/b/foo.go"),
        )
        .unwrap();
        let symbols: Vec<String> = symbols.iter().map(|s| s.to_string()).collect();
        RewriteContext::new(facts, &symbols).unwrap()
    }

    #[test]
    fn test_symbols_are_deduplicated() {
        let ctx = context(&["Helper", "Count", "Helper"]);
        assert_eq!(ctx.symbols(), &["Helper".to_string(), "Count".to_string()]);
    }

    #[test]
    fn test_no_symbols_compiles() {
        let ctx = context(&[]);
        assert!(ctx.bare_symbols.is_none());
        assert!(ctx.qualified_symbols.is_none());
        assert!(ctx.old_prefix.is_some());
    }

    #[test]
    fn test_external_test_package_is_an_importer() {
        let ctx = context(&["Helper"]);
        let src = "package a_test\n\nimport \"m/a\"\n\nvar _ = a.Helper\n";
        let out = ctx.rewrite(FileRelationship::SameDirectory, src);
        assert_eq!(out, "package a_test\n\nimport \"m/b\"\n\nvar _ = b.Helper\n");
    }

    #[test]
    fn test_qualified_symbols_capture_any_qualifier() {
        let ctx = context(&["Helper"]);
        let re = ctx.qualified_symbols.as_ref().unwrap();
        let caps = re.captures("x := alias.Helper()").unwrap();
        assert_eq!(&caps[1], "alias");
        assert_eq!(&caps[2], "Helper");
        assert!(re.captures("a.HelperX()").is_none());
    }

    #[test]
    fn test_replace_outside_skips_selectors_and_protected() {
        let pattern = Regex::new(r"\bX\b").unwrap();
        let text = "X y.X X";
        let out = replace_outside(text, &pattern, &[6..7], |_, m| Some(format!("<{}>", m.as_str())));
        assert_eq!(out, "<X> y.X X");
    }

    #[test]
    fn test_replace_outside_prefix_overlapping_symbols() {
        let ctx = context(&["Help", "Helper"]);
        let re = ctx.bare_symbols.as_ref().unwrap();
        let found: Vec<&str> = re.find_iter("Helper() Help()").map(|m| m.as_str()).collect();
        assert_eq!(found, vec!["Helper", "Help"]);
    }
}
