//! Import clause scanning and editing.
//!
//! Recognizes the two import forms Go allows, by regex over the raw text:
//!
//! ```go
//! import "fmt"                 // single-line, optionally aliased
//! import (                     // parenthesized block, one spec per line
//!     "os"
//!     str "strings"
//! )
//! ```
//!
//! Edits are byte-range splices so everything outside the touched specs is
//! preserved exactly. A `)` inside a comment within a block ends the block
//! early; that is a known blind spot.

use crate::error::Result;
use regex::Regex;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseKind {
    Block,
    Single,
}

/// One imported package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    pub alias: Option<String>,
    pub path: String,
    /// The quoted path, quotes included.
    pub quoted: Range<usize>,
    /// The whole line holding the spec, trailing newline included.
    pub line: Range<usize>,
}

impl ImportSpec {
    /// The name the importing file uses for this package, if not the default.
    ///
    /// Returns `None` for plain imports; `Some("_")` or `Some(".")` for blank
    /// and dot imports.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportClause {
    pub kind: ClauseKind,
    /// From `import` to the closing `)` (block) or end of line (single).
    pub span: Range<usize>,
    pub specs: Vec<ImportSpec>,
}

/// Outcome of [`ImportSyntax::replace_import`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportRewrite {
    /// Specs whose path changed (or that were dropped as duplicates).
    pub replaced: usize,
    /// How many of those used the package's default name.
    pub unaliased: usize,
}

/// Compiled patterns for package and import clauses.
#[derive(Debug)]
pub struct ImportSyntax {
    package: Regex,
    block: Regex,
    single: Regex,
    spec: Regex,
}

impl ImportSyntax {
    pub fn new() -> Result<Self> {
        Ok(Self {
            package: Regex::new(r"(?m)^package[ \t]+(\w+)")?,
            block: Regex::new(r"(?ms)^import[ \t]*\((.*?)\)")?,
            single: Regex::new(r#"(?m)^import[ \t]+(?:([\w.]+)[ \t]+)?["`]([^"`\n]*)["`][^\n]*\n?"#)?,
            spec: Regex::new(r#"^[ \t]*(?:([\w.]+)[ \t]+)?["`]([^"`\n]*)["`]"#)?,
        })
    }

    /// Byte range of the package name in the first `package` clause.
    pub fn package_name(&self, text: &str) -> Option<Range<usize>> {
        self.package
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.range())
    }

    /// All import clauses in source order.
    pub fn clauses(&self, text: &str) -> Vec<ImportClause> {
        let mut clauses = Vec::new();

        for caps in self.block.captures_iter(text) {
            let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
                continue;
            };

            let mut specs = Vec::new();
            let mut offset = body.start();
            for line in body.as_str().split_inclusive('\n') {
                if let Some(spec) = self.parse_spec(line, offset) {
                    specs.push(spec);
                }
                offset += line.len();
            }

            clauses.push(ImportClause {
                kind: ClauseKind::Block,
                span: whole.range(),
                specs,
            });
        }

        for caps in self.single.captures_iter(text) {
            let (Some(whole), Some(path)) = (caps.get(0), caps.get(2)) else {
                continue;
            };

            let spec = ImportSpec {
                alias: caps.get(1).map(|m| m.as_str().to_string()),
                path: path.as_str().to_string(),
                quoted: path.start() - 1..path.end() + 1,
                line: whole.range(),
            };

            clauses.push(ImportClause {
                kind: ClauseKind::Single,
                span: whole.range(),
                specs: vec![spec],
            });
        }

        clauses.sort_by_key(|c| c.span.start);
        clauses
    }

    fn parse_spec(&self, line: &str, offset: usize) -> Option<ImportSpec> {
        let caps = self.spec.captures(line)?;
        let path = caps.get(2)?;

        Some(ImportSpec {
            alias: caps.get(1).map(|m| m.as_str().to_string()),
            path: path.as_str().to_string(),
            quoted: offset + path.start() - 1..offset + path.end() + 1,
            line: offset..offset + line.len(),
        })
    }

    /// Returns the first spec that names `path`.
    pub fn find_import(&self, text: &str, path: &str) -> Option<ImportSpec> {
        self.clauses(text)
            .into_iter()
            .flat_map(|c| c.specs)
            .find(|s| s.path == path)
    }

    /// Adds an import of `path` unless one is already present.
    pub fn add_import(&self, text: &str, path: &str) -> String {
        if self.find_import(text, path).is_some() {
            return text.to_string();
        }
        self.insert_import(text, path)
    }

    /// Inserts a plain import of `path`, even if the path is already imported
    /// under another name.
    ///
    /// Goes into the first parenthesized block if there is one, otherwise
    /// after the last single-line import, otherwise into a new block right
    /// after the package clause. Text without a package clause is returned
    /// unchanged.
    pub fn insert_import(&self, text: &str, path: &str) -> String {
        let clauses = self.clauses(text);

        if let Some(block) = clauses.iter().find(|c| c.kind == ClauseKind::Block) {
            let close = block.span.end - 1;
            let line = if text[..close].ends_with('\n') {
                format!("\t\"{}\"\n", path)
            } else {
                format!("\n\t\"{}\"\n", path)
            };
            return splice(text, close..close, &line);
        }

        if let Some(single) = clauses.iter().rev().find(|c| c.kind == ClauseKind::Single) {
            let at = single.span.end;
            let line = if text[..at].ends_with('\n') {
                format!("import \"{}\"\n", path)
            } else {
                format!("\nimport \"{}\"", path)
            };
            return splice(text, at..at, &line);
        }

        match self.package_name(text) {
            Some(name) => {
                let eol = line_end(text, name.end);
                let clause = format!("\n\nimport (\n\t\"{}\"\n)", path);
                splice(text, eol..eol, &clause)
            }
            None => text.to_string(),
        }
    }

    /// Removes every import spec naming `path`.
    ///
    /// A block left without specs is removed entirely, together with the
    /// blank line that separated it from the preceding code.
    pub fn remove_import(&self, text: &str, path: &str) -> String {
        let mut cuts: Vec<Range<usize>> = Vec::new();

        for clause in self.clauses(text) {
            let (matched, kept): (Vec<_>, Vec<_>) =
                clause.specs.iter().partition(|s| s.path == path);

            if matched.is_empty() {
                continue;
            }

            match clause.kind {
                ClauseKind::Single => cuts.push(whole_clause(text, &clause.span)),
                ClauseKind::Block => {
                    if kept.is_empty() && block_is_empty_without(text, &clause, &matched) {
                        cuts.push(whole_clause(text, &clause.span));
                    } else {
                        cuts.extend(matched.iter().map(|s| s.line.clone()));
                    }
                }
            }
        }

        cut_ranges(text, cuts)
    }

    /// Rewrites every import of `old` to `new`.
    ///
    /// When the file already imports `new`, the `old` specs are dropped
    /// instead so the package is not imported twice.
    pub fn replace_import(&self, text: &str, old: &str, new: &str) -> (String, ImportRewrite) {
        let specs: Vec<ImportSpec> = self
            .clauses(text)
            .into_iter()
            .flat_map(|c| c.specs)
            .collect();

        let matched: Vec<&ImportSpec> = specs.iter().filter(|s| s.path == old).collect();
        if matched.is_empty() || old == new {
            return (text.to_string(), ImportRewrite::default());
        }

        let stats = ImportRewrite {
            replaced: matched.len(),
            unaliased: matched.iter().filter(|s| s.alias.is_none()).count(),
        };

        if specs.iter().any(|s| s.path == new) {
            return (self.remove_import(text, old), stats);
        }

        let quoted = format!("\"{}\"", new);
        let mut result = text.to_string();
        for spec in matched.iter().rev() {
            result.replace_range(spec.quoted.clone(), &quoted);
        }

        (result, stats)
    }

    /// Ranges where identifier rewrites must not apply: the package clause
    /// and every import clause.
    pub fn protected_spans(&self, text: &str) -> Vec<Range<usize>> {
        let mut spans: Vec<Range<usize>> =
            self.clauses(text).into_iter().map(|c| c.span).collect();

        if let Some(name) = self.package_name(text) {
            spans.push(line_start(text, name.start)..name.end);
        }

        spans
    }
}

fn block_is_empty_without(text: &str, clause: &ImportClause, removed: &[&ImportSpec]) -> bool {
    let open = text[clause.span.clone()].find('(').map(|i| clause.span.start + i + 1);
    let Some(body_start) = open else {
        return false;
    };
    let body_end = clause.span.end - 1;

    let mut remaining = String::new();
    let mut pos = body_start;
    for spec in removed {
        let start = spec.line.start.max(pos);
        remaining.push_str(&text[pos..start]);
        pos = spec.line.end.max(pos);
    }
    if pos < body_end {
        remaining.push_str(&text[pos..body_end]);
    }

    remaining.trim().is_empty()
}

/// Extends a clause span over its trailing newline, and over one preceding
/// blank line when a blank line (or the end of the file) follows.
fn whole_clause(text: &str, span: &Range<usize>) -> Range<usize> {
    let mut start = span.start;
    let mut end = span.end;

    if !text[..end].ends_with('\n') && text[end..].starts_with('\n') {
        end += 1;
    }
    if text[..start].ends_with("\n\n") && (end == text.len() || text[end..].starts_with('\n')) {
        start -= 1;
    }

    start..end
}

fn cut_ranges(text: &str, mut cuts: Vec<Range<usize>>) -> String {
    if cuts.is_empty() {
        return text.to_string();
    }

    cuts.sort_by_key(|r| r.start);
    let mut result = String::with_capacity(text.len());
    let mut pos = 0;
    for cut in cuts {
        if cut.start < pos {
            continue;
        }
        result.push_str(&text[pos..cut.start]);
        pos = cut.end;
    }
    result.push_str(&text[pos..]);
    result
}

fn splice(text: &str, at: Range<usize>, insert: &str) -> String {
    let mut result = text.to_string();
    result.replace_range(at, insert);
    result
}

fn line_end(text: &str, from: usize) -> usize {
    text[from..].find('\n').map_or(text.len(), |i| from + i)
}

fn line_start(text: &str, from: usize) -> usize {
    text[..from].rfind('\n').map_or(0, |i| i + 1)
}
