//! Top-level declaration scanner.
//!
//! A line-oriented two-state machine, not a parser:
//!
//! ```text
//! func Helper() {}      // Helper
//! var Count = 1         // Count
//! const (               // enters a block
//!     Red = iota        // Red
//!     Green             // Green
//! )                     // leaves the block
//! ```
//!
//! ## Blind spots
//!
//! - Methods (`func (r T) Name()`) never match, so they are not collected
//! - Only one level of block nesting is tracked
//! - The closing `)` must sit in column zero
//! - `A, B = 1, 2` inside a block only yields `A`

use crate::error::Result;
use regex::Regex;

/// Names that Go code can never refer to, so qualifying them is always wrong.
const UNREFERENCEABLE: &[&str] = &["_", "init"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Outside,
    InBlock,
}

/// Returns the top-level names declared in `content`, in source order.
///
/// Duplicates are kept; callers that compile per-symbol patterns dedupe.
pub fn extract_symbols(content: &str) -> Result<Vec<String>> {
    let single = Regex::new(r"^(func|var|const|type)\s+(\w+)")?;
    let block_start = Regex::new(r"^(var|const|type)\s*\(")?;
    let block_end = Regex::new(r"^\)")?;
    let block_item = Regex::new(r"^\s*(\w+)")?;

    let mut state = ScanState::Outside;
    let mut symbols = Vec::new();

    for line in content.lines() {
        let found = match state {
            ScanState::InBlock => {
                if block_end.is_match(line) {
                    state = ScanState::Outside;
                    None
                } else {
                    block_item.captures(line).map(|caps| caps[1].to_string())
                }
            }
            ScanState::Outside => {
                if let Some(caps) = single.captures(line) {
                    Some(caps[2].to_string())
                } else {
                    if block_start.is_match(line) {
                        state = ScanState::InBlock;
                    }
                    None
                }
            }
        };

        if let Some(name) = found {
            if UNREFERENCEABLE.contains(&name.as_str()) {
                log::trace!("Ignoring unreferenceable declaration '{}'", name);
                continue;
            }
            symbols.push(name);
        }
    }

    log::debug!("Extracted {} top-level symbols", symbols.len());
    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_declarations() {
        let src = "package a\n\nfunc Helper() {}\nvar Count = 1\nconst Max = 3\ntype Config struct{}\n";
        assert_eq!(
            extract_symbols(src).unwrap(),
            vec!["Helper", "Count", "Max", "Config"]
        );
    }

    #[test]
    fn test_block_members() {
        let src = "package a\n\nconst (\n\tRed = iota\n\tGreen\n\n\t// comment\n)\n\nvar (\n\tname string\n)\n";
        assert_eq!(extract_symbols(src).unwrap(), vec!["Red", "Green", "name"]);
    }

    #[test]
    fn test_block_close_returns_to_outside() {
        let src = "type (\n\tA int\n)\nfunc After() {}\n";
        assert_eq!(extract_symbols(src).unwrap(), vec!["A", "After"]);
    }

    #[test]
    fn test_methods_are_not_collected() {
        let src = "type T struct{}\n\nfunc (t T) Method() {}\nfunc (t *T) Other() {}\n";
        assert_eq!(extract_symbols(src).unwrap(), vec!["T"]);
    }

    #[test]
    fn test_function_bodies_are_ignored() {
        let src = "func Run() {\n\tvar local = 1\n\tconst inner = 2\n}\n";
        assert_eq!(extract_symbols(src).unwrap(), vec!["Run"]);
    }

    #[test]
    fn test_blank_identifier_and_init_skipped() {
        let src = "var _ = fmt.Sprintf\nfunc init() {}\nfunc Keep() {}\n";
        assert_eq!(extract_symbols(src).unwrap(), vec!["Keep"]);
    }

    #[test]
    fn test_indented_close_keeps_block_open() {
        // Known limitation: the close paren must be in column zero.
        let src = "var (\n\tA = 1\n  )\nfunc B() {}\n";
        assert_eq!(extract_symbols(src).unwrap(), vec!["A", "func"]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let src = "package a\r\n\r\nfunc Helper() {}\r\n";
        assert_eq!(extract_symbols(src).unwrap(), vec!["Helper"]);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let src = "var X = 1\nvar X = 2\n";
        assert_eq!(extract_symbols(src).unwrap(), vec!["X", "X"]);
    }
}
