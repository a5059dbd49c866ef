//! The four per-relationship text transformations.

use super::{RewriteContext, replace_outside};

/// Renames the package clause of the moved file.
///
/// `package main` stays as is, and an external test package keeps its
/// `_test` suffix. An import of the destination package would now be a
/// self-import, so it is dropped along with its qualifiers.
pub(super) fn moved_file(ctx: &RewriteContext, text: &str) -> String {
    let facts = ctx.facts();
    let mut result = text.to_string();

    if facts.package_changed() && !facts.new_package.is_empty() {
        if let Some(name) = ctx.syntax().package_name(&result) {
            let current = &result[name.clone()];
            let renamed = if current == "main" {
                None
            } else if current.ends_with("_test") {
                Some(format!("{}_test", facts.new_package))
            } else {
                Some(facts.new_package.clone())
            };

            if let Some(renamed) = renamed.filter(|r| r != current) {
                log::debug!("Package clause: {} → {}", current, renamed);
                result.replace_range(name, &renamed);
            }
        }
    }

    if !facts.is_same_directory() {
        if let Some(spec) = ctx.syntax().find_import(&result, &facts.new_import_path) {
            result = ctx.syntax().remove_import(&result, &facts.new_import_path);

            if spec.alias().is_none()
                && let Some(prefix) = &ctx.new_prefix
            {
                let protected = ctx.syntax().protected_spans(&result);
                result = replace_outside(&result, prefix, &protected, |_, _| Some(String::new()));
            }
        }
    }

    result
}

/// Qualifies the moved symbols in a file the moved file has left behind, and
/// imports the destination package when anything was qualified.
///
/// `Name :=` introduces a local that shadows the moved symbol and is left
/// alone, as is anything already written as `x.Name`. An existing import of
/// the destination decides the qualifier: its alias if it has one, nothing at
/// all for a dot import.
pub(super) fn same_directory(ctx: &RewriteContext, text: &str) -> String {
    let facts = ctx.facts();
    let Some(pattern) = &ctx.bare_symbols else {
        return text.to_string();
    };

    let existing = ctx.syntax().find_import(text, &facts.new_import_path);
    let qualifier = match existing.as_ref().and_then(|spec| spec.alias()) {
        Some(".") => return text.to_string(),
        Some("_") | None => facts.new_package.as_str(),
        Some(alias) => alias,
    };

    let protected = ctx.syntax().protected_spans(text);
    let qualified = replace_outside(text, pattern, &protected, |text, m| {
        if text[m.end()..].trim_start().starts_with(":=") {
            return None;
        }
        Some(format!("{}.{}", qualifier, m.as_str()))
    });

    if qualified == text {
        return qualified;
    }

    match existing {
        // A blank import binds no name; the package needs a real import too.
        Some(spec) if spec.alias() == Some("_") => {
            ctx.syntax().insert_import(&qualified, &facts.new_import_path)
        }
        Some(_) => qualified,
        None => ctx.syntax().add_import(&qualified, &facts.new_import_path),
    }
}

/// Drops the old package's qualifier from moved symbols in a file that now
/// shares a package with them, then removes the old import if nothing else
/// still refers to it.
pub(super) fn target_directory(ctx: &RewriteContext, text: &str) -> String {
    let facts = ctx.facts();
    let syntax = ctx.syntax();

    let Some(spec) = syntax.find_import(text, &facts.old_import_path) else {
        return text.to_string();
    };

    // Aliased imports are referenced by their alias, not the directory name.
    let qualifier = match spec.alias() {
        Some("_") | Some(".") => None,
        Some(alias) => Some(alias.to_string()),
        None => Some(facts.old_package.clone()),
    };

    let mut result = text.to_string();

    if let Some(qualifier) = qualifier {
        if let Some(pattern) = &ctx.qualified_symbols {
            let protected = syntax.protected_spans(&result);
            result = replace_outside(&result, pattern, &protected, |_, m| {
                let (prefix, symbol) = m.as_str().split_once('.')?;
                (prefix == qualifier).then(|| symbol.to_string())
            });
        }

        if still_referenced(&result, &qualifier, syntax) {
            log::debug!(
                "Keeping import of {}: '{}.' is still referenced",
                facts.old_import_path,
                qualifier
            );
            return result;
        }
    }

    syntax.remove_import(&result, &facts.old_import_path)
}

/// Points imports of the old package at its new path, and renames the
/// qualifier when the package name changed.
///
/// Qualifiers are only touched in files whose plain (unaliased) import was
/// rewritten, so an unrelated package that happens to share the old name is
/// left alone.
pub(super) fn other_directory(ctx: &RewriteContext, text: &str) -> String {
    let facts = ctx.facts();

    let (mut result, stats) =
        ctx.syntax()
            .replace_import(text, &facts.old_import_path, &facts.new_import_path);

    if stats.replaced > 0 {
        log::debug!(
            "Rewrote {} import(s) of {} ({} unaliased)",
            stats.replaced,
            facts.old_import_path,
            stats.unaliased
        );
    }

    if stats.unaliased == 0 || !facts.package_changed() {
        return result;
    }

    if let Some(prefix) = &ctx.old_prefix {
        let protected = ctx.syntax().protected_spans(&result);
        let replacement = format!("{}.", facts.new_package);
        result = replace_outside(&result, prefix, &protected, |_, _| Some(replacement.clone()));
    }

    result
}

fn still_referenced(text: &str, qualifier: &str, syntax: &super::ImportSyntax) -> bool {
    let Ok(Some(prefix)) = super::prefix_pattern(qualifier) else {
        return false;
    };
    let protected = syntax.protected_spans(text);

    prefix.find_iter(text).any(|m| {
        !text[..m.start()].ends_with('.') && !protected.iter().any(|r| r.contains(&m.start()))
    })
}
