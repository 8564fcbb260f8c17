//! Grammar consistency checks.
//!
//! Lookup in a [`Grammar`] silently lets a later flag win when two flags
//! share an identifier, and a parse result keys flags by name. [`check_grammar`]
//! finds identifier and name collisions and other declaration mistakes
//! before any token is parsed.
//!
//! # Examples
//!
//! ```
//! use parg_core::*;
//!
//! let mut grammar = Grammar::new();
//! grammar.add_global_flag(Flag::new("-b", ValueType::Default));
//! grammar.add_action("sync");
//! assert!(check_grammar(&grammar).is_empty());
//!
//! grammar.add_command(Command::new("deploy").with_flag(Flag::new("-b", ValueType::Int)));
//! assert!(!check_grammar(&grammar).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{Command, Flag, Grammar};

/// Scope label used for global flags in scoped [`GrammarError`]s.
pub const GLOBAL_SCOPE: &str = "<global>";

/// Grammar declaration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    /// A flag has an empty name.
    #[error("flag name cannot be empty")]
    EmptyFlagName,
    /// A flag has no identifiers to match it.
    #[error("flag <{0}> must define at least one identifier")]
    MissingIdentifier(String),
    /// An identifier does not start with `-` or is only `-`.
    #[error("invalid flag identifier format: {0}")]
    InvalidIdentifier(String),
    /// Two flags visible in the same scope share an identifier.
    #[error("duplicate flag identifier {identifier} in scope {scope}")]
    DuplicateIdentifier { identifier: String, scope: String },
    /// Two flags visible in the same scope share a name.
    #[error("duplicate flag name {name} in scope {scope}")]
    DuplicateFlagName { name: String, scope: String },
    /// Two commands share an action.
    #[error("duplicate command action: {0:?}")]
    DuplicateAction(String),
    /// A declared argument has an empty name.
    #[error("argument name cannot be empty in command {0:?}")]
    EmptyArgumentName(String),
}

/// Identifiers and names already visible in a scope.
#[derive(Debug, Clone, Default)]
struct Seen<'a> {
    identifiers: HashSet<&'a str>,
    names: HashSet<&'a str>,
}

impl<'a> Seen<'a> {
    fn of(flags: &'a [Flag]) -> Self {
        let mut seen = Self::default();
        for flag in flags {
            seen.names.insert(flag.name.as_str());
            seen.identifiers.extend(flag.identifiers.iter().map(String::as_str));
        }
        seen
    }
}

/// Checks a grammar for declaration mistakes.
///
/// Global flags are checked once on their own. Each command's flags are then
/// checked against the global identifiers and names, since both are visible
/// while that command is parsed. Checking stops at the first error in each
/// scope.
pub fn check_grammar(grammar: &Grammar) -> Vec<GrammarError> {
    let mut errors = Vec::new();

    errors.extend(check_flags(grammar.global_flags.iter(), GLOBAL_SCOPE, Seen::default()));

    let globals = Seen::of(&grammar.global_flags);
    let mut actions: HashSet<&str> = HashSet::new();
    for command in &grammar.allowed_commands {
        if !actions.insert(command.action.as_str()) {
            errors.push(GrammarError::DuplicateAction(command.action.clone()));
            continue;
        }
        errors.extend(check_command(command, globals.clone()));
    }

    errors
}

fn check_command<'a>(command: &'a Command, globals: Seen<'a>) -> Option<GrammarError> {
    if command.arguments.iter().any(|arg| arg.name.trim().is_empty()) {
        return Some(GrammarError::EmptyArgumentName(command.action.clone()));
    }

    check_flags(command.flags.values(), &scope_label(command), globals)
}

fn scope_label(command: &Command) -> String {
    if command.action.is_empty() {
        "<no command>".to_string()
    } else {
        command.action.clone()
    }
}

fn check_flags<'a>(
    flags: impl Iterator<Item = &'a Flag>,
    scope: &str,
    mut seen: Seen<'a>,
) -> Option<GrammarError> {
    for flag in flags {
        if flag.name.trim().is_empty() {
            return Some(GrammarError::EmptyFlagName);
        }

        if flag.identifiers.is_empty() {
            return Some(GrammarError::MissingIdentifier(flag.name.clone()));
        }

        for identifier in &flag.identifiers {
            if !identifier.starts_with('-') || identifier.len() < 2 {
                return Some(GrammarError::InvalidIdentifier(identifier.clone()));
            }
            if !seen.identifiers.insert(identifier.as_str()) {
                return Some(GrammarError::DuplicateIdentifier {
                    identifier: identifier.clone(),
                    scope: scope.to_string(),
                });
            }
        }

        if !seen.names.insert(flag.name.as_str()) {
            return Some(GrammarError::DuplicateFlagName {
                name: flag.name.clone(),
                scope: scope.to_string(),
            });
        }
    }

    None
}
