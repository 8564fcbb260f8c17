//! Command-line token classification.
//!
//! This crate turns a raw argument vector shaped like
//! `<program> [global-flags] <command> [arguments] [flags]` into a
//! [`Command`]: an action name, positional [`Argument`]s, and named
//! [`Flag`]s with typed [`Value`]s.
//!
//! Two entry points classify the same tokens:
//!
//! - [`simple_parse`]: zero-configuration heuristic grouping that never
//!   fails.
//! - [`Grammar::validate`]: strict classification against declared
//!   commands, flags and argument types, returning a [`ParseError`] for any
//!   token the grammar does not account for.
//!
//! Grammars are built in code or loaded from JSON/YAML
//! ([`Grammar::load`]), and can be checked for identifier collisions with
//! [`check_grammar`]. The [`default`] module keeps a per-thread grammar for
//! programs that declare one grammar up front.
//!
//! # Example
//!
//! ```
//! use parg_core::*;
//!
//! let mut grammar = Grammar::new();
//! grammar.add_global_flag(Flag::new("-i", ValueType::Strings).with_identifier("-include"));
//! grammar.add_global_flag(Flag::boolean("-name-only"));
//! grammar.add_action("sync");
//!
//! let argv = ["gomu", "-include", "hatchify", "-name-only", "sync", "mod-common", "-i", "vroomy"];
//! let cmd = grammar.validate(&argv).unwrap();
//!
//! assert_eq!(cmd.action, "sync");
//! assert_eq!(cmd.arguments[0].name, "mod-common");
//! assert_eq!(cmd.strings_flag("-i").unwrap(), ["hatchify", "vroomy"]);
//! assert!(cmd.bool_flag("-name-only"));
//! ```

mod check;
mod config;
pub mod default;
mod error;
mod grammar;
mod simple;
mod strict;
mod types;
mod value;

pub use check::{GLOBAL_SCOPE, GrammarError, check_grammar};
pub use error::{ConfigError, ParseError, Result};
pub use grammar::Grammar;
pub use simple::simple_parse;
pub use types::*;
