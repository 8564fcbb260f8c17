//! The grammar registry: allowed commands and global flags.
//!
//! A [`Grammar`] is built once by the calling program and then only read by
//! [`Grammar::validate`](crate::Grammar::validate). Lookup tables are
//! flattened on demand: every identifier of every in-scope flag maps to that
//! flag, and every command maps from its action.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{Command, Flag};

/// Declared commands and global flags for strict parsing.
///
/// An empty `allowed_commands` list means no command token is permitted.
/// A command with an empty action means the program may also run without
/// any command, and its flags apply before a command token is seen.
///
/// # Examples
///
/// ```
/// use parg_core::{Command, Flag, Grammar, ValueType};
///
/// let mut grammar = Grammar::new();
/// grammar.add_global_flag(Flag::boolean("-name-only"));
/// grammar.add_command(Command::new("sync").with_flag(Flag::new("-b", ValueType::Default)));
///
/// assert!(grammar.resolve_command("sync").is_some());
/// assert!(grammar.resolve_flag("-name-only").is_some());
/// assert!(grammar.resolve_flag("-b").is_none()); // command-scoped
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grammar {
    /// Commands the strict validator accepts
    #[serde(default)]
    pub allowed_commands: Vec<Command>,
    /// Flags accepted with every command
    #[serde(default)]
    pub global_flags: Vec<Flag>,
}

impl Grammar {
    /// Creates a grammar with no commands and no flags.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a flag allowed with every command.
    pub fn add_global_flag(&mut self, flag: Flag) {
        self.global_flags.push(flag);
    }

    /// Replaces all global flags.
    pub fn set_global_flags(&mut self, flags: Vec<Flag>) {
        self.global_flags = flags;
    }

    /// Appends an allowed command.
    pub fn add_command(&mut self, command: Command) {
        self.allowed_commands.push(command);
    }

    /// Replaces all allowed commands.
    pub fn set_commands(&mut self, commands: Vec<Command>) {
        self.allowed_commands = commands;
    }

    /// Appends an allowed command that takes any positionals and no
    /// command-scoped flags.
    pub fn add_action(&mut self, action: &str) {
        self.add_command(Command::new(action));
    }

    /// Builds the action lookup table. Later commands replace earlier ones
    /// with the same action.
    pub fn command_table(&self) -> HashMap<&str, &Command> {
        self.allowed_commands
            .iter()
            .map(|cmd| (cmd.action.as_str(), cmd))
            .collect()
    }

    /// Builds the identifier lookup table for global flags plus the flags of
    /// `scope`, if any.
    ///
    /// On an identifier collision the flag registered last wins; the
    /// collision is logged and reported by [`check_grammar`](crate::check_grammar).
    pub fn flag_table<'a>(&'a self, scope: Option<&'a Command>) -> HashMap<&'a str, &'a Flag> {
        let scoped = scope.into_iter().flat_map(|cmd| cmd.flags.values());
        let mut table: HashMap<&str, &Flag> = HashMap::new();
        for flag in self.global_flags.iter().chain(scoped) {
            for identifier in &flag.identifiers {
                if let Some(previous) = table.insert(identifier.as_str(), flag) {
                    if previous.name != flag.name {
                        warn!(
                            identifier = %identifier,
                            replaced = %previous.name,
                            by = %flag.name,
                            "Flag identifier declared twice"
                        );
                    }
                }
            }
        }
        table
    }

    /// Finds the global flag spelled `identifier`.
    pub fn resolve_flag(&self, identifier: &str) -> Option<&Flag> {
        self.global_flags
            .iter()
            .rev()
            .find(|flag| flag.matches(identifier))
    }

    /// Finds the command for `action`.
    pub fn resolve_command(&self, action: &str) -> Option<&Command> {
        self.allowed_commands
            .iter()
            .rev()
            .find(|cmd| cmd.action == action)
    }

    /// Returns the empty-action entry used before a command token is seen.
    pub fn fallback_command(&self) -> Option<&Command> {
        self.resolve_command("")
    }

    /// Whether a parse may finish with `action` as its command.
    pub fn permits_action(&self, action: &str) -> bool {
        if self.allowed_commands.is_empty() {
            return action.is_empty();
        }
        self.resolve_command(action).is_some()
    }

    /// Whether any declared command is spelled `token`.
    pub(crate) fn declares_action(&self, token: &str) -> bool {
        !token.is_empty() && self.allowed_commands.iter().any(|cmd| cmd.action == token)
    }
}
