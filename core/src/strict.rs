//! Grammar-driven token classification.
//!
//! [`Grammar::validate`] walks the tokens left to right and classifies each
//! one as a flag, a flag value, the action, or a positional argument, using
//! the declared grammar to resolve ambiguity. Any token the grammar does not
//! account for rejects the whole parse.
//!
//! A bare token that follows a value-taking flag before any action is known
//! is ambiguous when it also names a command. It is taken as the flag's
//! value only if a later token names a command too; otherwise it becomes
//! the action and the flag is left without a value. Such a flag reports
//! [`is_set`](crate::Command::is_set), but its typed getters return `None`
//! and [`bool_flag`](crate::Command::bool_flag) reads `false`. Two
//! value-less flags stacked before the command can still be misattributed
//! by this rule.
//!
//! Result flags are keyed by name. A token that resolves to a different
//! declaration than an earlier flag with the same name is rejected with
//! [`ParseError::ConflictingFlag`].

use std::collections::HashMap;
use std::collections::btree_map::Entry;

use tracing::debug;

use crate::error::{ParseError, Result};
use crate::{Argument, Command, Flag, Grammar, ValueType};

impl Grammar {
    /// Parses `argv` against this grammar. Index 0 (the program name) is
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParseError`] encountered; no partial command is
    /// produced.
    ///
    /// # Examples
    ///
    /// ```
    /// use parg_core::{Command, Flag, Grammar, ParseError, ValueType};
    ///
    /// let mut grammar = Grammar::new();
    /// grammar.add_global_flag(Flag::new("-b", ValueType::Int));
    /// grammar.add_command(Command::new("sync"));
    ///
    /// let cmd = grammar.validate(&["prog", "sync", "-b", "5"]).unwrap();
    /// assert_eq!(cmd.int_flag("-b"), Some(5));
    ///
    /// let err = grammar.validate(&["prog", "deploy"]).unwrap_err();
    /// assert_eq!(err, ParseError::InvalidCommand("deploy".into()));
    /// ```
    pub fn validate<S: AsRef<str>>(&self, argv: &[S]) -> Result<Command> {
        let tokens: Vec<&str> = argv.iter().skip(1).map(AsRef::as_ref).collect();
        let mut validation = Validation::new(self);

        for (index, token) in tokens.iter().enumerate() {
            validation.accept(token, &tokens[index + 1..])?;
        }

        validation.finish()
    }
}

/// A flag currently collecting trailing values.
struct OpenFlag {
    name: String,
    consumed: usize,
}

struct Validation<'g> {
    grammar: &'g Grammar,
    command: Option<&'g Command>,
    allowed_flags: HashMap<&'g str, &'g Flag>,
    open: Option<OpenFlag>,
    result: Command,
}

impl<'g> Validation<'g> {
    fn new(grammar: &'g Grammar) -> Self {
        Self {
            grammar,
            command: None,
            allowed_flags: grammar.flag_table(grammar.fallback_command()),
            open: None,
            result: Command::default(),
        }
    }

    fn accept(&mut self, token: &str, rest: &[&str]) -> Result<()> {
        if token.starts_with('-') {
            return self.accept_flag(token);
        }

        if let Some(open) = self.open.take() {
            if self.result.action.is_empty() && self.grammar.declares_action(token) {
                let later_action = rest.iter().any(|later| self.grammar.declares_action(later));
                if !later_action {
                    debug!(flag = %open.name, action = token, "Closing flag for command");
                    return self.accept_bare(token);
                }
            }

            let flag = self
                .result
                .flags
                .get_mut(&open.name)
                .ok_or_else(|| ParseError::InvalidFlag(open.name.clone()))?;
            match flag.parse(token) {
                Ok(()) => {
                    debug!(flag = %open.name, value = token, "Flag value");
                    self.open = Some(OpenFlag {
                        consumed: open.consumed + 1,
                        ..open
                    });
                    return Ok(());
                }
                Err(err) if open.consumed == 0 => return Err(err),
                Err(err) => {
                    debug!(flag = %open.name, token, reason = %err, "Flag satisfied");
                }
            }
        }

        self.accept_bare(token)
    }

    fn accept_flag(&mut self, token: &str) -> Result<()> {
        let Some(&declared) = self.allowed_flags.get(token) else {
            return Err(ParseError::InvalidFlag(token.to_string()));
        };

        let flag = match self.result.flags.entry(declared.name.clone()) {
            Entry::Vacant(slot) => slot.insert(declared.declaration()),
            Entry::Occupied(slot) if slot.get().same_declaration(declared) => slot.into_mut(),
            Entry::Occupied(_) => {
                return Err(ParseError::ConflictingFlag {
                    name: declared.name.clone(),
                    identifier: token.to_string(),
                });
            }
        };

        if declared.value_type == ValueType::Bool {
            flag.parse(token)?;
            self.open = None;
        } else {
            self.open = Some(OpenFlag {
                name: declared.name.clone(),
                consumed: 0,
            });
        }
        debug!(identifier = token, flag = %declared.name, "Flag");
        Ok(())
    }

    fn accept_bare(&mut self, token: &str) -> Result<()> {
        if self.result.action.is_empty() {
            return self.accept_action(token);
        }

        let Some(command) = self.command else {
            return Err(ParseError::InvalidCommand(self.result.action.clone()));
        };

        if command.is_variadic() {
            match self.result.arguments.last_mut() {
                Some(previous) if previous.value_type == ValueType::Strings => {
                    previous.parse(token)?;
                }
                _ => self.result.arguments.push(Argument::observed(token)),
            }
            debug!(argument = token, "Variadic argument");
            return Ok(());
        }

        let bound = self.result.arguments.len();
        if let Some(slot) = command.arguments.get(bound) {
            let mut argument = Argument {
                value: None,
                ..slot.clone()
            };
            argument.parse(token)?;
            debug!(argument = %argument.name, value = token, "Argument");
            self.result.arguments.push(argument);
            return Ok(());
        }

        match self.result.arguments.last_mut() {
            Some(last) if last.value_type.is_multi_valued() => last.parse(token),
            _ => Err(ParseError::ArgumentCountExceeded {
                action: command.action.clone(),
                argument: token.to_string(),
                limit: command.arguments.len(),
            }),
        }
    }

    fn accept_action(&mut self, token: &str) -> Result<()> {
        match self.grammar.resolve_command(token) {
            Some(command) => {
                debug!(action = token, "Command");
                self.result.action = command.action.clone();
                self.command = Some(command);
                self.allowed_flags = self.grammar.flag_table(Some(command));
                Ok(())
            }
            None if token.is_empty() && self.grammar.allowed_commands.is_empty() => Ok(()),
            None => Err(ParseError::InvalidCommand(token.to_string())),
        }
    }

    fn finish(self) -> Result<Command> {
        let action = self.result.action.as_str();
        if !self.grammar.permits_action(action) {
            return Err(ParseError::InvalidCommand(action.to_string()));
        }

        if let Some(command) = self.command.filter(|_| !action.is_empty()) {
            let bound = self.result.arguments.len();
            if let Some(missing) = command
                .arguments
                .iter()
                .skip(bound)
                .find(|slot| slot.required)
            {
                return Err(ParseError::MissingArgument {
                    action: action.to_string(),
                    argument: missing.name.clone(),
                });
            }
        }

        debug!(
            action,
            arguments = self.result.arguments.len(),
            flags = self.result.flags.len(),
            "Parsed against grammar"
        );
        Ok(self.result)
    }
}
