//! A default grammar for programs that declare one grammar up front.
//!
//! The default [`Grammar`] is created empty on first use and lives for the
//! current thread. Programs that need more than one grammar, or parse on
//! several threads, should own a [`Grammar`] value instead.
//!
//! # Examples
//!
//! ```
//! use parg_core::{Flag, ValueType, default};
//!
//! default::add_global_flag(Flag::new("-b", ValueType::Default));
//! default::add_action("sync");
//!
//! let cmd = default::validate_args(&["prog", "sync", "-b", "main"]).unwrap();
//! assert_eq!(cmd.string_flag("-b"), Some("main"));
//! ```

use std::cell::RefCell;
use std::ffi::OsString;

use crate::error::Result;
use crate::{Command, Flag, Grammar, simple_parse};

thread_local! {
    static DEFAULT_GRAMMAR: RefCell<Grammar> = RefCell::new(Grammar::new());
}

/// Runs `f` with mutable access to the default grammar.
pub fn with_grammar<T>(f: impl FnOnce(&mut Grammar) -> T) -> T {
    DEFAULT_GRAMMAR.with(|grammar| f(&mut grammar.borrow_mut()))
}

/// Appends an allowed optional flag for all commands.
pub fn add_global_flag(flag: Flag) {
    with_grammar(|grammar| grammar.add_global_flag(flag));
}

/// Overwrites the allowed global flags.
pub fn set_global_flags(flags: Vec<Flag>) {
    with_grammar(|grammar| grammar.set_global_flags(flags));
}

/// Appends an allowed command.
pub fn add_command(command: Command) {
    with_grammar(|grammar| grammar.add_command(command));
}

/// Overwrites the allowed commands.
pub fn set_commands(commands: Vec<Command>) {
    with_grammar(|grammar| grammar.set_commands(commands));
}

/// Appends an allowed command with no declared arguments or flags.
pub fn add_action(action: &str) {
    with_grammar(|grammar| grammar.add_action(action));
}

/// Clears the default grammar.
pub fn reset() {
    with_grammar(|grammar| *grammar = Grammar::new());
}

/// Validates the process arguments against the default grammar.
pub fn validate() -> Result<Command> {
    validate_args(&process_args())
}

/// Validates `argv` against the default grammar.
pub fn validate_args<S: AsRef<str>>(argv: &[S]) -> Result<Command> {
    with_grammar(|grammar| grammar.validate(argv))
}

/// Parses the process arguments without a grammar.
pub fn simple() -> Command {
    simple_args(&process_args())
}

/// Parses `argv` without a grammar.
pub fn simple_args<S: AsRef<str>>(argv: &[S]) -> Command {
    simple_parse(argv)
}

/// Process arguments, with invalid UTF-8 replaced rather than panicking.
fn process_args() -> Vec<String> {
    lossy_args(std::env::args_os())
}

fn lossy_args(args: impl Iterator<Item = OsString>) -> Vec<String> {
    args.map(|arg| arg.to_string_lossy().into_owned()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ParseError, ValueType};

    #[test]
    fn test_default_grammar_is_per_thread() {
        reset();
        add_action("sync");
        assert!(validate_args(&["gomu", "sync"]).is_ok());

        let other = std::thread::spawn(|| validate_args(&["gomu", "sync"]))
            .join()
            .unwrap();
        assert_eq!(other, Err(ParseError::InvalidCommand("sync".into())));
    }

    #[test]
    fn test_set_and_reset() {
        reset();
        set_global_flags(vec![Flag::new("-n", ValueType::Int)]);
        set_commands(vec![Command::new("count")]);
        add_command(Command::new("list"));

        let cmd = validate_args(&["gomu", "list", "-n", "3"]).unwrap();
        assert_eq!(cmd.int_flag("-n"), Some(3));

        reset();
        assert!(validate_args(&["gomu", "list"]).is_err());
    }

    #[test]
    fn test_simple_args() {
        let cmd = simple_args(&["gomu", "sync", "-i", "hatchify"]);
        assert_eq!(cmd.action, "sync");
        assert_eq!(cmd.string_flag("-i"), Some("hatchify"));
    }

    #[cfg(unix)]
    #[test]
    fn test_invalid_utf8_args_are_replaced() {
        use std::os::unix::ffi::OsStringExt;

        let args = vec![
            OsString::from("gomu"),
            OsString::from_vec(vec![b's', 0xff, b'c']),
        ];
        let argv = lossy_args(args.into_iter());
        assert_eq!(argv, ["gomu", "s\u{fffd}c"]);
        assert_eq!(simple_args(&argv).action, "s\u{fffd}c");
    }

    #[test]
    fn test_process_args_include_program() {
        assert!(!process_args().is_empty());
    }
}
