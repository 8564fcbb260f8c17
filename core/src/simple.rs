//! Grammar-free heuristic parsing.
//!
//! [`simple_parse`] groups tokens with fixed positional rules:
//!
//! 1. every `-token` opens a flag;
//! 2. the first bare token not claimed by a flag is the action;
//! 3. bare tokens after a flag are that flag's values, except that while no
//!    action has been seen a flag keeps only its first value and the next
//!    bare token becomes the action;
//! 4. repeated flags are merged, and remaining bare tokens are arguments.
//!
//! A flag with no values is boolean, one value is a string, two or more
//! values are a string list. Parsing never fails.
//!
//! Boolean flags written directly before the action, and multi-value flags
//! written before the action, are misattributed by these rules. Declare a
//! [`Grammar`](crate::Grammar) for those shapes.

use std::collections::BTreeMap;

use tracing::debug;

use crate::{Argument, Command, Flag, Value, ValueType};

/// Parses `argv` without a grammar. Index 0 (the program name) is skipped.
///
/// # Examples
///
/// ```
/// use parg_core::simple_parse;
///
/// let cmd = simple_parse(&["gomu", "sync", "mod-common", "-i", "hatchify", "vroomy"]);
/// assert_eq!(cmd.action, "sync");
/// assert_eq!(cmd.arguments[0].name, "mod-common");
/// assert_eq!(cmd.strings_flag("-i").unwrap(), ["hatchify", "vroomy"]);
/// ```
pub fn simple_parse<S: AsRef<str>>(argv: &[S]) -> Command {
    let mut command = Command::default();
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();

    let mut current: Option<String> = None;
    let mut got_trailing = false;

    for token in argv.iter().skip(1).map(AsRef::as_ref) {
        if token.starts_with('-') {
            debug!(flag = token, "Opening flag");
            grouped.entry(token.to_string()).or_default();
            current = Some(token.to_string());
            got_trailing = false;
            continue;
        }

        if got_trailing && command.action.is_empty() {
            // Flag already has a value; this token is the command.
            current = None;
        }

        match &current {
            Some(flag) => {
                debug!(flag = %flag, value = token, "Flag value");
                grouped.entry(flag.clone()).or_default().push(token.to_string());
                got_trailing = true;
            }
            None if command.action.is_empty() => {
                debug!(action = token, "Command");
                command.action = token.to_string();
            }
            None => {
                debug!(argument = token, "Argument");
                command.arguments.push(Argument::observed(token));
            }
        }
    }

    for (identifier, mut values) in grouped {
        let (value_type, value) = match values.len() {
            0 => (ValueType::Bool, Value::Bool(true)),
            1 => (ValueType::Default, Value::Str(values.swap_remove(0))),
            _ => (ValueType::Strings, Value::Strings(values)),
        };
        let flag = Flag {
            name: identifier.clone(),
            identifiers: vec![identifier.clone()],
            value_type,
            value: Some(value),
        };
        command.flags.insert(identifier, flag);
    }

    debug!(
        action = %command.action,
        arguments = command.arguments.len(),
        flags = command.flags.len(),
        "Parsed without grammar"
    );
    command
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(input: &str) -> Vec<&str> {
        input.split(' ').collect()
    }

    #[test]
    fn test_program_name_only() {
        let cmd = simple_parse(&split("gomo"));
        assert_eq!(cmd, Command::default());
    }

    #[test]
    fn test_cmd_arg_flag() {
        let cmd = simple_parse(&split("gomu sync mod-common -i hatchify"));

        assert_eq!(cmd.action, "sync");
        assert_eq!(cmd.arguments, vec![Argument::observed("mod-common")]);
        let flag = cmd.flag("-i").unwrap();
        assert_eq!(flag.identifiers, vec!["-i"]);
        assert_eq!(flag.value_type, ValueType::Default);
        assert_eq!(flag.value, Some(Value::Str("hatchify".into())));
    }

    #[test]
    fn test_flag_values_promote_to_list() {
        let cmd = simple_parse(&split("gomu sync -i hatchify vroomy"));

        assert_eq!(cmd.action, "sync");
        assert!(cmd.arguments.is_empty());
        let flag = cmd.flag("-i").unwrap();
        assert_eq!(flag.value_type, ValueType::Strings);
        assert_eq!(
            flag.value,
            Some(Value::Strings(vec!["hatchify".into(), "vroomy".into()]))
        );
    }

    #[test]
    fn test_flag_before_command() {
        let cmd = simple_parse(&split("gomu -i hatchify sync mod-common"));

        assert_eq!(cmd.action, "sync");
        assert_eq!(cmd.arguments, vec![Argument::observed("mod-common")]);
        assert_eq!(cmd.string_flag("-i"), Some("hatchify"));
    }

    #[test]
    fn test_bool_flag_before_value_flag() {
        let cmd = simple_parse(&split("gomu -name-only -i hatchify sync mod-common"));

        assert_eq!(cmd.action, "sync");
        assert_eq!(cmd.arguments.len(), 1);
        assert_eq!(cmd.flags.len(), 2);
        assert!(cmd.bool_flag("-name-only"));
        assert_eq!(cmd.flag("-name-only").unwrap().value_type, ValueType::Bool);
        assert_eq!(cmd.string_flag("-i"), Some("hatchify"));
    }

    #[test]
    fn test_repeated_flag_merges_in_order() {
        let cmd = simple_parse(&split("gomu -i hatchify sync -i vroomy"));

        assert_eq!(cmd.action, "sync");
        assert!(cmd.arguments.is_empty());
        assert_eq!(cmd.strings_flag("-i").unwrap(), ["hatchify", "vroomy"]);
    }

    #[test]
    fn test_trailing_flag_without_values_is_bool() {
        let cmd = simple_parse(&split("gomu sync parg -v"));

        assert_eq!(cmd.arguments, vec![Argument::observed("parg")]);
        assert!(cmd.bool_flag("-v"));
    }

    #[test]
    fn test_full_mix() {
        let cmd = simple_parse(&split(
            "gomu -name-only -i hatchify deploy mod-common simply -b JIRA-Ticket -i vroomy test-org",
        ));

        assert_eq!(cmd.action, "deploy");
        assert_eq!(
            cmd.arguments,
            vec![Argument::observed("mod-common"), Argument::observed("simply")]
        );
        assert!(cmd.bool_flag("-name-only"));
        assert_eq!(cmd.string_flag("-b"), Some("JIRA-Ticket"));
        assert_eq!(
            cmd.strings_flag("-i").unwrap(),
            ["hatchify", "vroomy", "test-org"]
        );
    }

    #[test]
    fn test_parse_is_deterministic() {
        let argv = split("gomu -name-only -i hatchify sync mod-common -i vroomy");
        assert_eq!(simple_parse(&argv), simple_parse(&argv));
    }
}
