//! Typed value accumulation.
//!
//! Converts one raw token into a [`Value`] for a declared [`ValueType`] and
//! stores it in a flag's or argument's value slot. Single-valued types
//! refuse a second value; multi-valued types append in order of appearance.

use crate::error::{ParseError, Result};
use crate::{Argument, Flag, Value, ValueType};

impl Flag {
    /// Parses `token` into this flag's value slot.
    ///
    /// # Errors
    ///
    /// [`ParseError::RedundantValue`] for a second value on a `Default` or
    /// `Int` flag, [`ParseError::TypeConversion`] for non-numeric text on an
    /// `Int` or `Ints` flag.
    ///
    /// # Examples
    ///
    /// ```
    /// use parg_core::{Flag, Value, ValueType};
    ///
    /// let mut ports = Flag::new("-p", ValueType::Ints);
    /// ports.parse("80").unwrap();
    /// ports.parse("443").unwrap();
    /// assert_eq!(ports.value, Some(Value::Ints(vec![80, 443])));
    /// assert!(ports.parse("http").is_err());
    /// ```
    pub fn parse(&mut self, token: &str) -> Result<()> {
        store(&mut self.value, self.value_type, &self.name, token)
    }
}

impl Argument {
    /// Parses `token` into this argument's value slot.
    ///
    /// Follows the same rules as [`Flag::parse`].
    pub fn parse(&mut self, token: &str) -> Result<()> {
        store(&mut self.value, self.value_type, &self.name, token)
    }
}

fn store(slot: &mut Option<Value>, value_type: ValueType, target: &str, token: &str) -> Result<()> {
    match value_type {
        ValueType::Default => {
            if let Some(existing) = slot {
                return Err(redundant(existing, value_type, target, token));
            }
            *slot = Some(Value::Str(token.to_string()));
        }
        ValueType::Bool => {
            *slot = Some(Value::Bool(true));
        }
        ValueType::Int => {
            if let Some(existing) = slot {
                return Err(redundant(existing, value_type, target, token));
            }
            *slot = Some(Value::Int(parse_int(value_type, target, token)?));
        }
        ValueType::Ints => {
            let n = parse_int(value_type, target, token)?;
            match slot {
                None => *slot = Some(Value::Ints(vec![n])),
                Some(Value::Ints(values)) => values.push(n),
                Some(_) => return Err(conversion(value_type, target, token)),
            }
        }
        ValueType::Strings => match slot {
            None => *slot = Some(Value::Strings(vec![token.to_string()])),
            Some(Value::Strings(values)) => values.push(token.to_string()),
            Some(_) => return Err(conversion(value_type, target, token)),
        },
    }

    Ok(())
}

fn parse_int(value_type: ValueType, target: &str, token: &str) -> Result<i64> {
    token
        .parse::<i64>()
        .map_err(|_| conversion(value_type, target, token))
}

fn redundant(existing: &Value, value_type: ValueType, target: &str, token: &str) -> ParseError {
    ParseError::RedundantValue {
        target: target.to_string(),
        value: token.to_string(),
        existing: existing.to_string(),
        value_type,
    }
}

fn conversion(value_type: ValueType, target: &str, token: &str) -> ParseError {
    ParseError::TypeConversion {
        target: target.to_string(),
        value: token.to_string(),
        value_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rejects_second_value() {
        let mut flag = Flag::new("-b", ValueType::Default);
        flag.parse("JIRA-Ticket").unwrap();

        let err = flag.parse("other").unwrap_err();
        assert_eq!(
            err,
            ParseError::RedundantValue {
                target: "-b".into(),
                value: "other".into(),
                existing: "JIRA-Ticket".into(),
                value_type: ValueType::Default,
            }
        );
        assert_eq!(flag.value, Some(Value::Str("JIRA-Ticket".into())));
    }

    #[test]
    fn test_bool_ignores_token_content() {
        let mut flag = Flag::boolean("-name-only");
        flag.parse("anything").unwrap();
        flag.parse("").unwrap();
        assert_eq!(flag.value, Some(Value::Bool(true)));
    }

    #[test]
    fn test_int_conversion_and_redundancy() {
        let mut flag = Flag::new("-n", ValueType::Int);
        assert!(matches!(
            flag.parse("five"),
            Err(ParseError::TypeConversion { .. })
        ));
        assert_eq!(flag.value, None);

        flag.parse("5").unwrap();
        assert_eq!(flag.value, Some(Value::Int(5)));
        assert!(matches!(
            flag.parse("6"),
            Err(ParseError::RedundantValue { .. })
        ));
    }

    #[test]
    fn test_int_redundancy_checked_before_conversion() {
        let mut flag = Flag::new("-n", ValueType::Int);
        flag.parse("-3").unwrap();
        assert!(matches!(
            flag.parse("nope"),
            Err(ParseError::RedundantValue { .. })
        ));
    }

    #[test]
    fn test_ints_accumulate_in_order() {
        let mut flag = Flag::new("-p", ValueType::Ints);
        flag.parse("3").unwrap();
        flag.parse("1").unwrap();
        flag.parse("2").unwrap();
        assert_eq!(flag.value, Some(Value::Ints(vec![3, 1, 2])));
        assert!(flag.parse("x").is_err());
        assert_eq!(flag.value, Some(Value::Ints(vec![3, 1, 2])));
    }

    #[test]
    fn test_strings_accumulate_in_order() {
        let mut flag = Flag::new("-i", ValueType::Strings);
        flag.parse("hatchify").unwrap();
        flag.parse("vroomy").unwrap();
        assert_eq!(
            flag.value,
            Some(Value::Strings(vec!["hatchify".into(), "vroomy".into()]))
        );
    }

    #[test]
    fn test_strings_slot_holding_other_variant() {
        let mut flag = Flag::new("-i", ValueType::Strings);
        flag.value = Some(Value::Str("hatchify".into()));
        assert!(matches!(
            flag.parse("vroomy"),
            Err(ParseError::TypeConversion { .. })
        ));
    }

    #[test]
    fn test_argument_follows_flag_rules() {
        let mut arg = Argument::required("count", ValueType::Int);
        arg.parse("12").unwrap();
        assert_eq!(arg.value, Some(Value::Int(12)));
        assert!(arg.parse("13").is_err());
    }
}
