//! Grammar and result type definitions.
//!
//! The same [`Command`], [`Flag`] and [`Argument`] types describe both sides
//! of a parse: a grammar entry declares names and [`ValueType`]s with empty
//! value slots, and a parse result carries the populated slots. All types
//! round-trip through JSON and YAML with [`serde`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Declared format of a flag's or argument's values.
///
/// The textual spellings are the ones used by grammar files:
/// `""`, `"bool"`, `"[]string"`, `"int"` and `"[]int"`.
///
/// # Examples
///
/// ```
/// use parg_core::ValueType;
///
/// assert_eq!("[]int".parse::<ValueType>().unwrap(), ValueType::Ints);
/// assert_eq!(ValueType::default(), ValueType::Default);
/// assert!("float".parse::<ValueType>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ValueType {
    /// Exactly one string value (the default).
    #[default]
    Default,
    /// No value; presence alone sets `true`.
    Bool,
    /// One or more strings, accumulated across repeats.
    Strings,
    /// Exactly one base-10 integer.
    Int,
    /// One or more integers, accumulated across repeats.
    Ints,
}

impl ValueType {
    /// Returns the grammar-file spelling of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "",
            Self::Bool => "bool",
            Self::Strings => "[]string",
            Self::Int => "int",
            Self::Ints => "[]int",
        }
    }

    /// Whether repeated values accumulate instead of conflicting.
    pub fn is_multi_valued(&self) -> bool {
        matches!(self, Self::Strings | Self::Ints)
    }

    fn is_default(&self) -> bool {
        *self == Self::Default
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("STRING"),
            Self::Bool => f.write_str("BOOL"),
            Self::Strings => f.write_str("STRINGS"),
            Self::Int => f.write_str("INT"),
            Self::Ints => f.write_str("INTS"),
        }
    }
}

impl FromStr for ValueType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(Self::Default),
            "bool" => Ok(Self::Bool),
            "[]string" => Ok(Self::Strings),
            "int" => Ok(Self::Int),
            "[]int" => Ok(Self::Ints),
            other => Err(ParseError::UnknownType(other.to_string())),
        }
    }
}

impl TryFrom<String> for ValueType {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ValueType> for String {
    fn from(value: ValueType) -> Self {
        value.as_str().to_string()
    }
}

/// A populated value, shaped by the [`ValueType`] of its slot.
///
/// Serialized untagged, so `Strings(["a", "b"])` is written as `["a","b"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Str(String),
    Ints(Vec<i64>),
    Strings(Vec<String>),
}

impl Value {
    /// Returns the single string, if this is a `Str` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the ordered strings, if this is a `Strings` value.
    pub fn as_strings(&self) -> Option<&[String]> {
        match self {
            Self::Strings(values) => Some(values),
            _ => None,
        }
    }

    /// Returns the integer, if this is an `Int` value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the ordered integers, if this is an `Ints` value.
    pub fn as_ints(&self) -> Option<&[i64]> {
        match self {
            Self::Ints(values) => Some(values),
            _ => None,
        }
    }

    /// Returns the boolean, if this is a `Bool` value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
            Self::Ints(values) => write!(f, "{values:?}"),
            Self::Strings(values) => write!(f, "{values:?}"),
        }
    }
}

/// A positional argument slot.
///
/// In a grammar this declares the name and type of the n-th positional
/// token. In a heuristic parse result it records one observed token, named
/// after the token itself.
///
/// # Examples
///
/// ```
/// use parg_core::{Argument, ValueType};
///
/// let module = Argument::required("module", ValueType::Default);
/// assert!(module.required);
/// assert!(module.value.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    /// Name of the argument
    pub name: String,
    /// Rules for parsing the argument's value
    #[serde(default, rename = "type", skip_serializing_if = "ValueType::is_default")]
    pub value_type: ValueType,
    /// Whether the strict validator rejects a parse that never binds this slot
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    /// Populated value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl Argument {
    /// Creates a required argument slot.
    pub fn required(name: &str, value_type: ValueType) -> Self {
        Self {
            name: name.to_string(),
            value_type,
            required: true,
            value: None,
        }
    }

    /// Creates an optional argument slot.
    pub fn optional(name: &str, value_type: ValueType) -> Self {
        Self {
            name: name.to_string(),
            value_type,
            required: false,
            value: None,
        }
    }

    /// Creates a populated single-string argument named after its token.
    pub fn observed(token: &str) -> Self {
        Self {
            name: token.to_string(),
            value_type: ValueType::Default,
            required: false,
            value: Some(Value::Str(token.to_string())),
        }
    }
}

/// A named `-flag`, matched by any of its identifiers.
///
/// # Examples
///
/// ```
/// use parg_core::{Flag, ValueType};
///
/// let include = Flag::new("-i", ValueType::Strings).with_identifier("-include");
/// assert!(include.matches("-i"));
/// assert!(include.matches("-include"));
/// assert!(!include.matches("-x"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flag {
    /// Name of the flag, the key of the result's flag mapping
    #[serde(default)]
    pub name: String,
    /// `-x` / `-longname` spellings that resolve to this flag
    #[serde(default)]
    pub identifiers: Vec<String>,
    /// Rules for parsing the flag's values
    #[serde(default, rename = "type", skip_serializing_if = "ValueType::is_default")]
    pub value_type: ValueType,
    /// Populated value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl Flag {
    /// Creates a flag whose only identifier is its name.
    pub fn new(name: &str, value_type: ValueType) -> Self {
        Self {
            name: name.to_string(),
            identifiers: vec![name.to_string()],
            value_type,
            value: None,
        }
    }

    /// Creates a presence-only flag.
    pub fn boolean(name: &str) -> Self {
        Self::new(name, ValueType::Bool)
    }

    /// Adds another identifier that resolves to this flag.
    pub fn with_identifier(mut self, identifier: &str) -> Self {
        if !self.matches(identifier) {
            self.identifiers.push(identifier.to_string());
        }
        self
    }

    /// Checks if this flag is spelled `identifier`.
    pub fn matches(&self, identifier: &str) -> bool {
        self.identifiers.iter().any(|id| id == identifier)
    }

    /// Returns a copy of the declaration with an empty value slot.
    pub(crate) fn declaration(&self) -> Self {
        Self {
            value: None,
            ..self.clone()
        }
    }

    /// Whether `other` declares the same flag, ignoring any parsed value.
    pub(crate) fn same_declaration(&self, other: &Flag) -> bool {
        self.name == other.name
            && self.identifiers == other.identifiers
            && self.value_type == other.value_type
    }
}

/// A command: grammar entry or parse result.
///
/// As a grammar entry, an empty `action` means "no command required" and an
/// empty `arguments` list means the command takes any number of untyped
/// positionals. As a result, `arguments` and `flags` hold populated slots.
///
/// # Examples
///
/// ```
/// use parg_core::{Argument, Command, Flag, ValueType};
///
/// let deploy = Command::new("deploy")
///     .with_argument(Argument::required("module", ValueType::Default))
///     .with_flag(Flag::new("-b", ValueType::Int));
///
/// assert_eq!(deploy.action, "deploy");
/// assert!(!deploy.is_variadic());
/// assert!(deploy.flags.contains_key("-b"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    /// The parsed primary argument
    #[serde(default)]
    pub action: String,
    /// Positional argument slots, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<Argument>,
    /// Flags keyed by flag name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub flags: BTreeMap<String, Flag>,
}

impl Command {
    /// Creates an empty command for `action`.
    pub fn new(action: &str) -> Self {
        Self {
            action: action.to_string(),
            ..Default::default()
        }
    }

    /// Appends a positional argument slot.
    pub fn with_argument(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Adds a command-scoped flag, replacing any flag with the same name.
    pub fn with_flag(mut self, flag: Flag) -> Self {
        self.flags.insert(flag.name.clone(), flag);
        self
    }

    /// Whether this grammar entry accepts any number of untyped positionals.
    pub fn is_variadic(&self) -> bool {
        self.arguments.is_empty()
    }

    /// Gets a parsed flag by name.
    pub fn flag(&self, name: &str) -> Option<&Flag> {
        self.flags.get(name)
    }

    /// Whether a flag with this name appeared in the parsed tokens.
    pub fn is_set(&self, name: &str) -> bool {
        self.flags.contains_key(name)
    }

    /// Gets a parsed argument by name.
    pub fn argument(&self, name: &str) -> Option<&Argument> {
        self.arguments.iter().find(|arg| arg.name == name)
    }

    fn flag_value(&self, name: &str) -> Option<&Value> {
        self.flag(name).and_then(|flag| flag.value.as_ref())
    }

    /// Reads a single-string flag value.
    pub fn string_flag(&self, name: &str) -> Option<&str> {
        self.flag_value(name).and_then(Value::as_str)
    }

    /// Reads a multi-string flag value.
    pub fn strings_flag(&self, name: &str) -> Option<&[String]> {
        self.flag_value(name).and_then(Value::as_strings)
    }

    /// Reads a single-integer flag value.
    pub fn int_flag(&self, name: &str) -> Option<i64> {
        self.flag_value(name).and_then(Value::as_int)
    }

    /// Reads a multi-integer flag value.
    pub fn ints_flag(&self, name: &str) -> Option<&[i64]> {
        self.flag_value(name).and_then(Value::as_ints)
    }

    /// Reads a boolean flag; absent or non-boolean flags read as `false`.
    pub fn bool_flag(&self, name: &str) -> bool {
        self.flag_value(name)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_type_spellings() {
        for vt in [
            ValueType::Default,
            ValueType::Bool,
            ValueType::Strings,
            ValueType::Int,
            ValueType::Ints,
        ] {
            assert_eq!(vt.as_str().parse::<ValueType>().unwrap(), vt);
        }
        assert_eq!(
            "float".parse::<ValueType>(),
            Err(ParseError::UnknownType("float".to_string()))
        );
        assert_eq!(
            "string".parse::<ValueType>(),
            Err(ParseError::UnknownType("string".to_string()))
        );
    }

    #[test]
    fn test_value_type_deserialize_rejects_unknown() {
        let err = serde_json::from_str::<Flag>(r#"{"name":"-x","type":"[]float"}"#).unwrap_err();
        assert!(err.to_string().contains("unknown value type"));
    }

    #[test]
    fn test_flag_identifiers() {
        let flag = Flag::new("-b", ValueType::Default)
            .with_identifier("-branch")
            .with_identifier("-b");

        assert_eq!(flag.identifiers, vec!["-b", "-branch"]);
        assert!(flag.matches("-branch"));
    }

    #[test]
    fn test_command_accessors_read_matching_types_only() {
        let mut cmd = Command::new("sync");
        let mut include = Flag::new("-i", ValueType::Strings);
        include.value = Some(Value::Strings(vec!["hatchify".into(), "vroomy".into()]));
        let mut depth = Flag::new("-d", ValueType::Int);
        depth.value = Some(Value::Int(3));
        let mut quiet = Flag::boolean("-q");
        quiet.value = Some(Value::Bool(true));
        cmd = cmd.with_flag(include).with_flag(depth).with_flag(quiet);

        assert_eq!(
            cmd.strings_flag("-i"),
            Some(&["hatchify".to_string(), "vroomy".to_string()][..])
        );
        assert_eq!(cmd.string_flag("-i"), None);
        assert_eq!(cmd.int_flag("-d"), Some(3));
        assert_eq!(cmd.ints_flag("-d"), None);
        assert!(cmd.bool_flag("-q"));
        assert!(!cmd.bool_flag("-d"));
        assert!(!cmd.bool_flag("-missing"));
        assert!(cmd.is_set("-q"));
    }

    #[test]
    fn test_result_serializes_bare_values() {
        let cmd = Command {
            action: "sync".into(),
            arguments: vec![Argument::observed("mod-common")],
            flags: BTreeMap::new(),
        };

        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "action": "sync",
                "arguments": [{"name": "mod-common", "value": "mod-common"}]
            })
        );
    }
}
