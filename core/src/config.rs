//! Grammar files.
//!
//! A grammar can be declared in JSON or YAML instead of code. Command-scoped
//! flags are written as a map keyed by flag name, so `name` and
//! `identifiers` may be omitted there.
//!
//! # Example YAML
//!
//! ```yaml
//! global_flags:
//!   - name: -i
//!     identifiers: [-i, -include]
//!     type: "[]string"
//!   - name: -name-only
//!     type: bool
//! allowed_commands:
//!   - action: sync
//!   - action: deploy
//!     arguments:
//!       - name: module
//!         required: true
//!     flags:
//!       -b:
//!         identifiers: [-b, -branch]
//!         type: int
//! ```

use std::io::BufReader;
use std::path::Path;

use tracing::debug;

use crate::Grammar;
use crate::error::ConfigError;

impl Grammar {
    /// Loads a grammar from a file. Files ending in `.json` are read as
    /// JSON, anything else as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::IoError`] if the file cannot be read, or a
    /// JSON/YAML error if it does not describe a grammar.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let reader = BufReader::new(std::fs::File::open(path)?);
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let grammar: Grammar = if is_json {
            serde_json::from_reader(reader)?
        } else {
            serde_yaml::from_reader(reader)?
        };
        debug!(
            path = %path.display(),
            commands = grammar.allowed_commands.len(),
            global_flags = grammar.global_flags.len(),
            "Loaded grammar"
        );
        Ok(grammar.normalized())
    }

    /// Parses a grammar from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let grammar: Grammar = serde_json::from_str(json)?;
        Ok(grammar.normalized())
    }

    /// Parses a grammar from YAML text.
    ///
    /// # Examples
    ///
    /// ```
    /// use parg_core::{Grammar, ValueType};
    ///
    /// let grammar = Grammar::from_yaml_str(
    ///     "allowed_commands:\n  - action: deploy\n    flags:\n      -b:\n        type: int\n",
    /// )
    /// .unwrap();
    ///
    /// let deploy = grammar.resolve_command("deploy").unwrap();
    /// assert_eq!(deploy.flags["-b"].identifiers, vec!["-b"]);
    /// assert_eq!(deploy.flags["-b"].value_type, ValueType::Int);
    /// ```
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let grammar: Grammar = serde_yaml::from_str(yaml)?;
        Ok(grammar.normalized())
    }

    /// Fills omitted flag names from their map keys and omitted identifiers
    /// from their names.
    fn normalized(mut self) -> Self {
        for flag in &mut self.global_flags {
            if flag.identifiers.is_empty() && !flag.name.is_empty() {
                flag.identifiers.push(flag.name.clone());
            }
        }
        for command in &mut self.allowed_commands {
            for (key, flag) in &mut command.flags {
                if flag.name.is_empty() {
                    flag.name = key.clone();
                }
                if flag.identifiers.is_empty() {
                    flag.identifiers.push(flag.name.clone());
                }
            }
        }
        self
    }
}
