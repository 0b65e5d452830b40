//! Parsed commands and the registry that holds them

use std::fmt;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::params::QueryParam;
use crate::script::{Extracted, Extractor, StatementBlock};
use crate::verb::{Verb, VerbSet};

/// One named SQL statement, as loaded from a script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCommand")]
pub struct ParsedCommand {
    lines: Vec<String>,
    verb: Verb,
    params: Vec<String>,
}

impl ParsedCommand {
    /// Parse a statement block, returning the command name alongside it
    pub fn from_block(block: StatementBlock, extractor: &Extractor) -> Result<(String, Self)> {
        let Extracted { verb, name, params } = extractor.extract(&block)?;
        let command = Self {
            lines: block.into_lines(),
            verb,
            params,
        };
        Ok((name, command))
    }

    /// Statement lines, directive comment first
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn verb(&self) -> &Verb {
        &self.verb
    }

    /// Every placeholder in discovery order, duplicates and empty names included
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Distinct, non-empty placeholder names in discovery order
    pub fn required_params(&self) -> Vec<&str> {
        self.params
            .iter()
            .map(String::as_str)
            .filter(|p| !p.is_empty())
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }

    /// The statement as one SQL string
    pub fn render(&self) -> String {
        self.lines.join("\n")
    }

    /// Ensure every required placeholder has a value in `supplied`
    pub fn check_params(&self, name: &str, supplied: &[QueryParam]) -> Result<()> {
        let missing: Vec<String> = self
            .required_params()
            .into_iter()
            .filter(|required| !supplied.iter().any(|p| p.name() == *required))
            .map(str::to_string)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingParams {
                command: name.to_string(),
                missing,
            })
        }
    }
}

/// Serialized form of [`ParsedCommand`], re-checked before it is accepted
#[derive(Deserialize)]
struct RawCommand {
    lines: Vec<String>,
    verb: String,
    params: Vec<String>,
}

impl TryFrom<RawCommand> for ParsedCommand {
    type Error = Error;

    fn try_from(raw: RawCommand) -> Result<Self> {
        let first = raw.lines.first().cloned().unwrap_or_default();
        let verb: Verb = raw
            .verb
            .parse()
            .map_err(|e: String| Error::parse(e, first.as_str()))?;

        let extractor = Extractor::new(VerbSet::empty().with_verb(verb));
        let block = StatementBlock::new(raw.lines, 1);
        let (_, command) = Self::from_block(block, &extractor)?;

        if command.params != raw.params {
            return Err(Error::parse(
                "params do not match the placeholders in the statement",
                first,
            ));
        }
        Ok(command)
    }
}

impl fmt::Display for ParsedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Command name -> parsed command, in load order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRegistry {
    commands: IndexMap<String, ParsedCommand>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command, returning the one it replaced, if any
    pub fn insert(&mut self, name: String, command: ParsedCommand) -> Option<ParsedCommand> {
        self.commands.insert(name, command)
    }

    /// Look up a command; a miss lists every registered name
    pub fn get(&self, name: &str) -> Result<&ParsedCommand> {
        self.commands
            .get(name)
            .ok_or_else(|| Error::CommandNotFound {
                name: name.to_string(),
                available: self.names().map(str::to_string).collect(),
            })
    }

    pub fn lookup(&self, name: &str) -> Option<&ParsedCommand> {
        self.commands.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParsedCommand)> {
        self.commands.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl<'a> IntoIterator for &'a CommandRegistry {
    type Item = (&'a String, &'a ParsedCommand);
    type IntoIter = indexmap::map::Iter<'a, String, ParsedCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamType;
    use crate::script::split;
    use pretty_assertions::assert_eq;

    const SCRIPT: &str = "
        ---- @ddl('t1 -> t2')
        select t1.*
        from t1
        where t1.id0 = @my_param0
        and t1.id1 = @my_param1
        and t1.id2 = @my_param0
        ;
    ";

    fn parse(script: &str) -> (String, ParsedCommand) {
        let block = split(script).next().unwrap();
        ParsedCommand::from_block(block, &Extractor::default()).unwrap()
    }

    #[test]
    fn test_from_block() {
        let (name, command) = parse(SCRIPT);
        assert_eq!(name, "t1 -> t2");
        assert_eq!(command.verb().as_str(), "ddl");
        assert_eq!(command.lines().len(), 6);
        assert_eq!(command.params(), ["my_param0", "my_param1", "my_param0"]);
        assert_eq!(command.required_params(), vec!["my_param0", "my_param1"]);
    }

    #[test]
    fn test_render() {
        let (_, command) = parse("-- @etl('x')\nselect 1\nfrom t;");
        assert_eq!(command.render(), "-- @etl('x')\nselect 1\nfrom t");
        assert_eq!(command.to_string(), command.render());
    }

    #[test]
    fn test_render_round_trip() {
        let (name, command) = parse(SCRIPT);
        let (again_name, again) = parse(&format!("{};", command.render()));
        assert_eq!(again_name, name);
        assert_eq!(again, command);
    }

    #[test]
    fn test_check_params() {
        let (name, command) = parse(SCRIPT);
        let supplied = vec![
            QueryParam::new("my_param0", ParamType::Int64, "1").unwrap(),
            QueryParam::string("@my_param1", "a"),
        ];
        assert!(command.check_params(&name, &supplied).is_ok());

        let err = command.check_params(&name, &supplied[..1]).unwrap_err();
        match err {
            Error::MissingParams { command, missing } => {
                assert_eq!(command, "t1 -> t2");
                assert_eq!(missing, vec!["my_param1"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_param_names_are_not_required() {
        let (_, command) = parse("-- @ddl('x')\nselect '@' as at;");
        assert_eq!(command.params(), [""]);
        assert!(command.required_params().is_empty());
    }

    #[test]
    fn test_deserialize_checks_directive() {
        let (_, command) = parse(SCRIPT);
        let json = serde_json::to_string(&command).unwrap();
        let back: ParsedCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(back, command);

        let no_directive = r#"{"lines":["select 1"],"verb":"nope","params":[]}"#;
        assert!(serde_json::from_str::<ParsedCommand>(no_directive).is_err());

        let wrong_verb = r#"{"lines":["-- @ddl('x')","select 1"],"verb":"etl","params":[]}"#;
        assert!(serde_json::from_str::<ParsedCommand>(wrong_verb).is_err());

        let empty_verb = r#"{"lines":["-- @('x')","select 1"],"verb":"","params":[]}"#;
        assert!(serde_json::from_str::<ParsedCommand>(empty_verb).is_err());

        let wrong_params = r#"{"lines":["-- @ddl('x')","select @a"],"verb":"ddl","params":[]}"#;
        assert!(serde_json::from_str::<ParsedCommand>(wrong_params).is_err());
    }

    #[test]
    fn test_deserialize_registry_rejects_empty_command() {
        let json = r#"{"commands":{"x":{"lines":[],"verb":"ddl","params":[]}}}"#;
        assert!(serde_json::from_str::<CommandRegistry>(json).is_err());
    }

    #[test]
    fn test_registry_get_miss_lists_names() {
        let mut registry = CommandRegistry::new();
        let (name, command) = parse(SCRIPT);
        assert!(registry.insert(name, command.clone()).is_none());
        assert!(registry.insert("t1 -> t2".to_string(), command).is_some());
        assert_eq!(registry.len(), 1);

        let err = registry.get("nope").unwrap_err();
        assert!(err.to_string().contains("t1 -> t2"));
        assert!(registry.lookup("nope").is_none());
        assert!(registry.get("t1 -> t2").is_ok());
    }
}
