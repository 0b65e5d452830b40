//! Loads every `.sql` script in a directory into a [`CommandRegistry`]

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::command::{CommandRegistry, ParsedCommand};
use crate::error::{Error, Result};
use crate::script::{split, Extractor};
use crate::verb::VerbSet;

/// What to do when two statements declare the same command name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Later definitions replace earlier ones (files are visited in path order)
    #[default]
    Overwrite,
    /// Fail the load
    Reject,
}

impl FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "overwrite" => Ok(DuplicatePolicy::Overwrite),
            "reject" => Ok(DuplicatePolicy::Reject),
            _ => Err(format!(
                "Unknown duplicate policy: '{}'. Expected overwrite or reject.",
                s
            )),
        }
    }
}

/// Builds command registries from script directories
#[derive(Debug, Clone, Default)]
pub struct Loader {
    extractor: Extractor,
    duplicates: DuplicatePolicy,
}

impl Loader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_verbs(mut self, verbs: VerbSet) -> Self {
        self.extractor = Extractor::new(verbs);
        self
    }

    pub fn with_duplicate_policy(mut self, duplicates: DuplicatePolicy) -> Self {
        self.duplicates = duplicates;
        self
    }

    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    /// Load every `*.sql` file directly inside `dir`.
    ///
    /// Files are read in path order. The first malformed statement aborts the
    /// whole load and no registry is returned.
    pub fn load(&self, dir: impl AsRef<Path>) -> Result<CommandRegistry> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(Error::configuration(format!(
                "{} should be a directory with sql files in it",
                dir.display()
            )));
        }

        let files = script_files(dir)?;
        tracing::info!(dir = %dir.display(), files = files.len(), "Loading sql files");

        let mut registry = CommandRegistry::new();
        let mut origins: HashMap<String, PathBuf> = HashMap::new();

        for file in &files {
            for (name, command) in self.load_file(file)? {
                if let Some(first) = origins.get(&name) {
                    match self.duplicates {
                        DuplicatePolicy::Reject => {
                            return Err(Error::DuplicateCommand {
                                name,
                                first: first.clone(),
                                second: file.clone(),
                            });
                        }
                        DuplicatePolicy::Overwrite => {
                            tracing::warn!(
                                command = %name,
                                previous = %first.display(),
                                file = %file.display(),
                                "Overwriting command defined earlier"
                            );
                        }
                    }
                }
                origins.insert(name.clone(), file.clone());
                registry.insert(name, command);
            }
        }

        tracing::info!(
            dir = %dir.display(),
            commands = registry.len(),
            "Loaded sql commands"
        );
        Ok(registry)
    }

    /// Parse one script file into `(name, command)` pairs in statement order
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Vec<(String, ParsedCommand)>> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(file = %path.display(), "Parsing script");

        self.parse_script(&content)
            .map_err(|e| e.at(Some(path.to_path_buf()), None))
    }

    /// Parse script text into `(name, command)` pairs in statement order
    pub fn parse_script(&self, script: &str) -> Result<Vec<(String, ParsedCommand)>> {
        split(script)
            .map(|block| {
                let (name, command) = ParsedCommand::from_block(block, &self.extractor)?;
                tracing::debug!(command = %name, verb = %command.verb(), "Found command");
                Ok((name, command))
            })
            .collect()
    }
}

/// `*.sql` files directly inside `dir`, sorted by path
fn script_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let dir_str = dir.to_str().ok_or_else(|| {
        Error::configuration(format!("{} is not a valid UTF-8 path", dir.display()))
    })?;
    let pattern = format!("{}/*.sql", glob::Pattern::escape(dir_str));

    let mut files = Vec::new();
    for entry in glob::glob(&pattern).map_err(|e| Error::configuration(e.to_string()))? {
        let path = entry.map_err(|e| Error::Io {
            path: e.path().to_path_buf(),
            source: e.into(),
        })?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script_collects_in_order() {
        let script = "
            -- @ddl('b')
            select 1;
            -- @etl('a')
            select @x;
        ";
        let commands = Loader::new().parse_script(script).unwrap();
        let names: Vec<_> = commands.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(commands[1].1.params(), ["x"]);
    }

    #[test]
    fn test_parse_script_stops_at_first_bad_statement() {
        let script = "
            -- @ddl('ok')
            select 1;
            select 2;
        ";
        let err = Loader::new().parse_script(script).unwrap_err();
        match err {
            Error::Parse { line, location, .. } => {
                assert_eq!(line, "select 2");
                assert_eq!(location.line, Some(4));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_script_with_carriage_returns() {
        let commands = Loader::new()
            .parse_script("-- @ddl('a')\rselect @p\r;\r")
            .unwrap();
        assert_eq!(commands[0].0, "a");
        assert_eq!(commands[0].1.lines(), ["-- @ddl('a')", "select @p"]);
        assert_eq!(commands[0].1.params(), ["p"]);
        assert!(commands[0].1.check_params("a", &[]).is_err());
    }

    #[test]
    fn test_custom_verbs() {
        let loader = Loader::new().with_verbs(VerbSet::default().with_verb("dml".parse().unwrap()));
        let commands = loader.parse_script("-- @dml('x')\ndelete from t;").unwrap();
        assert_eq!(commands[0].1.verb().as_str(), "dml");
    }

    #[test]
    fn test_duplicate_policy_from_str() {
        assert_eq!(
            "Reject".parse::<DuplicatePolicy>().unwrap(),
            DuplicatePolicy::Reject
        );
        assert!("ignore".parse::<DuplicatePolicy>().is_err());
    }

    #[test]
    fn test_load_missing_dir() {
        let err = Loader::new().load("/definitely/not/here").unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }
}
