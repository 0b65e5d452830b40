//! Error types

use std::fmt;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::params::ParamType;

/// Result alias used throughout the crate
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Where a parse failure happened
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    /// Script file, if the text came from disk
    pub file: Option<PathBuf>,
    /// Line number (1-indexed)
    pub line: Option<usize>,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => write!(f, " at {}:{}", file.display(), line),
            (Some(file), None) => write!(f, " in {}", file.display()),
            (None, Some(line)) => write!(f, " at line {}", line),
            (None, None) => Ok(()),
        }
    }
}

/// Errors raised while loading and using SQL commands
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    /// A statement does not start with a recognized directive comment
    #[error("{message}{location}: `{line}`")]
    #[diagnostic(
        code(obselt::parse),
        help("the first line of every statement must look like `-- @ddl('command name')`")
    )]
    Parse {
        message: String,
        line: String,
        location: Location,
    },

    /// Loader was pointed at something it cannot load from
    #[error("configuration error: {message}")]
    #[diagnostic(code(obselt::config))]
    Configuration { message: String },

    /// Reading a script failed
    #[error("failed to read {}", .path.display())]
    #[diagnostic(code(obselt::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Lookup of an unregistered command
    #[error("could not find command '{name}'. Valid commands are: {}", .available.join(", "))]
    #[diagnostic(code(obselt::lookup))]
    CommandNotFound { name: String, available: Vec<String> },

    /// Same command name declared twice while duplicates are rejected
    #[error("command '{name}' is defined in both {} and {}", .first.display(), .second.display())]
    #[diagnostic(
        code(obselt::duplicate),
        help("rename one of the commands or allow overwriting")
    )]
    DuplicateCommand {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// Required parameters were not supplied
    #[error("command '{command}' requires params {}", .missing.join(", "))]
    #[diagnostic(code(obselt::params), help("please provide values"))]
    MissingParams {
        command: String,
        missing: Vec<String>,
    },

    /// A parameter value does not fit its declared type
    #[error("param '{name}' has value '{value}' which is not a valid {ty}")]
    #[diagnostic(code(obselt::param_value))]
    InvalidParam {
        name: String,
        ty: ParamType,
        value: String,
    },
}

impl Error {
    pub(crate) fn parse(message: impl Into<String>, line: impl Into<String>) -> Self {
        Error::Parse {
            message: message.into(),
            line: line.into(),
            location: Location::default(),
        }
    }

    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Attach source location to a parse error, leaving other variants as-is
    pub fn at(mut self, file: Option<PathBuf>, line: Option<usize>) -> Self {
        if let Error::Parse { location, .. } = &mut self {
            if location.file.is_none() {
                location.file = file;
            }
            if location.line.is_none() {
                location.line = line;
            }
        }
        self
    }

    /// Stable short name of the error kind, used in machine-readable output
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Parse { .. } => "parse-error",
            Error::Configuration { .. } => "configuration-error",
            Error::Io { .. } => "io-error",
            Error::CommandNotFound { .. } => "command-not-found",
            Error::DuplicateCommand { .. } => "duplicate-command",
            Error::MissingParams { .. } => "missing-params",
            Error::InvalidParam { .. } => "invalid-param",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_message_includes_location() {
        let err = Error::parse("no directive found", "select 1")
            .at(Some(PathBuf::from("a.sql")), Some(3));
        assert_eq!(
            err.to_string(),
            "no directive found at a.sql:3: `select 1`"
        );
    }

    #[test]
    fn test_at_keeps_existing_location() {
        let err = Error::parse("bad", "x")
            .at(None, Some(7))
            .at(Some(PathBuf::from("b.sql")), Some(1));
        match err {
            Error::Parse { location, .. } => {
                assert_eq!(location.line, Some(7));
                assert_eq!(location.file, Some(PathBuf::from("b.sql")));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_command_not_found_lists_available() {
        let err = Error::CommandNotFound {
            name: "missing".into(),
            available: vec!["a".into(), "b".into()],
        };
        assert!(err.to_string().contains("Valid commands are: a, b"));
        assert_eq!(err.kind(), "command-not-found");
    }
}
