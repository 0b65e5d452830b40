//! Reads the directive comment and parameter placeholders of a statement

use once_cell::sync::Lazy;
use regex::Regex;

use super::{is_comment, StatementBlock};
use crate::error::{Error, Result};
use crate::verb::{Verb, VerbSet};

/// `@` followed by any run of word characters, possibly empty
static RE_PARAM: Lazy<Regex> = Lazy::new(|| Regex::new(r"@(\w*)").unwrap());

/// What a statement block declares about itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub verb: Verb,
    pub name: String,
    pub params: Vec<String>,
}

/// Matches directive comments against a set of verbs
#[derive(Debug, Clone)]
pub struct Extractor {
    verbs: VerbSet,
    directive: Regex,
}

impl Extractor {
    pub fn new(verbs: VerbSet) -> Self {
        // Verbs are regex-escaped, so the pattern always compiles
        let pattern = format!(r"^--.*@({})\('(.*?)'\)", verbs.alternation());
        let directive = Regex::new(&pattern).expect("directive pattern is valid");
        Self { verbs, directive }
    }

    pub fn verbs(&self) -> &VerbSet {
        &self.verbs
    }

    /// Pull verb, command name and params out of one statement block.
    ///
    /// The directive must be on the first line; every later line is scanned
    /// for `@param` placeholders.
    pub fn extract(&self, block: &StatementBlock) -> Result<Extracted> {
        let line = block
            .first_line()
            .ok_or_else(|| Error::parse("empty statement, expected a directive comment", ""))?;

        let (verb, name) = self
            .directive(line)
            .map_err(|e| e.at(None, Some(block.start_line())))?;

        let params = block.lines()[1..]
            .iter()
            .flat_map(|line| scan_params(line))
            .collect();

        Ok(Extracted { verb, name, params })
    }

    /// Match a single directive line, returning its verb and command name
    pub fn directive(&self, line: &str) -> Result<(Verb, String)> {
        let line = line.trim();
        if !is_comment(line) {
            return Err(Error::parse(
                "no command found, expected a directive comment on the first line",
                line,
            ));
        }

        let caps = self.directive.captures(line).ok_or_else(|| {
            Error::parse(
                "no command found, expected `@<verb>('<name>')` on the first line",
                line,
            )
        })?;

        let verb = self
            .verbs
            .get(&caps[1])
            .cloned()
            .ok_or_else(|| Error::parse("unknown verb", line))?;
        Ok((verb, caps[2].to_string()))
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(VerbSet::default())
    }
}

/// Parameter names in `line`, left to right, without the leading `@`.
///
/// A bare `@` produces an empty name and `@@foo` produces `""` then `"foo"`.
pub fn scan_params(line: &str) -> impl Iterator<Item = String> + '_ {
    RE_PARAM
        .captures_iter(line)
        .map(|caps| caps[1].to_string())
}
