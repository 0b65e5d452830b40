//! Directive verbs

use std::fmt;
use std::str::FromStr;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Verbs recognized when no others are configured
pub const DEFAULT_VERBS: &[&str] = &["ddl", "etl", "elt"];

/// Classification tag of a statement, e.g. `ddl` or `etl`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Verb(String);

impl Verb {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Verb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_') {
            Ok(Verb(s.to_string()))
        } else {
            Err(format!(
                "Invalid verb: '{}'. Verbs are non-empty words such as ddl, etl or elt.",
                s
            ))
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl AsRef<str> for Verb {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Open set of verbs accepted in directive comments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerbSet {
    verbs: IndexSet<Verb>,
}

impl VerbSet {
    /// An empty set. No directive matches until a verb is added.
    pub fn empty() -> Self {
        Self {
            verbs: IndexSet::new(),
        }
    }

    pub fn with_verb(mut self, verb: Verb) -> Self {
        self.verbs.insert(verb);
        self
    }

    pub fn insert(&mut self, verb: Verb) -> bool {
        self.verbs.insert(verb)
    }

    pub fn contains(&self, verb: &str) -> bool {
        self.verbs.iter().any(|v| v.as_str() == verb)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Verb> {
        self.verbs.iter()
    }

    pub fn len(&self) -> usize {
        self.verbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verbs.is_empty()
    }

    /// Look up the set's own copy of a verb
    pub(crate) fn get(&self, verb: &str) -> Option<&Verb> {
        self.verbs.iter().find(|v| v.as_str() == verb)
    }

    /// Regex alternation matching any verb literally, e.g. `ddl|etl|elt`
    pub(crate) fn alternation(&self) -> String {
        self.verbs
            .iter()
            .map(|v| regex::escape(v.as_str()))
            .collect::<Vec<_>>()
            .join("|")
    }
}

impl Default for VerbSet {
    fn default() -> Self {
        Self {
            verbs: DEFAULT_VERBS.iter().map(|v| Verb(v.to_string())).collect(),
        }
    }
}

impl FromIterator<Verb> for VerbSet {
    fn from_iter<I: IntoIterator<Item = Verb>>(iter: I) -> Self {
        Self {
            verbs: iter.into_iter().collect(),
        }
    }
}
