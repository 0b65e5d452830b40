//! Configuration file handling

use std::path::{Path, PathBuf};

use miette::{IntoDiagnostic, Result};
use obselt_core::{DuplicatePolicy, Loader, Verb, VerbSet};
use serde::{Deserialize, Serialize};

use crate::args::{OutputFormat, SourceArgs};

const CONFIG_FILE: &str = "obselt.toml";

/// Configuration for obselt
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Directory containing .sql scripts
    pub sql_dir: Option<String>,

    /// Verbs accepted on top of ddl, etl and elt
    #[serde(default)]
    pub verbs: Vec<String>,

    /// What to do with repeated command names (overwrite, reject)
    #[serde(default)]
    pub on_duplicate: Option<DuplicatePolicy>,

    /// Output format (human, json)
    #[serde(default)]
    pub format: Option<String>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).into_diagnostic()?;
        let config: Config = toml::from_str(&contents).into_diagnostic()?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Try to find and load obselt.toml in current directory or parent directories
    pub fn find_and_load() -> Result<Option<Self>> {
        let mut current_dir = std::env::current_dir().into_diagnostic()?;

        loop {
            let config_path = current_dir.join(CONFIG_FILE);
            if config_path.exists() {
                return Ok(Some(Self::from_file(&config_path)?));
            }

            if !current_dir.pop() {
                break;
            }
        }

        Ok(None)
    }

    /// Merge CLI arguments into configuration.
    /// CLI arguments (and `OBSELT_SQL_DIR`) take precedence over file values.
    pub fn merge_with_args(mut self, source: &SourceArgs, format: Option<OutputFormat>) -> Self {
        if let Some(dir) = &source.dir {
            self.sql_dir = Some(dir.display().to_string());
        }

        self.verbs.extend(source.verbs.iter().cloned());

        if source.reject_duplicates {
            self.on_duplicate = Some(DuplicatePolicy::Reject);
        }

        if let Some(fmt) = format {
            self.format = Some(format!("{:?}", fmt).to_lowercase());
        }

        self
    }

    pub fn output_format(&self) -> OutputFormat {
        match self.format.as_deref() {
            Some("json") => OutputFormat::Json,
            _ => OutputFormat::Human,
        }
    }

    pub fn sql_dir(&self) -> Result<PathBuf> {
        match &self.sql_dir {
            Some(dir) => Ok(PathBuf::from(dir)),
            None => miette::bail!(
                "No sql directory specified. Use --dir, set OBSELT_SQL_DIR, or configure sql_dir in {}",
                CONFIG_FILE
            ),
        }
    }

    /// Build a loader with the configured verbs and duplicate policy
    pub fn loader(&self) -> Result<Loader> {
        let mut verbs = VerbSet::default();
        for verb in &self.verbs {
            let verb: Verb = verb.parse().map_err(|e: String| miette::miette!(e))?;
            verbs.insert(verb);
        }

        Ok(Loader::new()
            .with_verbs(verbs)
            .with_duplicate_policy(self.on_duplicate.unwrap_or_default()))
    }
}
