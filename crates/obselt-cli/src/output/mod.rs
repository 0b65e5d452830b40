//! Output formatting

use obselt_core::{CommandRegistry, Error, ParsedCommand, StatementBlock};

use crate::args::OutputFormat;

/// Output formatter for loaded commands and load failures
pub struct OutputFormatter {
    format: OutputFormat,
    source: String,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, source: String) -> Self {
        Self { format, source }
    }

    /// Print the result of a successful load
    pub fn print_summary(&self, registry: &CommandRegistry, quiet: bool) {
        match self.format {
            OutputFormat::Human => {
                if !quiet {
                    eprintln!(
                        "Loaded {} command(s) from {}",
                        registry.len(),
                        self.source
                    );
                }
            }
            OutputFormat::Json => self.print_json(&serde_json::json!({
                "source": self.source,
                "ok": true,
                "commands": registry.names().collect::<Vec<_>>(),
            })),
        }
    }

    /// Print a load failure
    pub fn print_error(&self, error: &Error) {
        match self.format {
            OutputFormat::Human => {
                eprintln!("\x1b[31merror\x1b[0m[{}]: {}", error.kind(), error);
                if let Error::Parse { location, .. } = error {
                    if let (Some(file), Some(line)) = (&location.file, location.line) {
                        eprintln!("  --> {}:{}", file.display(), line);
                    }
                }
                eprintln!();
            }
            OutputFormat::Json => self.print_json(&serde_json::json!({
                "source": self.source,
                "ok": false,
                "error": {
                    "kind": error.kind(),
                    "message": error.to_string(),
                },
            })),
        }
    }

    /// Print every command with its verb and required params
    pub fn print_commands(&self, registry: &CommandRegistry) {
        match self.format {
            OutputFormat::Human => {
                let width = registry.names().map(str::len).max().unwrap_or(0);
                for (name, command) in registry.iter() {
                    println!(
                        "{:<width$}  {:<4} {}",
                        name,
                        command.verb(),
                        command.required_params().join(", "),
                        width = width
                    );
                }
            }
            OutputFormat::Json => {
                let commands: Vec<serde_json::Value> = registry
                    .iter()
                    .map(|(name, command)| {
                        serde_json::json!({
                            "name": name,
                            "verb": command.verb(),
                            "params": command.required_params(),
                        })
                    })
                    .collect();
                self.print_json(&serde_json::json!({
                    "source": self.source,
                    "commands": commands,
                }));
            }
        }
    }

    /// Print one command's SQL
    pub fn print_command(&self, name: &str, command: &ParsedCommand) {
        match self.format {
            OutputFormat::Human => println!("{}", command.render()),
            OutputFormat::Json => self.print_json(&serde_json::json!({
                "name": name,
                "verb": command.verb(),
                "params": command.params(),
                "sql": command.render(),
            })),
        }
    }

    /// Print the statement blocks of one script
    pub fn print_blocks(&self, blocks: &[StatementBlock]) {
        match self.format {
            OutputFormat::Human => {
                for (i, block) in blocks.iter().enumerate() {
                    println!("Statement {} (line {}):", i + 1, block.start_line());
                    for line in block.lines() {
                        println!("  {}", line);
                    }
                    println!();
                }
            }
            OutputFormat::Json => {
                let blocks: Vec<serde_json::Value> = blocks
                    .iter()
                    .map(|b| {
                        serde_json::json!({
                            "line": b.start_line(),
                            "lines": b.lines(),
                        })
                    })
                    .collect();
                self.print_json(&serde_json::json!({
                    "source": self.source,
                    "statements": blocks,
                }));
            }
        }
    }

    fn print_json(&self, value: &serde_json::Value) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to serialize output: {}", e),
        }
    }
}
