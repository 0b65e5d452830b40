//! Script parsing: statement splitting and directive extraction

mod extractor;
mod splitter;

pub use extractor::{scan_params, Extracted, Extractor};
pub use splitter::{split, Split, StatementBlock};

/// Ends a statement
pub const TERMINATOR: char = ';';

/// Starts a comment line, including the directive line
pub const COMMENT: &str = "--";

/// Whether `line` is a `--` comment once leading/trailing whitespace is ignored
pub fn is_comment(line: &str) -> bool {
    line.trim().starts_with(COMMENT)
}
