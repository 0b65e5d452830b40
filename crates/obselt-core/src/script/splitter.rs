//! Splits a script into statement blocks on `;`

use once_cell::sync::Lazy;
use regex::Regex;

use super::TERMINATOR;

/// Line boundaries: `\r\n`, `\n`, a bare `\r` and the other Unicode line separators
static RE_LINE_BREAK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\r\n|[\n\r\x0b\x0c\x1c-\x1e\x{85}\x{2028}\x{2029}]").unwrap()
});

/// One statement as authored: trimmed, non-blank lines up to its terminator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementBlock {
    lines: Vec<String>,
    /// Source line of the first line (1-indexed), 0 for an empty block
    start_line: usize,
}

impl StatementBlock {
    pub fn new(lines: Vec<String>, start_line: usize) -> Self {
        Self { lines, start_line }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn first_line(&self) -> Option<&str> {
        self.lines.first().map(String::as_str)
    }

    pub fn start_line(&self) -> usize {
        self.start_line
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

/// Lazily split `script` into statement blocks.
///
/// A line containing `;` closes the pending statement with the text before
/// the first `;`; whatever follows it on that line seeds the next statement.
/// Further `;` on the same line do not close anything. Content after the
/// last terminator is dropped, so a script without `;` yields nothing.
pub fn split(script: &str) -> Split<'_> {
    Split {
        lines: RE_LINE_BREAK.split(script),
        line_no: 0,
        pending: Vec::new(),
    }
}

/// Iterator returned by [`split`]. Single pass; call [`split`] again to restart.
#[derive(Debug)]
pub struct Split<'a> {
    lines: regex::Split<'static, 'a>,
    line_no: usize,
    /// (line number, raw text) accumulated for the current statement
    pending: Vec<(usize, &'a str)>,
}

impl<'a> Split<'a> {
    fn take_block(&mut self) -> StatementBlock {
        let mut start_line = 0;
        let mut lines = Vec::new();
        for (line_no, text) in self.pending.drain(..) {
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            if lines.is_empty() {
                start_line = line_no;
            }
            lines.push(text.to_string());
        }
        StatementBlock::new(lines, start_line)
    }
}

impl<'a> Iterator for Split<'a> {
    type Item = StatementBlock;

    fn next(&mut self) -> Option<Self::Item> {
        for line in self.lines.by_ref() {
            self.line_no += 1;

            if line.contains(TERMINATOR) {
                let mut parts = line.split(TERMINATOR);
                if let Some(head) = parts.next() {
                    self.pending.push((self.line_no, head));
                }
                let block = self.take_block();
                let line_no = self.line_no;
                self.pending.extend(parts.map(|part| (line_no, part)));
                return Some(block);
            }

            if !line.is_empty() {
                self.pending.push((self.line_no, line));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn first_lines(script: &str) -> Vec<String> {
        split(script)
            .map(|b| b.first_line().unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_valid_script() {
        let script = "
            select 1;
            select 2;
        ";
        assert_eq!(first_lines(script), vec!["select 1", "select 2"]);
    }

    #[test]
    fn test_no_terminator_yields_nothing() {
        let script = "
            select 1
            select 2
        ";
        assert_eq!(split(script).count(), 0);
        assert_eq!(split("").count(), 0);
    }

    #[test]
    fn test_trailing_unterminated_content_is_dropped() {
        let blocks: Vec<_> = split("select 1;\nselect 2").collect();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].lines(), ["select 1"]);
    }

    #[test]
    fn test_multiline_statement_keeps_comment_lines() {
        let script = "
            -- @ddl('a')
            select *

            from t
            ;
        ";
        let blocks: Vec<_> = split(script).collect();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].lines(), ["-- @ddl('a')", "select *", "from t"]);
        assert_eq!(blocks[0].start_line(), 2);
    }

    #[test]
    fn test_text_after_terminator_seeds_next_statement() {
        let blocks: Vec<_> = split("select 1; -- @etl('x')\nselect 2;").collect();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].lines(), ["-- @etl('x')", "select 2"]);
        assert_eq!(blocks[1].start_line(), 1);
    }

    #[test]
    fn test_only_first_terminator_per_line_splits() {
        let blocks: Vec<_> = split("select 1; select 2; select 3;\n").collect();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].lines(), ["select 1"]);

        // The leftovers join the next statement instead of forming their own
        let blocks: Vec<_> = split("a; b; c\nd;").collect();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].lines(), ["b", "c", "d"]);
    }

    #[test]
    fn test_one_block_per_terminator() {
        let script: String = (0..5).map(|i| format!("select {i}\n;\n")).collect();
        assert_eq!(split(&script).count(), 5);
    }

    #[test]
    fn test_carriage_return_line_endings() {
        let blocks: Vec<_> = split("-- @ddl('a')\rselect @p\r;\r").collect();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].lines(), ["-- @ddl('a')", "select @p"]);

        let blocks: Vec<_> = split("-- @ddl('a')\r\nselect 1\r\n\r\n;\r\n").collect();
        assert_eq!(blocks[0].lines(), ["-- @ddl('a')", "select 1"]);
    }

    #[test]
    fn test_unicode_line_separators() {
        let blocks: Vec<_> = split("-- @etl('a')\u{2028}select 1\x0cfrom t\u{85};").collect();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].lines(), ["-- @etl('a')", "select 1", "from t"]);
    }

    #[test]
    fn test_start_line_counts_crlf_once() {
        let blocks: Vec<_> = split("select 1;\r\n\r\nselect 2;").collect();
        assert_eq!(blocks[1].start_line(), 3);
    }

    #[test]
    fn test_lone_terminator_yields_empty_block() {
        let blocks: Vec<_> = split("select 1;\n;\n").collect();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[1].is_empty());
        assert_eq!(blocks[1].start_line(), 0);
    }
}
