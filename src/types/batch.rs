//! Batch type shared by the batch readers and both ingestion passes

/// A group of consecutive raw source lines
///
/// Carries the 1-based source line number of its first line so that errors
/// raised while processing can point at the offending line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    /// Source line number of `lines[0]`
    pub start_line: usize,

    /// Raw lines, trimmed, in source order
    pub lines: Vec<String>,
}

impl Batch {
    pub fn new(start_line: usize, lines: Vec<String>) -> Self {
        Batch { start_line, lines }
    }

    /// Build a batch that starts at line 1
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Batch::new(1, lines.into_iter().map(Into::into).collect())
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Non-blank lines paired with their source line numbers
    ///
    /// Blank lines are skipped rather than rejected. This relaxes the rule
    /// that every line must split into exactly four fields: a blank line is
    /// not a `Format` error, while any other malformed line still is.
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &str)> {
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, line)| !line.is_empty())
            .map(move |(i, line)| (self.start_line + i, line.as_str()))
    }
}
