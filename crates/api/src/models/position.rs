use serde::{Deserialize, Serialize};

/// A 0-based (line, column) pair. Columns count UTF-16 code units.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A 0-based source range.
///
/// Two conventions live on this type and must not be mixed:
/// - as a protocol range, `end_col` is exclusive (the column after the last character);
/// - [`Range::contains`] treats both boundary lines inclusively, so a cursor sitting
///   right after the last character still counts as inside.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Range {
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
}

impl Range {
    pub fn new(start_line: usize, start_col: usize, end_line: usize, end_col: usize) -> Self {
        Self {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    pub fn start(&self) -> Position {
        Position::new(self.start_line, self.start_col)
    }

    pub fn end(&self) -> Position {
        Position::new(self.end_line, self.end_col)
    }

    pub fn contains(&self, line: usize, col: usize) -> bool {
        if line < self.start_line || line > self.end_line {
            return false;
        }
        if line == self.start_line && col < self.start_col {
            return false;
        }
        if line == self.end_line && col > self.end_col {
            return false;
        }
        true
    }

    /// True when `other` lies entirely within `self`.
    pub fn encloses(&self, other: &Range) -> bool {
        self.start() <= other.start() && other.end() <= self.end()
    }

    pub fn is_single_line(&self) -> bool {
        self.start_line == self.end_line
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    pub uri: String,
    pub range: Range,
}

impl Location {
    pub fn new(uri: impl Into<String>, range: Range) -> Self {
        Self {
            uri: uri.into(),
            range,
        }
    }
}
