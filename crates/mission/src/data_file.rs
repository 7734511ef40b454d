//! Indentation-structured data files.
//!
//! Each line is a list of whitespace-separated tokens. A token may be wrapped
//! in `"double quotes"` or `` `backticks` `` to include spaces. A line that is
//! indented further than the line above it is a child of that line. `#` starts
//! a comment when it begins a token.
//!
//! ```text
//! mission "Listening Post"
//! 	timer watch 600 120
//! 		system Sol
//! 		reset "leave system"
//! ```

use std::fmt;
use std::path::Path;

use crate::error::DataError;

/// One line of a data file plus the lines nested under it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataNode {
    tokens: Vec<String>,
    children: Vec<DataNode>,
    /// 1-based source line, 0 for nodes built in code.
    line: usize,
}

impl DataNode {
    /// Build a node from tokens, without children.
    pub fn new<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
            children: Vec::new(),
            line: 0,
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Number of tokens on this line.
    pub fn size(&self) -> usize {
        self.tokens.len()
    }

    /// Token at `index`, or an empty string past the end.
    pub fn token(&self, index: usize) -> &str {
        self.tokens.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn is_number(&self, index: usize) -> bool {
        self.tokens
            .get(index)
            .is_some_and(|t| t.parse::<f64>().map(f64::is_finite).unwrap_or(false))
    }

    /// Numeric value of the token at `index`. Missing or non-numeric tokens
    /// read as zero; a present but non-numeric token is logged.
    pub fn value(&self, index: usize) -> f64 {
        match self.tokens.get(index) {
            None => 0.0,
            Some(token) => match token.parse::<f64>() {
                Ok(v) if v.is_finite() => v,
                _ => {
                    self.print_trace(&format!("Cannot convert \"{}\" to a number", token));
                    0.0
                }
            },
        }
    }

    pub fn children(&self) -> &[DataNode] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DataNode> {
        self.children.iter()
    }

    pub fn line(&self) -> usize {
        self.line
    }

    /// Log a warning pointing at this line.
    pub fn print_trace(&self, message: &str) {
        log::warn!("{} (line {}: {})", message, self.line, self);
    }
}

impl fmt::Display for DataNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(token)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a DataNode {
    type Item = &'a DataNode;
    type IntoIter = std::slice::Iter<'a, DataNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.iter()
    }
}

/// A parsed data file: the top-level nodes in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataFile {
    root: Vec<DataNode>,
}

impl DataFile {
    /// Read and parse a file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| DataError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file = Self::parse(&text);
        log::debug!("Loaded {} top-level nodes from {:?}", file.root.len(), path);
        Ok(file)
    }

    /// Parse data file text. Never fails; unterminated quotes run to end of line.
    pub fn parse(text: &str) -> Self {
        let lines: Vec<RawLine> = text
            .lines()
            .enumerate()
            .filter_map(|(i, line)| RawLine::parse(line, i + 1))
            .collect();
        let mut cursor = 0;
        let root = build_children(&lines, &mut cursor, None);
        Self { root }
    }

    pub fn nodes(&self) -> &[DataNode] {
        &self.root
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DataNode> {
        self.root.iter()
    }
}

impl<'a> IntoIterator for &'a DataFile {
    type Item = &'a DataNode;
    type IntoIter = std::slice::Iter<'a, DataNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.root.iter()
    }
}

// ── Line tokenizer ──────────────────────────────────────────────────────

struct RawLine {
    indent: usize,
    tokens: Vec<String>,
    line: usize,
}

impl RawLine {
    /// Returns `None` for blank and comment-only lines.
    fn parse(text: &str, line: usize) -> Option<Self> {
        let trimmed = text.trim_start();
        let indent = text.len() - trimmed.len();
        let mut tokens = Vec::new();
        let mut chars = trimmed.chars().peekable();

        while let Some(&c) = chars.peek() {
            if c.is_whitespace() {
                chars.next();
                continue;
            }
            if c == '#' {
                break;
            }
            let mut token = String::new();
            if c == '"' || c == '`' {
                chars.next();
                for next in chars.by_ref() {
                    if next == c {
                        break;
                    }
                    token.push(next);
                }
            } else {
                while let Some(&next) = chars.peek() {
                    if next.is_whitespace() {
                        break;
                    }
                    token.push(next);
                    chars.next();
                }
            }
            tokens.push(token);
        }

        if tokens.is_empty() {
            None
        } else {
            Some(Self { indent, tokens, line })
        }
    }
}

/// Consume every line indented deeper than `parent_indent`, nesting by indent.
fn build_children(lines: &[RawLine], cursor: &mut usize, parent_indent: Option<usize>) -> Vec<DataNode> {
    let mut nodes = Vec::new();
    while let Some(raw) = lines.get(*cursor) {
        if parent_indent.is_some_and(|p| raw.indent <= p) {
            break;
        }
        *cursor += 1;
        let children = build_children(lines, cursor, Some(raw.indent));
        nodes.push(DataNode {
            tokens: raw.tokens.clone(),
            children,
            line: raw.line,
        });
    }
    nodes
}
