//! Writer for the indentation-structured data format read by [`DataFile`](crate::data_file::DataFile).

use std::path::Path;

use crate::data_file::DataNode;
use crate::error::DataError;

/// Accumulates data file text, one line per [`write`](DataWriter::write) call.
#[derive(Debug, Clone, Default)]
pub struct DataWriter {
    text: String,
    indent: usize,
}

impl DataWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write one line at the current indentation, quoting tokens as needed.
    pub fn write<I, T>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        for _ in 0..self.indent {
            self.text.push('\t');
        }
        for (i, token) in tokens.into_iter().enumerate() {
            if i > 0 {
                self.text.push(' ');
            }
            self.text.push_str(&quote(token.as_ref()));
        }
        self.text.push('\n');
    }

    /// Lines written until the matching [`end_child`](DataWriter::end_child) nest under the previous line.
    pub fn begin_child(&mut self) {
        self.indent += 1;
    }

    pub fn end_child(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// Copy a node and all of its children verbatim.
    pub fn write_node(&mut self, node: &DataNode) {
        self.write(node.tokens());
        if node.has_children() {
            self.begin_child();
            for child in node {
                self.write_node(child);
            }
            self.end_child();
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DataError> {
        let path = path.as_ref();
        std::fs::write(path, &self.text).map_err(|source| DataError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Format a number the way the data files store it: integers without a
/// fractional part, everything else in shortest round-trip form.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

fn quote(token: &str) -> String {
    let needs_quotes = token.is_empty()
        || token.starts_with('#')
        || token.starts_with('`')
        || token.starts_with('"')
        || token.chars().any(char::is_whitespace);
    if !needs_quotes {
        token.to_string()
    } else if token.contains('"') {
        // Backtick quoting can't hold a backtick, so it is dropped.
        if token.contains('`') {
            log::warn!("Dropping backticks from token that needs quoting: {}", token);
        }
        format!("`{}`", token.replace('`', ""))
    } else {
        format!("\"{}\"", token)
    }
}
