//! Error types for the syntax compiler.

use std::fmt;
use std::io;

/// An error that occurred while compiling a syntax file.
#[derive(Debug, Clone)]
pub struct CompileError {
    pub message: String,
    pub line: usize,
    pub col: usize,
    pub kind: ErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lex,
    Syntax,
    Semantic,
    Io,
}

impl CompileError {
    pub fn lex(message: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            message: message.into(),
            line,
            col,
            kind: ErrorKind::Lex,
        }
    }

    pub fn syntax(message: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            message: message.into(),
            line,
            col,
            kind: ErrorKind::Syntax,
        }
    }

    pub fn semantic(message: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            message: message.into(),
            line,
            col,
            kind: ErrorKind::Semantic,
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: 0,
            col: 0,
            kind: ErrorKind::Io,
        }
    }

    /// Process exit status corresponding to this kind of error.
    pub fn exit_code(&self) -> i32 {
        match self.kind {
            ErrorKind::Io => 1,
            ErrorKind::Lex | ErrorKind::Syntax | ErrorKind::Semantic => 3,
        }
    }

    /// Render the diagnostic, annotated with the offending source line and
    /// a caret marker under the token start.
    pub fn render(&self, source: &str) -> String {
        if self.line == 0 {
            return format!("{}\n", self.message);
        }
        let mut out = format!("{}:{}: {}\n", self.line, self.col, self.message);
        if let Some(line) = source.lines().nth(self.line - 1) {
            out.push_str(line);
            out.push('\n');
            out.push_str(&" ".repeat(self.col.saturating_sub(1)));
            out.push_str("^^^^^\n");
        }
        out
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}:{}: {}", self.line, self.col, self.message)
        }
    }
}

impl std::error::Error for CompileError {}

impl From<io::Error> for CompileError {
    fn from(err: io::Error) -> Self {
        Self::io(err.to_string())
    }
}
