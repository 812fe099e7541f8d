//! Line-oriented makefile writer
//!
//! Wraps any `io::Write` sink. Every line is handed to the sink in a single `write_all` so a failing sink fails on
//! a whole line, never half of one.

use std::io::{self, Write};

/// Writer that emits complete makefile lines
pub struct MakeWriter<'a> {
    /// The output sink
    sink: &'a mut dyn Write,
    /// Lines successfully written so far
    lines_written: usize,
}

impl<'a> MakeWriter<'a> {
    /// Create a writer over `sink`
    pub fn new(sink: &'a mut dyn Write) -> Self {
        Self {
            sink,
            lines_written: 0,
        }
    }

    /// Write a line followed by a newline
    pub fn line(&mut self, s: &str) -> io::Result<()> {
        let mut buf = String::with_capacity(s.len() + 1);
        buf.push_str(s);
        buf.push('\n');
        self.sink.write_all(buf.as_bytes())?;
        self.lines_written += 1;
        Ok(())
    }

    /// Write a tab-prefixed line (recipe commands and list continuations)
    pub fn tabbed(&mut self, s: &str) -> io::Result<()> {
        self.line(&format!("\t{}", s))
    }

    /// Write an empty separator line
    pub fn blank(&mut self) -> io::Result<()> {
        self.line("")
    }

    /// Flush the underlying sink
    pub fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }

    /// Number of lines written so far
    pub fn lines_written(&self) -> usize {
        self.lines_written
    }
}
