//! JSON output formatter

use super::OutputFormatter;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// JSON formatter - collects lines and writes one array at the end
pub struct JsonFormatter<W: Write> {
    writer: W,
    pretty: bool,
    lines: Vec<RestoredLine>,
}

/// Data structure for JSON output
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct RestoredLine {
    /// Input file the line came from
    pub source: String,
    /// 1-based line number in the input file
    pub line: usize,
    /// Restored text
    pub text: String,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W, pretty: bool) -> Self {
        Self {
            writer,
            pretty,
            lines: Vec::new(),
        }
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send + Sync> OutputFormatter for JsonFormatter<W> {
    fn format_line(&mut self, source: &Path, line: usize, text: &str) -> Result<()> {
        self.lines.push(RestoredLine {
            source: source.display().to_string(),
            line,
            text: text.to_string(),
        });
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, &self.lines)?;
        } else {
            serde_json::to_writer(&mut self.writer, &self.lines)?;
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
