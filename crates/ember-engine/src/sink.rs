//! Serial writer for buffered cell records.
//!
//! Blocks collect records into their own [`CellLog`] while the pass runs.
//! After the pass the driver hands the buffers, in block order, to a
//! [`LogSink`], which writes one `x0, x1, density, temperature` line per
//! record. The sink is generic over [`Write`] so tests can capture output
//! in a `Vec<u8>`.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use ember_derive::CellLog;

use crate::error::LogError;

/// Append-only line writer for cell records.
pub struct LogSink<W: Write> {
    writer: W,
    lines: u64,
}

impl LogSink<BufWriter<File>> {
    /// Open `path` for appending, creating it if absent.
    pub fn append_to(path: &Path) -> Result<Self, LogError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| LogError::Open {
                path: path.display().to_string(),
                source,
            })?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> LogSink<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self { writer, lines: 0 }
    }

    /// Write every record of `log`, one line each.
    pub fn write_log(&mut self, log: &CellLog) -> Result<(), LogError> {
        for record in log.records() {
            writeln!(self.writer, "{record}")?;
            self.lines += 1;
        }
        Ok(())
    }

    /// Write several buffers in order and flush.
    pub fn write_all<'a>(
        &mut self,
        logs: impl IntoIterator<Item = &'a CellLog>,
    ) -> Result<(), LogError> {
        for log in logs {
            self.write_log(log)?;
        }
        self.flush()
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> Result<(), LogError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Lines written so far.
    pub fn lines_written(&self) -> u64 {
        self.lines
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
