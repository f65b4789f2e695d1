use crate::app::ports::RowSink;
use crate::common::constants::OUTPUT_HEADER;
use crate::common::error::Result;
use crate::common::types::OutputRow;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Appends catalog lines to a text file, flushing after each line so an
/// interrupted run leaves only complete rows behind.
pub struct AppendFileSink {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl AppendFileSink {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        info!("Appending catalog rows to {}", path.display());
        Ok(Self {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{}", line)?;
        self.writer.flush()?;
        Ok(())
    }
}

impl RowSink for AppendFileSink {
    fn write_header(&mut self) -> Result<()> {
        self.write_line(OUTPUT_HEADER)
    }

    fn write_row(&mut self, row: &OutputRow) -> Result<()> {
        self.write_line(&row.to_line())
    }
}

/// In-memory sink, mostly for tests
#[derive(Debug, Default)]
pub struct VecSink {
    pub lines: Vec<String>,
}

impl RowSink for VecSink {
    fn write_header(&mut self) -> Result<()> {
        self.lines.push(OUTPUT_HEADER.to_string());
        Ok(())
    }

    fn write_row(&mut self, row: &OutputRow) -> Result<()> {
        self.lines.push(row.to_line());
        Ok(())
    }
}
