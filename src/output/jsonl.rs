//! JSON Lines document output
//!
//! One JSON object per visited page, one per line, in visitation order.
//! Finalizing only flushes: a JSON Lines file has no trailer.

use crate::output::report::RunStatus;
use crate::output::traits::{DocumentWriter, OutputError, OutputResult, Section};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct JsonLinesDocument<W: Write> {
    writer: W,
    sections: usize,
    finalized: bool,
}

impl JsonLinesDocument<BufWriter<File>> {
    pub fn create(path: &Path) -> OutputResult<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> JsonLinesDocument<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            sections: 0,
            finalized: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DocumentWriter for JsonLinesDocument<W> {
    fn append_section(&mut self, section: &Section) -> OutputResult<()> {
        if self.finalized {
            return Err(OutputError::AlreadyFinalized);
        }

        let line = serde_json::to_string(section)?;
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.sections += 1;
        Ok(())
    }

    fn finalize(&mut self, status: &RunStatus) -> OutputResult<()> {
        if self.finalized {
            return Err(OutputError::AlreadyFinalized);
        }
        self.finalized = true;

        tracing::debug!(
            "Closing JSON Lines document after {} sections ({})",
            self.sections,
            status
        );
        self.writer.flush()?;
        Ok(())
    }

    fn sections_written(&self) -> usize {
        self.sections
    }
}
