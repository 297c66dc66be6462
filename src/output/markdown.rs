//! Markdown document generation
//!
//! The document starts with a title naming the start URL, then one `##`
//! section per visited page, and ends with a short trailer stating how the
//! run finished.

use crate::output::report::RunStatus;
use crate::output::traits::{DocumentWriter, OutputError, OutputResult, Section};
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Markdown output document
pub struct MarkdownDocument<W: Write> {
    writer: W,
    sections: usize,
    finalized: bool,
}

impl MarkdownDocument<BufWriter<File>> {
    /// Creates (or truncates) the file at `path` and writes the header
    pub fn create(path: &Path, start_url: &str) -> OutputResult<Self> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file), start_url, Utc::now())
    }
}

impl<W: Write> MarkdownDocument<W> {
    /// Wraps any writer and writes the document header
    pub fn new(mut writer: W, start_url: &str, generated_at: DateTime<Utc>) -> OutputResult<Self> {
        writer.write_all(format_header(start_url, generated_at).as_bytes())?;
        writer.flush()?;

        Ok(Self {
            writer,
            sections: 0,
            finalized: false,
        })
    }

    /// Consumes the document and returns the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DocumentWriter for MarkdownDocument<W> {
    fn append_section(&mut self, section: &Section) -> OutputResult<()> {
        if self.finalized {
            return Err(OutputError::AlreadyFinalized);
        }

        self.writer
            .write_all(format_section(section).as_bytes())?;
        self.writer.flush()?;
        self.sections += 1;
        Ok(())
    }

    fn finalize(&mut self, status: &RunStatus) -> OutputResult<()> {
        if self.finalized {
            return Err(OutputError::AlreadyFinalized);
        }
        self.finalized = true;

        self.writer
            .write_all(format_trailer(status, self.sections).as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }

    fn sections_written(&self) -> usize {
        self.sections
    }
}

/// Formats the document title block
pub fn format_header(start_url: &str, generated_at: DateTime<Utc>) -> String {
    format!(
        "# Site transcript: {}\n\n_Generated {}_\n\n",
        escape_inline(start_url),
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )
}

/// Characters that start a block construct when they open a line
const BLOCK_MARKERS: &[char] = &['#', '>', '-', '+', '*', '=', '|', '`', '~'];

/// Characters with inline meaning inside headings and emphasis
const INLINE_MARKERS: &[char] = &['\\', '*', '_', '`', '[', ']', '<', '>'];

/// Formats one page as a markdown section
///
/// Each line of extracted text becomes its own paragraph. Page content is
/// escaped so it can never open a heading, quote, list or rule of its own:
/// the only headings in the document are the section URLs.
pub fn format_section(section: &Section) -> String {
    let mut md = String::new();

    md.push_str(&format!("## {}\n\n", escape_inline(&section.url)));

    if let Some(title) = &section.page_title {
        md.push_str(&format!("_{}_\n\n", escape_inline(title)));
    }

    for line in section.text.lines().filter(|l| !l.trim().is_empty()) {
        md.push_str(&escape_line(line.trim()));
        md.push_str("\n\n");
    }

    md
}

/// Escapes inline markup characters
fn escape_inline(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if INLINE_MARKERS.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Escapes a body line so it stays a plain paragraph
fn escape_line(line: &str) -> String {
    let escaped = escape_inline(line);

    if line.starts_with(BLOCK_MARKERS) && !escaped.starts_with('\\') {
        return format!("\\{}", escaped);
    }

    // Ordered list items: `1.` or `1)`
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 && matches!(line[digits..].chars().next(), Some('.') | Some(')')) {
        return format!("{}\\{}", &escaped[..digits], &escaped[digits..]);
    }

    escaped
}

/// Formats the closing trailer
pub fn format_trailer(status: &RunStatus, sections: usize) -> String {
    let outcome = match status {
        RunStatus::Done(reason) => format!("Crawl completed ({})", reason),
        RunStatus::Aborted(reason) => format!("Crawl aborted ({})", reason),
    };
    format!("---\n\n_{}: {} sections._\n", outcome, sections)
}
