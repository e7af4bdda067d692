//! Document writer for JSONL and JSON-array output

use super::{Document, OutputError};
use serde::Deserialize;
use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Output serialization format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One document per line, flushed as it is written
    #[default]
    Jsonl,
    /// A single array, written atomically on close
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jsonl => "jsonl",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

enum Sink {
    Jsonl(BufWriter<File>),
    /// Buffered documents plus the temp file they will be persisted through
    Json {
        documents: Vec<Document>,
        staging: NamedTempFile,
    },
}

/// Appends documents to the output file
///
/// In JSONL mode every document is on disk as soon as `write` returns. In
/// JSON mode nothing reaches `path` until `close`; dropping the writer
/// without closing it discards the buffered documents.
pub struct DocumentWriter {
    path: PathBuf,
    format: OutputFormat,
    sink: Sink,
    written: usize,
}

impl DocumentWriter {
    /// Opens the output for writing, creating parent directories
    ///
    /// JSONL output truncates an existing file. JSON output stages into a
    /// temporary file in the same directory, so an unwritable location is
    /// reported here rather than at the end of the crawl.
    ///
    /// # Arguments
    ///
    /// * `path` - Output file path
    /// * `format` - Serialization format
    pub fn open(path: impl AsRef<Path>, format: OutputFormat) -> Result<Self, OutputError> {
        let path = path.as_ref().to_path_buf();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let sink = match format {
            OutputFormat::Jsonl => Sink::Jsonl(BufWriter::new(File::create(&path)?)),
            OutputFormat::Json => Sink::Json {
                documents: Vec::new(),
                staging: NamedTempFile::new_in(&dir)?,
            },
        };

        tracing::debug!("Opened {} output at {}", format, path.display());

        Ok(Self {
            path,
            format,
            sink,
            written: 0,
        })
    }

    /// Returns the output path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Writes one document
    pub fn write(&mut self, document: &Document) -> Result<(), OutputError> {
        match &mut self.sink {
            Sink::Jsonl(out) => {
                serde_json::to_writer(&mut *out, document)?;
                out.write_all(b"\n")?;
                out.flush()?;
            }
            Sink::Json { documents, .. } => documents.push(document.clone()),
        }
        self.written += 1;
        Ok(())
    }

    /// Flushes buffered bytes to disk (no-op for JSON mode)
    pub fn flush(&mut self) -> Result<(), OutputError> {
        if let Sink::Jsonl(out) = &mut self.sink {
            out.flush()?;
        }
        Ok(())
    }

    /// Finalizes the output and returns the number of documents written
    pub fn close(self) -> Result<usize, OutputError> {
        match self.sink {
            Sink::Jsonl(mut out) => {
                out.flush()?;
                out.get_ref().sync_all()?;
            }
            Sink::Json {
                documents,
                mut staging,
            } => {
                {
                    let mut out = BufWriter::new(staging.as_file_mut());
                    serde_json::to_writer_pretty(&mut out, &documents)?;
                    out.write_all(b"\n")?;
                    out.flush()?;
                }
                staging.as_file().sync_all()?;
                staging.persist(&self.path)?;
            }
        }

        tracing::debug!("Closed output {} ({} documents)", self.path.display(), self.written);
        Ok(self.written)
    }
}
