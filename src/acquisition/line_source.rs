//! Line Source
//!
//! Lazily yields the lines of a finite log file. Only the trailing line
//! terminator (`\n` or `\r\n`) is removed; any other whitespace is kept so
//! that anchored patterns see the line exactly as written.
//!
//! The file handle lives inside [`LogLines`] and is released when the
//! iterator is dropped, whether it was exhausted or abandoned early.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Initial capacity for the per-line byte buffer.
const LINE_BUFFER_CAPACITY: usize = 512;

/// Fatal line source errors. None of these are retried.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Cannot open log file {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Read failed in {path} at line {line}: {source}")]
    Read {
        path: PathBuf,
        line: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("Line {line} of {path} is not valid UTF-8")]
    Decode { path: PathBuf, line: u64 },
}

/// A single raw log line with its 1-based position in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub number: u64,
    pub text: String,
}

/// Re-invocable handle to a log file on disk.
#[derive(Debug, Clone)]
pub struct LineSource {
    path: PathBuf,
}

impl LineSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the file and start a fresh pass from the first line.
    pub fn lines(&self) -> Result<LogLines, SourceError> {
        let file = File::open(&self.path).map_err(|source| SourceError::FileAccess {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), "Opened log file");
        Ok(LogLines {
            path: self.path.clone(),
            reader: BufReader::new(file),
            buffer: Vec::with_capacity(LINE_BUFFER_CAPACITY),
            line_number: 0,
            failed: false,
        })
    }
}

/// Iterator over the lines of one pass through a log file.
///
/// After the first error the iterator is fused and yields `None`.
#[derive(Debug)]
pub struct LogLines {
    path: PathBuf,
    reader: BufReader<File>,
    buffer: Vec<u8>,
    line_number: u64,
    failed: bool,
}

impl LogLines {
    fn fail(&mut self, error: SourceError) -> Option<Result<LogLine, SourceError>> {
        self.failed = true;
        Some(Err(error))
    }
}

impl Iterator for LogLines {
    type Item = Result<LogLine, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        self.buffer.clear();
        let bytes = match self.reader.read_until(b'\n', &mut self.buffer) {
            Ok(b) => b,
            Err(source) => {
                let error = SourceError::Read {
                    path: self.path.clone(),
                    line: self.line_number + 1,
                    source,
                };
                return self.fail(error);
            }
        };
        if bytes == 0 {
            return None;
        }
        self.line_number += 1;

        strip_line_terminator(&mut self.buffer);
        match String::from_utf8(std::mem::take(&mut self.buffer)) {
            Ok(text) => Some(Ok(LogLine {
                number: self.line_number,
                text,
            })),
            Err(_) => {
                let error = SourceError::Decode {
                    path: self.path.clone(),
                    line: self.line_number,
                };
                self.fail(error)
            }
        }
    }
}

fn strip_line_terminator(buffer: &mut Vec<u8>) {
    if buffer.last() == Some(&b'\n') {
        buffer.pop();
        if buffer.last() == Some(&b'\r') {
            buffer.pop();
        }
    }
}
