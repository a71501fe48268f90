//! Streaming dataset writer
//!
//! Encodes an exact number of keys from a [`KeyStream`] into the binary dataset
//! format without materializing the sequence. Output goes through a `BufWriter`
//! (1 MiB by default), so the hot loop is one range check and a small `memcpy`
//! per element.
//!
//! # State machine
//!
//! ```text
//! Created -> HeaderWritten -> Streaming(i) -> Finalized
//!     \____________\______________\________-> Failed
//! ```
//!
//! Any error moves the writer to `Failed`; a failed writer accepts no further
//! operations. Nothing is retried and nothing is cleaned up: a partially written
//! destination is the caller's to delete.
//!
//! # Example
//!
//! ```
//! use keyforge::dataset::{write_dataset, ByteWidth, WriteOptions};
//! use keyforge::distribution::dense::DenseStream;
//! use keyforge::progress::NoProgress;
//!
//! let mut keys = DenseStream::new(1);
//! let bytes = write_dataset(
//!     Vec::new(),
//!     &mut keys,
//!     3,
//!     ByteWidth::Four,
//!     &WriteOptions::default(),
//!     &mut NoProgress,
//! )
//! .unwrap();
//!
//! assert_eq!(bytes.len(), 8 + 3 * 4);
//! assert_eq!(&bytes[..8], &3u64.to_le_bytes());
//! ```

use super::{encode_header, encode_value, expected_file_size, ByteWidth};
use crate::distribution::KeyStream;
use crate::error::DatasetError;
use crate::progress::{ProgressSink, ProgressTracker, DEFAULT_PROGRESS_INTERVAL};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Default output buffer size
pub const DEFAULT_BUFFER_CAPACITY: usize = 1024 * 1024;

/// Tuning knobs for a single dataset write
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Output buffer size in bytes
    pub buffer_capacity: usize,

    /// Elements between progress updates
    pub progress_interval: u64,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

/// Writer lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    Created,
    HeaderWritten,
    Streaming { written: u64 },
    Finalized,
    Failed,
}

impl WriterState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::HeaderWritten => "header-written",
            Self::Streaming { .. } => "streaming",
            Self::Finalized => "finalized",
            Self::Failed => "failed",
        }
    }
}

/// Sequential writer for one dataset
pub struct DatasetWriter<W: Write> {
    out: BufWriter<W>,
    count: u64,
    width: ByteWidth,
    progress_interval: u64,
    state: WriterState,
}

impl<W: Write> DatasetWriter<W> {
    /// Writer for `count` elements of `width` bytes with default options
    pub fn new(sink: W, count: u64, width: ByteWidth) -> Self {
        Self::with_options(sink, count, width, &WriteOptions::default())
    }

    pub fn with_options(sink: W, count: u64, width: ByteWidth, options: &WriteOptions) -> Self {
        Self {
            out: BufWriter::with_capacity(options.buffer_capacity, sink),
            count,
            width,
            progress_interval: options.progress_interval,
            state: WriterState::Created,
        }
    }

    pub fn state(&self) -> WriterState {
        self.state
    }

    /// Declared element count
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn width(&self) -> ByteWidth {
        self.width
    }

    /// Elements appended so far
    pub fn written(&self) -> u64 {
        match self.state {
            WriterState::Streaming { written } => written,
            WriterState::Finalized => self.count,
            _ => 0,
        }
    }

    /// Underlying sink (bytes still in the buffer are not visible here)
    pub fn get_ref(&self) -> &W {
        self.out.get_ref()
    }

    /// Write the 8-byte count header
    pub fn write_header(&mut self) -> Result<(), DatasetError> {
        if self.state != WriterState::Created {
            return Err(self.invalid_state("write the header"));
        }

        let result = self.out.write_all(&encode_header(self.count));
        self.check_io(result, "failed to write dataset header")?;
        self.state = WriterState::HeaderWritten;
        Ok(())
    }

    /// Encode and append one element
    ///
    /// A value that does not fit the width fails the writer before any of its
    /// bytes reach the buffer.
    #[inline]
    pub fn push(&mut self, value: u64) -> Result<(), DatasetError> {
        let written = match self.state {
            WriterState::HeaderWritten => 0,
            WriterState::Streaming { written } => written,
            _ => return Err(self.invalid_state("append a value")),
        };

        if written >= self.count {
            return Err(DatasetError::InvalidState {
                operation: "append beyond the declared count",
                state: self.state.name(),
            });
        }

        let encoded = match encode_value(value, written, self.width) {
            Ok(encoded) => encoded,
            Err(e) => {
                self.state = WriterState::Failed;
                return Err(e);
            }
        };

        let result = self.out.write_all(encoded.as_bytes());
        self.check_io(result, "failed to write dataset element")?;
        self.state = WriterState::Streaming {
            written: written + 1,
        };
        Ok(())
    }

    /// Pull the remaining elements from `stream`
    ///
    /// Writes the header first if needed, then draws exactly
    /// `count - written()` keys.
    pub fn write_stream<S>(
        &mut self,
        stream: &mut S,
        progress: &mut dyn ProgressSink,
    ) -> Result<(), DatasetError>
    where
        S: KeyStream + ?Sized,
    {
        match self.state {
            WriterState::Created => self.write_header()?,
            WriterState::Finalized | WriterState::Failed => {
                return Err(self.invalid_state("stream values"))
            }
            _ => {}
        }

        let mut written = self.written();
        let mut tracker = ProgressTracker::new(self.count, self.progress_interval);
        tracker.start(written, progress);

        while written < self.count {
            let value = match stream.next_value() {
                Ok(value) => value,
                Err(e) => {
                    self.state = WriterState::Failed;
                    return Err(with_requested(e, self.count));
                }
            };
            self.push(value)?;
            written += 1;
            tracker.record(written, progress);
        }

        tracker.finish(progress);
        Ok(())
    }

    /// Flush buffered bytes; requires every declared element to be written
    pub fn finalize(&mut self) -> Result<(), DatasetError> {
        let complete = match self.state {
            WriterState::HeaderWritten => self.count == 0,
            WriterState::Streaming { written } => written == self.count,
            _ => false,
        };
        if !complete {
            return Err(self.invalid_state("finalize"));
        }

        let result = self.out.flush();
        self.check_io(result, "failed to flush dataset buffer")?;
        self.state = WriterState::Finalized;
        Ok(())
    }

    /// Return the sink of a finalized writer
    pub fn into_inner(self) -> Result<W, DatasetError> {
        if self.state != WriterState::Finalized {
            return Err(self.invalid_state("release the sink"));
        }
        self.out
            .into_inner()
            .map_err(|e| DatasetError::io("failed to flush dataset buffer", e.into_error()))
    }

    /// `finalize` followed by `into_inner`
    pub fn finish(mut self) -> Result<W, DatasetError> {
        self.finalize()?;
        self.into_inner()
    }

    fn invalid_state(&self, operation: &'static str) -> DatasetError {
        DatasetError::InvalidState {
            operation,
            state: self.state.name(),
        }
    }

    fn check_io(&mut self, result: io::Result<()>, context: &str) -> Result<(), DatasetError> {
        result.map_err(|e| {
            self.state = WriterState::Failed;
            DatasetError::io(context, e)
        })
    }
}

/// Stream adapters don't know the requested amount; fill it in
fn with_requested(err: DatasetError, count: u64) -> DatasetError {
    match err {
        DatasetError::StreamExhausted { produced, .. } => DatasetError::StreamExhausted {
            produced,
            requested: count,
        },
        other => other,
    }
}

/// Write a complete dataset to `sink` and return the sink
pub fn write_dataset<W, S>(
    sink: W,
    stream: &mut S,
    count: u64,
    width: ByteWidth,
    options: &WriteOptions,
    progress: &mut dyn ProgressSink,
) -> Result<W, DatasetError>
where
    W: Write,
    S: KeyStream + ?Sized,
{
    let mut writer = DatasetWriter::with_options(sink, count, width, options);
    writer.write_stream(stream, progress)?;
    writer.finish()
}

/// Create (or truncate) `path` and write a complete dataset into it
///
/// The file is synced before returning so late write errors are not lost.
/// Returns the file size in bytes.
pub fn write_dataset_file<S>(
    path: &Path,
    stream: &mut S,
    count: u64,
    width: ByteWidth,
    options: &WriteOptions,
    progress: &mut dyn ProgressSink,
) -> Result<u64, DatasetError>
where
    S: KeyStream + ?Sized,
{
    let file = File::create(path)
        .map_err(|e| DatasetError::io(format!("failed to create {}", path.display()), e))?;

    let file = write_dataset(file, stream, count, width, options, progress)?;
    file.sync_all()
        .map_err(|e| DatasetError::io(format!("failed to sync {}", path.display()), e))?;

    Ok(expected_file_size(count, width))
}
