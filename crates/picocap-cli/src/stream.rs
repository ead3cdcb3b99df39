//! Record-stream files: consecutive capture records, no file header.
//!
//! Each record is a fixed 40-byte header followed by the captured bytes.
//! Control fields are little-endian, in declared order: `nic[8]`,
//! `source[8]`, `seconds u64`, `picoseconds u64`, `frame_length u32`,
//! `captured_length u32`. EOF is clean only at a record boundary.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result, bail};

use picocap_core::record::{CaptureRecord, ID_LEN, RecordError};
use picocap_core::TimePico;

pub const RECORD_HEADER_LEN: usize = 2 * ID_LEN + 8 + 8 + 4 + 4;

/// One record read off a stream, owning its frame bytes.
#[derive(Debug, Clone)]
pub struct RecordBuffer {
    nic: [u8; ID_LEN],
    source: [u8; ID_LEN],
    timestamp: TimePico,
    frame_length: u32,
    captured_length: u32,
    frame: Vec<u8>,
}

impl RecordBuffer {
    /// Borrow the buffer as a core record.
    pub fn as_record(&self) -> Result<CaptureRecord<'_>, RecordError> {
        CaptureRecord::new(
            self.nic,
            self.source,
            self.timestamp,
            self.frame_length,
            self.captured_length,
            &self.frame,
        )
    }
}

/// Sequential reader over a record-stream source.
pub struct StreamReader<R> {
    input: R,
    records_read: u64,
}

impl StreamReader<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open capture file: {}", path.display()))?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> StreamReader<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            records_read: 0,
        }
    }

    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Read the next record, or `None` at a clean end of stream.
    pub fn next_record(&mut self) -> Result<Option<RecordBuffer>> {
        // Clean EOF is only legal before a header.
        if self.input.fill_buf().context("read record header")?.is_empty() {
            return Ok(None);
        }

        let mut header = [0u8; RECORD_HEADER_LEN];
        self.input
            .read_exact(&mut header)
            .with_context(|| format!("stream ends inside record {} header", self.records_read))?;

        let mut nic = [0u8; ID_LEN];
        nic.copy_from_slice(&header[0..ID_LEN]);
        let mut source = [0u8; ID_LEN];
        source.copy_from_slice(&header[ID_LEN..2 * ID_LEN]);
        let seconds = le_u64(&header[16..24]);
        let picoseconds = le_u64(&header[24..32]);
        let frame_length = le_u32(&header[32..36]);
        let captured_length = le_u32(&header[36..40]);

        if picoseconds >= picocap_core::picotime::PICOS_PER_SECOND {
            bail!(
                "record {}: picosecond field out of range: {picoseconds}",
                self.records_read
            );
        }

        let mut frame = vec![0u8; captured_length as usize];
        self.input.read_exact(&mut frame).with_context(|| {
            format!(
                "stream ends inside record {} frame ({captured_length} bytes expected)",
                self.records_read
            )
        })?;

        self.records_read += 1;
        Ok(Some(RecordBuffer {
            nic,
            source,
            timestamp: TimePico::new(seconds, picoseconds),
            frame_length,
            captured_length,
            frame,
        }))
    }
}

fn le_u64(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(bytes);
    u64::from_le_bytes(buf)
}

fn le_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(bytes);
    u32::from_le_bytes(buf)
}

/// Append one record in stream layout. Kept with the reader so the two
/// sides of the format stay in one file.
#[cfg(test)]
pub fn write_record(
    out: &mut Vec<u8>,
    nic: &[u8; ID_LEN],
    source: &[u8; ID_LEN],
    timestamp: TimePico,
    frame_length: u32,
    frame: &[u8],
) {
    out.extend_from_slice(nic);
    out.extend_from_slice(source);
    out.extend_from_slice(&timestamp.seconds().to_le_bytes());
    out.extend_from_slice(&timestamp.picoseconds().to_le_bytes());
    out.extend_from_slice(&frame_length.to_le_bytes());
    out.extend_from_slice(&(frame.len() as u32).to_le_bytes());
    out.extend_from_slice(frame);
}
