//! Streaming JPEG segment rewriter.
//!
//! # Stream Layout
//!
//! ```text
//! FF D8                       SOI
//! FF xx LL LL <LL-2 bytes>    header segment, length includes itself
//! FF D0..D7 / FF 01           standalone marker, no length
//! ...
//! FF DA ...                   SOS, everything up to end of stream is image data
//! ```
//!
//! Each header segment is handed to a transform closure and re-emitted with
//! whatever it returns. Only one segment is held in memory at a time, plus
//! the image data tail at the end.

use std::collections::BTreeSet;
use std::io::{self, ErrorKind, Read, Write};

use bytes::Bytes;
use tracing::{debug, warn};

use crate::error::JpegError;

use super::marker::Marker;

/// Largest payload a 16-bit length field can describe.
pub const MAX_SEGMENT_PAYLOAD: usize = u16::MAX as usize - 2;

/// Rewrites a JPEG stream one segment at a time.
///
/// Markers in the required set that never appear before SOS/EOI are
/// synthesized: the transform is called with an empty payload for each, in
/// marker order, right before the image data.
#[derive(Debug, Clone, Default)]
pub struct JpegScanner {
    required: BTreeSet<Marker>,
}

impl JpegScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `marker` to be present in the output header.
    pub fn with_required(mut self, marker: Marker) -> Self {
        self.required.insert(marker);
        self
    }

    pub fn required(&self) -> impl Iterator<Item = Marker> + '_ {
        self.required.iter().copied()
    }

    /// Stream `input` to `output`, passing every segment through `transform`.
    ///
    /// `transform` receives each header segment's payload and returns the
    /// payload to write; an empty return drops the segment. At SOS or EOI it
    /// is called once more with the marker and the remaining bytes of the
    /// stream, and its output is written verbatim after the marker.
    ///
    /// # Errors
    /// - `NotAJpeg` if the stream does not open with SOI
    /// - `InvalidSegmentLength` / `TruncatedSegment` for malformed segments
    /// - `SegmentTooLarge` if a transformed payload exceeds 65533 bytes
    /// - `Io` for reader or writer failures
    /// - any error returned by `transform`
    pub fn process<R, W, F, E>(&self, input: R, mut output: W, mut transform: F) -> Result<(), E>
    where
        R: Read,
        W: Write,
        F: FnMut(Marker, Bytes) -> Result<Bytes, E>,
        E: From<JpegError>,
    {
        let mut input = io::BufReader::new(input);

        let mut soi = Vec::with_capacity(2);
        (&mut input)
            .take(2)
            .read_to_end(&mut soi)
            .map_err(JpegError::from)?;
        if soi != Marker::SOI.to_bytes() {
            return Err(JpegError::NotAJpeg(soi).into());
        }
        write_all(&mut output, &soi)?;

        let mut seen = BTreeSet::new();

        loop {
            let Some(marker) = next_marker(&mut input)? else {
                warn!("Stream ended before SOS/EOI, output ends after the last segment");
                break;
            };
            seen.insert(marker);

            if marker.ends_header() {
                for missing in self.required.difference(&seen) {
                    debug!(marker = %missing, "Synthesizing required segment");
                    let payload = transform(*missing, Bytes::new())?;
                    write_segment(&mut output, *missing, &payload)?;
                }

                let mut tail = Vec::new();
                input.read_to_end(&mut tail).map_err(JpegError::from)?;
                debug!(marker = %marker, size = tail.len(), "Copying image data");
                let tail = transform(marker, Bytes::from(tail))?;
                write_all(&mut output, &marker.to_bytes())?;
                write_all(&mut output, &tail)?;
                break;
            }

            if marker.is_standalone() {
                debug!(marker = %marker, "Copying standalone marker");
                write_all(&mut output, &marker.to_bytes())?;
                continue;
            }

            let payload = read_segment(&mut input, marker)?;
            debug!(marker = %marker, size = payload.len(), "Read segment");
            let payload = transform(marker, payload)?;
            write_segment(&mut output, marker, &payload)?;
        }

        output.flush().map_err(JpegError::from)?;
        Ok(())
    }

    /// In-memory convenience over [`JpegScanner::process`].
    pub fn process_bytes<F, E>(&self, input: &[u8], transform: F) -> Result<Vec<u8>, E>
    where
        F: FnMut(Marker, Bytes) -> Result<Bytes, E>,
        E: From<JpegError>,
    {
        let mut output = Vec::with_capacity(input.len());
        self.process(input, &mut output, transform)?;
        Ok(output)
    }
}

fn write_all<W: Write>(output: &mut W, bytes: &[u8]) -> Result<(), JpegError> {
    output.write_all(bytes).map_err(JpegError::from)
}

/// Emit `marker`, its length and `payload`; an empty payload emits nothing.
fn write_segment<W: Write>(output: &mut W, marker: Marker, payload: &[u8]) -> Result<(), JpegError> {
    if payload.is_empty() {
        debug!(marker = %marker, "Dropping empty segment");
        return Ok(());
    }
    if payload.len() > MAX_SEGMENT_PAYLOAD {
        return Err(JpegError::SegmentTooLarge {
            marker: marker.0,
            size: payload.len(),
            max: MAX_SEGMENT_PAYLOAD,
        });
    }
    write_all(output, &marker.to_bytes())?;
    write_all(output, &((payload.len() + 2) as u16).to_be_bytes())?;
    write_all(output, payload)
}

fn read_byte<R: Read>(input: &mut R) -> Result<Option<u8>, JpegError> {
    let mut byte = [0u8; 1];
    loop {
        match input.read(&mut byte) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(byte[0])),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
}

/// Find the next marker, skipping fill bytes and anything that is not one.
///
/// Returns `None` at end of stream.
fn next_marker<R: Read>(input: &mut R) -> Result<Option<Marker>, JpegError> {
    let mut skipped = 0usize;
    loop {
        match read_byte(input)? {
            None => return Ok(None),
            Some(0xFF) => {}
            Some(_) => {
                skipped += 1;
                continue;
            }
        }

        // Any number of 0xFF fill bytes may precede the code
        let code = loop {
            match read_byte(input)? {
                None => return Ok(None),
                Some(0xFF) => continue,
                Some(code) => break code,
            }
        };

        if code == 0x00 {
            // Stuffed zero, not a marker
            skipped += 2;
            continue;
        }

        if skipped > 0 {
            warn!(skipped = skipped, "Skipped bytes between segments");
        }
        return Ok(Some(Marker::from_code(code)));
    }
}

/// Read a segment's length field and payload.
fn read_segment<R: Read>(input: &mut R, marker: Marker) -> Result<Bytes, JpegError> {
    let mut length = [0u8; 2];
    read_exact(input, &mut length, marker, 2)?;
    let length = u16::from_be_bytes(length);
    if length < 2 {
        return Err(JpegError::InvalidSegmentLength {
            marker: marker.0,
            length,
        });
    }

    let expected = length as usize - 2;
    let mut payload = vec![0u8; expected];
    read_exact(input, &mut payload, marker, expected)?;
    Ok(Bytes::from(payload))
}

fn read_exact<R: Read>(
    input: &mut R,
    buf: &mut [u8],
    marker: Marker,
    expected: usize,
) -> Result<(), JpegError> {
    input.read_exact(buf).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => JpegError::TruncatedSegment {
            marker: marker.0,
            expected,
        },
        _ => e.into(),
    })
}

// =============================================================================
// Tests
// =============================================================================
