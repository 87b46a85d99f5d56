// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Frame layout: `[u32 big-endian payload length][payload]`.

use std::io::{self, ErrorKind, Read, Write};

use byteorder::{BigEndian, ByteOrder};

use crate::error::{Result, TransportError};

pub const FRAME_HEADER_LEN: usize = 4;

/// Default upper bound for inbound payloads.
pub const DEFAULT_MAX_FRAME_BYTES: usize = 16 * 1024 * 1024;

/// Write one frame and flush.
pub fn write_frame<W: Write>(writer: &mut W, payload: &[u8]) -> Result<()> {
    let length =
        u32::try_from(payload.len()).map_err(|_| TransportError::PayloadTooLarge(payload.len()))?;

    let mut frame = Vec::with_capacity(FRAME_HEADER_LEN + payload.len());
    frame.resize(FRAME_HEADER_LEN, 0);
    BigEndian::write_u32(&mut frame[..FRAME_HEADER_LEN], length);
    frame.extend_from_slice(payload);

    writer.write_all(&frame).map_err(TransportError::Send)?;
    writer.flush().map_err(TransportError::Send)
}

/// Read one frame, blocking until it is complete.
///
/// Returns `Ok(None)` when the peer closes the stream before the frame is complete.
pub fn read_frame<R: Read>(reader: &mut R, max_frame_bytes: usize) -> Result<Option<Vec<u8>>> {
    let mut header = [0u8; FRAME_HEADER_LEN];
    if !read_fully(reader, &mut header).map_err(TransportError::Receive)? {
        return Ok(None);
    }

    let length = BigEndian::read_u32(&header) as usize;
    if length > max_frame_bytes {
        return Err(TransportError::FrameTooLarge {
            length,
            limit: max_frame_bytes,
        });
    }

    let mut payload = vec![0u8; length];
    if !read_fully(reader, &mut payload).map_err(TransportError::Receive)? {
        return Ok(None);
    }
    Ok(Some(payload))
}

/// Loop partial reads until `buf` is full. `Ok(false)` on end of stream.
fn read_fully<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<bool> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => return Ok(false),
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(true)
}
