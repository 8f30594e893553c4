//! Byte source used while decoding a package
//!
//! [`ByteCursor`] wraps any `Read + Seek` source (a file or an in-memory buffer) and
//! digests the stream as it is consumed, so the package checksum is known once parsing
//! has drained the input without reading it a second time.

use std::io::{self, Cursor, ErrorKind, Read, Seek, SeekFrom};

use byteorder::ReadBytesExt;
use md5::Md5;
use sha2::{Digest, Sha256};
use tracing::{instrument, trace};

use crate::error::Result;

/// Digests collected over a fully consumed stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamDigest {
    /// Hex encoded SHA-256 of every byte of the stream
    pub sha256: String,

    /// MD5 of the bytes following [`ByteCursor::start_digest`], if it was called
    pub md5: Option<[u8; 16]>,

    /// Number of bytes in the stream
    pub length: u64,
}

/// A seekable byte source that hashes everything it reads.
///
/// Every byte is fed to the SHA-256 digest exactly once, the first time the cursor moves
/// past it. Rewinding (as done by [`ByteCursor::find_magic`]) does not hash bytes twice,
/// and seeking forward reads through the skipped bytes instead of jumping over them.
pub struct ByteCursor<R> {
    inner: R,
    start: u64,
    position: u64,
    hashed: u64,
    sha256: Sha256,
    md5: Option<Md5>,
}

impl<'a> ByteCursor<Cursor<&'a [u8]>> {
    /// Create a cursor over an in-memory buffer
    pub fn from_bytes(data: &'a [u8]) -> Self {
        Self::with_position(Cursor::new(data), 0)
    }
}

impl<R: Read + Seek> ByteCursor<R> {
    /// Wrap a reader, starting at its current position
    pub fn new(mut inner: R) -> Result<Self> {
        let position = inner.stream_position()?;
        Ok(Self::with_position(inner, position))
    }

    fn with_position(inner: R, position: u64) -> Self {
        Self {
            inner,
            start: position,
            position,
            hashed: position,
            sha256: Sha256::new(),
            md5: None,
        }
    }

    /// Current offset in the underlying stream
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Advance until `magic` is found and rewind to the start of the match.
    ///
    /// Returns `false` once the stream is exhausted without a match, in which case the
    /// position of the cursor is undefined.
    #[instrument(skip(self, magic), level = "trace", ret, err)]
    pub fn find_magic<const N: usize>(&mut self, magic: &[u8; N]) -> Result<bool> {
        if N == 0 {
            return Ok(true);
        }

        let mut window = [0u8; N];
        let mut seen = 0usize;
        loop {
            let byte = match self.read_u8() {
                Ok(byte) => byte,
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(false),
                Err(e) => return Err(e.into()),
            };

            window.rotate_left(1);
            window[N - 1] = byte;
            seen += 1;

            if seen >= N && &window == magic {
                self.seek(SeekFrom::Current(-(N as i64)))?;
                trace!(position = self.position, skipped = seen - N, "found magic");
                return Ok(true);
            }
        }
    }

    /// Begin feeding every subsequent read into an MD5 digest.
    ///
    /// The cursor must only move forward after this call.
    pub(crate) fn start_digest(&mut self) {
        self.md5 = Some(Md5::new());
    }

    /// Drain the rest of the stream and return the collected digests
    #[instrument(skip(self), err)]
    pub fn finish(mut self) -> Result<StreamDigest> {
        io::copy(&mut self, &mut io::sink())?;

        Ok(StreamDigest {
            sha256: hex::encode(self.sha256.finalize()),
            md5: self.md5.map(|md5| {
                let mut out = [0u8; 16];
                out.copy_from_slice(&md5.finalize());
                out
            }),
            length: self.hashed - self.start,
        })
    }

    /// Unwrap and return the inner reader object
    ///
    /// The position of the reader is undefined.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for ByteCursor<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let read = self.inner.read(buf)?;
        let data = &buf[..read];
        let end = self.position + read as u64;

        if end > self.hashed {
            let fresh = (end - self.hashed).min(read as u64) as usize;
            self.sha256.update(&data[read - fresh..]);
            self.hashed = end;
        }
        if let Some(md5) = self.md5.as_mut() {
            md5.update(data);
        }

        self.position = end;
        Ok(read)
    }
}

impl<R: Read + Seek> Seek for ByteCursor<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = self.inner.seek(pos)?;
        if target <= self.hashed {
            self.position = target;
            return Ok(target);
        }

        // Read through the gap so nothing escapes the digest
        self.position = self.inner.seek(SeekFrom::Start(self.hashed))?;
        let gap = target - self.hashed;
        io::copy(&mut self.by_ref().take(gap), &mut io::sink())?;
        if self.position < target {
            self.position = self.inner.seek(SeekFrom::Start(target))?;
        }
        Ok(self.position)
    }
}
