//! Binary codecs for palette (`.pal`), sprite (`.spr`) and action (`.act`) files
//!
//! The in-memory decoders return [`FormatError`], which knows nothing about
//! files. The path-based `load`/`save` functions lift those into
//! [`CodecError`], which always names the offending path.

pub mod act;
pub mod pal;
pub mod spr;

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// A malformed byte stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Wrong magic, wrong record count or wrong palette length
    #[error("invalid format: {0}")]
    InvalidFormat(String),
    /// Fewer bytes than the format requires
    #[error("truncated data: needed {needed} bytes, {available} available")]
    TruncatedFile { needed: usize, available: usize },
    /// RLE data that would read past its declared block
    #[error("RLE data of frame {frame} overruns its block at byte {offset}")]
    DecodeOverrun { frame: usize, offset: usize },
}

impl FormatError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        FormatError::InvalidFormat(reason.into())
    }

    /// Attach the path the bytes came from.
    pub fn at(self, path: impl Into<PathBuf>) -> CodecError {
        let path = path.into();
        match self {
            FormatError::InvalidFormat(reason) => CodecError::InvalidFormat { path, reason },
            FormatError::TruncatedFile { needed, available } => {
                CodecError::TruncatedFile { path, needed, available }
            }
            FormatError::DecodeOverrun { frame, offset } => {
                CodecError::DecodeOverrun { path, frame, offset }
            }
        }
    }
}

/// A codec failure tied to a file.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },
    #[error("invalid format in {}: {reason}", .path.display())]
    InvalidFormat { path: PathBuf, reason: String },
    #[error("truncated file {}: needed {needed} bytes, {available} available", .path.display())]
    TruncatedFile { path: PathBuf, needed: usize, available: usize },
    #[error("RLE data of frame {frame} in {} overruns its block at byte {offset}", .path.display())]
    DecodeOverrun { path: PathBuf, frame: usize, offset: usize },
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CodecError {
    /// The file this error is about.
    pub fn path(&self) -> &Path {
        match self {
            CodecError::FileNotFound { path }
            | CodecError::InvalidFormat { path, .. }
            | CodecError::TruncatedFile { path, .. }
            | CodecError::DecodeOverrun { path, .. }
            | CodecError::Io { path, .. } => path,
        }
    }

    /// Map a read failure; a missing file becomes [`CodecError::FileNotFound`].
    pub(crate) fn read(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            CodecError::FileNotFound { path: path.to_path_buf() }
        } else {
            CodecError::Io { path: path.to_path_buf(), source }
        }
    }

    pub(crate) fn write(path: &Path, source: io::Error) -> Self {
        CodecError::Io { path: path.to_path_buf(), source }
    }
}

/// Little-endian byte cursor that never reads out of bounds.
pub(crate) struct Cursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    pub(crate) fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], FormatError> {
        if len > self.remaining() {
            return Err(FormatError::TruncatedFile {
                needed: self.offset + len,
                available: self.data.len(),
            });
        }
        let out = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(out)
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8, FormatError> {
        Ok(self.read_bytes(1)?[0])
    }

    pub(crate) fn read_u16(&mut self) -> Result<u16, FormatError> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_reads_little_endian() {
        let mut cursor = Cursor::new(&[0x34, 0x12, 0xFF]);
        assert_eq!(cursor.read_u16().unwrap(), 0x1234);
        assert_eq!(cursor.read_u8().unwrap(), 0xFF);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_cursor_refuses_overread() {
        let mut cursor = Cursor::new(&[1]);
        assert_eq!(
            cursor.read_u16(),
            Err(FormatError::TruncatedFile { needed: 2, available: 1 })
        );
        // A failed read consumes nothing
        assert_eq!(cursor.offset(), 0);
    }

    #[test]
    fn test_format_error_at_keeps_details() {
        let err = FormatError::TruncatedFile { needed: 10, available: 4 }.at("a.spr");
        assert!(matches!(err, CodecError::TruncatedFile { needed: 10, available: 4, .. }));
        assert_eq!(err.path(), Path::new("a.spr"));
    }

    #[test]
    fn test_read_maps_not_found() {
        let err = CodecError::read(Path::new("x.pal"), io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, CodecError::FileNotFound { .. }));
        let err = CodecError::read(Path::new("x.pal"), io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, CodecError::Io { .. }));
    }
}
