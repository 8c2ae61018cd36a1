//! `.act` action file headers
//!
//! Only the fixed header is read: signature, version and action count. The
//! per-action frame tables are variable-length and are not decoded here.

use std::path::Path;

use super::{CodecError, Cursor, FormatError};

/// File signature.
pub const MAGIC: [u8; 2] = *b"AC";

/// Bytes in the header, including the reserved tail.
pub const HEADER_SIZE: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActHeader {
    pub major: u8,
    pub minor: u8,
    pub action_count: u16,
}

impl ActHeader {
    /// `major * 100 + minor`.
    pub fn version(&self) -> u16 {
        self.major as u16 * 100 + self.minor as u16
    }

    pub fn parse(data: &[u8]) -> Result<Self, FormatError> {
        let mut cursor = Cursor::new(data);
        let magic = cursor.read_bytes(2)?;
        if magic != MAGIC {
            return Err(FormatError::invalid("missing \"AC\" action signature"));
        }
        let minor = cursor.read_u8()?;
        let major = cursor.read_u8()?;
        let action_count = cursor.read_u16()?;
        cursor.read_bytes(HEADER_SIZE - cursor.offset())?;
        Ok(Self { major, minor, action_count })
    }

    pub fn load(path: &Path) -> Result<Self, CodecError> {
        let data = std::fs::read(path).map_err(|e| CodecError::read(path, e))?;
        Self::parse(&data).map_err(|e| e.at(path))
    }
}
