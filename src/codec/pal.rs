//! `.pal` palette files
//!
//! A palette file is 256 records of `(R, G, B, Reserved)`, 1024 bytes in all.
//! The reserved byte is ignored on read. On write it is 0 for index 0 and 255
//! for every other index, which is what the companion sprite tools expect for
//! transparency.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use super::{CodecError, FormatError};
use crate::color::Color;
use crate::models::{EmbeddedPalette, Palette, PaletteEntry, PALETTE_SIZE};

/// Bytes per palette record.
pub const RECORD_SIZE: usize = 4;

/// Size of a palette file, and of the palette block embedded in sprites.
pub const PAL_FILE_SIZE: usize = PALETTE_SIZE * RECORD_SIZE;

/// Decode the first 1024 bytes of a palette file.
pub fn decode(bytes: &[u8]) -> Result<Palette, FormatError> {
    if bytes.len() < PAL_FILE_SIZE {
        return Err(FormatError::invalid(format!(
            "palette data is {} bytes, expected at least {}",
            bytes.len(),
            PAL_FILE_SIZE
        )));
    }
    Ok(decode_entries(&bytes[..PAL_FILE_SIZE])?.to_palette())
}

/// Decode exactly 1024 bytes of records, keeping the reserved byte as alpha.
pub fn decode_entries(bytes: &[u8]) -> Result<EmbeddedPalette, FormatError> {
    if bytes.len() != PAL_FILE_SIZE {
        return Err(FormatError::TruncatedFile { needed: PAL_FILE_SIZE, available: bytes.len() });
    }
    let entries = bytes
        .chunks_exact(RECORD_SIZE)
        .map(|rec| PaletteEntry { color: Color::new(rec[0], rec[1], rec[2]), alpha: rec[3] })
        .collect();
    EmbeddedPalette::new(entries).map_err(|e| FormatError::invalid(e.to_string()))
}

/// Encode 256 colours as palette file bytes.
pub fn encode(colors: &[Color]) -> Result<Vec<u8>, FormatError> {
    if colors.len() != PALETTE_SIZE {
        return Err(FormatError::invalid(format!(
            "invalid palette length {}, expected {} colors",
            colors.len(),
            PALETTE_SIZE
        )));
    }
    let mut out = Vec::with_capacity(PAL_FILE_SIZE);
    for (index, color) in colors.iter().enumerate() {
        let reserved = if index == 0 { 0 } else { 255 };
        out.extend_from_slice(&[color.r, color.g, color.b, reserved]);
    }
    Ok(out)
}

/// Load a palette file.
///
/// # Errors
///
/// `FileNotFound` when the path does not exist, `InvalidFormat` when the file
/// is shorter than 1024 bytes.
pub fn load(path: &Path) -> Result<Palette, CodecError> {
    let file = File::open(path).map_err(|e| CodecError::read(path, e))?;
    let mut bytes = Vec::with_capacity(PAL_FILE_SIZE);
    file.take(PAL_FILE_SIZE as u64)
        .read_to_end(&mut bytes)
        .map_err(|e| CodecError::read(path, e))?;
    decode(&bytes).map_err(|e| e.at(path))
}

/// Write a palette file. `colors` must hold exactly 256 entries.
pub fn save(path: &Path, colors: &[Color]) -> Result<(), CodecError> {
    let bytes = encode(colors).map_err(|e| e.at(path))?;
    let mut file = File::create(path).map_err(|e| CodecError::write(path, e))?;
    file.write_all(&bytes).map_err(|e| CodecError::write(path, e))?;
    log::debug!("wrote palette {}", path.display());
    Ok(())
}
