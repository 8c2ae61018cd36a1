//! `.spr` sprite containers
//!
//! Layout (all integers little-endian):
//!
//! ```text
//! "SP" minor:u8 major:u8 indexed_count:u16 [rgba_count:u16 if >= 2.0]
//! indexed_count x { width:u16 height:u16 [encoded_size:u16 if >= 2.1] payload }
//! ... RGBA images (>= 2.0, skipped) ...
//! 1024-byte palette (R, G, B, A records)
//! ```
//!
//! Version 2.1+ payloads are run-length encoded: a zero byte is followed by a
//! count of transparent pixels, any other byte is a literal palette index.

use std::path::Path;

use super::pal::{self, PAL_FILE_SIZE};
use super::{CodecError, Cursor, FormatError};
use crate::models::{Frame, Sprite, SpriteVersion};

/// File signature.
pub const MAGIC: [u8; 2] = *b"SP";

/// Header fields, as read before any image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteHeader {
    pub version: SpriteVersion,
    pub indexed_count: u16,
    pub rgba_count: u16,
}

fn read_header(cursor: &mut Cursor<'_>) -> Result<SpriteHeader, FormatError> {
    let magic = cursor.read_bytes(2)?;
    if magic != MAGIC {
        return Err(FormatError::invalid(format!(
            "bad sprite signature {:02X} {:02X}, expected \"SP\"",
            magic[0], magic[1]
        )));
    }
    let minor = cursor.read_u8()?;
    let major = cursor.read_u8()?;
    let version = SpriteVersion::new(major, minor);
    let indexed_count = cursor.read_u16()?;
    let rgba_count = if version.has_rgba_images() { cursor.read_u16()? } else { 0 };
    Ok(SpriteHeader { version, indexed_count, rgba_count })
}

/// Decode a whole sprite file.
pub fn decode(data: &[u8]) -> Result<Sprite, FormatError> {
    // Signature first, so any non-sprite is reported as such
    if data.len() < MAGIC.len() {
        return Err(FormatError::TruncatedFile { needed: MAGIC.len(), available: data.len() });
    }
    if data[..2] != MAGIC {
        return Err(FormatError::invalid(format!(
            "bad sprite signature {:02X} {:02X}, expected \"SP\"",
            data[0], data[1]
        )));
    }
    if data.len() < PAL_FILE_SIZE {
        return Err(FormatError::TruncatedFile { needed: PAL_FILE_SIZE, available: data.len() });
    }

    let (body, palette_bytes) = data.split_at(data.len() - PAL_FILE_SIZE);
    let mut cursor = Cursor::new(body);
    let header = read_header(&mut cursor)?;

    let mut frames = Vec::with_capacity(header.indexed_count as usize);
    for index in 0..header.indexed_count as usize {
        frames.push(read_frame(&mut cursor, header.version, index)?);
    }

    let palette = pal::decode_entries(palette_bytes)?;
    log::debug!(
        "decoded sprite v{} with {} indexed and {} RGBA images",
        header.version,
        frames.len(),
        header.rgba_count
    );

    Ok(Sprite { version: header.version, frames, rgba_count: header.rgba_count, palette })
}

fn read_frame(
    cursor: &mut Cursor<'_>,
    version: SpriteVersion,
    index: usize,
) -> Result<Frame, FormatError> {
    let width = cursor.read_u16()?;
    let height = cursor.read_u16()?;
    let pixel_count = width as usize * height as usize;

    let pixels = if version.is_rle() {
        let encoded_size = cursor.read_u16()? as usize;
        let block = cursor.read_bytes(encoded_size)?;
        decode_rle(block, pixel_count, index)?
    } else {
        cursor.read_bytes(pixel_count)?.to_vec()
    };

    Ok(Frame { width, height, pixels })
}

/// Expand one RLE block into exactly `pixel_count` indices.
///
/// Decoding stops when the output is full or the block is exhausted; any
/// pixels not produced stay transparent. A transparent run longer than the
/// remaining space is cut short. A run marker whose count byte lies outside
/// the block is a [`FormatError::DecodeOverrun`].
pub fn decode_rle(block: &[u8], pixel_count: usize, frame: usize) -> Result<Vec<u8>, FormatError> {
    let mut out = vec![0u8; pixel_count];
    let mut written = 0;
    let mut pos = 0;

    while written < pixel_count && pos < block.len() {
        let byte = block[pos];
        pos += 1;

        if byte == 0 {
            let Some(&run) = block.get(pos) else {
                return Err(FormatError::DecodeOverrun { frame, offset: pos });
            };
            pos += 1;
            let room = pixel_count - written;
            let run = run as usize;
            if run > room {
                log::warn!("frame {frame}: transparent run of {run} truncated to {room} pixels");
            }
            // Output is pre-filled with index 0
            written += run.min(room);
        } else {
            out[written] = byte;
            written += 1;
        }
    }

    if written < pixel_count {
        log::warn!("frame {frame}: RLE block ended after {written} of {pixel_count} pixels");
    }

    Ok(out)
}

/// Run-length encode indices: zeros become `0, count` pairs.
pub fn encode_rle(pixels: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(pixels.len());
    let mut i = 0;
    while i < pixels.len() {
        if pixels[i] == 0 {
            let run = pixels[i..].iter().take(255).take_while(|&&p| p == 0).count();
            out.extend_from_slice(&[0, run as u8]);
            i += run;
        } else {
            out.push(pixels[i]);
            i += 1;
        }
    }
    out
}

/// Encode a sprite. RGBA images are not supported, so `rgba_count` must be 0.
pub fn encode(sprite: &Sprite) -> Result<Vec<u8>, FormatError> {
    if sprite.rgba_count != 0 {
        return Err(FormatError::invalid("cannot encode RGBA images"));
    }
    let frame_count = u16::try_from(sprite.frames.len())
        .map_err(|_| FormatError::invalid(format!("too many frames: {}", sprite.frames.len())))?;

    let version = sprite.version;
    let mut out = Vec::new();
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&[version.minor, version.major]);
    out.extend_from_slice(&frame_count.to_le_bytes());
    if version.has_rgba_images() {
        out.extend_from_slice(&0u16.to_le_bytes());
    }

    for (index, frame) in sprite.frames.iter().enumerate() {
        if frame.pixels.len() != frame.pixel_count() {
            return Err(FormatError::invalid(format!(
                "frame {index} has {} pixels, expected {}",
                frame.pixels.len(),
                frame.pixel_count()
            )));
        }
        out.extend_from_slice(&frame.width.to_le_bytes());
        out.extend_from_slice(&frame.height.to_le_bytes());
        if version.is_rle() {
            let block = encode_rle(&frame.pixels);
            let size = u16::try_from(block.len()).map_err(|_| {
                FormatError::invalid(format!("frame {index} encodes to {} bytes", block.len()))
            })?;
            out.extend_from_slice(&size.to_le_bytes());
            out.extend_from_slice(&block);
        } else {
            out.extend_from_slice(&frame.pixels);
        }
    }

    for entry in sprite.palette.entries() {
        out.extend_from_slice(&[entry.color.r, entry.color.g, entry.color.b, entry.alpha]);
    }
    Ok(out)
}

/// Read and decode a sprite file.
pub fn load(path: &Path) -> Result<Sprite, CodecError> {
    let data = std::fs::read(path).map_err(|e| CodecError::read(path, e))?;
    decode(&data).map_err(|e| e.at(path))
}

/// Read only the embedded palette of a sprite file.
///
/// Fails with `TruncatedFile` when the file is shorter than a palette block.
pub fn load_palette(path: &Path) -> Result<crate::models::EmbeddedPalette, CodecError> {
    let data = std::fs::read(path).map_err(|e| CodecError::read(path, e))?;
    if data.len() < PAL_FILE_SIZE {
        return Err(CodecError::TruncatedFile {
            path: path.to_path_buf(),
            needed: PAL_FILE_SIZE,
            available: data.len(),
        });
    }
    pal::decode_entries(&data[data.len() - PAL_FILE_SIZE..]).map_err(|e| e.at(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::models::{EmbeddedPalette, PaletteEntry};

    fn test_palette() -> EmbeddedPalette {
        let entries = (0..=255u8)
            .map(|i| PaletteEntry { color: Color::new(i, 0, 255 - i), alpha: if i == 0 { 0 } else { 255 } })
            .collect();
        EmbeddedPalette::new(entries).unwrap()
    }

    fn sprite(version: SpriteVersion, frames: Vec<Frame>) -> Sprite {
        Sprite { version, frames, rgba_count: 0, palette: test_palette() }
    }

    #[test]
    fn test_rle_example() {
        assert_eq!(decode_rle(&[0x00, 0x05, 0x07], 6, 0).unwrap(), vec![0, 0, 0, 0, 0, 7]);
    }

    #[test]
    fn test_rle_truncates_long_run() {
        assert_eq!(decode_rle(&[3, 0, 200, 9], 4, 0).unwrap(), vec![3, 0, 0, 0]);
    }

    #[test]
    fn test_rle_stops_when_output_full() {
        assert_eq!(decode_rle(&[1, 2, 3, 4, 5], 3, 0).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_rle_short_block_leaves_transparent_tail() {
        assert_eq!(decode_rle(&[9], 3, 0).unwrap(), vec![9, 0, 0]);
    }

    #[test]
    fn test_rle_marker_without_count_is_overrun() {
        assert_eq!(
            decode_rle(&[4, 0], 8, 2),
            Err(FormatError::DecodeOverrun { frame: 2, offset: 2 })
        );
    }

    #[test]
    fn test_encode_rle_splits_long_runs() {
        let pixels = vec![0u8; 300];
        let encoded = encode_rle(&pixels);
        assert_eq!(encoded, vec![0, 255, 0, 45]);
        assert_eq!(decode_rle(&encoded, 300, 0).unwrap(), pixels);
    }

    #[test]
    fn test_decode_rle_sprite() {
        let frames = vec![
            Frame::new(3, 2, vec![0, 0, 5, 6, 0, 7]),
            Frame::new(1, 1, vec![42]),
        ];
        let original = sprite(SpriteVersion::new(2, 1), frames);
        let bytes = encode(&original).unwrap();
        assert_eq!(&bytes[..4], &[b'S', b'P', 1, 2]);
        assert_eq!(decode(&bytes).unwrap(), original);
    }

    #[test]
    fn test_decode_raw_sprite_v1() {
        let original = sprite(SpriteVersion::new(1, 0), vec![Frame::new(2, 2, vec![1, 0, 0, 4])]);
        let bytes = encode(&original).unwrap();
        // No RGBA count in 1.x headers
        assert_eq!(bytes.len(), 6 + 4 + 4 + PAL_FILE_SIZE);
        assert_eq!(decode(&bytes).unwrap(), original);
    }

    #[test]
    fn test_decode_v2_0_reads_rgba_count() {
        let mut bytes = vec![b'S', b'P', 0, 2, 0, 0, 3, 0];
        bytes.extend_from_slice(&[0u8; 64]); // RGBA data, skipped
        bytes.extend_from_slice(&vec![0u8; PAL_FILE_SIZE]);
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.rgba_count, 3);
        assert!(decoded.frames.is_empty());
    }

    #[test]
    fn test_trailing_palette_keeps_alpha() {
        let bytes = encode(&sprite(SpriteVersion::new(2, 1), vec![])).unwrap();
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.palette.entry(0).alpha, 0);
        assert_eq!(decoded.palette.entry(10).color, Color::new(10, 0, 245));
    }

    #[test]
    fn test_bad_magic_is_invalid_format() {
        let mut bytes = vec![b'X', b'Y', 1, 2, 0, 0];
        bytes.extend_from_slice(&vec![0u8; PAL_FILE_SIZE]);
        assert!(matches!(decode(&bytes), Err(FormatError::InvalidFormat(_))));
        // Even when the file is too short for a palette
        assert!(matches!(decode(b"PK\x03\x04"), Err(FormatError::InvalidFormat(_))));
    }

    #[test]
    fn test_short_file_is_truncated() {
        assert!(matches!(
            decode(b"SP\x01\x02\x00\x00"),
            Err(FormatError::TruncatedFile { needed: PAL_FILE_SIZE, .. })
        ));
        assert!(matches!(decode(b"S"), Err(FormatError::TruncatedFile { .. })));
    }

    #[test]
    fn test_frame_overrunning_body_is_truncated() {
        let mut bytes = vec![b'S', b'P', 1, 2, 1, 0, 0, 0];
        // width 4, height 4, encoded size 50 but only 3 bytes follow
        bytes.extend_from_slice(&[4, 0, 4, 0, 50, 0, 1, 2, 3]);
        bytes.extend_from_slice(&vec![0u8; PAL_FILE_SIZE]);
        assert!(matches!(decode(&bytes), Err(FormatError::TruncatedFile { .. })));
    }

    #[test]
    fn test_load_attaches_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.spr");
        std::fs::write(&path, b"NOTASPRITE").unwrap();
        let err = load(&path).unwrap_err();
        assert!(matches!(err, CodecError::InvalidFormat { .. }));
        assert_eq!(err.path(), path.as_path());

        let missing = load(&dir.path().join("missing.spr")).unwrap_err();
        assert!(matches!(missing, CodecError::FileNotFound { .. }));
    }

    #[test]
    fn test_load_palette_only() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("s.spr");
        std::fs::write(&path, encode(&sprite(SpriteVersion::new(2, 1), vec![])).unwrap()).unwrap();
        assert_eq!(load_palette(&path).unwrap(), test_palette());

        std::fs::write(&path, b"SP\x01\x02").unwrap();
        assert!(matches!(load_palette(&path), Err(CodecError::TruncatedFile { .. })));
    }
}
