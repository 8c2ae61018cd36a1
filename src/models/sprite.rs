//! Sprite container types.

use image::RgbaImage;

use super::palette::EmbeddedPalette;

/// Container format version, `major.minor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SpriteVersion {
    pub major: u8,
    pub minor: u8,
}

impl SpriteVersion {
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    /// `major * 100 + minor`, e.g. 201 for version 2.1.
    pub fn as_number(self) -> u16 {
        self.major as u16 * 100 + self.minor as u16
    }

    /// Versions 2.0 and later carry an RGBA image count.
    pub fn has_rgba_images(self) -> bool {
        self.as_number() >= 200
    }

    /// Versions 2.1 and later RLE-compress indexed images.
    pub fn is_rle(self) -> bool {
        self.as_number() >= 201
    }
}

impl std::fmt::Display for SpriteVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// One indexed bitmap. Index 0 renders transparent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    /// `width * height` palette indices, row-major
    pub pixels: Vec<u8>,
}

impl Frame {
    pub fn new(width: u16, height: u16, pixels: Vec<u8>) -> Self {
        Self { width, height, pixels }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Index at `(x, y)`, or `None` outside the frame.
    pub fn index_at(&self, x: u16, y: u16) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y as usize * self.width as usize + x as usize).copied()
    }

    /// Expand to RGBA for display. Index 0 is fully transparent, every other
    /// index opaque.
    pub fn to_rgba(&self, palette: &EmbeddedPalette) -> RgbaImage {
        let mut image = RgbaImage::new(self.width as u32, self.height as u32);
        for (pixel, &index) in image.pixels_mut().zip(&self.pixels) {
            let color = palette.entry(index).color;
            *pixel = color.to_rgba(if index == 0 { 0 } else { 255 });
        }
        image
    }
}

/// A decoded sprite file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    pub version: SpriteVersion,
    pub frames: Vec<Frame>,
    /// RGBA images declared by version 2.0+ files; counted, not decoded
    pub rgba_count: u16,
    pub palette: EmbeddedPalette,
}
