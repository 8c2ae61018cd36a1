//! PNG swatches of palettes

use std::io;
use std::path::Path;

use image::{Rgba, RgbaImage};
use thiserror::Error;

use crate::models::Palette;

/// Cells per swatch row.
pub const SWATCH_COLUMNS: u32 = 16;
/// Edge length of one cell in pixels.
pub const CELL_SIZE: u32 = 16;

#[derive(Debug, Error)]
pub enum SwatchError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Render a 16x16 grid of colour cells, colour `i` at column `i % 16`, row `i / 16`.
pub fn render_swatch(palette: &Palette) -> RgbaImage {
    let side = SWATCH_COLUMNS * CELL_SIZE;
    RgbaImage::from_fn(side, side, |x, y| {
        let index = (y / CELL_SIZE) * SWATCH_COLUMNS + x / CELL_SIZE;
        match palette.colors().get(index as usize) {
            Some(color) => color.to_rgba(255),
            None => Rgba([0, 0, 0, 0]),
        }
    })
}

/// Save an RGBA image as PNG, creating parent directories as needed.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), SwatchError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    image.save(path)?;
    Ok(())
}

/// Render and save a palette swatch.
pub fn save_swatch(palette: &Palette, path: &Path) -> Result<(), SwatchError> {
    save_png(&render_swatch(palette), path)?;
    log::debug!("wrote swatch {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use tempfile::TempDir;

    #[test]
    fn test_swatch_cells() {
        let palette = Palette::from_fn(|i| Color::new(i, 0, 255 - i));
        let img = render_swatch(&palette);
        assert_eq!(img.dimensions(), (256, 256));
        assert_eq!(img.get_pixel(0, 0), &Rgba([0, 0, 255, 255]));
        assert_eq!(img.get_pixel(15, 15), &Rgba([0, 0, 255, 255]));
        // Cell 17 is column 1, row 1
        assert_eq!(img.get_pixel(16, 16), &Rgba([17, 0, 238, 255]));
        assert_eq!(img.get_pixel(255, 255), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_save_swatch_creates_parent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("swatch.png");
        save_swatch(&Palette::filled(Color::WHITE), &path).unwrap();
        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded.get_pixel(100, 100), &Rgba([255, 255, 255, 255]));
    }
}
