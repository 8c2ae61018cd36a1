//! sprpal - palette variation generator for indexed sprites
//!
//! This library provides functionality to:
//! - Read and write `.pal` palettes and `.spr` sprite containers
//! - Group palette indices and recolor them in HSV space
//! - Generate numbered batches of palette variations with well-spread hues
//! - Render palette swatches and sprite frames to PNG

pub mod cli;
pub mod codec;
pub mod color;
pub mod config;
pub mod logging;
pub mod models;
pub mod preview;
pub mod swatch;
pub mod transforms;
pub mod variation;
