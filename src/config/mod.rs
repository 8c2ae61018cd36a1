//! Project configuration
//!
//! Provides types and parsing for the `sprpal.toml` project file.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
