//! Core domain types for beadalize.
//!
//! This module contains the fundamental types used throughout the pipeline:
//! - `Colour` - opaque RGB colour values
//! - `Palette` - ordered bead colour collections with nearest-colour lookup
//! - `Platform` - pegboard layouts and their peg coordinates
//! - `Bead` - one slot on a platform

mod bead;
mod colour;
mod palette;
mod platform;

pub use bead::{Bead, BeadShape};
pub use colour::Colour;
pub use palette::{Palette, PaletteEntry, HAMA};
pub use platform::{
    Extent, Layout, Platform, PlatformKind, PlatformParams, Point, DEFAULT_HEIGHT, DEFAULT_MODULE,
    DEFAULT_SIZE, DEFAULT_WIDTH,
};
