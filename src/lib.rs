//! beadalize - Image to bead pattern converter
//!
//! A library for sampling raster images onto pegboard platforms and
//! snapping each bead to the nearest colour of a bead palette.

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod pattern;
pub mod render;
pub mod sample;
pub mod types;

pub use config::{ProjectConfig, CONFIG_FILENAME};
pub use error::{BeadError, Result};
pub use pattern::{BeadCount, Pattern, Preview};
pub use render::{render_pattern, render_preview, render_swatches, write_svg};
pub use sample::{ImageFrame, Placement, Raster, Sampler};
pub use types::{
    Bead, BeadShape, Colour, Extent, Layout, Palette, PaletteEntry, Platform, PlatformKind,
    PlatformParams, Point,
};
