//! Rendering module for beadalize.
//!
//! Turns patterns and palettes into SVG documents.

mod template;

pub use template::{render_pattern, render_preview, render_swatches, write_svg};
