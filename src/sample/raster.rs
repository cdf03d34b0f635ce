//! Decoded source images, flattened onto white.

use std::path::Path;

use image::DynamicImage;

use crate::error::{BeadError, Result};
use crate::types::Colour;

/// An opaque image: row-major colours, row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<Colour>,
}

impl Raster {
    /// Create a raster from row-major pixels.
    pub fn new(width: usize, height: usize, pixels: Vec<Colour>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(BeadError::Format {
                message: "image has no pixels".to_string(),
                help: None,
            });
        }
        if pixels.len() != width * height {
            return Err(BeadError::Format {
                message: format!(
                    "expected {} pixels for {}x{}, got {}",
                    width * height,
                    width,
                    height,
                    pixels.len()
                ),
                help: None,
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// A raster filled with a single colour.
    pub fn solid(width: usize, height: usize, colour: Colour) -> Result<Self> {
        Self::new(width, height, vec![colour; width * height])
    }

    /// Read an RGB or RGBA image from disk.
    pub fn open(path: &Path) -> Result<Self> {
        let img = image::open(path).map_err(|e| BeadError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read image: {}", e),
        })?;
        Self::from_image(&img)
    }

    /// Flatten a decoded image onto white.
    ///
    /// Only 3 and 4 channel images are accepted; greyscale is rejected.
    pub fn from_image(img: &DynamicImage) -> Result<Self> {
        let channels = img.color().channel_count();
        if channels != 3 && channels != 4 {
            return Err(BeadError::Format {
                message: format!("image has {} channel(s), expected RGB or RGBA", channels),
                help: Some("Convert the image to RGB or RGBA first".to_string()),
            });
        }

        let rgba = img.to_rgba32f();
        let pixels = rgba
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                Colour::over_white(r, g, b, a)
            })
            .collect();

        Self::new(rgba.width() as usize, rgba.height() as usize, pixels)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel at `row`, `col`.
    pub fn get(&self, row: usize, col: usize) -> Option<Colour> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.pixels.get(row * self.width + col).copied()
    }

    /// Rotate counter-clockwise by `degrees`, growing the canvas so nothing
    /// is cut off. Uncovered corners are white, as if transparent.
    ///
    /// Uses nearest-neighbour lookup so no new colours are introduced.
    pub fn rotated(&self, degrees: f64) -> Raster {
        let theta = degrees.to_radians();
        let (sin, cos) = theta.sin_cos();
        let (w, h) = (self.width as f64, self.height as f64);

        // Shave off float noise so exact quarter turns keep their size.
        let new_w = ((w * cos.abs() + h * sin.abs()) - 1e-9).ceil().max(1.0) as usize;
        let new_h = ((w * sin.abs() + h * cos.abs()) - 1e-9).ceil().max(1.0) as usize;

        let mut pixels = Vec::with_capacity(new_w * new_h);
        for i in 0..new_h {
            let y = i as f64 + 0.5 - new_h as f64 / 2.0;
            for j in 0..new_w {
                let x = j as f64 + 0.5 - new_w as f64 / 2.0;
                let src_x = x * cos - y * sin + w / 2.0;
                let src_y = x * sin + y * cos + h / 2.0;

                let colour = if src_x >= 0.0 && src_y >= 0.0 {
                    self.get(src_y.floor() as usize, src_x.floor() as usize)
                } else {
                    None
                };
                pixels.push(colour.unwrap_or(Colour::WHITE));
            }
        }

        Raster {
            width: new_w,
            height: new_h,
            pixels,
        }
    }
}
