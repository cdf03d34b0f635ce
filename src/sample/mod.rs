//! Image sampling: projecting a raster onto platform pegs.
//!
//! The image is fitted into the area the beads cover (keeping its aspect
//! ratio), then scaled and shifted by a [`Placement`]. Each bead takes the
//! mean colour of the pixels that fall inside its footprint, looking only
//! at a small window of pixels around the one nearest its centre.

mod raster;

pub use raster::Raster;

use crate::error::{BeadError, Result};
use crate::types::{Bead, Colour, Extent, Point};

/// Pixels scanned on either side of a bead's centre pixel.
pub const WINDOW_RADIUS: isize = 2;

/// Decimal digits kept on a sampled mean before palette lookup.
pub const SAMPLE_DECIMALS: i32 = 4;

/// How the image is placed on the platform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Multiplier on top of the fit-to-platform size.
    pub scale: f64,
    /// Shift right, in millimetres.
    pub xoffset: f64,
    /// Shift up, in millimetres.
    pub yoffset: f64,
    /// Counter-clockwise rotation of the image, in degrees.
    pub rotation: f64,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            scale: 1.0,
            xoffset: 0.0,
            yoffset: 0.0,
            rotation: 0.0,
        }
    }
}

impl Placement {
    /// Check the values are usable before any image is read.
    pub fn validate(&self) -> Result<()> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(BeadError::Config {
                message: format!("Scale must be positive, got {}", self.scale),
                help: None,
            });
        }
        for (name, value) in [
            ("xoffset", self.xoffset),
            ("yoffset", self.yoffset),
            ("rotation", self.rotation),
        ] {
            if !value.is_finite() {
                return Err(BeadError::config(format!("{} must be finite", name)));
            }
        }
        Ok(())
    }
}

/// The rectangle an image occupies in platform space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageFrame {
    pub extent: Extent,
    cols: usize,
    rows: usize,
}

impl ImageFrame {
    /// Fit a `cols` x `rows` image into `canvas`, then apply `placement`.
    ///
    /// The image is anchored at the canvas' lower-left corner.
    pub fn fit(canvas: Extent, cols: usize, rows: usize, placement: &Placement) -> Self {
        let (w, h) = (cols as f64, rows as f64);
        let f = (canvas.width() / w).min(canvas.height() / h);

        let xmin = canvas.xmin + placement.xoffset;
        let ymin = canvas.ymin + placement.yoffset;
        Self {
            extent: Extent {
                xmin,
                xmax: xmin + w * f * placement.scale,
                ymin,
                ymax: ymin + h * f * placement.scale,
            },
            cols,
            rows,
        }
    }

    /// Platform x of the centre of pixel column `col`.
    pub fn pixel_x(&self, col: usize) -> f64 {
        interp(
            col as f64,
            (-0.5, self.cols as f64 - 0.5),
            (self.extent.xmin, self.extent.xmax),
        )
    }

    /// Platform y of the centre of pixel row `row`. Row 0 is the top.
    pub fn pixel_y(&self, row: usize) -> f64 {
        interp(
            row as f64,
            (-0.5, self.rows as f64 - 0.5),
            (self.extent.ymax, self.extent.ymin),
        )
    }

    /// Column nearest to platform x, clamped to the image.
    pub fn nearest_col(&self, x: f64) -> isize {
        interp(
            x,
            (self.extent.xmin, self.extent.xmax),
            (-0.5, self.cols as f64 - 0.5),
        )
        .round_ties_even() as isize
    }

    /// Row nearest to platform y, clamped to the image.
    pub fn nearest_row(&self, y: f64) -> isize {
        interp(
            y,
            (self.extent.ymin, self.extent.ymax),
            (self.rows as f64 - 0.5, -0.5),
        )
        .round_ties_even() as isize
    }
}

/// Linear interpolation of `x` from `from` onto `to`, clamped at the ends.
fn interp(x: f64, from: (f64, f64), to: (f64, f64)) -> f64 {
    let (x0, x1) = from;
    let (y0, y1) = to;
    if x1 == x0 {
        return y0;
    }
    let t = ((x - x0) / (x1 - x0)).clamp(0.0, 1.0);
    y0 + t * (y1 - y0)
}

/// Samples bead colours from a placed raster.
#[derive(Debug)]
pub struct Sampler<'a> {
    raster: &'a Raster,
    frame: ImageFrame,
    /// Platform x of each pixel column.
    xs: Vec<f64>,
    /// Platform y of each pixel row.
    ys: Vec<f64>,
}

impl<'a> Sampler<'a> {
    /// Place `raster` onto `canvas` (the area covered by beads).
    ///
    /// `placement.rotation` is not applied here; rotate the raster first.
    pub fn new(raster: &'a Raster, canvas: Extent, placement: &Placement) -> Self {
        let frame = ImageFrame::fit(canvas, raster.width(), raster.height(), placement);
        let xs = (0..raster.width()).map(|j| frame.pixel_x(j)).collect();
        let ys = (0..raster.height()).map(|i| frame.pixel_y(i)).collect();
        Self {
            raster,
            frame,
            xs,
            ys,
        }
    }

    pub fn frame(&self) -> &ImageFrame {
        &self.frame
    }

    /// Mean colour of the pixels inside `bead` centred at `centre`, rounded
    /// to [`SAMPLE_DECIMALS`]. `None` when no pixel lands inside.
    pub fn sample(&self, centre: Point, bead: &Bead) -> Option<Colour> {
        let col = self.frame.nearest_col(centre.x);
        let row = self.frame.nearest_row(centre.y);

        let cols = window(col, self.raster.width());
        let rows = window(row, self.raster.height());

        let mut sum = [0f64; 3];
        let mut count = 0usize;
        for j in cols {
            let dx = self.xs[j] - centre.x;
            for i in rows.clone() {
                if !bead.contains(dx, self.ys[i] - centre.y) {
                    continue;
                }
                if let Some(c) = self.raster.get(i, j) {
                    sum[0] += c.r as f64;
                    sum[1] += c.g as f64;
                    sum[2] += c.b as f64;
                    count += 1;
                }
            }
        }

        if count == 0 {
            return None;
        }

        let n = count as f64;
        let mean = Colour::new((sum[0] / n) as f32, (sum[1] / n) as f32, (sum[2] / n) as f32);
        Some(mean.rounded(SAMPLE_DECIMALS))
    }
}

/// Indices within [`WINDOW_RADIUS`] of `centre`, clipped to `0..len`.
fn window(centre: isize, len: usize) -> std::ops::Range<usize> {
    let start = (centre - WINDOW_RADIUS).max(0) as usize;
    let end = (centre + WINDOW_RADIUS + 1).clamp(0, len as isize) as usize;
    start.min(end)..end
}
