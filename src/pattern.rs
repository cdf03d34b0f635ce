//! Bead patterns: a platform, its beads and the image they are coloured from.
//!
//! A pattern owns exactly one [`Bead`] per platform peg, in platform order.
//! Colouring a pattern re-derives every bead from scratch; beads that no
//! pixel covers end up empty.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{BeadError, Result};
use crate::sample::{ImageFrame, Placement, Raster, Sampler};
use crate::types::{Bead, BeadShape, Colour, Extent, Palette, Platform, Point};

/// A platform with one bead per peg.
#[derive(Debug, Clone)]
pub struct Pattern {
    platform: Platform,
    palette: Option<Palette>,
    coordinates: Vec<Point>,
    beads: Vec<Bead>,
    image_path: Option<PathBuf>,
    placement: Placement,
}

/// Unquantized sampling result, for checking image placement.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    /// Where the image lands on the platform.
    pub frame: Extent,
    /// Raw mean colour per bead, in platform order.
    pub colours: Vec<Option<Colour>>,
}

/// How many beads of one colour a pattern uses.
#[derive(Debug, Clone, PartialEq)]
pub struct BeadCount {
    pub colour: Colour,
    /// Palette entry name, when the colour came from the palette.
    pub name: Option<String>,
    pub count: usize,
}

impl Pattern {
    /// Create a pattern of empty circular beads.
    pub fn new(platform: Platform, palette: Option<Palette>) -> Self {
        let coordinates = platform.coordinates();
        let beads = vec![Bead::new(BeadShape::Circle, platform.module()); coordinates.len()];
        Self {
            platform,
            palette,
            coordinates,
            beads,
            image_path: None,
            placement: Placement::default(),
        }
    }

    /// Use `shape` for every bead. Clears any assigned colours.
    pub fn with_bead_shape(mut self, shape: BeadShape) -> Self {
        let module = self.platform.module();
        self.beads = vec![Bead::new(shape, module); self.coordinates.len()];
        self
    }

    /// Set the source image and its placement for [`Pattern::get_colours`].
    pub fn with_image(mut self, path: impl Into<PathBuf>, placement: Placement) -> Self {
        self.image_path = Some(path.into());
        self.placement = placement;
        self
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    pub fn image_path(&self) -> Option<&Path> {
        self.image_path.as_deref()
    }

    /// Peg centres, in platform order.
    pub fn coordinates(&self) -> &[Point] {
        &self.coordinates
    }

    pub fn beads(&self) -> &[Bead] {
        &self.beads
    }

    /// `(peg centre, bead)` pairs in platform order.
    pub fn iter(&self) -> impl Iterator<Item = (Point, &Bead)> {
        self.coordinates.iter().copied().zip(&self.beads)
    }

    pub fn len(&self) -> usize {
        self.beads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beads.is_empty()
    }

    /// Number of beads with a colour.
    pub fn filled(&self) -> usize {
        self.beads.iter().filter(|b| b.is_filled()).count()
    }

    /// Remove every bead colour.
    pub fn clear(&mut self) {
        for bead in &mut self.beads {
            bead.colour = None;
        }
    }

    /// Colour the beads from the configured image and placement.
    pub fn get_colours(&mut self) -> Result<()> {
        let path = self.require_image()?.to_path_buf();
        self.placement.validate()?;
        let raster = Raster::open(&path)?;
        self.colours_from_raster(&raster, self.placement)
    }

    /// Colour the beads from the image at `path`, remembering it and the
    /// placement for later runs.
    pub fn colours_from_bitmap(&mut self, path: &Path, placement: Placement) -> Result<()> {
        placement.validate()?;
        let raster = Raster::open(path)?;
        self.colours_from_raster(&raster, placement)?;
        self.image_path = Some(path.to_path_buf());
        Ok(())
    }

    /// Colour the beads from an already decoded raster.
    ///
    /// With a palette, every sampled colour is replaced by its nearest
    /// palette colour.
    pub fn colours_from_raster(&mut self, raster: &Raster, placement: Placement) -> Result<()> {
        placement.validate()?;
        if let Some(palette) = &self.palette {
            if palette.is_empty() {
                return Err(BeadError::EmptyPalette);
            }
        }

        let (_, sampled) = self.sample(raster, &placement);

        // Sampled means are rounded, so many beads share a lookup.
        let mut nearest: HashMap<[u32; 3], Colour> = HashMap::new();
        let mut colours = Vec::with_capacity(sampled.len());
        for raw in sampled {
            let colour = match (raw, &self.palette) {
                (Some(raw), Some(palette)) => {
                    let key = [raw.r.to_bits(), raw.g.to_bits(), raw.b.to_bits()];
                    let snapped = match nearest.get(&key) {
                        Some(&c) => c,
                        None => {
                            let c = palette.nearest(raw)?;
                            nearest.insert(key, c);
                            c
                        }
                    };
                    Some(snapped)
                }
                (raw, _) => raw,
            };
            colours.push(colour);
        }

        for (bead, colour) in self.beads.iter_mut().zip(colours) {
            bead.colour = colour;
        }
        self.placement = placement;
        Ok(())
    }

    /// Sample the configured image without quantizing or changing beads.
    pub fn preview(&self) -> Result<Preview> {
        let path = self.require_image()?;
        self.placement.validate()?;
        let raster = Raster::open(path)?;
        Ok(self.preview_raster(&raster))
    }

    /// Sample `raster` at the current placement without quantizing.
    pub fn preview_raster(&self, raster: &Raster) -> Preview {
        let (frame, colours) = self.sample(raster, &self.placement);
        Preview {
            frame: frame.extent,
            colours,
        }
    }

    /// Bead usage per colour: palette order when there is a palette,
    /// otherwise first appearance.
    pub fn bead_counts(&self) -> Vec<BeadCount> {
        let mut counts: Vec<BeadCount> = Vec::new();
        for colour in self.beads.iter().filter_map(|b| b.colour) {
            match counts.iter_mut().find(|c| c.colour == colour) {
                Some(entry) => entry.count += 1,
                None => counts.push(BeadCount {
                    colour,
                    name: None,
                    count: 1,
                }),
            }
        }

        if let Some(palette) = &self.palette {
            for entry in &mut counts {
                entry.name = palette
                    .position(entry.colour)
                    .and_then(|i| palette.get(i))
                    .map(|e| e.name.clone());
            }
            counts.sort_by_key(|c| palette.position(c.colour).unwrap_or(usize::MAX));
        }

        counts
    }

    fn require_image(&self) -> Result<&Path> {
        self.image_path.as_deref().ok_or_else(|| BeadError::Config {
            message: "No input image".to_string(),
            help: Some("Pass --input or set `input` in the project file".to_string()),
        })
    }

    /// Raw per-bead means for `raster` placed by `placement`.
    fn sample(&self, raster: &Raster, placement: &Placement) -> (ImageFrame, Vec<Option<Colour>>) {
        let rotated;
        let raster = if placement.rotation != 0.0 {
            rotated = raster.rotated(placement.rotation);
            &rotated
        } else {
            raster
        };

        let sampler = Sampler::new(raster, self.platform.extent(), placement);
        let colours = self
            .iter()
            .map(|(centre, bead)| sampler.sample(centre, bead))
            .collect();
        (*sampler.frame(), colours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Layout, PlatformKind, PlatformParams};
    use image::{Rgb, RgbImage};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    const RED: Colour = Colour::new(1.0, 0.0, 0.0);
    const BLUE: Colour = Colour::new(0.0, 0.0, 1.0);

    fn red_blue() -> Palette {
        Palette::from_colours("red-blue", &[RED, BLUE])
    }

    #[test]
    fn test_one_bead_per_coordinate() {
        for kind in PlatformKind::ALL {
            let params = match kind {
                PlatformKind::Rectangular => PlatformParams {
                    width: Some(7),
                    height: Some(3),
                    ..PlatformParams::default()
                },
                _ => PlatformParams {
                    size: Some(5),
                    ..PlatformParams::default()
                },
            };
            let platform = Platform::from_params(kind, &params).unwrap();
            let pattern = Pattern::new(platform, None);

            assert_eq!(pattern.len(), platform.coordinates().len());
            assert_eq!(pattern.filled(), 0);
        }
    }

    #[test]
    fn test_solid_red_fills_every_bead() {
        let platform = Platform::rectangular(5.0, 16, 16).unwrap();
        let mut pattern = Pattern::new(platform, Some(red_blue()));

        let raster = Raster::solid(64, 64, RED).unwrap();
        pattern
            .colours_from_raster(&raster, Placement::default())
            .unwrap();

        assert_eq!(pattern.filled(), 256);
        assert!(pattern.beads().iter().all(|b| b.colour == Some(RED)));
    }

    #[test]
    fn test_solid_palette_colour_round_trips() {
        let green = Colour::rgb8(0x25, 0x68, 0x47);
        let palette = Palette::from_colours("three", &[RED, green, BLUE]);
        let platform = Platform::hexagon(5.0, 4).unwrap();
        let mut pattern = Pattern::new(platform, Some(palette));

        let raster = Raster::solid(100, 100, green).unwrap();
        pattern
            .colours_from_raster(&raster, Placement::default())
            .unwrap();

        let filled: Vec<_> = pattern.beads().iter().filter_map(|b| b.colour).collect();
        assert!(!filled.is_empty());
        assert!(filled.iter().all(|&c| c == green));
    }

    #[test]
    fn test_recolouring_is_idempotent() {
        let platform = Platform::hexagon(5.0, 6).unwrap();
        let mut pattern = Pattern::new(platform, Some(Palette::hama().clone()));

        let mut pixels = Vec::new();
        for i in 0..40 {
            for j in 0..40 {
                pixels.push(Colour::new(i as f32 / 40.0, j as f32 / 40.0, 0.3));
            }
        }
        let raster = Raster::new(40, 40, pixels).unwrap();
        let placement = Placement {
            rotation: 14.0,
            ..Placement::default()
        };

        pattern.colours_from_raster(&raster, placement).unwrap();
        let first: Vec<_> = pattern.beads().to_vec();
        pattern.colours_from_raster(&raster, placement).unwrap();

        assert_eq!(pattern.beads(), first.as_slice());
    }

    #[test]
    fn test_uncovered_beads_are_reset() {
        let platform = Platform::rectangular(5.0, 4, 4).unwrap();
        let mut pattern = Pattern::new(platform, None);
        let raster = Raster::solid(8, 8, RED).unwrap();

        pattern
            .colours_from_raster(&raster, Placement::default())
            .unwrap();
        assert_eq!(pattern.filled(), 16);

        // Shift the image entirely off the platform.
        let away = Placement {
            xoffset: 500.0,
            ..Placement::default()
        };
        pattern.colours_from_raster(&raster, away).unwrap();
        assert_eq!(pattern.filled(), 0);
    }

    #[test]
    fn test_small_image_partial_coverage() {
        let platform = Platform::rectangular(5.0, 4, 4).unwrap();
        let mut pattern = Pattern::new(platform, None);
        let raster = Raster::solid(8, 8, BLUE).unwrap();

        let half = Placement {
            scale: 0.5,
            ..Placement::default()
        };
        pattern.colours_from_raster(&raster, half).unwrap();

        // The lower-left quarter is covered.
        let filled: Vec<Point> = pattern
            .iter()
            .filter(|(_, b)| b.is_filled())
            .map(|(p, _)| p)
            .collect();
        assert_eq!(
            filled,
            vec![
                Point::new(0.0, 0.0),
                Point::new(5.0, 0.0),
                Point::new(0.0, 5.0),
                Point::new(5.0, 5.0),
            ]
        );
    }

    #[test]
    fn test_without_palette_keeps_raw_mean() {
        let platform = Platform::new(5.0, Layout::Square { size: 2 }).unwrap();
        let mut pattern = Pattern::new(platform, None).with_bead_shape(BeadShape::Square);
        let grey = Colour::new(0.25, 0.5, 0.75);

        pattern
            .colours_from_raster(&Raster::solid(20, 20, grey).unwrap(), Placement::default())
            .unwrap();
        assert!(pattern.beads().iter().all(|b| b.colour == Some(grey)));
    }

    #[test]
    fn test_empty_palette_fails() {
        let platform = Platform::hexagon(5.0, 2).unwrap();
        let mut pattern = Pattern::new(platform, Some(Palette::new("empty", vec![])));
        let result = pattern.colours_from_raster(&Raster::solid(4, 4, RED).unwrap(), Placement::default());
        assert!(matches!(result, Err(BeadError::EmptyPalette)));
    }

    #[test]
    fn test_failed_bitmap_keeps_previous_image() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("red.png");
        RgbImage::from_pixel(8, 8, Rgb([255, 0, 0])).save(&path).unwrap();

        let platform = Platform::hexagon(5.0, 2).unwrap();
        let mut pattern = Pattern::new(platform, Some(Palette::new("empty", vec![])))
            .with_image("before.png", Placement::default());
        let moved = Placement {
            xoffset: 3.0,
            ..Placement::default()
        };

        let result = pattern.colours_from_bitmap(&path, moved);
        assert!(matches!(result, Err(BeadError::EmptyPalette)));
        assert_eq!(pattern.image_path(), Some(Path::new("before.png")));
        assert_eq!(pattern.placement().xoffset, 0.0);
        assert_eq!(pattern.filled(), 0);
    }

    #[test]
    fn test_get_colours_requires_image() {
        let platform = Platform::hexagon(5.0, 2).unwrap();
        let mut pattern = Pattern::new(platform, None);
        assert!(matches!(pattern.get_colours(), Err(BeadError::Config { .. })));
    }

    #[test]
    fn test_colours_from_bitmap() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("red.png");
        RgbImage::from_pixel(32, 32, Rgb([255, 0, 0])).save(&path).unwrap();

        let platform = Platform::rectangular(5.0, 16, 16).unwrap();
        let mut pattern = Pattern::new(platform, Some(red_blue()));
        pattern
            .colours_from_bitmap(&path, Placement::default())
            .unwrap();

        assert_eq!(pattern.image_path(), Some(path.as_path()));
        assert!(pattern.beads().iter().all(|b| b.colour == Some(RED)));

        // The remembered image is reused.
        pattern.clear();
        pattern.get_colours().unwrap();
        assert_eq!(pattern.filled(), 256);
    }

    #[test]
    fn test_bad_scale_fails_before_reading() {
        let platform = Platform::hexagon(5.0, 2).unwrap();
        let mut pattern = Pattern::new(platform, None);
        let bad = Placement {
            scale: -1.0,
            ..Placement::default()
        };
        let result = pattern.colours_from_bitmap(Path::new("/nonexistent.png"), bad);
        assert!(matches!(result, Err(BeadError::Config { .. })));
    }

    #[test]
    fn test_preview_does_not_quantize() {
        let platform = Platform::rectangular(5.0, 2, 2).unwrap();
        let pattern = Pattern::new(platform, Some(red_blue()));
        let grey = Colour::new(0.5, 0.5, 0.5);

        let preview = pattern.preview_raster(&Raster::solid(10, 10, grey).unwrap());
        assert_eq!(preview.colours, vec![Some(grey); 4]);
        assert_eq!(preview.frame, platform.extent());
        assert_eq!(pattern.filled(), 0);
    }

    #[test]
    fn test_bead_counts_follow_palette_order() {
        let platform = Platform::rectangular(5.0, 4, 1).unwrap();
        let mut pattern = Pattern::new(platform, Some(red_blue()));

        // Blue on the left, red on the right.
        let raster = Raster::new(4, 1, vec![BLUE, BLUE, BLUE, RED]).unwrap();
        pattern
            .colours_from_raster(&raster, Placement::default())
            .unwrap();

        let counts = pattern.bead_counts();
        assert_eq!(
            counts,
            vec![
                BeadCount {
                    colour: RED,
                    name: Some("colour-0".to_string()),
                    count: 1
                },
                BeadCount {
                    colour: BLUE,
                    name: Some("colour-1".to_string()),
                    count: 3
                },
            ]
        );
    }
}
