//! Palette type for ordered bead colour collections.
//!
//! A palette is the set of bead colours actually available to the crafter.
//! Every sampled colour is snapped to its perceptually nearest entry using
//! the CIEDE2000 difference in CIE L*a*b*.

use std::path::Path;
use std::sync::OnceLock;

use ::palette::color_difference::Ciede2000;
use ::palette::white_point::D65;
use ::palette::Lab;
use serde::Deserialize;

use crate::error::{BeadError, Result};

use super::Colour;

/// Name of the builtin Hama midi palette.
pub const HAMA: &str = "hama";

/// Hama midi bead colours, in catalogue order.
const HAMA_MIDI: &[(&str, [u8; 3])] = &[
    ("01 white", [0xEC, 0xED, 0xED]),
    ("02 cream", [0xF0, 0xE8, 0xB9]),
    ("03 yellow", [0xF0, 0xB9, 0x01]),
    ("04 orange", [0xE6, 0x4F, 0x27]),
    ("05 red", [0xB6, 0x31, 0x36]),
    ("06 pink", [0xE1, 0x88, 0x9F]),
    ("07 purple", [0x69, 0x4A, 0x82]),
    ("08 dark blue", [0x2C, 0x46, 0x90]),
    ("09 light blue", [0x30, 0x5C, 0xB0]),
    ("10 green", [0x25, 0x68, 0x47]),
    ("11 light green", [0x49, 0xAE, 0x89]),
    ("12 brown", [0x53, 0x41, 0x37]),
    ("13 translucent red", [0xC3, 0x3F, 0x3F]),
    ("14 translucent yellow", [0xEB, 0xD1, 0x4F]),
    ("15 translucent blue", [0x3A, 0x5F, 0xB8]),
    ("16 translucent green", [0x3F, 0x9C, 0x5C]),
    ("17 grey", [0x83, 0x88, 0x8A]),
    ("18 black", [0x2E, 0x2F, 0x32]),
    ("19 clear", [0xD8, 0xDC, 0xDC]),
    ("20 reddish brown", [0x7F, 0x33, 0x2A]),
    ("21 light brown", [0xA5, 0x69, 0x3F]),
    ("22 dark red", [0xA5, 0x2D, 0x36]),
    ("24 translucent purple", [0x8A, 0x5F, 0xA8]),
    ("25 translucent brown", [0x8F, 0x6A, 0x4F]),
    ("26 flesh", [0xDE, 0x9B, 0x90]),
    ("27 beige", [0xDE, 0xB4, 0x8B]),
    ("28 dark green", [0x36, 0x3F, 0x38]),
    ("29 claret", [0xB9, 0x39, 0x5E]),
    ("30 burgundy", [0x68, 0x2A, 0x41]),
    ("31 turquoise", [0x67, 0x97, 0xAE]),
    ("32 neon fuchsia", [0xFF, 0x3D, 0xAA]),
    ("33 cherry", [0xC4, 0x2E, 0x54]),
    ("34 neon yellow", [0xF2, 0xF2, 0x3C]),
    ("35 neon red", [0xFF, 0x3D, 0x3D]),
    ("36 neon blue", [0x2E, 0x8C, 0xE6]),
    ("37 neon green", [0x40, 0xD9, 0x6B]),
    ("38 neon orange", [0xFF, 0x8C, 0x2E]),
    ("43 pastel yellow", [0xF0, 0xEA, 0x37]),
    ("44 pastel red", [0xF0, 0x7D, 0x6F]),
    ("45 pastel purple", [0xA3, 0x8B, 0xBF]),
    ("46 pastel blue", [0x5F, 0x9B, 0xD2]),
    ("47 pastel green", [0x76, 0xC8, 0x82]),
    ("48 pastel pink", [0xE7, 0x7C, 0xCB]),
    ("49 azure", [0x3F, 0xA1, 0xC5]),
    ("60 teddy brown", [0xA5, 0x83, 0x43]),
    ("61 gold", [0xB8, 0x8F, 0x3A]),
    ("62 silver", [0xA6, 0xA7, 0xA9]),
    ("63 bronze", [0x8C, 0x5D, 0x3A]),
    ("64 pearl", [0xE8, 0xE1, 0xD1]),
    ("70 light grey", [0xA7, 0xAD, 0xAB]),
    ("71 dark grey", [0x45, 0x4F, 0x51]),
    ("75 tan", [0xA3, 0x84, 0x67]),
    ("76 nougat", [0x8F, 0x5E, 0x4A]),
    ("77 ash grey", [0x9C, 0x9D, 0x96]),
    ("78 pastel peach", [0xF2, 0xB9, 0x9E]),
    ("79 apricot", [0xF2, 0x9D, 0x62]),
    ("82 plum", [0x7A, 0x2E, 0x5A]),
    ("83 petrol", [0x1F, 0x6B, 0x7A]),
    ("84 olive", [0x6E, 0x6F, 0x3A]),
];

/// A named palette colour.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteEntry {
    pub name: String,
    pub colour: Colour,
}

/// An ordered, immutable collection of bead colours.
#[derive(Debug, Clone)]
pub struct Palette {
    /// Palette name
    pub name: String,

    entries: Vec<PaletteEntry>,

    /// Lab conversion of each entry, parallel to `entries`
    labs: Vec<Lab<D65, f32>>,
}

/// On-disk palette definition (YAML).
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PaletteFile {
    #[serde(default)]
    name: Option<String>,
    colours: Vec<PaletteFileEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PaletteFileEntry {
    name: String,
    hex: String,
}

impl Palette {
    /// Create a palette from named entries.
    pub fn new(name: impl Into<String>, entries: Vec<PaletteEntry>) -> Self {
        let labs = entries.iter().map(|e| e.colour.to_lab()).collect();
        Self {
            name: name.into(),
            entries,
            labs,
        }
    }

    /// Create a palette from bare colours, naming them by index.
    pub fn from_colours(name: impl Into<String>, colours: &[Colour]) -> Self {
        let entries = colours
            .iter()
            .enumerate()
            .map(|(i, &colour)| PaletteEntry {
                name: format!("colour-{}", i),
                colour,
            })
            .collect();
        Self::new(name, entries)
    }

    /// The builtin Hama midi palette, built once per process.
    pub fn hama() -> &'static Palette {
        static HAMA_PALETTE: OnceLock<Palette> = OnceLock::new();
        HAMA_PALETTE.get_or_init(|| {
            let entries = HAMA_MIDI
                .iter()
                .map(|&(name, [r, g, b])| PaletteEntry {
                    name: name.to_string(),
                    colour: Colour::rgb8(r, g, b),
                })
                .collect();
            Palette::new(HAMA, entries)
        })
    }

    /// Look up a builtin palette by name.
    pub fn builtin(name: &str) -> Option<&'static Palette> {
        match name {
            "hama" | "hama-midi" | "hama_color_palette" => Some(Self::hama()),
            _ => None,
        }
    }

    /// Resolve a palette selector: a builtin name or a path to a palette file.
    pub fn resolve(selector: &str) -> Result<Palette> {
        if let Some(palette) = Self::builtin(selector) {
            return Ok(palette.clone());
        }

        let path = Path::new(selector);
        if path.is_file() {
            return Self::load(path);
        }

        Err(BeadError::Config {
            message: format!("Unknown palette: {}", selector),
            help: Some(format!(
                "Use the builtin '{}' palette or a path to a palette YAML file",
                HAMA
            )),
        })
    }

    /// Load a palette from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| BeadError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read palette: {}", e),
        })?;

        let fallback = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("custom");
        Self::parse(&content, fallback)
    }

    /// Parse a palette from a YAML string.
    pub fn parse(content: &str, fallback_name: &str) -> Result<Self> {
        let file: PaletteFile = serde_yaml::from_str(content).map_err(|e| BeadError::Config {
            message: format!("Invalid palette file: {}", e),
            help: Some("Expected `colours:` with a list of `{ name, hex }` entries".to_string()),
        })?;

        let entries = file
            .colours
            .into_iter()
            .map(|entry| -> Result<PaletteEntry> {
                Ok(PaletteEntry {
                    colour: Colour::from_hex(&entry.hex)?,
                    name: entry.name,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let name = file.name.unwrap_or_else(|| fallback_name.to_string());
        Ok(Self::new(name, entries))
    }

    /// Get the number of colours.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the palette is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get an entry by index.
    pub fn get(&self, index: usize) -> Option<&PaletteEntry> {
        self.entries.get(index)
    }

    /// Iterate over the entries in palette order.
    pub fn entries(&self) -> impl Iterator<Item = &PaletteEntry> {
        self.entries.iter()
    }

    /// Iterate over the colours in palette order.
    pub fn colours(&self) -> impl Iterator<Item = Colour> + '_ {
        self.entries.iter().map(|e| e.colour)
    }

    /// Index of the first entry with exactly this colour.
    pub fn position(&self, colour: Colour) -> Option<usize> {
        self.entries.iter().position(|e| e.colour == colour)
    }

    /// Select entries by index, keeping the order of `indices`.
    pub fn subset(&self, indices: &[usize]) -> Result<Palette> {
        let entries = indices
            .iter()
            .map(|&i| {
                self.entries.get(i).cloned().ok_or_else(|| BeadError::Config {
                    message: format!(
                        "Palette index {} out of range for '{}' ({} colours)",
                        i,
                        self.name,
                        self.len()
                    ),
                    help: Some(format!("Valid indices are 0..{}", self.len())),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Palette::new(self.name.clone(), entries))
    }

    /// Perceptual distance between two colours (CIEDE2000).
    pub fn distance(a: Colour, b: Colour) -> f32 {
        a.to_lab().difference(b.to_lab())
    }

    /// Index of the entry nearest to `colour`.
    ///
    /// Ties go to the lowest index.
    pub fn nearest_index(&self, colour: Colour) -> Result<usize> {
        if self.is_empty() {
            return Err(BeadError::EmptyPalette);
        }

        let lab = colour.to_lab();
        let mut best_index = 0;
        let mut best_dist = f32::INFINITY;

        for (i, &candidate) in self.labs.iter().enumerate() {
            let dist = lab.difference(candidate);
            if dist < best_dist {
                best_dist = dist;
                best_index = i;
            }
        }

        Ok(best_index)
    }

    /// The palette colour nearest to `colour`.
    pub fn nearest(&self, colour: Colour) -> Result<Colour> {
        let index = self.nearest_index(colour)?;
        Ok(self.entries[index].colour)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::hama().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rgb() -> Palette {
        Palette::from_colours(
            "rgb",
            &[
                Colour::new(1.0, 0.0, 0.0),
                Colour::new(0.0, 1.0, 0.0),
                Colour::new(0.0, 0.0, 1.0),
            ],
        )
    }

    #[test]
    fn test_nearest_single_colour() {
        let only = Colour::rgb8(0x12, 0x80, 0x40);
        let palette = Palette::from_colours("one", &[only]);

        for query in [Colour::WHITE, Colour::BLACK, Colour::new(1.0, 0.0, 1.0)] {
            assert_eq!(palette.nearest(query).unwrap(), only);
        }
    }

    #[test]
    fn test_nearest_picks_closest() {
        let palette = rgb();
        assert_eq!(
            palette.nearest(Colour::new(0.8, 0.1, 0.1)).unwrap(),
            Colour::new(1.0, 0.0, 0.0)
        );
        assert_eq!(palette.nearest_index(Colour::new(0.1, 0.1, 0.7)).unwrap(), 2);
    }

    #[test]
    fn test_nearest_tie_prefers_first() {
        let red = Colour::new(1.0, 0.0, 0.0);
        let palette = Palette::from_colours("dupes", &[red, Colour::WHITE, red]);
        assert_eq!(palette.nearest_index(red).unwrap(), 0);
    }

    #[test]
    fn test_nearest_empty_palette() {
        let palette = Palette::new("empty", vec![]);
        assert!(matches!(
            palette.nearest(Colour::WHITE),
            Err(BeadError::EmptyPalette)
        ));
    }

    #[test]
    fn test_subset_preserves_requested_order() {
        let palette = rgb();
        let subset = palette.subset(&[2, 0]).unwrap();

        let colours: Vec<Colour> = subset.colours().collect();
        assert_eq!(
            colours,
            vec![Colour::new(0.0, 0.0, 1.0), Colour::new(1.0, 0.0, 0.0)]
        );
    }

    #[test]
    fn test_subset_out_of_range() {
        let result = rgb().subset(&[0, 3]);
        assert!(matches!(result, Err(BeadError::Config { .. })));
    }

    #[test]
    fn test_distance_is_perceptual() {
        let white = Colour::WHITE;
        assert_eq!(Palette::distance(white, white), 0.0);

        // An off-white is much closer to white than a saturated yellow is,
        // even though yellow only differs in one channel.
        let off_white = Colour::new(0.92, 0.92, 0.92);
        let yellow = Colour::new(1.0, 1.0, 0.0);
        assert!(Palette::distance(white, off_white) < Palette::distance(white, yellow));
    }

    #[test]
    fn test_nearest_disagrees_with_rgb_distance() {
        // Straight RGB distance would pick the dark blue for black (0.300
        // against 0.346); in Lab the dark grey is closer.
        let darks = Palette::from_colours(
            "darks",
            &[Colour::new(0.0, 0.0, 0.3), Colour::new(0.2, 0.2, 0.2)],
        );
        assert_eq!(darks.nearest_index(Colour::BLACK).unwrap(), 1);

        // Likewise for white, RGB prefers the cream and Lab the light grey.
        let lights = Palette::from_colours(
            "lights",
            &[Colour::new(0.8, 0.8, 0.8), Colour::new(1.0, 1.0, 0.7)],
        );
        assert_eq!(lights.nearest_index(Colour::WHITE).unwrap(), 0);
    }

    #[test]
    fn test_hama_builtin() {
        let hama = Palette::builtin("hama").unwrap();
        assert!(hama.len() > 50);
        assert_eq!(hama.get(0).unwrap().name, "01 white");

        let legacy = Palette::builtin("hama_color_palette").unwrap();
        assert_eq!(legacy.len(), hama.len());

        // Indices spread across the whole catalogue.
        let rocket = hama.subset(&[0, 2, 4, 28, 35, 54]).unwrap();
        assert_eq!(rocket.len(), 6);

        assert!(Palette::builtin("perler").is_none());
    }

    #[test]
    fn test_parse_palette_file() {
        let yaml = "name: flags\ncolours:\n  - name: red\n    hex: \"#FF0000\"\n  - name: white\n    hex: \"#FFF\"\n";
        let palette = Palette::parse(yaml, "fallback").unwrap();

        assert_eq!(palette.name, "flags");
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.get(1).unwrap().colour, Colour::WHITE);
    }

    #[test]
    fn test_parse_palette_file_bad_hex() {
        let yaml = "colours:\n  - name: oops\n    hex: \"#ZZZZZZ\"\n";
        assert!(Palette::parse(yaml, "fallback").is_err());
    }

    #[test]
    fn test_resolve_unknown() {
        let result = Palette::resolve("no-such-palette");
        assert!(matches!(result, Err(BeadError::Config { .. })));
    }
}
