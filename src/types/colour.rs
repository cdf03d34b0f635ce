//! Colour type and parsing.
//!
//! Colours are opaque RGB triples with channels in `[0, 1]`. Anything with
//! an alpha channel is flattened onto a white background on the way in.

use std::fmt;
use std::str::FromStr;

use ::palette::white_point::D65;
use ::palette::{FromColor, Lab, Srgb};

use crate::error::{BeadError, Result};

/// An opaque RGB colour, each channel in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Colour {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Colour {
    /// Create a new colour from normalized RGB components.
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a colour from 8-bit RGB components.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);

    /// White.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    /// Flatten an RGBA value onto white: `c' = (1 - a) + c * a`.
    pub fn over_white(r: f32, g: f32, b: f32, a: f32) -> Self {
        let a = a.clamp(0.0, 1.0);
        let flatten = |c: f32| (1.0 - a) + c * a;
        Self::new(flatten(r), flatten(g), flatten(b))
    }

    /// Parse a hex colour string.
    ///
    /// Supports `#RGB` and `#RRGGBB`, with or without the leading `#`.
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        let hex = s.strip_prefix('#').unwrap_or(s);

        let invalid = || BeadError::Config {
            message: format!("Invalid hex colour: {}", s),
            help: Some("Use #RGB or #RRGGBB format".to_string()),
        };

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        match hex.len() {
            3 => {
                let digit = |i: usize| {
                    u8::from_str_radix(&hex[i..i + 1], 16).map(|d| d << 4 | d)
                };
                match (digit(0), digit(1), digit(2)) {
                    (Ok(r), Ok(g), Ok(b)) => Ok(Self::rgb8(r, g, b)),
                    _ => Err(invalid()),
                }
            }
            6 => {
                let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
                match (byte(0), byte(2), byte(4)) {
                    (Ok(r), Ok(g), Ok(b)) => Ok(Self::rgb8(r, g, b)),
                    _ => Err(invalid()),
                }
            }
            _ => Err(invalid()),
        }
    }

    /// Convert to 8-bit RGB.
    pub fn to_rgb8(self) -> [u8; 3] {
        let quantize = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [quantize(self.r), quantize(self.g), quantize(self.b)]
    }

    /// Round every channel to the given number of decimal digits.
    pub fn rounded(self, decimals: i32) -> Self {
        let factor = 10f32.powi(decimals);
        let round = |c: f32| (c * factor).round() / factor;
        Self::new(round(self.r), round(self.g), round(self.b))
    }

    /// Convert to CIE L*a*b* under the D65 white point.
    pub fn to_lab(self) -> Lab<D65, f32> {
        Lab::from_color(Srgb::new(self.r, self.g, self.b))
    }
}

impl FromStr for Colour {
    type Err = BeadError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.to_rgb8();
        write!(f, "#{:02X}{:02X}{:02X}", r, g, b)
    }
}
