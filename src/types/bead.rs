//! Beads: one slot on the platform, with a shape and an optional colour.

use clap::ValueEnum;
use serde::Deserialize;

use super::Colour;

/// Footprint of a bead, used both for sampling and for drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BeadShape {
    /// Disc with diameter equal to the module.
    #[default]
    Circle,
    /// Square with side equal to the module.
    Square,
}

impl BeadShape {
    /// Whether the offset `(dx, dy)` from a bead centre lies inside a bead
    /// of this shape. Boundaries count as inside.
    pub fn contains(self, module: f64, dx: f64, dy: f64) -> bool {
        let half = 0.5 * module;
        match self {
            BeadShape::Circle => dx * dx + dy * dy <= half * half,
            BeadShape::Square => dx.abs().max(dy.abs()) <= half,
        }
    }
}

/// A single bead slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bead {
    pub shape: BeadShape,
    /// Peg pitch inherited from the platform.
    pub module: f64,
    /// Assigned colour; `None` leaves the slot empty.
    pub colour: Option<Colour>,
}

impl Bead {
    /// An empty bead slot.
    pub fn new(shape: BeadShape, module: f64) -> Self {
        Self {
            shape,
            module,
            colour: None,
        }
    }

    /// See [`BeadShape::contains`].
    pub fn contains(&self, dx: f64, dy: f64) -> bool {
        self.shape.contains(self.module, dx, dy)
    }

    pub fn is_filled(&self) -> bool {
        self.colour.is_some()
    }
}
