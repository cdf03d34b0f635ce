//! Platform type: the pegboard layouts beads are placed on.
//!
//! A platform is a pure function of its module (peg pitch, in millimetres)
//! and its size parameters. Coordinates are always produced in the same
//! order, and a pattern pairs its beads with them positionally.
//!
//! # Example
//!
//! ```
//! use beadalize::{Platform, PlatformKind, PlatformParams};
//!
//! let params = PlatformParams::from_json(r#"{"module": 5, "width": 3, "height": 2}"#).unwrap();
//! let platform = Platform::from_params(PlatformKind::Rectangular, &params).unwrap();
//! assert_eq!(platform.coordinates().len(), 6);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{BeadError, Result};

/// Default peg pitch in millimetres (Hama midi).
pub const DEFAULT_MODULE: f64 = 5.0;
/// Default size of hexagon and square platforms.
pub const DEFAULT_SIZE: usize = 16;
/// Default rectangular platform width.
pub const DEFAULT_WIDTH: usize = 24;
/// Default rectangular platform height.
pub const DEFAULT_HEIGHT: usize = 16;
/// Largest number of pegs a platform may have.
pub const MAX_PEGS: usize = 1_000_000;

/// A point in platform space (millimetres, y up).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in platform space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl Extent {
    /// Bounding box of `points`, or `None` if there are none.
    pub fn around(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let init = Extent {
            xmin: first.x,
            xmax: first.x,
            ymin: first.y,
            ymax: first.y,
        };
        Some(points.iter().fold(init, |e, p| Extent {
            xmin: e.xmin.min(p.x),
            xmax: e.xmax.max(p.x),
            ymin: e.ymin.min(p.y),
            ymax: e.ymax.max(p.y),
        }))
    }

    /// Grow the rectangle by `margin` on every side.
    pub fn expanded(self, margin: f64) -> Self {
        Extent {
            xmin: self.xmin - margin,
            xmax: self.xmax + margin,
            ymin: self.ymin - margin,
            ymax: self.ymax + margin,
        }
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }
}

/// The platform variants that can be selected by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformKind {
    Hexagon,
    HexagonTilted,
    Square,
    Rectangular,
}

impl PlatformKind {
    /// All kinds, in the order they are listed to users.
    pub const ALL: [PlatformKind; 4] = [
        PlatformKind::Hexagon,
        PlatformKind::HexagonTilted,
        PlatformKind::Square,
        PlatformKind::Rectangular,
    ];

    /// Canonical short name.
    pub fn name(self) -> &'static str {
        match self {
            PlatformKind::Hexagon => "hexagon",
            PlatformKind::HexagonTilted => "hexagon-tilted",
            PlatformKind::Square => "square",
            PlatformKind::Rectangular => "rectangular",
        }
    }
}

impl FromStr for PlatformKind {
    type Err = BeadError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "hexagon" | "HexagonPlatform" => Ok(PlatformKind::Hexagon),
            "hexagon-tilted" | "HexagonPlatformTilted" => Ok(PlatformKind::HexagonTilted),
            "square" | "SquarePlatform" => Ok(PlatformKind::Square),
            "rectangular" | "RectangularPlatform" => Ok(PlatformKind::Rectangular),
            other => {
                let names: Vec<&str> = PlatformKind::ALL.iter().map(|k| k.name()).collect();
                Err(BeadError::Config {
                    message: format!("Unknown platform: {}", other),
                    help: Some(format!("Available platforms: {}", names.join(", "))),
                })
            }
        }
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Keyword parameters for a platform, as given on the command line or in
/// the project file. Unset fields take the variant's defaults.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlatformParams {
    pub module: Option<f64>,
    pub size: Option<usize>,
    pub width: Option<usize>,
    pub height: Option<usize>,
}

impl PlatformParams {
    /// Decode parameters from a JSON object, e.g. `{"size": 32}`.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| BeadError::Config {
            message: format!("Invalid platform keyword arguments: {}", e),
            help: Some(
                "Expected a JSON object with any of: module, size, width, height".to_string(),
            ),
        })
    }
}

/// Shape and size of a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Pointy-top hexagon with `size` pegs per side.
    Hexagon { size: usize },
    /// Hexagon with its x and y axes swapped.
    HexagonTilted { size: usize },
    /// `size` x `size` square grid.
    Square { size: usize },
    /// `width` x `height` grid.
    Rectangular { width: usize, height: usize },
}

/// A pegboard: a layout plus the pitch between neighbouring pegs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Platform {
    module: f64,
    layout: Layout,
}

impl Platform {
    /// Create a platform, validating module and size.
    pub fn new(module: f64, layout: Layout) -> Result<Self> {
        if !(module.is_finite() && module > 0.0) {
            return Err(BeadError::Config {
                message: format!("Platform module must be positive, got {}", module),
                help: None,
            });
        }

        match peg_count(layout) {
            Some(0) => return Err(BeadError::config("Platform must have at least one peg")),
            Some(n) if n <= MAX_PEGS => {}
            _ => {
                return Err(BeadError::Config {
                    message: "Platform is too large".to_string(),
                    help: Some(format!("At most {} pegs are supported", MAX_PEGS)),
                })
            }
        }

        Ok(Self { module, layout })
    }

    /// Hexagon platform with the given module and side length.
    pub fn hexagon(module: f64, size: usize) -> Result<Self> {
        Self::new(module, Layout::Hexagon { size })
    }

    /// Rectangular platform with the given module and dimensions.
    pub fn rectangular(module: f64, width: usize, height: usize) -> Result<Self> {
        Self::new(module, Layout::Rectangular { width, height })
    }

    /// Build a platform of the given kind from keyword parameters.
    ///
    /// Parameters that do not apply to the kind are rejected.
    pub fn from_params(kind: PlatformKind, params: &PlatformParams) -> Result<Self> {
        let module = params.module.unwrap_or(DEFAULT_MODULE);

        let reject = |field: &str| {
            Err(BeadError::Config {
                message: format!("Platform '{}' does not take '{}'", kind, field),
                help: Some(match kind {
                    PlatformKind::Rectangular => "Use module, width and height".to_string(),
                    _ => "Use module and size".to_string(),
                }),
            })
        };

        let layout = match kind {
            PlatformKind::Rectangular => {
                if params.size.is_some() {
                    return reject("size");
                }
                Layout::Rectangular {
                    width: params.width.unwrap_or(DEFAULT_WIDTH),
                    height: params.height.unwrap_or(DEFAULT_HEIGHT),
                }
            }
            _ => {
                if params.width.is_some() {
                    return reject("width");
                }
                if params.height.is_some() {
                    return reject("height");
                }
                let size = params.size.unwrap_or(DEFAULT_SIZE);
                match kind {
                    PlatformKind::Hexagon => Layout::Hexagon { size },
                    PlatformKind::HexagonTilted => Layout::HexagonTilted { size },
                    _ => Layout::Square { size },
                }
            }
        };

        Self::new(module, layout)
    }

    /// Parse a platform from its name and a JSON keyword-argument object.
    pub fn from_name(name: &str, kwargs_json: Option<&str>) -> Result<Self> {
        let kind: PlatformKind = name.parse()?;
        let params = match kwargs_json {
            Some(json) => PlatformParams::from_json(json)?,
            None => PlatformParams::default(),
        };
        Self::from_params(kind, &params)
    }

    /// Peg pitch in millimetres.
    pub fn module(&self) -> f64 {
        self.module
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn kind(&self) -> PlatformKind {
        match self.layout {
            Layout::Hexagon { .. } => PlatformKind::Hexagon,
            Layout::HexagonTilted { .. } => PlatformKind::HexagonTilted,
            Layout::Square { .. } => PlatformKind::Square,
            Layout::Rectangular { .. } => PlatformKind::Rectangular,
        }
    }

    /// Number of pegs on the platform.
    pub fn len(&self) -> usize {
        match self.layout {
            Layout::Hexagon { size } | Layout::HexagonTilted { size } => 3 * size * size - 3 * size + 1,
            Layout::Square { size } => size * size,
            Layout::Rectangular { width, height } => width * height,
        }
    }

    /// Always false: construction rejects empty platforms.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Peg centres, row by row.
    pub fn coordinates(&self) -> Vec<Point> {
        let m = self.module;
        match self.layout {
            Layout::Hexagon { size } => hexagon_coordinates(m, size),
            Layout::HexagonTilted { size } => hexagon_coordinates(m, size)
                .into_iter()
                .map(|p| Point::new(p.y, p.x))
                .collect(),
            Layout::Square { size } => grid_coordinates(m, size, size),
            Layout::Rectangular { width, height } => grid_coordinates(m, width, height),
        }
    }

    /// Bounding box of the pegs grown by half a module: the area beads cover.
    pub fn extent(&self) -> Extent {
        // Construction guarantees at least one peg.
        Extent::around(&self.coordinates())
            .unwrap_or(Extent {
                xmin: 0.0,
                xmax: 0.0,
                ymin: 0.0,
                ymax: 0.0,
            })
            .expanded(0.5 * self.module)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.layout {
            Layout::Hexagon { size } | Layout::HexagonTilted { size } | Layout::Square { size } => {
                write!(f, "{} size {} @ {}mm", self.kind(), size, self.module)
            }
            Layout::Rectangular { width, height } => {
                write!(f, "{} {}x{} @ {}mm", self.kind(), width, height, self.module)
            }
        }
    }
}

/// Rows of `width` pegs, `height` rows, starting at the origin.
fn grid_coordinates(m: f64, width: usize, height: usize) -> Vec<Point> {
    let mut points = Vec::with_capacity(width * height);
    for i in 0..height {
        for j in 0..width {
            points.push(Point::new(j as f64 * m, i as f64 * m));
        }
    }
    points
}

/// Pointy-top hexagon: a widening lower half then a narrowing upper half.
/// Number of pegs in a layout, or `None` on overflow.
fn peg_count(layout: Layout) -> Option<usize> {
    match layout {
        Layout::Hexagon { size: 0 } | Layout::HexagonTilted { size: 0 } => Some(0),
        Layout::Hexagon { size } | Layout::HexagonTilted { size } => {
            let square = size.checked_mul(size)?.checked_mul(3)?;
            (square - 3 * size).checked_add(1)
        }
        Layout::Square { size } => size.checked_mul(size),
        Layout::Rectangular { width, height } => width.checked_mul(height),
    }
}

fn hexagon_coordinates(m: f64, size: usize) -> Vec<Point> {
    let row_pitch = m * 60f64.to_radians().sin();
    let mut points = Vec::with_capacity(3 * size * size);

    for i in 0..size {
        let y = i as f64 * row_pitch;
        for j in 0..size + i {
            points.push(Point::new(j as f64 * m - 0.5 * i as f64 * m, y));
        }
    }

    for i in 0..size.saturating_sub(1) {
        let y = (size + i) as f64 * row_pitch;
        let shift = (size as f64 - i as f64 - 2.0) * m;
        for j in 0..2 * size - i - 2 {
            points.push(Point::new(j as f64 * m - 0.5 * shift, y));
        }
    }

    points
}
