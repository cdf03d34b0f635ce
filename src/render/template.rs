//! SVG output for patterns and palettes.
//!
//! Documents are sized in millimetres so that printing at 100% gives a
//! life-size template. Platform y points up; SVG y points down, so every
//! y coordinate is flipped against the top of the document.

use std::path::Path;

use svg::node::element::{Circle, Group, Rectangle, Text};
use svg::node::Node;
use svg::Document;

use crate::error::{BeadError, Result};
use crate::pattern::{Pattern, Preview};
use crate::types::{Bead, BeadShape, Colour, Extent, Palette, Point};

/// Outline colour of every bead.
const OUTLINE: &str = "#333333";
/// Outline width in millimetres (about half a point).
const OUTLINE_WIDTH: f64 = 0.18;
/// Radius of the peg dots drawn under the beads.
const PEG_RADIUS: f64 = 0.2;
/// Outline of the image frame in previews.
const FRAME_STROKE: &str = "#FF00FF";
/// Row height of a palette swatch sheet.
const SWATCH_ROW: f64 = 6.0;

/// Maps platform space onto the document of an extent.
struct Canvas {
    extent: Extent,
}

impl Canvas {
    fn new(extent: Extent) -> Self {
        Self { extent }
    }

    fn x(&self, x: f64) -> f64 {
        num(x - self.extent.xmin)
    }

    fn y(&self, y: f64) -> f64 {
        num(self.extent.ymax - y)
    }

    /// An empty document covering the extent, one user unit per millimetre.
    fn document(&self) -> Document {
        let w = num(self.extent.width());
        let h = num(self.extent.height());
        Document::new()
            .set("width", format!("{}mm", w))
            .set("height", format!("{}mm", h))
            .set("viewBox", (0.0, 0.0, w, h))
    }

    /// Peg dots for every coordinate.
    fn pegs(&self, points: &[Point]) -> Group {
        points.iter().fold(Group::new().set("fill", "#000000"), |group, &p| {
            group.add(
                Circle::new()
                    .set("cx", self.x(p.x))
                    .set("cy", self.y(p.y))
                    .set("r", PEG_RADIUS),
            )
        })
    }

    /// Bead outlines, filled with their colour or left empty.
    fn beads<'a>(&self, beads: impl Iterator<Item = (Point, &'a Bead, Option<Colour>)>) -> Group {
        let group = Group::new()
            .set("stroke", OUTLINE)
            .set("stroke-width", OUTLINE_WIDTH);
        beads.fold(group, |group, (centre, bead, colour)| {
            group.add(self.bead(centre, bead, colour))
        })
    }

    fn bead(&self, centre: Point, bead: &Bead, colour: Option<Colour>) -> Box<dyn Node> {
        let half = 0.5 * bead.module;
        let fill = fill(colour);
        match bead.shape {
            BeadShape::Circle => Circle::new()
                .set("cx", self.x(centre.x))
                .set("cy", self.y(centre.y))
                .set("r", num(half))
                .set("fill", fill)
                .into(),
            BeadShape::Square => Rectangle::new()
                .set("x", self.x(centre.x - half))
                .set("y", self.y(centre.y + half))
                .set("width", num(bead.module))
                .set("height", num(bead.module))
                .set("fill", fill)
                .into(),
        }
    }

    /// Dashed outline of a rectangle in platform space.
    fn frame(&self, rect: Extent) -> Rectangle {
        Rectangle::new()
            .set("x", self.x(rect.xmin))
            .set("y", self.y(rect.ymax))
            .set("width", num(rect.width()))
            .set("height", num(rect.height()))
            .set("fill", "none")
            .set("stroke", FRAME_STROKE)
            .set("stroke-width", OUTLINE_WIDTH)
            .set("stroke-dasharray", "1 1")
    }
}

/// Render a coloured pattern: peg dots under one shape per bead.
pub fn render_pattern(pattern: &Pattern) -> Document {
    let canvas = Canvas::new(pattern.platform().extent());
    canvas
        .document()
        .add(canvas.pegs(pattern.coordinates()))
        .add(canvas.beads(pattern.iter().map(|(p, b)| (p, b, b.colour))))
}

/// Render a placement preview: raw sampled colours plus the image frame.
pub fn render_preview(pattern: &Pattern, preview: &Preview) -> Document {
    let platform = pattern.platform().extent();
    let frame = preview.frame;
    let canvas = Canvas::new(Extent {
        xmin: platform.xmin.min(frame.xmin),
        xmax: platform.xmax.max(frame.xmax),
        ymin: platform.ymin.min(frame.ymin),
        ymax: platform.ymax.max(frame.ymax),
    });

    let beads = pattern
        .iter()
        .zip(&preview.colours)
        .map(|((p, b), &c)| (p, b, c));
    canvas
        .document()
        .add(canvas.pegs(pattern.coordinates()))
        .add(canvas.beads(beads))
        .add(canvas.frame(frame))
}

/// Render a palette as a column of labelled swatches.
pub fn render_swatches(palette: &Palette) -> Document {
    let rows = palette.len().max(1) as f64;
    let canvas = Canvas::new(Extent {
        xmin: 0.0,
        xmax: 70.0,
        ymin: 0.0,
        ymax: rows * SWATCH_ROW,
    });
    let bead = Bead::new(BeadShape::Circle, SWATCH_ROW - 1.0);

    let mut document = canvas.document();
    for (i, entry) in palette.entries().enumerate() {
        let centre = Point::new(
            0.5 * SWATCH_ROW,
            canvas.extent.ymax - (i as f64 + 0.5) * SWATCH_ROW,
        );
        let label = Text::new(format!("{} {} {}", i, entry.colour, entry.name))
            .set("x", canvas.x(SWATCH_ROW + 1.0))
            .set("y", canvas.y(centre.y))
            .set("font-family", "sans-serif")
            .set("font-size", 3)
            .set("dominant-baseline", "middle");
        document = document
            .add(canvas.bead(centre, &bead, Some(entry.colour)))
            .add(label);
    }

    document
}

/// Write an SVG document to disk in one go.
pub fn write_svg(document: &Document, path: &Path) -> Result<()> {
    svg::save(path, document).map_err(|e| BeadError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write SVG: {}", e),
    })
}

fn fill(colour: Option<Colour>) -> String {
    colour.map_or_else(|| "none".to_string(), |c| c.to_string())
}

/// Round a length to three decimals, folding negative zero into zero.
fn num(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0 + 0.0
}
