//! Build command implementation.
//!
//! Samples an image onto a platform and writes the bead pattern as SVG.

use std::path::PathBuf;

use clap::Args;

use crate::config::ProjectConfig;
use crate::error::{BeadError, Result};
use crate::output::{display_path, plural, Printer};
use crate::pattern::Pattern;
use crate::render::{render_pattern, render_preview, write_svg};
use crate::sample::Placement;
use crate::types::{BeadShape, Palette, Platform, PlatformKind, PlatformParams, HAMA};

/// Platform used when neither the command line nor the project file names one.
const DEFAULT_PLATFORM: &str = "hexagon";

/// Convert an image into a bead pattern
#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    /// Image to convert (PNG, JPEG, ...)
    #[arg(long, short)]
    pub input: Option<PathBuf>,

    /// SVG file to write (default: SVG on stdout)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Image scale relative to the platform size
    #[arg(long, allow_negative_numbers = true)]
    pub scale: Option<f64>,

    /// Horizontal image offset in millimetres
    #[arg(long, allow_negative_numbers = true)]
    pub xoffset: Option<f64>,

    /// Vertical image offset in millimetres
    #[arg(long, allow_negative_numbers = true)]
    pub yoffset: Option<f64>,

    /// Counter-clockwise image rotation in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub rotation: Option<f64>,

    /// Platform: hexagon, hexagon-tilted, square or rectangular
    #[arg(long)]
    pub platform: Option<String>,

    /// Platform parameters as JSON, e.g. '{"size": 32}' or '{"width": 29, "height": 29}'
    #[arg(long, value_name = "JSON")]
    pub platform_kwargs: Option<String>,

    /// Builtin palette name or palette YAML file
    #[arg(long)]
    pub palette: Option<String>,

    /// Only use these palette indices, in this order (e.g. 0,2,4)
    #[arg(long, value_delimiter = ',')]
    pub palette_subset: Option<Vec<usize>>,

    /// Keep sampled colours instead of snapping them to a palette
    #[arg(long, conflicts_with_all = ["palette", "palette_subset"])]
    pub no_palette: bool,

    /// Bead shape
    #[arg(long, value_enum)]
    pub bead: Option<BeadShape>,

    /// Only preview the image placement over the platform
    #[arg(long)]
    pub no_pattern: bool,

    /// Project file (default: ./beadalize.yaml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Everything needed to build, validated before any image is read.
#[derive(Debug)]
pub struct BuildPlan {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub platform: Platform,
    pub palette: Option<Palette>,
    pub bead: BeadShape,
    pub placement: Placement,
    pub preview: bool,
}

impl BuildPlan {
    /// Merge command-line arguments over the project file.
    pub fn resolve(args: &BuildArgs, config: &ProjectConfig) -> Result<Self> {
        let platform_name = args
            .platform
            .as_deref()
            .or(config.platform.as_deref())
            .unwrap_or(DEFAULT_PLATFORM);
        let kind: PlatformKind = platform_name.parse()?;
        let params = match &args.platform_kwargs {
            Some(json) => PlatformParams::from_json(json)?,
            None => config.platform_kwargs.unwrap_or_default(),
        };
        let platform = Platform::from_params(kind, &params)?;

        let palette = if args.no_palette {
            None
        } else {
            let selector = args
                .palette
                .as_deref()
                .or(config.palette.as_deref())
                .unwrap_or(HAMA);
            let palette = Palette::resolve(selector)?;
            let subset = args.palette_subset.as_ref().or(config.palette_subset.as_ref());
            let palette = match subset {
                Some(indices) => palette.subset(indices)?,
                None => palette,
            };
            if palette.is_empty() {
                return Err(BeadError::EmptyPalette);
            }
            Some(palette)
        };

        let placement = Placement {
            scale: args.scale.or(config.scale).unwrap_or(1.0),
            xoffset: args.xoffset.or(config.xoffset).unwrap_or(0.0),
            yoffset: args.yoffset.or(config.yoffset).unwrap_or(0.0),
            rotation: args.rotation.or(config.rotation).unwrap_or(0.0),
        };
        placement.validate()?;

        let input = args
            .input
            .clone()
            .or_else(|| config.input.clone())
            .ok_or_else(|| BeadError::Config {
                message: "No input image".to_string(),
                help: Some("Pass --input or set `input` in the project file".to_string()),
            })?;

        Ok(Self {
            input,
            output: args.output.clone().or_else(|| config.output.clone()),
            platform,
            palette,
            bead: args.bead.or(config.bead).unwrap_or_default(),
            placement,
            preview: args.no_pattern,
        })
    }
}

pub fn run(args: BuildArgs, printer: &Printer) -> Result<()> {
    let config = load_config(&args)?;
    let plan = BuildPlan::resolve(&args, &config)?;

    printer.info(
        "Platform",
        &format!(
            "{} {}",
            plan.platform,
            printer.dim(&format!("({})", plural(plan.platform.len(), "bead", "beads")))
        ),
    );
    if let Some(palette) = &plan.palette {
        printer.info(
            "Palette",
            &format!("{} ({})", palette.name, plural(palette.len(), "colour", "colours")),
        );
    }

    let mut pattern = Pattern::new(plan.platform, plan.palette)
        .with_bead_shape(plan.bead)
        .with_image(&plan.input, plan.placement);

    let document = if plan.preview {
        printer.status("Previewing", &display_path(&plan.input));
        let preview = pattern.preview()?;
        render_preview(&pattern, &preview)
    } else {
        printer.status("Sampling", &display_path(&plan.input));
        pattern.get_colours()?;
        printer.info(
            "Filled",
            &format!(
                "{} of {}",
                pattern.filled(),
                plural(pattern.len(), "bead", "beads")
            ),
        );
        if pattern.filled() == 0 {
            printer.warning("Empty", "the image covers no beads; check scale and offsets");
        }
        report_counts(&pattern, plan.output.is_some(), printer);
        render_pattern(&pattern)
    };

    match &plan.output {
        Some(output) => {
            write_svg(&document, output)?;
            printer.status("Wrote", &display_path(output));
        }
        None => println!("{}", document),
    }

    Ok(())
}

/// Load the explicit project file, or the default one when present.
fn load_config(args: &BuildArgs) -> Result<ProjectConfig> {
    if let Some(path) = &args.config {
        return ProjectConfig::load(path);
    }
    match ProjectConfig::find(&std::env::current_dir()?) {
        Some(path) => ProjectConfig::load(&path),
        None => Ok(ProjectConfig::default()),
    }
}

/// Bead shopping list: stdout when the SVG goes to a file, stderr otherwise.
fn report_counts(pattern: &Pattern, to_stdout: bool, printer: &Printer) {
    for count in pattern.bead_counts() {
        let label = match &count.name {
            Some(name) => format!("{} {}", count.colour, name),
            None => count.colour.to_string(),
        };
        if to_stdout {
            println!("{}\t{}", count.count, label);
        } else {
            printer.info("Uses", &format!("{} {}", count.count, label));
        }
    }
}
