use std::path::PathBuf;

use clap::Args;

use crate::error::Result;
use crate::output::{display_path, plural, Printer};
use crate::render::{render_swatches, write_svg};
use crate::types::{Palette, HAMA};

/// List the colours of a palette
#[derive(Args, Debug)]
pub struct PaletteArgs {
    /// Builtin palette name or palette YAML file
    #[arg(default_value = HAMA)]
    pub palette: String,

    /// Only list these palette indices, in this order (e.g. 0,2,4)
    #[arg(long, value_delimiter = ',')]
    pub subset: Option<Vec<usize>>,

    /// Also write a swatch sheet as SVG
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

pub fn run(args: PaletteArgs, printer: &Printer) -> Result<()> {
    let palette = Palette::resolve(&args.palette)?;
    let palette = match &args.subset {
        Some(indices) => palette.subset(indices)?,
        None => palette,
    };

    printer.status(
        "Listing",
        &format!("{} from {}", plural(palette.len(), "colour", "colours"), palette.name),
    );

    // Print palette lines to stdout
    for (i, entry) in palette.entries().enumerate() {
        println!("{:>3} {} {}", i, entry.colour, entry.name);
    }

    if let Some(output) = &args.output {
        write_svg(&render_swatches(&palette), output)?;
        printer.status("Wrote", &display_path(output));
    }

    Ok(())
}
