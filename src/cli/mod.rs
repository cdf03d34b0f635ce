pub mod build;
pub mod completions;
pub mod palette;

use clap::{Parser, Subcommand};

/// beadalize - Turn images into fuse-bead patterns
#[derive(Parser, Debug)]
#[command(name = "beadalize")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert an image into a bead pattern SVG
    Build(build::BuildArgs),

    /// List the colours of a palette
    Palette(palette::PaletteArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}
