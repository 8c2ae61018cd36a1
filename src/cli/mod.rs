//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod generate;
mod info;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::logging::{init_logging, LoggingConfig};

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// sprpal - Generate recolored palette variations for indexed sprites
#[derive(Parser)]
#[command(name = "sprpal")]
#[command(about = "sprpal - Generate recolored .pal palette variations for indexed .spr sprites")]
#[command(version)]
pub struct Cli {
    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by the batch commands
#[derive(clap::Args, Debug)]
pub struct BatchArgs {
    /// Project file (default: sprpal.toml found by walking up from the current directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of variants to generate
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub count: Option<u32>,

    /// Number of the first variant
    #[arg(long)]
    pub start: Option<u32>,

    /// Output directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Seed for a reproducible batch
    #[arg(long)]
    pub seed: Option<u64>,

    /// Drift saturation once per variant
    #[arg(long)]
    pub random_saturation: bool,

    /// Drift brightness once per variant
    #[arg(long)]
    pub random_brightness: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate palette variations for every target name
    Generate {
        #[command(flatten)]
        batch: BatchArgs,

        /// Target name (repeatable); defaults to the project prefix
        #[arg(short, long = "target")]
        targets: Vec<String>,

        /// Evenly spaced hues instead of stratified sampling
        #[arg(long)]
        even: bool,

        /// Also write a PNG swatch per variant
        #[arg(long)]
        swatches: bool,
    },

    /// Generate hair palettes with the fine-grained ramp generator
    Hair {
        #[command(flatten)]
        batch: BatchArgs,

        /// Hair style count written into the file names
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        styles: Option<u32>,
    },

    /// Write a sprite's embedded palette as a .pal file
    Extract {
        /// Input .spr file
        sprite: PathBuf,

        /// Output .pal file (default: sprite path with .pal extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Summarize a .spr, .pal or .act file
    Info {
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the preview palette of the project's current group settings
    Preview {
        /// Project file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output .pal file
        #[arg(short, long)]
        output: PathBuf,

        /// Also write a PNG swatch
        #[arg(long)]
        swatch: Option<PathBuf>,
    },

    /// Render every indexed frame of a sprite to PNG
    Frames {
        sprite: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Entry point for the CLI
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(LoggingConfig::from_verbosity(cli.verbose));

    match cli.command {
        Commands::Generate { batch, targets, even, swatches } => {
            generate::run_generate(&batch, targets, even, swatches)
        }
        Commands::Hair { batch, styles } => generate::run_hair(&batch, styles),
        Commands::Extract { sprite, output } => info::run_extract(&sprite, output.as_deref()),
        Commands::Info { file, json } => info::run_info(&file, json),
        Commands::Preview { config, output, swatch } => {
            generate::run_preview(config.as_deref(), &output, swatch.as_deref())
        }
        Commands::Frames { sprite, output } => info::run_frames(&sprite, &output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from([
            "sprpal", "-vv", "generate", "--count", "3", "--start", "100", "-t", "Foo", "-t", "Bar",
            "--seed", "9", "--even",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Generate { batch, targets, even, swatches } => {
                assert_eq!(batch.count, Some(3));
                assert_eq!(batch.start, Some(100));
                assert_eq!(batch.seed, Some(9));
                assert_eq!(targets, vec!["Foo", "Bar"]);
                assert!(even);
                assert!(!swatches);
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_zero_count_is_rejected() {
        assert!(Cli::try_parse_from(["sprpal", "hair", "--count", "0"]).is_err());
    }
}
