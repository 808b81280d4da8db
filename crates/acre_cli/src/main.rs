//! Acre CLI, the command-line interface for the Acre macro floorplanner.
//!
//! Provides `acre place` to floorplan a design and `acre check` to validate a
//! design and its run parameters without annealing.

#![warn(missing_docs)]

mod check;
mod pipeline;
mod place;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Acre: a simulated-annealing macro floorplanner.
#[derive(Parser, Debug)]
#[command(name = "acre", version, about = "Acre Macro Floorplanner")]
pub struct Cli {
    /// Print errors only.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Also print progress notes and per-level cost summaries.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// When to color diagnostics.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Run parameters to use instead of `acre.toml` next to the design.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Floorplan a design.
    Place(PlaceArgs),
    /// Load and resolve a design without floorplanning it.
    Check(CheckArgs),
}

/// Arguments for the `acre place` subcommand.
#[derive(Parser, Debug)]
pub struct PlaceArgs {
    /// Design description (`.toml` or `.json`).
    pub design: String,

    /// Write the JSON floorplan report here instead of printing it.
    #[arg(short, long)]
    pub output: Option<String>,

    /// How the report is printed on stdout.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Master random seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Annealing workers per level.
    #[arg(long)]
    pub workers: Option<usize>,

    /// Number of levels.
    #[arg(long)]
    pub levels: Option<usize>,
}

/// Arguments for the `acre check` subcommand.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Design description (`.toml` or `.json`).
    pub design: String,
}

/// When diagnostics are colored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// When stderr looks like a terminal (`TERM` is set).
    Auto,
    /// Always.
    Always,
    /// Never.
    Never,
}

impl ColorChoice {
    fn enabled(self) -> bool {
        match self {
            ColorChoice::Auto => std::env::var_os("TERM").is_some(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

/// Report printed on stdout by `acre place`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Block table and cost breakdown.
    Text,
    /// The full report as pretty JSON.
    Json,
}

/// Flags shared by every subcommand.
pub struct GlobalArgs {
    /// Print errors only.
    pub quiet: bool,
    /// Print progress notes too.
    pub verbose: bool,
    /// Color diagnostics.
    pub color: bool,
    /// Explicit run configuration path.
    pub config: Option<String>,
}

impl From<&Cli> for GlobalArgs {
    fn from(cli: &Cli) -> Self {
        GlobalArgs {
            quiet: cli.quiet,
            verbose: cli.verbose,
            color: cli.color.enabled(),
            config: cli.config.clone(),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let global = GlobalArgs::from(&cli);

    let outcome = match &cli.command {
        Command::Place(args) => place::run(args, &global),
        Command::Check(args) => check::run(args, &global),
    };

    let code = outcome.unwrap_or_else(|e| {
        eprintln!("error: {e}");
        1
    });
    process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_place_default() {
        let cli = Cli::parse_from(["acre", "place", "chip.toml"]);
        match cli.command {
            Command::Place(ref args) => {
                assert_eq!(args.design, "chip.toml");
                assert!(args.output.is_none());
                assert_eq!(args.format, ReportFormat::Text);
                assert!(args.seed.is_none());
                assert!(args.workers.is_none());
                assert!(args.levels.is_none());
            }
            _ => panic!("expected Place command"),
        }
    }

    #[test]
    fn parse_place_with_overrides() {
        let cli = Cli::parse_from([
            "acre",
            "place",
            "chip.json",
            "-o",
            "plan.json",
            "--format",
            "json",
            "--seed",
            "7",
            "--workers",
            "8",
            "--levels",
            "2",
        ]);
        match cli.command {
            Command::Place(ref args) => {
                assert_eq!(args.design, "chip.json");
                assert_eq!(args.output.as_deref(), Some("plan.json"));
                assert_eq!(args.format, ReportFormat::Json);
                assert_eq!(args.seed, Some(7));
                assert_eq!(args.workers, Some(8));
                assert_eq!(args.levels, Some(2));
            }
            _ => panic!("expected Place command"),
        }
    }

    #[test]
    fn parse_check() {
        let cli = Cli::parse_from(["acre", "check", "chip.toml"]);
        match cli.command {
            Command::Check(ref args) => assert_eq!(args.design, "chip.toml"),
            _ => panic!("expected Check command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["acre", "--quiet", "--color", "never", "check", "d.toml"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.color, ColorChoice::Never);
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["acre", "place", "d.toml", "--verbose", "--color", "always"]);
        assert!(cli.verbose);
        assert_eq!(cli.color, ColorChoice::Always);
    }

    #[test]
    fn parse_config_path() {
        let cli = Cli::parse_from(["acre", "--config", "/path/to/acre.toml", "check", "d.toml"]);
        assert_eq!(cli.config.as_deref(), Some("/path/to/acre.toml"));
    }

    #[test]
    fn global_args_resolve_color() {
        let cli = Cli::parse_from(["acre", "--color", "always", "-q", "check", "d.toml"]);
        let global = GlobalArgs::from(&cli);
        assert!(global.color);
        assert!(global.quiet);
        assert!(global.config.is_none());
    }

    #[test]
    fn place_requires_design() {
        assert!(Cli::try_parse_from(["acre", "place"]).is_err());
    }
}
