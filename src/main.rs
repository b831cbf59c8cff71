use clap::{Args, Parser, Subcommand};
use miette::{miette, Result};
use std::path::PathBuf;

use havlak_rs::cli;
use havlak_rs::GraphParams;

#[derive(Parser)]
#[command(name = "havlak-rs")]
#[command(about = "Natural-loop recognition for control flow graphs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Shape of the synthetic benchmark graph, shared by all subcommands
#[derive(Args)]
struct ShapeArgs {
    /// Number of outer segments
    #[arg(long, default_value_t = 10)]
    segments: usize,

    /// Chained loop iterations per segment
    #[arg(long, default_value_t = 100)]
    iterations: usize,

    /// Nested base loops per iteration
    #[arg(long, default_value_t = 25)]
    base_loops: usize,
}

impl ShapeArgs {
    fn params(&self) -> GraphParams {
        GraphParams {
            segments: self.segments,
            iterations: self.iterations,
            base_loops: self.base_loops,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build a synthetic benchmark CFG and report its shape
    Generate {
        #[command(flatten)]
        shape: ShapeArgs,

        /// Print every block with its predecessor and successor lists
        #[arg(short, long)]
        verbose: bool,

        /// Output DOT file for visualization (optional)
        #[arg(short, long)]
        dot: Option<PathBuf>,
    },

    /// Run loop recognition and dump the resulting loop forest
    Analyze {
        #[command(flatten)]
        shape: ShapeArgs,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Output DOT file with loop membership coloring (optional)
        #[arg(long)]
        dot: Option<PathBuf>,
    },

    /// Time repeated loop-recognition runs on an unchanged graph
    Bench {
        #[command(flatten)]
        shape: ShapeArgs,

        /// Number of timed runs after the warm-up run
        #[arg(long, default_value_t = 50)]
        runs: usize,

        /// Allocate a fresh forest per run instead of reusing storage
        #[arg(long)]
        no_reuse: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { shape, verbose, dot } => {
            cli::generate::generate(&shape.params(), verbose, dot.as_deref())
                .map_err(|e| miette!("{}", e))
        }
        Commands::Analyze { shape, format, dot } => {
            cli::analyze::analyze(&shape.params(), &format, dot.as_deref())
                .map_err(|e| miette!("{}", e))
        }
        Commands::Bench {
            shape,
            runs,
            no_reuse,
        } => cli::bench::bench(&shape.params(), runs, !no_reuse).map_err(|e| miette!("{}", e)),
    }
}
