use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

use crate::{
    generate::GenerateSubcommands, optimize::OptimizeArgs, optimize_dataset::OptimizeDatasetArgs,
    preview::PreviewArgs,
};

mod file_utils;
mod generate;
mod optimize;
mod optimize_dataset;
mod parsers;
mod preview;
mod summary;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Plans trips, routes and load plans for one input file
    Optimize {
        #[command(flatten)]
        args: OptimizeArgs,
    },
    /// Packs every order of an input into a single truck
    Preview {
        #[command(flatten)]
        args: PreviewArgs,
    },
    OptimizeDataset {
        #[command(flatten)]
        args: OptimizeDatasetArgs,
    },
    #[command(visible_alias = "g")]
    Generate {
        #[command(subcommand)]
        commands: GenerateSubcommands,
    },
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Some(Commands::Optimize { args }) => optimize::run(args)?,
        Some(Commands::Preview { args }) => preview::run(args)?,
        Some(Commands::OptimizeDataset { args }) => optimize_dataset::run(args)?,
        Some(Commands::Generate { commands }) => generate::run(commands)?,
        None => {}
    }

    Ok(())
}
