use std::path::PathBuf;

use clap::{Args, ValueEnum};
use haulage_optimizer::{
    optimizer::preview_problem_truck, packing::packer::PackerKind, params::PlannerParams,
};

use crate::{file_utils, summary};

#[derive(ValueEnum, Clone, Copy)]
pub enum PackerArg {
    FreeSpace,
    Shelf,
    Layer,
}

impl From<PackerArg> for PackerKind {
    fn from(value: PackerArg) -> Self {
        match value {
            PackerArg::FreeSpace => PackerKind::FreeSpace,
            PackerArg::Shelf => PackerKind::Shelf,
            PackerArg::Layer => PackerKind::Layer,
        }
    }
}

#[derive(Args)]
pub struct PreviewArgs {
    #[arg(short = 'i', long)]
    input: PathBuf,

    /// Id of the truck to fill
    #[arg(long)]
    truck: String,

    #[arg(long, value_enum)]
    packer: Option<PackerArg>,

    /// Output file for the placements
    #[arg(long, short = 'o')]
    out: Option<PathBuf>,
}

pub fn run(args: PreviewArgs) -> anyhow::Result<()> {
    let problem = file_utils::read_problem(&args.input, PlannerParams::default())?;
    let preview = preview_problem_truck(&problem, &args.truck, args.packer.map(PackerKind::from))?;

    println!("{}", summary::preview_table(&preview));

    if let Some(out) = args.out {
        file_utils::write_json(&out, &preview)?;
    }

    Ok(())
}
