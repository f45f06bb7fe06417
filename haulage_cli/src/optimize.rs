use std::path::PathBuf;

use clap::{Args, ValueEnum};
use haulage_optimizer::{
    optimizer::optimize,
    params::{PlannerParams, PlanningStrategy},
};
use tracing::info;

use crate::{file_utils, parsers, summary};

#[derive(ValueEnum, Clone, Copy)]
pub enum StrategyArg {
    /// One trip per truck, one zone per truck
    Cluster,
    /// Trucks split by zone demand, extra trips when needed
    Demand,
}

impl From<StrategyArg> for PlanningStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Cluster => PlanningStrategy::ClusterSingleTrip,
            StrategyArg::Demand => PlanningStrategy::DemandMultiTrip,
        }
    }
}

#[derive(Args)]
pub struct OptimizeArgs {
    /// The file to optimize
    #[arg(short = 'i', long)]
    input: PathBuf,

    /// Overrides the strategy of the input file
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Overrides the helper headcount of the input file
    #[arg(long)]
    helpers: Option<usize>,

    /// Overrides the depot reload time (e.g. "30", "45m", "PT45M")
    #[arg(long, value_parser = parsers::parse_duration)]
    reload: Option<jiff::SignedDuration>,

    /// Output file for the full result
    #[arg(long, short = 'o')]
    out: Option<PathBuf>,
}

pub fn run(args: OptimizeArgs) -> anyhow::Result<()> {
    // Flags win over the params of the input file.
    let problem = file_utils::read_problem(&args.input, PlannerParams::default())?.with_params(
        |params| {
            if let Some(strategy) = args.strategy {
                params.strategy = strategy.into();
            }
            if let Some(helpers) = args.helpers {
                params.available_helpers = helpers;
            }
            if let Some(reload) = args.reload {
                params.travel.reload_duration = reload;
            }
        },
    );

    let result = optimize(&problem)?;

    println!("{}", summary::fleet_table(&result));
    if !result.unassigned_orders.is_empty() {
        println!("{}", summary::unassigned_table(&result));
    }

    if let Some(out) = args.out {
        file_utils::write_json(&out, &result)?;
        info!("Result written to {:?}", out);
    }

    Ok(())
}
