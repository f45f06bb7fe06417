use std::path::{Path, PathBuf};

use clap::Args;
use haulage_optimizer::{optimizer::optimize, params::PlannerParams};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{error, info};

use crate::file_utils::{read_folder, read_problem, write_json};

#[derive(Args)]
pub struct OptimizeDatasetArgs {
    /// A folder of input files, or a single file
    #[arg(short, long)]
    dataset: PathBuf,

    /// Output folder, one result file per input
    #[arg(short, long)]
    output: Option<PathBuf>,
}

struct DatasetOutcome {
    assigned: usize,
    total: usize,
    trips: usize,
}

fn optimize_file(path: &Path, output: Option<&Path>) -> anyhow::Result<DatasetOutcome> {
    let problem = read_problem(path, PlannerParams::default())?;
    let result = optimize(&problem)?;

    if let Some(output) = output {
        let file_name = path.file_name().unwrap_or_default();
        write_json(&output.join(file_name), &result)?;
    }

    Ok(DatasetOutcome {
        assigned: result.summary.assigned_orders,
        total: result.summary.total_orders,
        trips: result.summary.total_trips,
    })
}

pub fn run(args: OptimizeDatasetArgs) -> Result<(), anyhow::Error> {
    info!("Optimizing dataset {:?}", args.dataset);
    let paths = if args.dataset.is_file() {
        vec![args.dataset]
    } else {
        read_folder(&args.dataset)?
    };

    let bar = ProgressBar::new(paths.len() as u64);
    bar.set_style(ProgressStyle::default_bar().template("[{bar:40}] {pos}/{len} ({elapsed})")?);

    let outcomes: Vec<(PathBuf, anyhow::Result<DatasetOutcome>)> = paths
        .into_par_iter()
        .map(|path| {
            let outcome = optimize_file(&path, args.output.as_deref());
            bar.inc(1);
            (path, outcome)
        })
        .collect();

    bar.finish_and_clear();

    let mut failures = 0;
    for (path, outcome) in outcomes {
        match outcome {
            Ok(outcome) => info!(
                "{}: {}/{} orders assigned on {} trips",
                path.display(),
                outcome.assigned,
                outcome.total,
                outcome.trips
            ),
            Err(err) => {
                failures += 1;
                error!("{}: {err:#}", path.display());
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} files could not be optimized");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::*;

    #[test]
    fn test_optimize_file() {
        let path = env::current_dir()
            .unwrap()
            .join("tests/fixtures/read_folder/nested/b.json");

        let outcome = optimize_file(&path, None).unwrap();

        assert_eq!(outcome.total, 3);
        assert_eq!(outcome.assigned, 3);
        assert_eq!(outcome.trips, 2);
    }
}
