use std::path::PathBuf;

use clap::Subcommand;
use haulage_optimizer::{
    json::types::{JsonItem, JsonOrder, JsonPlanningInput, JsonTruck},
    problem::order::HelperRequirement,
};
use rand::{Rng, SeedableRng, rngs::SmallRng};
use tracing::info;

use crate::file_utils::write_json;

#[derive(Subcommand)]
pub enum GenerateSubcommands {
    JsonSchema {
        /// Output file for the input schema
        #[arg(long, short = 'o')]
        out: PathBuf,
    },
    /// Random planning input, for benchmarks and demos
    Instance {
        #[arg(long, default_value_t = 50)]
        orders: usize,

        #[arg(long, default_value_t = 3)]
        trucks: usize,

        #[arg(long, default_value_t = 0)]
        seed: u64,

        #[arg(long, short = 'o')]
        out: PathBuf,
    },
}

/// Truck bodies the generator picks from: width, depth, height, max weight.
const TRUCK_MODELS: [(f64, f64, f64, f64); 3] = [
    (220.0, 420.0, 220.0, 1500.0),
    (180.0, 320.0, 190.0, 1000.0),
    (160.0, 250.0, 170.0, 700.0),
];

fn generate_instance(orders: usize, trucks: usize, seed: u64) -> JsonPlanningInput {
    let mut rng = SmallRng::seed_from_u64(seed);

    let orders = (0..orders)
        .map(|i| {
            let items = (0..rng.random_range(1..=3))
                .map(|_| JsonItem {
                    id: None,
                    length: Some(rng.random_range(10..=90) as f64),
                    width: Some(rng.random_range(10..=70) as f64),
                    height: Some(rng.random_range(10..=60) as f64),
                    weight: Some(rng.random_range(1..=60) as f64),
                    quantity: Some(rng.random_range(1..=4)),
                })
                .collect();

            let helpers = match rng.random_range(0..10) {
                0 => HelperRequirement::Two,
                1 | 2 => HelperRequirement::One,
                _ => HelperRequirement::None,
            };

            JsonOrder {
                id: format!("order-{}", i + 1),
                zone: None,
                zipcode: Some(format!("{:04}", rng.random_range(1000..10_000))),
                coordinates: None,
                helpers: Some(helpers),
                items,
            }
        })
        .collect();

    let trucks = (0..trucks)
        .map(|i| {
            let (width, depth, height, max_weight) = TRUCK_MODELS[i % TRUCK_MODELS.len()];
            JsonTruck {
                id: format!("truck-{}", i + 1),
                width,
                depth,
                height,
                max_weight,
            }
        })
        .collect();

    JsonPlanningInput {
        id: Some(format!("generated-{seed}")),
        orders,
        trucks,
        params: None,
    }
}

pub fn run(subcommand: GenerateSubcommands) -> Result<(), anyhow::Error> {
    match subcommand {
        GenerateSubcommands::JsonSchema { out } => {
            let schema = haulage_optimizer::json::schema::generate_json_schema()?;

            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)?;
            }

            std::fs::write(out, schema)?;
        }
        GenerateSubcommands::Instance {
            orders,
            trucks,
            seed,
            out,
        } => {
            let instance = generate_instance(orders, trucks, seed);
            write_json(&out, &instance)?;
            info!("Generated {} orders and {} trucks into {:?}", orders, trucks, out);
        }
    }

    Ok(())
}
