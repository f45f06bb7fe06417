use serde::Serialize;
use tracing::{Level, debug, instrument, warn};

use crate::{
    packing::{
        balance::{CenterOfGravity, center_of_gravity, is_balanced},
        packer::{Container, Packer, PackingItem, PackingResult, Section},
        shelf_packer::ShelfPacker,
    },
    problem::{order::Order, truck::Truck},
    routing::trip_route::TripRoute,
};

/// Placement of a trip's cargo, ready for the loading dock.
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct LoadPlan {
    #[serde(flatten)]
    pub packing: PackingResult,
    pub center_of_gravity: CenterOfGravity,
    pub is_balanced: bool,
}

/// Splits the cargo space in three bands along its depth and fills them so
/// that the last stops sit at the back and the first stops by the door.
pub struct LoadPlanGenerator {
    balance_tolerance: f64,
}

impl LoadPlanGenerator {
    pub fn new(balance_tolerance: f64) -> Self {
        Self { balance_tolerance }
    }

    #[instrument(skip_all, level = Level::DEBUG, fields(truck = truck.id()))]
    pub fn generate(&self, truck: &Truck, orders: &[&Order], route: &TripRoute) -> LoadPlan {
        let mut units: Vec<PackingItem> = orders
            .iter()
            .flat_map(|order| PackingItem::expand_order(order, route.stop_sequence(order.id())))
            .collect();

        // Stable: units of the same stop keep their order.
        units.sort_by(|a, b| b.stop_sequence.cmp(&a.stop_sequence));

        let truck_space = Container::from_truck(truck);
        let band_depth = truck.depth() / Section::ALL.len() as f64;
        let group_size = units.len().div_ceil(Section::ALL.len()).max(1);

        let mut groups = Vec::with_capacity(Section::ALL.len());
        let mut remaining = units.into_iter();
        for _ in Section::ALL {
            groups.push(remaining.by_ref().take(group_size).collect::<Vec<_>>());
        }

        let mut placed = Vec::new();
        let mut unpacked = Vec::new();
        let mut remaining_weight = truck.max_weight();

        for ((index, section), group) in Section::ALL.into_iter().enumerate().zip(groups) {
            if group.is_empty() {
                continue;
            }

            let band = truck_space.band(
                index as f64 * band_depth,
                band_depth,
                remaining_weight.max(0.0),
            );
            let result = ShelfPacker.pack(&band, group);

            debug!(
                "{:?} section: {} placed, {} unpacked",
                section,
                result.placed.len(),
                result.unpacked.len()
            );
            if !result.unpacked.is_empty() {
                warn!(
                    "{} units left out of the {:?} section of truck {}",
                    result.unpacked.len(),
                    section,
                    truck.id()
                );
            }

            remaining_weight -= result.total_weight;
            placed.extend(result.placed.into_iter().map(|mut item| {
                item.section = Some(section);
                item
            }));
            unpacked.extend(result.unpacked);
        }

        let packing = PackingResult::new(&truck_space, placed, unpacked);
        let center_of_gravity = center_of_gravity(&packing.placed);

        LoadPlan {
            is_balanced: is_balanced(
                &center_of_gravity,
                truck.width(),
                truck.depth(),
                self.balance_tolerance,
            ),
            center_of_gravity,
            packing,
        }
    }
}
