use jiff::SignedDuration;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    packing::packer::PackerKind,
    problem::zone::{Zone, ZoneResolver},
};

#[derive(Serialize, Deserialize, JsonSchema, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlanningStrategy {
    /// One trip per truck, zones served by dedicated trucks, helper budget enforced.
    ClusterSingleTrip,
    /// Trucks split across zones by demand, extra trips opened for leftovers.
    #[default]
    DemandMultiTrip,
}

#[derive(Clone, Debug)]
pub struct TravelParams {
    /// Depot to zone driving time, indexed by [`Zone::index`].
    pub depot_durations: [SignedDuration; Zone::COUNT],
    /// Symmetric zone to zone driving times. Pairs that are missing use
    /// `unknown_pair_duration`.
    pub zone_pair_durations: Vec<(Zone, Zone, SignedDuration)>,
    pub same_zone_duration: SignedDuration,
    pub unknown_pair_duration: SignedDuration,

    pub service_duration: SignedDuration,
    pub heavy_service_duration: SignedDuration,
    /// Orders strictly heavier than this (kg) get the heavy service duration.
    pub heavy_order_weight: f64,

    /// Time spent back at the depot between two trips of the same truck.
    pub reload_duration: SignedDuration,
}

impl Default for TravelParams {
    fn default() -> Self {
        let mut depot_durations = [SignedDuration::ZERO; Zone::COUNT];
        depot_durations[Zone::North.index()] = SignedDuration::from_mins(25);
        depot_durations[Zone::South.index()] = SignedDuration::from_mins(30);
        depot_durations[Zone::East.index()] = SignedDuration::from_mins(25);
        depot_durations[Zone::West.index()] = SignedDuration::from_mins(35);
        depot_durations[Zone::Central.index()] = SignedDuration::from_mins(15);

        let zone_pair_durations = vec![
            (Zone::North, Zone::South, SignedDuration::from_mins(40)),
            (Zone::East, Zone::West, SignedDuration::from_mins(40)),
            (Zone::North, Zone::East, SignedDuration::from_mins(20)),
            (Zone::North, Zone::West, SignedDuration::from_mins(20)),
            (Zone::South, Zone::East, SignedDuration::from_mins(20)),
            (Zone::South, Zone::West, SignedDuration::from_mins(20)),
            (Zone::Central, Zone::North, SignedDuration::from_mins(15)),
            (Zone::Central, Zone::South, SignedDuration::from_mins(15)),
            (Zone::Central, Zone::East, SignedDuration::from_mins(15)),
            (Zone::Central, Zone::West, SignedDuration::from_mins(15)),
        ];

        Self {
            depot_durations,
            zone_pair_durations,
            same_zone_duration: SignedDuration::from_mins(5),
            unknown_pair_duration: SignedDuration::from_mins(30),
            service_duration: SignedDuration::from_mins(10),
            heavy_service_duration: SignedDuration::from_mins(15),
            heavy_order_weight: 50.0,
            reload_duration: SignedDuration::from_mins(30),
        }
    }
}

/// Immutable configuration of one optimization run.
#[derive(Clone, Debug)]
pub struct PlannerParams {
    pub strategy: PlanningStrategy,
    /// Helper headcount shared by the whole fleet, only enforced by
    /// [`PlanningStrategy::ClusterSingleTrip`].
    pub available_helpers: usize,
    pub travel: TravelParams,
    pub zone_resolver: ZoneResolver,
    /// Allowed deviation of the center of gravity from the floor center, as a
    /// fraction of the width and depth.
    pub balance_tolerance: f64,
    /// Packing strategy used by single truck previews.
    pub preview_packer: PackerKind,
}

impl Default for PlannerParams {
    fn default() -> Self {
        Self {
            strategy: PlanningStrategy::default(),
            available_helpers: 6,
            travel: TravelParams::default(),
            zone_resolver: ZoneResolver::default(),
            balance_tolerance: 0.3,
            preview_packer: PackerKind::FreeSpace,
        }
    }
}
