use jiff::SignedDuration;

use crate::{
    params::TravelParams,
    problem::{
        order::{HelperRequirement, Order},
        zone::Zone,
    },
};

/// Zone level travel and service times, precomputed from [`TravelParams`].
///
/// The zone to zone table is a flat `Zone::COUNT * Zone::COUNT` matrix, index
/// `from * Zone::COUNT + to`.
pub struct TravelModel {
    depot_durations: [SignedDuration; Zone::COUNT],
    zone_durations: [SignedDuration; Zone::COUNT * Zone::COUNT],
    service_duration: SignedDuration,
    heavy_service_duration: SignedDuration,
    heavy_order_weight: f64,
    reload_duration: SignedDuration,
}

impl TravelModel {
    pub fn new(params: &TravelParams) -> Self {
        let mut zone_durations = [params.unknown_pair_duration; Zone::COUNT * Zone::COUNT];

        for &(from, to, duration) in &params.zone_pair_durations {
            zone_durations[Self::index(from, to)] = duration;
            zone_durations[Self::index(to, from)] = duration;
        }

        for zone in Zone::ALL {
            zone_durations[Self::index(zone, zone)] = params.same_zone_duration;
        }

        Self {
            depot_durations: params.depot_durations,
            zone_durations,
            service_duration: params.service_duration,
            heavy_service_duration: params.heavy_service_duration,
            heavy_order_weight: params.heavy_order_weight,
            reload_duration: params.reload_duration,
        }
    }

    #[inline(always)]
    fn index(from: Zone, to: Zone) -> usize {
        from.index() * Zone::COUNT + to.index()
    }

    /// Driving time between the depot and a zone, the same in both directions.
    #[inline]
    pub fn depot_duration(&self, zone: Zone) -> SignedDuration {
        self.depot_durations[zone.index()]
    }

    #[inline]
    pub fn zone_duration(&self, from: Zone, to: Zone) -> SignedDuration {
        self.zone_durations[Self::index(from, to)]
    }

    /// Time spent at the customer. Heavy orders and orders handled by two
    /// helpers take longer.
    pub fn service_duration(&self, order: &Order) -> SignedDuration {
        if order.total_weight() > self.heavy_order_weight
            || order.helpers() == HelperRequirement::Two
        {
            self.heavy_service_duration
        } else {
            self.service_duration
        }
    }

    pub fn reload_duration(&self) -> SignedDuration {
        self.reload_duration
    }
}
