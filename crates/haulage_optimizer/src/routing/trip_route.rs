use jiff::SignedDuration;
use serde::Serialize;

use crate::problem::{order::OrderIdx, zone::Zone};

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RouteStop {
    /// 1-based position in the delivery sequence.
    pub sequence: usize,
    #[serde(skip)]
    pub order: OrderIdx,
    pub order_id: String,
    pub zone: Zone,
    pub zipcode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<geo::Point>,
    pub weight: f64,
    pub volume: f64,
    pub service_duration: SignedDuration,
    /// Time from leaving the depot to reaching this stop.
    pub arrival_offset: SignedDuration,
}

/// Delivery sequence of one trip.
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct TripRoute {
    pub zones: Vec<Zone>,
    pub stops: Vec<RouteStop>,
    /// Depot to the last stop, service included.
    pub duration: SignedDuration,
    /// `duration` plus the drive back to the depot.
    pub duration_with_return: SignedDuration,
}

impl TripRoute {
    /// Stop number of the order with this external id.
    pub fn stop_sequence(&self, order_id: &str) -> Option<usize> {
        self.stops
            .iter()
            .find(|stop| stop.order_id == order_id)
            .map(|stop| stop.sequence)
    }

    pub fn order_indices(&self) -> impl Iterator<Item = OrderIdx> {
        self.stops.iter().map(|stop| stop.order)
    }
}
