use std::fmt;

use serde::Serialize;

use crate::{
    planner::trip::Trip,
    problem::{order::OrderIdx, truck::TruckIdx},
};

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnassignedReason {
    NoTruckCapacity,
    InsufficientHelpers,
}

impl fmt::Display for UnassignedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnassignedReason::NoTruckCapacity => write!(f, "No available truck with capacity"),
            UnassignedReason::InsufficientHelpers => write!(f, "Insufficient helpers available"),
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unassignment {
    pub order_id: OrderIdx,
    pub reason: UnassignedReason,
}

/// Outcome of the planner: non-empty trips, sorted by truck and trip number,
/// and the orders no trip could take.
#[derive(Debug, Clone, Default)]
pub struct FleetAssignment {
    trips: Vec<Trip>,
    unassigned: Vec<Unassignment>,
}

impl FleetAssignment {
    /// Drops empty trips and renumbers the remaining ones from 1 per truck.
    pub(crate) fn new(trips: Vec<Trip>, unassigned: Vec<Unassignment>) -> Self {
        let mut trips: Vec<Trip> = trips.into_iter().filter(|trip| !trip.is_empty()).collect();
        trips.sort_by_key(|trip| (trip.truck_id(), trip.number()));

        let mut previous: Option<TruckIdx> = None;
        let mut number = 0;
        for trip in trips.iter_mut() {
            if previous != Some(trip.truck_id()) {
                previous = Some(trip.truck_id());
                number = 0;
            }
            number += 1;
            trip.set_number(number);
        }

        Self { trips, unassigned }
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn trips_of(&self, truck_id: TruckIdx) -> impl Iterator<Item = &Trip> {
        self.trips
            .iter()
            .filter(move |trip| trip.truck_id() == truck_id)
    }

    pub fn unassigned(&self) -> &[Unassignment] {
        &self.unassigned
    }

    pub fn assigned_count(&self) -> usize {
        self.trips.iter().map(|trip| trip.orders().len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        problem::zone::Zone,
        test_utils::{create_order, create_truck},
    };

    #[test]
    fn test_drops_empty_trips_and_renumbers() {
        let truck = create_truck("t", 100.0, 100.0, 100.0, 100.0);
        let order = create_order("o", Zone::North, 1.0);

        let empty = Trip::new(TruckIdx::new(0), &truck, 1);
        let mut second = Trip::new(TruckIdx::new(0), &truck, 2);
        second.try_load(OrderIdx::new(0), &order);
        let mut other_truck = Trip::new(TruckIdx::new(1), &truck, 1);
        other_truck.try_load(OrderIdx::new(1), &order);

        let assignment = FleetAssignment::new(vec![other_truck, second, empty], vec![]);

        let numbers: Vec<(TruckIdx, usize)> = assignment
            .trips()
            .iter()
            .map(|trip| (trip.truck_id(), trip.number()))
            .collect();

        assert_eq!(
            numbers,
            vec![(TruckIdx::new(0), 1), (TruckIdx::new(1), 1)]
        );
        assert_eq!(assignment.assigned_count(), 2);
    }

    #[test]
    fn test_reason_messages() {
        assert_eq!(
            UnassignedReason::NoTruckCapacity.to_string(),
            "No available truck with capacity"
        );
        assert_eq!(
            UnassignedReason::InsufficientHelpers.to_string(),
            "Insufficient helpers available"
        );
    }
}
