use tracing::{Level, debug, info, instrument};

use crate::{
    planner::{
        fleet_assignment::{FleetAssignment, UnassignedReason, Unassignment},
        fleet_planner::group_by_zone,
        trip::Trip,
    },
    problem::{order::OrderIdx, planning_problem::PlanningProblem, truck::TruckIdx},
    travel::travel_model::TravelModel,
};

/// Cluster first, then pack: each truck serves a single zone and runs a single
/// trip. Zones closest to the depot are served first, and within a zone the
/// heaviest orders go first. Helpers are a fleet-wide budget.
#[instrument(skip_all, level = Level::DEBUG)]
pub fn plan(problem: &PlanningProblem, travel_model: &TravelModel) -> FleetAssignment {
    let trucks = problem.trucks_by_capacity();
    let mut trips: Vec<Option<Trip>> = vec![None; problem.trucks().len()];
    let mut unassigned = Vec::new();
    let mut remaining_helpers = problem.params().available_helpers;

    let mut zones = group_by_zone(problem);
    zones.sort_by_key(|(zone, _)| travel_model.depot_duration(*zone));

    for (zone, mut orders) in zones {
        orders.sort_by(|&a, &b| {
            let (a, b) = (problem.order(a), problem.order(b));
            b.total_weight()
                .total_cmp(&a.total_weight())
                .then_with(|| a.id().cmp(b.id()))
        });

        let mut zone_trucks: Vec<TruckIdx> = Vec::new();

        for order_id in orders {
            let order = problem.order(order_id);
            let helpers = order.helpers().count();

            if helpers > remaining_helpers {
                debug!(
                    "order {} needs {} helpers, {} left",
                    order.id(),
                    helpers,
                    remaining_helpers
                );
                unassigned.push(Unassignment {
                    order_id,
                    reason: UnassignedReason::InsufficientHelpers,
                });
                continue;
            }

            if load_on_zone_truck(&mut trips, &zone_trucks, order_id, problem)
                || open_truck(&mut trips, &trucks, &mut zone_trucks, order_id, problem)
            {
                remaining_helpers -= helpers;
            } else {
                unassigned.push(Unassignment {
                    order_id,
                    reason: UnassignedReason::NoTruckCapacity,
                });
            }
        }

        debug!("zone {zone} served by {} trucks", zone_trucks.len());
    }

    let assignment = FleetAssignment::new(trips.into_iter().flatten().collect(), unassigned);

    info!(
        "Cluster planning: {} trips, {} unassigned, {} helpers left",
        assignment.trips().len(),
        assignment.unassigned().len(),
        remaining_helpers
    );

    assignment
}

fn load_on_zone_truck(
    trips: &mut [Option<Trip>],
    zone_trucks: &[TruckIdx],
    order_id: OrderIdx,
    problem: &PlanningProblem,
) -> bool {
    let order = problem.order(order_id);

    zone_trucks.iter().any(|truck_id| {
        trips[truck_id.get()]
            .as_mut()
            .is_some_and(|trip| trip.try_load(order_id, order))
    })
}

fn open_truck(
    trips: &mut [Option<Trip>],
    trucks: &[TruckIdx],
    zone_trucks: &mut Vec<TruckIdx>,
    order_id: OrderIdx,
    problem: &PlanningProblem,
) -> bool {
    let order = problem.order(order_id);

    for &truck_id in trucks {
        if trips[truck_id.get()].is_some() {
            continue;
        }

        let mut trip = Trip::new(truck_id, problem.truck(truck_id), 1);
        if trip.try_load(order_id, order) {
            trips[truck_id.get()] = Some(trip);
            zone_trucks.push(truck_id);
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        params::{PlannerParams, PlanningStrategy},
        problem::{order::HelperRequirement, zone::Zone},
        test_utils::{create_order, create_order_with, create_problem, create_truck},
    };

    fn params(available_helpers: usize) -> PlannerParams {
        PlannerParams {
            strategy: PlanningStrategy::ClusterSingleTrip,
            available_helpers,
            ..PlannerParams::default()
        }
    }

    fn run(problem: &PlanningProblem) -> FleetAssignment {
        plan(problem, &TravelModel::new(&problem.params().travel))
    }

    #[test]
    fn test_one_truck_per_zone() {
        let problem = create_problem(
            vec![
                create_order("n1", Zone::North, 10.0),
                create_order("s1", Zone::South, 10.0),
                create_order("n2", Zone::North, 10.0),
            ],
            vec![
                create_truck("a", 100.0, 100.0, 100.0, 1000.0),
                create_truck("b", 100.0, 100.0, 100.0, 1000.0),
            ],
            params(6),
        );

        let assignment = run(&problem);

        assert_eq!(assignment.trips().len(), 2);
        for trip in assignment.trips() {
            assert_eq!(trip.zones().len(), 1);
            assert_eq!(trip.number(), 1);
        }
        assert!(assignment.unassigned().is_empty());
    }

    #[test]
    fn test_closest_zone_gets_largest_truck() {
        let problem = create_problem(
            vec![
                create_order("w", Zone::West, 10.0),
                create_order("c", Zone::Central, 10.0),
            ],
            vec![
                create_truck("small", 100.0, 100.0, 100.0, 1000.0),
                create_truck("large", 200.0, 200.0, 200.0, 1000.0),
            ],
            params(6),
        );

        let assignment = run(&problem);

        let large = problem.truck_by_external_id("large").unwrap();
        let trip = assignment.trips_of(large).next().unwrap();
        assert_eq!(trip.zones(), &[Zone::Central]);
    }

    #[test]
    fn test_no_truck_left() {
        let problem = create_problem(
            vec![
                create_order("n", Zone::North, 10.0),
                create_order("s", Zone::South, 10.0),
            ],
            vec![create_truck("a", 100.0, 100.0, 100.0, 1000.0)],
            params(6),
        );

        let assignment = run(&problem);

        assert_eq!(assignment.trips().len(), 1);
        assert_eq!(
            assignment.unassigned(),
            &[Unassignment {
                order_id: OrderIdx::new(1),
                reason: UnassignedReason::NoTruckCapacity,
            }]
        );
    }

    #[test]
    fn test_helper_budget() {
        let problem = create_problem(
            vec![
                create_order_with("a", Zone::North, 30.0, HelperRequirement::Two),
                create_order_with("b", Zone::North, 20.0, HelperRequirement::Two),
                create_order_with("c", Zone::North, 10.0, HelperRequirement::One),
            ],
            vec![create_truck("t", 100.0, 100.0, 100.0, 1000.0)],
            params(3),
        );

        let assignment = run(&problem);

        assert_eq!(
            assignment.unassigned(),
            &[Unassignment {
                order_id: OrderIdx::new(1),
                reason: UnassignedReason::InsufficientHelpers,
            }]
        );
        assert_eq!(assignment.assigned_count(), 2);
    }
}
