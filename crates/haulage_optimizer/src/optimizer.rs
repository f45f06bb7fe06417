use jiff::SignedDuration;
use serde::Serialize;
use tracing::{Level, info, instrument};

use crate::{
    error::PlannerError,
    load_plan::load_plan_generator::{LoadPlan, LoadPlanGenerator},
    packing::{
        balance::{CenterOfGravity, center_of_gravity, is_balanced},
        packer::{Container, Packer, PackerKind, PackingItem, PackingResult},
    },
    params::PlanningStrategy,
    planner::fleet_planner::FleetPlanner,
    problem::{
        order::Order,
        planning_problem::PlanningProblem,
        truck::{Truck, TruckIdx},
        zone::Zone,
    },
    routing::{
        route_sequencer::{RouteSequencer, fleet_duration},
        trip_route::RouteStop,
    },
    travel::travel_model::TravelModel,
    utils::percentage::percentage,
};

#[derive(Serialize, Debug, Clone)]
pub struct TripPlan {
    pub number: usize,
    pub order_ids: Vec<String>,
    pub zones: Vec<Zone>,
    pub stops: Vec<RouteStop>,
    pub load_plan: LoadPlan,
    pub weight: f64,
    pub volume: f64,
    pub volume_utilization: f64,
    pub weight_utilization: f64,
    /// Elapsed time including the drive back to the depot.
    pub duration: SignedDuration,
}

#[derive(Serialize, Debug, Clone)]
pub struct TruckPlan {
    pub truck_id: String,
    pub trips: Vec<TripPlan>,
    /// All trips plus reloads in between.
    pub total_duration: SignedDuration,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FleetSummary {
    pub total_orders: usize,
    pub assigned_orders: usize,
    pub unassigned_orders: usize,
    /// Assigned over total orders, in percent.
    pub assignment_rate: f64,
    pub trucks_used: usize,
    pub total_trips: usize,
    pub total_weight: f64,
    pub total_volume: f64,
    /// Time until the last truck is back when all trucks leave together.
    pub fleet_duration: SignedDuration,
    pub bottleneck_truck: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ZoneSummary {
    pub zone: Zone,
    pub order_count: usize,
    pub assigned_count: usize,
    pub weight: f64,
    pub volume: f64,
    pub trucks: Vec<String>,
    pub trip_count: usize,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct UnassignedOrder {
    pub order_id: String,
    pub zone: Zone,
    pub reason: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct OptimizationResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub strategy: PlanningStrategy,
    pub trucks: Vec<TruckPlan>,
    pub summary: FleetSummary,
    pub zones: Vec<ZoneSummary>,
    pub unassigned_orders: Vec<UnassignedOrder>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TruckLoadPreview {
    pub truck_id: String,
    pub packer: PackerKind,
    #[serde(flatten)]
    pub packing: PackingResult,
    pub center_of_gravity: CenterOfGravity,
    pub is_balanced: bool,
}

/// Plans the whole fleet: trips, routes and load plans.
#[instrument(skip_all, level = Level::DEBUG)]
pub fn optimize(problem: &PlanningProblem) -> Result<OptimizationResult, PlannerError> {
    let params = problem.params();
    info!(
        "Optimizing {} orders with {} trucks ({:?})",
        problem.orders().len(),
        problem.trucks().len(),
        params.strategy
    );

    let travel_model = TravelModel::new(&params.travel);
    let assignment = FleetPlanner::new(problem, &travel_model).plan();
    let sequencer = RouteSequencer::new(problem, &travel_model);
    let generator = LoadPlanGenerator::new(params.balance_tolerance);

    let mut trucks = Vec::new();
    let mut truck_durations = Vec::new();

    for truck_id in TruckIdx::range(problem.trucks().len()) {
        let truck = problem.truck(truck_id);
        let mut routes = Vec::new();
        let mut trips = Vec::new();

        for trip in assignment.trips_of(truck_id) {
            let route = sequencer.sequence(trip);
            let orders: Vec<&Order> = route
                .order_indices()
                .map(|order_id| problem.order(order_id))
                .collect();
            let load_plan = generator.generate(truck, &orders, &route);

            trips.push(TripPlan {
                number: trip.number(),
                order_ids: orders.iter().map(|order| order.id().to_owned()).collect(),
                zones: route.zones.clone(),
                stops: route.stops.clone(),
                load_plan,
                weight: trip.current_weight(),
                volume: trip.current_volume(),
                volume_utilization: trip.volume_utilization(),
                weight_utilization: trip.weight_utilization(),
                duration: route.duration_with_return,
            });
            routes.push(route);
        }

        if trips.is_empty() {
            continue;
        }

        let total_duration = sequencer.truck_duration(&routes);
        truck_durations.push((truck_id, total_duration));
        trucks.push(TruckPlan {
            truck_id: truck.id().to_owned(),
            trips,
            total_duration,
        });
    }

    let unassigned_orders: Vec<UnassignedOrder> = assignment
        .unassigned()
        .iter()
        .map(|unassignment| {
            let order = problem.order(unassignment.order_id);
            UnassignedOrder {
                order_id: order.id().to_owned(),
                zone: order.zone(),
                reason: unassignment.reason.to_string(),
            }
        })
        .collect();

    let (fleet_duration, bottleneck_truck) = match fleet_duration(&truck_durations) {
        Some((truck_id, duration)) => (duration, Some(problem.truck(truck_id).id().to_owned())),
        None => (SignedDuration::ZERO, None),
    };

    let total_orders = problem.orders().len();
    let assigned_orders = assignment.assigned_count();
    let summary = FleetSummary {
        total_orders,
        assigned_orders,
        unassigned_orders: unassigned_orders.len(),
        assignment_rate: percentage(assigned_orders as f64, total_orders as f64),
        trucks_used: trucks.len(),
        total_trips: assignment.trips().len(),
        total_weight: assignment.trips().iter().map(|t| t.current_weight()).sum(),
        total_volume: assignment.trips().iter().map(|t| t.current_volume()).sum(),
        fleet_duration,
        bottleneck_truck,
    };

    info!(
        "Assigned {}/{} orders on {} trips, fleet done after {}",
        summary.assigned_orders,
        summary.total_orders,
        summary.total_trips,
        summary.fleet_duration
    );

    Ok(OptimizationResult {
        id: problem.id().map(str::to_owned),
        strategy: params.strategy,
        zones: zone_summaries(problem, &trucks),
        trucks,
        summary,
        unassigned_orders,
    })
}

fn zone_summaries(problem: &PlanningProblem, trucks: &[TruckPlan]) -> Vec<ZoneSummary> {
    Zone::ALL
        .into_iter()
        .filter_map(|zone| {
            let orders: Vec<&Order> = problem
                .orders()
                .iter()
                .filter(|order| order.zone() == zone)
                .collect();

            if orders.is_empty() {
                return None;
            }

            let mut serving = Vec::new();
            let mut trip_count = 0;
            let mut assigned_count = 0;

            for truck in trucks {
                let mut serves = false;
                for trip in truck.trips.iter().filter(|trip| trip.zones.contains(&zone)) {
                    serves = true;
                    trip_count += 1;
                    assigned_count += trip.stops.iter().filter(|stop| stop.zone == zone).count();
                }
                if serves {
                    serving.push(truck.truck_id.clone());
                }
            }

            Some(ZoneSummary {
                zone,
                order_count: orders.len(),
                assigned_count,
                weight: orders.iter().map(|order| order.total_weight()).sum(),
                volume: orders.iter().map(|order| order.total_volume()).sum(),
                trucks: serving,
                trip_count,
            })
        })
        .collect()
}

/// Packs `orders` into a single truck with the given strategy.
#[instrument(skip_all, level = Level::DEBUG, fields(truck = truck.id()))]
pub fn preview_truck_load(
    truck: &Truck,
    orders: &[&Order],
    packer: PackerKind,
    balance_tolerance: f64,
) -> TruckLoadPreview {
    let items: Vec<PackingItem> = orders
        .iter()
        .flat_map(|order| PackingItem::expand_order(order, None))
        .collect();

    let packing = packer.pack(&Container::from_truck(truck), items);
    let center_of_gravity = center_of_gravity(&packing.placed);

    TruckLoadPreview {
        truck_id: truck.id().to_owned(),
        packer,
        is_balanced: is_balanced(
            &center_of_gravity,
            truck.width(),
            truck.depth(),
            balance_tolerance,
        ),
        center_of_gravity,
        packing,
    }
}

/// Previews every order of the problem in the truck with id `truck_id`.
pub fn preview_problem_truck(
    problem: &PlanningProblem,
    truck_id: &str,
    packer: Option<PackerKind>,
) -> Result<TruckLoadPreview, PlannerError> {
    let truck = problem
        .truck_by_external_id(truck_id)
        .map(|truck_id| problem.truck(truck_id))
        .ok_or_else(|| PlannerError::UnknownTruck(truck_id.to_owned()))?;

    let orders: Vec<&Order> = problem.orders().iter().collect();
    let params = problem.params();

    Ok(preview_truck_load(
        truck,
        &orders,
        packer.unwrap_or(params.preview_packer),
        params.balance_tolerance,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        params::PlannerParams,
        test_utils::{create_order, create_problem, create_sized_order, create_truck},
    };

    #[test]
    fn test_summary() {
        let problem = create_problem(
            vec![
                create_order("n1", Zone::North, 40.0),
                create_order("n2", Zone::North, 40.0),
                create_order("s1", Zone::South, 40.0),
                create_order("big", Zone::South, 500.0),
            ],
            vec![create_truck("t", 100.0, 100.0, 100.0, 100.0)],
            PlannerParams::default(),
        );

        let result = optimize(&problem).unwrap();

        assert_eq!(result.summary.total_orders, 4);
        assert_eq!(result.summary.assigned_orders, 3);
        assert_eq!(result.summary.unassigned_orders, 1);
        assert_eq!(result.summary.assignment_rate, 75.0);
        assert_eq!(result.summary.trucks_used, 1);
        assert_eq!(result.summary.total_trips, 2);
        assert_eq!(result.summary.total_weight, 120.0);
        assert_eq!(result.summary.bottleneck_truck.as_deref(), Some("t"));
        assert_eq!(result.unassigned_orders[0].order_id, "big");
        assert_eq!(
            result.unassigned_orders[0].reason,
            "No available truck with capacity"
        );

        let truck = &result.trucks[0];
        let trips_duration = truck
            .trips
            .iter()
            .fold(SignedDuration::ZERO, |total, trip| total + trip.duration);
        assert_eq!(
            truck.total_duration,
            trips_duration + SignedDuration::from_mins(30)
        );
        assert_eq!(result.summary.fleet_duration, truck.total_duration);
    }

    #[test]
    fn test_zone_summaries() {
        let problem = create_problem(
            vec![
                create_order("n1", Zone::North, 10.0),
                create_order("e1", Zone::East, 10.0),
                create_order("n2", Zone::North, 10.0),
            ],
            vec![create_truck("t", 100.0, 100.0, 100.0, 100.0)],
            PlannerParams::default(),
        );

        let result = optimize(&problem).unwrap();

        let north = result.zones.iter().find(|z| z.zone == Zone::North).unwrap();
        assert_eq!(north.order_count, 2);
        assert_eq!(north.assigned_count, 2);
        assert_eq!(north.weight, 20.0);
        assert_eq!(north.trucks, vec!["t".to_owned()]);
        assert_eq!(north.trip_count, 1);
        assert!(result.zones.iter().all(|z| z.zone != Zone::West));
    }

    #[test]
    fn test_preview_unknown_truck() {
        let problem = create_problem(
            vec![create_order("o", Zone::North, 1.0)],
            vec![create_truck("t", 100.0, 100.0, 100.0, 100.0)],
            PlannerParams::default(),
        );

        assert_eq!(
            preview_problem_truck(&problem, "nope", None).err(),
            Some(PlannerError::UnknownTruck("nope".to_owned()))
        );
    }

    #[test]
    fn test_preview_packs_all_units() {
        let problem = create_problem(
            vec![
                create_sized_order("a", Zone::North, (50.0, 50.0, 50.0), 10.0, 4),
                create_sized_order("b", Zone::South, (50.0, 50.0, 50.0), 10.0, 4),
            ],
            vec![create_truck("t", 100.0, 100.0, 100.0, 1000.0)],
            PlannerParams::default(),
        );

        let preview = preview_problem_truck(&problem, "t", None).unwrap();

        assert_eq!(preview.packer, PackerKind::FreeSpace);
        assert_eq!(preview.packing.placed.len(), 8);
        assert_eq!(preview.packing.volume_utilization, 100.0);
        assert_eq!(
            preview.center_of_gravity,
            CenterOfGravity {
                x: 50.0,
                y: 50.0,
                z: 50.0
            }
        );
        assert!(preview.is_balanced);
    }
}
