use tracing::{Level, debug, info, instrument};

use crate::{
    packing::packer::EPSILON,
    planner::{
        fleet_assignment::{FleetAssignment, UnassignedReason, Unassignment},
        fleet_planner::group_by_zone,
        trip::Trip,
    },
    problem::{order::OrderIdx, planning_problem::PlanningProblem, truck::TruckIdx, zone::Zone},
};

struct ZoneDemand {
    zone: Zone,
    orders: Vec<OrderIdx>,
    volume: f64,
    weight: f64,
}

/// Trips of every truck, the last one being the trip currently loading.
struct Fleet {
    trips: Vec<Vec<Trip>>,
}

impl Fleet {
    fn new(problem: &PlanningProblem) -> Self {
        let trips = TruckIdx::range(problem.trucks().len())
            .map(|truck_id| vec![Trip::new(truck_id, problem.truck(truck_id), 1)])
            .collect();

        Self { trips }
    }

    fn current_trip(&self, truck_id: TruckIdx) -> &Trip {
        let trips = &self.trips[truck_id.get()];
        &trips[trips.len() - 1]
    }

    fn current_trip_mut(&mut self, truck_id: TruckIdx) -> &mut Trip {
        let trips = &mut self.trips[truck_id.get()];
        let last = trips.len() - 1;
        &mut trips[last]
    }

    fn open_trip(&mut self, truck_id: TruckIdx, problem: &PlanningProblem) -> &mut Trip {
        let trips = &mut self.trips[truck_id.get()];
        let number = trips.len() + 1;
        debug!("truck {} opens trip {number}", problem.truck(truck_id).id());

        trips.push(Trip::new(truck_id, problem.truck(truck_id), number));
        let last = trips.len() - 1;
        &mut trips[last]
    }

    /// Candidate whose current trip would keep the least free volume after
    /// loading `order_id`. Ties keep the earliest candidate.
    fn best_fit(
        &self,
        candidates: &[TruckIdx],
        order_id: OrderIdx,
        problem: &PlanningProblem,
    ) -> Option<TruckIdx> {
        let order = problem.order(order_id);

        candidates
            .iter()
            .copied()
            .filter(|&truck_id| self.current_trip(truck_id).can_fit(order))
            .min_by(|&a, &b| {
                let residual_a = self.current_trip(a).remaining_volume() - order.total_volume();
                let residual_b = self.current_trip(b).remaining_volume() - order.total_volume();
                residual_a.total_cmp(&residual_b)
            })
    }
}

/// Demand proportional planning with multiple trips per truck.
///
/// 1. Zones are ranked by demand volume and receive trucks, largest first,
///    until their volume and weight demand is covered. Spare trucks join the
///    busiest zone.
/// 2. Orders of each zone are placed, largest first, into the best fitting
///    current trip of the zone's trucks, falling back to any truck.
/// 3. Leftover orders open new trips on the largest truck that can hold them.
#[instrument(skip_all, level = Level::DEBUG)]
pub fn plan(problem: &PlanningProblem) -> FleetAssignment {
    let trucks = problem.trucks_by_capacity();
    let demands = zone_demands(problem);
    let zone_trucks = allocate_trucks(&demands, &trucks, problem);

    let mut fleet = Fleet::new(problem);
    let mut pending = Vec::new();

    for (demand, assigned) in demands.iter().zip(&zone_trucks) {
        let mut orders = demand.orders.clone();
        sort_by_volume_desc(&mut orders, problem);

        for order_id in orders {
            let target = fleet
                .best_fit(assigned, order_id, problem)
                .or_else(|| fleet.best_fit(&trucks, order_id, problem));

            match target {
                Some(truck_id) => {
                    fleet
                        .current_trip_mut(truck_id)
                        .try_load(order_id, problem.order(order_id));
                }
                None => pending.push(order_id),
            }
        }
    }

    let mut unassigned = Vec::new();
    sort_by_volume_desc(&mut pending, problem);

    for order_id in pending {
        if !place_on_new_trip(&mut fleet, &trucks, order_id, problem) {
            unassigned.push(Unassignment {
                order_id,
                reason: UnassignedReason::NoTruckCapacity,
            });
        }
    }

    let assignment = FleetAssignment::new(fleet.trips.into_iter().flatten().collect(), unassigned);

    info!(
        "Demand planning: {} trips, {} unassigned",
        assignment.trips().len(),
        assignment.unassigned().len()
    );

    assignment
}

/// Zones with orders, by descending demand volume, then weight, then zone order.
fn zone_demands(problem: &PlanningProblem) -> Vec<ZoneDemand> {
    let mut demands: Vec<ZoneDemand> = group_by_zone(problem)
        .into_iter()
        .map(|(zone, orders)| {
            let volume = orders
                .iter()
                .map(|&order_id| problem.order(order_id).total_volume())
                .sum();
            let weight = orders
                .iter()
                .map(|&order_id| problem.order(order_id).total_weight())
                .sum();

            ZoneDemand {
                zone,
                orders,
                volume,
                weight,
            }
        })
        .collect();

    demands.sort_by(|a, b| {
        b.volume
            .total_cmp(&a.volume)
            .then_with(|| b.weight.total_cmp(&a.weight))
            .then_with(|| a.zone.cmp(&b.zone))
    });

    demands
}

/// Trucks of each zone, parallel to `demands`.
fn allocate_trucks(
    demands: &[ZoneDemand],
    trucks: &[TruckIdx],
    problem: &PlanningProblem,
) -> Vec<Vec<TruckIdx>> {
    let mut available = trucks.iter().copied();
    let mut zone_trucks: Vec<Vec<TruckIdx>> = Vec::with_capacity(demands.len());

    for demand in demands {
        let mut assigned = Vec::new();
        let mut volume = 0.0;
        let mut weight = 0.0;

        while volume + EPSILON < demand.volume || weight + EPSILON < demand.weight {
            let Some(truck_id) = available.next() else {
                break;
            };

            let truck = problem.truck(truck_id);
            volume += truck.volume();
            weight += truck.max_weight();
            assigned.push(truck_id);
        }

        debug!(
            "zone {} ({} orders, {:.0} cm3, {:.1} kg) gets {} trucks",
            demand.zone,
            demand.orders.len(),
            demand.volume,
            demand.weight,
            assigned.len()
        );
        zone_trucks.push(assigned);
    }

    if let Some(busiest) = zone_trucks.first_mut() {
        busiest.extend(available);
    }

    zone_trucks
}

fn place_on_new_trip(
    fleet: &mut Fleet,
    trucks: &[TruckIdx],
    order_id: OrderIdx,
    problem: &PlanningProblem,
) -> bool {
    let order = problem.order(order_id);

    for &truck_id in trucks {
        if fleet.current_trip_mut(truck_id).try_load(order_id, order) {
            return true;
        }

        let fresh = Trip::new(truck_id, problem.truck(truck_id), 1);
        if fresh.can_fit(order) {
            return fleet.open_trip(truck_id, problem).try_load(order_id, order);
        }
    }

    false
}

fn sort_by_volume_desc(orders: &mut [OrderIdx], problem: &PlanningProblem) {
    orders.sort_by(|&a, &b| {
        let (a, b) = (problem.order(a), problem.order(b));
        b.total_volume()
            .total_cmp(&a.total_volume())
            .then_with(|| a.id().cmp(b.id()))
    });
}
