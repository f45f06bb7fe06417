use tracing::{Level, instrument};

use crate::{
    params::PlanningStrategy,
    planner::{cluster_single_trip, demand_multi_trip, fleet_assignment::FleetAssignment},
    problem::{order::OrderIdx, planning_problem::PlanningProblem, zone::Zone},
    travel::travel_model::TravelModel,
};

/// Assigns orders to truck trips with the strategy configured in the
/// problem's params.
pub struct FleetPlanner<'a> {
    problem: &'a PlanningProblem,
    travel_model: &'a TravelModel,
}

impl<'a> FleetPlanner<'a> {
    pub fn new(problem: &'a PlanningProblem, travel_model: &'a TravelModel) -> Self {
        Self {
            problem,
            travel_model,
        }
    }

    #[instrument(skip_all, level = Level::DEBUG)]
    pub fn plan(&self) -> FleetAssignment {
        match self.problem.params().strategy {
            PlanningStrategy::ClusterSingleTrip => {
                cluster_single_trip::plan(self.problem, self.travel_model)
            }
            PlanningStrategy::DemandMultiTrip => demand_multi_trip::plan(self.problem),
        }
    }
}

/// Orders bucketed by zone, in [`Zone::ALL`] order. Zones without orders are
/// left out, orders keep their input order.
pub(crate) fn group_by_zone(problem: &PlanningProblem) -> Vec<(Zone, Vec<OrderIdx>)> {
    let mut buckets: [Vec<OrderIdx>; Zone::COUNT] = Default::default();

    for order_id in OrderIdx::range(problem.orders().len()) {
        buckets[problem.order(order_id).zone().index()].push(order_id);
    }

    Zone::ALL
        .into_iter()
        .zip(buckets)
        .filter(|(_, orders)| !orders.is_empty())
        .collect()
}
