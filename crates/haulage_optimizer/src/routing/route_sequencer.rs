use jiff::SignedDuration;
use tracing::{Level, instrument};

use crate::{
    planner::trip::Trip,
    problem::{order::OrderIdx, planning_problem::PlanningProblem, truck::TruckIdx, zone::Zone},
    routing::trip_route::{RouteStop, TripRoute},
    travel::travel_model::TravelModel,
};

/// Orders the stops of a trip zone by zone, nearest zone to the depot first,
/// and times the resulting route.
pub struct RouteSequencer<'a> {
    problem: &'a PlanningProblem,
    travel_model: &'a TravelModel,
}

impl<'a> RouteSequencer<'a> {
    pub fn new(problem: &'a PlanningProblem, travel_model: &'a TravelModel) -> Self {
        Self {
            problem,
            travel_model,
        }
    }

    #[instrument(skip_all, level = Level::DEBUG, fields(truck = %trip.truck_id(), trip = trip.number()))]
    pub fn sequence(&self, trip: &Trip) -> TripRoute {
        self.sequence_orders(trip.orders())
    }

    pub fn sequence_orders(&self, orders: &[OrderIdx]) -> TripRoute {
        if orders.is_empty() {
            return TripRoute::default();
        }

        let mut zones: Vec<Zone> = Vec::new();
        for &order_id in orders {
            let zone = self.problem.order(order_id).zone();
            if !zones.contains(&zone) {
                zones.push(zone);
            }
        }
        zones.sort_by_key(|&zone| (self.travel_model.depot_duration(zone), zone));

        let mut stops = Vec::with_capacity(orders.len());
        let mut elapsed = SignedDuration::ZERO;
        let mut previous_zone: Option<Zone> = None;

        for &zone in &zones {
            elapsed += match previous_zone {
                Some(previous) => self.travel_model.zone_duration(previous, zone),
                None => self.travel_model.depot_duration(zone),
            };
            previous_zone = Some(zone);

            let mut zone_orders: Vec<OrderIdx> = orders
                .iter()
                .copied()
                .filter(|&order_id| self.problem.order(order_id).zone() == zone)
                .collect();
            zone_orders.sort_by(|&a, &b| {
                let (a, b) = (self.problem.order(a), self.problem.order(b));
                a.zipcode()
                    .cmp(b.zipcode())
                    .then_with(|| a.id().cmp(b.id()))
            });

            for order_id in zone_orders {
                let order = self.problem.order(order_id);
                let service_duration = self.travel_model.service_duration(order);

                stops.push(RouteStop {
                    sequence: stops.len() + 1,
                    order: order_id,
                    order_id: order.id().to_owned(),
                    zone,
                    zipcode: order.zipcode().to_owned(),
                    coordinates: order.coordinates(),
                    weight: order.total_weight(),
                    volume: order.total_volume(),
                    service_duration,
                    arrival_offset: elapsed,
                });

                elapsed += service_duration;
            }
        }

        let duration_with_return = match previous_zone {
            Some(last) => elapsed + self.travel_model.depot_duration(last),
            None => elapsed,
        };

        TripRoute {
            zones,
            stops,
            duration: elapsed,
            duration_with_return,
        }
    }

    /// Trips run back to back with a reload at the depot between two trips.
    pub fn truck_duration(&self, routes: &[TripRoute]) -> SignedDuration {
        let driving = routes
            .iter()
            .fold(SignedDuration::ZERO, |total, route| {
                total + route.duration_with_return
            });

        let reloads = routes.len().saturating_sub(1) as i32;
        driving + self.travel_model.reload_duration() * reloads
    }
}

/// The truck finishing last when all trucks leave at the same time. Ties keep
/// the first truck.
pub fn fleet_duration(
    truck_durations: &[(TruckIdx, SignedDuration)],
) -> Option<(TruckIdx, SignedDuration)> {
    truck_durations
        .iter()
        .copied()
        .reduce(|best, candidate| if candidate.1 > best.1 { candidate } else { best })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        params::PlannerParams,
        problem::order::OrderBuilder,
        test_utils::{create_order, create_problem, create_truck},
    };

    fn order_at(id: &str, zone: Zone, zipcode: &str) -> crate::problem::order::Order {
        let mut builder = OrderBuilder::default();
        builder.set_id(id).set_zone(zone).set_zipcode(zipcode);
        builder.build(&Default::default())
    }

    #[test]
    fn test_empty_trip_takes_no_time() {
        let problem = create_problem(
            vec![create_order("o", Zone::North, 1.0)],
            vec![create_truck("t", 100.0, 100.0, 100.0, 100.0)],
            PlannerParams::default(),
        );
        let model = TravelModel::new(&problem.params().travel);
        let sequencer = RouteSequencer::new(&problem, &model);

        let route = sequencer.sequence_orders(&[]);

        assert!(route.stops.is_empty());
        assert_eq!(route.duration, SignedDuration::ZERO);
        assert_eq!(route.duration_with_return, SignedDuration::ZERO);
    }

    #[test]
    fn test_zone_and_zipcode_order() {
        let problem = create_problem(
            vec![
                order_at("w", Zone::West, "60000"),
                order_at("c2", Zone::Central, "80200"),
                order_at("c1", Zone::Central, "80100"),
                order_at("n", Zone::North, "10000"),
            ],
            vec![create_truck("t", 100.0, 100.0, 100.0, 100.0)],
            PlannerParams::default(),
        );
        let model = TravelModel::new(&problem.params().travel);
        let sequencer = RouteSequencer::new(&problem, &model);

        let orders: Vec<OrderIdx> = OrderIdx::range(4).collect();
        let route = sequencer.sequence_orders(&orders);

        let ids: Vec<&str> = route.stops.iter().map(|stop| stop.order_id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c2", "n", "w"]);
        assert_eq!(route.zones, vec![Zone::Central, Zone::North, Zone::West]);
        assert_eq!(route.stops[3].sequence, 4);

        // 15 + 10 + 10 + 15 + 10 + 20 + 10, back from West in 35.
        assert_eq!(route.stops[3].arrival_offset, SignedDuration::from_mins(80));
        assert_eq!(route.duration, SignedDuration::from_mins(90));
        assert_eq!(route.duration_with_return, SignedDuration::from_mins(125));
    }

    #[test]
    fn test_truck_duration_counts_reloads() {
        let problem = create_problem(
            vec![create_order("o", Zone::North, 1.0)],
            vec![create_truck("t", 100.0, 100.0, 100.0, 100.0)],
            PlannerParams::default(),
        );
        let model = TravelModel::new(&problem.params().travel);
        let sequencer = RouteSequencer::new(&problem, &model);

        let route = sequencer.sequence_orders(&[OrderIdx::new(0)]);
        assert_eq!(route.duration_with_return, SignedDuration::from_mins(60));

        let routes = vec![route.clone(), route.clone(), route];
        assert_eq!(
            sequencer.truck_duration(&routes),
            SignedDuration::from_mins(3 * 60 + 2 * 30)
        );
        assert_eq!(sequencer.truck_duration(&[]), SignedDuration::ZERO);
    }

    #[test]
    fn test_fleet_duration_bottleneck() {
        let durations = vec![
            (TruckIdx::new(0), SignedDuration::from_mins(50)),
            (TruckIdx::new(1), SignedDuration::from_mins(90)),
            (TruckIdx::new(2), SignedDuration::from_mins(90)),
        ];

        assert_eq!(
            fleet_duration(&durations),
            Some((TruckIdx::new(1), SignedDuration::from_mins(90)))
        );
        assert_eq!(fleet_duration(&[]), None);
    }
}
