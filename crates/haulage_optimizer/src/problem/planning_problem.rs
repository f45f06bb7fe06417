use fxhash::{FxHashMap, FxHashSet};

use crate::{
    error::PlannerError,
    params::PlannerParams,
    problem::{
        order::{Order, OrderIdx},
        truck::{Truck, TruckIdx},
    },
};

/// A validated snapshot of orders and trucks for one optimization run.
pub struct PlanningProblem {
    id: Option<String>,
    orders: Vec<Order>,
    trucks: Vec<Truck>,
    params: PlannerParams,
    truck_index: FxHashMap<String, TruckIdx>,
}

impl PlanningProblem {
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn order(&self, order_id: OrderIdx) -> &Order {
        &self.orders[order_id]
    }

    pub fn trucks(&self) -> &[Truck] {
        &self.trucks
    }

    pub fn truck(&self, truck_id: TruckIdx) -> &Truck {
        &self.trucks[truck_id]
    }

    pub fn truck_by_external_id(&self, external_id: &str) -> Option<TruckIdx> {
        self.truck_index.get(external_id).copied()
    }

    pub fn params(&self) -> &PlannerParams {
        &self.params
    }

    /// Adjusts run settings after the problem was built. Zones already derived
    /// from postal codes are kept.
    pub fn with_params(mut self, update: impl FnOnce(&mut PlannerParams)) -> Self {
        update(&mut self.params);
        self
    }

    /// Truck indices by descending capacity, ties broken by id.
    pub fn trucks_by_capacity(&self) -> Vec<TruckIdx> {
        let mut trucks: Vec<TruckIdx> = TruckIdx::range(self.trucks.len()).collect();
        trucks.sort_by(|&a, &b| self.trucks[a].cmp_capacity_desc(&self.trucks[b]));
        trucks
    }
}

#[derive(Default)]
pub struct PlanningProblemBuilder {
    id: Option<String>,
    orders: Option<Vec<Order>>,
    trucks: Option<Vec<Truck>>,
    params: Option<PlannerParams>,
}

impl PlanningProblemBuilder {
    pub fn set_id(&mut self, id: String) -> &mut PlanningProblemBuilder {
        self.id = Some(id);
        self
    }

    pub fn set_orders(&mut self, orders: Vec<Order>) -> &mut PlanningProblemBuilder {
        self.orders = Some(orders);
        self
    }

    pub fn add_order(&mut self, order: Order) -> &mut PlanningProblemBuilder {
        self.orders.get_or_insert_with(Vec::new).push(order);
        self
    }

    pub fn set_trucks(&mut self, trucks: Vec<Truck>) -> &mut PlanningProblemBuilder {
        self.trucks = Some(trucks);
        self
    }

    pub fn add_truck(&mut self, truck: Truck) -> &mut PlanningProblemBuilder {
        self.trucks.get_or_insert_with(Vec::new).push(truck);
        self
    }

    pub fn set_params(&mut self, params: PlannerParams) -> &mut PlanningProblemBuilder {
        self.params = Some(params);
        self
    }

    /// Validates the input and fails fast on anything that makes planning
    /// meaningless.
    pub fn build(self) -> Result<PlanningProblem, PlannerError> {
        let orders = self.orders.unwrap_or_default();
        let trucks = self.trucks.unwrap_or_default();

        if trucks.is_empty() {
            return Err(PlannerError::NoTrucks);
        }

        if orders.is_empty() {
            return Err(PlannerError::NoOrders);
        }

        let mut truck_index = FxHashMap::default();
        for (index, truck) in trucks.iter().enumerate() {
            truck
                .validate()
                .map_err(|reason| PlannerError::InvalidTruck {
                    truck_id: truck.id().to_owned(),
                    reason,
                })?;

            if truck_index
                .insert(truck.id().to_owned(), TruckIdx::new(index))
                .is_some()
            {
                return Err(PlannerError::DuplicateTruck(truck.id().to_owned()));
            }
        }

        let mut order_ids = FxHashSet::default();
        for order in &orders {
            if !order_ids.insert(order.id()) {
                return Err(PlannerError::DuplicateOrder(order.id().to_owned()));
            }
        }

        Ok(PlanningProblem {
            id: self.id,
            orders,
            trucks,
            params: self.params.unwrap_or_default(),
            truck_index,
        })
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
    fn test_no_trucks() {
        let mut builder = PlanningProblemBuilder::default();
        builder.add_order(create_order("o", Zone::North, 1.0));

        assert_eq!(builder.build().err(), Some(PlannerError::NoTrucks));
    }

    #[test]
    fn test_no_orders() {
        let mut builder = PlanningProblemBuilder::default();
        builder.add_truck(create_truck("t", 100.0, 100.0, 100.0, 100.0));

        assert_eq!(builder.build().err(), Some(PlannerError::NoOrders));
    }

    #[test]
    fn test_invalid_truck() {
        let mut builder = PlanningProblemBuilder::default();
        builder
            .add_order(create_order("o", Zone::North, 1.0))
            .add_truck(create_truck("t", 100.0, 0.0, 100.0, 100.0));

        assert!(matches!(
            builder.build(),
            Err(PlannerError::InvalidTruck { truck_id, .. }) if truck_id == "t"
        ));
    }

    #[test]
    fn test_duplicate_ids() {
        let mut builder = PlanningProblemBuilder::default();
        builder
            .add_order(create_order("o", Zone::North, 1.0))
            .add_order(create_order("o", Zone::South, 1.0))
            .add_truck(create_truck("t", 100.0, 100.0, 100.0, 100.0));

        assert_eq!(
            builder.build().err(),
            Some(PlannerError::DuplicateOrder("o".to_owned()))
        );

        let mut builder = PlanningProblemBuilder::default();
        builder
            .add_order(create_order("o", Zone::North, 1.0))
            .add_truck(create_truck("t", 100.0, 100.0, 100.0, 100.0))
            .add_truck(create_truck("t", 200.0, 100.0, 100.0, 100.0));

        assert_eq!(
            builder.build().err(),
            Some(PlannerError::DuplicateTruck("t".to_owned()))
        );
    }

    #[test]
    fn test_trucks_by_capacity() {
        let mut builder = PlanningProblemBuilder::default();
        builder
            .add_order(create_order("o", Zone::North, 1.0))
            .add_truck(create_truck("small", 100.0, 100.0, 100.0, 100.0))
            .add_truck(create_truck("large", 200.0, 200.0, 200.0, 100.0));
        let problem = builder.build().unwrap();

        let ids: Vec<&str> = problem
            .trucks_by_capacity()
            .into_iter()
            .map(|truck| problem.truck(truck).id())
            .collect();

        assert_eq!(ids, vec!["large", "small"]);
        assert_eq!(
            problem.truck_by_external_id("small"),
            Some(TruckIdx::new(0))
        );
    }

    #[test]
    fn test_with_params() {
        let mut builder = PlanningProblemBuilder::default();
        builder
            .add_order(create_order("o", Zone::North, 1.0))
            .add_truck(create_truck("t", 100.0, 100.0, 100.0, 100.0));

        let problem = builder
            .build()
            .unwrap()
            .with_params(|params| params.available_helpers = 1);

        assert_eq!(problem.params().available_helpers, 1);
    }
}
