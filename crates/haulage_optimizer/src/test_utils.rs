use crate::{
    packing::packer::PackingItem,
    params::PlannerParams,
    problem::{
        item::{Dimensions, ItemBuilder},
        order::{HelperRequirement, Order, OrderBuilder},
        planning_problem::{PlanningProblem, PlanningProblemBuilder},
        truck::{Truck, TruckBuilder},
        zone::{Zone, ZoneResolver},
    },
};

/// Order with `quantity` units of the given size, `weight` kg each.
pub fn create_sized_order(
    id: &str,
    zone: Zone,
    (length, width, height): (f64, f64, f64),
    weight: f64,
    quantity: usize,
) -> Order {
    let mut item = ItemBuilder::default();
    item.set_dimensions(length, width, height)
        .set_weight(weight)
        .set_quantity(quantity);

    let mut builder = OrderBuilder::default();
    builder.set_id(id).set_zone(zone).add_item(item.build());
    builder.build(&ZoneResolver::default())
}

/// Single 10 cm cube weighing `weight` kg.
pub fn create_order(id: &str, zone: Zone, weight: f64) -> Order {
    create_sized_order(id, zone, (10.0, 10.0, 10.0), weight, 1)
}

pub fn create_order_with(
    id: &str,
    zone: Zone,
    weight: f64,
    helpers: HelperRequirement,
) -> Order {
    let mut item = ItemBuilder::default();
    item.set_dimensions(10.0, 10.0, 10.0).set_weight(weight);

    let mut builder = OrderBuilder::default();
    builder
        .set_id(id)
        .set_zone(zone)
        .set_helpers(helpers)
        .add_item(item.build());
    builder.build(&ZoneResolver::default())
}

pub fn create_packing_item(
    id: &str,
    length: f64,
    width: f64,
    height: f64,
    weight: f64,
) -> PackingItem {
    PackingItem {
        id: id.to_owned(),
        order_id: id.to_owned(),
        dimensions: Dimensions::new(length, width, height),
        weight,
        stop_sequence: None,
    }
}

pub fn create_truck(id: &str, width: f64, depth: f64, height: f64, max_weight: f64) -> Truck {
    let mut builder = TruckBuilder::default();
    builder
        .set_id(id)
        .set_dimensions(width, depth, height)
        .set_max_weight(max_weight);
    builder.build()
}

pub fn create_problem(
    orders: Vec<Order>,
    trucks: Vec<Truck>,
    params: PlannerParams,
) -> PlanningProblem {
    let mut builder = PlanningProblemBuilder::default();
    builder
        .set_orders(orders)
        .set_trucks(trucks)
        .set_params(params);
    builder.build().unwrap()
}
