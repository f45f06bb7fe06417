use serde::Serialize;
use smallvec::SmallVec;

use crate::{
    packing::packer::EPSILON,
    problem::{
        order::{Order, OrderIdx},
        truck::{Truck, TruckIdx},
        zone::Zone,
    },
    utils::percentage::percentage,
};

/// One loading cycle of a truck. A truck may run several trips, each starting
/// empty at the depot.
#[derive(Serialize, Debug, Clone)]
pub struct Trip {
    truck_id: TruckIdx,
    /// 1-based, contiguous per truck.
    number: usize,

    max_volume: f64,
    max_weight: f64,
    truck_extents: [f64; 3],

    current_volume: f64,
    current_weight: f64,
    orders: Vec<OrderIdx>,
    zones: SmallVec<[Zone; 4]>,
}

impl Trip {
    pub fn new(truck_id: TruckIdx, truck: &Truck, number: usize) -> Self {
        Self {
            truck_id,
            number,
            max_volume: truck.volume(),
            max_weight: truck.max_weight(),
            truck_extents: truck.dimensions().sorted_desc(),
            current_volume: 0.0,
            current_weight: 0.0,
            orders: Vec::new(),
            zones: SmallVec::new(),
        }
    }

    pub fn truck_id(&self) -> TruckIdx {
        self.truck_id
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub(crate) fn set_number(&mut self, number: usize) {
        self.number = number;
    }

    pub fn orders(&self) -> &[OrderIdx] {
        &self.orders
    }

    /// Zones touched by the trip, in the order they were first loaded.
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn current_volume(&self) -> f64 {
        self.current_volume
    }

    pub fn current_weight(&self) -> f64 {
        self.current_weight
    }

    pub fn max_volume(&self) -> f64 {
        self.max_volume
    }

    pub fn max_weight(&self) -> f64 {
        self.max_weight
    }

    pub fn remaining_volume(&self) -> f64 {
        self.max_volume - self.current_volume
    }

    pub fn remaining_weight(&self) -> f64 {
        self.max_weight - self.current_weight
    }

    pub fn volume_utilization(&self) -> f64 {
        percentage(self.current_volume, self.max_volume)
    }

    pub fn weight_utilization(&self) -> f64 {
        percentage(self.current_weight, self.max_weight)
    }

    /// Volume, weight and bounding box check. Items already on board are not
    /// repacked, so this can accept orders that a real packing would reject.
    pub fn can_fit(&self, order: &Order) -> bool {
        if order.total_volume() > self.remaining_volume() + EPSILON
            || order.total_weight() > self.remaining_weight() + EPSILON
        {
            return false;
        }

        order
            .max_dimensions()
            .sorted_desc()
            .iter()
            .zip(self.truck_extents.iter())
            .all(|(order_extent, truck_extent)| *order_extent <= *truck_extent + EPSILON)
    }

    /// Loads `order` if it fits, returns whether it was loaded.
    pub fn try_load(&mut self, order_id: OrderIdx, order: &Order) -> bool {
        if !self.can_fit(order) {
            return false;
        }

        self.current_volume += order.total_volume();
        self.current_weight += order.total_weight();
        self.orders.push(order_id);

        if !self.zones.contains(&order.zone()) {
            self.zones.push(order.zone());
        }

        true
    }
}
