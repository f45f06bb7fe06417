use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PlannerError {
    #[error("No trucks available to plan with")]
    NoTrucks,

    #[error("No orders to plan")]
    NoOrders,

    #[error("Truck {truck_id} is invalid: {reason}")]
    InvalidTruck { truck_id: String, reason: String },

    #[error("Order id {0} appears more than once")]
    DuplicateOrder(String),

    #[error("Truck id {0} appears more than once")]
    DuplicateTruck(String),

    #[error("Unknown truck {0}")]
    UnknownTruck(String),
}
