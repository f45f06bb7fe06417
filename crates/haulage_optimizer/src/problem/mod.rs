pub mod item;
pub mod order;
pub mod planning_problem;
pub mod truck;
pub mod zone;
