pub mod cluster_single_trip;
pub mod demand_multi_trip;
pub mod fleet_assignment;
pub mod fleet_planner;
pub mod trip;
