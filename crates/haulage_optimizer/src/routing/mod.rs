pub mod route_sequencer;
pub mod trip_route;
