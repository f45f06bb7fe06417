pub mod travel_model;
