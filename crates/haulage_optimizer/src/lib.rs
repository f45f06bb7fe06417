pub mod error;
pub mod json;
pub mod load_plan;
pub mod optimizer;
pub mod packing;
pub mod params;
pub mod planner;
pub mod problem;
pub mod routing;
pub mod travel;
mod utils;

#[cfg(test)]
pub(crate) mod test_utils;
