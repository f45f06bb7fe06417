pub mod load_plan_generator;
