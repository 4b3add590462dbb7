pub mod config;
pub mod rng;
