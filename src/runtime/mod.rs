pub mod config;
pub mod generator;
pub mod logging;
pub mod topology;
