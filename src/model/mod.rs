pub mod graph;
pub mod route;
