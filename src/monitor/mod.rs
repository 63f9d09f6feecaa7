mod canvas;
pub mod chart;
mod components;
mod create_monitor_graph;
pub mod series;
pub mod types;

pub use components::ViewGraph;
