mod components;
pub mod flow;
pub mod types;
pub mod validation;

pub use components::*;
