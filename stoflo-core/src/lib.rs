pub mod config;
pub mod driver;
pub mod errors;
pub mod flow;
pub mod model;
#[cfg(feature = "python")]
pub mod python;
pub mod registry;
pub mod state;
pub mod stock;
pub mod time_grid;
