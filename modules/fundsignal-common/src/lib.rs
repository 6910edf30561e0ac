pub mod config;
pub mod domain;
pub mod types;

pub use config::ProbeConfig;
pub use domain::*;
pub use types::*;
