pub mod config;
pub mod engine;
pub mod error;
pub mod frame;
pub mod loader;
pub mod math;
pub mod telemetry;
pub mod types;

pub use config::{Config, PortfolioParams};
pub use engine::Portfolio;
pub use error::{PermutationError, PortfolioError};
