/// The learning loop and its episode state machine
pub mod agent;

/// Value tables
pub mod algo;

/// Startup configuration
pub mod config;

/// The goal, hazards and reward function
pub mod env;

pub mod error;

/// Exploration policies
pub mod exploration;

/// Grid topology: coordinates, actions and bounds
pub mod grid;

/// Persistence sinks for the learned table
pub mod persist;

/// Terminal visualization
#[cfg(feature = "viz")]
pub mod viz;

mod util;

pub use agent::{Counters, Outcome, QTableAgent, Snapshot, Status};
pub use config::{Config, Rewards};
pub use error::{ConfigError, Error};
pub use grid::{Action, Coord, Grid};
