use thiserror::Error;

use crate::grid::Coord;

/// Reasons a [`Config`](crate::config::Config) is rejected before learning starts
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("grid size must be at least 1")]
    EmptyGrid,

    #[error("{what} {coord} lies outside the {size}x{size} grid")]
    OutOfBounds {
        what: &'static str,
        coord: Coord,
        size: usize,
    },

    #[error("goal {0} is also listed as a hazard")]
    GoalIsHazard(Coord),

    #[error("start {0} is the goal or a hazard")]
    StartIsTerminal(Coord),

    #[error("invalid value for `{name}`: {value} is not in the interval {interval}")]
    Interval {
        name: &'static str,
        value: f32,
        interval: &'static str,
    },

    #[error("shaping baseline {baseline} is below the largest distance to the goal ({distance:.3})")]
    Baseline { baseline: f32, distance: f32 },
}

/// Crate-wide error type
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to read configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write q-table: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write q-table: {0}")]
    Csv(#[from] csv::Error),

    #[error("the agent has terminated and takes no further steps")]
    Terminated,

    #[error("the agent is still running; the q-table is persisted only after termination")]
    NotTerminated,
}
