use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::{
    ensure_interval,
    error::{ConfigError, Error},
    grid::{Coord, Grid},
};

/// Reward constants for the [`Maze`](crate::env::Maze)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rewards {
    /// Reward for entering the goal
    ///
    /// **Default**: `5000.0`
    pub goal: f32,
    /// Reward for entering a hazard
    ///
    /// **Default**: `-400.0`
    pub hazard: f32,
    /// Shaping baseline for open cells, the reward is `baseline - distance_to_goal`
    ///
    /// Must be at least the largest distance from any cell to the goal.
    ///
    /// **Default**: `700.0`
    pub baseline: f32,
}

impl Default for Rewards {
    fn default() -> Self {
        Self {
            goal: 5000.0,
            hazard: -400.0,
            baseline: 700.0,
        }
    }
}

/// Configuration for the [`QTableAgent`](crate::agent::QTableAgent)
///
/// Supplied once at startup. The agent validates it on construction and never
/// mutates it afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Side length of the square grid
    pub size: usize,
    pub start: Coord,
    pub goal: Coord,
    pub hazards: Vec<Coord>,
    /// Learning rate, in `(0, 1]`
    pub alpha: f32,
    /// Discount factor, in `(0, 1]`
    pub gamma: f32,
    /// Exploration rate, in `[0, 1]`
    pub epsilon: f32,
    pub rewards: Rewards,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size: 8,
            start: Coord::new(4, 3),
            goal: Coord::new(7, 7),
            hazards: [(2, 2), (3, 5), (6, 4), (5, 1), (1, 0), (7, 0), (0, 6)]
                .into_iter()
                .map(Coord::from)
                .collect(),
            alpha: 0.1,
            gamma: 0.9,
            epsilon: 0.3,
            rewards: Rewards::default(),
        }
    }
}

impl Config {
    /// Read a configuration from JSON and validate it
    ///
    /// Missing fields fall back to their [`Default`] values.
    pub fn from_json(reader: impl Read) -> Result<Self, Error> {
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.size)
    }

    /// Check every startup invariant, failing on the first violation
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size == 0 {
            return Err(ConfigError::EmptyGrid);
        }

        let grid = self.grid();
        let in_bounds = |what: &'static str, coord: Coord| {
            if grid.is_in_bounds(coord) {
                Ok(())
            } else {
                Err(ConfigError::OutOfBounds {
                    what,
                    coord,
                    size: self.size,
                })
            }
        };

        in_bounds("start", self.start)?;
        in_bounds("goal", self.goal)?;
        for &hazard in &self.hazards {
            in_bounds("hazard", hazard)?;
        }

        if self.hazards.contains(&self.goal) {
            return Err(ConfigError::GoalIsHazard(self.goal));
        }
        if self.start == self.goal || self.hazards.contains(&self.start) {
            return Err(ConfigError::StartIsTerminal(self.start));
        }

        let &Config {
            alpha,
            gamma,
            epsilon,
            ..
        } = self;
        ensure_interval!(alpha, 0.0 <..= 1.0);
        ensure_interval!(gamma, 0.0 <..= 1.0);
        ensure_interval!(epsilon, 0.0 ..= 1.0);

        let distance = grid
            .cells()
            .map(|c| c.distance(self.goal))
            .fold(0.0, f32::max);
        let baseline = self.rewards.baseline;
        if !(baseline >= distance) {
            return Err(ConfigError::Baseline { baseline, distance });
        }

        Ok(())
    }
}
