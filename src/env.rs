use std::collections::HashSet;

use crate::{
    config::{Config, Rewards},
    grid::{Coord, Grid},
};

/// Classification of a single cell
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cell {
    Goal,
    Hazard,
    Open,
}

/// The static environment the agent learns in: one goal and a fixed set of hazards on a
/// square grid
///
/// Immutable once built. Both [`classify`](Maze::classify) and [`reward`](Maze::reward)
/// are pure functions of the configuration.
#[derive(Clone, Debug)]
pub struct Maze {
    grid: Grid,
    start: Coord,
    goal: Coord,
    hazards: HashSet<Coord>,
    rewards: Rewards,
}

impl Maze {
    /// Build the maze from an already validated configuration
    pub fn new(config: &Config) -> Self {
        Self {
            grid: config.grid(),
            start: config.start,
            goal: config.goal,
            hazards: config.hazards.iter().copied().collect(),
            rewards: config.rewards,
        }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn start(&self) -> Coord {
        self.start
    }

    pub fn goal(&self) -> Coord {
        self.goal
    }

    pub fn hazards(&self) -> impl Iterator<Item = Coord> + '_ {
        self.hazards.iter().copied()
    }

    pub fn classify(&self, coord: Coord) -> Cell {
        if coord == self.goal {
            Cell::Goal
        } else if self.hazards.contains(&coord) {
            Cell::Hazard
        } else {
            Cell::Open
        }
    }

    /// Reward for entering `coord`
    ///
    /// Open cells pay `baseline - distance_to_goal`, so moving closer to the goal always
    /// pays more even before the goal itself has ever been reached.
    pub fn reward(&self, coord: Coord) -> f32 {
        match self.classify(coord) {
            Cell::Goal => self.rewards.goal,
            Cell::Hazard => self.rewards.hazard,
            Cell::Open => self.rewards.baseline - coord.distance(self.goal),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn maze() -> Maze {
        Maze::new(&Config {
            hazards: vec![Coord::new(2, 2)],
            ..Default::default()
        })
    }

    #[test]
    fn classify_cells() {
        let maze = maze();
        assert_eq!(maze.classify(Coord::new(7, 7)), Cell::Goal);
        assert_eq!(maze.classify(Coord::new(2, 2)), Cell::Hazard);
        assert_eq!(maze.classify(Coord::new(4, 3)), Cell::Open);
    }

    #[test]
    fn terminal_rewards() {
        let maze = maze();
        assert_eq!(maze.reward(Coord::new(7, 7)), 5000.0, "Goal reward");
        assert_eq!(maze.reward(Coord::new(2, 2)), -400.0, "Hazard reward");
    }

    #[test]
    fn shaping_reward() {
        let maze = maze();
        assert_eq!(
            maze.reward(Coord::new(7, 3)),
            696.0,
            "Open cell pays baseline minus distance"
        );
        assert_eq!(maze.reward(Coord::new(4, 3)), 695.0, "3-4-5 triangle");

        let far = maze.reward(Coord::new(0, 0));
        let near = maze.reward(Coord::new(6, 6));
        assert!(near > far, "Cells closer to the goal pay more");
        assert!(far > 0.0, "Shaping never goes negative on a valid grid");
    }
}
