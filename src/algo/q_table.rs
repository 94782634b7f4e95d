use strum::{EnumCount, VariantArray};

use crate::grid::{Action, Coord, Grid};

/// A dense Q-table over every `(cell, action)` pair of a square grid
///
/// Values are stored row-major by `(x, y, action)`, the same layout the persistence
/// sinks write out. Every entry starts at `0.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    grid: Grid,
    values: Vec<f32>,
    alpha: f32, // learning rate
    gamma: f32, // discount factor
}

impl QTable {
    /// Create a zeroed table
    ///
    /// ### Parameters
    /// - `alpha` - The learning rate, in `(0, 1]`
    /// - `gamma` - The discount factor, in `(0, 1]`
    pub fn new(grid: Grid, alpha: f32, gamma: f32) -> Self {
        Self {
            grid,
            values: vec![0.0; grid.size() * grid.size() * Action::COUNT],
            alpha,
            gamma,
        }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// The flat `(x, y, action)` view of every value
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn get(&self, coord: Coord, action: Action) -> f32 {
        self.row(coord)[action.index()]
    }

    /// The action with the largest value in `coord`
    ///
    /// Ties go to the action that comes first in [`Action`] order.
    pub fn best_action(&self, coord: Coord) -> Action {
        let row = self.row(coord);
        let mut best = 0;
        for (i, &value) in row.iter().enumerate().skip(1) {
            if value > row[best] {
                best = i;
            }
        }
        Action::VARIANTS[best]
    }

    pub fn best_value(&self, coord: Coord) -> f32 {
        self.row(coord)[self.best_action(coord).index()]
    }

    /// One-step Q-learning update
    ///
    /// `Q(s,a) += α * (r + γ * max Q(s',·) - Q(s,a))`
    ///
    /// `next` must be inside the grid.
    pub fn update(&mut self, coord: Coord, action: Action, reward: f32, next: Coord) {
        debug_assert!(self.grid.is_in_bounds(next), "next state {next} is off the grid");
        let max_next_q = self.best_value(next);
        let i = self.offset(coord) + action.index();
        let q_value = self.values[i];
        self.values[i] = q_value + self.alpha * (reward + self.gamma * max_next_q - q_value);
    }

    fn row(&self, coord: Coord) -> &[f32] {
        let i = self.offset(coord);
        &self.values[i..i + Action::COUNT]
    }

    fn offset(&self, coord: Coord) -> usize {
        (coord.x as usize * self.grid.size() + coord.y as usize) * Action::COUNT
    }
}
