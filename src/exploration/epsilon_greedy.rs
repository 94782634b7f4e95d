use rand::Rng;
use rand_distr::{Bernoulli, Distribution};
use strum::VariantArray;

use crate::{
    algo::QTable,
    error::ConfigError,
    grid::{Action, Coord},
};

use super::Choice;

/// Epsilon greedy exploration policy with a fixed epsilon
///
/// The random source is supplied by the caller on every draw, so a seeded generator makes
/// the whole policy reproducible.
#[derive(Debug, Clone, Copy)]
pub struct EpsilonGreedy {
    epsilon: f32,
    coin: Bernoulli,
}

impl EpsilonGreedy {
    /// Initialize epsilon greedy policy with exploration rate `epsilon`
    ///
    /// Fails if `epsilon` is not in the interval `[0, 1]`
    pub fn new(epsilon: f32) -> Result<Self, ConfigError> {
        let coin = Bernoulli::new(epsilon as f64).map_err(|_| ConfigError::Interval {
            name: "epsilon",
            value: epsilon,
            interval: "[0.0, 1.0]",
        })?;
        Ok(Self { epsilon, coin })
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// Explore with probability epsilon, otherwise exploit
    pub fn choose<R: Rng>(&self, rng: &mut R) -> Choice {
        if self.coin.sample(rng) {
            Choice::Explore
        } else {
            Choice::Exploit
        }
    }

    /// Pick an action for `coord`: uniformly random when exploring, greedy over `table`
    /// when exploiting
    pub fn select_action<R: Rng>(
        &self,
        table: &QTable,
        coord: Coord,
        rng: &mut R,
    ) -> Action {
        match self.choose(rng) {
            Choice::Explore => Action::VARIANTS[rng.gen_range(0..Action::VARIANTS.len())],
            Choice::Exploit => table.best_action(coord),
        }
    }
}
