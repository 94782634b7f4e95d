use std::{thread, time::Duration};

use log::{debug, info, trace};
use rand::Rng;

use crate::{
    algo::QTable,
    config::Config,
    env::{Cell, Maze},
    error::Error,
    exploration::EpsilonGreedy,
    grid::{Action, Coord},
    persist::TableSink,
};

/// Lifecycle of the learning loop
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Status {
    #[default]
    Running,
    /// Sustained success was reached; the table is final
    Terminated,
}

/// Terminal transitions seen since the agent was created
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Counters {
    pub hazard_hits: u32,
    pub goal_reaches: u32,
}

impl Counters {
    /// The stop condition: strictly more than three goal reaches per hazard hit
    fn is_competent(&self) -> bool {
        u64::from(self.goal_reaches) > 3 * u64::from(self.hazard_hits)
    }
}

/// What a single step did
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Outcome {
    /// The move would leave the grid; nothing was learned and the agent did not move
    Blocked { action: Action, attempted: Coord },
    /// The agent entered an open cell
    Moved { action: Action, to: Coord, reward: f32 },
    /// The agent entered the goal, and either terminated or was sent back to the start
    Goal {
        action: Action,
        reward: f32,
        terminated: bool,
    },
    /// The agent entered a hazard and was sent back to the start
    Hazard { action: Action, at: Coord, reward: f32 },
}

/// A single learnable transition
struct Exp {
    state: Coord,
    action: Action,
    next_state: Coord,
    reward: f32,
}

/// Read-only view of the learning state handed to renderers
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub size: usize,
    pub position: Coord,
    /// The last attempted action, used to orient the agent
    pub heading: Action,
    pub counters: Counters,
    pub status: Status,
    pub goal: Coord,
    pub hazards: Vec<Coord>,
    /// `best_values[x][y]` is the largest q-value of cell `(x, y)`
    pub best_values: Vec<Vec<f32>>,
}

/// An online Q-learning agent crossing a [`Maze`]
///
/// Owns every piece of mutable learning state: the q-table, the counters, the agent's
/// position and the random source. One call to [`step`](Self::step) is one full
/// transition; nothing is observable half-applied.
///
/// ### Generics
/// - `R` - The random source for exploration, seed it for reproducible runs
pub struct QTableAgent<R: Rng> {
    config: Config,
    maze: Maze,
    table: QTable,
    exploration: EpsilonGreedy,
    rng: R,
    position: Coord,
    heading: Action,
    counters: Counters,
    status: Status,
}

impl<R: Rng> QTableAgent<R> {
    /// Validate `config` and place a fresh agent on the start cell
    pub fn new(config: Config, rng: R) -> Result<Self, Error> {
        config.validate()?;
        let maze = Maze::new(&config);
        let table = QTable::new(maze.grid(), config.alpha, config.gamma);
        let exploration = EpsilonGreedy::new(config.epsilon)?;
        info!(
            "agent ready on a {0}x{0} grid: start {1}, goal {2}, {3} hazards",
            config.size,
            config.start,
            config.goal,
            config.hazards.len()
        );

        Ok(Self {
            position: maze.start(),
            maze,
            table,
            exploration,
            rng,
            heading: Action::default(),
            counters: Counters::default(),
            status: Status::Running,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn q_table(&self) -> &QTable {
        &self.table
    }

    pub fn position(&self) -> Coord {
        self.position
    }

    pub fn heading(&self) -> Action {
        self.heading
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    pub fn status(&self) -> Status {
        self.status
    }

    fn act(&mut self) -> Action {
        self.exploration
            .select_action(&self.table, self.position, &mut self.rng)
    }

    fn learn(&mut self, experience: Exp) {
        let Exp {
            state,
            action,
            next_state,
            reward,
        } = experience;
        self.table.update(state, action, reward, next_state);
    }

    /// Let the policy pick an action and take one step
    pub fn step(&mut self) -> Result<Outcome, Error> {
        if self.status == Status::Terminated {
            return Err(Error::Terminated);
        }
        let action = self.act();
        self.step_with(action)
    }

    /// Take one step with a caller-chosen action
    ///
    /// Off-grid moves are discarded without touching the table, the position or the
    /// counters. Entering the goal or a hazard ends the episode and sends the agent back
    /// to the start, unless the goal reach satisfies the stop condition, in which case the
    /// agent terminates where it stands.
    ///
    /// **Errors** with [`Error::Terminated`] once the agent has terminated
    pub fn step_with(&mut self, action: Action) -> Result<Outcome, Error> {
        if self.status == Status::Terminated {
            return Err(Error::Terminated);
        }

        let state = self.position;
        let next_state = state.step(action);
        self.heading = action;

        if !self.maze.grid().is_in_bounds(next_state) {
            debug!("{action:?} from {state} leaves the grid, step discarded");
            return Ok(Outcome::Blocked {
                action,
                attempted: next_state,
            });
        }

        let reward = self.maze.reward(next_state);
        self.learn(Exp {
            state,
            action,
            next_state,
            reward,
        });
        self.position = next_state;
        trace!("{state} --{action:?}--> {next_state}, reward {reward:.3}");

        let outcome = match self.maze.classify(next_state) {
            Cell::Goal => {
                self.counters.goal_reaches += 1;
                let terminated = self.counters.is_competent();
                if terminated {
                    self.status = Status::Terminated;
                    info!(
                        "goal reached {} times against {} hazard hits, learning complete",
                        self.counters.goal_reaches, self.counters.hazard_hits
                    );
                } else {
                    self.position = self.maze.start();
                    info!("goal reached ({} total)", self.counters.goal_reaches);
                }
                Outcome::Goal {
                    action,
                    reward,
                    terminated,
                }
            }
            Cell::Hazard => {
                self.counters.hazard_hits += 1;
                self.position = self.maze.start();
                info!(
                    "hazard hit at {next_state} ({} total)",
                    self.counters.hazard_hits
                );
                Outcome::Hazard {
                    action,
                    at: next_state,
                    reward,
                }
            }
            Cell::Open => Outcome::Moved {
                action,
                to: next_state,
                reward,
            },
        };

        Ok(outcome)
    }

    /// Step until the agent terminates or `max_steps` steps have been taken
    pub fn run(&mut self, max_steps: u64) -> Result<Status, Error> {
        let mut steps = 0;
        while self.status == Status::Running && steps < max_steps {
            self.step()?;
            steps += 1;
        }
        debug!("run stopped after {steps} steps, status {:?}", self.status);
        Ok(self.status)
    }

    pub fn snapshot(&self) -> Snapshot {
        let n = self.maze.grid().size() as i32;
        Snapshot {
            size: self.maze.grid().size(),
            position: self.position,
            heading: self.heading,
            counters: self.counters,
            status: self.status,
            goal: self.maze.goal(),
            hazards: self.maze.hazards().collect(),
            best_values: (0..n)
                .map(|x| {
                    (0..n)
                        .map(|y| self.table.best_value(Coord::new(x, y)))
                        .collect()
                })
                .collect(),
        }
    }

    /// Hand the final table to `sink` after pausing for `linger`
    ///
    /// Consumes the agent, so the table can no longer change.
    ///
    /// **Errors** with [`Error::NotTerminated`] if the agent is still running, or with
    /// whatever the sink fails with
    pub fn finish<S: TableSink>(self, sink: &mut S, linger: Duration) -> Result<QTable, Error> {
        if self.status != Status::Terminated {
            return Err(Error::NotTerminated);
        }
        if !linger.is_zero() {
            thread::sleep(linger);
        }
        sink.write(&self.table)?;
        info!("q-table persisted");
        Ok(self.table)
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    const RIGHT3_DOWN4: [Action; 7] = [
        Action::Right,
        Action::Right,
        Action::Right,
        Action::Down,
        Action::Down,
        Action::Down,
        Action::Down,
    ];

    fn scenario_config() -> Config {
        Config {
            hazards: vec![Coord::new(2, 2)],
            ..Default::default()
        }
    }

    fn agent() -> QTableAgent<StdRng> {
        QTableAgent::new(scenario_config(), StdRng::seed_from_u64(0)).unwrap()
    }

    fn force(agent: &mut QTableAgent<StdRng>, actions: &[Action]) -> Vec<Outcome> {
        actions
            .iter()
            .map(|&a| agent.step_with(a).unwrap())
            .collect()
    }

    fn hit_hazard(agent: &mut QTableAgent<StdRng>) {
        let outcomes = force(agent, &[Action::Left, Action::Left, Action::Up]);
        assert!(
            matches!(outcomes[2], Outcome::Hazard { at, .. } if at == Coord::new(2, 2)),
            "Third step enters the hazard"
        );
    }

    #[derive(Default)]
    struct Recorder {
        writes: usize,
        values: Vec<f32>,
    }

    impl TableSink for Recorder {
        fn write(&mut self, table: &QTable) -> Result<(), Error> {
            self.writes += 1;
            self.values = table.as_slice().to_vec();
            Ok(())
        }
    }

    #[test]
    fn rejects_invalid_config() {
        let config = Config {
            size: 0,
            ..Default::default()
        };
        assert!(matches!(
            QTableAgent::new(config, StdRng::seed_from_u64(0)),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn starts_running_at_start() {
        let agent = agent();
        assert_eq!(agent.status(), Status::Running);
        assert_eq!(agent.position(), Coord::new(4, 3));
        assert_eq!(agent.counters(), Counters::default(), "Counters start at zero");
    }

    #[test]
    fn scenario_reaches_goal() {
        let mut agent = agent();
        let outcomes = force(&mut agent, &RIGHT3_DOWN4);

        assert!(
            matches!(outcomes[2], Outcome::Moved { to, .. } if to == Coord::new(7, 3)),
            "Three rights reach the east edge"
        );
        assert!(
            matches!(outcomes[6], Outcome::Goal { reward, .. } if reward == 5000.0),
            "Last step enters the goal"
        );
        assert_eq!(agent.counters().goal_reaches, 1, "One goal reach");
        assert!(
            agent.q_table().get(Coord::new(4, 3), Action::Right) > 0.0,
            "Q((4,3), Right) increased"
        );

        // No hazard hits yet, so the first goal already satisfies 1 > 3 * 0
        assert!(matches!(outcomes[6], Outcome::Goal { terminated: true, .. }));
        assert_eq!(agent.status(), Status::Terminated);
        assert_eq!(agent.position(), Coord::new(7, 7), "Terminated in place");
    }

    #[test]
    fn first_update_matches_rule() {
        let mut agent = agent();
        agent.step_with(Action::Right).unwrap();

        let reward = agent.maze().reward(Coord::new(5, 3));
        let expected = 0.1 * (reward + 0.9 * 0.0);
        let actual = agent.q_table().get(Coord::new(4, 3), Action::Right);
        assert!((actual - expected).abs() < 1e-4, "{actual} != {expected}");
    }

    #[test]
    fn blocked_moves_change_nothing() {
        let mut agent = agent();
        force(&mut agent, &[Action::Up, Action::Up, Action::Up]);
        assert_eq!(agent.position(), Coord::new(4, 0), "At the north edge");

        let table = agent.q_table().clone();
        let counters = agent.counters();
        let outcome = agent.step_with(Action::Up).unwrap();

        assert_eq!(
            outcome,
            Outcome::Blocked {
                action: Action::Up,
                attempted: Coord::new(4, -1)
            }
        );
        assert_eq!(agent.q_table(), &table, "Table untouched");
        assert_eq!(agent.position(), Coord::new(4, 0), "Agent did not move");
        assert_eq!(agent.counters(), counters, "Counters untouched");
        assert_eq!(agent.heading(), Action::Up, "Heading follows the attempt");
    }

    #[test]
    fn hazard_resets_to_start() {
        let mut agent = agent();
        hit_hazard(&mut agent);
        assert_eq!(agent.counters().hazard_hits, 1, "Exactly one hazard hit");
        assert_eq!(agent.counters().goal_reaches, 0);
        assert_eq!(agent.position(), Coord::new(4, 3), "Back at start");
        assert_eq!(agent.status(), Status::Running);
        assert!(
            agent.q_table().get(Coord::new(2, 3), Action::Up) < 0.0,
            "Entering the hazard is penalised"
        );
    }

    #[test]
    fn terminates_strictly_after_three_to_one() {
        let mut agent = agent();
        hit_hazard(&mut agent);

        for reach in 1..=3 {
            let outcomes = force(&mut agent, &RIGHT3_DOWN4);
            assert!(
                matches!(outcomes[6], Outcome::Goal { terminated: false, .. }),
                "Goal {reach} of 3 does not terminate"
            );
            assert_eq!(agent.counters().goal_reaches, reach);
            assert_eq!(agent.position(), Coord::new(4, 3), "Goal resets to start");
        }

        let outcomes = force(&mut agent, &RIGHT3_DOWN4);
        assert!(
            matches!(outcomes[6], Outcome::Goal { terminated: true, .. }),
            "Fourth goal terminates"
        );
        assert_eq!(agent.status(), Status::Terminated);
    }

    #[test]
    fn terminated_agent_takes_no_steps() {
        let mut agent = agent();
        force(&mut agent, &RIGHT3_DOWN4);
        let table = agent.q_table().clone();

        assert!(matches!(agent.step(), Err(Error::Terminated)));
        assert!(matches!(
            agent.step_with(Action::Left),
            Err(Error::Terminated)
        ));
        assert_eq!(agent.q_table(), &table, "Table is frozen");
        assert_eq!(agent.position(), Coord::new(7, 7));
    }

    #[test]
    fn finish_requires_termination() {
        let agent = agent();
        let mut sink = Recorder::default();
        assert!(matches!(
            agent.finish(&mut sink, Duration::ZERO),
            Err(Error::NotTerminated)
        ));
        assert_eq!(sink.writes, 0, "Nothing persisted while running");
    }

    #[test]
    fn finish_persists_once() {
        let mut agent = agent();
        force(&mut agent, &RIGHT3_DOWN4);
        let mut sink = Recorder::default();
        let table = agent.finish(&mut sink, Duration::ZERO).unwrap();

        assert_eq!(sink.writes, 1, "Written exactly once");
        assert_eq!(sink.values, table.as_slice(), "Sink saw the final table");
    }

    #[test]
    fn run_stops_at_budget_or_termination() {
        let config = Config::default();
        let mut agent = QTableAgent::new(config, StdRng::seed_from_u64(3)).unwrap();
        let status = agent.run(5_000).unwrap();

        let counters = agent.counters();
        match status {
            Status::Terminated => assert!(
                counters.goal_reaches > 3 * counters.hazard_hits,
                "Terminated only on the stop condition"
            ),
            Status::Running => assert!(
                counters.goal_reaches <= 3 * counters.hazard_hits,
                "Still running means the stop condition never held"
            ),
        }
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let trace = |seed| {
            let rng = StdRng::seed_from_u64(seed);
            let mut agent = QTableAgent::new(Config::default(), rng).unwrap();
            agent.run(500).unwrap();
            (agent.counters(), agent.position(), agent.q_table().clone())
        };
        assert_eq!(trace(11), trace(11), "Same seed, same learning");
    }

    #[test]
    fn snapshot_mirrors_state() {
        let mut agent = agent();
        agent.step_with(Action::Right).unwrap();
        let snapshot = agent.snapshot();

        assert_eq!(snapshot.size, 8);
        assert_eq!(snapshot.position, Coord::new(5, 3));
        assert_eq!(snapshot.heading, Action::Right);
        assert_eq!(snapshot.hazards, vec![Coord::new(2, 2)]);
        assert_eq!(
            snapshot.best_values[4][3],
            agent.q_table().best_value(Coord::new(4, 3)),
            "Indexed by [x][y]"
        );
        assert_eq!(snapshot.best_values[0][0], 0.0);
    }
}
