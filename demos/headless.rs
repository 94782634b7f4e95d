use std::{error::Error, time::Duration};

use rand::{rngs::StdRng, SeedableRng};
use ratventure::{
    persist::{Csv, Npy, TableSink},
    Config, QTableAgent, Status,
};

const MAX_STEPS: u64 = 10_000_000;
const SEED: u64 = 0x5eed;

fn main() -> Result<(), Box<dyn Error>> {
    let mut agent = QTableAgent::new(Config::default(), StdRng::seed_from_u64(SEED))?;

    let status = agent.run(MAX_STEPS)?;
    let counters = agent.counters();
    println!(
        "{status:?}: {} goal reaches, {} hazard hits",
        counters.goal_reaches, counters.hazard_hits
    );

    if status != Status::Terminated {
        return Err(format!("no convergence within {MAX_STEPS} steps").into());
    }

    let table = agent.finish(&mut Npy::create("q_table.npy")?, Duration::ZERO)?;
    Csv::create("q_table.csv")?.write(&table)?;

    Ok(())
}
