use std::{
    env,
    error::Error,
    fs::File,
    thread,
    time::{Duration, Instant},
};

use rand::{rngs::StdRng, SeedableRng};
use ratventure::{persist::Npy, viz, Config, QTableAgent, Status};

/// One learning step per rendered frame
const FRAME: Duration = Duration::from_millis(16);
/// How long the final board stays on screen before the table is saved
const LINGER: Duration = Duration::from_secs(10);
const SEED: u64 = 0x5eed;

fn main() -> Result<(), Box<dyn Error>> {
    let config = match env::args().nth(1) {
        Some(path) => Config::from_json(File::open(path)?)?,
        None => Config::default(),
    };
    let mut agent = QTableAgent::new(config, StdRng::seed_from_u64(SEED))?;

    let (handle, tx) = viz::init()?;

    loop {
        let tick = Instant::now();
        agent.step()?;

        // The viz hung up, the user quit
        if tx.send(agent.snapshot()).is_err() {
            break;
        }
        if agent.status() == Status::Terminated {
            break;
        }

        if let Some(rest) = FRAME.checked_sub(tick.elapsed()) {
            thread::sleep(rest);
        }
    }

    if agent.status() == Status::Terminated {
        let mut sink = Npy::create("q_table.npy")?;
        agent.finish(&mut sink, LINGER)?;
    }

    drop(tx);
    handle.join().map_err(|_| "viz thread panicked")??;

    Ok(())
}
