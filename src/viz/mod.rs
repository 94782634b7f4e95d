use std::{
    io,
    sync::mpsc::{self, Sender},
    thread::{self, JoinHandle},
};

use log::SetLoggerError;

use crate::agent::Snapshot;

mod app;
mod components;
mod tui;
mod util;

pub use app::App;

/// Install `tui-logger` as the global logger and start the TUI on its own thread
///
/// Send one [`Snapshot`] per step on the returned channel. The TUI exits when the sender
/// is dropped or the user presses `q`; after that, sends fail, which is the driver's cue to
/// stop stepping.
pub fn init() -> Result<(JoinHandle<io::Result<()>>, Sender<Snapshot>), SetLoggerError> {
    tui_logger::init_logger(log::LevelFilter::Trace)?;
    tui_logger::set_default_level(log::LevelFilter::Debug);

    let (tx, rx) = mpsc::channel();
    let handle = thread::spawn(move || App::new().run(rx));

    Ok((handle, tx))
}
