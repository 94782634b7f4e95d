pub mod grid;
pub mod help;
pub mod logs;

use crossterm::event::Event;
pub use grid::GridView;
pub use logs::Logs;
use ratatui::widgets::WidgetRef;

/// A widget that also reacts to terminal events
pub trait Component: WidgetRef {
    /// Returns `true` if the event was consumed
    fn handle_ui_event(&mut self, event: &Event) -> bool;
}
