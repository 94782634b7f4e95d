use std::{
    io,
    sync::mpsc::{Receiver, TryRecvError},
    time::Duration,
};

use crossterm::event::{self, KeyCode};
use ratatui::{prelude::*, widgets::*};

use super::{
    components::{help::render_help, Component, GridView, Logs},
    tui,
    util::key_press,
};
use crate::agent::{Snapshot, Status};

const TABS: [&str; 2] = ["Grid", "Logs"];

/// Roughly one frame at 60 FPS
const FRAME: Duration = Duration::from_millis(16);

#[derive(Default)]
pub enum State {
    #[default]
    Train,
    Quit,
}

/// The root TUI component which holds the latest snapshot and runs the render loop
pub struct App {
    state: State,
    snapshot: Option<Snapshot>,
    frames: u64,
    selected_tab: usize,
    show_help: bool,
    logs: Logs,
}

impl App {
    pub fn new() -> Self {
        Self {
            state: Default::default(),
            snapshot: None,
            frames: 0,
            selected_tab: 0,
            show_help: false,
            logs: Logs::new(),
        }
    }

    /// Initialize the terminal and draw every snapshot received on `rx` until the sender
    /// hangs up or the user quits
    ///
    /// Restores the terminal on exit
    pub fn run(&mut self, rx: Receiver<Snapshot>) -> io::Result<()> {
        let mut terminal = tui::init()?;

        while let State::Train = self.state {
            loop {
                match rx.try_recv() {
                    Ok(snapshot) => {
                        self.frames += 1;
                        self.snapshot = Some(snapshot);
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        self.state = State::Quit;
                        break;
                    }
                }
            }

            terminal.draw(|frame| frame.render_widget(&*self, frame.size()))?;

            if event::poll(FRAME)? {
                let event = event::read()?;
                match key_press(&event) {
                    Some(KeyCode::Char('q')) => self.state = State::Quit,
                    Some(KeyCode::Char('h')) => self.show_help = !self.show_help,
                    Some(KeyCode::Tab) => {
                        self.selected_tab = (self.selected_tab + 1) % TABS.len();
                    }
                    _ if self.selected_tab == 1 => {
                        self.logs.handle_ui_event(&event);
                    }
                    _ => {}
                }
            }
        }

        tui::restore()
    }

    fn render_status(&self, area: Rect, buf: &mut Buffer) {
        let Some(s) = &self.snapshot else {
            Paragraph::new("waiting for the agent...")
                .block(Block::bordered().border_type(BorderType::Rounded))
                .render(area, buf);
            return;
        };

        let status = match s.status {
            Status::Running => Span::from("learning").cyan(),
            Status::Terminated => Span::from("done").light_green().bold(),
        };
        Paragraph::new(Line::from(vec![
            Span::from(format!(" Hazard hits: {}", s.counters.hazard_hits)).light_red(),
            Span::raw("   "),
            Span::from(format!("Goal reaches: {}", s.counters.goal_reaches)).light_yellow(),
            Span::raw("   "),
            Span::from(format!("Frames: {}", self.frames)).dark_gray(),
            Span::raw("   "),
            status,
        ]))
        .block(Block::bordered().border_type(BorderType::Rounded))
        .render(area, buf);
    }

    /// How close the agent is to the stop condition, `goal_reaches / (3 * hazard_hits + 1)`
    fn render_progress(&self, area: Rect, buf: &mut Buffer) {
        let ratio = self.snapshot.as_ref().map_or(0.0, |s| {
            let needed = 3.0 * f64::from(s.counters.hazard_hits) + 1.0;
            (f64::from(s.counters.goal_reaches) / needed).min(1.0)
        });

        Gauge::default()
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title("Competence"),
            )
            .gauge_style(Color::Cyan)
            .ratio(ratio)
            .render(area, buf);
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Layout
        let [menu_area, main_area, status_area, progress_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .areas(area);

        // Menu
        Tabs::new(TABS)
            .block(Block::default().padding(Padding::uniform(1)))
            .white()
            .bold()
            .highlight_style(Style::default().light_green())
            .select(self.selected_tab)
            .render(menu_area, buf);

        // Main
        match (self.selected_tab, &self.snapshot) {
            (0, Some(snapshot)) => GridView::new(snapshot).render(main_area, buf),
            (1, _) => self.logs.render_ref(main_area, buf),
            _ => {}
        }

        self.render_status(status_area, buf);
        self.render_progress(progress_area, buf);

        if self.show_help {
            render_help(area, buf, self.selected_tab);
        }
    }
}
