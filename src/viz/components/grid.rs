use ratatui::{prelude::*, widgets::*};

use crate::{
    agent::Snapshot,
    grid::{Action, Coord},
};

/// HSL color, `h` in degrees, `s` and `l` in percent
#[derive(Clone, Copy, PartialEq, Default, Debug)]
pub struct Hsl(pub f64, pub f64, pub f64);

/// Cells with negative value fade towards red, positive towards green
const GRADIENT: (Hsl, Hsl) = (Hsl(0.0, 80.0, 55.0), Hsl(120.0, 80.0, 55.0));

/// Renders a [`Snapshot`] as a board of bordered cells with the best q-value of each cell
/// overlaid
pub struct GridView<'a> {
    snapshot: &'a Snapshot,
}

impl<'a> GridView<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self { snapshot }
    }

    fn cell(&self, coord: Coord, scale: f32) -> Paragraph<'a> {
        let s = self.snapshot;
        let value = s.best_values[coord.x as usize][coord.y as usize];

        let mut lines = Vec::with_capacity(2);
        if coord != s.goal {
            // truncated toward zero
            let percent = 0.5 + f64::from(value / scale) / 2.0;
            lines.push(Line::from(format!("{}", value as i64)).style(linear_gradient(percent)));
        }

        let marker = if coord == s.position {
            Span::from(heading_glyph(s.heading)).light_cyan().bold()
        } else if coord == s.goal {
            Span::from("G").light_yellow().bold()
        } else if s.hazards.contains(&coord) {
            Span::from("X").light_red().bold()
        } else {
            Span::raw("")
        };
        lines.push(Line::from(marker));

        Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::bordered()
                .border_type(BorderType::Plain)
                .border_style(Style::default().dark_gray()),
        )
    }
}

impl Widget for GridView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title("Grid");
        let inner = block.inner(area);
        block.render(area, buf);

        let n = self.snapshot.size;
        if n == 0 {
            return;
        }

        let scale = self
            .snapshot
            .best_values
            .iter()
            .flatten()
            .map(|v| v.abs())
            .fold(f32::EPSILON, f32::max);

        let ratio = Constraint::Ratio(1, n as u32);
        let rows = Layout::vertical(vec![ratio; n]).split(inner);
        for (y, row) in rows.iter().enumerate() {
            let cells = Layout::horizontal(vec![ratio; n]).split(*row);
            for (x, area) in cells.iter().enumerate() {
                self.cell(Coord::new(x as i32, y as i32), scale)
                    .render(*area, buf);
            }
        }
    }
}

fn heading_glyph(action: Action) -> &'static str {
    match action {
        Action::Up => "▲",
        Action::Down => "▼",
        Action::Left => "◀",
        Action::Right => "▶",
    }
}

fn linear_gradient(percent: f64) -> Style {
    let (Hsl(h1, s1, l1), Hsl(h2, s2, l2)) = GRADIENT;
    let percent = percent.clamp(0.0, 1.0);
    Style::default().fg(Color::from_hsl(
        interpolate(h1, h2, percent),
        interpolate(s1, s2, percent),
        interpolate(l1, l2, percent),
    ))
}

fn interpolate(a: f64, b: f64, p: f64) -> f64 {
    a + (p * (b - a))
}
