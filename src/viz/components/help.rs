use ratatui::{prelude::*, widgets::*};

fn key(key: &'static str, help: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::from(format!("{key:^5}")).light_cyan().bold(),
        Span::raw(format!(" : {help}")),
    ])
}

/// Centered popup listing the key bindings of the selected tab
pub fn render_help(area: Rect, buf: &mut Buffer, selected_tab: usize) {
    let mut lines = vec![
        key("q", "Stop learning and exit"),
        key("h", "Toggle help popup"),
        key("Tab", "Switch tabs"),
    ];

    if selected_tab == 1 {
        lines.extend([
            key("s", "Toggle the target selector"),
            key("f", "Focus on the selected target"),
            key("⬆ / ⬇", "Switch log target"),
            key("⬅ / ➡", "Shown log level down / up"),
            key("- / +", "Captured log level down / up"),
            key("PgUp", "Page mode, scroll up"),
            key("PgDn", "Page mode, scroll down"),
            key("Esc", "Leave page mode"),
        ]);
    }

    let [_, center_vert, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length((lines.len() + 4) as u16),
        Constraint::Fill(1),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(60),
        Constraint::Fill(1),
    ])
    .areas(center_vert);

    Clear.render(center, buf);

    Paragraph::new(lines)
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .padding(Padding::proportional(1))
                .title("Help"),
        )
        .wrap(Wrap { trim: false })
        .render(center, buf);
}
