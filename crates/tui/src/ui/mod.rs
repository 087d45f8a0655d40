pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::state::AppState;

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

/// Draws the whole screen. `tick` drives the spinners.
pub fn render(frame: &mut Frame<'_>, state: &AppState, tick: usize) {
    let area = frame.area();
    let theme = Theme::default();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Min(0),    // Cards and buttons
            Constraint::Length(1), // Bottom bar
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new(Span::styled(
            " Monthly Expenses",
            Style::default().fg(theme.accent),
        )),
        layout[0],
    );
    screens::expenses::render(frame, layout[1], state, tick);
    render_bottom_bar(frame, layout[2], &theme);

    components::overlay::render(frame, area, state.readiness, tick);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, theme: &Theme) {
    let hints = [
        ("Tab/↓", "next"),
        ("↑", "previous"),
        ("s", "split"),
        ("i", "import"),
        ("q", "quit"),
    ];

    let mut parts = Vec::new();
    for (index, (key, action)) in hints.into_iter().enumerate() {
        if index > 0 {
            parts.push(Span::styled("  │  ", Style::default().fg(theme.border)));
        }
        parts.push(Span::styled(key, Style::default().fg(theme.accent)));
        parts.push(Span::raw(format!(" {action}")));
    }

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}
