use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::{
    state::Readiness,
    ui::{components::spinner, theme::Theme},
};

fn centered_box(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vertical[1]);

    horizontal[1]
}

/// Blocks the screen until the backend is ready. Stays up for good when the
/// backend setup failed.
pub fn render(frame: &mut Frame<'_>, area: Rect, readiness: Readiness, tick: usize) {
    let theme = Theme::default();

    let (title, lines, color) = match readiness {
        Readiness::Ready => return,
        Readiness::Pending => (
            " starting ",
            vec![Line::from(format!(
                "{} Waiting for the backend…",
                spinner(tick)
            ))],
            theme.accent,
        ),
        Readiness::Failed => (
            " error ",
            vec![
                Line::from(Span::styled(
                    "Backend setup failed",
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    "Check the YNAB token and budgets, then restart.",
                    Style::default().fg(theme.dim),
                )),
                Line::from(Span::styled("q to quit", Style::default().fg(theme.dim))),
            ],
            theme.error,
        ),
    };

    let height = lines.len() as u16 + 2;
    let rect = centered_box(52.min(area.width), height, area);
    frame.render_widget(Clear, rect);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(theme.background));
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::default().fg(color))
            .block(block),
        rect,
    );
}
