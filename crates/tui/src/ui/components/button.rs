use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::{
    state::{ImportButton, ImportLabel},
    ui::{components::spinner, theme::Theme},
};

/// What a button shows on a given frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonView {
    pub key: char,
    pub text: String,
    pub enabled: bool,
}

impl ButtonView {
    pub fn split(enabled: bool) -> Self {
        Self {
            key: 's',
            text: "Split".to_string(),
            enabled,
        }
    }

    pub fn import(button: &ImportButton, tick: usize) -> Self {
        let text = if button.loading {
            format!("{} Importing", spinner(tick))
        } else {
            match button.label {
                ImportLabel::Import => "Import".to_string(),
                ImportLabel::Done => "✓ Done".to_string(),
                ImportLabel::Error => "✗ Error".to_string(),
            }
        };
        Self {
            key: 'i',
            text,
            enabled: button.enabled,
        }
    }
}

pub fn render(frame: &mut Frame<'_>, area: Rect, view: &ButtonView, theme: &Theme) {
    let (border, text) = if view.enabled {
        (
            Style::default().fg(theme.accent),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )
    } else {
        (Style::default().fg(theme.border), Style::default().fg(theme.dim))
    };

    let line = Line::from(vec![
        Span::styled(format!("[{}] ", view.key), Style::default().fg(theme.dim)),
        Span::styled(view.text.clone(), text),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border);

    frame.render_widget(
        Paragraph::new(line).alignment(Alignment::Center).block(block),
        area,
    );
}
