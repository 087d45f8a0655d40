use engine::MoneyCents;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::ui::theme::Theme;

/// The two panels of the expenses screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Panel {
    /// Household bills, typed in by the user.
    Shared,
    /// The user's half, as computed by the backend.
    Individual,
}

impl Panel {
    pub fn title(self) -> &'static str {
        match self {
            Self::Shared => "Shared expenses",
            Self::Individual => "My share",
        }
    }
}

/// Bordered panel listing one amount per category, with the total at the
/// bottom once there is something to add up.
pub struct ExpenseCard<'a> {
    panel: Panel,
    theme: &'a Theme,
    editable: bool,
    total: Option<MoneyCents>,
}

impl<'a> ExpenseCard<'a> {
    pub fn new(panel: Panel, theme: &'a Theme) -> Self {
        Self {
            panel,
            theme,
            editable: false,
            total: None,
        }
    }

    /// Highlights the border while the amounts accept input.
    pub fn editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    pub fn total(mut self, total: Option<MoneyCents>) -> Self {
        self.total = total;
        self
    }

    fn block(&self) -> Block<'static> {
        let border = if self.editable {
            self.theme.accent
        } else {
            self.theme.border
        };

        let mut block = Block::default()
            .title(Span::styled(
                format!(" {} ", self.panel.title()),
                Style::default().fg(self.theme.accent),
            ))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(self.theme.panel));

        if let Some(total) = self.total {
            block = block.title_bottom(
                Line::from(Span::styled(
                    format!(" Total € {total} "),
                    Style::default()
                        .fg(self.theme.text)
                        .add_modifier(Modifier::BOLD),
                ))
                .alignment(Alignment::Right),
            );
        }
        block
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, lines: Vec<Line<'static>>) {
        frame.render_widget(Paragraph::new(lines).block(self.block()), area);
    }
}
