use api_types::{ExpenseCategory, expenses::MonthlyExpenses};
use engine::{MoneyCents, display_amount};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::{
    state::{AppState, FetchState},
    ui::{
        components::{
            button::{self, ButtonView},
            card::{ExpenseCard, Panel},
            spinner,
        },
        theme::Theme,
    },
};

const LABEL_WIDTH: usize = 24;

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, tick: usize) {
    let theme = Theme::default();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(3)])
        .split(area);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    let loaded = state.fetch == FetchState::Loaded;
    ExpenseCard::new(Panel::Shared, &theme)
        .editable(loaded)
        .total(state.shared.as_ref().filter(|_| loaded).map(total))
        .render(frame, cards[0], shared_lines(state, tick, &theme));
    ExpenseCard::new(Panel::Individual, &theme)
        .total(state.individual.as_ref().map(total))
        .render(frame, cards[1], individual_lines(state, &theme));

    let buttons = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(20),
            Constraint::Length(2),
            Constraint::Length(20),
            Constraint::Min(0),
        ])
        .split(rows[1]);

    button::render(frame, buttons[1], &ButtonView::split(state.split_enabled), &theme);
    button::render(
        frame,
        buttons[3],
        &ButtonView::import(&state.import, tick),
        &theme,
    );
}

fn total(expenses: &MonthlyExpenses) -> MoneyCents {
    expenses
        .expenses
        .values()
        .map(|expense| MoneyCents::coerce(&expense.amount))
        .fold(MoneyCents::ZERO, |sum, amount| sum + amount)
}

fn amount_line(label: &str, value: String, style: Style, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!(" {label:<LABEL_WIDTH$}"),
            Style::default().fg(theme.text),
        ),
        Span::styled("€ ", Style::default().fg(theme.dim)),
        Span::styled(value, style),
    ])
}

fn shared_lines(state: &AppState, tick: usize, theme: &Theme) -> Vec<Line<'static>> {
    let shared = match (state.fetch, &state.shared) {
        (FetchState::Loaded, Some(shared)) => shared,
        (FetchState::Unavailable, _) => {
            return vec![Line::from(Span::styled(
                " Expenses unavailable",
                Style::default().fg(theme.error),
            ))];
        }
        _ => {
            return vec![Line::from(Span::styled(
                format!(" {} Loading expenses…", spinner(tick)),
                Style::default().fg(theme.dim),
            ))];
        }
    };

    ExpenseCategory::ALL
        .into_iter()
        .map(|category| {
            let raw = shared.amount(category);
            if category == state.focus {
                amount_line(
                    category.label(),
                    format!("{raw}│"),
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD),
                    theme,
                )
            } else {
                amount_line(
                    category.label(),
                    raw.to_string(),
                    Style::default().fg(theme.text),
                    theme,
                )
            }
        })
        .collect()
}

fn individual_lines(state: &AppState, theme: &Theme) -> Vec<Line<'static>> {
    let Some(individual) = &state.individual else {
        return vec![Line::from(Span::styled(
            " Split the shared expenses to see your share",
            Style::default().fg(theme.dim),
        ))];
    };

    ExpenseCategory::ALL
        .into_iter()
        .map(|category| {
            amount_line(
                category.label(),
                display_amount(individual.amount(category)),
                Style::default().fg(theme.dim),
                theme,
            )
        })
        .collect()
}
