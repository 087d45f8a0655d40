//! UI state derived from the bridge traffic.
//!
//! Three independent machines live here: the readiness overlay, the split
//! action and the import action. Every transition is a plain method so the
//! whole machine can be driven without a terminal or a backend; [`crate::App`]
//! only decides *when* to call them (timers, channel events, RPC results).

use api_types::{
    ExpenseCategory,
    expenses::{CombinedMonthlyExpenses, MonthlyExpenses},
};
use bridge::RpcError;

use crate::model;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Pending,
    Ready,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportLabel {
    Import,
    Done,
    Error,
}

impl ImportLabel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Import => "Import",
            Self::Done => "Done",
            Self::Error => "Error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportButton {
    pub label: ImportLabel,
    pub enabled: bool,
    pub loading: bool,
}

impl Default for ImportButton {
    fn default() -> Self {
        Self {
            label: ImportLabel::Import,
            enabled: false,
            loading: false,
        }
    }
}

/// Progress of the one-off fetch of the shared expenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    Loading,
    Loaded,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub readiness: Readiness,
    /// Readiness received from the backend, waiting for its display delay.
    pub pending_readiness: Option<Readiness>,
    pub fetch: FetchState,
    pub shared: Option<MonthlyExpenses>,
    pub individual: Option<MonthlyExpenses>,
    pub split_enabled: bool,
    pub import: ImportButton,
    pub focus: ExpenseCategory,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            readiness: Readiness::Pending,
            pending_readiness: None,
            fetch: FetchState::Loading,
            shared: None,
            individual: None,
            split_enabled: false,
            import: ImportButton::default(),
            focus: ExpenseCategory::ALL[0],
        }
    }
}

impl AppState {
    /// Handles `backendSetupComplete`.
    ///
    /// Returns the readiness to commit once the display delay has passed, or
    /// `None` when the signal changes nothing: a `null` payload, or any
    /// signal after the first meaningful one.
    pub fn on_backend_setup_complete(&mut self, signal: Option<bool>) -> Option<Readiness> {
        if self.readiness != Readiness::Pending || self.pending_readiness.is_some() {
            return None;
        }
        let target = match signal? {
            true => Readiness::Ready,
            false => Readiness::Failed,
        };
        self.pending_readiness = Some(target);
        Some(target)
    }

    /// Shows `readiness`. Ready and Failed are terminal.
    pub fn commit_readiness(&mut self, readiness: Readiness) {
        if self.readiness == Readiness::Pending {
            self.readiness = readiness;
        }
    }

    pub fn on_shared_fetched(&mut self, result: Result<MonthlyExpenses, RpcError>) {
        match result {
            Ok(shared) => {
                self.shared = Some(shared);
                self.fetch = FetchState::Loaded;
            }
            Err(err) => {
                tracing::error!("failed to fetch shared expenses: {err}");
                self.fetch = FetchState::Unavailable;
            }
        }
    }

    /// Replaces the raw amount of `category`. Ignored until the shared
    /// expenses are loaded. Returns whether the edit was applied.
    pub fn edit(&mut self, category: ExpenseCategory, raw: &str) -> bool {
        let Some(shared) = &self.shared else {
            return false;
        };
        self.shared = Some(model::set_amount(shared, category, raw));
        self.split_enabled = true;
        true
    }

    fn focused_amount(&self) -> Option<&str> {
        self.shared
            .as_ref()
            .map(|shared| shared.amount(self.focus))
    }

    /// Appends `ch` to the focused amount. Only characters that can be part
    /// of an amount are accepted.
    pub fn type_char(&mut self, ch: char) -> bool {
        if !matches!(ch, '0'..='9' | '.' | ',' | '-') {
            return false;
        }
        let Some(current) = self.focused_amount() else {
            return false;
        };
        let mut raw = current.to_string();
        raw.push(ch);
        self.edit(self.focus, &raw)
    }

    pub fn backspace(&mut self) -> bool {
        let Some(current) = self.focused_amount() else {
            return false;
        };
        let mut raw = current.to_string();
        if raw.pop().is_none() {
            return false;
        }
        self.edit(self.focus, &raw)
    }

    pub fn focus_next(&mut self) {
        let index = focus_index(self.focus);
        self.focus = ExpenseCategory::ALL[(index + 1) % ExpenseCategory::ALL.len()];
    }

    pub fn focus_prev(&mut self) {
        let len = ExpenseCategory::ALL.len();
        let index = focus_index(self.focus);
        self.focus = ExpenseCategory::ALL[(index + len - 1) % len];
    }

    /// Shared expenses to send for splitting, when the split action is
    /// available.
    pub fn split_request(&self) -> Option<MonthlyExpenses> {
        if !self.split_enabled {
            return None;
        }
        self.shared.clone()
    }

    /// Handles `sharedMonthlyExpensesSplit`.
    pub fn on_split(&mut self, individual: MonthlyExpenses) {
        self.individual = Some(individual);
        self.import.enabled = true;
        if self.import.label != ImportLabel::Import {
            self.import.label = ImportLabel::Import;
        }
    }

    /// Starts an import and returns the payload to submit.
    ///
    /// Refused while disabled, while another import is in flight, or before
    /// both halves of the payload exist.
    pub fn begin_import(&mut self) -> Option<CombinedMonthlyExpenses> {
        if !self.import.enabled || self.import.loading {
            return None;
        }
        let combined = CombinedMonthlyExpenses {
            shared_monthly_expenses: self.shared.clone()?,
            individual_monthly_expenses: self.individual.clone()?,
        };

        self.import.enabled = false;
        self.import.loading = true;
        self.split_enabled = false;
        Some(combined)
    }

    /// Shows the outcome of an import. A failed call and a `false` answer
    /// look the same; both let the user split again.
    ///
    /// The button stays disabled until the next split result, even if one
    /// arrived while the import was in flight.
    pub fn finish_import(&mut self, result: Result<bool, RpcError>) {
        self.import.loading = false;
        self.import.enabled = false;
        match result {
            Ok(true) => self.import.label = ImportLabel::Done,
            Ok(false) => {
                self.import.label = ImportLabel::Error;
                self.split_enabled = true;
            }
            Err(err) => {
                tracing::error!("import call failed: {err}");
                self.import.label = ImportLabel::Error;
                self.split_enabled = true;
            }
        }
    }
}

fn focus_index(category: ExpenseCategory) -> usize {
    ExpenseCategory::ALL
        .iter()
        .position(|candidate| *candidate == category)
        .unwrap_or(0)
}
