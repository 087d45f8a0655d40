//! Backend half of the monthly expenses manager.
//!
//! At startup the [`Backend`] reads the YNAB budgets and prepares the shared
//! and individual expense templates. It then serves the UI over the bridge:
//! split requests arrive as events, fetch and submit as RPC calls.

pub use backend::{Backend, BackendBuilder, BudgetSettings};
pub use ynab::{DEFAULT_BASE_URL, YnabClient, YnabError};

mod backend;
pub mod ynab;
