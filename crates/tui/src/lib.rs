//! Terminal UI of the monthly expenses manager.
//!
//! [`App`] owns the screen and the [`state::AppState`] machine. It talks to
//! the backend only through the capabilities it is handed: an
//! [`bridge::EventChannel`] and an [`bridge::ExpensesRpc`].

pub use app::{App, UiMessage};
pub use config::UiConfig;
pub use error::{AppError, Result};

pub mod app;
pub mod config;
mod error;
pub mod model;
pub mod state;
pub mod ui;
