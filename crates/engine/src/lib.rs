//! Backend domain logic of the monthly expenses workflow.
//!
//! Everything here is pure: amounts, splitting, payee/memo rules, template
//! discovery and transaction building. Talking to the ledger is the
//! backend's job.

pub use error::EngineError;
pub use money::{MoneyCents, display_amount};
pub use payees::Payees;
pub use setup::{Side, is_valid};
pub use split::{Rounding, split_monthly_expenses};
pub use transactions::{individual_transaction, shared_transactions};

mod error;
mod money;
pub mod payees;
pub mod setup;
mod split;
mod transactions;

type ResultEngine<T> = Result<T, EngineError>;
