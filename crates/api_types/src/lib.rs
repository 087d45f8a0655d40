use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Household expense categories handled by the monthly workflow.
///
/// The set is closed. Variants are declared in the alphabetical order of their
/// labels, so the derived `Ord` matches the order used when splitting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExpenseCategory {
    #[serde(rename = "Condominium")]
    Condominium,
    #[serde(rename = "Electricity")]
    Electricity,
    #[serde(rename = "TV / Internet / Phone")]
    TvInternetPhone,
    #[serde(rename = "Water")]
    Water,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 4] = [
        Self::Condominium,
        Self::Electricity,
        Self::TvInternetPhone,
        Self::Water,
    ];

    /// Returns the display label, which is also the wire name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Condominium => "Condominium",
            Self::Electricity => "Electricity",
            Self::TvInternetPhone => "TV / Internet / Phone",
            Self::Water => "Water",
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub mod expenses {
    use super::*;

    /// A single monthly expense.
    ///
    /// `amount` is kept as the raw text the user typed (or the backend
    /// produced). Consumers coerce it when they need a number. On the wire it
    /// may also be a JSON number, which is stored as its decimal text.
    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct MonthlyExpense {
        pub category_id: Option<Uuid>,
        pub payee_name: Option<String>,
        #[serde(default, deserialize_with = "amount_text")]
        pub amount: String,
        pub memo: Option<String>,
    }

    fn amount_text<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Amount {
            Text(String),
            Integer(i64),
            Decimal(f64),
        }

        Ok(match Option::<Amount>::deserialize(deserializer)? {
            Some(Amount::Text(text)) => text,
            Some(Amount::Integer(value)) => value.to_string(),
            Some(Amount::Decimal(value)) => value.to_string(),
            None => String::new(),
        })
    }

    /// Monthly expenses per category for one budget and account.
    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct MonthlyExpenses {
        #[serde(default)]
        pub budget_id: String,
        #[serde(default)]
        pub account_id: String,
        #[serde(default)]
        pub expenses: BTreeMap<ExpenseCategory, MonthlyExpense>,
    }

    impl MonthlyExpenses {
        /// Raw amount of a category, empty when the category is missing.
        pub fn amount(&self, category: ExpenseCategory) -> &str {
            self.expenses
                .get(&category)
                .map(|expense| expense.amount.as_str())
                .unwrap_or("")
        }
    }

    /// Payload submitted to create the ledger transactions.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CombinedMonthlyExpenses {
        pub shared_monthly_expenses: MonthlyExpenses,
        pub individual_monthly_expenses: MonthlyExpenses,
    }
}

pub mod events {
    use super::{expenses::MonthlyExpenses, *};

    pub const BACKEND_SETUP_COMPLETE: &str = "backendSetupComplete";
    pub const SHARED_MONTHLY_EXPENSES_INPUT: &str = "sharedMonthlyExpensesInput";
    pub const SHARED_MONTHLY_EXPENSES_SPLIT: &str = "sharedMonthlyExpensesSplit";

    /// Names of the events exchanged between UI and backend.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub enum EventName {
        BackendSetupComplete,
        SharedMonthlyExpensesInput,
        SharedMonthlyExpensesSplit,
    }

    impl EventName {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::BackendSetupComplete => BACKEND_SETUP_COMPLETE,
                Self::SharedMonthlyExpensesInput => SHARED_MONTHLY_EXPENSES_INPUT,
                Self::SharedMonthlyExpensesSplit => SHARED_MONTHLY_EXPENSES_SPLIT,
            }
        }

        pub fn parse(name: &str) -> Option<Self> {
            match name {
                BACKEND_SETUP_COMPLETE => Some(Self::BackendSetupComplete),
                SHARED_MONTHLY_EXPENSES_INPUT => Some(Self::SharedMonthlyExpensesInput),
                SHARED_MONTHLY_EXPENSES_SPLIT => Some(Self::SharedMonthlyExpensesSplit),
                _ => None,
            }
        }
    }

    impl fmt::Display for EventName {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    /// Typed payload of every named event.
    ///
    /// Serialized adjacently tagged, e.g.
    /// `{"name":"backendSetupComplete","payload":true}`.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(tag = "name", content = "payload", rename_all = "camelCase")]
    pub enum ChannelEvent {
        /// `null` = not ready yet, `true` = ready, `false` = setup failed.
        BackendSetupComplete(Option<bool>),
        SharedMonthlyExpensesInput(MonthlyExpenses),
        SharedMonthlyExpensesSplit(MonthlyExpenses),
    }

    impl ChannelEvent {
        pub fn name(&self) -> EventName {
            match self {
                Self::BackendSetupComplete(_) => EventName::BackendSetupComplete,
                Self::SharedMonthlyExpensesInput(_) => EventName::SharedMonthlyExpensesInput,
                Self::SharedMonthlyExpensesSplit(_) => EventName::SharedMonthlyExpensesSplit,
            }
        }
    }
}

/// Schemas of the YNAB REST API (v1) used by the backend.
///
/// Only the fields the workflow reads or writes are modelled; everything else
/// in the responses is ignored.
pub mod ynab {
    use super::*;

    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Account {
        pub id: Uuid,
        pub name: String,
        #[serde(default)]
        pub closed: bool,
        #[serde(default)]
        pub deleted: bool,
    }

    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct BudgetSummary {
        pub id: Uuid,
        pub name: String,
        #[serde(default)]
        pub accounts: Vec<Account>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetsData {
        pub budgets: Vec<BudgetSummary>,
    }

    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Category {
        pub id: Uuid,
        pub name: String,
        #[serde(default)]
        pub hidden: bool,
        #[serde(default)]
        pub deleted: bool,
    }

    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CategoryGroupWithCategories {
        pub id: Uuid,
        pub name: String,
        #[serde(default)]
        pub hidden: bool,
        #[serde(default)]
        pub deleted: bool,
        #[serde(default)]
        pub categories: Vec<Category>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoriesData {
        pub category_groups: Vec<CategoryGroupWithCategories>,
    }

    /// Cleared status of a transaction.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Cleared {
        Cleared,
        #[default]
        Uncleared,
        Reconciled,
    }

    /// Amounts are milliunits: 1.00€ is 1000.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct SaveSubTransaction {
        pub amount: i64,
        pub payee_name: Option<String>,
        pub category_id: Option<Uuid>,
        pub memo: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct SaveTransaction {
        pub account_id: Uuid,
        /// ISO date (`YYYY-MM-DD`).
        pub date: String,
        pub amount: i64,
        pub payee_name: Option<String>,
        pub category_id: Option<Uuid>,
        pub memo: Option<String>,
        pub cleared: Cleared,
        pub approved: bool,
        pub subtransactions: Vec<SaveSubTransaction>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PostTransaction {
        pub transaction: SaveTransaction,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PostTransactions {
        pub transactions: Vec<SaveTransaction>,
    }

    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct SaveTransactionsData {
        #[serde(default)]
        pub transaction_ids: Vec<String>,
    }

    /// Every successful YNAB response wraps its body in `data`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Envelope<T> {
        pub data: T,
    }

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct ErrorDetail {
        #[serde(default)]
        pub id: String,
        #[serde(default)]
        pub name: String,
        #[serde(default)]
        pub detail: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ErrorResponse {
        pub error: ErrorDetail,
    }
}
