//! Discovery of the budgets, accounts and categories that hold the monthly
//! expenses, and construction of the expense templates.

use api_types::{
    ExpenseCategory,
    expenses::{MonthlyExpense, MonthlyExpenses},
    ynab::{Account, BudgetSummary, Category, CategoryGroupWithCategories},
};
use chrono::NaiveDate;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::payees::{self, Payees};

/// Category group holding the monthly expenses.
pub const MONTHLY_EXPENSES_GROUP: &str = "Obligatory Monthly Expenses";
/// Category inside [`MONTHLY_EXPENSES_GROUP`] that is not split.
pub const EXCLUDED_CATEGORY: &str = "Bank Fees";

/// Lowercased, accent-free form of a name keeping only alphanumeric words.
///
/// Emoji and punctuation act as separators, so `"💡 Electricity"` and
/// `"electricity"` normalise to the same key.
pub fn normalize_key(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut out = String::new();
    let mut prev_space = false;
    for ch in trimmed.nfkd() {
        if is_combining_mark(ch) {
            continue;
        }
        if ch.is_alphanumeric() {
            for lower in ch.to_lowercase() {
                out.push(lower);
            }
            prev_space = false;
        } else if !out.is_empty() && !prev_space {
            out.push(' ');
            prev_space = true;
        }
    }
    let normalized = out.trim();
    if normalized.is_empty() {
        None
    } else {
        Some(normalized.to_string())
    }
}

/// Maps a YNAB category name to the expense category it represents.
pub fn category_for_name(name: &str) -> Option<ExpenseCategory> {
    let key = normalize_key(name)?;
    ExpenseCategory::ALL
        .into_iter()
        .find(|category| normalize_key(category.label()).as_deref() == Some(key.as_str()))
}

/// Finds the budget whose name contains `name`.
pub fn find_budget<'a>(budgets: &'a [BudgetSummary], name: &str) -> Option<&'a BudgetSummary> {
    budgets.iter().find(|budget| budget.name.contains(name))
}

/// Finds the open account named exactly `name`.
pub fn monthly_expenses_account<'a>(accounts: &'a [Account], name: &str) -> Option<&'a Account> {
    accounts
        .iter()
        .find(|account| !account.closed && !account.deleted && account.name == name)
}

/// Visible categories of the monthly expenses group, without bank fees.
pub fn monthly_expenses_categories(groups: &[CategoryGroupWithCategories]) -> Vec<&Category> {
    groups
        .iter()
        .filter(|group| group.name.contains(MONTHLY_EXPENSES_GROUP))
        .flat_map(|group| group.categories.iter())
        .filter(|category| {
            !category.hidden && !category.deleted && !category.name.contains(EXCLUDED_CATEGORY)
        })
        .collect()
}

/// A set of monthly expenses can be submitted once it points to a budget and
/// an account and covers every category.
pub fn is_valid(expenses: &MonthlyExpenses) -> bool {
    !expenses.budget_id.is_empty()
        && !expenses.account_id.is_empty()
        && expenses.expenses.len() == ExpenseCategory::ALL.len()
}

/// Which side of the household a template is built for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Shared,
    Individual,
}

/// Builds the empty monthly expenses of a budget.
///
/// Categories whose name does not match any [`ExpenseCategory`] are skipped
/// with a warning.
pub fn expenses_template(
    side: Side,
    budget: &BudgetSummary,
    account: Option<&Account>,
    categories: &[&Category],
    payees: &Payees,
    today: NaiveDate,
) -> MonthlyExpenses {
    let mut template = MonthlyExpenses {
        budget_id: budget.id.to_string(),
        account_id: account.map(|account| account.id.to_string()).unwrap_or_default(),
        ..MonthlyExpenses::default()
    };

    for category in categories {
        let Some(expense_category) = category_for_name(&category.name) else {
            tracing::warn!("ignoring unknown monthly expense category \"{}\"", category.name);
            continue;
        };

        let (payee_name, memo) = match side {
            Side::Shared => (
                payees.shared_payee(expense_category).to_string(),
                payees::shared_memo(expense_category, today),
            ),
            Side::Individual => (
                payees::transfer_payee(&payees.household),
                payees::individual_memo(today),
            ),
        };

        template.expenses.insert(
            expense_category,
            MonthlyExpense {
                category_id: Some(category.id),
                payee_name: Some(payee_name),
                amount: String::new(),
                memo: Some(memo),
            },
        );
    }

    template
}
