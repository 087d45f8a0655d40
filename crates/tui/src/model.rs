//! Updates of the shared expenses typed by the user.

use api_types::{
    ExpenseCategory,
    expenses::{MonthlyExpense, MonthlyExpenses},
};

/// Returns `model` with the amount of `category` replaced by `raw`.
///
/// The text is kept as typed, so intermediate input such as `"1."` survives;
/// coercion happens when the amount is displayed or submitted. Every other
/// category is left untouched. A category missing from `model` is added with
/// empty metadata.
pub fn set_amount(model: &MonthlyExpenses, category: ExpenseCategory, raw: &str) -> MonthlyExpenses {
    let mut updated = model.clone();
    updated
        .expenses
        .entry(category)
        .or_insert_with(MonthlyExpense::default)
        .amount = raw.to_string();
    updated
}
