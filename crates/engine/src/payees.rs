//! Payee names and memos attached to the monthly expense transactions.

use api_types::ExpenseCategory;
use chrono::{Datelike, Months, NaiveDate};
use serde::Deserialize;

/// Payee names used when building the transactions.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Payees {
    pub condominium: String,
    pub electricity: String,
    pub tv_internet_phone: String,
    pub water: String,
    /// Name of the person whose budget receives the individual share.
    pub me: String,
    /// Name of the other person sharing the household.
    pub partner: String,
    /// Name of the household the individual share is transferred to.
    pub household: String,
}

impl Default for Payees {
    fn default() -> Self {
        Self {
            condominium: "Loja do Condomínio".to_string(),
            electricity: "EDP".to_string(),
            tv_internet_phone: "Vodafone".to_string(),
            water: "EPAL".to_string(),
            me: "Magui".to_string(),
            partner: "Jão".to_string(),
            household: "Casa".to_string(),
        }
    }
}

impl Payees {
    /// Payee of the shared bill of `category`.
    pub fn shared_payee(&self, category: ExpenseCategory) -> &str {
        match category {
            ExpenseCategory::Condominium => &self.condominium,
            ExpenseCategory::Electricity => &self.electricity,
            ExpenseCategory::TvInternetPhone => &self.tv_internet_phone,
            ExpenseCategory::Water => &self.water,
        }
    }
}

/// Name used for a transfer to or from `name`.
pub fn transfer_payee(name: &str) -> String {
    format!("Transfer: {name}")
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn month_year(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

/// Memo for a bill whose billing cycle runs from day `start` of the previous
/// month to day `end` of the current one, e.g.
/// `"May 2024 - 11 May to 10 June"`.
fn billing_cycle_memo(today: NaiveDate, start: u32, end: u32) -> String {
    let current = first_of_month(today);
    let previous = current.checked_sub_months(Months::new(1)).unwrap_or(current);

    format!(
        "{} - {start} {} to {end} {}",
        month_year(previous),
        previous.format("%B"),
        current.format("%B"),
    )
}

/// Memo of the shared transaction of `category`.
///
/// The condominium is paid in advance for the next month; the other bills
/// refer to billing cycles that ended this month.
pub fn shared_memo(category: ExpenseCategory, today: NaiveDate) -> String {
    match category {
        ExpenseCategory::Condominium => {
            let current = first_of_month(today);
            let next = current.checked_add_months(Months::new(1)).unwrap_or(current);
            month_year(next)
        }
        ExpenseCategory::Electricity => billing_cycle_memo(today, 11, 10),
        ExpenseCategory::Water => billing_cycle_memo(today, 4, 3),
        ExpenseCategory::TvInternetPhone => {
            let phone = billing_cycle_memo(today, 16, 15);
            let phone_cycle = phone.split("- ").nth(1).unwrap_or(&phone);
            format!("{} & {phone_cycle}", billing_cycle_memo(today, 9, 8))
        }
    }
}

/// Memo of the individual share transactions.
pub fn individual_memo(today: NaiveDate) -> String {
    format!("{} - Household Expenses", month_year(today))
}
