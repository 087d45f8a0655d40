//! Ledger transactions created from a reconciled month.

use api_types::{
    expenses::{CombinedMonthlyExpenses, MonthlyExpenses},
    ynab::{Cleared, SaveSubTransaction, SaveTransaction},
};
use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    EngineError, MoneyCents, ResultEngine,
    payees::{self, Payees},
};

fn parse_id(id: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(id).map_err(|_| EngineError::InvalidId(id.to_string()))
}

fn transaction(
    account_id: Uuid,
    amount: MoneyCents,
    payee_name: Option<String>,
    category_id: Option<Uuid>,
    memo: Option<String>,
    subtransactions: Vec<SaveSubTransaction>,
    today: NaiveDate,
) -> SaveTransaction {
    SaveTransaction {
        account_id,
        date: today.format("%Y-%m-%d").to_string(),
        amount: amount.milliunits(),
        payee_name,
        category_id,
        memo,
        cleared: Cleared::Uncleared,
        approved: false,
        subtransactions,
    }
}

fn subtransaction(amount: MoneyCents, category_id: Option<Uuid>) -> SaveSubTransaction {
    SaveSubTransaction {
        amount: amount.milliunits(),
        payee_name: None,
        category_id,
        memo: None,
    }
}

/// Transactions for the shared budget.
///
/// One outflow per bill, then two inflows splitting the bills between the two
/// people: `Transfer: <me>` carries the individual share of every category,
/// `Transfer: <partner>` the remainder.
pub fn shared_transactions(
    combined: &CombinedMonthlyExpenses,
    payees: &Payees,
    today: NaiveDate,
) -> ResultEngine<Vec<SaveTransaction>> {
    let shared = &combined.shared_monthly_expenses;
    let individual = &combined.individual_monthly_expenses;
    let account_id = parse_id(&shared.account_id)?;

    let mut transactions = Vec::with_capacity(shared.expenses.len() + 2);
    let mut my_total = MoneyCents::ZERO;
    let mut my_subtransactions = Vec::new();
    let mut partner_total = MoneyCents::ZERO;
    let mut partner_subtransactions = Vec::new();

    for (category, expense) in &shared.expenses {
        let amount = MoneyCents::coerce(&expense.amount);
        transactions.push(transaction(
            account_id,
            -amount,
            expense.payee_name.clone(),
            expense.category_id,
            expense.memo.clone(),
            Vec::new(),
            today,
        ));

        let my_share = individual
            .expenses
            .get(category)
            .map(|expense| MoneyCents::coerce(&expense.amount))
            .ok_or_else(|| EngineError::MissingCategory(category.label().to_string()))?;
        let partner_share = amount - my_share;

        my_total += my_share;
        partner_total += partner_share;
        my_subtransactions.push(subtransaction(my_share, expense.category_id));
        partner_subtransactions.push(subtransaction(partner_share, expense.category_id));
    }

    let memo = payees::individual_memo(today);
    transactions.push(transaction(
        account_id,
        my_total,
        Some(payees::transfer_payee(&payees.me)),
        None,
        Some(memo.clone()),
        my_subtransactions,
        today,
    ));
    transactions.push(transaction(
        account_id,
        partner_total,
        Some(payees::transfer_payee(&payees.partner)),
        None,
        Some(memo),
        partner_subtransactions,
        today,
    ));

    Ok(transactions)
}

/// Single split transaction moving the individual share out of the
/// individual budget, one subtransaction per category.
pub fn individual_transaction(
    individual: &MonthlyExpenses,
    today: NaiveDate,
) -> ResultEngine<SaveTransaction> {
    let account_id = parse_id(&individual.account_id)?;

    let mut total = MoneyCents::ZERO;
    let mut subtransactions = Vec::with_capacity(individual.expenses.len());
    for expense in individual.expenses.values() {
        let amount = MoneyCents::coerce(&expense.amount);
        total += amount;
        subtransactions.push(subtransaction(-amount, expense.category_id));
    }

    let sample = individual.expenses.values().next();
    Ok(transaction(
        account_id,
        -total,
        sample.and_then(|expense| expense.payee_name.clone()),
        None,
        sample.and_then(|expense| expense.memo.clone()),
        subtransactions,
        today,
    ))
}
