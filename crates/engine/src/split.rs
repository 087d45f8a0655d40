//! Halving of the shared household expenses into an individual share.

use api_types::expenses::{MonthlyExpense, MonthlyExpenses};
use rand::Rng;

use crate::MoneyCents;

/// Direction used for the first odd cent met while splitting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rounding {
    Up,
    Down,
}

impl Rounding {
    /// Picks a direction at random, `Up` 40% of the time.
    pub fn random() -> Self {
        if rand::thread_rng().gen_bool(0.4) {
            Self::Up
        } else {
            Self::Down
        }
    }

    fn flip(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}

/// Computes the individual share of every shared expense.
///
/// Categories are visited in their natural order. Each amount is halved; when
/// the half is not a whole cent it is rounded in the current direction, which
/// then flips, so that odd cents alternate between the two parties.
///
/// The result starts from `template` (ids, payee, memo) and has every amount
/// replaced. Categories missing from the template are added with empty
/// metadata.
pub fn split_monthly_expenses(
    shared: &MonthlyExpenses,
    template: &MonthlyExpenses,
    first: Rounding,
) -> MonthlyExpenses {
    let mut individual = template.clone();
    let mut rounding = first;

    for (category, expense) in &shared.expenses {
        let amount = MoneyCents::coerce(&expense.amount);
        let share = amount.half(rounding == Rounding::Up);
        if amount.is_odd() {
            rounding = rounding.flip();
        }

        individual
            .expenses
            .entry(*category)
            .or_insert_with(MonthlyExpense::default)
            .amount = share.to_string();
    }

    individual
}

#[cfg(test)]
mod tests {
    use api_types::ExpenseCategory;

    use super::*;

    fn expenses(amounts: [(ExpenseCategory, &str); 4]) -> MonthlyExpenses {
        MonthlyExpenses {
            budget_id: "budget".to_string(),
            account_id: "account".to_string(),
            expenses: amounts
                .into_iter()
                .map(|(category, amount)| {
                    (
                        category,
                        MonthlyExpense {
                            amount: amount.to_string(),
                            ..MonthlyExpense::default()
                        },
                    )
                })
                .collect(),
        }
    }

    fn shared() -> MonthlyExpenses {
        expenses([
            (ExpenseCategory::Condominium, "245.75"),
            (ExpenseCategory::Electricity, "130.52"),
            (ExpenseCategory::TvInternetPhone, "85.90"),
            (ExpenseCategory::Water, "60.25"),
        ])
    }

    fn template() -> MonthlyExpenses {
        let mut template = expenses([
            (ExpenseCategory::Condominium, "0"),
            (ExpenseCategory::Electricity, "0"),
            (ExpenseCategory::TvInternetPhone, "0"),
            (ExpenseCategory::Water, "0"),
        ]);
        template.budget_id = "individual-budget".to_string();
        template
    }

    #[test]
    fn round_up_first_alternates() {
        let individual = split_monthly_expenses(&shared(), &template(), Rounding::Up);

        assert_eq!(individual.budget_id, "individual-budget");
        assert_eq!(individual.amount(ExpenseCategory::Condominium), "122.88");
        assert_eq!(individual.amount(ExpenseCategory::Electricity), "65.26");
        assert_eq!(individual.amount(ExpenseCategory::TvInternetPhone), "42.95");
        assert_eq!(individual.amount(ExpenseCategory::Water), "30.12");
    }

    #[test]
    fn round_down_first_alternates() {
        let individual = split_monthly_expenses(&shared(), &template(), Rounding::Down);

        assert_eq!(individual.amount(ExpenseCategory::Condominium), "122.87");
        assert_eq!(individual.amount(ExpenseCategory::Electricity), "65.26");
        assert_eq!(individual.amount(ExpenseCategory::TvInternetPhone), "42.95");
        assert_eq!(individual.amount(ExpenseCategory::Water), "30.13");
    }

    #[test]
    fn invalid_shared_amounts_split_as_zero() {
        let shared = expenses([
            (ExpenseCategory::Condominium, "100.00"),
            (ExpenseCategory::Electricity, "50"),
            (ExpenseCategory::TvInternetPhone, "20.5"),
            (ExpenseCategory::Water, "-3"),
        ]);

        let individual = split_monthly_expenses(&shared, &MonthlyExpenses::default(), Rounding::Up);

        assert_eq!(individual.amount(ExpenseCategory::Condominium), "50.00");
        assert_eq!(individual.amount(ExpenseCategory::Electricity), "25.00");
        assert_eq!(individual.amount(ExpenseCategory::TvInternetPhone), "10.25");
        assert_eq!(individual.amount(ExpenseCategory::Water), "0.00");
    }

    #[test]
    fn random_rounding_picks_both_directions() {
        let draws: Vec<Rounding> = (0..1000).map(|_| Rounding::random()).collect();
        let up = draws.iter().filter(|rounding| **rounding == Rounding::Up).count();

        assert!((250..550).contains(&up), "{up} of 1000 rounded up");
    }
}
