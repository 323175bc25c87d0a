use std::collections::BTreeSet;

use tracing::debug;

use super::{format_cents, Cents, Expense, ExpenseError};

/// Display symbol used when no other currency is configured.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

/// Ordered, append-only collection of the expenses recorded in one session.
///
/// Iteration order is always insertion order. All queries are pure.
///
/// The running total always fits in [`Cents`]; an append that would overflow
/// it is refused. Every sum over a subset of records therefore fits as well.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    expenses: Vec<Expense>,
    total: Cents,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate raw input and append the resulting record.
    /// On error the ledger is left untouched.
    pub fn add(&mut self, amount: &str, category: &str) -> Result<&Expense, ExpenseError> {
        let expense = Expense::parse(amount, category)?;
        self.push(expense)
    }

    /// Append an already-validated record.
    /// Fails with `InvalidAmount` if the ledger total would no longer fit in cents.
    pub fn push(&mut self, expense: Expense) -> Result<&Expense, ExpenseError> {
        let total = self
            .total
            .checked_add(expense.amount_cents())
            .ok_or_else(|| ExpenseError::InvalidAmount("total too large".to_string()))?;

        debug!(
            amount_cents = expense.amount_cents(),
            category = expense.category(),
            position = self.expenses.len(),
            "recorded expense"
        );
        self.total = total;
        self.expenses.push(expense);
        Ok(&self.expenses[self.expenses.len() - 1])
    }

    /// Sum of every recorded amount.
    pub fn total(&self) -> Cents {
        self.total
    }

    /// Records whose category equals `category`, ignoring case, in insertion order.
    pub fn filter_by_category(&self, category: &str) -> Vec<&Expense> {
        let matches: Vec<&Expense> = self
            .expenses
            .iter()
            .filter(|e| e.matches_category(category))
            .collect();
        debug!(category, matched = matches.len(), "filtered expenses");
        matches
    }

    /// Distinct category labels, exact case, sorted ascending.
    ///
    /// Unlike [`Ledger::filter_by_category`] this is case-sensitive: "Food"
    /// and "food" are listed separately.
    pub fn unique_categories(&self) -> Vec<String> {
        self.expenses
            .iter()
            .map(Expense::category)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Expense> {
        self.expenses.iter()
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Expense;
    type IntoIter = std::slice::Iter<'a, Expense>;

    fn into_iter(self) -> Self::IntoIter {
        self.expenses.iter()
    }
}

/// Render records one per line as `• Amount: <symbol><amount>, Category: <category>`.
/// An empty input renders as the empty string.
pub fn format_expenses<'a, I>(expenses: I, currency: &str) -> String
where
    I: IntoIterator<Item = &'a Expense>,
{
    expenses
        .into_iter()
        .map(|e| {
            format!(
                "• Amount: {}{}, Category: {}",
                currency,
                format_cents(e.amount_cents()),
                e.category()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Sum the amounts of an arbitrary selection of records.
///
/// Saturates at `Cents::MAX`; records drawn from one [`Ledger`] never reach it.
pub fn sum_expenses<'a, I>(expenses: I) -> Cents
where
    I: IntoIterator<Item = &'a Expense>,
{
    expenses
        .into_iter()
        .fold(0, |sum: Cents, e| sum.saturating_add(e.amount_cents()))
}
