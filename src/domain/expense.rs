use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{parse_cents, Cents};

/// A single spending event. Records are immutable once appended to a ledger.
///
/// Fields are private so every record, including deserialized ones, goes
/// through the same validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawExpense")]
pub struct Expense {
    /// Amount in cents (never negative)
    amount_cents: Cents,
    /// Free-text label, trimmed, case preserved
    category: String,
}

#[derive(Deserialize)]
struct RawExpense {
    amount_cents: Cents,
    category: String,
}

impl TryFrom<RawExpense> for Expense {
    type Error = ExpenseError;

    fn try_from(raw: RawExpense) -> Result<Self, Self::Error> {
        Expense::new(raw.amount_cents, raw.category)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpenseError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Category is required.")]
    InvalidCategory,
}

impl Expense {
    /// Build a record from raw user input.
    ///
    /// This is the only place amount and category text are validated; a
    /// ledger never sees a record that did not pass through here (or through
    /// [`Expense::new`] with already-typed values).
    pub fn parse(amount: &str, category: &str) -> Result<Self, ExpenseError> {
        let amount = amount.trim();
        let amount_cents = parse_cents(amount)
            .map_err(|e| ExpenseError::InvalidAmount(format!("'{amount}': {e}")))?;
        if amount_cents < 0 {
            return Err(ExpenseError::InvalidAmount(format!(
                "'{amount}': amount must not be negative"
            )));
        }

        let category = category.trim();
        if category.is_empty() {
            return Err(ExpenseError::InvalidCategory);
        }

        Ok(Self {
            amount_cents,
            category: category.to_string(),
        })
    }

    /// Build a record from typed values.
    pub fn new(amount_cents: Cents, category: impl Into<String>) -> Result<Self, ExpenseError> {
        if amount_cents < 0 {
            return Err(ExpenseError::InvalidAmount(
                "amount must not be negative".to_string(),
            ));
        }
        let category = category.into().trim().to_string();
        if category.is_empty() {
            return Err(ExpenseError::InvalidCategory);
        }
        Ok(Self {
            amount_cents,
            category,
        })
    }

    pub fn amount_cents(&self) -> Cents {
        self.amount_cents
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Case-insensitive category comparison used by filtering.
    pub fn matches_category(&self, category: &str) -> bool {
        self.category.to_lowercase() == category.to_lowercase()
    }
}
