use serde::{Deserialize, Serialize};

use crate::domain::{Cents, Ledger};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryReport {
    pub categories: Vec<CategorySummary>,
    pub total: Cents,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    pub total: Cents,
    pub count: i64,
    pub average: Cents,
    pub percentage: f64,
}

/// Per-category spending breakdown.
///
/// Categories are grouped the same way filtering matches them (ignoring
/// case) and labelled with the first spelling recorded. Groups appear in the
/// order their first record was added. Group totals are bounded by the
/// ledger total, which the ledger keeps within [`Cents`].
pub fn build_category_report(ledger: &Ledger) -> CategoryReport {
    let mut groups: Vec<(String, String, Cents, i64)> = Vec::new();

    for expense in ledger {
        let key = expense.category().to_lowercase();
        match groups.iter_mut().find(|(k, ..)| *k == key) {
            Some((_, _, total, count)) => {
                *total = total.saturating_add(expense.amount_cents());
                *count += 1;
            }
            None => groups.push((
                key,
                expense.category().to_string(),
                expense.amount_cents(),
                1,
            )),
        }
    }

    let grand_total = ledger.total();
    let categories = groups
        .into_iter()
        .map(|(_, category, total, count)| CategorySummary {
            category,
            total,
            count,
            average: total / count,
            percentage: if grand_total > 0 {
                (total as f64 / grand_total as f64) * 100.0
            } else {
                0.0
            },
        })
        .collect();

    CategoryReport {
        categories,
        total: grand_total,
    }
}
