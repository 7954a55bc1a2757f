//! Pure reductions over transaction amounts.
//!
//! Amounts are signed: positive rows are income, negative rows are expenses.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Category used for expenses without one.
pub const UNCATEGORIZED: &str = "Other";

/// Sum of absolute values of the negative amounts. Never negative.
#[must_use]
pub fn sum_spent<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .filter(Decimal::is_sign_negative)
        .map(|amount| amount.abs())
        .sum()
}

/// Sum of the positive amounts.
#[must_use]
pub fn sum_income<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .filter(|amount| *amount > Decimal::ZERO)
        .sum()
}

/// Spend grouped by currency code, for conversion into a budget currency.
#[must_use]
pub fn spend_by_currency<I, S>(rows: I) -> BTreeMap<String, Decimal>
where
    I: IntoIterator<Item = (S, Decimal)>,
    S: Into<String>,
{
    let mut totals = BTreeMap::new();
    for (currency, amount) in rows {
        if amount < Decimal::ZERO {
            *totals.entry(currency.into()).or_insert(Decimal::ZERO) += amount.abs();
        }
    }
    totals
}

/// Expense total for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// Category name.
    pub name: String,
    /// Absolute spend.
    pub amount: Decimal,
}

/// Income and expense summary over a month of transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// Month label, `YYYY-MM`.
    pub period: String,
    /// Sum of income rows.
    pub income: Decimal,
    /// Sum of absolute expense rows.
    pub expenses: Decimal,
    /// Income minus expenses.
    pub balance: Decimal,
    /// Most frequent currency among the rows.
    pub currency: String,
    /// Expenses per category, sorted by name.
    pub categories: Vec<CategoryTotal>,
}

impl MonthlySummary {
    /// Builds a summary from `(category, currency, amount)` rows.
    ///
    /// The currency is the most frequent one, ties going to the
    /// alphabetically first; `default_currency` is used when there are no rows.
    #[must_use]
    pub fn from_rows<'a, I>(period: String, default_currency: &str, rows: I) -> Self
    where
        I: IntoIterator<Item = (Option<&'a str>, &'a str, Decimal)>,
    {
        let mut income = Decimal::ZERO;
        let mut expenses = Decimal::ZERO;
        let mut currency_counts: BTreeMap<&str, usize> = BTreeMap::new();
        let mut categories: BTreeMap<String, Decimal> = BTreeMap::new();

        for (category, currency, amount) in rows {
            *currency_counts.entry(currency).or_default() += 1;
            if amount > Decimal::ZERO {
                income += amount;
            } else if amount < Decimal::ZERO {
                expenses += amount.abs();
                let name = category
                    .filter(|c| !c.trim().is_empty())
                    .unwrap_or(UNCATEGORIZED);
                *categories.entry(name.to_string()).or_default() += amount.abs();
            }
        }

        let currency = currency_counts
            .iter()
            .fold(None::<(&str, usize)>, |best, (code, count)| match best {
                Some((_, best_count)) if best_count >= *count => best,
                _ => Some((*code, *count)),
            })
            .map_or(default_currency, |(code, _)| code)
            .to_string();

        Self {
            period,
            income,
            expenses,
            balance: income - expenses,
            currency,
            categories: categories
                .into_iter()
                .map(|(name, amount)| CategoryTotal { name, amount })
                .collect(),
        }
    }
}
