//! Budget period arithmetic.
//!
//! All windows are inclusive on both ends.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Recurrence granularity of a budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum PeriodKind {
    /// One calendar day.
    Daily,
    /// Monday through Sunday.
    Weekly,
    /// One calendar month.
    #[default]
    Monthly,
    /// One calendar year.
    Yearly,
}

impl PeriodKind {
    /// Parses a period name, falling back to monthly for anything unknown.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Self::Daily,
            "weekly" => Self::Weekly,
            "yearly" => Self::Yearly,
            _ => Self::Monthly,
        }
    }

    /// Returns the stored name of the period.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl From<String> for PeriodKind {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl std::fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the last day of the given month.
#[must_use]
pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

/// Computes the inclusive window of the period containing `anchor`.
#[must_use]
pub fn period_window(kind: PeriodKind, anchor: NaiveDate) -> (NaiveDate, NaiveDate) {
    match kind {
        PeriodKind::Daily => (anchor, anchor),
        PeriodKind::Weekly => {
            let offset = u64::from(anchor.weekday().num_days_from_monday());
            let start = anchor
                .checked_sub_days(Days::new(offset))
                .unwrap_or(anchor);
            let end = start
                .checked_add_days(Days::new(6))
                .unwrap_or(NaiveDate::MAX);
            (start, end)
        }
        PeriodKind::Monthly => {
            let start = anchor.with_day(1).unwrap_or(anchor);
            let end = last_day_of_month(anchor.year(), anchor.month()).unwrap_or(NaiveDate::MAX);
            (start, end)
        }
        PeriodKind::Yearly => {
            let start = anchor.with_ordinal(1).unwrap_or(anchor);
            let end = NaiveDate::from_ymd_opt(anchor.year(), 12, 31).unwrap_or(NaiveDate::MAX);
            (start, end)
        }
    }
}

/// Start of the period following the one that begins on `start`.
///
/// Monthly and yearly steps keep the day of month, clamped to the last day
/// of the target month (Jan 31 -> Feb 28/29, Feb 29 -> Feb 28).
#[must_use]
pub fn next_period_start(kind: PeriodKind, start: NaiveDate) -> Option<NaiveDate> {
    match kind {
        PeriodKind::Daily => start.checked_add_days(Days::new(1)),
        PeriodKind::Weekly => start.checked_add_days(Days::new(7)),
        PeriodKind::Monthly => start.checked_add_months(Months::new(1)),
        PeriodKind::Yearly => start.checked_add_months(Months::new(12)),
    }
}

/// Dates whose expenses count toward a budget on `today`.
///
/// The anchor is `today` clamped into the budget's own range; the period
/// window around it is then clipped to that range.
#[must_use]
pub fn tracking_window(
    kind: PeriodKind,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    today: NaiveDate,
) -> (NaiveDate, NaiveDate) {
    let mut anchor = today.max(start_date);
    if let Some(end) = end_date {
        anchor = anchor.min(end);
    }

    let (start, end) = period_window(kind, anchor);
    let start = start.max(start_date);
    let end = end_date.map_or(end, |limit| end.min(limit));
    (start, end)
}
