use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Due-date policy for schedule entries.
///
/// Dating is a strategy separate from the payment math so the stepping rule
/// can change without touching the amortization recurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentDating {
    /// Fixed stride of whole days per period. The historical convention is
    /// a 30-day stride rather than true calendar months.
    FixedStride { days: u32 },
    /// True calendar months, clamped to the last day of short months.
    CalendarMonths,
}

impl Default for PaymentDating {
    fn default() -> Self {
        PaymentDating::FixedStride { days: 30 }
    }
}

impl PaymentDating {
    /// Due date for 1-based period `period`, counted from `start`.
    pub fn date_for(&self, start: NaiveDate, period: u32) -> NaiveDate {
        match self {
            PaymentDating::FixedStride { days } => start
                .checked_add_days(Days::new(u64::from(*days) * u64::from(period)))
                .unwrap_or(NaiveDate::MAX),
            PaymentDating::CalendarMonths => start
                .checked_add_months(Months::new(period))
                .unwrap_or(NaiveDate::MAX),
        }
    }
}
