use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::Cents;

/// Running total and record count for one group of expenses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub total: Cents,
    pub count: usize,
}

impl Tally {
    /// Callers only tally records of a ledger whose total already fits in `Cents`.
    pub fn add(&mut self, amount_cents: Cents) {
        self.total += amount_cents;
        self.count += 1;
    }

    /// Integer average in cents, 0 for an empty tally.
    pub fn average(&self) -> Cents {
        if self.count == 0 {
            0
        } else {
            self.total / self.count as Cents
        }
    }
}

/// Calendar month used to group expenses. Orders chronologically and
/// displays as "March 2025".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

impl MonthKey {
    /// `month` is 1-based and must be in 1..=12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12)
            .contains(&month)
            .then_some(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[(self.month - 1) as usize]
    }

    pub fn label(&self) -> String {
        format!("{} {:04}", self.month_name(), self.year)
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {:04}", self.month_name(), self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_key_label() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        assert_eq!(MonthKey::of(date).label(), "March 2025");
        assert_eq!(MonthKey::new(2024, 12).unwrap().to_string(), "December 2024");
        assert_eq!(MonthKey::new(987, 1).unwrap().label(), "January 0987");
    }

    #[test]
    fn test_tally() {
        let mut tally = Tally::default();
        assert_eq!(tally.average(), 0);
        tally.add(1000);
        tally.add(501);
        assert_eq!(tally, Tally { total: 1501, count: 2 });
        assert_eq!(tally.average(), 750);
    }

    #[test]
    fn test_month_key_rejects_invalid_month() {
        assert!(MonthKey::new(2025, 0).is_none());
        assert!(MonthKey::new(2025, 13).is_none());
    }

    #[test]
    fn test_month_key_orders_chronologically() {
        let dec = MonthKey::new(2024, 12).unwrap();
        let jan = MonthKey::new(2025, 1).unwrap();
        let mar = MonthKey::new(2025, 3).unwrap();
        assert!(dec < jan);
        assert!(jan < mar);
    }
}
