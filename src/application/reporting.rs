use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{BudgetStatus, Category, Cents, Ledger};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryReport {
    pub categories: Vec<CategorySummary>,
    pub total: Cents,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: Category,
    pub total: Cents,
    pub count: usize,
    pub average: Cents,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyReport {
    pub months: Vec<MonthSummary>,
    pub total: Cents,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthSummary {
    pub label: String,
    pub year: i32,
    pub month: u32,
    pub total: Cents,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyReport {
    pub days: Vec<DaySummary>,
    pub total: Cents,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub total: Cents,
    pub count: usize,
}

/// Headline numbers for the current session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Overview {
    pub record_count: usize,
    pub total: Cents,
    pub budget: Option<BudgetStatus>,
}

/// Share of `part` in `total` as a percentage; 0 when nothing was spent.
pub(crate) fn percentage(part: Cents, total: Cents) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

impl CategoryReport {
    pub fn build(ledger: &Ledger) -> Self {
        let total = ledger.total();
        let categories = ledger
            .category_tallies()
            .into_iter()
            .map(|(category, tally)| CategorySummary {
                category,
                total: tally.total,
                count: tally.count,
                average: tally.average(),
                percentage: percentage(tally.total, total),
            })
            .collect();

        Self { categories, total }
    }
}

impl MonthlyReport {
    pub fn build(ledger: &Ledger) -> Self {
        let months = ledger
            .month_tallies()
            .into_iter()
            .map(|(key, tally)| MonthSummary {
                label: key.label(),
                year: key.year,
                month: key.month,
                total: tally.total,
                count: tally.count,
            })
            .collect();

        Self {
            months,
            total: ledger.total(),
        }
    }
}

impl DailyReport {
    pub fn build(ledger: &Ledger) -> Self {
        let days = ledger
            .day_tallies()
            .into_iter()
            .map(|(date, tally)| DaySummary {
                date,
                total: tally.total,
                count: tally.count,
            })
            .collect();

        Self {
            days,
            total: ledger.total(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PaymentMethod;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ledger() -> Ledger {
        let mut ledger = Ledger::new();
        for (d, category, amount) in [
            (date(2025, 4, 1), Category::Food, 2000),
            (date(2025, 3, 1), Category::Food, 10000),
            (date(2025, 3, 2), Category::Transport, 5000),
            (date(2025, 3, 2), Category::Food, 3000),
        ] {
            ledger
                .add(d, category, amount, "", PaymentMethod::Cash)
                .unwrap();
        }
        ledger
    }

    #[test]
    fn test_category_report() {
        let report = CategoryReport::build(&ledger());
        assert_eq!(report.total, 20000);
        assert_eq!(report.categories.len(), 2);

        let food = &report.categories[0];
        assert_eq!(food.category, Category::Food);
        assert_eq!(food.total, 15000);
        assert_eq!(food.count, 3);
        assert_eq!(food.average, 5000);
        assert!((food.percentage - 75.0).abs() < 0.001);

        assert_eq!(report.categories[1].category, Category::Transport);
    }

    #[test]
    fn test_monthly_report_is_chronological() {
        let report = MonthlyReport::build(&ledger());
        let labels: Vec<_> = report.months.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, ["March 2025", "April 2025"]);
        assert_eq!(report.months[0].total, 18000);
        assert_eq!(report.months[0].count, 3);
        assert_eq!(report.total, 20000);
    }

    #[test]
    fn test_daily_report() {
        let report = DailyReport::build(&ledger());
        assert_eq!(report.days.len(), 3);
        assert_eq!(report.days[1].date, date(2025, 3, 2));
        assert_eq!(report.days[1].total, 8000);
        assert_eq!(report.days[1].count, 2);
    }

    #[test]
    fn test_reports_match_ledger_views() {
        let ledger = ledger();

        let by_category = ledger.totals_by_category();
        let report = CategoryReport::build(&ledger);
        assert_eq!(report.categories.len(), by_category.len());
        for summary in &report.categories {
            assert_eq!(by_category[&summary.category], summary.total);
        }

        let by_month = ledger.totals_by_month();
        let report = MonthlyReport::build(&ledger);
        let months: Vec<_> = report.months.iter().map(|m| (m.label.clone(), m.total)).collect();
        let expected: Vec<_> = by_month.iter().map(|(k, t)| (k.label(), *t)).collect();
        assert_eq!(months, expected);

        let by_day = ledger.totals_by_day();
        let report = DailyReport::build(&ledger);
        let days: Vec<_> = report.days.iter().map(|d| (d.date, d.total)).collect();
        let expected: Vec<_> = by_day.into_iter().collect();
        assert_eq!(days, expected);
    }

    #[test]
    fn test_reports_on_empty_input() {
        let empty = Ledger::new();
        let report = CategoryReport::build(&empty);
        assert!(report.categories.is_empty());
        assert_eq!(report.total, 0);
        assert!(MonthlyReport::build(&empty).months.is_empty());
        assert!(DailyReport::build(&empty).days.is_empty());
        assert_eq!(percentage(0, 0), 0.0);
    }
}
