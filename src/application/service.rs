use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::domain::{
    BudgetStatus, Category, Cents, ExpenseRecord, Ledger, MonthKey, PaymentMethod, RecordId,
    format_cents, parse_cents,
};
use crate::error::{LedgerError, Result};

use super::{CategoryReport, DailyReport, MonthlyReport, Overview};

/// Session service providing high-level operations on one expense ledger.
/// This is the primary interface for any presentation layer (CLI, TUI, web form).
///
/// The service owns the ledger for the lifetime of a session; dropping it
/// discards every record.
#[derive(Debug, Default)]
pub struct ExpenseService {
    ledger: Ledger,
    budget_limit: Option<Cents>,
}

/// Raw user input for a new expense, as received from a form or command line.
#[derive(Debug, Clone, Default)]
pub struct ExpenseInput {
    pub date: String,
    pub category: String,
    pub amount: String,
    pub notes: Option<String>,
    pub payment_method: String,
}

pub fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|_| {
        LedgerError::invalid(format!(
            "invalid date '{}', expected YYYY-MM-DD",
            date_str
        ))
    })
}

/// Parse a user-supplied amount; negative values are rejected.
pub fn parse_amount(amount: &str) -> Result<Cents> {
    let cents = parse_cents(amount)
        .map_err(|e| LedgerError::invalid(format!("amount '{}': {}", amount, e)))?;
    if cents < 0 {
        return Err(LedgerError::invalid(format!(
            "amount must not be negative (got {})",
            amount.trim()
        )));
    }
    Ok(cents)
}

impl ExpenseService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_budget(limit: Cents) -> Self {
        Self {
            ledger: Ledger::new(),
            budget_limit: Some(limit),
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    // ========================
    // Mutations
    // ========================

    /// Record a typed expense.
    pub fn add_expense(
        &mut self,
        date: NaiveDate,
        category: Category,
        amount_cents: Cents,
        notes: Option<String>,
        payment_method: PaymentMethod,
    ) -> Result<RecordId> {
        let id = self.ledger.add(
            date,
            category,
            amount_cents,
            notes.unwrap_or_default(),
            payment_method,
        )?;

        info!(
            %id,
            %date,
            %category,
            amount = %format_cents(amount_cents),
            %payment_method,
            "Expense added"
        );
        self.warn_if_over_budget();
        Ok(id)
    }

    /// Validate raw input and record it. Nothing is stored when any field is invalid.
    pub fn add_expense_input(&mut self, input: ExpenseInput) -> Result<RecordId> {
        let date = parse_date(&input.date)?;
        let category: Category = input.category.parse()?;
        let amount_cents = parse_amount(&input.amount)?;
        let payment_method: PaymentMethod = input.payment_method.parse()?;

        self.add_expense(date, category, amount_cents, input.notes, payment_method)
    }

    /// Remove the most recently added expense, if any.
    pub fn delete_last(&mut self) -> Option<ExpenseRecord> {
        let removed = self.ledger.delete_last();
        match &removed {
            Some(record) => info!(id = %record.id, "Last expense deleted"),
            None => debug!("Delete requested on empty ledger"),
        }
        removed
    }

    // ========================
    // Budget
    // ========================

    pub fn set_budget(&mut self, limit: Cents) -> Result<BudgetStatus> {
        if limit < 0 {
            return Err(LedgerError::invalid("budget limit must not be negative"));
        }
        self.budget_limit = Some(limit);
        debug!(limit = %format_cents(limit), "Budget limit set");
        self.warn_if_over_budget();
        Ok(self.ledger.budget_status(limit))
    }

    pub fn clear_budget(&mut self) {
        self.budget_limit = None;
        debug!("Budget limit cleared");
    }

    pub fn budget_limit(&self) -> Option<Cents> {
        self.budget_limit
    }

    /// Budget status against the session limit, if one is set.
    pub fn budget_status(&self) -> Option<BudgetStatus> {
        self.budget_limit
            .map(|limit| self.ledger.budget_status(limit))
    }

    /// Budget status against an explicit limit.
    pub fn budget_status_for(&self, limit: Cents) -> BudgetStatus {
        self.ledger.budget_status(limit)
    }

    fn warn_if_over_budget(&self) {
        if let Some(status) = self.budget_status() {
            if status.is_over() {
                warn!(
                    total = %format_cents(status.total),
                    limit = %format_cents(status.limit),
                    "Budget exceeded"
                );
            }
        }
    }

    // ========================
    // Queries
    // ========================

    pub fn list(&self) -> &[ExpenseRecord] {
        self.ledger.all()
    }

    pub fn total(&self) -> Cents {
        self.ledger.total()
    }

    pub fn totals_by_category(&self) -> BTreeMap<Category, Cents> {
        self.ledger.totals_by_category()
    }

    pub fn totals_by_month(&self) -> BTreeMap<MonthKey, Cents> {
        self.ledger.totals_by_month()
    }

    pub fn totals_by_day(&self) -> BTreeMap<NaiveDate, Cents> {
        self.ledger.totals_by_day()
    }

    pub fn filter_by_category(&self, category: Category) -> Vec<ExpenseRecord> {
        let results = self.ledger.filter_by_category(category);
        debug!(%category, matches = results.len(), "Filtered by category");
        results
    }

    pub fn search(&self, term: &str) -> Vec<ExpenseRecord> {
        let results = self.ledger.search(term);
        debug!(term, matches = results.len(), "Searched expenses");
        results
    }

    pub fn sorted_by_amount(&self, ascending: bool) -> Vec<ExpenseRecord> {
        self.ledger.sorted_by_amount(ascending)
    }

    // ========================
    // Reports
    // ========================

    pub fn category_report(&self) -> CategoryReport {
        CategoryReport::build(&self.ledger)
    }

    pub fn monthly_report(&self) -> MonthlyReport {
        MonthlyReport::build(&self.ledger)
    }

    pub fn daily_report(&self) -> DailyReport {
        DailyReport::build(&self.ledger)
    }

    pub fn overview(&self) -> Overview {
        Overview {
            record_count: self.ledger.len(),
            total: self.ledger.total(),
            budget: self.budget_status(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(date: &str, category: &str, amount: &str, payment: &str) -> ExpenseInput {
        ExpenseInput {
            date: date.into(),
            category: category.into(),
            amount: amount.into(),
            notes: None,
            payment_method: payment.into(),
        }
    }

    #[test]
    fn test_add_expense_input() {
        let mut service = ExpenseService::new();
        let id = service
            .add_expense_input(input("2025-03-01", "food", "100", "credit card"))
            .unwrap();

        let record = service.ledger().get(id).unwrap();
        assert_eq!(record.category, Category::Food);
        assert_eq!(record.amount_cents, 10000);
        assert_eq!(record.payment_method, PaymentMethod::CreditCard);
        assert_eq!(record.notes, "");
    }

    #[test]
    fn test_add_expense_input_rejects_bad_fields() {
        let mut service = ExpenseService::new();
        let cases = [
            input("2025-13-01", "Food", "10", "Cash"),
            input("2025-03-01", "Rent", "10", "Cash"),
            input("2025-03-01", "Food", "-10", "Cash"),
            input("2025-03-01", "Food", "ten", "Cash"),
            input("2025-03-01", "Food", "10", "Cheque"),
        ];
        for case in cases {
            let err = service.add_expense_input(case).unwrap_err();
            assert!(err.is_invalid_input(), "unexpected error: {}", err);
        }
        assert!(service.list().is_empty());
    }

    #[test]
    fn test_budget_lifecycle() {
        let mut service = ExpenseService::new();
        assert!(service.budget_status().is_none());

        service
            .add_expense_input(input("2025-03-01", "Bills", "150", "UPI"))
            .unwrap();
        let status = service.set_budget(15000).unwrap();
        assert!(!status.is_over());

        service
            .add_expense_input(input("2025-03-02", "Bills", "0.01", "UPI"))
            .unwrap();
        assert!(service.budget_status().unwrap().is_over());

        service.clear_budget();
        assert!(service.budget_status().is_none());
        assert!(service.set_budget(-1).is_err());
    }

    #[test]
    fn test_overview() {
        let mut service = ExpenseService::with_budget(1000);
        service
            .add_expense_input(input("2025-03-01", "Other", "12.50", "Cash"))
            .unwrap();
        let overview = service.overview();
        assert_eq!(overview.record_count, 1);
        assert_eq!(overview.total, 1250);
        assert!(overview.budget.unwrap().is_over());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("0").unwrap(), 0);
        assert_eq!(parse_amount("19.99").unwrap(), 1999);
        assert!(parse_amount("-0.01").unwrap_err().is_invalid_input());
    }
}
