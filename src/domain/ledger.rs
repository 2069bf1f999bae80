use std::collections::BTreeMap;

use chrono::NaiveDate;
use uuid::Uuid;

use super::{
    BudgetStatus, Category, Cents, ExpenseRecord, MonthKey, PaymentMethod, RecordId, Tally,
    format_cents,
};
use crate::error::{LedgerError, Result};

/// The ordered collection of expenses for one session.
///
/// Insertion order is entry order: `delete_last` always removes the record
/// appended most recently. All derived views are recomputed on every call.
///
/// Invariant: the running total fits in `Cents`, so sums over any subset of
/// the records do too.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    records: Vec<ExpenseRecord>,
    total: Cents,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new expense. Identical entries are all kept.
    /// An amount that would push the ledger total past `Cents::MAX` is rejected.
    pub fn add(
        &mut self,
        date: NaiveDate,
        category: Category,
        amount_cents: Cents,
        notes: impl Into<String>,
        payment_method: PaymentMethod,
    ) -> Result<RecordId> {
        if amount_cents < 0 {
            return Err(LedgerError::invalid(format!(
                "amount must not be negative (got {} cents)",
                amount_cents
            )));
        }

        let total = self.total.checked_add(amount_cents).ok_or_else(|| {
            LedgerError::invalid(format!(
                "amount {} would overflow the ledger total of {}",
                format_cents(amount_cents),
                format_cents(self.total)
            ))
        })?;

        let id = Uuid::new_v4();
        self.total = total;
        self.records.push(ExpenseRecord {
            id,
            date,
            category,
            amount_cents,
            notes: notes.into(),
            payment_method,
        });
        Ok(id)
    }

    /// Remove the most recently added expense. Returns None on an empty ledger.
    pub fn delete_last(&mut self) -> Option<ExpenseRecord> {
        let removed = self.records.pop()?;
        self.total -= removed.amount_cents;
        Some(removed)
    }

    pub fn all(&self) -> &[ExpenseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<&ExpenseRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn total(&self) -> Cents {
        self.total
    }

    /// Fold records into per-key totals and counts.
    fn tally_by<K: Ord>(&self, key: impl Fn(&ExpenseRecord) -> K) -> BTreeMap<K, Tally> {
        let mut tallies: BTreeMap<K, Tally> = BTreeMap::new();
        for record in &self.records {
            tallies.entry(key(record)).or_default().add(record.amount_cents);
        }
        tallies
    }

    /// Totals and counts for the categories that have at least one expense.
    pub fn category_tallies(&self) -> BTreeMap<Category, Tally> {
        self.tally_by(|r| r.category)
    }

    pub fn month_tallies(&self) -> BTreeMap<MonthKey, Tally> {
        self.tally_by(|r| MonthKey::of(r.date))
    }

    pub fn day_tallies(&self) -> BTreeMap<NaiveDate, Tally> {
        self.tally_by(|r| r.date)
    }

    /// Totals for the categories that have at least one expense.
    pub fn totals_by_category(&self) -> BTreeMap<Category, Cents> {
        totals_of(self.category_tallies())
    }

    pub fn totals_by_month(&self) -> BTreeMap<MonthKey, Cents> {
        totals_of(self.month_tallies())
    }

    pub fn totals_by_day(&self) -> BTreeMap<NaiveDate, Cents> {
        totals_of(self.day_tallies())
    }

    pub fn filter_by_category(&self, category: Category) -> Vec<ExpenseRecord> {
        self.records
            .iter()
            .filter(|r| r.category == category)
            .cloned()
            .collect()
    }

    /// Case-insensitive keyword search over every field of each record.
    /// Surrounding whitespace is ignored and an empty term matches everything.
    pub fn search(&self, term: &str) -> Vec<ExpenseRecord> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return self.records.clone();
        }
        self.records
            .iter()
            .filter(|r| r.matches_lowercase(&needle))
            .cloned()
            .collect()
    }

    /// Records ordered by amount. Equal amounts keep their entry order.
    pub fn sorted_by_amount(&self, ascending: bool) -> Vec<ExpenseRecord> {
        let mut sorted = self.records.clone();
        if ascending {
            sorted.sort_by_key(|r| r.amount_cents);
        } else {
            sorted.sort_by(|a, b| b.amount_cents.cmp(&a.amount_cents));
        }
        sorted
    }

    pub fn budget_status(&self, limit: Cents) -> BudgetStatus {
        BudgetStatus::evaluate(self.total(), limit)
    }
}

fn totals_of<K: Ord>(tallies: BTreeMap<K, Tally>) -> BTreeMap<K, Cents> {
    tallies.into_iter().map(|(k, t)| (k, t.total)).collect()
}
