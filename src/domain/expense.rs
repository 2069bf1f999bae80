use std::cmp::Ordering;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Cents, format_cents};
use crate::error::LedgerError;

pub type RecordId = Uuid;

/// Lowercase and fold `-`/`_` into spaces so "credit_card" reads as "credit card".
fn normalize_label(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| if c == '_' || c == '-' { ' ' } else { c })
        .collect::<String>()
        .to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transport,
    Entertainment,
    Shopping,
    Bills,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Food,
        Category::Transport,
        Category::Entertainment,
        Category::Shopping,
        Category::Bills,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Entertainment => "Entertainment",
            Category::Shopping => "Shopping",
            Category::Bills => "Bills",
            Category::Other => "Other",
        }
    }
}

impl FromStr for Category {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_label(s);
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().to_lowercase() == wanted)
            .ok_or_else(|| {
                LedgerError::invalid(format!(
                    "unknown category '{}' (expected one of: Food, Transport, Entertainment, Shopping, Bills, Other)",
                    s
                ))
            })
    }
}

// Categories order by label so summaries print alphabetically.
impl Ord for Category {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl PartialOrd for Category {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    #[serde(rename = "Credit Card")]
    CreditCard,
    #[serde(rename = "Debit Card")]
    DebitCard,
    #[serde(rename = "UPI")]
    Upi,
    Other,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 5] = [
        PaymentMethod::Cash,
        PaymentMethod::CreditCard,
        PaymentMethod::DebitCard,
        PaymentMethod::Upi,
        PaymentMethod::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::CreditCard => "Credit Card",
            PaymentMethod::DebitCard => "Debit Card",
            PaymentMethod::Upi => "UPI",
            PaymentMethod::Other => "Other",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_label(s);
        PaymentMethod::ALL
            .into_iter()
            .find(|m| m.as_str().to_lowercase() == wanted)
            .ok_or_else(|| {
                LedgerError::invalid(format!(
                    "unknown payment method '{}' (expected one of: Cash, Credit Card, Debit Card, UPI, Other)",
                    s
                ))
            })
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single logged expense. Records are immutable once appended to a ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: RecordId,
    /// Calendar day of the purchase
    pub date: NaiveDate,
    pub category: Category,
    /// Amount in cents (never negative)
    pub amount_cents: Cents,
    /// Free-text notes, empty when none were given
    pub notes: String,
    pub payment_method: PaymentMethod,
}

impl ExpenseRecord {
    /// Textual form of every field, in export column order.
    /// Used for keyword search.
    pub fn field_texts(&self) -> [String; 5] {
        [
            self.date.format("%Y-%m-%d").to_string(),
            self.category.as_str().to_string(),
            format_cents(self.amount_cents),
            self.notes.clone(),
            self.payment_method.as_str().to_string(),
        ]
    }

    /// Returns true if any field contains `needle`, which must already be lowercase.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.field_texts()
            .iter()
            .any(|text| text.to_lowercase().contains(needle))
    }
}
