use serde::{Deserialize, Serialize};

use super::{Cents, format_cents};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetState {
    UnderBudget,
    OverBudget,
}

impl BudgetState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetState::UnderBudget => "under budget",
            BudgetState::OverBudget => "over budget",
        }
    }
}

impl std::fmt::Display for BudgetState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Spending compared against a budget limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub state: BudgetState,
    pub total: Cents,
    pub limit: Cents,
    /// limit - total; negative when over budget
    pub remaining: Cents,
}

impl BudgetStatus {
    /// Spending exactly at the limit is still under budget.
    pub fn evaluate(total: Cents, limit: Cents) -> Self {
        let state = if total > limit {
            BudgetState::OverBudget
        } else {
            BudgetState::UnderBudget
        };
        Self {
            state,
            total,
            limit,
            remaining: limit - total,
        }
    }

    pub fn is_over(&self) -> bool {
        self.state == BudgetState::OverBudget
    }

    pub fn summary(&self) -> String {
        match self.state {
            BudgetState::OverBudget => format!(
                "Over budget: spent {} of {} ({} over)",
                format_cents(self.total),
                format_cents(self.limit),
                format_cents(-self.remaining)
            ),
            BudgetState::UnderBudget => format!(
                "Within budget: spent {} of {} ({} left)",
                format_cents(self.total),
                format_cents(self.limit),
                format_cents(self.remaining)
            ),
        }
    }
}
