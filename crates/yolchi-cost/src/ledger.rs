// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Budget ledger document: the configured total override and every expense line.
//!
//! The whole ledger is read, modified and written back as one document.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use yolchi_core::Document;

/// Currency an expense was recorded in.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum Currency {
    /// Reference currency; summed unconverted.
    #[default]
    #[strum(serialize = "USD")]
    #[serde(rename = "USD")]
    Usd,
    /// Local currency, converted at the configured fixed rate.
    #[strum(serialize = "UZS")]
    #[serde(rename = "UZS")]
    Uzs,
}

impl Currency {
    /// `amount` in USD given `usd_to_local` local units per dollar.
    pub fn to_usd(self, amount: f64, usd_to_local: f64) -> f64 {
        match self {
            Currency::Usd => amount,
            Currency::Uzs => amount / usd_to_local,
        }
    }
}

/// One ledger line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseEntry {
    /// `exp_` followed by a UUID v4 in simple form.
    pub id: String,
    pub category_id: String,
    pub amount: f64,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub created_at: String,
}

impl ExpenseEntry {
    pub fn amount_usd(&self, usd_to_local: f64) -> f64 {
        self.currency.to_usd(self.amount, usd_to_local)
    }
}

/// Stored budget state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BudgetLedger {
    /// Operator-set total in USD; `None` uses the configured total.
    pub total_budget: Option<f64>,
    pub expenses: Vec<ExpenseEntry>,
    pub updated_at: Option<String>,
}

impl Document for BudgetLedger {
    const KEY: &'static str = "reactivation-budget";
}

impl BudgetLedger {
    /// USD spend of every expense whose category is in `category_ids`.
    pub fn spend_usd(&self, category_ids: &[&str], usd_to_local: f64) -> f64 {
        self.expenses
            .iter()
            .filter(|e| category_ids.contains(&e.category_id.as_str()))
            .map(|e| e.amount_usd(usd_to_local))
            .sum()
    }

    /// Remove the expense with `id`; returns whether one was removed.
    pub fn remove_expense(&mut self, id: &str) -> bool {
        let before = self.expenses.len();
        self.expenses.retain(|e| e.id != id);
        self.expenses.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expense(id: &str, category: &str, amount: f64, currency: Currency) -> ExpenseEntry {
        ExpenseEntry {
            id: id.into(),
            category_id: category.into(),
            amount,
            currency,
            description: String::new(),
            date: NaiveDate::from_ymd_opt(2026, 1, 30).unwrap(),
            created_at: String::new(),
        }
    }

    #[test]
    fn local_currency_is_converted() {
        assert!((Currency::Uzs.to_usd(129_000.0, 12_900.0) - 10.0).abs() < 1e-10);
        assert!((Currency::Usd.to_usd(42.0, 12_900.0) - 42.0).abs() < 1e-10);
    }

    #[test]
    fn spend_sums_selected_categories() {
        let ledger = BudgetLedger {
            expenses: vec![
                expense("1", "ads_regular", 100.0, Currency::Usd),
                expense("2", "ads", 25.0, Currency::Usd),
                expense("3", "ads_lead", 258_000.0, Currency::Uzs),
            ],
            ..BudgetLedger::default()
        };
        assert!((ledger.spend_usd(&["ads_regular", "ads"], 12_900.0) - 125.0).abs() < 1e-10);
        assert!((ledger.spend_usd(&["ads_lead"], 12_900.0) - 20.0).abs() < 1e-10);
    }

    #[test]
    fn remove_reports_whether_found() {
        let mut ledger = BudgetLedger {
            expenses: vec![expense("a", "sms", 1.0, Currency::Usd)],
            ..BudgetLedger::default()
        };
        assert!(!ledger.remove_expense("b"));
        assert!(ledger.remove_expense("a"));
        assert!(ledger.expenses.is_empty());
    }

    #[test]
    fn reads_stored_shape() {
        let raw = r#"{"totalBudget":4000,"expenses":[{"id":"exp_1","categoryId":"sms",
            "amount":150000,"currency":"UZS","description":"batch","date":"2026-01-29",
            "createdAt":"2026-01-29T10:00:00.000Z"}],"updatedAt":"2026-01-29T10:00:00.000Z"}"#;
        let ledger: BudgetLedger = serde_json::from_str(raw).unwrap();
        assert_eq!(ledger.total_budget, Some(4000.0));
        assert_eq!(ledger.expenses[0].currency, Currency::Uzs);
    }
}
