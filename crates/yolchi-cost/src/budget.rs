// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Budget summary and expense entry.
//!
//! Every expense is converted to USD at the configured fixed rate before it
//! is summed. Remaining budget is not floored, so overspend shows as a
//! negative value. Multi-day expenses are split into one line per day whose
//! amounts add up to the original total.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use yolchi_config::model::BudgetConfig;
use yolchi_core::YolchiError;

use crate::ledger::{BudgetLedger, Currency, ExpenseEntry};

/// Share of the budget at which an approaching-limit warning is logged.
const WARN_RATIO: f64 = 0.8;

/// Per-category totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CategoryTotals {
    /// Sum of lines recorded in USD.
    #[serde(rename = "totalUSD")]
    pub total_usd: f64,
    /// Sum of lines recorded in local currency, unconverted.
    #[serde(rename = "totalUZS")]
    pub total_local: f64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    pub total_budget: f64,
    pub total_spent: f64,
    pub remaining: f64,
    pub by_category: BTreeMap<String, CategoryTotals>,
    pub exchange_rate: f64,
}

/// Totals over the ledger; lines in unconfigured categories are left out.
pub fn summarize(ledger: &BudgetLedger, config: &BudgetConfig) -> BudgetSummary {
    let mut by_category: BTreeMap<String, CategoryTotals> = config
        .categories
        .iter()
        .map(|c| (c.id.clone(), CategoryTotals::default()))
        .collect();

    let mut total_spent = 0.0;
    let mut ignored = 0usize;
    for expense in &ledger.expenses {
        let Some(totals) = by_category.get_mut(&expense.category_id) else {
            ignored += 1;
            continue;
        };
        totals.count += 1;
        match expense.currency {
            Currency::Usd => totals.total_usd += expense.amount,
            Currency::Uzs => totals.total_local += expense.amount,
        }
        total_spent += expense.amount_usd(config.usd_to_local);
    }
    if ignored > 0 {
        warn!(ignored, "expenses in unconfigured categories left out of the summary");
    }

    let total_budget = ledger.total_budget.unwrap_or(config.total_budget_usd);
    if total_budget > 0.0 {
        if total_spent >= total_budget {
            warn!(total_spent, total_budget, "budget exhausted");
        } else if total_spent >= total_budget * WARN_RATIO {
            warn!(total_spent, total_budget, "approaching budget limit (80%+)");
        }
    }

    BudgetSummary {
        total_budget,
        total_spent,
        remaining: total_budget - total_spent,
        by_category,
        exchange_rate: config.usd_to_local,
    }
}

/// An expense as submitted, before splitting.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub category_id: String,
    pub amount: f64,
    #[serde(default)]
    pub currency: Option<Currency>,
    #[serde(default)]
    pub description: Option<String>,
    /// Day of the expense, or first day of a range. Defaults to today.
    #[serde(default, alias = "dateFrom")]
    pub date: Option<NaiveDate>,
    /// Last day of a range, inclusive.
    #[serde(default)]
    pub date_to: Option<NaiveDate>,
}

/// Round half up to a whole number.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Divide `amount` over the inclusive range `from..=to`.
///
/// Each day gets `round(amount / days)`; the last day takes what is left so
/// the shares sum to `amount`.
pub fn split_date_range(
    amount: f64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<(NaiveDate, f64)>, YolchiError> {
    if to < from {
        return Err(YolchiError::InvalidInput(format!(
            "date range ends ({to}) before it starts ({from})"
        )));
    }
    let days = (to - from).num_days() + 1;
    let per_day = round_half_up(amount / days as f64);

    let shares = from
        .iter_days()
        .take(usize::try_from(days).unwrap_or(usize::MAX))
        .enumerate()
        .map(|(i, date)| {
            let share = if i as i64 == days - 1 {
                amount - per_day * (days - 1) as f64
            } else {
                per_day
            };
            (date, share)
        })
        .collect();
    Ok(shares)
}

fn new_expense_id() -> String {
    format!("exp_{}", uuid::Uuid::new_v4().simple())
}

/// Validate `expense`, split it by day and append the lines to the ledger.
///
/// Returns the appended lines, each stamped with `created_at`. `today` fills
/// a missing date.
pub fn add_expense(
    ledger: &mut BudgetLedger,
    config: &BudgetConfig,
    expense: NewExpense,
    today: NaiveDate,
    created_at: &str,
) -> Result<Vec<ExpenseEntry>, YolchiError> {
    if expense.category_id.trim().is_empty() {
        return Err(YolchiError::InvalidInput("categoryId is required".into()));
    }
    if config.category(&expense.category_id).is_none() {
        return Err(YolchiError::InvalidInput(format!(
            "unknown expense category `{}`",
            expense.category_id
        )));
    }
    if !expense.amount.is_finite() {
        return Err(YolchiError::InvalidInput("amount must be a number".into()));
    }

    let from = expense.date.unwrap_or(today);
    let to = expense.date_to.unwrap_or(from);
    let shares = split_date_range(expense.amount, from, to)?;
    let description = expense.description.unwrap_or_default();
    let description = if shares.len() > 1 {
        format!("{description} ({from} - {to})").trim().to_string()
    } else {
        description
    };
    let lines: Vec<ExpenseEntry> = shares
        .into_iter()
        .map(|(date, amount)| ExpenseEntry {
            id: new_expense_id(),
            category_id: expense.category_id.clone(),
            amount,
            currency: expense.currency.unwrap_or_default(),
            description: description.clone(),
            date,
            created_at: created_at.to_string(),
        })
        .collect();

    debug!(
        category = %expense.category_id,
        amount = expense.amount,
        lines = lines.len(),
        "expense recorded"
    );
    ledger.expenses.extend(lines.iter().cloned());
    Ok(lines)
}

/// Replace the operator-set total.
pub fn set_total_budget(ledger: &mut BudgetLedger, total_usd: f64) -> Result<(), YolchiError> {
    if !total_usd.is_finite() || total_usd < 0.0 {
        return Err(YolchiError::InvalidInput(
            "totalBudget must be a non-negative number".into(),
        ));
    }
    ledger.total_budget = Some(total_usd);
    Ok(())
}
