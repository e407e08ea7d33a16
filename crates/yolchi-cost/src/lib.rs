// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Budget accounting for Yolchi campaigns.
//!
//! This crate provides:
//! - **Ledger**: the stored budget document and its expense lines
//! - **Budget**: USD summary by category and day-by-day expense splitting
//! - **Pricing**: per-unit cost against funnel stage counts

pub mod budget;
pub mod ledger;
pub mod pricing;

pub use budget::{
    BudgetSummary, CategoryTotals, NewExpense, add_expense, set_total_budget, split_date_range,
    summarize,
};
pub use ledger::{BudgetLedger, Currency, ExpenseEntry};
pub use pricing::{SmsCost, Spend, StageCosts, per_unit, sms_cost};
