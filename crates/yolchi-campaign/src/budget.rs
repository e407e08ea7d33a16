// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Budget ledger operations.

use serde::{Deserialize, Serialize};
use tracing::info;
use yolchi_config::model::CategoryConfig;
use yolchi_core::YolchiError;
use yolchi_cost::{
    BudgetLedger, BudgetSummary, ExpenseEntry, NewExpense, add_expense, set_total_budget,
    summarize,
};

/// Stored ledger plus its summary and the configured categories.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetReport {
    pub total_budget: f64,
    pub expenses: Vec<ExpenseEntry>,
    pub updated_at: Option<String>,
    pub summary: BudgetSummary,
    pub categories: Vec<CategoryConfig>,
}

/// Either or both of a new total and a new expense.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BudgetUpdate {
    pub total_budget: Option<f64>,
    pub expense: Option<NewExpense>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetChange {
    /// Lines appended by this update; several for a date range.
    pub added: Vec<ExpenseEntry>,
    pub summary: BudgetSummary,
}

impl crate::Campaign {
    fn budget_report_of(&self, ledger: BudgetLedger) -> BudgetReport {
        let budget = &self.config.budget;
        let summary = summarize(&ledger, budget);
        BudgetReport {
            total_budget: summary.total_budget,
            expenses: ledger.expenses,
            updated_at: ledger.updated_at,
            summary,
            categories: budget.categories.clone(),
        }
    }

    pub async fn budget_report(&self) -> Result<BudgetReport, YolchiError> {
        let ledger: BudgetLedger = self.documents.load().await?;
        Ok(self.budget_report_of(ledger))
    }

    pub async fn update_budget(&self, update: BudgetUpdate) -> Result<BudgetChange, YolchiError> {
        if update.total_budget.is_none() && update.expense.is_none() {
            return Err(YolchiError::InvalidInput(
                "totalBudget or expense is required".into(),
            ));
        }
        let mut ledger: BudgetLedger = self.documents.load().await?;
        if let Some(total) = update.total_budget {
            set_total_budget(&mut ledger, total)?;
            info!(total_usd = total, "budget total set");
        }
        let now = self.timestamp();
        let added = match update.expense {
            Some(expense) => {
                add_expense(&mut ledger, &self.config.budget, expense, self.today(), &now)?
            }
            None => Vec::new(),
        };
        ledger.updated_at = Some(now);
        self.documents.save(&ledger).await?;

        Ok(BudgetChange {
            added,
            summary: summarize(&ledger, &self.config.budget),
        })
    }

    pub async fn delete_expense(&self, id: &str) -> Result<BudgetReport, YolchiError> {
        let mut ledger: BudgetLedger = self.documents.load().await?;
        if !ledger.remove_expense(id) {
            return Err(YolchiError::not_found("expense", id));
        }
        ledger.updated_at = Some(self.timestamp());
        self.documents.save(&ledger).await?;
        info!(id, "expense deleted");
        Ok(self.budget_report_of(ledger))
    }
}
