// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Campaign records: marketing campaigns, SMS batches and their daily
//! expenses, kept in one document and replaced on every write.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::{debug, info};
use yolchi_core::{Document, YolchiError};
use yolchi_cost::split_date_range;

use crate::Campaign;

/// Record kinds accepted by [`NewRecord`], as they appear in `type`.
pub const RECORD_TYPES: [&str; 3] = ["campaign", "expense", "smsBatch"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CampaignChannel {
    Sms,
    Target,
    Telegram,
    Referral,
    Organic,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    #[default]
    Active,
    Paused,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignRecord {
    pub id: String,
    pub name: String,
    pub channel: CampaignChannel,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub budget: f64,
    /// Running total of the expenses booked against this campaign.
    #[serde(default)]
    pub spent: f64,
    #[serde(default)]
    pub status: CampaignStatus,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsBatch {
    pub id: String,
    pub campaign_id: String,
    pub sent_date: NaiveDate,
    #[serde(default)]
    pub phone_numbers: Vec<String>,
    #[serde(default)]
    pub total_sent: u64,
    #[serde(default)]
    pub delivered: u64,
    #[serde(default)]
    pub notes: String,
}

/// One day's share of a campaign expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyExpense {
    pub id: String,
    pub date: NaiveDate,
    pub campaign_id: String,
    pub amount: f64,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CampaignRecords {
    pub campaigns: Vec<CampaignRecord>,
    pub sms_batches: Vec<SmsBatch>,
    pub daily_expenses: Vec<DailyExpense>,
    pub last_updated: Option<String>,
}

impl Document for CampaignRecords {
    const KEY: &'static str = "campaigns-data";
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCampaign {
    pub name: String,
    pub channel: CampaignChannel,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub spent: Option<f64>,
    #[serde(default)]
    pub status: Option<CampaignStatus>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// An expense against a campaign, for one day or an inclusive range.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCampaignExpense {
    pub campaign_id: String,
    pub amount: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "dateFrom")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub date_to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSmsBatch {
    pub campaign_id: String,
    #[serde(default)]
    pub sent_date: Option<NaiveDate>,
    #[serde(default)]
    pub phone_numbers: Vec<String>,
    /// Defaults to the number of phone numbers.
    #[serde(default)]
    pub total_sent: Option<u64>,
    #[serde(default)]
    pub delivered: Option<u64>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A record to create, selected by `type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NewRecord {
    Campaign(NewCampaign),
    Expense(NewCampaignExpense),
    SmsBatch(NewSmsBatch),
}

impl NewRecord {
    /// Decode a request body, rejecting unknown `type` values before the
    /// fields are looked at.
    pub fn from_json(body: serde_json::Value) -> Result<Self, YolchiError> {
        let kind = body.get("type").and_then(serde_json::Value::as_str);
        match kind {
            Some(kind) if RECORD_TYPES.contains(&kind) => {}
            Some(kind) => {
                return Err(YolchiError::InvalidInput(format!(
                    "invalid record type `{kind}`"
                )));
            }
            None => return Err(YolchiError::InvalidInput("type is required".into())),
        }
        serde_json::from_value(body).map_err(|e| YolchiError::InvalidInput(e.to_string()))
    }
}

/// What a create produced. A single-day expense comes back as one line.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CreatedRecord {
    Campaign(CampaignRecord),
    Expense(DailyExpense),
    Expenses(Vec<DailyExpense>),
    SmsBatch(SmsBatch),
}

/// Fields to overwrite on an existing campaign; absent fields are kept.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CampaignPatch {
    pub id: String,
    pub name: Option<String>,
    pub channel: Option<CampaignChannel>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub budget: Option<f64>,
    pub spent: Option<f64>,
    pub status: Option<CampaignStatus>,
    pub notes: Option<String>,
}

fn new_id(prefix: &str) -> String {
    format!("{prefix}_{}", uuid::Uuid::new_v4().simple())
}

fn required(value: &str, field: &str) -> Result<(), YolchiError> {
    if value.trim().is_empty() {
        return Err(YolchiError::InvalidInput(format!("{field} is required")));
    }
    Ok(())
}

fn amount(value: Option<f64>, field: &str) -> Result<f64, YolchiError> {
    match value {
        None => Ok(0.0),
        Some(v) if v.is_finite() && v >= 0.0 => Ok(v),
        Some(_) => Err(YolchiError::InvalidInput(format!(
            "{field} must be a non-negative number"
        ))),
    }
}

impl CampaignRecords {
    fn campaign_mut(&mut self, id: &str) -> Option<&mut CampaignRecord> {
        self.campaigns.iter_mut().find(|c| c.id == id)
    }

    pub fn add_campaign(
        &mut self,
        new: NewCampaign,
        today: NaiveDate,
    ) -> Result<CampaignRecord, YolchiError> {
        required(&new.name, "name")?;
        let record = CampaignRecord {
            id: new_id("cmp"),
            name: new.name.trim().to_string(),
            channel: new.channel,
            start_date: new.start_date.unwrap_or(today),
            end_date: new.end_date,
            budget: amount(new.budget, "budget")?,
            spent: amount(new.spent, "spent")?,
            status: new.status.unwrap_or_default(),
            notes: new.notes.unwrap_or_default(),
        };
        self.campaigns.push(record.clone());
        Ok(record)
    }

    /// Split the expense into daily lines and add its amount to the
    /// campaign's `spent`, when that campaign exists.
    pub fn add_expense(
        &mut self,
        expense: NewCampaignExpense,
        today: NaiveDate,
    ) -> Result<Vec<DailyExpense>, YolchiError> {
        required(&expense.campaign_id, "campaignId")?;
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
        let lines: Vec<DailyExpense> = shares
            .into_iter()
            .map(|(date, amount)| DailyExpense {
                id: new_id("dexp"),
                date,
                campaign_id: expense.campaign_id.clone(),
                amount,
                description: description.clone(),
            })
            .collect();
        self.daily_expenses.extend(lines.iter().cloned());

        match self.campaign_mut(&expense.campaign_id) {
            Some(campaign) => campaign.spent += expense.amount,
            None => debug!(
                campaign_id = %expense.campaign_id,
                "expense recorded for an unknown campaign"
            ),
        }
        Ok(lines)
    }

    pub fn add_sms_batch(&mut self, batch: NewSmsBatch, today: NaiveDate) -> SmsBatch {
        let total_sent = batch
            .total_sent
            .filter(|n| *n > 0)
            .unwrap_or(batch.phone_numbers.len() as u64);
        let record = SmsBatch {
            id: new_id("sms"),
            campaign_id: batch.campaign_id,
            sent_date: batch.sent_date.unwrap_or(today),
            phone_numbers: batch.phone_numbers,
            total_sent,
            delivered: batch.delivered.unwrap_or(0),
            notes: batch.notes.unwrap_or_default(),
        };
        self.sms_batches.push(record.clone());
        record
    }

    /// Apply `patch` to the campaign it names.
    pub fn update_campaign(&mut self, patch: CampaignPatch) -> Result<CampaignRecord, YolchiError> {
        let budget = patch.budget.map(|b| amount(Some(b), "budget")).transpose()?;
        let spent = patch.spent.map(|s| amount(Some(s), "spent")).transpose()?;
        let campaign = self
            .campaign_mut(&patch.id)
            .ok_or_else(|| YolchiError::not_found("campaign", patch.id.as_str()))?;

        if let Some(name) = patch.name.filter(|n| !n.trim().is_empty()) {
            campaign.name = name.trim().to_string();
        }
        if let Some(channel) = patch.channel {
            campaign.channel = channel;
        }
        if let Some(start_date) = patch.start_date {
            campaign.start_date = start_date;
        }
        if patch.end_date.is_some() {
            campaign.end_date = patch.end_date;
        }
        if let Some(budget) = budget {
            campaign.budget = budget;
        }
        if let Some(spent) = spent {
            campaign.spent = spent;
        }
        if let Some(status) = patch.status {
            campaign.status = status;
        }
        if let Some(notes) = patch.notes {
            campaign.notes = notes;
        }
        Ok(campaign.clone())
    }
}

impl Campaign {
    pub async fn campaign_records(&self) -> Result<CampaignRecords, YolchiError> {
        self.documents.load().await
    }

    pub async fn create_record(&self, record: NewRecord) -> Result<CreatedRecord, YolchiError> {
        let mut records: CampaignRecords = self.documents.load().await?;
        let today = self.today();
        let created = match record {
            NewRecord::Campaign(new) => {
                let campaign = records.add_campaign(new, today)?;
                info!(id = %campaign.id, channel = %campaign.channel, "campaign created");
                CreatedRecord::Campaign(campaign)
            }
            NewRecord::Expense(expense) => {
                let mut lines = records.add_expense(expense, today)?;
                debug!(lines = lines.len(), "campaign expense recorded");
                if lines.len() == 1 {
                    CreatedRecord::Expense(lines.remove(0))
                } else {
                    CreatedRecord::Expenses(lines)
                }
            }
            NewRecord::SmsBatch(batch) => {
                let batch = records.add_sms_batch(batch, today);
                info!(id = %batch.id, total_sent = batch.total_sent, "sms batch recorded");
                CreatedRecord::SmsBatch(batch)
            }
        };
        records.last_updated = Some(self.timestamp());
        self.documents.save(&records).await?;
        Ok(created)
    }

    pub async fn update_campaign_record(
        &self,
        patch: CampaignPatch,
    ) -> Result<CampaignRecord, YolchiError> {
        let mut records: CampaignRecords = self.documents.load().await?;
        let campaign = records.update_campaign(patch)?;
        records.last_updated = Some(self.timestamp());
        self.documents.save(&records).await?;
        info!(id = %campaign.id, "campaign updated");
        Ok(campaign)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 7).unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, d).unwrap()
    }

    fn sms_campaign(records: &mut CampaignRecords) -> CampaignRecord {
        let new: NewCampaign =
            serde_json::from_value(json!({"name": "Feb SMS", "channel": "sms", "budget": 300}))
                .unwrap();
        records.add_campaign(new, today()).unwrap()
    }

    #[test]
    fn campaign_defaults_fill_in() {
        let mut records = CampaignRecords::default();
        let campaign = sms_campaign(&mut records);
        assert!(campaign.id.starts_with("cmp_"));
        assert_eq!(campaign.start_date, today());
        assert_eq!(campaign.end_date, None);
        assert_eq!(campaign.status, CampaignStatus::Active);
        assert!((campaign.budget - 300.0).abs() < 1e-10);
        assert!(campaign.notes.is_empty());
    }

    #[test]
    fn ranged_expense_splits_and_charges_campaign() {
        let mut records = CampaignRecords::default();
        let campaign = sms_campaign(&mut records);
        let lines = records
            .add_expense(
                NewCampaignExpense {
                    campaign_id: campaign.id.clone(),
                    amount: 100.0,
                    description: Some("Eskiz".into()),
                    date: Some(date(1)),
                    date_to: Some(date(3)),
                },
                today(),
            )
            .unwrap();

        let amounts: Vec<f64> = lines.iter().map(|l| l.amount).collect();
        assert_eq!(amounts, vec![33.0, 33.0, 34.0]);
        assert_eq!(lines[2].date, date(3));
        assert_eq!(lines[0].description, "Eskiz (2026-02-01 - 2026-02-03)");
        assert_eq!(records.daily_expenses.len(), 3);
        assert!((records.campaigns[0].spent - 100.0).abs() < 1e-10);
    }

    #[test]
    fn single_day_expense_keeps_description() {
        let mut records = CampaignRecords::default();
        let lines = records
            .add_expense(
                NewCampaignExpense {
                    campaign_id: "gone".into(),
                    amount: 12.5,
                    description: Some("banner".into()),
                    date: None,
                    date_to: None,
                },
                today(),
            )
            .unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].date, today());
        assert_eq!(lines[0].description, "banner");
    }

    #[test]
    fn sms_batch_counts_numbers_by_default() {
        let mut records = CampaignRecords::default();
        let batch = records.add_sms_batch(
            NewSmsBatch {
                campaign_id: "cmp_1".into(),
                sent_date: None,
                phone_numbers: vec!["998901111111".into(), "998902222222".into()],
                total_sent: None,
                delivered: Some(1),
                notes: None,
            },
            today(),
        );
        assert_eq!(batch.total_sent, 2);
        assert_eq!(batch.delivered, 1);
        assert_eq!(batch.sent_date, today());
    }

    #[test]
    fn patch_merges_and_misses_are_not_found() {
        let mut records = CampaignRecords::default();
        let campaign = sms_campaign(&mut records);
        let updated = records
            .update_campaign(CampaignPatch {
                id: campaign.id.clone(),
                status: Some(CampaignStatus::Paused),
                notes: Some("waiting on sender id".into()),
                ..CampaignPatch::default()
            })
            .unwrap();
        assert_eq!(updated.status, CampaignStatus::Paused);
        assert_eq!(updated.name, "Feb SMS");
        assert_eq!(updated.channel, CampaignChannel::Sms);

        let missing = records.update_campaign(CampaignPatch {
            id: "cmp_missing".into(),
            ..CampaignPatch::default()
        });
        assert!(matches!(missing, Err(YolchiError::NotFound { .. })));
    }

    #[test]
    fn record_type_is_checked_first() {
        let bad = NewRecord::from_json(json!({"type": "invoice", "amount": 5}));
        assert!(matches!(bad, Err(YolchiError::InvalidInput(m)) if m.contains("invoice")));
        let untyped = NewRecord::from_json(json!({"name": "x"}));
        assert!(matches!(untyped, Err(YolchiError::InvalidInput(_))));

        let batch =
            NewRecord::from_json(json!({"type": "smsBatch", "campaignId": "cmp_1"})).unwrap();
        assert!(matches!(batch, NewRecord::SmsBatch(b) if b.phone_numbers.is_empty()));
    }

    #[test]
    fn blank_name_and_negative_budget_are_rejected() {
        let mut records = CampaignRecords::default();
        let blank = records.add_campaign(
            NewCampaign {
                name: "  ".into(),
                channel: CampaignChannel::Organic,
                start_date: None,
                end_date: None,
                budget: None,
                spent: None,
                status: None,
                notes: None,
            },
            today(),
        );
        assert!(matches!(blank, Err(YolchiError::InvalidInput(_))));

        let negative = records.add_campaign(
            NewCampaign {
                name: "Referral".into(),
                channel: CampaignChannel::Referral,
                start_date: None,
                end_date: None,
                budget: Some(-1.0),
                spent: None,
                status: None,
                notes: None,
            },
            today(),
        );
        assert!(matches!(negative, Err(YolchiError::InvalidInput(_))));
        assert!(records.campaigns.is_empty());
    }
}
