// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Linear campaign pacing against an active-driver target.
//!
//! The campaign day rolls over at local midnight for a fixed UTC offset,
//! independent of the server time zone.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

/// Campaign calendar and target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PacingPlan {
    pub start_date: NaiveDate,
    pub duration_days: u32,
    pub target: u32,
}

/// Pacing report for one `current` count.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pacing {
    pub goal: u32,
    pub current: u64,
    /// Percent of goal reached, one decimal.
    pub progress: f64,
    pub days_passed: i64,
    pub days_remaining: i64,
    /// Per-day rate still needed to reach the goal, one decimal.
    pub daily_required: f64,
    /// Observed per-day rate so far, one decimal.
    pub current_rate: f64,
    /// Constant per-day rate of the linear plan, one decimal.
    pub daily_target: f64,
    pub expected_by_today: i64,
    pub difference: i64,
    pub on_track: bool,
}

/// Calendar date at `utc_offset_hours` for the instant `now`.
pub fn local_today(now: DateTime<Utc>, utc_offset_hours: i32) -> NaiveDate {
    (now + Duration::hours(i64::from(utc_offset_hours))).date_naive()
}

/// Round to one decimal; halves round up.
pub fn round1(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

impl PacingPlan {
    /// Days since the start, counting the start day as day 1; never below 1.
    pub fn days_passed(&self, today: NaiveDate) -> i64 {
        ((today - self.start_date).num_days() + 1).max(1)
    }

    /// Pace `current` as of `today`.
    pub fn evaluate(&self, current: u64, today: NaiveDate) -> Pacing {
        let duration = i64::from(self.duration_days);
        let goal = f64::from(self.target);
        let achieved = current as f64;

        let days_passed = self.days_passed(today);
        let days_remaining = (duration - days_passed).max(0);
        let daily_target = ratio(goal, duration as f64);
        let expected_by_today = (daily_target * days_passed as f64).round() as i64;
        let difference = i64::try_from(current).unwrap_or(i64::MAX) - expected_by_today;
        let daily_required = if days_remaining > 0 {
            (goal - achieved) / days_remaining as f64
        } else {
            0.0
        };

        Pacing {
            goal: self.target,
            current,
            progress: round1(ratio(achieved, goal) * 100.0),
            days_passed,
            days_remaining,
            daily_required: round1(daily_required),
            current_rate: round1(achieved / days_passed as f64),
            daily_target: round1(daily_target),
            expected_by_today,
            difference,
            on_track: difference >= 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn plan(target: u32) -> PacingPlan {
        PacingPlan {
            start_date: date(2026, 1, 1),
            duration_days: 30,
            target,
        }
    }

    #[test]
    fn expected_follows_linear_plan() {
        let pacing = plan(300).evaluate(80, date(2026, 1, 10));
        assert_eq!(pacing.days_passed, 10);
        assert_eq!(pacing.days_remaining, 20);
        assert_eq!(pacing.expected_by_today, 100);
        assert_eq!(pacing.difference, -20);
        assert!(!pacing.on_track);
        assert!((pacing.daily_required - 11.0).abs() < 1e-10);
        assert!((pacing.current_rate - 8.0).abs() < 1e-10);
        assert!((pacing.daily_target - 10.0).abs() < 1e-10);
        assert!((pacing.progress - 26.7).abs() < 1e-10);
    }

    #[test]
    fn meeting_expectation_is_on_track() {
        let pacing = plan(300).evaluate(100, date(2026, 1, 10));
        assert_eq!(pacing.difference, 0);
        assert!(pacing.on_track);
    }

    #[test]
    fn before_start_counts_as_day_one() {
        let pacing = plan(250).evaluate(0, date(2025, 12, 20));
        assert_eq!(pacing.days_passed, 1);
        assert_eq!(pacing.expected_by_today, 8);
    }

    #[test]
    fn after_end_requires_nothing_more() {
        let pacing = plan(250).evaluate(100, date(2026, 3, 15));
        assert_eq!(pacing.days_remaining, 0);
        assert!((pacing.daily_required - 0.0).abs() < 1e-10);
    }

    #[test]
    fn overshoot_gives_negative_requirement() {
        let pacing = plan(30).evaluate(45, date(2026, 1, 11));
        assert!((pacing.daily_required - (-0.8)).abs() < 1e-10);
    }

    #[test]
    fn today_uses_fixed_offset() {
        let late_utc = Utc.with_ymd_and_hms(2026, 1, 28, 20, 0, 0).unwrap();
        assert_eq!(local_today(late_utc, 5), date(2026, 1, 29));
        assert_eq!(local_today(late_utc, 0), date(2026, 1, 28));
    }

    #[test]
    fn zero_target_does_not_divide_by_zero() {
        let pacing = PacingPlan {
            start_date: date(2026, 1, 1),
            duration_days: 0,
            target: 0,
        }
        .evaluate(5, date(2026, 1, 2));
        assert!((pacing.progress - 0.0).abs() < 1e-10);
        assert_eq!(pacing.expected_by_today, 0);
        assert!(pacing.on_track);
    }
}
