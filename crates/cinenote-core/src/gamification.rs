//! Rank and streak derivation.
//!
//! Everything here is a pure function of the review collection, the
//! milestone table and (for streaks) an evaluation instant. Nothing is
//! stored; callers recompute after every mutation.

use crate::milestones::{Milestone, MilestoneTable};
use chrono::{DateTime, Local, NaiveDate, TimeZone};
use cinenote_config::MaxRankPolicy;
use cinenote_models::Review;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GamificationState {
    /// Tag of the active milestone
    pub role: String,
    pub title: String,
    pub description: String,
    /// Position of the active milestone in the table
    pub level: usize,
    pub next_milestone: u32,
    /// Percentage toward `next_milestone`, within 0..=100
    pub progress: f64,
    pub streak: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RankStatus {
    Unlocked,
    Current,
    Locked,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LadderEntry {
    pub milestone: Milestone,
    pub status: RankStatus,
}

pub struct GamificationEngine {
    table: MilestoneTable,
    policy: MaxRankPolicy,
}

impl GamificationEngine {
    pub fn new(table: MilestoneTable, policy: MaxRankPolicy) -> Self {
        Self { table, policy }
    }

    /// State as of now, in the local time zone
    pub fn compute(&self, reviews: &[Review]) -> GamificationState {
        self.compute_at(reviews, &Local::now())
    }

    pub fn compute_at<Tz: TimeZone>(&self, reviews: &[Review], now: &DateTime<Tz>) -> GamificationState {
        let count = review_count(reviews);
        let level = self.table.active_index(count);
        let active = &self.table.milestones()[level];
        let (next_milestone, progress) = self.next_target(count, level);

        GamificationState {
            role: active.role.clone(),
            title: active.title.clone(),
            description: active.description.clone(),
            level,
            next_milestone,
            progress,
            streak: streak_at(reviews.iter().map(|r| r.created_at), now),
        }
    }

    fn next_target(&self, count: u32, level: usize) -> (u32, f64) {
        let base = self.table.milestones()[level].threshold;

        if !self.table.is_top(level) {
            let next = self.table.milestones()[level + 1].threshold;
            return (next, percent(count, base, next));
        }

        match self.policy {
            // The target recedes as the count grows
            MaxRankPolicy::Doubling => {
                let next = count.saturating_mul(2);
                (next, percent(count, base, next))
            }
            MaxRankPolicy::Pinned => (base, 100.0),
        }
    }

    /// Every milestone with its unlock status for the given count
    pub fn ladder(&self, count: u32) -> Vec<LadderEntry> {
        let level = self.table.active_index(count);
        self.table
            .milestones()
            .iter()
            .enumerate()
            .map(|(index, milestone)| {
                let status = if index == level {
                    RankStatus::Current
                } else if count >= milestone.threshold {
                    RankStatus::Unlocked
                } else {
                    RankStatus::Locked
                };
                LadderEntry { milestone: milestone.clone(), status }
            })
            .collect()
    }
}

fn review_count(reviews: &[Review]) -> u32 {
    u32::try_from(reviews.len()).unwrap_or(u32::MAX)
}

fn percent(count: u32, base: u32, next: u32) -> f64 {
    if next <= base {
        // Only reachable at count 0 on a single-tier table under doubling
        return 0.0;
    }
    let gained = count.saturating_sub(base) as f64;
    let needed = (next - base) as f64;
    (gained / needed * 100.0).clamp(0.0, 100.0)
}

/// Films still needed for the next tier, or `None` once nothing is left to unlock
pub fn films_to_next(state: &GamificationState, count: u32) -> Option<u32> {
    let remaining = state.next_milestone.saturating_sub(count);
    if remaining > 0 {
        Some(remaining)
    } else {
        None
    }
}

/// Consecutive calendar days with at least one review, ending today or yesterday.
///
/// Days are taken in the time zone of `now`. A newest day older than
/// yesterday means the streak is broken and the result is 0.
pub fn streak_at<Tz, I>(timestamps: I, now: &DateTime<Tz>) -> u32
where
    Tz: TimeZone,
    I: IntoIterator<Item = i64>,
{
    let tz = now.timezone();
    let mut days: Vec<NaiveDate> = timestamps
        .into_iter()
        .filter_map(|millis| tz.timestamp_millis_opt(millis).single())
        .map(|instant| instant.date_naive())
        .collect();

    if days.is_empty() {
        return 0;
    }

    days.sort_unstable_by(|a, b| b.cmp(a));
    days.dedup();

    let today = now.date_naive();
    let yesterday = today.pred_opt();
    let newest = days[0];
    if newest != today && Some(newest) != yesterday {
        return 0;
    }

    let mut streak = 1;
    let mut last = newest;
    for day in days.iter().skip(1) {
        if last.signed_duration_since(*day).num_days() == 1 {
            streak += 1;
            last = *day;
        } else {
            break;
        }
    }
    streak
}

#[cfg(test)]
mod tests;
