//! Tap scoring and milestone announcements

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::grid::TargetKind;
use crate::tuning::Messages;

/// A milestone threshold and its announcement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Milestone<'a> {
    pub threshold: u32,
    pub message: &'a str,
}

/// Score thresholds with one-time congratulatory messages, ascending by threshold
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MilestoneTable(BTreeMap<u32, String>);

impl MilestoneTable {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (u32, S)>,
        S: Into<String>,
    {
        Self(entries.into_iter().map(|(t, m)| (t, m.into())).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = Milestone<'_>> {
        self.0.iter().map(|(&threshold, message)| Milestone {
            threshold,
            message: message.as_str(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn remove(&mut self, threshold: u32) -> Option<String> {
        self.0.remove(&threshold)
    }

    /// Highest milestone in `(from, to]` that has not been announced yet
    pub fn crossed(&self, from: u32, to: u32, shown: &BTreeSet<u32>) -> Option<Milestone<'_>> {
        if to <= from {
            return None;
        }
        self.0
            .range(from + 1..=to)
            .rev()
            .find(|(threshold, _)| !shown.contains(*threshold))
            .map(|(&threshold, message)| Milestone {
                threshold,
                message: message.as_str(),
            })
    }
}

/// Result of resolving one tap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TapOutcome {
    /// Signed change to apply to the score (already floored at zero)
    pub score_delta: i32,
    /// Announcement text
    pub message: String,
    /// Milestone threshold to mark as shown
    pub milestone: Option<u32>,
}

impl TapOutcome {
    /// Score after applying the delta to `score`
    pub fn apply(&self, score: u32) -> u32 {
        score.saturating_add_signed(self.score_delta)
    }
}

/// Work out what a tap on a target of `kind` is worth at the current `score`.
///
/// Obstacles take `penalty` points but never push the score below zero. Normal
/// targets add one point and may announce the first milestone reached.
pub fn resolve_tap(
    kind: TargetKind,
    score: u32,
    penalty: u32,
    milestones: &MilestoneTable,
    shown: &BTreeSet<u32>,
    messages: &Messages,
) -> TapOutcome {
    match kind {
        TargetKind::Obstacle => {
            let taken = penalty.min(score);
            TapOutcome {
                score_delta: -(taken as i32),
                message: messages.penalty_notice(penalty),
                milestone: None,
            }
        }
        TargetKind::Normal => {
            let new_score = score.saturating_add(1);
            match milestones.crossed(score, new_score, shown) {
                Some(m) => TapOutcome {
                    score_delta: 1,
                    message: m.message.to_string(),
                    milestone: Some(m.threshold),
                },
                None => TapOutcome {
                    score_delta: 1,
                    message: messages.hit.clone(),
                    milestone: None,
                },
            }
        }
    }
}
