//! Dashboard cards
//!
//! A card is the rendered state of one widget at one instant. Cards are
//! plain data so the terminal renderer and the HTTP API share them.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::progress::{Breakdown, ProgressResult};

/// Percent thresholds a card reports once reached
pub const MILESTONES: [u8; 4] = [25, 50, 75, 90];

/// Above this percent a card is flagged as nearly complete
pub const NEAR_COMPLETE_PERCENT: f64 = 95.0;

/// Whether a card tracks a calendar period or counts down to a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    Period,
    Countdown,
}

/// Outcome of computing a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CardState {
    Ok,
    Failed { error: String },
}

/// One widget's state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub key: String,
    pub title: String,
    pub kind: CardKind,
    pub detail: String,
    pub percent: f64,
    pub target: Option<NaiveDateTime>,
    /// Time already spent inside the card's window
    pub elapsed: Breakdown,
    pub remaining_seconds: i64,
    pub milestones: Vec<u8>,
    pub near_complete: bool,
    pub state: CardState,
}

impl Card {
    /// Build a card from a computed progress result
    pub fn from_progress(
        key: impl Into<String>,
        title: impl Into<String>,
        kind: CardKind,
        detail: impl Into<String>,
        target: Option<NaiveDateTime>,
        progress: &ProgressResult,
    ) -> Self {
        let percent = progress.percent;
        Self {
            key: key.into(),
            title: title.into(),
            kind,
            detail: detail.into(),
            percent,
            target,
            elapsed: progress.elapsed,
            remaining_seconds: progress.remaining.total_seconds(),
            milestones: reached_milestones(percent),
            near_complete: percent > NEAR_COMPLETE_PERCENT,
            state: CardState::Ok,
        }
    }

    /// A card whose widget could not be computed
    pub fn failed(
        key: impl Into<String>,
        title: impl Into<String>,
        kind: CardKind,
        error: impl std::fmt::Display,
    ) -> Self {
        let error = error.to_string();
        Self {
            key: key.into(),
            title: title.into(),
            kind,
            detail: format!("unavailable: {}", error),
            percent: 0.0,
            target: None,
            elapsed: Breakdown::default(),
            remaining_seconds: 0,
            milestones: Vec::new(),
            near_complete: false,
            state: CardState::Failed { error },
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, CardState::Failed { .. })
    }

    /// Sort key: periods first in insertion order, then countdowns by
    /// remaining time, then failures
    fn rank(&self) -> (u8, i64) {
        match (&self.state, self.kind) {
            (CardState::Failed { .. }, _) => (2, 0),
            (CardState::Ok, CardKind::Period) => (0, 0),
            (CardState::Ok, CardKind::Countdown) => (1, self.remaining_seconds),
        }
    }
}

/// Milestones at or below `percent`
pub fn reached_milestones(percent: f64) -> Vec<u8> {
    MILESTONES
        .iter()
        .copied()
        .filter(|m| percent >= f64::from(*m))
        .collect()
}

/// Order cards for display (stable)
pub fn sort_cards(cards: &mut [Card]) {
    cards.sort_by_key(Card::rank);
}
