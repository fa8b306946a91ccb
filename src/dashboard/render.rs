//! Plain-text rendering for the terminal

use std::fmt::Write;

use chrono::NaiveDateTime;

use super::card::{Card, CardState};
use super::DashboardSnapshot;
use crate::progress::Breakdown;

/// Width of the progress bar in characters
pub const BAR_WIDTH: usize = 30;

/// `[#######-------]` for a percent in 0..=100
pub fn progress_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// One card as two lines
pub fn render_card(card: &Card) -> String {
    match &card.state {
        CardState::Ok => {
            let flag = if card.near_complete { " *" } else { "" };
            format!(
                "{}{}\n  {} ({:.1}%)  {}",
                card.title,
                flag,
                progress_bar(card.percent, BAR_WIDTH),
                card.percent,
                card.detail
            )
        }
        CardState::Failed { error } => format!("{}\n  unavailable: {}", card.title, error),
    }
}

/// Header plus every card
pub fn render_snapshot(snapshot: &DashboardSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", snapshot.header);
    for card in &snapshot.cards {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", render_card(card));
    }
    out
}

/// Millisecond countdown line, `00:00:00.000` once the target has passed
pub fn precise_countdown(title: &str, target: NaiveDateTime, now: NaiveDateTime) -> String {
    let remaining = Breakdown::from_duration(target.signed_duration_since(now));
    format!("{}: {}", title, remaining.precise())
}
