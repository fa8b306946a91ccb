//! Dashboard snapshots
//!
//! Computes every widget from a single instant and orders the resulting
//! cards for display. A widget that fails to compute becomes a failed card
//! and leaves the others untouched.

pub mod calendar;
pub mod card;
pub mod render;
pub mod widget;

pub use calendar::CalendarHeader;
pub use card::{sort_cards, Card, CardKind, CardState};
pub use widget::{build_widgets, default_festivals, WidgetSpec};

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::festival::{
    salary_progress, workday_progress, FestivalError, FestivalResolver, FestivalSpec,
    SalaryRule, WorkdayRule, WorkdayStatus,
};
use crate::progress::{
    compute_progress, days_in_month, days_in_year, CountdownFormat, PeriodWindow,
};

/// Every card at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub generated_at: NaiveDateTime,
    pub header: CalendarHeader,
    pub cards: Vec<Card>,
}

impl DashboardSnapshot {
    pub fn card(&self, key: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.key == key)
    }
}

/// A configured set of widgets
#[derive(Debug, Clone)]
pub struct Dashboard {
    widgets: Vec<WidgetSpec>,
    resolver: FestivalResolver,
    format: CountdownFormat,
}

impl Dashboard {
    pub fn new(widgets: Vec<WidgetSpec>, resolver: FestivalResolver) -> Self {
        Self {
            widgets,
            resolver,
            format: CountdownFormat::default(),
        }
    }

    /// Builder method: set the countdown text layout
    pub fn with_format(mut self, format: CountdownFormat) -> Self {
        self.format = format;
        self
    }

    pub fn widgets(&self) -> &[WidgetSpec] {
        &self.widgets
    }

    pub fn resolver(&self) -> &FestivalResolver {
        &self.resolver
    }

    /// Compute all cards at `now`
    pub fn snapshot(&self, now: NaiveDateTime) -> DashboardSnapshot {
        let mut cards: Vec<Card> = self.widgets.iter().map(|w| self.card(w, now)).collect();
        sort_cards(&mut cards);

        DashboardSnapshot {
            generated_at: now,
            header: CalendarHeader::at(now, self.resolver.lunar()),
            cards,
        }
    }

    /// Compute a single widget's card
    pub fn card(&self, widget: &WidgetSpec, now: NaiveDateTime) -> Card {
        let key = widget.key();
        let result = match widget {
            WidgetSpec::Today => period_card(&key, "Today", PeriodWindow::day_of(now), now, |p| {
                format!("{}h {}m elapsed", p.elapsed.total_hours(), p.elapsed.minutes)
            }),
            WidgetSpec::Week => period_card(&key, "This Week", PeriodWindow::week_of(now), now, |p| {
                elapsed_detail(p, now.weekday().number_from_monday(), 7)
            }),
            WidgetSpec::Month => {
                let total = days_in_month(now.year(), now.month()).unwrap_or(31);
                period_card(&key, "This Month", PeriodWindow::month_of(now), now, |p| {
                    elapsed_detail(p, now.day(), total)
                })
            }
            WidgetSpec::Year => {
                let total = days_in_year(now.year());
                period_card(&key, "This Year", PeriodWindow::year_of(now), now, |p| {
                    elapsed_detail(p, now.ordinal(), total)
                })
            }
            WidgetSpec::Festival(spec) => self.festival_card(&key, spec, now),
            WidgetSpec::Workday(rule) => workday_card(&key, rule, now),
            WidgetSpec::Salary(rule) => self.salary_card(&key, rule, now),
        };

        result.unwrap_or_else(|e| {
            tracing::warn!(widget = %key, error = %e, "Widget computation failed");
            Card::failed(key.clone(), title_of(widget), card_kind(widget), e)
        })
    }

    fn festival_card(
        &self,
        key: &str,
        spec: &FestivalSpec,
        now: NaiveDateTime,
    ) -> Result<Card, FestivalError> {
        let festival = self.resolver.festival_progress(spec, now)?;
        let next = festival.occurrences.next;
        let remaining = festival.progress.remaining;
        let detail = if remaining.is_zero() {
            format!("{} is here", spec.name)
        } else {
            remaining.countdown(self.format)
        };

        Ok(Card::from_progress(
            key,
            format!("{} {}", spec.name, next.year()),
            CardKind::Countdown,
            detail,
            Some(next),
            &festival.progress,
        ))
    }

    fn salary_card(
        &self,
        key: &str,
        rule: &SalaryRule,
        now: NaiveDateTime,
    ) -> Result<Card, FestivalError> {
        let salary = salary_progress(rule, now)?;
        let detail = if salary.is_payday {
            "Payday today".to_string()
        } else {
            salary.progress.remaining.countdown(self.format)
        };

        let mut card = Card::from_progress(
            key,
            "Next Payday",
            CardKind::Countdown,
            detail,
            Some(salary.next),
            &salary.progress,
        );
        if salary.is_payday {
            card.remaining_seconds = 0;
        }
        Ok(card)
    }
}

fn period_card(
    key: &str,
    title: &str,
    window: Result<PeriodWindow, crate::progress::WindowError>,
    now: NaiveDateTime,
    detail: impl FnOnce(&crate::progress::ProgressResult) -> String,
) -> Result<Card, FestivalError> {
    let window = window?;
    let progress = compute_progress(&window, now);
    Ok(Card::from_progress(
        key,
        title,
        CardKind::Period,
        detail(&progress),
        Some(window.end()),
        &progress,
    ))
}

/// `2d 12h 0m elapsed, day 3 of 7`
fn elapsed_detail(progress: &crate::progress::ProgressResult, day: u32, total: u32) -> String {
    let e = progress.elapsed;
    format!(
        "{}d {}h {}m elapsed, day {} of {}",
        e.days, e.hours, e.minutes, day, total
    )
}

fn workday_card(key: &str, rule: &WorkdayRule, now: NaiveDateTime) -> Result<Card, FestivalError> {
    let workday = workday_progress(rule, now)?;
    let remaining = workday.progress.remaining;
    let detail = match workday.status {
        WorkdayStatus::Weekend => "Weekend, no countdown".to_string(),
        WorkdayStatus::BeforeWork => format!("Work starts at {}", rule.start),
        WorkdayStatus::Working => format!(
            "{:02}:{:02}:{:02} until {}",
            remaining.total_hours(),
            remaining.minutes,
            remaining.seconds,
            rule.end
        ),
        WorkdayStatus::OffWork => "Off work".to_string(),
    };

    Ok(Card::from_progress(
        key,
        "Off Work",
        CardKind::Countdown,
        detail,
        workday.window.map(|w| w.end()),
        &workday.progress,
    ))
}

fn title_of(widget: &WidgetSpec) -> String {
    match widget {
        WidgetSpec::Today => "Today".to_string(),
        WidgetSpec::Week => "This Week".to_string(),
        WidgetSpec::Month => "This Month".to_string(),
        WidgetSpec::Year => "This Year".to_string(),
        WidgetSpec::Festival(spec) => spec.name.clone(),
        WidgetSpec::Workday(_) => "Off Work".to_string(),
        WidgetSpec::Salary(_) => "Next Payday".to_string(),
    }
}

fn card_kind(widget: &WidgetSpec) -> CardKind {
    match widget {
        WidgetSpec::Today | WidgetSpec::Week | WidgetSpec::Month | WidgetSpec::Year => {
            CardKind::Period
        }
        _ => CardKind::Countdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::festival::{FestivalRule, SalaryRule, WorkdayRule};
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn default_dashboard() -> Dashboard {
        Dashboard::new(
            build_widgets(
                &default_festivals(),
                WorkdayRule::default(),
                SalaryRule::default(),
            ),
            FestivalResolver::default(),
        )
    }

    #[test]
    fn test_snapshot_has_every_widget() {
        let dashboard = default_dashboard();
        let snapshot = dashboard.snapshot(at(2025, 3, 12, 10, 0));
        assert_eq!(snapshot.cards.len(), dashboard.widgets().len());
        assert!(snapshot.cards.iter().all(|c| !c.is_failed()));
        assert_eq!(snapshot.generated_at, at(2025, 3, 12, 10, 0));
    }

    #[test]
    fn test_periods_first_then_by_remaining() {
        let snapshot = default_dashboard().snapshot(at(2025, 3, 12, 10, 0));
        let keys: Vec<_> = snapshot.cards.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(&keys[..4], &["today", "week", "month", "year"]);

        let countdowns = &snapshot.cards[4..];
        for pair in countdowns.windows(2) {
            assert!(pair[0].remaining_seconds <= pair[1].remaining_seconds);
        }
        // Off work at 17:00 is the nearest target on a Wednesday morning
        assert_eq!(countdowns[0].key, "off-work");
    }

    #[test]
    fn test_period_details() {
        let snapshot = default_dashboard().snapshot(at(2025, 3, 12, 12, 0));
        let today = snapshot.card("today").unwrap();
        assert!((today.percent - 50.0).abs() < 1e-9);
        assert_eq!(today.detail, "12h 0m elapsed");
        assert_eq!(today.milestones, vec![25, 50]);

        assert_eq!(today.elapsed.hours, 12);

        let week = snapshot.card("week").unwrap();
        assert_eq!(week.detail, "2d 12h 0m elapsed, day 3 of 7");
        assert_eq!(week.elapsed.days, 2);
        assert_eq!(week.elapsed.hours, 12);

        let month = snapshot.card("month").unwrap();
        assert_eq!(month.detail, "11d 12h 0m elapsed, day 12 of 31");
        assert_eq!(month.elapsed.days, 11);

        let year = snapshot.card("year").unwrap();
        assert_eq!(year.detail, "70d 12h 0m elapsed, day 71 of 365");
        assert_eq!(year.elapsed.days, 70);
        assert_eq!(year.elapsed.minutes, 0);
    }

    #[test]
    fn test_elapsed_serialized_on_cards() {
        let snapshot = default_dashboard().snapshot(at(2025, 3, 12, 12, 0));
        let json = serde_json::to_value(snapshot.card("week").unwrap()).unwrap();
        assert_eq!(json["elapsed"]["days"], 2);
        assert_eq!(json["elapsed"]["hours"], 12);
    }

    #[test]
    fn test_spring_festival_measures_from_year_start() {
        // 9 of the 28 days between Jan 1 and Spring Festival (Jan 29) have passed
        let snapshot = default_dashboard().snapshot(at(2025, 1, 10, 0, 0));
        let spring = snapshot.card("spring-festival").unwrap();
        assert_eq!(spring.target, Some(at(2025, 1, 29, 0, 0)));
        assert!((spring.percent - 9.0 / 28.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_festival_card() {
        let snapshot = default_dashboard().snapshot(at(2025, 3, 1, 0, 0));
        let spring = snapshot.card("spring-festival").unwrap();
        assert_eq!(spring.title, "Spring Festival 2026");
        assert_eq!(spring.target, Some(at(2026, 2, 17, 0, 0)));

        let valentine = snapshot.card("valentine").unwrap();
        assert_eq!(valentine.title, "Valentine's Day 2026");
    }

    #[test]
    fn test_failed_widget_is_isolated() {
        let widgets = vec![
            WidgetSpec::Today,
            WidgetSpec::Festival(FestivalSpec::new("Spring Festival", FestivalRule::lunar(1, 1))),
            WidgetSpec::Festival(FestivalSpec::new("Labor Day", FestivalRule::fixed(5, 1))),
        ];
        let dashboard = Dashboard::new(widgets, FestivalResolver::default());

        // Past the lunar table: the lunar card fails, the others still compute
        let snapshot = dashboard.snapshot(at(2101, 3, 1, 0, 0));
        let keys: Vec<_> = snapshot.cards.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["today", "labor-day", "spring-festival"]);
        assert!(snapshot.card("spring-festival").unwrap().is_failed());
        assert!(!snapshot.card("labor-day").unwrap().is_failed());
        assert!(snapshot.header.lunar.is_none());
    }

    #[test]
    fn test_weekend_workday_card() {
        let snapshot = default_dashboard().snapshot(at(2025, 1, 4, 11, 0));
        let card = snapshot.card("off-work").unwrap();
        assert_eq!(card.percent, 100.0);
        assert_eq!(card.remaining_seconds, 0);
        assert_eq!(card.detail, "Weekend, no countdown");
    }

    #[test]
    fn test_payday_card() {
        let snapshot = default_dashboard().snapshot(at(2025, 1, 15, 9, 0));
        let card = snapshot.card("payday").unwrap();
        assert_eq!(card.detail, "Payday today");
        assert_eq!(card.remaining_seconds, 0);
        assert!(card.near_complete);
    }
}
