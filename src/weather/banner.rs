//! Error banner and panel state

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::client::{WeatherClient, WeatherError, WeatherReport};

/// A user-visible error that hides itself after a delay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBanner {
    pub message: String,
    pub shown_at: NaiveDateTime,
    pub dismiss_after_secs: u64,
}

impl ErrorBanner {
    pub fn new(message: impl Into<String>, shown_at: NaiveDateTime, dismiss_after_secs: u64) -> Self {
        Self {
            message: message.into(),
            shown_at,
            dismiss_after_secs,
        }
    }

    /// Banner for a failed fetch
    pub fn for_error(error: &WeatherError, shown_at: NaiveDateTime, dismiss_after_secs: u64) -> Self {
        Self::new(format!("Weather unavailable: {}", error), shown_at, dismiss_after_secs)
    }

    pub fn dismiss_at(&self) -> NaiveDateTime {
        let secs = i64::try_from(self.dismiss_after_secs)
            .unwrap_or(i64::MAX)
            .min(i64::MAX / 1000);
        self.shown_at
            .checked_add_signed(Duration::seconds(secs))
            .unwrap_or(NaiveDateTime::MAX)
    }

    pub fn is_visible(&self, now: NaiveDateTime) -> bool {
        now < self.dismiss_at()
    }
}

/// Last good report plus the current error banner
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherPanel {
    pub report: Option<WeatherReport>,
    pub fetched_at: Option<NaiveDateTime>,
    pub banner: Option<ErrorBanner>,
    #[serde(skip)]
    dismiss_after_secs: u64,
}

impl WeatherPanel {
    pub fn new(dismiss_after_secs: u64) -> Self {
        Self {
            dismiss_after_secs,
            ..Self::default()
        }
    }

    pub fn record_success(&mut self, report: WeatherReport, now: NaiveDateTime) {
        self.report = Some(report);
        self.fetched_at = Some(now);
        self.banner = None;
    }

    pub fn record_failure(&mut self, error: &WeatherError, now: NaiveDateTime) {
        tracing::warn!(error = %error, "Weather fetch failed");
        self.banner = Some(ErrorBanner::for_error(error, now, self.dismiss_after_secs));
    }

    /// Fetch once and record the outcome
    pub async fn refresh(&mut self, client: &WeatherClient, now: NaiveDateTime) -> bool {
        match client.fetch().await {
            Ok(report) => {
                tracing::debug!(city = %report.city_text(), "Weather refreshed");
                self.record_success(report, now);
                true
            }
            Err(e) => {
                self.record_failure(&e, now);
                false
            }
        }
    }

    /// The banner, if it has not been dismissed yet
    pub fn visible_banner(&self, now: NaiveDateTime) -> Option<&ErrorBanner> {
        self.banner.as_ref().filter(|b| b.is_visible(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_banner_expires() {
        let banner = ErrorBanner::new("Weather unavailable", at(9, 0, 0), 5);
        assert!(banner.is_visible(at(9, 0, 0)));
        assert!(banner.is_visible(at(9, 0, 4)));
        assert!(!banner.is_visible(at(9, 0, 5)));
        assert_eq!(banner.dismiss_at(), at(9, 0, 5));
    }

    #[test]
    fn test_panel_failure_then_success() {
        let mut panel = WeatherPanel::new(5);
        panel.record_failure(&WeatherError::Timeout, at(9, 0, 0));

        let banner = panel.visible_banner(at(9, 0, 1)).unwrap();
        assert_eq!(banner.message, "Weather unavailable: Weather request timed out");
        assert!(panel.visible_banner(at(9, 0, 6)).is_none());

        let report = WeatherReport {
            city: Some("Wuyuan".to_string()),
            ..WeatherReport::default()
        };
        panel.record_success(report, at(9, 1, 0));
        assert!(panel.banner.is_none());
        assert_eq!(panel.fetched_at, Some(at(9, 1, 0)));
    }

    #[test]
    fn test_failure_keeps_last_report() {
        let mut panel = WeatherPanel::new(5);
        panel.record_success(WeatherReport::default(), at(8, 0, 0));
        panel.record_failure(&WeatherError::Unavailable, at(9, 0, 0));
        assert!(panel.report.is_some());
        assert!(panel.banner.is_some());
    }
}
