//! Widget definitions

use serde::{Deserialize, Serialize};

use crate::festival::{ClockTime, FestivalRule, FestivalSpec, SalaryRule, WorkdayRule};

/// One dashboard widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WidgetSpec {
    Today,
    Week,
    Month,
    Year,
    Festival(FestivalSpec),
    Workday(WorkdayRule),
    Salary(SalaryRule),
}

impl WidgetSpec {
    /// Stable card key
    pub fn key(&self) -> String {
        match self {
            Self::Today => "today".to_string(),
            Self::Week => "week".to_string(),
            Self::Month => "month".to_string(),
            Self::Year => "year".to_string(),
            Self::Festival(spec) => spec.slug(),
            Self::Workday(_) => "off-work".to_string(),
            Self::Salary(_) => "payday".to_string(),
        }
    }
}

/// Festivals shown when the config lists none
pub fn default_festivals() -> Vec<FestivalSpec> {
    vec![
        FestivalSpec::new("Spring Festival", FestivalRule::lunar(1, 1)),
        FestivalSpec::new("Valentine's Day", FestivalRule::fixed(2, 14)).key("valentine"),
        FestivalSpec::new("Qingming", FestivalRule::fixed(4, 4)),
        FestivalSpec::new("Labor Day", FestivalRule::fixed(5, 1)),
        FestivalSpec::new("Children's Day", FestivalRule::fixed(6, 1)).key("children"),
        FestivalSpec::new("National Day", FestivalRule::fixed(10, 1)),
        FestivalSpec::new("Dragon Boat Festival", FestivalRule::lunar(5, 5)),
        FestivalSpec::new("Mid-Autumn Festival", FestivalRule::lunar(8, 15)),
        FestivalSpec::new("End of February", FestivalRule::MonthEnd { month: 2 }),
        FestivalSpec::new("Lunar 2/29", FestivalRule::lunar(2, 29)).key("lunar-feb-29"),
        FestivalSpec::new(
            "Company Holiday",
            FestivalRule::Fixed {
                month: 1,
                day: 23,
                at: ClockTime {
                    hour: 17,
                    minute: 30,
                },
            },
        ),
    ]
}

/// The full widget list: periods, schedule countdowns, then festivals
pub fn build_widgets(
    festivals: &[FestivalSpec],
    workday: WorkdayRule,
    salary: SalaryRule,
) -> Vec<WidgetSpec> {
    let mut widgets = vec![
        WidgetSpec::Today,
        WidgetSpec::Week,
        WidgetSpec::Month,
        WidgetSpec::Year,
        WidgetSpec::Workday(workday),
        WidgetSpec::Salary(salary),
    ];
    widgets.extend(festivals.iter().cloned().map(WidgetSpec::Festival));
    widgets
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_keys_unique() {
        let widgets = build_widgets(
            &default_festivals(),
            WorkdayRule::default(),
            SalaryRule::default(),
        );
        let keys: HashSet<_> = widgets.iter().map(WidgetSpec::key).collect();
        assert_eq!(keys.len(), widgets.len());
        assert!(keys.contains("spring-festival"));
        assert!(keys.contains("mid-autumn-festival"));
    }

    #[test]
    fn test_default_festivals_measure_from_year_start() {
        for spec in default_festivals() {
            assert_eq!(spec.baseline, crate::festival::Baseline::YearStart, "{}", spec.name);
        }
    }

    #[test]
    fn test_default_rules_valid() {
        for spec in default_festivals() {
            assert!(spec.rule.validate().is_ok(), "{}", spec.name);
        }
    }
}
