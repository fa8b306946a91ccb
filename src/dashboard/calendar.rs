//! Calendar header: the solar and lunar date lines

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::festival::LunarCalendar;

/// Western zodiac signs as inclusive `(month, day)` ranges
const ZODIAC_SIGNS: [(&str, (u32, u32), (u32, u32)); 13] = [
    ("Capricorn", (1, 1), (1, 19)),
    ("Aquarius", (1, 20), (2, 18)),
    ("Pisces", (2, 19), (3, 20)),
    ("Aries", (3, 21), (4, 19)),
    ("Taurus", (4, 20), (5, 20)),
    ("Gemini", (5, 21), (6, 21)),
    ("Cancer", (6, 22), (7, 22)),
    ("Leo", (7, 23), (8, 22)),
    ("Virgo", (8, 23), (9, 22)),
    ("Libra", (9, 23), (10, 23)),
    ("Scorpio", (10, 24), (11, 22)),
    ("Sagittarius", (11, 23), (12, 21)),
    ("Capricorn", (12, 22), (12, 31)),
];

/// Gregorian side of the header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolarLine {
    pub date: NaiveDate,
    pub weekday: String,
    pub time: String,
    pub week_of_year: u32,
    pub zodiac_sign: String,
}

/// Lunar side of the header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LunarLine {
    pub year: String,
    pub month: String,
    pub day: String,
    pub ganzhi: String,
    pub animal: String,
}

/// Both header lines; `lunar` is `None` outside the lunar table's range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarHeader {
    pub solar: SolarLine,
    pub lunar: Option<LunarLine>,
}

impl CalendarHeader {
    pub fn at(now: NaiveDateTime, lunar: &dyn LunarCalendar) -> Self {
        let lunar = match lunar.gregorian_to_lunar(now.date()) {
            Ok(date) => Some(LunarLine {
                year: date.year_name(),
                month: date.month_name(),
                day: date.day_name(),
                ganzhi: date.ganzhi_year(),
                animal: date.zodiac_animal().to_string(),
            }),
            Err(e) => {
                tracing::warn!(date = %now.date(), error = %e, "Lunar date unavailable");
                None
            }
        };

        Self {
            solar: SolarLine {
                date: now.date(),
                weekday: weekday_name(now.weekday()).to_string(),
                time: now.format("%H:%M:%S").to_string(),
                week_of_year: week_of_year(now),
                zodiac_sign: zodiac_sign(now.month(), now.day()).to_string(),
            },
            lunar,
        }
    }
}

impl std::fmt::Display for CalendarHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let solar = &self.solar;
        write!(
            f,
            "{} {} {} | Week {} | {}",
            solar.date, solar.weekday, solar.time, solar.week_of_year, solar.zodiac_sign
        )?;
        if let Some(lunar) = &self.lunar {
            write!(
                f,
                "\n农历{}年 {}{} {}年 [属{}]",
                lunar.year, lunar.month, lunar.day, lunar.ganzhi, lunar.animal
            )?;
        }
        Ok(())
    }
}

/// Week number counted in Sunday-started weeks, the first holding January 1
pub fn week_of_year(now: NaiveDateTime) -> u32 {
    let past_days = now.ordinal0();
    let offset = NaiveDate::from_ymd_opt(now.year(), 1, 1)
        .map(|jan1| jan1.weekday().num_days_from_sunday())
        .unwrap_or(0);
    (past_days + offset + 1).div_ceil(7)
}

/// Western zodiac sign for a month/day
pub fn zodiac_sign(month: u32, day: u32) -> &'static str {
    let date = month * 100 + day;
    ZODIAC_SIGNS
        .iter()
        .find(|(_, (sm, sd), (em, ed))| date >= sm * 100 + sd && date <= em * 100 + ed)
        .map(|(name, _, _)| *name)
        .unwrap_or("Capricorn")
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
