//! Lunar Calendar Conversion
//!
//! The dashboard only needs two capabilities from a lunar calendar: map a
//! Gregorian date to its lunar date and back. They sit behind the
//! `LunarCalendar` trait so the festival resolver does not depend on any
//! particular implementation.
//!
//! `TableLunarCalendar` is a packed month-length table covering lunar years
//! 1900 through 2100. Gregorian 1900-01-31 is lunar 1900/1/1.
//!
//! Each table entry describes one lunar year:
//! - bits 0..=3: leap month number, 0 when the year has no leap month
//! - bits 4..=15: months 12 down to 1, set for a 30-day month, clear for 29
//! - bit 16: leap month has 30 days (only meaningful with a leap month)

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// First lunar year in the table
pub const MIN_LUNAR_YEAR: i32 = 1900;
/// Last lunar year in the table
pub const MAX_LUNAR_YEAR: i32 = 2100;

/// 1900-01-31 (lunar 1900-01-01) as days from 0001-01-01, counting that day as 1
const EPOCH_DAYS_FROM_CE: i64 = 693_626;

const LUNAR_INFO: [u32; 201] = [
    0x04bd8, 0x04ae0, 0x0a570, 0x054d5, 0x0d260, 0x0d950, 0x16554, 0x056a0, 0x09ad0, 0x055d2, // 1900
    0x04ae0, 0x0a5b6, 0x0a4d0, 0x0d250, 0x1d255, 0x0b540, 0x0d6a0, 0x0ada2, 0x095b0, 0x14977, // 1910
    0x04970, 0x0a4b0, 0x0b4b5, 0x06a50, 0x06d40, 0x1ab54, 0x02b60, 0x09570, 0x052f2, 0x04970, // 1920
    0x06566, 0x0d4a0, 0x0ea50, 0x16a95, 0x05ad0, 0x02b60, 0x186e3, 0x092e0, 0x1c8d7, 0x0c950, // 1930
    0x0d4a0, 0x1d8a6, 0x0b550, 0x056a0, 0x1a5b4, 0x025d0, 0x092d0, 0x0d2b2, 0x0a950, 0x0b557, // 1940
    0x06ca0, 0x0b550, 0x15355, 0x04da0, 0x0a5b0, 0x14573, 0x052b0, 0x0a9a8, 0x0e950, 0x06aa0, // 1950
    0x0aea6, 0x0ab50, 0x04b60, 0x0aae4, 0x0a570, 0x05260, 0x0f263, 0x0d950, 0x05b57, 0x056a0, // 1960
    0x096d0, 0x04dd5, 0x04ad0, 0x0a4d0, 0x0d4d4, 0x0d250, 0x0d558, 0x0b540, 0x0b6a0, 0x195a6, // 1970
    0x095b0, 0x049b0, 0x0a974, 0x0a4b0, 0x0b27a, 0x06a50, 0x06d40, 0x0af46, 0x0ab60, 0x09570, // 1980
    0x04af5, 0x04970, 0x064b0, 0x074a3, 0x0ea50, 0x06b58, 0x05ac0, 0x0ab60, 0x096d5, 0x092e0, // 1990
    0x0c960, 0x0d954, 0x0d4a0, 0x0da50, 0x07552, 0x056a0, 0x0abb7, 0x025d0, 0x092d0, 0x0cab5, // 2000
    0x0a950, 0x0b4a0, 0x0baa4, 0x0ad50, 0x055d9, 0x04ba0, 0x0a5b0, 0x15176, 0x052b0, 0x0a930, // 2010
    0x07954, 0x06aa0, 0x0ad50, 0x05b52, 0x04b60, 0x0a6e6, 0x0a4e0, 0x0d260, 0x0ea65, 0x0d530, // 2020
    0x05aa0, 0x076a3, 0x096d0, 0x04afb, 0x04ad0, 0x0a4d0, 0x1d0b6, 0x0d250, 0x0d520, 0x0dd45, // 2030
    0x0b5a0, 0x056d0, 0x055b2, 0x049b0, 0x0a577, 0x0a4b0, 0x0aa50, 0x1b255, 0x06d20, 0x0ada0, // 2040
    0x14b63, 0x09370, 0x049f8, 0x04970, 0x064b0, 0x168a6, 0x0ea50, 0x06aa0, 0x1a6c4, 0x0aae0, // 2050
    0x092e0, 0x0d2e3, 0x0c960, 0x0d557, 0x0d4a0, 0x0da50, 0x05d55, 0x056a0, 0x0a6d0, 0x055d4, // 2060
    0x052d0, 0x0a9b8, 0x0a950, 0x0b4a0, 0x0b6a6, 0x0ad50, 0x055a0, 0x0aba4, 0x0a5b0, 0x052b0, // 2070
    0x0b273, 0x06930, 0x07337, 0x06aa0, 0x0ad50, 0x14b55, 0x04b60, 0x0a570, 0x054e4, 0x0d160, // 2080
    0x0e968, 0x0d520, 0x0daa0, 0x16aa6, 0x056d0, 0x04ae0, 0x0a9d4, 0x0a2d0, 0x0d150, 0x0f252, // 2090
    0x0d520, // 2100
];

const HEAVENLY_STEMS: [&str; 10] = ["甲", "乙", "丙", "丁", "戊", "己", "庚", "辛", "壬", "癸"];
const EARTHLY_BRANCHES: [&str; 12] = [
    "子", "丑", "寅", "卯", "辰", "巳", "午", "未", "申", "酉", "戌", "亥",
];
const ZODIAC_ANIMALS: [&str; 12] = [
    "鼠", "牛", "虎", "兔", "龙", "蛇", "马", "羊", "猴", "鸡", "狗", "猪",
];
const MONTH_NAMES: [&str; 12] = [
    "正", "二", "三", "四", "五", "六", "七", "八", "九", "十", "冬", "腊",
];
const DAY_TENS: [&str; 4] = ["初", "十", "廿", "三"];
const DIGITS: [&str; 10] = ["〇", "一", "二", "三", "四", "五", "六", "七", "八", "九"];

/// A date in the lunar calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LunarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// Whether `month` is the intercalary month following the regular one
    #[serde(default)]
    pub is_leap: bool,
}

impl LunarDate {
    /// A date in a regular (non-leap) month
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self {
            year,
            month,
            day,
            is_leap: false,
        }
    }

    /// A date in the leap month of `year`
    pub fn leap(year: i32, month: u32, day: u32) -> Self {
        Self {
            year,
            month,
            day,
            is_leap: true,
        }
    }

    /// Year written digit by digit, e.g. 二〇二五
    pub fn year_name(&self) -> String {
        self.year
            .to_string()
            .chars()
            .filter_map(|c| c.to_digit(10))
            .map(|d| DIGITS[d as usize])
            .collect()
    }

    /// Month name, e.g. 正月, 闰六月, 腊月
    pub fn month_name(&self) -> String {
        let name = MONTH_NAMES
            .get(self.month.wrapping_sub(1) as usize)
            .copied()
            .unwrap_or("?");
        if self.is_leap {
            format!("闰{}月", name)
        } else {
            format!("{}月", name)
        }
    }

    /// Day name, e.g. 初一, 十五, 廿九, 三十
    pub fn day_name(&self) -> String {
        match self.day {
            10 => "初十".to_string(),
            20 => "二十".to_string(),
            30 => "三十".to_string(),
            1..=29 => {
                let tens = DAY_TENS[(self.day / 10) as usize];
                let ones = DIGITS[(self.day % 10) as usize];
                format!("{}{}", tens, ones)
            }
            _ => "?".to_string(),
        }
    }

    /// Sexagenary (stem-branch) name of the year, e.g. 乙巳
    pub fn ganzhi_year(&self) -> String {
        let cycle = (self.year - 4).rem_euclid(60) as usize;
        format!("{}{}", HEAVENLY_STEMS[cycle % 10], EARTHLY_BRANCHES[cycle % 12])
    }

    /// Zodiac animal of the year, e.g. 蛇
    pub fn zodiac_animal(&self) -> &'static str {
        ZODIAC_ANIMALS[(self.year - 4).rem_euclid(12) as usize]
    }
}

impl std::fmt::Display for LunarDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}年{}{}",
            self.year_name(),
            self.month_name(),
            self.day_name()
        )
    }
}

/// Errors from lunar conversion
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LunarError {
    /// Lunar year outside the supported table
    #[error("Lunar year {0} is outside the supported range 1900-2100")]
    YearOutOfRange(i32),

    /// Gregorian date outside the supported table
    #[error("Date {0} is outside the supported lunar range")]
    DateOutOfRange(NaiveDate),

    /// Month number not in 1..=12
    #[error("Invalid lunar month {month} in year {year}")]
    InvalidMonth { year: i32, month: u32 },

    /// Asked for a leap month the year does not have
    #[error("Lunar year {year} has no leap month {month}")]
    NoLeapMonth { year: i32, month: u32 },

    /// Day past the end of the month
    #[error("Lunar {year}/{month} has only {max} days, got day {day}")]
    InvalidDay {
        year: i32,
        month: u32,
        day: u32,
        max: u32,
    },
}

/// Gregorian <-> lunar conversion capability
pub trait LunarCalendar: Send + Sync {
    /// Lunar date of a Gregorian date
    fn gregorian_to_lunar(&self, date: NaiveDate) -> Result<LunarDate, LunarError>;

    /// Gregorian date of a lunar date
    fn lunar_to_gregorian(&self, date: LunarDate) -> Result<NaiveDate, LunarError>;
}

/// Table-driven lunar calendar for 1900-2100
#[derive(Debug, Clone, Copy, Default)]
pub struct TableLunarCalendar;

impl TableLunarCalendar {
    pub fn new() -> Self {
        Self
    }

    fn info(year: i32) -> Result<u32, LunarError> {
        if !(MIN_LUNAR_YEAR..=MAX_LUNAR_YEAR).contains(&year) {
            return Err(LunarError::YearOutOfRange(year));
        }
        Ok(LUNAR_INFO[(year - MIN_LUNAR_YEAR) as usize])
    }

    /// Leap month of `year`, if it has one
    pub fn leap_month(year: i32) -> Result<Option<u32>, LunarError> {
        let leap = Self::info(year)? & 0xf;
        Ok((leap != 0).then_some(leap))
    }

    /// Length of a regular or leap month
    pub fn month_days(year: i32, month: u32, is_leap: bool) -> Result<u32, LunarError> {
        if !(1..=12).contains(&month) {
            return Err(LunarError::InvalidMonth { year, month });
        }
        let info = Self::info(year)?;
        if is_leap {
            if Self::leap_month(year)? != Some(month) {
                return Err(LunarError::NoLeapMonth { year, month });
            }
            return Ok(if info & 0x10000 != 0 { 30 } else { 29 });
        }
        Ok(if info & (0x10000 >> month) != 0 { 30 } else { 29 })
    }

    /// Total days in a lunar year, leap month included
    pub fn year_days(year: i32) -> Result<u32, LunarError> {
        let mut total = 0;
        for month in 1..=12 {
            total += Self::month_days(year, month, false)?;
        }
        if let Some(leap) = Self::leap_month(year)? {
            total += Self::month_days(year, leap, true)?;
        }
        Ok(total)
    }
}

impl LunarCalendar for TableLunarCalendar {
    fn gregorian_to_lunar(&self, date: NaiveDate) -> Result<LunarDate, LunarError> {
        let mut offset = i64::from(date.num_days_from_ce()) - EPOCH_DAYS_FROM_CE;
        if offset < 0 {
            return Err(LunarError::DateOutOfRange(date));
        }

        let mut year = MIN_LUNAR_YEAR;
        loop {
            let days = i64::from(
                Self::year_days(year).map_err(|_| LunarError::DateOutOfRange(date))?,
            );
            if offset < days {
                break;
            }
            offset -= days;
            year += 1;
        }

        let leap = Self::leap_month(year)?;
        for month in 1..=12 {
            let days = i64::from(Self::month_days(year, month, false)?);
            if offset < days {
                return Ok(LunarDate::new(year, month, offset as u32 + 1));
            }
            offset -= days;

            if leap == Some(month) {
                let days = i64::from(Self::month_days(year, month, true)?);
                if offset < days {
                    return Ok(LunarDate::leap(year, month, offset as u32 + 1));
                }
                offset -= days;
            }
        }

        // year_days covers every month above, so the loop always returns
        Err(LunarError::DateOutOfRange(date))
    }

    fn lunar_to_gregorian(&self, date: LunarDate) -> Result<NaiveDate, LunarError> {
        let LunarDate {
            year,
            month,
            day,
            is_leap,
        } = date;

        let max = Self::month_days(year, month, is_leap)?;
        if day == 0 || day > max {
            return Err(LunarError::InvalidDay {
                year,
                month,
                day,
                max,
            });
        }

        let mut offset: i64 = 0;
        for y in MIN_LUNAR_YEAR..year {
            offset += i64::from(Self::year_days(y)?);
        }

        let leap = Self::leap_month(year)?;
        for m in 1..month {
            offset += i64::from(Self::month_days(year, m, false)?);
            if leap == Some(m) {
                offset += i64::from(Self::month_days(year, m, true)?);
            }
        }
        if is_leap {
            offset += i64::from(Self::month_days(year, month, false)?);
        }
        offset += i64::from(day - 1);

        i32::try_from(EPOCH_DAYS_FROM_CE + offset)
            .ok()
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .ok_or(LunarError::YearOutOfRange(year))
    }
}

/// Convert a lunar date, clamping `day` to the month's length
///
/// Lunar months have 29 or 30 days, so a rule like "day 30 of the 12th
/// month" lands on day 29 in short years.
pub fn lunar_to_gregorian_clamped(
    calendar: &dyn LunarCalendar,
    date: LunarDate,
) -> Result<NaiveDate, LunarError> {
    match calendar.lunar_to_gregorian(date) {
        Err(LunarError::InvalidDay { max, day, .. }) if day > max => {
            calendar.lunar_to_gregorian(LunarDate { day: max, ..date })
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_spring_festival_dates() {
        let cal = TableLunarCalendar::new();
        assert_eq!(cal.lunar_to_gregorian(LunarDate::new(2023, 1, 1)), Ok(ymd(2023, 1, 22)));
        assert_eq!(cal.lunar_to_gregorian(LunarDate::new(2024, 1, 1)), Ok(ymd(2024, 2, 10)));
        assert_eq!(cal.lunar_to_gregorian(LunarDate::new(2025, 1, 1)), Ok(ymd(2025, 1, 29)));
        assert_eq!(cal.lunar_to_gregorian(LunarDate::new(2026, 1, 1)), Ok(ymd(2026, 2, 17)));
    }

    #[test]
    fn test_other_festivals() {
        let cal = TableLunarCalendar::new();
        // Mid-Autumn and Dragon Boat 2025
        assert_eq!(cal.lunar_to_gregorian(LunarDate::new(2025, 8, 15)), Ok(ymd(2025, 10, 6)));
        assert_eq!(cal.lunar_to_gregorian(LunarDate::new(2025, 5, 5)), Ok(ymd(2025, 5, 31)));
    }

    #[test]
    fn test_gregorian_to_lunar_leap_month() {
        let cal = TableLunarCalendar::new();
        // 2025 has a leap sixth month
        let lunar = cal.gregorian_to_lunar(ymd(2025, 8, 1)).unwrap();
        assert_eq!(lunar, LunarDate::leap(2025, 6, 8));
        assert_eq!(lunar.month_name(), "闰六月");
        assert_eq!(lunar.day_name(), "初八");
    }

    #[test]
    fn test_gregorian_to_lunar_before_new_year() {
        let cal = TableLunarCalendar::new();
        assert_eq!(cal.gregorian_to_lunar(ymd(2025, 1, 10)), Ok(LunarDate::new(2024, 12, 11)));
        assert_eq!(cal.gregorian_to_lunar(ymd(2024, 1, 1)), Ok(LunarDate::new(2023, 11, 20)));
    }

    #[test]
    fn test_round_trip_through_leap_month() {
        let cal = TableLunarCalendar::new();
        let leap = LunarDate::leap(2025, 6, 8);
        let solar = cal.lunar_to_gregorian(leap).unwrap();
        assert_eq!(solar, ymd(2025, 8, 1));
        assert_eq!(cal.gregorian_to_lunar(solar), Ok(leap));
    }

    #[test]
    fn test_invalid_inputs() {
        let cal = TableLunarCalendar::new();
        assert_eq!(
            cal.lunar_to_gregorian(LunarDate::new(1899, 1, 1)),
            Err(LunarError::YearOutOfRange(1899))
        );
        assert_eq!(
            cal.lunar_to_gregorian(LunarDate::new(2101, 1, 1)),
            Err(LunarError::YearOutOfRange(2101))
        );
        assert_eq!(
            cal.lunar_to_gregorian(LunarDate::leap(2024, 6, 1)),
            Err(LunarError::NoLeapMonth { year: 2024, month: 6 })
        );
        assert!(matches!(
            cal.lunar_to_gregorian(LunarDate::new(2025, 13, 1)),
            Err(LunarError::InvalidMonth { .. })
        ));
        // 2025 month 12 has 29 days
        assert!(matches!(
            cal.lunar_to_gregorian(LunarDate::new(2025, 12, 30)),
            Err(LunarError::InvalidDay { max: 29, .. })
        ));
        assert_eq!(
            cal.gregorian_to_lunar(ymd(1900, 1, 1)),
            Err(LunarError::DateOutOfRange(ymd(1900, 1, 1)))
        );
    }

    #[test]
    fn test_clamped_conversion() {
        let cal = TableLunarCalendar::new();
        // 2024 month 12 has 29 days: the eve of Spring Festival 2025
        assert_eq!(
            lunar_to_gregorian_clamped(&cal, LunarDate::new(2024, 12, 30)),
            Ok(ymd(2025, 1, 28))
        );
    }

    #[test]
    fn test_year_names() {
        let date = LunarDate::new(2025, 1, 1);
        assert_eq!(date.year_name(), "二〇二五");
        assert_eq!(date.ganzhi_year(), "乙巳");
        assert_eq!(date.zodiac_animal(), "蛇");
        assert_eq!(date.to_string(), "二〇二五年正月初一");
        assert_eq!(LunarDate::new(2024, 11, 20).day_name(), "二十");
        assert_eq!(LunarDate::new(2024, 12, 21).day_name(), "廿一");
        assert_eq!(LunarDate::new(2024, 12, 29).month_name(), "腊月");
    }

    #[test]
    fn test_year_days() {
        assert_eq!(TableLunarCalendar::year_days(1900), Ok(384));
        assert_eq!(TableLunarCalendar::leap_month(2025), Ok(Some(6)));
        assert_eq!(TableLunarCalendar::leap_month(2024), Ok(None));
    }
}
