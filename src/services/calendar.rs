//! Bikram Sambat (BS) to Gregorian (AD) date conversion
//!
//! The depository platform reports DMAT expiry in BS. Month lengths in BS are
//! not computable from a formula, so conversion walks a static table keyed by
//! BS year. Each entry carries the AD date of 1 Baisakh (the first day of the
//! year) and the length of the twelve months.

use chrono::{Days, NaiveDate};
use std::ops::RangeInclusive;

use crate::error::CalendarError;

struct BsYear {
    year: i32,
    first_baisakh: (i32, u32, u32),
    days_in_month: [u32; 12],
}

const FIRST_BS_YEAR: i32 = 2066;
const LAST_BS_YEAR: i32 = 2086;

#[rustfmt::skip]
static BS_CALENDAR: [BsYear; 21] = [
    BsYear { year: 2066, first_baisakh: (2009, 4, 14), days_in_month: [31, 31, 31, 32, 31, 31, 29, 30, 30, 29, 29, 31] },
    BsYear { year: 2067, first_baisakh: (2010, 4, 14), days_in_month: [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30] },
    BsYear { year: 2068, first_baisakh: (2011, 4, 14), days_in_month: [31, 32, 31, 32, 31, 30, 30, 29, 30, 29, 30, 30] },
    BsYear { year: 2069, first_baisakh: (2012, 4, 13), days_in_month: [31, 32, 31, 32, 31, 30, 30, 30, 29, 30, 29, 31] },
    BsYear { year: 2070, first_baisakh: (2013, 4, 14), days_in_month: [31, 31, 31, 32, 31, 31, 29, 30, 30, 29, 30, 30] },
    BsYear { year: 2071, first_baisakh: (2014, 4, 14), days_in_month: [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30] },
    BsYear { year: 2072, first_baisakh: (2015, 4, 14), days_in_month: [31, 32, 31, 32, 31, 30, 30, 29, 30, 29, 30, 30] },
    BsYear { year: 2073, first_baisakh: (2016, 4, 13), days_in_month: [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 31] },
    BsYear { year: 2074, first_baisakh: (2017, 4, 14), days_in_month: [31, 31, 31, 32, 31, 31, 30, 29, 30, 29, 30, 30] },
    BsYear { year: 2075, first_baisakh: (2018, 4, 14), days_in_month: [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30] },
    BsYear { year: 2076, first_baisakh: (2019, 4, 14), days_in_month: [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 30] },
    BsYear { year: 2077, first_baisakh: (2020, 4, 13), days_in_month: [31, 32, 31, 32, 31, 30, 30, 30, 29, 30, 29, 31] },
    BsYear { year: 2078, first_baisakh: (2021, 4, 14), days_in_month: [31, 31, 31, 32, 31, 31, 30, 29, 30, 29, 30, 30] },
    BsYear { year: 2079, first_baisakh: (2022, 4, 14), days_in_month: [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30] },
    BsYear { year: 2080, first_baisakh: (2023, 4, 14), days_in_month: [31, 32, 31, 32, 31, 30, 30, 30, 29, 29, 30, 30] },
    BsYear { year: 2081, first_baisakh: (2024, 4, 13), days_in_month: [31, 32, 31, 32, 31, 30, 30, 30, 29, 30, 29, 31] },
    BsYear { year: 2082, first_baisakh: (2025, 4, 14), days_in_month: [31, 31, 32, 31, 31, 31, 30, 29, 30, 29, 30, 30] },
    BsYear { year: 2083, first_baisakh: (2026, 4, 14), days_in_month: [31, 31, 32, 31, 31, 30, 30, 30, 29, 30, 30, 30] },
    BsYear { year: 2084, first_baisakh: (2027, 4, 14), days_in_month: [31, 31, 32, 31, 31, 30, 30, 30, 29, 30, 30, 30] },
    BsYear { year: 2085, first_baisakh: (2028, 4, 13), days_in_month: [31, 32, 31, 32, 30, 31, 30, 30, 29, 30, 30, 30] },
    BsYear { year: 2086, first_baisakh: (2029, 4, 14), days_in_month: [30, 32, 31, 32, 31, 30, 30, 30, 29, 30, 30, 30] },
];

/// BS years the conversion table covers.
pub fn supported_years() -> RangeInclusive<i32> {
    FIRST_BS_YEAR..=LAST_BS_YEAR
}

fn lookup(year: i32) -> Result<&'static BsYear, CalendarError> {
    if !supported_years().contains(&year) {
        return Err(CalendarError::OutOfRange(year));
    }
    let entry = &BS_CALENDAR[(year - FIRST_BS_YEAR) as usize];
    debug_assert_eq!(entry.year, year);
    Ok(entry)
}

/// AD date of 1 Baisakh of the given BS year.
pub fn first_baisakh(year: i32) -> Result<NaiveDate, CalendarError> {
    let (y, m, d) = lookup(year)?.first_baisakh;
    NaiveDate::from_ymd_opt(y, m, d).ok_or(CalendarError::OutOfRange(year))
}

/// Number of days in `month` (1-based) of BS `year`.
pub fn days_in_month(year: i32, month: u32) -> Result<u32, CalendarError> {
    let entry = lookup(year)?;
    if !(1..=12).contains(&month) {
        return Err(CalendarError::InvalidMonth(month));
    }
    Ok(entry.days_in_month[(month - 1) as usize])
}

/// Convert a BS date to the AD calendar.
pub fn bs_to_ad(year: i32, month: u32, day: u32) -> Result<NaiveDate, CalendarError> {
    let entry = lookup(year)?;
    let month_len = days_in_month(year, month)?;
    if day < 1 || day > month_len {
        return Err(CalendarError::InvalidDay { year, month, day });
    }

    let offset: u32 = entry.days_in_month[..(month - 1) as usize].iter().sum::<u32>() + day - 1;

    first_baisakh(year)?
        .checked_add_days(Days::new(u64::from(offset)))
        .ok_or(CalendarError::OutOfRange(year))
}

/// Split a stored `YYYY-MM-DD` BS date into its components.
pub fn parse_bs_date(value: &str) -> Result<(i32, u32, u32), CalendarError> {
    let malformed = || CalendarError::Malformed(value.to_string());

    let mut parts = value.trim().splitn(3, '-');
    let year = parts.next().and_then(|p| p.parse::<i32>().ok()).ok_or_else(malformed)?;
    let month = parts.next().and_then(|p| p.parse::<u32>().ok()).ok_or_else(malformed)?;
    let day = parts.next().and_then(|p| p.parse::<u32>().ok()).ok_or_else(malformed)?;

    Ok((year, month, day))
}

/// Parse and convert a stored BS date string in one step.
pub fn bs_str_to_ad(value: &str) -> Result<NaiveDate, CalendarError> {
    let (year, month, day) = parse_bs_date(value)?;
    bs_to_ad(year, month, day)
}
