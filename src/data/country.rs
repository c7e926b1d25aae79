//! Normalized country/holiday model served by the API and rendered by the pages.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};

/// Calendar date of a holiday as parsed from the source document.
/// `Raw` keeps values that could not be read as a date so they can still be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HolidayDate {
    Parsed(NaiveDate),
    Raw(String),
}

impl HolidayDate {
    /// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and naive `YYYY-MM-DDTHH:MM:SS[.f]`.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Self::Parsed(date);
        }
        if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
            return Self::Parsed(timestamp.date_naive());
        }
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
            return Self::Parsed(timestamp.date());
        }
        Self::Raw(value.to_string())
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Parsed(date) => Some(*date),
            Self::Raw(_) => None,
        }
    }

    /// Display label used by the pages, e.g. `Jan 01, 2024`.
    pub fn label(&self) -> String {
        match self {
            Self::Parsed(date) => date.format("%b %d, %Y").to_string(),
            Self::Raw(raw) => raw.clone(),
        }
    }

    pub fn year(&self) -> Option<i32> {
        self.as_date().map(|date| date.year())
    }

    /// Ascending order; raw values sort after every parsed date and compare equal
    /// to each other so a stable sort keeps their input order.
    pub fn chronological(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Parsed(a), Self::Parsed(b)) => a.cmp(b),
            (Self::Parsed(_), Self::Raw(_)) => Ordering::Less,
            (Self::Raw(_), Self::Parsed(_)) => Ordering::Greater,
            (Self::Raw(_), Self::Raw(_)) => Ordering::Equal,
        }
    }
}

impl fmt::Display for HolidayDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parsed(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::Raw(raw) => f.write_str(raw),
        }
    }
}

impl Serialize for HolidayDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HolidayRecord {
    pub id: i64,
    pub year: i32,
    pub date: HolidayDate,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryRecord {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub holidays: Vec<HolidayRecord>,
}

/// Holiday carrying its owning country, produced by the cross-country views.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedHoliday {
    #[serde(flatten)]
    pub holiday: HolidayRecord,
    pub country_code: String,
    pub country_name: String,
}

impl EnrichedHoliday {
    pub fn new(country: &CountryRecord, holiday: &HolidayRecord) -> Self {
        Self {
            holiday: holiday.clone(),
            country_code: country.code.clone(),
            country_name: country.name.clone(),
        }
    }
}

/// `{code, name}` summary used by the country listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountrySummary {
    pub code: String,
    pub name: String,
}

impl From<&CountryRecord> for CountrySummary {
    fn from(country: &CountryRecord) -> Self {
        Self {
            code: country.code.clone(),
            name: country.name.clone(),
        }
    }
}
