//! Pure projections over the loaded dataset. Every function returns new
//! sequences and leaves its input untouched.

use std::collections::{BTreeMap, BTreeSet};

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::data::country::{CountryRecord, EnrichedHoliday, HolidayDate, HolidayRecord};
use crate::data::document::{SourceCountry, SourceHoliday};

/// Build the normalized record for one source country.
pub fn normalize_country(country: SourceCountry) -> CountryRecord {
    CountryRecord {
        id: country.id,
        code: country.code,
        name: country.name,
        holidays: normalize_holidays(country.holidays),
    }
}

/// Missing lists become empty; dates that fail to parse are kept as raw text.
pub fn normalize_holidays(list: Option<Vec<SourceHoliday>>) -> Vec<HolidayRecord> {
    list.unwrap_or_default()
        .into_iter()
        .map(|holiday| HolidayRecord {
            id: holiday.id,
            year: holiday.year,
            date: parse_date_value(&holiday.date),
            name: holiday.name,
            kind: holiday.kind,
        })
        .collect()
}

fn parse_date_value(value: &serde_json::Value) -> HolidayDate {
    match value {
        serde_json::Value::String(text) => HolidayDate::parse(text),
        serde_json::Value::Null => HolidayDate::Raw(String::new()),
        other => HolidayDate::Raw(other.to_string()),
    }
}

pub fn find_country(records: &[CountryRecord], id: i64) -> Option<&CountryRecord> {
    records.iter().find(|country| country.id == id)
}

/// Stable ascending sort by date.
pub fn sort_holidays_by_date(holidays: &[HolidayRecord]) -> Vec<HolidayRecord> {
    let mut sorted = holidays.to_vec();
    sorted.sort_by(|a, b| a.date.chronological(&b.date));
    sorted
}

/// Copy of `country` with its holidays in date order.
pub fn with_sorted_holidays(country: &CountryRecord) -> CountryRecord {
    CountryRecord {
        holidays: sort_holidays_by_date(&country.holidays),
        ..country.clone()
    }
}

/// Countries ordered by collated name, each with date-ordered holidays.
pub fn sort_countries_by_name(records: &[CountryRecord]) -> Vec<CountryRecord> {
    let mut sorted: Vec<CountryRecord> = records.iter().map(with_sorted_holidays).collect();
    sorted.sort_by_cached_key(|country| collation_key(&country.name));
    sorted
}

pub fn flatten_by_year(records: &[CountryRecord], year: i32) -> Vec<EnrichedHoliday> {
    let mut flat: Vec<EnrichedHoliday> = records
        .iter()
        .flat_map(|country| {
            country
                .holidays
                .iter()
                .filter(move |holiday| holiday.year == year)
                .map(move |holiday| EnrichedHoliday::new(country, holiday))
        })
        .collect();
    flat.sort_by(|a, b| a.holiday.date.chronological(&b.holiday.date));
    flat
}

pub fn flatten_all(records: &[CountryRecord]) -> Vec<EnrichedHoliday> {
    let mut flat: Vec<EnrichedHoliday> = records
        .iter()
        .flat_map(|country| {
            country
                .holidays
                .iter()
                .map(move |holiday| EnrichedHoliday::new(country, holiday))
        })
        .collect();
    flat.sort_by_cached_key(|entry| collation_key(&entry.holiday.name));
    flat
}

/// Normalized form of a search query, as [`matches_name`] expects it.
pub fn search_needle(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Case-insensitive substring test on the holiday name. An empty needle matches everything.
pub fn matches_name(entry: &EnrichedHoliday, needle: &str) -> bool {
    needle.is_empty() || entry.holiday.name.to_lowercase().contains(needle)
}

/// Entries whose name contains `query`. A blank query keeps everything.
pub fn filter_by_name(list: &[EnrichedHoliday], query: &str) -> Vec<EnrichedHoliday> {
    let needle = search_needle(query);
    list.iter()
        .filter(|entry| matches_name(entry, &needle))
        .cloned()
        .collect()
}

/// Distinct holiday years across the dataset, ascending.
pub fn list_years(records: &[CountryRecord]) -> Vec<i32> {
    records
        .iter()
        .flat_map(|country| country.holidays.iter().map(|holiday| holiday.year))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Holidays bucketed by their `year` field, years ascending, input order kept within a year.
pub fn group_by_year(holidays: &[HolidayRecord]) -> BTreeMap<i32, Vec<HolidayRecord>> {
    let mut groups: BTreeMap<i32, Vec<HolidayRecord>> = BTreeMap::new();
    for holiday in holidays {
        groups.entry(holiday.year).or_default().push(holiday.clone());
    }
    groups
}

/// Primary-strength collation key: decomposed, combining marks dropped, lowercased.
pub fn collation_key(value: &str) -> String {
    value
        .nfd()
        .filter(|ch| !is_combining_mark(*ch))
        .flat_map(char::to_lowercase)
        .collect()
}
