//! Dataset consistency report for the `validate` command. The server never
//! enforces any of this; it serves whatever the document holds.

use std::collections::HashSet;
use std::fmt;

use crate::data::country::{CountryRecord, HolidayDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        })
    }
}

/// One problem, located by a path such as `countries[1] id=2.holidays[3] id=4`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub severity: Severity,
    pub location: String,
    pub message: String,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.location, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DatasetReport {
    pub findings: Vec<Finding>,
}

impl DatasetReport {
    fn record(&mut self, severity: Severity, location: &str, message: impl Into<String>) {
        self.findings.push(Finding {
            severity,
            location: location.to_string(),
            message: message.into(),
        });
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|finding| finding.severity == severity)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.count(Severity::Error) > 0
    }
}

/// Duplicate keys are errors; blank fields, unreadable dates and `year` fields
/// disagreeing with their date are warnings; empty countries are info.
pub fn validate_dataset(countries: &[CountryRecord]) -> DatasetReport {
    let mut report = DatasetReport::default();
    let mut seen_ids = HashSet::new();
    let mut seen_codes = HashSet::new();

    for (index, country) in countries.iter().enumerate() {
        let location = format!("countries[{index}] id={}", country.id);

        if !seen_ids.insert(country.id) {
            report.record(
                Severity::Error,
                &location,
                format!("duplicate country id {}", country.id),
            );
        }

        if country.code.trim().is_empty() {
            report.record(Severity::Warning, &location, "blank country code");
        } else if !seen_codes.insert(country.code.to_ascii_uppercase()) {
            report.record(
                Severity::Error,
                &location,
                format!("duplicate country code '{}'", country.code),
            );
        }

        if country.name.trim().is_empty() {
            report.record(Severity::Warning, &location, "blank country name");
        }

        if country.holidays.is_empty() {
            report.record(Severity::Info, &location, "no holidays listed");
        }

        check_holidays(&mut report, country, &location);
    }

    report
}

fn check_holidays(report: &mut DatasetReport, country: &CountryRecord, country_location: &str) {
    let mut seen_ids = HashSet::new();

    for (index, holiday) in country.holidays.iter().enumerate() {
        let location = format!("{country_location}.holidays[{index}] id={}", holiday.id);

        if !seen_ids.insert(holiday.id) {
            report.record(
                Severity::Error,
                &location,
                format!("duplicate holiday id {} within {}", holiday.id, country.code),
            );
        }

        match &holiday.date {
            HolidayDate::Raw(raw) => report.record(
                Severity::Warning,
                &location,
                format!("date '{raw}' is not an ISO-8601 date"),
            ),
            HolidayDate::Parsed(_) => {
                if holiday.date.year() != Some(holiday.year) {
                    report.record(
                        Severity::Warning,
                        &location,
                        format!("year {} disagrees with date {}", holiday.year, holiday.date),
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::country::HolidayRecord;

    fn holiday(id: i64, year: i32, date: &str) -> HolidayRecord {
        HolidayRecord {
            id,
            year,
            date: HolidayDate::parse(date),
            name: "Holiday".to_string(),
            kind: "public".to_string(),
        }
    }

    fn country(id: i64, code: &str, holidays: Vec<HolidayRecord>) -> CountryRecord {
        CountryRecord {
            id,
            code: code.to_string(),
            name: format!("Country {id}"),
            holidays,
        }
    }

    #[test]
    fn clean_dataset_has_no_findings() {
        let report = validate_dataset(&[country(1, "BE", vec![holiday(1, 2024, "2024-07-21")])]);
        assert!(!report.has_errors());
        assert!(report.findings.is_empty());
    }

    #[test]
    fn duplicate_keys_are_errors() {
        let report = validate_dataset(&[
            country(1, "BE", vec![holiday(1, 2024, "2024-01-01"), holiday(1, 2024, "2024-12-25")]),
            country(1, "be", vec![holiday(1, 2024, "2024-01-01")]),
        ]);
        assert!(report.has_errors());
        assert_eq!(report.count(Severity::Error), 3);
    }

    #[test]
    fn bad_dates_and_year_mismatch_are_warnings() {
        let report = validate_dataset(&[country(
            1,
            "BE",
            vec![holiday(1, 2024, "someday"), holiday(2, 2024, "2025-01-01")],
        )]);
        assert!(!report.has_errors());
        assert_eq!(report.count(Severity::Warning), 2);
    }

    #[test]
    fn empty_country_is_informational() {
        let report = validate_dataset(&[country(3, "NL", Vec::new())]);
        assert_eq!(report.count(Severity::Info), 1);
        assert_eq!(
            report.findings[0].to_string(),
            "[info] countries[0] id=3: no holidays listed"
        );
    }
}
