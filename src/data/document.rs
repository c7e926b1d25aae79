//! Wire shape of the remote dataset document:
//! `{ countries: [{ id, code, name, holidays: [{ id, year, date, name, type }] }] }`.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetDocument {
    pub countries: Vec<SourceCountry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceCountry {
    pub id: i64,
    pub code: String,
    pub name: String,
    /// Absent and `null` both mean "no holidays listed".
    #[serde(default)]
    pub holidays: Option<Vec<SourceHoliday>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceHoliday {
    pub id: i64,
    pub year: i32,
    /// Kept loosely typed; normalization decides whether it is a usable date.
    #[serde(default)]
    pub date: serde_json::Value,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}
