pub mod country;
pub mod document;
pub mod loader;
pub mod source;
pub mod transform;
pub mod validate;

pub use country::{CountryRecord, CountrySummary, EnrichedHoliday, HolidayDate, HolidayRecord};
pub use loader::{load, LoadError};
pub use source::{
    DatasetSource, FileDatasetSource, HttpDatasetSource, StaticDatasetSource, DEFAULT_DATASET_URL,
};
