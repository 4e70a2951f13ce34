//! Data module - source loading and table preparation

mod loader;
mod preparer;

pub use loader::{LoaderError, SourceLoader};
pub use preparer::{PrepareError, TablePreparer, REQUIRED_COLUMNS};

/// Column names shared by the loader, the preparer and the summaries.
pub const COL_COUNTRY_CODE: &str = "Country Code";
pub const COL_COUNTRY: &str = "Country";
pub const COL_CUISINES: &str = "Cuisines";
pub const COL_RATING: &str = "Aggregate rating";
pub const COL_PRICE_RANGE: &str = "Price range";
pub const COL_COST: &str = "Average Cost for two";
pub const COL_VOTES: &str = "Votes";
