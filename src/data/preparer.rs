//! Table Preparer Module
//! Joins restaurant rows to the country lookup and cleans the result.

use polars::prelude::*;
use thiserror::Error;
use tracing::info;

use crate::data::{
    COL_COST, COL_COUNTRY, COL_COUNTRY_CODE, COL_CUISINES, COL_PRICE_RANGE, COL_RATING, COL_VOTES,
};

#[derive(Error, Debug)]
pub enum PrepareError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("column \"{0}\" missing after join")]
    MissingColumn(&'static str),
}

/// Columns every view depends on; verified once the join has run.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    COL_COUNTRY,
    COL_CUISINES,
    COL_RATING,
    COL_PRICE_RANGE,
    COL_COST,
    COL_VOTES,
];

/// Produces the cleaned table consumed read-only by every view.
pub struct TablePreparer;

impl TablePreparer {
    /// Build the cleaned table:
    /// 1. left-join the lookup on the country code (unmatched codes keep a
    ///    null Country, no rows are dropped),
    /// 2. remove exact full-row duplicates, keeping the first occurrence,
    /// 3. drop rows missing Cuisines or Aggregate rating.
    ///
    /// Row order is preserved throughout, so repeated runs over the same
    /// inputs yield identical tables.
    pub fn prepare(restaurants: &DataFrame, lookup: &DataFrame) -> Result<DataFrame, PrepareError> {
        let rows_in = restaurants.height();

        let cleaned = restaurants
            .clone()
            .lazy()
            .with_column(col(COL_COUNTRY_CODE).cast(DataType::Int64))
            .join(
                lookup
                    .clone()
                    .lazy()
                    .with_column(col(COL_COUNTRY_CODE).cast(DataType::Int64)),
                [col(COL_COUNTRY_CODE)],
                [col(COL_COUNTRY_CODE)],
                JoinArgs::new(JoinType::Left),
            )
            .unique_stable(None, UniqueKeepStrategy::First)
            .drop_nulls(Some(vec![col(COL_CUISINES), col(COL_RATING)]))
            .collect()?;

        for name in REQUIRED_COLUMNS {
            if cleaned.column(name).is_err() {
                return Err(PrepareError::MissingColumn(name));
            }
        }

        info!(
            rows_in,
            rows_out = cleaned.height(),
            "prepared cleaned table"
        );
        Ok(cleaned)
    }
}
