//! Stats module - view catalog and summary aggregation

mod summary;
mod views;

pub use summary::{
    HistogramBin, PieSlice, RankedEntry, ScatterPoint, SummaryCalculator, SummaryError,
    ViewSummary, CORRELATION_COLUMNS, RATING_BINS, TOP_N, VOTES_BINS, VOTES_DISPLAY_MAX,
};
pub use views::{InvalidViewError, View};
