//! View Catalog Module
//! The nine selectable views, their menu labels and chart titles.

use thiserror::Error;

/// Raised when a view label does not match any catalog entry. An
/// unrecognized selection is an error, never a silent no-render.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown view \"{0}\"")]
pub struct InvalidViewError(pub String);

/// One selectable (aggregation, chart type) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    TopCountries,
    TopCuisines,
    RatingDistribution,
    PriceRangeDistribution,
    CostVsRating,
    CorrelationHeatmap,
    VotesDistribution,
    AvgCostByCountry,
    CuisineVsRating,
}

impl View {
    /// Sidebar menu order.
    pub const ALL: [View; 9] = [
        View::TopCountries,
        View::TopCuisines,
        View::RatingDistribution,
        View::PriceRangeDistribution,
        View::CostVsRating,
        View::CorrelationHeatmap,
        View::VotesDistribution,
        View::AvgCostByCountry,
        View::CuisineVsRating,
    ];

    /// The literal menu label.
    pub fn label(self) -> &'static str {
        match self {
            View::TopCountries => "Top 10 Countries",
            View::TopCuisines => "Top 10 Cuisines",
            View::RatingDistribution => "Rating Distribution",
            View::PriceRangeDistribution => "Price Range Distribution",
            View::CostVsRating => "Cost vs Rating",
            View::CorrelationHeatmap => "Correlation Heatmap",
            View::VotesDistribution => "Votes Distribution",
            View::AvgCostByCountry => "Average Cost by Country",
            View::CuisineVsRating => "Cuisine vs Rating",
        }
    }

    /// Title drawn above the chart.
    pub fn title(self) -> &'static str {
        match self {
            View::TopCountries => "Top 10 Countries with Most Restaurants",
            View::TopCuisines => "Top 10 Cuisines",
            View::RatingDistribution => "Distribution of Ratings",
            View::PriceRangeDistribution => "Distribution of Price Ranges (1=Cheap, 4=Luxury)",
            View::CostVsRating => "Cost vs Rating (Bubble size = Votes)",
            View::CorrelationHeatmap => "Correlation Heatmap",
            View::VotesDistribution => "Votes Distribution (limited to 2000 for clarity)",
            View::AvgCostByCountry => "Top 10 Countries by Average Cost for Two",
            View::CuisineVsRating => "Top 10 Cuisines by Average Rating",
        }
    }

    /// Resolve a menu label back to its view.
    pub fn from_label(label: &str) -> Result<View, InvalidViewError> {
        View::ALL
            .iter()
            .copied()
            .find(|view| view.label() == label)
            .ok_or_else(|| InvalidViewError(label.to_string()))
    }
}

impl Default for View {
    fn default() -> Self {
        View::TopCountries
    }
}
