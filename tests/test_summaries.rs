use polars::prelude::*;
use resto_lens::stats::{SummaryCalculator, View, ViewSummary, VOTES_DISPLAY_MAX};

fn ranked(summary: ViewSummary) -> Vec<(String, f64)> {
    match summary {
        ViewSummary::Ranked { entries, .. } => {
            entries.into_iter().map(|e| (e.label, e.value)).collect()
        }
        other => panic!("expected ranked summary, got {other:?}"),
    }
}

#[test]
fn test_top_countries_keeps_ten_and_breaks_ties_first_seen() {
    // 12 distinct countries; A and B tie at 3, C at 2, the rest are singles
    let countries = [
        "A", "A", "A", "B", "B", "B", "C", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L",
    ];
    let df = df!("Country" => countries).unwrap();

    let entries = ranked(SummaryCalculator::compute(&df, View::TopCountries).unwrap());
    assert_eq!(entries.len(), 10);
    assert_eq!(entries[0], ("A".to_string(), 3.0));
    assert_eq!(entries[1], ("B".to_string(), 3.0));
    assert_eq!(entries[2], ("C".to_string(), 2.0));
    // Singles fill the remaining slots in first-seen order
    let tail: Vec<&str> = entries[3..].iter().map(|(l, _)| l.as_str()).collect();
    assert_eq!(tail, ["D", "E", "F", "G", "H", "I", "J"]);
}

#[test]
fn test_top_countries_skips_unresolved_rows() {
    let df = df!("Country" => [Some("A"), None, Some("A"), None]).unwrap();
    let entries = ranked(SummaryCalculator::compute(&df, View::TopCountries).unwrap());
    assert_eq!(entries, vec![("A".to_string(), 2.0)]);
}

#[test]
fn test_cuisine_strings_are_not_split() {
    let df = df!("Cuisines" => ["North Indian, Chinese", "North Indian, Chinese", "Chinese"])
        .unwrap();
    let entries = ranked(SummaryCalculator::compute(&df, View::TopCuisines).unwrap());
    assert_eq!(entries[0], ("North Indian, Chinese".to_string(), 2.0));
    assert_eq!(entries[1], ("Chinese".to_string(), 1.0));
}

#[test]
fn test_end_to_end_three_row_example() {
    let df = df!(
        "Country" => ["A", "A", "B"],
        "Cuisines" => ["Italian", "Chinese", "Italian"],
        "Aggregate rating" => [4.0f64, 3.0, 5.0],
    )
    .unwrap();

    let countries = ranked(SummaryCalculator::compute(&df, View::TopCountries).unwrap());
    assert_eq!(
        countries,
        vec![("A".to_string(), 2.0), ("B".to_string(), 1.0)]
    );

    let cuisines = ranked(SummaryCalculator::compute(&df, View::CuisineVsRating).unwrap());
    assert_eq!(cuisines[0].0, "Italian");
    assert!((cuisines[0].1 - 4.5).abs() < 1e-9);
    assert_eq!(cuisines[1].0, "Chinese");
    assert!((cuisines[1].1 - 3.0).abs() < 1e-9);
}

#[test]
fn test_single_record_cuisine_can_rank_first() {
    let df = df!(
        "Cuisines" => ["Solo", "Common", "Common"],
        "Aggregate rating" => [5.0f64, 4.0, 4.0],
    )
    .unwrap();
    let entries = ranked(SummaryCalculator::compute(&df, View::CuisineVsRating).unwrap());
    assert_eq!(entries[0], ("Solo".to_string(), 5.0));
}

#[test]
fn test_avg_cost_by_country_orders_means_descending() {
    let df = df!(
        "Country" => ["A", "A", "B"],
        "Average Cost for two" => [100.0f64, 200.0, 400.0],
    )
    .unwrap();
    let entries = ranked(SummaryCalculator::compute(&df, View::AvgCostByCountry).unwrap());
    assert_eq!(
        entries,
        vec![("B".to_string(), 400.0), ("A".to_string(), 150.0)]
    );
}

#[test]
fn test_price_range_percentages_sum_to_hundred() {
    let df = df!("Price range" => [1i64, 1, 2, 3]).unwrap();
    let ViewSummary::Pie { slices } =
        SummaryCalculator::compute(&df, View::PriceRangeDistribution).unwrap()
    else {
        panic!("expected pie summary");
    };

    assert_eq!(slices[0].label, "1");
    assert_eq!(slices[0].count, 2);
    assert!((slices[0].percent - 50.0).abs() < 1e-9);
    // Equal-count tiers keep first-seen order
    assert_eq!(slices[1].label, "2");
    assert_eq!(slices[2].label, "3");

    let total: f64 = slices.iter().map(|s| s.percent).sum();
    assert!((total - 100.0).abs() < 1e-9);
}

#[test]
fn test_rating_histogram_has_twenty_bins_and_conserves_mass() {
    let ratings: Vec<f64> = (0..40).map(|i| 1.0 + 0.1 * i as f64).collect();
    let df = df!("Aggregate rating" => ratings).unwrap();

    let ViewSummary::Histogram { bins, curve, .. } =
        SummaryCalculator::compute(&df, View::RatingDistribution).unwrap()
    else {
        panic!("expected histogram summary");
    };

    assert_eq!(bins.len(), 20);
    let total: usize = bins.iter().map(|b| b.count).sum();
    assert_eq!(total, 40);
    assert!(curve.is_some());
}

#[test]
fn test_votes_bins_never_pass_the_display_cap() {
    let mut votes: Vec<i64> = (0..100).map(|i| i * 17 % 1900).collect();
    votes.push(50_000);
    let df = df!("Votes" => votes).unwrap();

    let ViewSummary::Histogram {
        bins, display_max, ..
    } = SummaryCalculator::compute(&df, View::VotesDistribution).unwrap()
    else {
        panic!("expected histogram summary");
    };

    assert_eq!(display_max, Some(VOTES_DISPLAY_MAX));
    assert!(!bins.is_empty());
    for bin in &bins {
        assert!(bin.lower < VOTES_DISPLAY_MAX);
        assert!(bin.upper <= VOTES_DISPLAY_MAX);
    }
}

#[test]
fn test_correlation_matrix_is_bounded_with_unit_diagonal() {
    let df = df!(
        "Average Cost for two" => [10.0f64, 20.0, 30.0, 40.0, 55.0],
        "Price range" => [1i64, 1, 2, 3, 4],
        "Votes" => [5i64, 40, 22, 80, 10],
        "Aggregate rating" => [3.0f64, 3.5, 4.0, 4.5, 4.2],
    )
    .unwrap();

    let ViewSummary::Heatmap { labels, matrix } =
        SummaryCalculator::compute(&df, View::CorrelationHeatmap).unwrap()
    else {
        panic!("expected heatmap summary");
    };

    assert_eq!(labels.len(), 4);
    assert_eq!(matrix.len(), 4);
    for (i, row) in matrix.iter().enumerate() {
        assert_eq!(row.len(), 4);
        for (j, &value) in row.iter().enumerate() {
            if i == j {
                assert!((value - 1.0).abs() < 1e-9);
            } else {
                assert!((-1.0..=1.0).contains(&value));
                // Pearson is symmetric
                assert!((value - matrix[j][i]).abs() < 1e-9);
            }
        }
    }
}

#[test]
fn test_correlation_with_all_null_column_is_recoverable_error() {
    let df = df!(
        "Average Cost for two" => [None::<f64>, None, None],
        "Price range" => [1i64, 2, 3],
        "Votes" => [5i64, 40, 22],
        "Aggregate rating" => [3.0f64, 3.5, 4.0],
    )
    .unwrap();

    let err = SummaryCalculator::compute(&df, View::CorrelationHeatmap).unwrap_err();
    assert!(err.to_string().contains("Average Cost for two"));
}

#[test]
fn test_scatter_skips_incomplete_rows() {
    let df = df!(
        "Average Cost for two" => [10.0f64, 20.0, 30.0],
        "Aggregate rating" => [3.0f64, 3.5, 4.0],
        "Votes" => [Some(5i64), None, Some(22)],
        "Price range" => [1i64, 2, 3],
    )
    .unwrap();

    let ViewSummary::Scatter { points } =
        SummaryCalculator::compute(&df, View::CostVsRating).unwrap()
    else {
        panic!("expected scatter summary");
    };
    assert_eq!(points.len(), 2);
}

#[test]
fn test_empty_table_yields_empty_summaries() {
    let df = df!(
        "Country" => Vec::<String>::new(),
        "Cuisines" => Vec::<String>::new(),
        "Aggregate rating" => Vec::<f64>::new(),
        "Price range" => Vec::<i64>::new(),
        "Average Cost for two" => Vec::<f64>::new(),
        "Votes" => Vec::<i64>::new(),
    )
    .unwrap();

    for view in View::ALL {
        let summary = SummaryCalculator::compute(&df, view).unwrap();
        assert!(summary.is_empty(), "{} should be empty", view.label());
    }
}

#[test]
fn test_view_labels_round_trip_and_unknown_labels_fail() {
    for view in View::ALL {
        assert_eq!(View::from_label(view.label()).unwrap(), view);
    }

    let err = View::from_label("Ratings Overview").unwrap_err();
    assert_eq!(err.0, "Ratings Overview");
}
