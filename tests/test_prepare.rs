use polars::prelude::*;
use resto_lens::data::{PrepareError, TablePreparer};

fn restaurants() -> DataFrame {
    df!(
        "Restaurant Name" => ["Alpha", "Beta", "Beta", "Gamma", "Delta"],
        "Country Code" => [1i64, 1, 1, 14, 99],
        "Cuisines" => [Some("Italian"), Some("Chinese"), Some("Chinese"), None, Some("Cafe")],
        "Aggregate rating" => [4.0f64, 3.0, 3.0, 4.5, 3.8],
        "Price range" => [1i64, 2, 2, 3, 4],
        "Average Cost for two" => [50.0f64, 30.0, 30.0, 80.0, 40.0],
        "Votes" => [100i64, 40, 40, 500, 60],
    )
    .unwrap()
}

fn lookup() -> DataFrame {
    df!(
        "Country Code" => [1i64, 14, 30],
        "Country" => ["India", "Australia", "Brazil"],
    )
    .unwrap()
}

#[test]
fn test_prepare_drops_duplicates_and_null_rows() {
    let cleaned = TablePreparer::prepare(&restaurants(), &lookup()).unwrap();
    // 5 rows in: one exact duplicate removed, one null-cuisine row removed
    assert_eq!(cleaned.height(), 3);

    let cuisines = cleaned.column("Cuisines").unwrap();
    let ratings = cleaned.column("Aggregate rating").unwrap();
    for i in 0..cleaned.height() {
        assert!(!cuisines.get(i).unwrap().is_null());
        assert!(!ratings.get(i).unwrap().is_null());
    }
}

#[test]
fn test_prepare_preserves_row_order() {
    let cleaned = TablePreparer::prepare(&restaurants(), &lookup()).unwrap();
    let names = cleaned.column("Restaurant Name").unwrap();
    let names: Vec<&str> = (0..cleaned.height())
        .map(|i| names.str().unwrap().get(i).unwrap())
        .collect();
    assert_eq!(names, ["Alpha", "Beta", "Delta"]);
}

#[test]
fn test_prepare_join_maps_country_names() {
    let cleaned = TablePreparer::prepare(&restaurants(), &lookup()).unwrap();
    let country = cleaned.column("Country").unwrap();

    // Codes present in the lookup resolve to the mapped name
    assert_eq!(country.str().unwrap().get(0), Some("India"));
    assert_eq!(country.str().unwrap().get(1), Some("India"));
    // Code 99 has no lookup entry: the row survives with a null Country
    assert!(country.get(2).unwrap().is_null());
}

#[test]
fn test_prepare_is_idempotent() {
    let first = TablePreparer::prepare(&restaurants(), &lookup()).unwrap();
    let second = TablePreparer::prepare(&restaurants(), &lookup()).unwrap();
    assert!(first.equals_missing(&second));
}

#[test]
fn test_prepare_missing_required_column_is_error() {
    let mut partial = restaurants();
    let _ = partial.drop_in_place("Votes").unwrap();

    let err = TablePreparer::prepare(&partial, &lookup()).unwrap_err();
    assert!(matches!(err, PrepareError::MissingColumn("Votes")));
}
