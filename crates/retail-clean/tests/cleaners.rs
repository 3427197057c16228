//! End-to-end tests of each entity's rule set over small raw frames.

use polars::prelude::{AnyValue, Column, DataFrame, DataType, NamedFrom};
use retail_clean::{EntityFrame, build_default_registry, is_canonical_uuid};
use retail_model::Entity;

fn string_at(frame: &EntityFrame, column: &str, idx: usize) -> String {
    let value = frame.data.column(column).unwrap().get(idx).unwrap();
    retail_ingest::any_to_string(value)
}

// =========================================================================
// Users
// =========================================================================

fn raw_users() -> DataFrame {
    DataFrame::new(vec![
        Column::new("index".into(), vec![0i64, 1, 2]),
        Column::new(
            "date_of_birth".into(),
            vec!["1968 October 16", "1973-04-12", "not a date"],
        ),
        Column::new(
            "join_date".into(),
            vec!["2018-10-10", "July 2019 14", "2020-01-01"],
        ),
        Column::new(
            "country".into(),
            vec!["United Kingdom", "Germany", "United Kingdom"],
        ),
        Column::new(
            "country_code".into(),
            vec![Some("GGB"), Some("DE"), Some("GGB")],
        ),
        Column::new(
            "phone_number".into(),
            vec!["01234567890", "049 1754 736577", "12-99"],
        ),
        Column::new(
            "user_uuid".into(),
            vec![
                "93caf182-e4e9-4c58-a8ce-f23d31d664a2",
                "8fe96c3a-d62d-4eb5-b313-cf12d9126a49",
                "not-a-uuid",
            ],
        ),
    ])
    .unwrap()
}

#[test]
fn users_repair_uk_country_code_and_filter_invalid_uuids() {
    let registry = build_default_registry();
    let frame = registry.clean(Entity::Users, raw_users()).unwrap();

    // The not-a-uuid row is gone.
    assert_eq!(frame.record_count(), 2);
    // United Kingdom rows get GB regardless of the code the source held.
    assert_eq!(string_at(&frame, "country_code", 0), "GB");
    assert_eq!(string_at(&frame, "country_code", 1), "DE");
    // Dates coerced to canonical text.
    assert_eq!(string_at(&frame, "date_of_birth", 0), "1968-10-16");
    assert_eq!(string_at(&frame, "join_date", 1), "2019-07-14");
    assert_eq!(frame.primary_key.as_deref(), Some("index"));
}

#[test]
fn users_create_country_code_when_source_lacks_it() {
    let raw = DataFrame::new(vec![
        Column::new("index".into(), vec![0i64]),
        Column::new("date_of_birth".into(), vec!["1970-01-01"]),
        Column::new("join_date".into(), vec!["2001-05-20"]),
        Column::new("country".into(), vec!["United Kingdom"]),
        Column::new("phone_number".into(), vec!["01234567890"]),
        Column::new(
            "user_uuid".into(),
            vec!["93caf182-e4e9-4c58-a8ce-f23d31d664a2"],
        ),
    ])
    .unwrap();
    let registry = build_default_registry();
    let frame = registry.clean(Entity::Users, raw).unwrap();
    assert_eq!(frame.record_count(), 1);
    assert_eq!(string_at(&frame, "country_code", 0), "GB");
}

#[test]
fn users_blank_phone_numbers_failing_their_country_pattern() {
    let raw = DataFrame::new(vec![
        Column::new("index".into(), vec![0i64, 1]),
        Column::new("date_of_birth".into(), vec!["1970-01-01", "1980-02-02"]),
        Column::new("join_date".into(), vec!["2001-05-20", "2002-06-21"]),
        Column::new("country".into(), vec!["United States", "United States"]),
        Column::new("country_code".into(), vec!["US", "US"]),
        Column::new(
            "phone_number".into(),
            vec!["(123) 456-7890", "totally wrong"],
        ),
        Column::new(
            "user_uuid".into(),
            vec![
                "93caf182-e4e9-4c58-a8ce-f23d31d664a2",
                "8fe96c3a-d62d-4eb5-b313-cf12d9126a49",
            ],
        ),
    ])
    .unwrap();
    let registry = build_default_registry();
    let frame = registry.clean(Entity::Users, raw).unwrap();
    assert_eq!(frame.record_count(), 2);
    assert_eq!(string_at(&frame, "phone_number", 0), "(123) 456-7890");
    let blanked = frame.data.column("phone_number").unwrap().get(1).unwrap();
    assert!(matches!(blanked, AnyValue::Null));
}

#[test]
fn users_missing_required_column_is_fatal() {
    let raw = DataFrame::new(vec![
        Column::new("index".into(), vec![0i64]),
        Column::new("join_date".into(), vec!["2001-05-20"]),
    ])
    .unwrap();
    let registry = build_default_registry();
    let error = registry.clean(Entity::Users, raw).unwrap_err();
    assert!(error.to_string().contains("date_of_birth"));
}

// =========================================================================
// Cards
// =========================================================================

#[test]
fn cards_strip_punctuation_and_coerce_dates() {
    let raw = DataFrame::new(vec![
        Column::new(
            "card_number".into(),
            vec!["??4971858637664481", "30060773296197", "NULL"],
        ),
        Column::new("expiry_date".into(), vec!["04/24", "09/26", "NULL"]),
        Column::new(
            "card_provider".into(),
            vec!["VISA 16 digit", "Diners Club / Carte Blanche", "NULL"],
        ),
        Column::new(
            "date_payment_confirmed".into(),
            vec!["2008-06-16", "December 2015 25", "NULL"],
        ),
    ])
    .unwrap();
    let registry = build_default_registry();
    let frame = registry.clean(Entity::Cards, raw).unwrap();

    // Sentinel row dropped by normalization.
    assert_eq!(frame.record_count(), 2);
    assert_eq!(string_at(&frame, "card_number", 0), "4971858637664481");
    assert_eq!(string_at(&frame, "date_payment_confirmed", 1), "2015-12-25");
}

// =========================================================================
// Stores
// =========================================================================

fn raw_stores() -> DataFrame {
    DataFrame::new(vec![
        Column::new("index".into(), vec![0i64, 1, 2, 3]),
        Column::new(
            "address".into(),
            vec!["Flat 1, High St", "Hauptstr. 3", "Main St 7", "Rue de X"],
        ),
        Column::new("lat".into(), vec![Some("NULL"), None, None, None]),
        Column::new(
            "continent".into(),
            vec!["eeEurope", "Europe", "eeAmerica", "Europe"],
        ),
        Column::new("country_code".into(), vec!["GB", "DE", "US", "FR"]),
        Column::new(
            "staff_numbers".into(),
            vec!["30", "3n9", "80R", "12"],
        ),
        Column::new(
            "opening_date".into(),
            vec!["2002-10-10", "October 2012 08", "2019/05/03", "2001-01-01"],
        ),
        Column::new(
            "store_code".into(),
            vec!["HI-1", "HA-2", "MA-3", "RU-4"],
        ),
    ])
    .unwrap()
}

#[test]
fn stores_fix_continents_filter_countries_and_parse_staff() {
    let registry = build_default_registry();
    let frame = registry.clean(Entity::Stores, raw_stores()).unwrap();

    // The FR row is filtered out; lat never persists.
    assert_eq!(frame.record_count(), 3);
    assert!(frame.data.column("lat").is_err());
    assert_eq!(string_at(&frame, "continent", 0), "Europe");
    assert_eq!(string_at(&frame, "continent", 2), "America");
    // Corrupted staff counts lose their stray characters.
    let staff = frame.data.column("staff_numbers").unwrap();
    assert_eq!(staff.get(1).unwrap().try_extract::<i64>().unwrap(), 39);
    assert_eq!(staff.get(2).unwrap().try_extract::<i64>().unwrap(), 80);
    assert_eq!(string_at(&frame, "opening_date", 1), "2012-10-08");
    assert_eq!(frame.primary_key.as_deref(), Some("index"));
}

#[test]
fn stores_drop_rows_with_unparseable_dates() {
    let mut raw = raw_stores();
    // Corrupt one opening date; the cell becomes missing and the row drops.
    raw.with_column(polars::prelude::Series::new(
        "opening_date".into(),
        vec!["2002-10-10", "GB13QEH3U", "2019/05/03", "2001-01-01"],
    ))
    .unwrap();
    let registry = build_default_registry();
    let frame = registry.clean(Entity::Stores, raw).unwrap();
    assert_eq!(frame.record_count(), 2);
}

#[test]
fn stores_without_lat_column_abort() {
    let mut raw = raw_stores();
    raw.drop_in_place("lat").unwrap();
    let registry = build_default_registry();
    let error = registry.clean(Entity::Stores, raw).unwrap_err();
    assert!(error.to_string().contains("lat"));
}

// =========================================================================
// Products
// =========================================================================

fn raw_products() -> DataFrame {
    DataFrame::new(vec![
        Column::new("unnamed_0".into(), vec![0i64, 1, 2, 3]),
        Column::new(
            "product_name".into(),
            vec!["Towel", "Melon pack", "Kettle", "Mystery"],
        ),
        Column::new(
            "product_price".into(),
            vec!["£12.99", "£3.129", "£24.00", "£5.00"],
        ),
        Column::new(
            "weight".into(),
            vec!["200g", "3 x 100g", "1.5kg", "assorted"],
        ),
        Column::new(
            "EAN".into(),
            vec!["1234567890123", "2345678901234", "3456789012345", "4567890123456"],
        ),
        Column::new(
            "date_added".into(),
            vec!["2018-10-22", "2017 May 13", "2019-01-01", "2020-02-02"],
        ),
        Column::new(
            "uuid".into(),
            vec![
                "83dc0a69-f96f-4c34-bcb7-928acae19a94",
                "8AFB42D9-09F1-4B57-AE6B-5F5C21B7BF37",
                "d56d13ad-4b72-4c34-9fa9-e2ee58085c9e",
                "invalid-uuid",
            ],
        ),
        Column::new(
            "removed".into(),
            vec![
                "Still_avaliable",
                "Removed",
                "Still_avaliable",
                "Still_avaliable",
            ],
        ),
    ])
    .unwrap()
}

#[test]
fn products_convert_weights_prices_and_availability() {
    let registry = build_default_registry();
    let frame = registry.clean(Entity::Products, raw_products()).unwrap();

    // The invalid-uuid row is excluded; the uppercase-hex row passes the
    // textual pattern filter.
    assert_eq!(frame.record_count(), 3);

    let weights = frame.data.column("weight_kg").unwrap();
    assert_eq!(weights.get(0).unwrap().try_extract::<f64>().unwrap(), 0.2);
    assert_eq!(weights.get(1).unwrap().try_extract::<f64>().unwrap(), 0.3);
    assert_eq!(weights.get(2).unwrap().try_extract::<f64>().unwrap(), 1.5);

    let prices = frame.data.column("product_price_gbp").unwrap();
    assert_eq!(prices.get(0).unwrap().try_extract::<f64>().unwrap(), 12.99);
    assert_eq!(prices.get(1).unwrap().try_extract::<f64>().unwrap(), 3.13);

    let available = frame.data.column("still_available").unwrap();
    assert_eq!(available.dtype(), &DataType::Boolean);
    assert!(matches!(available.get(0).unwrap(), AnyValue::Boolean(true)));
    assert!(matches!(available.get(1).unwrap(), AnyValue::Boolean(false)));

    // Destination names and the promoted key.
    assert!(frame.data.column("index").is_ok());
    assert!(frame.data.column("ean").is_ok());
    assert!(frame.data.column("unnamed_0").is_err());
    assert_eq!(frame.primary_key.as_deref(), Some("index"));
}

#[test]
fn products_keep_rows_with_unparseable_prices_as_missing() {
    let mut raw = raw_products();
    raw.with_column(polars::prelude::Series::new(
        "product_price".into(),
        vec!["£12.99", "VLPCU81M30", "£24.00", "£5.00"],
    ))
    .unwrap();
    let registry = build_default_registry();
    let frame = registry.clean(Entity::Products, raw).unwrap();
    let prices = frame.data.column("product_price_gbp").unwrap();
    assert!(matches!(prices.get(1).unwrap(), AnyValue::Null));
}

// =========================================================================
// Orders
// =========================================================================

#[test]
fn orders_prune_columns_and_filter_both_identifiers() {
    let raw = DataFrame::new(vec![
        Column::new("level_0".into(), vec![0i64, 1, 2]),
        Column::new("index".into(), vec![0i64, 1, 2]),
        Column::new(
            "date_uuid".into(),
            vec![
                "3e288e8e-0c4e-4a9c-96f1-60eba27b6fd2",
                "a6f087b0-paint-not-a-uuid",
                "cd613e30-d8f1-4adf-91b7-c3a79e2513ac",
            ],
        ),
        Column::new("first_name".into(), vec!["Ada", "Grace", "Alan"]),
        Column::new("last_name".into(), vec!["L", "H", "T"]),
        Column::new(
            "user_uuid".into(),
            vec![
                "93caf182-e4e9-4c58-a8ce-f23d31d664a2",
                "8fe96c3a-d62d-4eb5-b313-cf12d9126a49",
                "not-a-uuid",
            ],
        ),
        Column::new("1".into(), vec![Some("x"), None, None]),
        Column::new("card_number".into(), vec!["111", "222", "333"]),
        Column::new("product_quantity".into(), vec![1i64, 2, 3]),
    ])
    .unwrap();
    let registry = build_default_registry();
    let frame = registry.clean(Entity::Orders, raw).unwrap();

    // Row 1 has an invalid date_uuid, row 2 an invalid user_uuid.
    assert_eq!(frame.record_count(), 1);
    assert!(frame.data.column("first_name").is_err());
    assert!(frame.data.column("last_name").is_err());
    assert!(frame.data.column("1").is_err());
    assert!(frame.data.column("order_id").is_ok());
    assert_eq!(frame.primary_key.as_deref(), Some("index"));

    // Every surviving identifier is canonical.
    for column in ["user_uuid", "date_uuid"] {
        for idx in 0..frame.record_count() {
            assert!(is_canonical_uuid(&string_at(&frame, column, idx)));
        }
    }
}

#[test]
fn orders_tolerate_absent_optional_columns() {
    let raw = DataFrame::new(vec![
        Column::new("index".into(), vec![0i64]),
        Column::new(
            "date_uuid".into(),
            vec!["3e288e8e-0c4e-4a9c-96f1-60eba27b6fd2"],
        ),
        Column::new(
            "user_uuid".into(),
            vec!["93caf182-e4e9-4c58-a8ce-f23d31d664a2"],
        ),
    ])
    .unwrap();
    let registry = build_default_registry();
    let frame = registry.clean(Entity::Orders, raw).unwrap();
    assert_eq!(frame.record_count(), 1);
}

// =========================================================================
// Dates
// =========================================================================

#[test]
fn dates_filter_time_periods_and_coerce_calendar_parts() {
    let raw = DataFrame::new(vec![
        Column::new("timestamp".into(), vec!["22:00:10", "09:59:03", "12:01:00"]),
        Column::new("month".into(), vec!["5", "12", "7"]),
        Column::new("year".into(), vec!["1998", "2005", "2013"]),
        Column::new("day".into(), vec!["22", "oops", "15"]),
        Column::new(
            "time_period".into(),
            vec!["Evening", "Morning", "Night"],
        ),
        Column::new(
            "date_uuid".into(),
            vec![
                "3e288e8e-0c4e-4a9c-96f1-60eba27b6fd2",
                "cd613e30-d8f1-4adf-91b7-c3a79e2513ac",
                "5ab4bc1c-2b05-4cbb-88af-e8e4bbcbc3e5",
            ],
        ),
    ])
    .unwrap();
    let registry = build_default_registry();
    let frame = registry.clean(Entity::Dates, raw).unwrap();

    // "Night" is not a valid time period.
    assert_eq!(frame.record_count(), 2);
    let days = frame.data.column("day").unwrap();
    assert_eq!(days.dtype(), &DataType::Int64);
    assert_eq!(days.get(0).unwrap().try_extract::<i64>().unwrap(), 22);
    // Coercion happens after the null-drop step, so the unparseable day
    // stays as a missing value instead of dropping its row.
    assert!(matches!(days.get(1).unwrap(), AnyValue::Null));
    let years = frame.data.column("year").unwrap();
    assert_eq!(years.get(1).unwrap().try_extract::<i64>().unwrap(), 2005);
}
