//! Tests for the transform layer

use super::*;
use crate::classify;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use test_case::test_case;

fn fixed_now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-06-01T08:30:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

// ============================================================================
// Caster tests
// ============================================================================

#[test_case(json!({"rating": {"double": 8.5}}), Some(8.5) ; "nested double form")]
#[test_case(json!({"rating": "7"}), Some(7.0) ; "string number")]
#[test_case(json!({"rating": 9}), Some(9.0) ; "bare integer")]
#[test_case(json!({"rating": 4.6}), Some(4.6) ; "bare float")]
#[test_case(json!({"rating": null}), None ; "explicit null")]
#[test_case(json!({}), None ; "absent field")]
#[test_case(json!({"rating": {"other": 1}}), None ; "object without double")]
#[test_case(json!({"rating": "n/a"}), None ; "unparseable string")]
fn test_rating_cast(record: Value, expected: Option<f64>) {
    let value = Caster::Rating.apply(extract_path(&record, "rating"));
    assert_eq!(value.as_f64(), expected);
}

#[test_case(json!("12"), Some(12) ; "numeric string")]
#[test_case(json!(5), Some(5) ; "integer")]
#[test_case(json!(3.9), Some(3) ; "float truncates")]
#[test_case(json!("4.5"), None ; "decimal string fails")]
#[test_case(json!([1]), None ; "array fails")]
fn test_integer_cast(input: Value, expected: Option<i64>) {
    assert_eq!(Caster::Integer.apply(Some(&input)).as_i64(), expected);
}

#[test]
fn test_date_cast_accepts_iso_dates_only() {
    let ok = Caster::Date.apply(Some(&json!("2024-03-11")));
    assert_eq!(ok, json!("2024-03-11"));

    for bad in [json!("11/03/2024"), json!("not a date"), json!(20240311)] {
        assert_eq!(Caster::Date.apply(Some(&bad)), Value::Null);
    }
    assert_eq!(Caster::Date.apply(None), Value::Null);
}

#[test]
fn test_boolean_cast() {
    assert_eq!(Caster::Boolean.apply(Some(&json!(true))), json!(true));
    assert_eq!(Caster::Boolean.apply(Some(&json!("False"))), json!(false));
    assert_eq!(Caster::Boolean.apply(Some(&json!("yes"))), Value::Null);
    assert_eq!(Caster::Boolean.apply(Some(&json!(1))), Value::Null);
}

#[test]
fn test_array_len_cast_defaults_to_zero() {
    assert_eq!(Caster::ArrayLen.apply(Some(&json!(["a", "b"]))), json!(2));
    assert_eq!(Caster::ArrayLen.apply(Some(&json!(null))), json!(0));
    assert_eq!(Caster::ArrayLen.apply(None), json!(0));
    assert_eq!(Caster::ArrayLen.apply(Some(&json!("x"))), json!(0));
}

#[test]
fn test_json_cast_serializes_complex_values() {
    let value = Caster::Json.apply(Some(&json!([{"category": "General"}])));
    assert_eq!(value, json!(r#"[{"category":"General"}]"#));
    // Strings pass through untouched
    assert_eq!(Caster::Json.apply(Some(&json!("raw"))), json!("raw"));
    assert_eq!(Caster::Json.apply(None), Value::Null);
}

#[test]
fn test_extract_path_walks_nested_objects() {
    let record = json!({"user": {"contributions": {"totalContributions": 42}}});
    let value = extract_path(&record, "user.contributions.totalContributions");
    assert_eq!(value, Some(&json!(42)));
    assert_eq!(extract_path(&record, "user.missing.deep"), None);
    assert_eq!(extract_path(&json!({"a": null}), "a"), None);
}

#[test]
fn test_coalescing_prefers_first_non_null_source() {
    // Geospatial latitude: flat wins over nested when present
    let flat = json!({"latitude": -7.8, "location": {"lat": -6.0}});
    let nested = json!({"latitude": null, "location": {"lat": -6.0}});

    let mapping = GEOSPATIAL_ATTRACTIONS
        .fields
        .iter()
        .find(|f| f.target == "latitude")
        .unwrap();
    assert_eq!(mapping.project(&flat).as_f64(), Some(-7.8));
    assert_eq!(mapping.project(&nested).as_f64(), Some(-6.0));
}

// ============================================================================
// Dataset-level tests
// ============================================================================

fn booking_hotel_record() -> Value {
    json!({
        "hotelId": 188098,
        "name": "Hotel Tentrem",
        "type": "Hotels",
        "stars": "5",
        "price": 120.5,
        "currency": "USD",
        "rating": {"double": 8.9},
        "reviews": 1043,
        "location": {"lat": -7.7828, "lng": 110.3671},
        "address": {"full": "Jl. P. Mangkubumi No.72A", "country": "ID"},
        "facilities": [{"category": "General", "list": ["WiFi"]}],
        "checkIn": "14:00",
        "url": "https://booking.com/hotel/id/tentrem.html"
    })
}

#[test]
fn test_booking_hotel_projection() {
    let batch = classify::ingest(vec![booking_hotel_record()]);
    let dataset = apply(&BOOKING_HOTELS, &batch, fixed_now());

    assert_eq!(dataset.len(), 1);
    let row = &dataset.rows[0];
    assert_eq!(row["source_row_id"], json!(0));
    assert_eq!(row["booking_hotel_id"], json!("188098"));
    assert_eq!(row["hotel_name"], json!("Hotel Tentrem"));
    assert_eq!(row["stars"], json!(5));
    assert_eq!(row["rating"], json!(8.9));
    assert_eq!(row["latitude"], json!(-7.7828));
    assert_eq!(row["full_address"], json!("Jl. P. Mangkubumi No.72A"));
    assert_eq!(row["country"], json!("ID"));
    assert_eq!(row["platform"], json!("booking.com"));
    assert_eq!(row["processed_at"], json!("2024-06-01T08:30:00.000000Z"));
    // Absent source fields land as explicit nulls
    assert_eq!(row["description"], Value::Null);
}

#[test]
fn test_empty_subset_yields_empty_dataset() {
    // A batch with no tripadvisor reviews still produces the dataset shell
    let batch = classify::ingest(vec![booking_hotel_record()]);
    let dataset = apply(&TRIPADVISOR_REVIEWS, &batch, fixed_now());

    assert!(dataset.is_empty());
    assert_eq!(dataset.len(), 0);
    assert_eq!(dataset.name, "tripadvisor_reviews");
    assert!(dataset.has_column("photos_count"));
}

#[test]
fn test_schema_order_and_metadata_columns() {
    let columns = output_columns(&BOOKING_REVIEWS);
    assert_eq!(columns.first().unwrap().name, "source_row_id");
    assert_eq!(columns[columns.len() - 2].name, "platform");
    assert_eq!(columns.last().unwrap().name, "processed_at");
    // source_row_id + mapped fields + platform + processed_at
    assert_eq!(columns.len(), BOOKING_REVIEWS.fields.len() + 3);
}

#[test]
fn test_tripadvisor_review_nested_user_fields() {
    let record = json!({
        "id": 9911,
        "locationId": 307154,
        "text": "Great location",
        "title": "Great",
        "publishedDate": "2024-03-11",
        "rating": 5,
        "user": {
            "name": "traveler42",
            "userLocation": {"name": "Jakarta, Indonesia"},
            "contributions": {"totalContributions": "87"}
        },
        "photos": [{}, {}, {}]
    });
    let batch = classify::ingest(vec![record]);
    let dataset = apply(&TRIPADVISOR_REVIEWS, &batch, fixed_now());

    let row = &dataset.rows[0];
    assert_eq!(row["user_name"], json!("traveler42"));
    assert_eq!(row["user_location"], json!("Jakarta, Indonesia"));
    assert_eq!(row["user_total_contributions"], json!(87));
    assert_eq!(row["published_date"], json!("2024-03-11"));
    assert_eq!(row["photos_count"], json!(3));
}

#[test]
fn test_malformed_values_degrade_to_null() {
    let record = json!({
        "hotelId": 1,
        "type": "Hotels",
        "facilities": [],
        "stars": "five",
        "reviews": {"count": 3},
        "location": {"lat": "not-a-number"},
        "rating": "unrated"
    });
    let batch = classify::ingest(vec![record]);
    let dataset = apply(&BOOKING_HOTELS, &batch, fixed_now());

    let row = &dataset.rows[0];
    assert_eq!(row["stars"], Value::Null);
    assert_eq!(row["reviews"], Value::Null);
    assert_eq!(row["latitude"], Value::Null);
    assert_eq!(row["rating"], Value::Null);
}

#[test]
fn test_transform_is_idempotent_modulo_timestamp() {
    let records = vec![
        booking_hotel_record(),
        json!({"locationId": 1, "amenities": [], "latitude": -7.8, "longitude": 110.4, "name": "X"}),
        json!({"unclassifiable": true}),
    ];
    let now = fixed_now();

    let first = apply_all(&classify::ingest(records.clone()), now);
    let second = apply_all(&classify::ingest(records), now);

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.name, b.name);
        assert_eq!(a.rows, b.rows);
    }
}

#[test]
fn test_apply_all_covers_every_table() {
    let batch = classify::ingest(vec![]);
    let datasets = apply_all(&batch, fixed_now());
    let names: Vec<&str> = datasets.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "booking_hotels",
            "booking_reviews",
            "tripadvisor_hotels",
            "tripadvisor_reviews",
            "geospatial_attractions",
        ]
    );
}
