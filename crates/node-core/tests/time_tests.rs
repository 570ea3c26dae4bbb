#![cfg(feature = "chrono")]

/// Date/time shapes: ISO-8601 text in both directions.
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use node_core::{deserialize, serialize, DeserializationError, Node, NodeError, Record};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 17).unwrap()
}

fn time() -> NaiveTime {
    NaiveTime::from_hms_opt(14, 30, 0).unwrap()
}

// ============================================================================
// 1. Naive values
// ============================================================================

#[test]
fn naive_date() {
    assert_eq!(serialize(&date()).unwrap(), Node::from("2026-02-17"));
    assert_eq!(deserialize::<NaiveDate>(&Node::from("2026-02-17")).unwrap(), date());
}

#[test]
fn naive_time() {
    assert_eq!(serialize(&time()).unwrap(), Node::from("14:30:00"));
    assert_eq!(deserialize::<NaiveTime>(&Node::from("14:30:00")).unwrap(), time());
}

#[test]
fn naive_datetime() {
    let dt = NaiveDateTime::new(date(), time());
    assert_eq!(serialize(&dt).unwrap(), Node::from("2026-02-17T14:30:00"));
    assert_eq!(
        deserialize::<NaiveDateTime>(&Node::from("2026-02-17T14:30:00")).unwrap(),
        dt
    );
}

#[test]
fn malformed_text_is_invalid_text() {
    let err = deserialize::<NaiveDate>(&Node::from("2026-13-01")).unwrap_err();
    assert!(matches!(
        err,
        NodeError::Deserialization(DeserializationError::InvalidText { target: "date", .. })
    ));
}

#[test]
fn non_text_is_a_conversion_error() {
    let err = deserialize::<NaiveDate>(&Node::from(20260217)).unwrap_err();
    assert!(matches!(err, NodeError::Conversion(_)));
}

// ============================================================================
// 2. Zoned values
// ============================================================================

#[test]
fn utc_datetime_appends_offset() {
    let dt = Utc.with_ymd_and_hms(2026, 2, 17, 14, 30, 0).unwrap();
    assert_eq!(serialize(&dt).unwrap(), Node::from("2026-02-17T14:30:00+00:00"));
    assert_eq!(
        deserialize::<DateTime<Utc>>(&Node::from("2026-02-17T14:30:00Z")).unwrap(),
        dt
    );
}

#[test]
fn utc_normalizes_other_offsets() {
    let parsed: DateTime<Utc> = deserialize(&Node::from("2026-02-17T16:30:00+02:00")).unwrap();
    assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 2, 17, 14, 30, 0).unwrap());
}

#[test]
fn fixed_offset_datetime() {
    let offset = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
    let dt = offset.with_ymd_and_hms(2026, 2, 17, 14, 30, 0).unwrap();
    let node = serialize(&dt).unwrap();
    assert_eq!(node, Node::from("2026-02-17T14:30:00+05:30"));
    assert_eq!(deserialize::<DateTime<FixedOffset>>(&node).unwrap(), dt);
}

#[test]
fn named_zone_appends_zone_suffix() {
    let dt = chrono_tz::America::Los_Angeles
        .with_ymd_and_hms(2026, 2, 17, 14, 30, 0)
        .unwrap();
    let node = serialize(&dt).unwrap();
    assert_eq!(
        node,
        Node::from("2026-02-17T14:30:00-08:00[America/Los_Angeles]")
    );

    let back: DateTime<Tz> = deserialize(&node).unwrap();
    assert_eq!(back, dt);
    assert_eq!(back.timezone(), chrono_tz::America::Los_Angeles);
}

#[test]
fn named_zone_requires_suffix_and_known_zone() {
    assert!(deserialize::<DateTime<Tz>>(&Node::from("2026-02-17T14:30:00-08:00")).is_err());
    assert!(
        deserialize::<DateTime<Tz>>(&Node::from("2026-02-17T14:30:00-08:00[Mars/Olympus]"))
            .is_err()
    );
}

// ============================================================================
// 3. Inside records
// ============================================================================

#[derive(Debug, PartialEq, Record)]
struct Meeting {
    day: NaiveDate,
    starts: NaiveTime,
    #[node(optional)]
    ends: Option<NaiveTime>,
    created: DateTime<Utc>,
}

#[test]
fn record_with_date_fields_roundtrips() {
    let meeting = Meeting {
        day: date(),
        starts: time(),
        ends: None,
        created: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
    };
    let node = serialize(&meeting).unwrap();
    assert_eq!(node["day"], Node::from("2026-02-17"));
    assert_eq!(node["created"], Node::from("2026-01-01T00:00:00+00:00"));
    assert_eq!(deserialize::<Meeting>(&node).unwrap(), meeting);
}
