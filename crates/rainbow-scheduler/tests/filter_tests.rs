//! Tests for building a `CourseFilter` from raw request parameters.

use chrono::NaiveTime;
use rainbow_scheduler::{build_filter, CourseFilter, DaySet, FilterField, FilterParams};

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// Defaults and identity
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn empty_params_build_an_inactive_filter() {
    let filter = build_filter(&FilterParams::default()).unwrap();

    assert!(!filter.has_identity());
    assert_eq!(filter.start_after(), None);
    assert_eq!(filter.end_before(), None);
    assert_eq!(filter.online(), None);
    assert_eq!(filter.synchronous(), None);
    assert!(filter.days().is_empty());
    assert_eq!(filter, CourseFilter::default());
}

#[test]
fn course_ids_are_normalized() {
    let filter = CourseFilter::builder()
        .course_ids(["ICS 101", "ics101", " math  241 "])
        .build()
        .unwrap();

    let ids: Vec<&str> = filter.course_ids().iter().map(String::as_str).collect();
    assert_eq!(ids, ["ICS101", "MATH241"], "duplicates collapse after normalization");
}

#[test]
fn comma_separated_and_repeated_lists_merge() {
    let filter = CourseFilter::builder()
        .crns(["10001,10002", "10003", " ", "10001"])
        .build()
        .unwrap();

    let crns: Vec<&str> = filter.crns().iter().map(String::as_str).collect();
    assert_eq!(crns, ["10001", "10002", "10003"]);
}

#[test]
fn malformed_crn_rejected() {
    let err = CourseFilter::builder().crns(["100 01"]).build().unwrap_err();
    assert_eq!(err.field, FilterField::Crn);
}

#[test]
fn subject_without_number_rejected() {
    let err = CourseFilter::builder().course_ids(["ICS"]).build().unwrap_err();
    assert_eq!(err.field, FilterField::CourseId);
}

// ─────────────────────────────────────────────────────────────────────────────
// Time bounds
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn time_bounds_parse() {
    let filter = CourseFilter::builder()
        .start_after("08:30")
        .end_before("17:00")
        .build()
        .unwrap();

    assert_eq!(filter.start_after(), Some(hm(8, 30)));
    assert_eq!(filter.end_before(), Some(hm(17, 0)));
}

#[test]
fn inverted_time_bounds_rejected() {
    let err = CourseFilter::builder()
        .start_after("14:00")
        .end_before("09:00")
        .build()
        .unwrap_err();

    assert_eq!(err.field, FilterField::EndBefore);
}

#[test]
fn equal_time_bounds_rejected() {
    let err = CourseFilter::builder()
        .start_after("09:00")
        .end_before("09:00")
        .build()
        .unwrap_err();

    assert_eq!(err.field, FilterField::EndBefore);
}

#[test]
fn unparsable_times_name_their_field() {
    let err = CourseFilter::builder().start_after("9am").build().unwrap_err();
    assert_eq!(err.field, FilterField::StartAfter);

    let err = CourseFilter::builder().end_before("24:30").build().unwrap_err();
    assert_eq!(err.field, FilterField::EndBefore);
}

#[test]
fn blank_time_is_absent() {
    let filter = CourseFilter::builder().start_after("  ").build().unwrap();
    assert_eq!(filter.start_after(), None);
}

// ─────────────────────────────────────────────────────────────────────────────
// Boolean tokens
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn boolean_tokens_accepted() {
    for (token, expected) in [
        ("true", true),
        ("TRUE", true),
        ("1", true),
        ("yes", true),
        ("false", false),
        ("0", false),
        ("No", false),
    ] {
        let filter = CourseFilter::builder()
            .online(token)
            .synchronous(token)
            .build()
            .unwrap();
        assert_eq!(filter.online(), Some(expected), "online={token}");
        assert_eq!(filter.synchronous(), Some(expected), "sync={token}");
    }
}

#[test]
fn unknown_boolean_token_rejected() {
    let err = CourseFilter::builder().online("maybe").build().unwrap_err();
    assert_eq!(err.field, FilterField::Online);
    assert!(err.to_string().contains("online"), "message: {err}");

    let err = CourseFilter::builder().synchronous("2").build().unwrap_err();
    assert_eq!(err.field, FilterField::Synchronous);
}

// ─────────────────────────────────────────────────────────────────────────────
// Day tokens
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn day_tokens_split_into_allow_and_deny() {
    let filter = CourseFilter::builder()
        .days(["M", "w,!F", "!u"])
        .build()
        .unwrap();

    assert_eq!(filter.days().allowed, DaySet::parse("MW").unwrap());
    assert_eq!(filter.days().denied, DaySet::parse("FU").unwrap());
}

#[test]
fn unknown_day_code_rejected() {
    let err = CourseFilter::builder().days(["X"]).build().unwrap_err();
    assert_eq!(err.field, FilterField::Day);

    let err = CourseFilter::builder().days(["!"]).build().unwrap_err();
    assert_eq!(err.field, FilterField::Day);
}

#[test]
fn day_both_allowed_and_denied_rejected() {
    let err = CourseFilter::builder().days(["M", "!M"]).build().unwrap_err();
    assert_eq!(err.field, FilterField::Day);
}

// ─────────────────────────────────────────────────────────────────────────────
// Value semantics
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn identical_inputs_build_equal_filters() {
    let params = FilterParams {
        crn: vec!["10001".into()],
        cid: vec!["ICS 101".into()],
        start_after: Some("08:00".into()),
        end_before: Some("15:00".into()),
        online: Some("false".into()),
        sync: Some("1".into()),
        day: vec!["!F".into()],
    };

    assert_eq!(build_filter(&params).unwrap(), build_filter(&params).unwrap());
}

#[test]
fn params_deserialize_from_partial_json() {
    let params: FilterParams =
        serde_json::from_str(r#"{"cid":["ICS 101"],"day":["!F"]}"#).unwrap();

    let filter = build_filter(&params).unwrap();
    assert!(filter.course_ids().contains("ICS101"));
    assert_eq!(filter.days().denied, DaySet::parse("F").unwrap());
}
