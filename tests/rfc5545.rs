//! Workspace-level integration tests for the RFC 5545 worked scenarios.
//!
//! Colocated at the root `tests/` directory, driving the public `icalx`
//! facade directly end to end: parse, evaluate, serialize.

use icalx::{parse, serialize, ParseMode};

fn calendar(body: &str) -> icalx::Calendar {
    parse(body.as_bytes(), ParseMode::Lenient).expect("valid calendar")
}

fn event_periods(calendar: &mut icalx::Calendar, uid: &str, from: i64, to: i64) -> Vec<(String, String)> {
    let results = calendar.evaluate(from, to).expect("evaluation succeeds");
    let periods = results.get(uid).cloned().unwrap_or_default();

    periods
        .into_iter()
        .map(|period| match period {
            icalx_ical::value_types::period::Period::Explicit(start, end) => (start.render_ical(), end.render_ical()),
            icalx_ical::value_types::period::Period::Start(start, _) => (start.render_ical(), String::new()),
        })
        .collect()
}

#[test]
fn daily_count_yields_ten_instants() {
    let mut cal = calendar(concat!(
        "BEGIN:VCALENDAR\r\n",
        "VERSION:2.0\r\n",
        "BEGIN:VEVENT\r\n",
        "UID:scenario-1\r\n",
        "DTSTART:19970902T090000Z\r\n",
        "DURATION:PT1H\r\n",
        "RRULE:FREQ=DAILY;COUNT=10\r\n",
        "END:VEVENT\r\n",
        "END:VCALENDAR\r\n",
    ));

    let periods = event_periods(&mut cal, "scenario-1", 0, i64::MAX);

    assert_eq!(periods.len(), 10);
    assert_eq!(periods[0].0, "19970902T090000Z");
    assert_eq!(periods[9].0, "19970911T090000Z");
}

#[test]
fn monthly_last_weekday_yields_last_monday_of_each_month() {
    let mut cal = calendar(concat!(
        "BEGIN:VCALENDAR\r\n",
        "BEGIN:VEVENT\r\n",
        "UID:scenario-2\r\n",
        "DTSTART:19970929T090000Z\r\n",
        "RRULE:FREQ=MONTHLY;BYDAY=-1MO;COUNT=4\r\n",
        "END:VEVENT\r\n",
        "END:VCALENDAR\r\n",
    ));

    let periods = event_periods(&mut cal, "scenario-2", 0, i64::MAX);
    let starts: Vec<&str> = periods.iter().map(|(start, _)| start.as_str()).collect();

    assert_eq!(starts, vec!["19970929T090000Z", "19971027T090000Z", "19971124T090000Z", "19971229T090000Z"]);
}

#[test]
fn yearly_bysetpos_picks_third_weekday_of_month() {
    let mut cal = calendar(concat!(
        "BEGIN:VCALENDAR\r\n",
        "BEGIN:VEVENT\r\n",
        "UID:scenario-3\r\n",
        "DTSTART:19970904T090000Z\r\n",
        "RRULE:FREQ=MONTHLY;BYDAY=TU,WE,TH;BYSETPOS=3;COUNT=3\r\n",
        "END:VEVENT\r\n",
        "END:VCALENDAR\r\n",
    ));

    let periods = event_periods(&mut cal, "scenario-3", 0, i64::MAX);
    let starts: Vec<&str> = periods.iter().map(|(start, _)| start.as_str()).collect();

    assert_eq!(starts, vec!["19970904T090000Z", "19971007T090000Z", "19971106T090000Z"]);
}

#[test]
fn exdate_removes_the_third_day() {
    let mut cal = calendar(concat!(
        "BEGIN:VCALENDAR\r\n",
        "BEGIN:VEVENT\r\n",
        "UID:scenario-4\r\n",
        "DTSTART:20060101T000000Z\r\n",
        "RRULE:FREQ=DAILY;COUNT=5\r\n",
        "EXDATE:20060103T000000Z\r\n",
        "END:VEVENT\r\n",
        "END:VCALENDAR\r\n",
    ));

    let periods = event_periods(&mut cal, "scenario-4", 0, i64::MAX);
    let starts: Vec<&str> = periods.iter().map(|(start, _)| start.as_str()).collect();

    assert_eq!(starts, vec!["20060101T000000Z", "20060102T000000Z", "20060104T000000Z", "20060105T000000Z"]);
}

/// A VTIMEZONE spring-forward at 2006-04-02T02:00 America/New_York; a DAILY
/// 02:30-local rule should land at 01:30 UTC once DST starts, not skip or
/// duplicate the transition day.
#[test]
fn timezone_crossing_spring_forward_is_not_duplicated() {
    let mut cal = calendar(concat!(
        "BEGIN:VCALENDAR\r\n",
        "BEGIN:VTIMEZONE\r\n",
        "TZID:America/New_York\r\n",
        "BEGIN:STANDARD\r\n",
        "DTSTART:19671029T020000\r\n",
        "TZOFFSETFROM:-0400\r\n",
        "TZOFFSETTO:-0500\r\n",
        "TZNAME:EST\r\n",
        "RRULE:FREQ=YEARLY;BYMONTH=10;BYDAY=-1SU\r\n",
        "END:STANDARD\r\n",
        "BEGIN:DAYLIGHT\r\n",
        "DTSTART:20060402T020000\r\n",
        "TZOFFSETFROM:-0500\r\n",
        "TZOFFSETTO:-0400\r\n",
        "TZNAME:EDT\r\n",
        "RRULE:FREQ=YEARLY;BYMONTH=4;BYDAY=1SU\r\n",
        "END:DAYLIGHT\r\n",
        "END:VTIMEZONE\r\n",
        "BEGIN:VEVENT\r\n",
        "UID:scenario-5\r\n",
        "DTSTART;TZID=America/New_York:20060401T013000\r\n",
        "RRULE:FREQ=DAILY;COUNT=3\r\n",
        "END:VEVENT\r\n",
        "END:VCALENDAR\r\n",
    ));

    assert!(cal.get_timezone("America/New_York").is_some());

    let periods = event_periods(&mut cal, "scenario-5", 0, i64::MAX);
    let starts: Vec<&str> = periods.iter().map(|(start, _)| start.as_str()).collect();

    // 01:30 local stays fixed across all three days; the transition at
    // 2006-04-02T02:00 local falls between day 1 and day 2, so the first two
    // instants are five hours ahead of UTC (EST) and the third is four
    // (EDT) — three distinct instants, none dropped or doubled.
    assert_eq!(starts.len(), 3);
    assert_eq!(starts[0], "20060401T063000Z");
    assert_eq!(starts[1], "20060402T063000Z");
    assert_eq!(starts[2], "20060403T053000Z");
}

/// A single value split across five folded physical lines parses to one
/// logical value equal to its unfolded form.
#[test]
fn folding_round_trip_yields_one_logical_value() {
    let folded = concat!(
        "BEGIN:VCALENDAR\r\n",
        "BEGIN:VEVENT\r\n",
        "UID:scenario-6\r\n",
        "DTSTART:19970902T090000Z\r\n",
        "SUMMARY:This description\r\n",
        "  spans five\r\n",
        "  separate folded\r\n",
        "  physical lines\r\n",
        "  without a gap.\r\n",
        "END:VEVENT\r\n",
        "END:VCALENDAR\r\n",
    );

    let unfolded = concat!(
        "BEGIN:VCALENDAR\r\n",
        "BEGIN:VEVENT\r\n",
        "UID:scenario-6\r\n",
        "DTSTART:19970902T090000Z\r\n",
        "SUMMARY:This description spans five separate folded physical lines without a gap.\r\n",
        "END:VEVENT\r\n",
        "END:VCALENDAR\r\n",
    );

    let folded_cal = calendar(folded);
    let unfolded_cal = calendar(unfolded);

    let (Some(folded_event), _) = folded_cal.resolve_uid("scenario-6") else { panic!("missing base event") };
    let (Some(unfolded_event), _) = unfolded_cal.resolve_uid("scenario-6") else { panic!("missing base event") };

    assert_eq!(folded_event.property("SUMMARY").unwrap().value, unfolded_event.property("SUMMARY").unwrap().value);
}

#[test]
fn round_trip_preserves_structure_and_values() {
    let raw = concat!(
        "BEGIN:VCALENDAR\r\n",
        "VERSION:2.0\r\n",
        "PRODID:-//icalx//EN\r\n",
        "BEGIN:VEVENT\r\n",
        "UID:scenario-round-trip\r\n",
        "DTSTART:19970902T090000Z\r\n",
        "SUMMARY:Conference\r\n",
        "END:VEVENT\r\n",
        "END:VCALENDAR\r\n",
    );

    let first = calendar(raw);
    let reparsed = calendar(&String::from_utf8(serialize(&first)).unwrap());

    assert_eq!(first.version, reparsed.version);
    assert_eq!(first.prodid, reparsed.prodid);
    assert_eq!(first.children.len(), reparsed.children.len());
}

#[test]
fn recurrence_bounds_never_exceed_count() {
    let mut cal = calendar(concat!(
        "BEGIN:VCALENDAR\r\n",
        "BEGIN:VEVENT\r\n",
        "UID:scenario-bounds\r\n",
        "DTSTART:19970902T090000Z\r\n",
        "RRULE:FREQ=DAILY;COUNT=10\r\n",
        "END:VEVENT\r\n",
        "END:VCALENDAR\r\n",
    ));

    let periods = event_periods(&mut cal, "scenario-bounds", 0, i64::MAX);
    assert!(periods.len() <= 10);

    // A narrower window only ever shrinks the result, never grows it.
    use std::str::FromStr;
    let bound = icalx_ical::value_types::date_time::DateTime::from_str("19970905T000000Z").unwrap().get_utc_timestamp(None);
    let narrower = event_periods(&mut cal, "scenario-bounds", 0, bound);
    assert!(narrower.len() <= periods.len());
}
