use chrono::{NaiveDate, NaiveDateTime};
use dtf_tester::{BuiltinFormatter, DateTimeFormatter, Field, FormatConfig};

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}

fn thursday() -> NaiveDateTime {
    at(2021, 5, 6, 15, 4, 5)
}

fn opts(pairs: &[(Field, &str)]) -> FormatConfig {
    pairs
        .iter()
        .fold(FormatConfig::new(), |config, (field, value)| config.with(*field, value))
}

fn fmt(options: &FormatConfig) -> String {
    BuiltinFormatter::new()
        .format(thursday(), "en-US", options)
        .unwrap()
}

fn fmt_err(options: &FormatConfig) -> String {
    BuiltinFormatter::new()
        .format(thursday(), "en-US", options)
        .unwrap_err()
        .message
}

fn range(options: &FormatConfig, start: NaiveDateTime, end: NaiveDateTime) -> String {
    BuiltinFormatter::new()
        .format_range(start, end, "en-US", options)
        .unwrap()
}

#[test]
fn no_options_gives_numeric_date() {
    assert_eq!(fmt(&FormatConfig::new()), "5/6/2021");
}

#[test]
fn short_month_day_year() {
    let options = opts(&[
        (Field::Month, "short"),
        (Field::Day, "numeric"),
        (Field::Year, "numeric"),
    ]);
    assert_eq!(fmt(&options), "May 6, 2021");
}

#[test]
fn date_styles() {
    assert_eq!(fmt(&opts(&[(Field::DateStyle, "full")])), "Thursday, May 6, 2021");
    assert_eq!(fmt(&opts(&[(Field::DateStyle, "long")])), "May 6, 2021");
    assert_eq!(fmt(&opts(&[(Field::DateStyle, "medium")])), "May 6, 2021");
    assert_eq!(fmt(&opts(&[(Field::DateStyle, "short")])), "5/6/21");
}

#[test]
fn time_styles_and_combinations() {
    assert_eq!(fmt(&opts(&[(Field::TimeStyle, "short")])), "3:04 PM");
    assert_eq!(fmt(&opts(&[(Field::TimeStyle, "medium")])), "3:04:05 PM");
    assert_eq!(fmt(&opts(&[(Field::TimeStyle, "long")])), "3:04:05 PM UTC");
    assert_eq!(
        fmt(&opts(&[(Field::DateStyle, "medium"), (Field::TimeStyle, "short")])),
        "May 6, 2021, 3:04 PM"
    );
    assert_eq!(
        fmt(&opts(&[(Field::DateStyle, "long"), (Field::TimeStyle, "short")])),
        "May 6, 2021 at 3:04 PM"
    );
}

#[test]
fn hour_cycles() {
    let hm = [(Field::Hour, "numeric"), (Field::Minute, "numeric")];
    assert_eq!(fmt(&opts(&hm)), "3:04 PM");
    assert_eq!(
        fmt(&opts(&[hm[0], hm[1], (Field::HourCycle, "h23")])),
        "15:04"
    );
    assert_eq!(
        fmt(&opts(&[hm[0], hm[1], (Field::HourCycle, "h12")]).with_hour12(false)),
        "15:04"
    );
    assert_eq!(
        fmt(&opts(&[hm[0], hm[1], (Field::HourCycle, "h23")]).with_hour12(true)),
        "3:04 PM"
    );

    let formatter = BuiltinFormatter::new();
    let h11 = opts(&[hm[0], hm[1], (Field::HourCycle, "h11")]);
    assert_eq!(
        formatter.format(at(2021, 5, 6, 12, 30, 0), "en-US", &h11).unwrap(),
        "0:30 PM"
    );
    let h24 = opts(&[hm[0], hm[1], (Field::HourCycle, "h24")]);
    assert_eq!(
        formatter.format(at(2021, 5, 6, 0, 15, 0), "en-US", &h24).unwrap(),
        "24:15"
    );
    let two_digit = opts(&[(Field::Hour, "2-digit"), (Field::Minute, "2-digit")]);
    assert_eq!(
        formatter.format(at(2021, 5, 6, 9, 5, 0), "en-US", &two_digit).unwrap(),
        "09:05 AM"
    );
}

#[test]
fn day_periods() {
    assert_eq!(
        fmt(&opts(&[(Field::Hour, "numeric"), (Field::DayPeriod, "short")])),
        "3 in the afternoon"
    );
    assert_eq!(fmt(&opts(&[(Field::DayPeriod, "long")])), "in the afternoon");
}

#[test]
fn weekday_and_partial_dates() {
    assert_eq!(
        fmt(&opts(&[
            (Field::Weekday, "long"),
            (Field::Month, "long"),
            (Field::Day, "numeric"),
        ])),
        "Thursday, May 6"
    );
    assert_eq!(fmt(&opts(&[(Field::Weekday, "short")])), "Thu");
    assert_eq!(
        fmt(&opts(&[
            (Field::Month, "2-digit"),
            (Field::Day, "2-digit"),
            (Field::Year, "numeric"),
        ])),
        "05/06/2021"
    );
    assert_eq!(
        fmt(&opts(&[(Field::Month, "short"), (Field::Year, "numeric")])),
        "May 2021"
    );
}

#[test]
fn time_zone_shifts_and_names() {
    let seoul = opts(&[
        (Field::TimeZone, "Asia/Seoul"),
        (Field::Month, "short"),
        (Field::Day, "numeric"),
        (Field::Year, "numeric"),
    ]);
    assert_eq!(fmt(&seoul), "May 7, 2021");
    assert_eq!(
        fmt(&opts(&[
            (Field::TimeZone, "Asia/Seoul"),
            (Field::Hour, "numeric"),
            (Field::Minute, "numeric"),
            (Field::TimeZoneName, "short"),
        ])),
        "12:04 AM GMT+9"
    );
    assert_eq!(
        fmt(&opts(&[(Field::TimeZoneName, "long")])),
        "5/6/2021, Coordinated Universal Time"
    );
}

#[test]
fn host_zone_is_the_input_wall_clock() {
    let formatter = BuiltinFormatter::with_host_zone("Asia/Seoul").unwrap();
    let nine = at(2021, 5, 6, 9, 0, 0);
    let hm = opts(&[(Field::Hour, "numeric"), (Field::Minute, "numeric")]);
    assert_eq!(formatter.format(nine, "en-US", &hm).unwrap(), "9:00 AM");
    let utc = hm.clone().with(Field::TimeZone, "UTC");
    assert_eq!(formatter.format(nine, "en-US", &utc).unwrap(), "12:00 AM");

    let err = BuiltinFormatter::with_host_zone("Nowhere").unwrap_err();
    assert_eq!(err, "unknown time zone 'Nowhere'");
}

#[test]
fn rejects_values_outside_the_catalogue() {
    let message = fmt_err(&opts(&[(Field::Month, "foo")]));
    assert_eq!(
        message,
        "Error formatting date.\n\
         Value foo out of range for Intl.DateTimeFormat options property month\n\
         RangeError: Value foo out of range for Intl.DateTimeFormat options property month\n    \
         at new DateTimeFormat (<anonymous>)"
    );
}

#[test]
fn rejects_unknown_time_zones_and_locales() {
    assert!(
        fmt_err(&opts(&[(Field::TimeZone, "Mars/Base")]))
            .contains("Invalid time zone specified: Mars/Base")
    );
    let err = BuiltinFormatter::new()
        .format(thursday(), "not a locale", &FormatConfig::new())
        .unwrap_err();
    assert!(err.message.contains("Incorrect locale information provided"));
}

#[test]
fn rejects_styles_mixed_with_components() {
    let message = fmt_err(&opts(&[(Field::TimeStyle, "short"), (Field::Year, "numeric")]));
    assert!(message.contains("Can't set option year when timeStyle is used"));
    assert!(message.contains("TypeError: "));
}

#[test]
fn ranges_collapse_shared_fields() {
    let options = opts(&[
        (Field::Month, "short"),
        (Field::Day, "numeric"),
        (Field::Year, "numeric"),
    ]);
    let start = thursday();
    assert_eq!(
        range(&options, start, at(2021, 5, 8, 9, 0, 0)),
        "May 6\u{2009}\u{2013}\u{2009}8, 2021"
    );
    assert_eq!(
        range(&options, start, at(2021, 6, 7, 9, 0, 0)),
        "May 6\u{2009}\u{2013}\u{2009}Jun 7, 2021"
    );
    assert_eq!(
        range(&options, start, at(2022, 1, 2, 9, 0, 0)),
        "May 6, 2021\u{2009}\u{2013}\u{2009}Jan 2, 2022"
    );
    assert_eq!(range(&options, start, at(2021, 5, 6, 23, 0, 0)), "May 6, 2021");
}

#[test]
fn ranges_within_one_day_share_the_date() {
    let options = opts(&[
        (Field::Month, "short"),
        (Field::Day, "numeric"),
        (Field::Hour, "numeric"),
        (Field::Minute, "numeric"),
    ]);
    assert_eq!(
        range(&options, thursday(), at(2021, 5, 6, 17, 30, 0)),
        "May 6, 3:04 PM\u{2009}\u{2013}\u{2009}5:30 PM"
    );
    assert_eq!(
        range(&FormatConfig::new(), thursday(), at(2021, 5, 8, 0, 0, 0)),
        "5/6/2021\u{2009}\u{2013}\u{2009}5/8/2021"
    );
}

#[test]
fn range_errors_name_the_range() {
    let err = BuiltinFormatter::new()
        .format_range(
            thursday(),
            at(2021, 5, 8, 0, 0, 0),
            "en-US",
            &opts(&[(Field::Weekday, "tiny")]),
        )
        .unwrap_err();
    assert!(err.message.starts_with("Error formatting date time range.\n"));
}
