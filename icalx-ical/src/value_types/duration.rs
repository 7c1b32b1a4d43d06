//! DURATION value type (RFC 5545 §3.3.6).

use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::digit1;
use nom::combinator::{cut, map, map_res, opt, recognize};
use nom::error::context;
use nom::sequence::{pair, preceded, terminated, tuple};

use crate::grammar::PositiveNegative;
use crate::{impl_icalendar_entity_traits, ICalendarEntity, ParserInput, ParserResult};

const SECONDS_IN_MINUTE: i64 = 60;
const SECONDS_IN_HOUR: i64 = SECONDS_IN_MINUTE * 60;
const SECONDS_IN_DAY: i64 = SECONDS_IN_HOUR * 24;
const SECONDS_IN_WEEK: i64 = SECONDS_IN_DAY * 7;

type DurTime = (Option<i64>, Option<i64>, Option<i64>);

fn dur_week(input: ParserInput) -> ParserResult<i64> {
    map_res(terminated(digit1, tag("W")), |value: ParserInput| value.parse::<i64>())(input)
}

fn dur_day(input: ParserInput) -> ParserResult<i64> {
    map_res(terminated(digit1, tag("D")), |value: ParserInput| value.parse::<i64>())(input)
}

fn dur_hour(input: ParserInput) -> ParserResult<i64> {
    map_res(terminated(digit1, tag("H")), |value: ParserInput| value.parse::<i64>())(input)
}

fn dur_minute(input: ParserInput) -> ParserResult<i64> {
    map_res(terminated(digit1, tag("M")), |value: ParserInput| value.parse::<i64>())(input)
}

fn dur_second(input: ParserInput) -> ParserResult<i64> {
    map_res(terminated(digit1, tag("S")), |value: ParserInput| value.parse::<i64>())(input)
}

fn dur_time(input: ParserInput) -> ParserResult<DurTime> {
    preceded(tag("T"), cut(tuple((opt(dur_hour), opt(dur_minute), opt(dur_second)))))(input)
}

fn dur_date(input: ParserInput) -> ParserResult<(i64, Option<DurTime>)> {
    pair(dur_day, opt(dur_time))(input)
}

type DurValue = (Option<PositiveNegative>, (Option<i64>, Option<i64>, Option<DurTime>));

fn dur_value(input: ParserInput) -> ParserResult<DurValue> {
    tuple((
        opt(PositiveNegative::parse_ical),
        preceded(
            tag("P"),
            cut(alt((
                map(dur_week, |week| (Some(week), None, None)),
                map(dur_date, |(day, time)| (None, Some(day), time)),
                map(dur_time, |time| (None, None, Some(time))),
            ))),
        ),
    ))(input)
}

pub fn duration(input: ParserInput) -> ParserResult<ParserInput> {
    context("DURATION", recognize(dur_value))(input)
}

#[derive(Debug, Clone, Eq, PartialEq, Hash, Default)]
pub struct Duration {
    pub positive_negative: Option<PositiveNegative>,
    pub weeks: Option<i64>,
    pub days: Option<i64>,
    pub hours: Option<i64>,
    pub minutes: Option<i64>,
    pub seconds: Option<i64>,
}

impl ICalendarEntity for Duration {
    fn parse_ical(input: ParserInput) -> ParserResult<Self>
    where
        Self: Sized,
    {
        context(
            "DURATION",
            map(dur_value, |(positive_negative, (weeks, days, time))| {
                let hours = time.and_then(|time| time.0);
                let minutes = time.and_then(|time| time.1);
                let seconds = time.and_then(|time| time.2);

                Self { positive_negative, weeks, days, hours, minutes, seconds }
            }),
        )(input)
    }

    fn render_ical(&self) -> String {
        let mut output = String::new();

        if self.is_empty() {
            return output;
        }

        if let Some(positive_negative) = &self.positive_negative {
            output.push_str(&positive_negative.render_ical());
        }

        output.push('P');

        if let Some(weeks) = self.weeks {
            output.push_str(&format!("{weeks}W"));
        }

        if let Some(days) = self.days {
            output.push_str(&format!("{days}D"));
        }

        if self.hours.is_some() || self.minutes.is_some() || self.seconds.is_some() {
            output.push('T');
        }

        if let Some(hours) = self.hours {
            output.push_str(&format!("{hours}H"));
        }

        if let Some(minutes) = self.minutes {
            output.push_str(&format!("{minutes}M"));
        }

        if let Some(seconds) = self.seconds {
            output.push_str(&format!("{seconds}S"));
        }

        output
    }
}

impl Duration {
    pub fn get_duration_in_seconds(&self) -> i64 {
        let mut total = 0;

        total += self.weeks.unwrap_or(0) * SECONDS_IN_WEEK;
        total += self.days.unwrap_or(0) * SECONDS_IN_DAY;
        total += self.hours.unwrap_or(0) * SECONDS_IN_HOUR;
        total += self.minutes.unwrap_or(0) * SECONDS_IN_MINUTE;
        total += self.seconds.unwrap_or(0);

        if let Some(PositiveNegative::Negative) = self.positive_negative {
            total = -total;
        }

        total
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl From<i64> for Duration {
    fn from(duration_in_seconds: i64) -> Self {
        let mut remaining = duration_in_seconds.abs();

        let mut weeks = None;
        let mut days = None;
        let mut hours = None;
        let mut minutes = None;
        let mut seconds = None;

        if remaining >= SECONDS_IN_WEEK {
            weeks = Some(remaining / SECONDS_IN_WEEK);
            remaining %= SECONDS_IN_WEEK;
        }

        if remaining >= SECONDS_IN_DAY {
            days = Some(remaining / SECONDS_IN_DAY);
            remaining %= SECONDS_IN_DAY;
        }

        if remaining >= SECONDS_IN_HOUR {
            hours = Some(remaining / SECONDS_IN_HOUR);
            remaining %= SECONDS_IN_HOUR;
        }

        if remaining >= SECONDS_IN_MINUTE {
            minutes = Some(remaining / SECONDS_IN_MINUTE);
            remaining %= SECONDS_IN_MINUTE;
        }

        if remaining > 0 || duration_in_seconds == 0 {
            seconds = Some(remaining);
        }

        let positive_negative = (duration_in_seconds < 0).then_some(PositiveNegative::Negative);

        Duration { weeks, days, hours, minutes, seconds, positive_negative }
    }
}

impl_icalendar_entity_traits!(Duration);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::assert_parser_output;

    #[test]
    fn from_seconds() {
        assert_eq!(
            Duration::from(1483506),
            Duration { weeks: Some(2), days: Some(3), hours: Some(4), minutes: Some(5), seconds: Some(6), positive_negative: None },
        );

        assert_eq!(Duration::from(0).seconds, Some(0));
        assert_eq!(Duration::from(-100).positive_negative, Some(PositiveNegative::Negative));
    }

    #[test]
    fn parse_ical() {
        assert_parser_output!(
            Duration::parse_ical("P15DT5H0M20S".into()),
            ("", Duration { positive_negative: None, weeks: None, days: Some(15), hours: Some(5), minutes: Some(0), seconds: Some(20) }),
        );

        assert_parser_output!(
            Duration::parse_ical("-PT25S".into()),
            ("", Duration { positive_negative: Some(PositiveNegative::Negative), weeks: None, days: None, hours: None, minutes: None, seconds: Some(25) }),
        );
    }

    #[test]
    fn get_duration_in_seconds_round_trips_from_i64() {
        for seconds in [0, 25, 1483506, -604800] {
            assert_eq!(Duration::from(seconds).get_duration_in_seconds(), seconds);
        }
    }

    #[test]
    fn render_ical() {
        assert_eq!(Duration::default().render_ical(), "");
        assert_eq!(
            Duration { positive_negative: Some(PositiveNegative::Negative), weeks: Some(7), days: None, hours: None, minutes: None, seconds: None }
                .render_ical(),
            "-P7W",
        );
    }
}
