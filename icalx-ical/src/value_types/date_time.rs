//! DATE-TIME value type (RFC 5545 §3.3.5) and the shared `DateTime`
//! representation used throughout the time model.
//!
//! `DateTime` distinguishes a floating local date/time from one anchored to
//! UTC, mirroring the three forms RFC 5545 actually allows: a bare DATE, a
//! "form 1"/"form 2" local DATE-TIME, and a "form 3" UTC DATE-TIME.

use chrono::prelude::TimeZone;
use chrono::{LocalResult, NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;

use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::combinator::{cut, map, map_res, opt};
use nom::error::context;
use nom::sequence::{pair, preceded};

use crate::value_types::date::Date;
use crate::value_types::time::Time;
use crate::{impl_icalendar_entity_traits, ICalendarEntity, ParserInput, ParserResult};

/// VALUE = ("DATE-TIME" / "DATE")
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ValueType {
    DateTime,
    Date,
}

impl ICalendarEntity for ValueType {
    fn parse_ical(input: ParserInput) -> ParserResult<Self> {
        context(
            "VALUE",
            alt((map(tag("DATE-TIME"), |_| ValueType::DateTime), map(tag("DATE"), |_| ValueType::Date))),
        )(input)
    }

    fn render_ical(&self) -> String {
        match self {
            Self::DateTime => String::from("DATE-TIME"),
            Self::Date => String::from("DATE"),
        }
    }
}

impl ValueType {
    pub fn validate_against_date_time(&self, date_time: &DateTime) -> Result<(), String> {
        match (self, date_time) {
            (ValueType::DateTime, DateTime::UtcDateTime(_)) => Ok(()),
            (ValueType::DateTime, DateTime::LocalDateTime(_)) => Ok(()),
            (ValueType::Date, DateTime::LocalDate(_)) => Ok(()),
            _ => Err(String::from("VALUE incompatible with parsed DATE-TIME/DATE value")),
        }
    }

    pub fn new_from_date_time(date_time: &DateTime) -> Self {
        match date_time {
            DateTime::UtcDateTime(_) | DateTime::LocalDateTime(_) => ValueType::DateTime,
            DateTime::LocalDate(_) => ValueType::Date,
        }
    }
}

impl_icalendar_entity_traits!(ValueType);

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum DateTime {
    LocalDate(NaiveDate),
    LocalDateTime(NaiveDateTime),
    UtcDateTime(NaiveDateTime),
}

impl ICalendarEntity for DateTime {
    fn parse_ical(input: ParserInput) -> ParserResult<Self>
    where
        Self: Sized,
    {
        context(
            "DATE-TIME",
            map_res(
                pair(Date::parse_ical, opt(preceded(tag("T"), cut(Time::parse_ical)))),
                |(date, time): (Date, Option<Time>)| -> Result<Self, String> {
                    let date = NaiveDate::try_from(date)?;

                    let Some(time) = time else {
                        return Ok(Self::LocalDate(date));
                    };

                    let naive = NaiveDateTime::new(date, NaiveTime::try_from(time.clone())?);

                    if time.is_utc {
                        Ok(Self::UtcDateTime(naive))
                    } else {
                        Ok(Self::LocalDateTime(naive))
                    }
                },
            ),
        )(input)
    }

    fn render_ical(&self) -> String {
        self.render_formatted_date_time(None)
    }
}

impl DateTime {
    /// Reinterprets this value under `new_tz`, treating it as having been
    /// observed in `current_tz` (UTC if unspecified). A `UtcDateTime` moved
    /// to a non-UTC zone becomes a `LocalDateTime` anchored there.
    pub fn with_timezone(&self, current_tz: Option<&Tz>, new_tz: &Tz) -> Self {
        let current_tz = current_tz.cloned().unwrap_or(Tz::UTC);

        match self {
            Self::LocalDate(date) => {
                let naive: NaiveDateTime = (*date).into();
                let utc_timestamp = current_tz.from_local_datetime(&naive).unwrap().timestamp();
                let adjusted = new_tz.timestamp_opt(utc_timestamp, 0).unwrap().naive_local();

                Self::LocalDate(adjusted.into())
            }

            Self::LocalDateTime(naive) => {
                let utc_timestamp = current_tz.from_local_datetime(naive).unwrap().timestamp();
                let adjusted = new_tz.timestamp_opt(utc_timestamp, 0).unwrap().naive_local();

                Self::LocalDateTime(adjusted)
            }

            Self::UtcDateTime(naive) => {
                if new_tz == &Tz::UTC {
                    self.clone()
                } else {
                    let utc_timestamp = Tz::UTC.from_local_datetime(naive).unwrap().timestamp();
                    let adjusted = new_tz.timestamp_opt(utc_timestamp, 0).unwrap().naive_local();

                    Self::LocalDateTime(adjusted)
                }
            }
        }
    }

    pub fn get_utc_timestamp(&self, current_tz: Option<&Tz>) -> i64 {
        let current_tz = current_tz.cloned().unwrap_or(Tz::UTC);

        let result = match self {
            Self::LocalDate(date) => current_tz.from_local_datetime(&(*date).into()),
            Self::LocalDateTime(naive) => current_tz.from_local_datetime(naive),
            Self::UtcDateTime(naive) => Tz::UTC.from_local_datetime(naive),
        };

        result.unwrap().timestamp()
    }

    pub fn render_formatted_date_time(&self, tz: Option<&Tz>) -> String {
        let tz = tz.cloned().unwrap_or(Tz::UTC);

        match self {
            Self::LocalDate(date) => Self::serialize_date(date, &tz),
            Self::LocalDateTime(naive) => Self::serialize_date_time(naive, &tz),
            Self::UtcDateTime(naive) => {
                if tz == Tz::UTC {
                    Self::serialize_date_time(naive, &tz)
                } else {
                    self.with_timezone(Some(&Tz::UTC), &tz).render_formatted_date_time(Some(&tz))
                }
            }
        }
    }

    fn serialize_date_time(naive: &NaiveDateTime, tz: &Tz) -> String {
        let local = tz.from_local_datetime(naive).unwrap();

        if matches!(tz, &Tz::UTC) {
            local.format("%Y%m%dT%H%M%SZ").to_string()
        } else {
            local.format("%Y%m%dT%H%M%S").to_string()
        }
    }

    fn serialize_date(naive_date: &NaiveDate, tz: &Tz) -> String {
        let naive = NaiveDateTime::new(*naive_date, NaiveTime::default());

        tz.from_local_datetime(&naive).unwrap().format("%Y%m%d").to_string()
    }
}

impl From<i64> for DateTime {
    fn from(timestamp: i64) -> Self {
        match Tz::UTC.timestamp_opt(timestamp, 0) {
            LocalResult::Single(local) => DateTime::UtcDateTime(local.naive_utc()),
            _ => panic!("unable to derive DateTime from UTC timestamp {timestamp}"),
        }
    }
}

impl_icalendar_entity_traits!(DateTime);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::assert_parser_output;

    #[test]
    fn parse_ical_date_only() {
        assert_parser_output!(
            DateTime::parse_ical("19970714 TESTING".into()),
            (" TESTING", DateTime::LocalDate(NaiveDate::from_ymd_opt(1997, 7, 14).unwrap())),
        );
    }

    #[test]
    fn parse_ical_local_date_time() {
        assert_parser_output!(
            DateTime::parse_ical("19980118T230000 TESTING".into()),
            (
                " TESTING",
                DateTime::LocalDateTime(NaiveDateTime::new(
                    NaiveDate::from_ymd_opt(1998, 1, 18).unwrap(),
                    NaiveTime::from_hms_opt(23, 0, 0).unwrap(),
                )),
            ),
        );
    }

    #[test]
    fn parse_ical_utc_date_time() {
        assert_parser_output!(
            DateTime::parse_ical("19980118T230000Z TESTING".into()),
            (
                " TESTING",
                DateTime::UtcDateTime(NaiveDateTime::new(
                    NaiveDate::from_ymd_opt(1998, 1, 18).unwrap(),
                    NaiveTime::from_hms_opt(23, 0, 0).unwrap(),
                )),
            ),
        );
    }

    #[test]
    fn render_ical() {
        assert_eq!(DateTime::LocalDate(NaiveDate::from_ymd_opt(1997, 7, 14).unwrap()).render_ical(), "19970714");

        assert_eq!(
            DateTime::UtcDateTime(NaiveDateTime::new(
                NaiveDate::from_ymd_opt(1998, 1, 18).unwrap(),
                NaiveTime::from_hms_opt(23, 0, 0).unwrap(),
            ))
            .render_ical(),
            "19980118T230000Z",
        );
    }

    #[test]
    fn with_timezone_crosses_utc_offset() {
        let utc = DateTime::UtcDateTime(NaiveDateTime::new(
            NaiveDate::from_ymd_opt(1998, 1, 18).unwrap(),
            NaiveTime::from_hms_opt(23, 0, 0).unwrap(),
        ));

        let vilnius = utc.with_timezone(Some(&Tz::UTC), &Tz::Europe__Vilnius);

        assert_eq!(
            vilnius,
            DateTime::LocalDateTime(NaiveDateTime::new(
                NaiveDate::from_ymd_opt(1998, 1, 19).unwrap(),
                NaiveTime::from_hms_opt(1, 0, 0).unwrap(),
            )),
        );
    }
}
