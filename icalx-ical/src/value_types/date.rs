//! DATE value type (RFC 5545 §3.3.4).

use nom::bytes::complete::take_while_m_n;
use nom::character::is_digit;
use nom::combinator::{map_res, recognize};
use nom::error::context;
use nom::sequence::tuple;

use crate::{impl_icalendar_entity_traits, ICalendarEntity, ParserError, ParserInput, ParserResult};

/// date-fullyear = 4DIGIT
pub fn date_fullyear(input: ParserInput) -> ParserResult<i32> {
    let (remaining, year) = take_while_m_n(4, 4, |value| is_digit(value as u8))(input)?;

    year.to_string()
        .parse::<i32>()
        .map(|year| (remaining, year))
        .map_err(|_| nom::Err::Error(ParserError::new(String::from("invalid year"), input)))
}

/// date-month = 2DIGIT ;01-12
pub fn date_month(input: ParserInput) -> ParserResult<u32> {
    let (remaining, month) = take_while_m_n(2, 2, |value| is_digit(value as u8))(input)?;

    let month = month
        .to_string()
        .parse::<u32>()
        .map_err(|_| nom::Err::Error(ParserError::new(String::from("invalid month"), input)))?;

    if !(1..=12).contains(&month) {
        return Err(nom::Err::Error(ParserError::new(String::from("expected month between 01-12"), input)));
    }

    Ok((remaining, month))
}

/// date-mday = 2DIGIT ;01-28, 01-29, 01-30, 01-31
pub fn date_mday(input: ParserInput) -> ParserResult<u32> {
    let (remaining, mday) = take_while_m_n(2, 2, |value| is_digit(value as u8))(input)?;

    let mday = mday
        .to_string()
        .parse::<u32>()
        .map_err(|_| nom::Err::Error(ParserError::new(String::from("invalid mday"), input)))?;

    if !(1..=31).contains(&mday) {
        return Err(nom::Err::Error(ParserError::new(String::from("expected mday between 01-31"), input)));
    }

    Ok((remaining, mday))
}

/// date-value = date-fullyear date-month date-mday
pub fn date_value(input: ParserInput) -> ParserResult<(i32, u32, u32)> {
    tuple((date_fullyear, date_month, date_mday))(input)
}

/// date = date-value
pub fn date(input: ParserInput) -> ParserResult<ParserInput> {
    context("DATE", recognize(date_value))(input)
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Date {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl ICalendarEntity for Date {
    fn parse_ical(input: ParserInput) -> ParserResult<Self>
    where
        Self: Sized,
    {
        context(
            "DATE",
            map_res(date_value, |(year, month, day)| {
                let date = Self { year, month, day };
                date.validate().map(|_| date)
            }),
        )(input)
    }

    fn render_ical(&self) -> String {
        format!("{:04}{:02}{:02}", self.year, self.month, self.day)
    }

    fn validate(&self) -> Result<(), String> {
        if chrono::NaiveDate::from_ymd_opt(self.year, self.month, self.day).is_none() {
            Err(String::from("invalid date"))
        } else {
            Ok(())
        }
    }
}

impl TryFrom<Date> for chrono::NaiveDate {
    type Error = String;

    fn try_from(date: Date) -> Result<chrono::NaiveDate, Self::Error> {
        chrono::NaiveDate::from_ymd_opt(date.year, date.month, date.day).ok_or_else(|| String::from("invalid date"))
    }
}

impl From<chrono::NaiveDate> for Date {
    fn from(date: chrono::NaiveDate) -> Self {
        use chrono::Datelike;

        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }
}

impl_icalendar_entity_traits!(Date);
