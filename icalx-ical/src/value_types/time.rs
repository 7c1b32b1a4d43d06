//! TIME value type (RFC 5545 §3.3.12).

use nom::bytes::complete::{tag, take_while_m_n};
use nom::character::is_digit;
use nom::combinator::{map_res, opt, recognize};
use nom::error::context;
use nom::sequence::tuple;

use crate::{impl_icalendar_entity_traits, ICalendarEntity, ParserError, ParserInput, ParserResult};

pub fn time_hour(input: ParserInput) -> ParserResult<u32> {
    let (remaining, hour) = take_while_m_n(2, 2, |value| is_digit(value as u8))(input)?;
    let hour = hour
        .to_string()
        .parse::<u32>()
        .map_err(|_| nom::Err::Error(ParserError::new(String::from("invalid hour"), input)))?;

    if hour > 23 {
        return Err(nom::Err::Error(ParserError::new(String::from("expected hour between 00-23"), input)));
    }

    Ok((remaining, hour))
}

pub fn time_minute(input: ParserInput) -> ParserResult<u32> {
    let (remaining, minute) = take_while_m_n(2, 2, |value| is_digit(value as u8))(input)?;
    let minute = minute
        .to_string()
        .parse::<u32>()
        .map_err(|_| nom::Err::Error(ParserError::new(String::from("invalid minute"), input)))?;

    if minute > 59 {
        return Err(nom::Err::Error(ParserError::new(String::from("expected minute between 00-59"), input)));
    }

    Ok((remaining, minute))
}

/// "60" accounts for a positive leap second.
pub fn time_second(input: ParserInput) -> ParserResult<u32> {
    let (remaining, second) = take_while_m_n(2, 2, |value| is_digit(value as u8))(input)?;
    let second = second
        .to_string()
        .parse::<u32>()
        .map_err(|_| nom::Err::Error(ParserError::new(String::from("invalid second"), input)))?;

    if second > 60 {
        return Err(nom::Err::Error(ParserError::new(String::from("expected second between 00-60"), input)));
    }

    Ok((remaining, second))
}

pub fn time_utc(input: ParserInput) -> ParserResult<ParserInput> {
    tag("Z")(input)
}

pub fn time(input: ParserInput) -> ParserResult<ParserInput> {
    context("TIME", recognize(tuple((time_hour, time_minute, time_second, opt(time_utc)))))(input)
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Time {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub is_utc: bool,
}

impl ICalendarEntity for Time {
    fn parse_ical(input: ParserInput) -> ParserResult<Self>
    where
        Self: Sized,
    {
        context(
            "TIME",
            map_res(tuple((time_hour, time_minute, time_second, opt(time_utc))), |(hour, minute, second, utc)| {
                let time = Self { hour, minute, second, is_utc: utc.is_some() };
                time.validate().map(|_| time)
            }),
        )(input)
    }

    fn render_ical(&self) -> String {
        if self.is_utc {
            format!("{:02}{:02}{:02}Z", self.hour, self.minute, self.second)
        } else {
            format!("{:02}{:02}{:02}", self.hour, self.minute, self.second)
        }
    }

    fn validate(&self) -> Result<(), String> {
        if chrono::NaiveTime::from_hms_opt(self.hour, self.minute, self.second).is_none() {
            Err(String::from("time is invalid"))
        } else {
            Ok(())
        }
    }
}

impl TryFrom<Time> for chrono::NaiveTime {
    type Error = String;

    fn try_from(time: Time) -> Result<chrono::NaiveTime, Self::Error> {
        chrono::NaiveTime::from_hms_opt(time.hour, time.minute, time.second).ok_or_else(|| String::from("time is invalid"))
    }
}

impl_icalendar_entity_traits!(Time);
