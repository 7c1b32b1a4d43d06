//! INTEGER value type (RFC 5545 §3.3.8).

use std::ops::{Deref, DerefMut};

use nom::bytes::complete::take_while_m_n;
use nom::character::complete::{digit1, one_of};
use nom::character::is_digit;
use nom::combinator::{map, map_res, opt, recognize};
use nom::sequence::pair;

use crate::grammar::PositiveNegative;
use crate::{impl_icalendar_entity_traits, ICalendarEntity, ParserError, ParserInput, ParserResult};

pub fn integer(input: ParserInput) -> ParserResult<i64> {
    map_res(recognize(pair(opt(one_of("+-")), digit1)), |value: ParserInput| value.parse::<i64>())(input)
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Integer(pub i64);

impl ICalendarEntity for Integer {
    fn parse_ical(input: ParserInput) -> ParserResult<Self>
    where
        Self: Sized,
    {
        map(integer, Self)(input)
    }

    fn render_ical(&self) -> String {
        self.0.to_string()
    }
}

impl Integer {
    /// A `min_value..=max_value`-bounded `[+/-]DIGIT{min_chars,max_chars}`.
    pub fn parse_signed_m_n(min_chars: usize, max_chars: usize, min_value: i64, max_value: i64) -> impl FnMut(ParserInput) -> ParserResult<Integer> {
        move |input: ParserInput| {
            let (remaining, sign) = opt(PositiveNegative::parse_ical)(input)?;
            let (remaining, mut value) = Self::parse_unsigned_m_n(min_chars, max_chars, min_value, max_value)(remaining)?;

            if let Some(PositiveNegative::Negative) = sign {
                value.0 = -value.0;
            }

            Ok((remaining, value))
        }
    }

    pub fn parse_unsigned_m_n(min_chars: usize, max_chars: usize, min_value: i64, max_value: i64) -> impl FnMut(ParserInput) -> ParserResult<Integer> {
        move |input: ParserInput| {
            let (remaining, digits) = take_while_m_n(min_chars, max_chars, |value| is_digit(value as u8))(input)?;

            let value = digits
                .to_string()
                .parse::<i64>()
                .map_err(|_| nom::Err::Error(ParserError::new(String::from("invalid number"), input)))?;

            if value < min_value || value > max_value {
                return Err(nom::Err::Error(ParserError::new(format!("expected number between {min_value}-{max_value}"), input)));
            }

            Ok((remaining, Integer::from(value)))
        }
    }
}

impl Deref for Integer {
    type Target = i64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Integer {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<u32> for Integer {
    fn from(value: u32) -> Self {
        Integer(value as i64)
    }
}

impl From<u64> for Integer {
    fn from(value: u64) -> Self {
        Integer(value as i64)
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Integer(value)
    }
}

impl_icalendar_entity_traits!(Integer);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::assert_parser_output;

    #[test]
    fn parse_ical() {
        assert_parser_output!(Integer::parse_ical("1234567890 TESTING".into()), (" TESTING", Integer(1234567890)));
        assert_parser_output!(Integer::parse_ical("-1234567890 TESTING".into()), (" TESTING", Integer(-1234567890)));
        assert!(Integer::parse_ical(":".into()).is_err());
    }

    #[test]
    fn render_ical() {
        assert_eq!(Integer(-1234567890).render_ical(), "-1234567890");
    }

    #[test]
    fn parse_signed_m_n_bounds() {
        let mut parser = Integer::parse_signed_m_n(2, 3, 15, 500);
        assert_eq!(parser("+22 TESTING".into()).unwrap().1, Integer(22));
        assert_eq!(parser("-250".into()).unwrap().1, Integer(-250));
        assert!(parser("1".into()).is_err());
    }
}
