//! The explicit tagged union of value variants, and the parsers/renderers
//! behind each one.
//!
//! Every variant here is a concrete Rust type implementing
//! [`crate::ICalendarEntity`], and [`crate::registry`] picks among them with
//! an ordinary `match` rather than reflection-based dispatch.

pub mod binary;
pub mod boolean;
pub mod cal_address;
pub mod date;
pub mod date_time;
pub mod duration;
pub mod float;
pub mod geo;
pub mod integer;
pub mod list;
pub mod period;
pub mod recur;
pub mod request_status;
pub mod text;
pub mod time;
pub mod uri;
pub mod utc_offset;

use crate::{ICalendarEntity, ParserInput, ParserResult};

use binary::Binary;
use boolean::Boolean;
use cal_address::CalAddress;
use date_time::DateTime;
use duration::Duration;
use float::Float;
use geo::Geo;
use integer::Integer;
use list::List;
use period::Period;
use recur::{Recur, WeekDayNum};
use request_status::RequestStatus;
use text::Text;
use uri::Uri;
use utc_offset::UtcOffset;

/// Every RFC 5545 VALUE data type this crate can parse, plus the two
/// property-specific compound values (GEO, REQUEST-STATUS) that share the
/// same grammar-driven shape but aren't registered VALUE types of their own.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(Text),
    Integer(Integer),
    Float(Float),
    Boolean(Boolean),
    Uri(Uri),
    CalAddress(CalAddress),
    Binary(Binary),
    DateTime(DateTime),
    Duration(Duration),
    Period(Period),
    UtcOffset(UtcOffset),
    Recur(Recur),
    DaySpecifier(WeekDayNum),
    Geo(Geo),
    RequestStatus(RequestStatus),
    /// A comma-separated TEXT list (CATEGORIES, RESOURCES): RFC 5545 doesn't
    /// register this as its own VALUE data type — both properties are
    /// VALUE=TEXT with list cardinality — but the registry needs a distinct
    /// kind to parse the whole comma-joined value in one pass.
    TextList(List<Text>),
}

/// The name of a [`Value`] variant, independent of any parsed instance —
/// this is what the registry maps a (property name, VALUE parameter) pair to.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ValueKind {
    Text,
    Integer,
    Float,
    Boolean,
    Uri,
    CalAddress,
    Binary,
    DateTime,
    Duration,
    Period,
    UtcOffset,
    Recur,
    DaySpecifier,
    Geo,
    RequestStatus,
    TextList,
}

impl ValueKind {
    /// Parses raw property-value text as this kind, wrapping the result in
    /// the matching [`Value`] variant.
    pub fn parse<'a>(&self, input: ParserInput<'a>) -> ParserResult<'a, Value> {
        match self {
            ValueKind::Text => map_value(Text::parse_ical, Value::Text)(input),
            ValueKind::Integer => map_value(Integer::parse_ical, Value::Integer)(input),
            ValueKind::Float => map_value(Float::parse_ical, Value::Float)(input),
            ValueKind::Boolean => map_value(Boolean::parse_ical, Value::Boolean)(input),
            ValueKind::Uri => map_value(Uri::parse_ical, Value::Uri)(input),
            ValueKind::CalAddress => map_value(CalAddress::parse_ical, Value::CalAddress)(input),
            ValueKind::Binary => map_value(Binary::parse_ical, Value::Binary)(input),
            ValueKind::DateTime => map_value(DateTime::parse_ical, Value::DateTime)(input),
            ValueKind::Duration => map_value(Duration::parse_ical, Value::Duration)(input),
            ValueKind::Period => map_value(Period::parse_ical, Value::Period)(input),
            ValueKind::UtcOffset => map_value(UtcOffset::parse_ical, Value::UtcOffset)(input),
            ValueKind::Recur => map_value(Recur::parse_ical, Value::Recur)(input),
            ValueKind::DaySpecifier => map_value(WeekDayNum::parse_ical, Value::DaySpecifier)(input),
            ValueKind::Geo => map_value(Geo::parse_ical, Value::Geo)(input),
            ValueKind::RequestStatus => map_value(RequestStatus::parse_ical, Value::RequestStatus)(input),
            ValueKind::TextList => map_value(List::<Text>::parse_ical, Value::TextList)(input),
        }
    }
}

fn map_value<'a, T, F>(parser: F, wrap: fn(T) -> Value) -> impl FnMut(ParserInput<'a>) -> ParserResult<'a, Value>
where
    F: Fn(ParserInput<'a>) -> ParserResult<'a, T>,
{
    move |input| parser(input).map(|(remaining, value)| (remaining, wrap(value)))
}

impl Value {
    pub fn render_ical(&self) -> String {
        match self {
            Value::Text(value) => value.render_ical(),
            Value::Integer(value) => value.render_ical(),
            Value::Float(value) => value.render_ical(),
            Value::Boolean(value) => value.render_ical(),
            Value::Uri(value) => value.render_ical(),
            Value::CalAddress(value) => value.render_ical(),
            Value::Binary(value) => value.render_ical(),
            Value::DateTime(value) => value.render_ical(),
            Value::Duration(value) => value.render_ical(),
            Value::Period(value) => value.render_ical(),
            Value::UtcOffset(value) => value.render_ical(),
            Value::Recur(value) => value.render_ical(),
            Value::DaySpecifier(value) => value.render_ical(),
            Value::Geo(value) => value.render_ical(),
            Value::RequestStatus(value) => value.render_ical(),
            Value::TextList(value) => value.render_ical(),
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Text(_) => ValueKind::Text,
            Value::Integer(_) => ValueKind::Integer,
            Value::Float(_) => ValueKind::Float,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Uri(_) => ValueKind::Uri,
            Value::CalAddress(_) => ValueKind::CalAddress,
            Value::Binary(_) => ValueKind::Binary,
            Value::DateTime(_) => ValueKind::DateTime,
            Value::Duration(_) => ValueKind::Duration,
            Value::Period(_) => ValueKind::Period,
            Value::UtcOffset(_) => ValueKind::UtcOffset,
            Value::Recur(_) => ValueKind::Recur,
            Value::DaySpecifier(_) => ValueKind::DaySpecifier,
            Value::Geo(_) => ValueKind::Geo,
            Value::RequestStatus(_) => ValueKind::RequestStatus,
            Value::TextList(_) => ValueKind::TextList,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_kind_parse_dispatches_to_matching_variant() {
        let (remaining, value) = ValueKind::Integer.parse("42".into()).unwrap();

        assert_eq!(remaining.to_string(), "");
        assert_eq!(value, Value::Integer(Integer(42)));
        assert_eq!(value.kind(), ValueKind::Integer);
    }

    #[test]
    fn value_render_ical_round_trips_duration() {
        let value = Value::Duration(Duration::from(3600));
        assert_eq!(value.render_ical(), "PT1H");
    }
}
