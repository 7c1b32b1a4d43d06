//! GEO value (RFC 5545 §3.8.1.6): two SEMICOLON-separated FLOAT values.
//!
//! Not one of the RFC's named VALUE data types — GEO is the one property
//! whose value grammar is a fixed pair rather than a registered type — but it
//! fits the same `ICalendarEntity` shape as everything else in the registry.

use nom::error::context;
use nom::sequence::tuple;

use crate::grammar::semicolon;
use crate::value_types::float::Float;
use crate::{impl_icalendar_entity_traits, ICalendarEntity, ParserInput, ParserResult};

#[derive(Debug, Clone, PartialEq)]
pub struct Geo {
    pub latitude: Float,
    pub longitude: Float,
}

impl ICalendarEntity for Geo {
    fn parse_ical(input: ParserInput) -> ParserResult<Self>
    where
        Self: Sized,
    {
        context("GEO", tuple((Float::parse_ical, semicolon, Float::parse_ical)))(input)
            .map(|(remaining, (latitude, _semicolon, longitude))| (remaining, Geo { latitude, longitude }))
    }

    fn render_ical(&self) -> String {
        format!("{};{}", self.latitude.render_ical(), self.longitude.render_ical())
    }
}

impl_icalendar_entity_traits!(Geo);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::assert_parser_output;

    #[test]
    fn parse_ical() {
        assert_parser_output!(
            Geo::parse_ical("37.386013;-122.082932".into()),
            ("", Geo { latitude: Float(37.386013), longitude: Float(-122.082932) }),
        );
    }

    #[test]
    fn render_ical() {
        assert_eq!(Geo { latitude: Float(37.386013), longitude: Float(-122.082932) }.render_ical(), "37.386013;-122.082932");
    }
}
