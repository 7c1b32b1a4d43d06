//! CAL-ADDRESS value type (RFC 5545 §3.3.3): a URI identifying a calendar user.

use nom::combinator::map;
use nom::error::context;

use crate::value_types::uri::Uri;
use crate::{impl_icalendar_entity_traits, ICalendarEntity, ParserInput, ParserResult};

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct CalAddress(pub Uri);

impl ICalendarEntity for CalAddress {
    fn parse_ical(input: ParserInput) -> ParserResult<Self>
    where
        Self: Sized,
    {
        context("CAL-ADDRESS", map(Uri::parse_ical, Self))(input)
    }

    fn render_ical(&self) -> String {
        self.0.render_ical()
    }
}

impl_icalendar_entity_traits!(CalAddress);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::assert_parser_output;

    #[test]
    fn parse_ical() {
        assert_parser_output!(
            CalAddress::parse_ical("mailto:John.Doe@example.com TESTING".into()),
            (" TESTING", CalAddress(Uri(String::from("mailto:John.Doe@example.com")))),
        );
    }

    #[test]
    fn render_ical() {
        assert_eq!(CalAddress(Uri(String::from("mailto:John.Doe@example.com"))).render_ical(), "mailto:John.Doe@example.com");
    }
}
