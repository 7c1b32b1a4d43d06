//! REQUEST-STATUS value (RFC 5545 §3.8.8.3).
//!
//! statcode = 1*DIGIT 1*2("." 1*DIGIT); statdesc = text; optional statextdata.

use nom::bytes::complete::take_while1;
use nom::character::is_digit;
use nom::combinator::{map, opt};
use nom::error::context;
use nom::multi::separated_list1;
use nom::sequence::preceded;

use crate::grammar::semicolon;
use crate::value_types::text::Text;
use crate::{impl_icalendar_entity_traits, ICalendarEntity, ParserError, ParserInput, ParserResult};

fn statcode(input: ParserInput) -> ParserResult<String> {
    let (remaining, parts) = separated_list1(nom::character::complete::char('.'), take_while1(|c| is_digit(c as u8)))(input)?;

    if parts.len() < 2 || parts.len() > 3 {
        return Err(nom::Err::Error(ParserError::new(String::from("expected 1*DIGIT 1*2(\".\" 1*DIGIT)"), input)));
    }

    Ok((remaining, parts.iter().map(|part| part.to_string()).collect::<Vec<_>>().join(".")))
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestStatus {
    pub statcode: String,
    pub statdesc: Text,
    pub extdata: Option<Text>,
}

impl ICalendarEntity for RequestStatus {
    fn parse_ical(input: ParserInput) -> ParserResult<Self>
    where
        Self: Sized,
    {
        context(
            "REQUEST-STATUS",
            map(
                nom::sequence::tuple((statcode, preceded(semicolon, Text::parse_ical), opt(preceded(semicolon, Text::parse_ical)))),
                |(statcode, statdesc, extdata)| RequestStatus { statcode, statdesc, extdata },
            ),
        )(input)
    }

    fn render_ical(&self) -> String {
        let mut output = format!("{};{}", self.statcode, self.statdesc.render_ical());

        if let Some(extdata) = &self.extdata {
            output.push(';');
            output.push_str(&extdata.render_ical());
        }

        output
    }
}

impl_icalendar_entity_traits!(RequestStatus);
