//! TEXT value type (RFC 5545 §3.3.11).

use nom::branch::alt;
use nom::bytes::complete::{tag, take_while_m_n};
use nom::combinator::{map, recognize};
use nom::multi::many0;

use crate::grammar::{colon, dquote, is_safe_char};
use crate::{impl_icalendar_entity_traits, ICalendarEntity, ParserInput, ParserResult};

pub fn escaped_char(input: ParserInput) -> ParserResult<ParserInput> {
    recognize(alt((tag("\\\\"), tag("\\;"), tag("\\,"), tag("\\N"), tag("\\n"))))(input)
}

pub fn is_tsafe_char(input: char) -> bool {
    input != '\\' && is_safe_char(input)
}

pub fn tsafe_char(input: ParserInput) -> ParserResult<ParserInput> {
    take_while_m_n(1, 1, is_tsafe_char)(input)
}

/// text = *(TSAFE-CHAR / ":" / DQUOTE / ESCAPED-CHAR)
pub fn text(input: ParserInput) -> ParserResult<ParserInput> {
    recognize(many0(alt((tsafe_char, colon, dquote, escaped_char))))(input)
}

/// Unescape `\\`, `\;`, `\,`, `\N`/`\n` per RFC 5545 §3.3.11.
pub fn unescape(raw: &str) -> String {
    let mut output = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            output.push(c);
            continue;
        }

        match chars.next() {
            Some('\\') => output.push('\\'),
            Some(';') => output.push(';'),
            Some(',') => output.push(','),
            Some('N') | Some('n') => output.push('\n'),
            Some(other) => {
                output.push('\\');
                output.push(other);
            }
            None => output.push('\\'),
        }
    }

    output
}

pub fn escape(raw: &str) -> String {
    let mut output = String::with_capacity(raw.len());

    for c in raw.chars() {
        match c {
            '\\' => output.push_str("\\\\"),
            ';' => output.push_str("\\;"),
            ',' => output.push_str("\\,"),
            '\n' => output.push_str("\\n"),
            _ => output.push(c),
        }
    }

    output
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Text(pub String);

impl ICalendarEntity for Text {
    fn parse_ical(input: ParserInput) -> ParserResult<Self>
    where
        Self: Sized,
    {
        map(text, |value| Self(value.to_string()))(input)
    }

    fn render_ical(&self) -> String {
        self.0.clone()
    }
}

impl From<String> for Text {
    fn from(value: String) -> Self {
        Text(value)
    }
}

impl From<&str> for Text {
    fn from(value: &str) -> Self {
        Text(String::from(value))
    }
}

impl_icalendar_entity_traits!(Text);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::assert_parser_output;

    #[test]
    fn parse_ical() {
        assert_parser_output!(
            Text::parse_ical("Some text\\, with escapes! DESCRIPTION:more".into()),
            ("", Text(String::from("Some text\\, with escapes! DESCRIPTION:more"))),
        );

        use nom::combinator::all_consuming;
        assert!(all_consuming(Text::parse_ical)(",".into()).is_err());
    }

    #[test]
    fn unescape_round_trips_escape() {
        let raw = "line one\\nline two, with a comma\\, and a semicolon\\;";
        let unescaped = unescape(raw);

        assert_eq!(unescaped, "line one\nline two, with a comma, and a semicolon;");
        assert_eq!(escape(&unescaped), raw);
    }

    #[test]
    fn render_ical() {
        assert_eq!(Text(String::from("hello\\, world")).render_ical(), "hello\\, world");
    }
}
