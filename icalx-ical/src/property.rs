//! The generic property representation every content line is converted into
//! once it leaves the lexer.
//!
//! RFC 5545 defines dozens of properties, each with its own parameter set
//! and value grammar. Rather than a typed struct per property (and another
//! per parameter), this crate keeps the parameter table untyped — a property
//! name, a `(name, values)` parameter list, and a raw value string — and
//! leaves interpreting the value to [`crate::registry`], which knows which
//! [`crate::value_types::ValueKind`] a given property/VALUE-parameter pair
//! resolves to.

use nom::branch::alt;
use nom::combinator::map;
use nom::multi::separated_list1;

use crate::content_line::ContentLine;
use crate::grammar::{comma, dquote, is_qsafe_char, paramtext};
use crate::{ICalendarEntity, ParserInput, ParserResult, impl_icalendar_entity_traits};

/// Splits a raw, already-extracted param-value list (e.g. `VALUE_ONE,"VALUE_TWO"`)
/// into its individual values, stripping the DQUOTE wrapper from quoted ones.
///
/// The lexer keeps the comma-joined param-value list as a single opaque
/// string (see `grammar::param`); this is where it actually gets split, so
/// that a quoted value containing a comma isn't mistaken for two values.
pub fn split_param_values(raw: &str) -> Vec<String> {
    let input = ParserInput::new(raw);

    let result = separated_list1(
        comma,
        alt((
            map(
                nom::sequence::delimited(dquote, nom::bytes::complete::take_while(is_qsafe_char), dquote),
                |value: ParserInput| value.to_string(),
            ),
            map(paramtext, |value: ParserInput| value.to_string()),
        )),
    )(input);

    match result {
        Ok((_remaining, values)) => values,
        Err(_) => vec![raw.to_string()],
    }
}

fn needs_quoting(value: &str) -> bool {
    value.contains(',') || value.contains(';') || value.contains(':') || value.is_empty()
}

fn render_param_value(value: &str) -> String {
    if needs_quoting(value) {
        format!("\"{value}\"")
    } else {
        value.to_string()
    }
}

/// A property's parameters, in original order, with case-insensitive lookup.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyParams(pub Vec<(String, Vec<String>)>);

impl PropertyParams {
    /// The values for the first parameter matching `name`, case-insensitively.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(param_name, _)| param_name.eq_ignore_ascii_case(name))
            .map(|(_, values)| values.as_slice())
    }

    /// The first value for the first parameter matching `name`.
    pub fn get_first(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|values| values.first()).map(String::as_str)
    }

    pub fn render_ical(&self) -> String {
        let mut output = String::new();

        for (name, values) in &self.0 {
            let joined = values.iter().map(|value| render_param_value(value)).collect::<Vec<_>>().join(",");
            output.push_str(format!(";{name}={joined}").as_str());
        }

        output
    }
}

/// A single parsed property: its original-case name, its parameters, and its
/// raw (still-escaped, not-yet-typed) value text.
///
/// Converting a property's `value` into a concrete [`crate::value_types::Value`]
/// is a separate step, performed by [`crate::registry`] once the property's
/// name and VALUE parameter are known.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub params: PropertyParams,
    pub value: String,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Property { name: name.into(), params: PropertyParams::default(), value: value.into() }
    }

    /// The property name, upper-cased, for case-insensitive dispatch against
    /// the registry or a component's property map.
    pub fn canonical_name(&self) -> String {
        self.name.to_ascii_uppercase()
    }

    pub fn with_param(mut self, name: impl Into<String>, values: Vec<String>) -> Self {
        self.params.0.push((name.into(), values));
        self
    }
}

impl From<ContentLine> for Property {
    fn from(content_line: ContentLine) -> Self {
        let ContentLine(name, content_line_params, value) = content_line;

        let params = content_line_params
            .0
            .into_iter()
            .map(|param| (param.0, split_param_values(&param.1)))
            .collect();

        Property { name, params: PropertyParams(params), value }
    }
}

impl ICalendarEntity for Property {
    fn parse_ical(input: ParserInput) -> ParserResult<Self>
    where
        Self: Sized,
    {
        map(ContentLine::parse_ical, Property::from)(input)
    }

    fn render_ical(&self) -> String {
        format!("{}{}:{}", self.name, self.params.render_ical(), self.value)
    }
}

impl_icalendar_entity_traits!(Property);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_param_values_handles_quoted_commas() {
        assert_eq!(
            split_param_values(r#"VALUE_ONE,"VALUE_TWO""#),
            vec![String::from("VALUE_ONE"), String::from("VALUE_TWO")],
        );
    }

    #[test]
    fn parse_ical_builds_param_lookup() {
        let (remaining, property) =
            Property::parse_ical(r#"CATEGORIES;LANGUAGE=ENGLISH:APPOINTMENT,EDUCATION"#.into()).unwrap();

        assert_eq!(remaining.to_string(), "");
        assert_eq!(property.name, "CATEGORIES");
        assert_eq!(property.value, "APPOINTMENT,EDUCATION");
        assert_eq!(property.params.get_first("language"), Some("ENGLISH"));
    }

    #[test]
    fn render_ical_quotes_values_containing_reserved_chars() {
        let property = Property::new("ATTENDEE", "mailto:jsmith@example.com")
            .with_param("CN", vec![String::from("Short, Comma")]);

        assert_eq!(
            property.render_ical(),
            r#"ATTENDEE;CN="Short, Comma":mailto:jsmith@example.com"#,
        );
    }

    #[test]
    fn render_ical_round_trips_through_parse() {
        let raw = r#"RESOURCES;LANGUAGE=ENGLISH:EASEL,PROJECTOR"#;
        let (_, property) = Property::parse_ical(raw.into()).unwrap();

        assert_eq!(property.render_ical(), raw);
    }
}
