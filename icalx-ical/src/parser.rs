//! Content lines → component tree.
//!
//! The second of the three tightly coupled parts described by `lib.rs`: runs
//! after [`crate::lexer::tokenize`], parses the unfolded text one content
//! line at a time with [`crate::content_line::ContentLine`], and uses a
//! stack to fold `BEGIN`/`END` pairs into a [`Component`] tree. Every other
//! content line becomes a [`Property`] attached to whichever component is on
//! top of the stack.

use std::collections::HashMap;

use crate::property::Property;
use crate::{content_line::ContentLine, ParseError, ParserError, ParserInput};

/// A parsed iCalendar component, e.g. `VCALENDAR`, `VEVENT`, `STANDARD`.
///
/// Properties are grouped by their canonical (upper-cased) name so that
/// looking up `DTSTART` doesn't depend on the source text's casing; each
/// group preserves the order properties of that name appeared in. Relative
/// order *between* differently-named properties is not preserved — nothing
/// downstream needs it, since RFC 5545 treats a component's properties as an
/// unordered set save for duplicates of the same name (e.g. multiple
/// `CATEGORIES` lines).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Component {
    pub name: String,
    pub properties: HashMap<String, Vec<Property>>,
    pub components: Vec<Component>,
}

impl Component {
    pub fn new(name: impl Into<String>) -> Self {
        Component { name: name.into(), properties: HashMap::new(), components: Vec::new() }
    }

    /// All properties of the given name, case-insensitively.
    pub fn properties(&self, name: &str) -> &[Property] {
        self.properties.get(&name.to_ascii_uppercase()).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The first property of the given name, if present.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties(name).first()
    }

    /// Direct child components of the given name, case-insensitively.
    pub fn components(&self, name: &str) -> impl Iterator<Item = &Component> {
        self.components.iter().filter(move |component| component.name.eq_ignore_ascii_case(name))
    }

    fn push_property(&mut self, property: Property) {
        self.properties.entry(property.canonical_name()).or_default().push(property);
    }

    pub fn render_ical(&self) -> String {
        let mut output = format!("BEGIN:{}\r\n", self.name);

        for properties in self.properties.values() {
            for property in properties {
                output.push_str(&property.render_ical());
                output.push_str("\r\n");
            }
        }

        for component in &self.components {
            output.push_str(&component.render_ical());
        }

        output.push_str(&format!("END:{}\r\n", self.name));
        output
    }
}

fn describe_nom_error(error: nom::Err<ParserError<'_>>) -> String {
    match error {
        nom::Err::Error(error) | nom::Err::Failure(error) => error.to_string(),
        nom::Err::Incomplete(_) => String::from("incomplete input"),
    }
}

/// Parses a full unfolded iCalendar stream into its root components
/// (typically a single `VCALENDAR`, but a stream may concatenate several).
pub fn parse(input: ParserInput) -> Result<Vec<Component>, ParseError> {
    let mut remaining = input;
    let mut stack: Vec<Component> = Vec::new();
    let mut roots: Vec<Component> = Vec::new();

    while !remaining.fragment().is_empty() {
        let line = remaining.location_line();
        let column = remaining.get_utf8_column();

        let (next_remaining, content_line) = ContentLine::parse_ical(remaining)
            .map_err(|error| ParseError::Malformed { line, column, reason: describe_nom_error(error) })?;

        remaining = next_remaining;

        let ContentLine(name, params, value) = content_line;

        if name.eq_ignore_ascii_case("BEGIN") {
            if !params.0.is_empty() {
                return Err(ParseError::Malformed { line, column, reason: String::from("BEGIN must not carry parameters") });
            }

            stack.push(Component::new(value));
        } else if name.eq_ignore_ascii_case("END") {
            if !params.0.is_empty() {
                return Err(ParseError::Malformed { line, column, reason: String::from("END must not carry parameters") });
            }

            let component = stack.pop().ok_or_else(|| ParseError::UnexpectedEof { expected: value.clone(), line, column })?;

            if !component.name.eq_ignore_ascii_case(&value) {
                return Err(ParseError::Unbalanced { expected: component.name, found: value, line, column });
            }

            match stack.last_mut() {
                Some(parent) => parent.components.push(component),
                None => roots.push(component),
            }
        } else {
            let property = Property::from(ContentLine(name, params, value));

            match stack.last_mut() {
                Some(component) => component.push_property(property),
                None => return Err(ParseError::Malformed { line, column, reason: format!("property {} outside of any component", property.name) }),
            }
        }
    }

    if let Some(unterminated) = stack.pop() {
        return Err(ParseError::UnexpectedEof {
            expected: unterminated.name,
            line: remaining.location_line(),
            column: remaining.get_utf8_column(),
        });
    }

    Ok(roots)
}

/// Convenience wrapper over [`parse`] for callers holding a plain `&str`
/// (e.g. the output of [`crate::lexer::tokenize`]).
pub fn parse_str(input: &str) -> Result<Vec<Component>, ParseError> {
    parse(ParserInput::new(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_components() {
        let calendars =
            parse_str("BEGIN:VCALENDAR\r\nVERSION:2.0\r\nBEGIN:VEVENT\r\nUID:123\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n").unwrap();

        assert_eq!(calendars.len(), 1);

        let calendar = &calendars[0];
        assert_eq!(calendar.name, "VCALENDAR");
        assert_eq!(calendar.property("VERSION").unwrap().value, "2.0");
        assert_eq!(calendar.components.len(), 1);

        let event = &calendar.components[0];
        assert_eq!(event.name, "VEVENT");
        assert_eq!(event.property("uid").unwrap().value, "123");
    }

    #[test]
    fn parses_deeply_nested_timezone() {
        let calendars = parse_str(
            "BEGIN:VCALENDAR\r\nBEGIN:VTIMEZONE\r\nTZID:Europe/Vilnius\r\nBEGIN:STANDARD\r\nTZNAME:EET\r\nEND:STANDARD\r\nEND:VTIMEZONE\r\nEND:VCALENDAR\r\n",
        )
        .unwrap();

        let timezone = &calendars[0].components[0];
        assert_eq!(timezone.name, "VTIMEZONE");
        assert_eq!(timezone.components[0].name, "STANDARD");
        assert_eq!(timezone.components[0].property("TZNAME").unwrap().value, "EET");
    }

    #[test]
    fn collects_multiple_properties_of_the_same_name_in_order() {
        let calendars = parse_str("BEGIN:VEVENT\r\nCATEGORIES:WORK\r\nCATEGORIES:TRAVEL\r\nEND:VEVENT\r\n").unwrap();

        let values: Vec<&str> = calendars[0].properties("CATEGORIES").iter().map(|property| property.value.as_str()).collect();

        assert_eq!(values, vec!["WORK", "TRAVEL"]);
    }

    #[test]
    fn rejects_mismatched_nesting() {
        let error = parse_str("BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\nEND:VCALENDAR\r\n").unwrap_err();

        assert!(matches!(error, ParseError::Unbalanced { expected, found, .. } if expected == "VEVENT" && found == "VCALENDAR"));
    }

    #[test]
    fn rejects_unmatched_end() {
        let error = parse_str("END:VCALENDAR\r\n").unwrap_err();

        assert!(matches!(error, ParseError::UnexpectedEof { .. }));
    }

    #[test]
    fn rejects_unterminated_component() {
        let error = parse_str("BEGIN:VCALENDAR\r\n").unwrap_err();

        assert!(matches!(error, ParseError::UnexpectedEof { expected, .. } if expected == "VCALENDAR"));
    }

    #[test]
    fn render_ical_round_trips_begin_end_and_properties() {
        let calendars = parse_str("BEGIN:VEVENT\r\nUID:abc\r\nEND:VEVENT\r\n").unwrap();

        assert_eq!(calendars[0].render_ical(), "BEGIN:VEVENT\r\nUID:abc\r\nEND:VEVENT\r\n");
    }
}
