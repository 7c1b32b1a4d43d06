//! Calendar object model, time zone resolution and recurrence engine.
//!
//! Sits on top of `icalx-ical`'s lexer/parser/value registry: [`parse`] turns
//! a byte buffer into a [`model::Calendar`], [`model::Calendar::evaluate`]
//! materializes occurrences via [`recurrence`], and zone-aware date-times are
//! resolved against a calendar's registered [`timezone::TimeZone`]s.

pub mod error;
pub mod model;
pub mod recurrence;
pub mod timezone;

pub use error::{CoreError, Diagnostic, RecurError, ZoneError};
pub use model::{Calendar, ComponentExt, ParseMode, ZonedDateTime};
pub use recurrence::Occurrence;
pub use timezone::TimeZone;

/// Parses a byte buffer into a [`Calendar`]. `mode` governs whether a
/// recoverable `ValueError` fails the whole parse (`ParseMode::Strict`) or
/// is collected as a diagnostic on the returned calendar
/// (`ParseMode::Lenient`, the default).
pub fn parse(input: &[u8], mode: ParseMode) -> Result<Calendar, CoreError> {
    tracing::debug!(bytes = input.len(), ?mode, "parsing calendar");

    let unfolded = icalx_ical::lexer::tokenize(input)?;
    let mut roots = icalx_ical::parser::parse_str(&unfolded)?;

    if roots.is_empty() {
        return Err(CoreError::MissingCalendar);
    }

    // A stream may concatenate several top-level components
    // (`icalstream := 1*component`); only the first `VCALENDAR` is this
    // crate's concern, matching the single-root `Calendar` model.
    let root = roots.remove(0);

    Calendar::from_component(root, mode)
}

/// Serializes a [`Calendar`] back to its canonical content-line byte form.
pub fn serialize(calendar: &Calendar) -> Vec<u8> {
    calendar.serialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_empty_input() {
        let error = parse(b"", ParseMode::Lenient).unwrap_err();
        assert!(matches!(error, CoreError::MissingCalendar));
    }

    #[test]
    fn parse_and_serialize_round_trip() {
        let raw = b"BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//icalx//EN\r\nEND:VCALENDAR\r\n";

        let calendar = parse(raw, ParseMode::Lenient).unwrap();
        assert_eq!(calendar.version.as_deref(), Some("2.0"));

        let serialized = serialize(&calendar);
        let reparsed = parse(&serialized, ParseMode::Lenient).unwrap();

        assert_eq!(reparsed.version, calendar.version);
    }

    #[test]
    fn parse_strict_mode_fails_on_first_value_error() {
        let raw = b"BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\nRRULE:NOT-A-RULE\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";

        let error = parse(raw, ParseMode::Strict);
        assert!(error.is_err());
    }
}
