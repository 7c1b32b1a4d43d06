//! The static (property name, VALUE parameter) → [`ValueKind`] lookup, and
//! the entry point that resolves a parsed [`Property`] against it.
//!
//! Dispatch is two ordinary, auditable `match` statements — one keyed on the
//! property name, one keyed on the `VALUE` parameter string — with no
//! reflection and no runtime type discovery.

use crate::property::Property;
use crate::value_types::{Value, ValueKind};
use crate::{ParserInput, ValueError};

/// The default [`ValueKind`] RFC 5545 assigns a property when it carries no
/// `VALUE` parameter of its own. Unrecognized/experimental (`X-...`) and
/// IANA properties default to `Text`, so unknown property names are
/// preserved as raw text values rather than dropped.
fn default_variant_for(property_name: &str) -> ValueKind {
    match property_name.to_ascii_uppercase().as_str() {
        "DTSTART" | "DTEND" | "DUE" | "RECURRENCE-ID" | "EXDATE" | "RDATE" | "COMPLETED"
        | "CREATED" | "DTSTAMP" | "LAST-MODIFIED" => ValueKind::DateTime,

        "DURATION" | "TRIGGER" => ValueKind::Duration,
        "FREEBUSY" => ValueKind::Period,
        "RRULE" | "EXRULE" => ValueKind::Recur,
        "TZOFFSETFROM" | "TZOFFSETTO" => ValueKind::UtcOffset,

        "ATTENDEE" | "ORGANIZER" => ValueKind::CalAddress,
        "ATTACH" | "TZURL" | "URL" | "SOURCE" => ValueKind::Uri,

        "PERCENT-COMPLETE" | "PRIORITY" | "SEQUENCE" | "REPEAT" => ValueKind::Integer,

        "GEO" => ValueKind::Geo,
        "REQUEST-STATUS" => ValueKind::RequestStatus,

        "CATEGORIES" | "RESOURCES" => ValueKind::TextList,

        // CLASS, SUMMARY, DESCRIPTION, COMMENT, LOCATION, STATUS, TRANSP,
        // CONTACT, RELATED-TO, UID, TZID, TZNAME, PRODID, VERSION, CALSCALE,
        // METHOD, ACTION and every unrecognized/X- property: plain TEXT.
        _ => ValueKind::Text,
    }
}

/// Parses the `VALUE` parameter string into the [`ValueKind`] it names.
/// `"DATE"` and `"DATE-TIME"` both resolve to [`ValueKind::DateTime`] — the
/// `has_time` distinction lives on `value_types::date_time::DateTime`
/// itself, not as a separate registry entry.
fn value_kind_from_value_param(value_param: &str) -> Option<ValueKind> {
    match value_param.to_ascii_uppercase().as_str() {
        "DATE-TIME" | "DATE" => Some(ValueKind::DateTime),
        "DURATION" => Some(ValueKind::Duration),
        "PERIOD" => Some(ValueKind::Period),
        "RECUR" => Some(ValueKind::Recur),
        "TEXT" => Some(ValueKind::Text),
        "INTEGER" => Some(ValueKind::Integer),
        "FLOAT" => Some(ValueKind::Float),
        "BOOLEAN" => Some(ValueKind::Boolean),
        "URI" => Some(ValueKind::Uri),
        "CAL-ADDRESS" => Some(ValueKind::CalAddress),
        "BINARY" => Some(ValueKind::Binary),
        "UTC-OFFSET" => Some(ValueKind::UtcOffset),
        _ => None,
    }
}

/// The [`ValueKind`] this property's value will be parsed as: its default,
/// overridden by an explicit `VALUE` parameter when present.
pub fn resolve_kind(property: &Property) -> ValueKind {
    match property.params.get_first("VALUE").and_then(value_kind_from_value_param) {
        Some(kind) => kind,
        None => default_variant_for(&property.name),
    }
}

/// Parses a property's raw value text against its resolved [`ValueKind`],
/// wrapping a parse failure as a [`ValueError`] that names the offending
/// property and its source line.
pub fn resolve(property: &Property, line: u32, column: usize) -> Result<Value, ValueError> {
    let kind = resolve_kind(property);
    let input = ParserInput::new(property.value.as_str());

    match kind.parse(input) {
        Ok((_remaining, value)) => Ok(value),
        Err(error) => {
            let reason = match error {
                nom::Err::Error(error) | nom::Err::Failure(error) => error.to_string(),
                nom::Err::Incomplete(_) => String::from("incomplete input"),
            };

            Err(ValueError::new(property.name.clone(), line, column, reason))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::Property;

    #[test]
    fn resolve_kind_uses_property_name_default() {
        let property = Property::new("DTSTART", "19970902T090000Z");
        assert_eq!(resolve_kind(&property), ValueKind::DateTime);
    }

    #[test]
    fn resolve_kind_value_param_overrides_default() {
        let property = Property::new("DTSTART", "19970902").with_param("VALUE", vec![String::from("DATE")]);
        assert_eq!(resolve_kind(&property), ValueKind::DateTime);
    }

    #[test]
    fn resolve_parses_into_typed_value() {
        let property = Property::new("RRULE", "FREQ=DAILY;COUNT=5");
        let value = resolve(&property, 1, 1).unwrap();
        assert_eq!(value.kind(), ValueKind::Recur);
    }

    #[test]
    fn resolve_reports_value_error_on_failure() {
        let property = Property::new("RRULE", "NOT-A-RULE");
        let error = resolve(&property, 3, 7).unwrap_err();

        assert_eq!(error.property, "RRULE");
        assert_eq!(error.line, 3);
        assert_eq!(error.column, 7);
    }

    #[test]
    fn resolve_unknown_property_defaults_to_text() {
        let property = Property::new("X-CUSTOM-PROP", "anything goes");
        assert_eq!(resolve_kind(&property), ValueKind::Text);
    }

    #[test]
    fn resolve_kind_trigger_defaults_to_duration_but_allows_date_time_override() {
        let relative = Property::new("TRIGGER", "-PT15M");
        assert_eq!(resolve_kind(&relative), ValueKind::Duration);

        let absolute = Property::new("TRIGGER", "19970902T090000Z").with_param("VALUE", vec![String::from("DATE-TIME")]);
        assert_eq!(resolve_kind(&absolute), ValueKind::DateTime);
    }
}
