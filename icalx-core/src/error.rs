//! Error kinds surfaced by the calendar object model, time-zone resolver and
//! recurrence engine — the two crate-local additions to the
//! `LexError`/`ParseError`/`ValueError` triad `icalx-ical` already defines.

use thiserror::Error;

/// A semantic violation in a component's recurrence properties. Surfaces at
/// evaluation time, not at parse time, unless the caller asks for eager
/// validation in strict mode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecurError {
    #[error("RRULE/EXRULE BY-value out of RFC 5545 range: {reason}")]
    OutOfRange { reason: String },

    #[error("component specifies both COUNT and UNTIL, which are mutually exclusive")]
    ConflictingLimit,

    #[error("component specifies both DTEND and DURATION, which are mutually exclusive")]
    MutuallyExclusive,

    #[error("component has no DTSTART to anchor its recurrence set")]
    MissingDtStart,

    #[error("underlying rule engine rejected the rendered recurrence set: {reason}")]
    Engine { reason: String },
}

/// An unresolved `TZID`. This is always non-fatal: the date-time is treated
/// as floating in local arithmetic and the name is kept for output, but a
/// caller can surface this as a diagnostic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("TZID {tzid:?} not found in this calendar's VTIMEZONE registry")]
pub struct ZoneError {
    pub tzid: String,
}

/// A structural error from the calendar object model itself — distinct from
/// the lexer/parser/value errors `icalx-ical` already owns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error(transparent)]
    Lex(#[from] icalx_ical::LexError),

    #[error(transparent)]
    Parse(#[from] icalx_ical::ParseError),

    #[error(transparent)]
    Value(#[from] icalx_ical::ValueError),

    #[error(transparent)]
    Recur(#[from] RecurError),

    #[error("no VCALENDAR component found in input")]
    MissingCalendar,

    #[error("duplicate UID {uid:?} within the same component kind")]
    DuplicateUid { uid: String },
}

/// A non-fatal diagnostic collected in lenient parse mode: `ValueError`s
/// don't abort the parse, and unresolved `TZID`s never abort anything at
/// all. Both land here so a caller can inspect what was tolerated without
/// discarding the rest of the calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    Value(icalx_ical::ValueError),
    Zone(ZoneError),
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::Value(error) => write!(f, "{error}"),
            Diagnostic::Zone(error) => write!(f, "{error}"),
        }
    }
}
