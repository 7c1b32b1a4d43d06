//! Public facade over the `icalx-ical`/`icalx-core` workspace: parse, query
//! and serialize RFC 5545 iCalendar streams.
//!
//! The lexer, parser and value registry live in [`icalx_ical`]; the calendar
//! object model, time zone resolution and recurrence engine live in
//! [`icalx_core`]. This crate just re-exports the entry points a caller
//! needs, so `icalx::parse(...)` is all most callers ever write.

pub use icalx_core::{parse, serialize, Calendar, ComponentExt, CoreError, Diagnostic, Occurrence, ParseMode, RecurError, TimeZone, ZoneError, ZonedDateTime};
pub use icalx_ical::{LexError, ParseError, ValueError};
