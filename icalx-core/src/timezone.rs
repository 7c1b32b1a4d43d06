//! VTIMEZONE interpretation: resolving a TZID against a calendar's
//! registered time zones and selecting the governing STANDARD/DAYLIGHT
//! observance for a given UTC instant.
//!
//! A `VTIMEZONE`'s own recurrence (e.g. "second Sunday in March") is
//! expressed as a DTSTART/RRULE pair exactly like any other component, so
//! this module reuses [`crate::recurrence`] to expand it rather than
//! inventing a second expansion engine.

use std::cell::RefCell;
use std::collections::BTreeMap;

use icalx_ical::value_types::recur::Recur;
use icalx_ical::value_types::date_time::DateTime;
use icalx_ical::value_types::utc_offset::UtcOffset;

use crate::error::RecurError;
use crate::recurrence;

pub(crate) fn utc_offset_seconds(offset: &UtcOffset) -> i32 {
    let seconds = *offset.time_hour * 3600 + *offset.time_minute * 60 + offset.time_second.map(|value| *value).unwrap_or(0);

    match offset.positive_negative {
        icalx_ical::grammar::PositiveNegative::Positive => seconds as i32,
        icalx_ical::grammar::PositiveNegative::Negative => -(seconds as i32),
    }
}

/// One `STANDARD` or `DAYLIGHT` sub-component of a `VTIMEZONE`.
/// `dtstart` is kept in its literal, zone-less form —
/// RFC 5545 §3.6.5 defines it as local time "in the time zone in effect
/// prior to this time zone observance" (i.e. `offset_from`), so its digits
/// are never reinterpreted as UTC directly; see [`Observance::transitions_before`].
#[derive(Debug, Clone)]
pub struct Observance {
    pub is_daylight: bool,
    pub tzname: Option<String>,
    pub offset_from: i32,
    pub offset_to: i32,
    pub dtstart: DateTime,
    pub recur: Option<Recur>,
    pub rdates: Vec<DateTime>,
}

impl Observance {
    /// Every transition instant this observance takes effect at or before
    /// `at_or_before` (real UTC epoch seconds), most recent last.
    ///
    /// DTSTART/RRULE/RDATE digits are local wall-clock values in
    /// `offset_from`; treating them as literal UTC (the same trick
    /// `icalx_ical::value_types::date_time::DateTime::get_utc_timestamp`
    /// already performs for a "floating" value) and then subtracting
    /// `offset_from` recovers the real UTC instant, since by definition
    /// `local = utc + offset_from`.
    fn transitions_before(&self, at_or_before: i64) -> Result<Vec<i64>, RecurError> {
        let dtstart_literal = self.dtstart.get_utc_timestamp(None);
        let literal_bound = at_or_before + i64::from(self.offset_from);

        if dtstart_literal > literal_bound {
            return Ok(Vec::new());
        }

        let rdates_literal: Vec<i64> = self.rdates.iter().map(|date_time| date_time.get_utc_timestamp(None)).collect();

        let literal_instants = recurrence::expand(dtstart_literal, self.recur.as_ref(), &rdates_literal, None, &[], dtstart_literal, literal_bound)?;

        Ok(literal_instants
            .into_iter()
            .map(|literal| literal - i64::from(self.offset_from))
            .filter(|real_utc| *real_utc <= at_or_before)
            .collect())
    }
}

/// A parsed `VTIMEZONE` component: a TZID plus its observances, in
/// declaration order. Offsets are resolved by walking every observance's
/// transitions and picking whichever governs most recently: the most recent
/// STANDARD/DAYLIGHT sub-component whose effective DTSTART+recurrences is
/// at or before the instant.
#[derive(Debug)]
pub struct TimeZone {
    pub tzid: String,
    pub observances: Vec<Observance>,
    cache: RefCell<BTreeMap<i64, i32>>,
}

impl TimeZone {
    pub fn new(tzid: String, observances: Vec<Observance>) -> Self {
        Self { tzid, observances, cache: RefCell::new(BTreeMap::new()) }
    }

    /// The UTC offset (seconds) in effect at `utc_instant`.
    /// Memoized per-instant: the cache is a pure, redundantly-safe-to-recompute
    /// boundary, not a correctness requirement.
    pub fn offset_at(&self, utc_instant: i64) -> Result<i32, RecurError> {
        if let Some(cached) = self.cache.borrow().get(&utc_instant) {
            return Ok(*cached);
        }

        let mut governing: Option<(i64, &Observance)> = None;

        for observance in &self.observances {
            for transition in observance.transitions_before(utc_instant)? {
                let is_better = match governing {
                    Some((best, _)) => transition > best,
                    None => true,
                };

                if is_better {
                    governing = Some((transition, observance));
                }
            }
        }

        let offset = match governing {
            Some((_, observance)) => observance.offset_to,
            // No observance has transitioned by this instant: fall back to
            // whichever observance sorts earliest, matching its pre-transition
            // offset_from (RFC 5545 §3.6.5's "in effect prior to this
            // observance" state for the timeline's very first segment).
            None => self.observances.first().map(|observance| observance.offset_from).unwrap_or(0),
        };

        self.cache.borrow_mut().insert(utc_instant, offset);

        Ok(offset)
    }

    /// The `TZNAME` in effect at `utc_instant`, if any observance names one.
    pub fn name_at(&self, utc_instant: i64) -> Result<Option<String>, RecurError> {
        let offset = self.offset_at(utc_instant)?;

        Ok(self.observances.iter().find(|observance| observance.offset_to == offset).and_then(|observance| observance.tzname.clone()))
    }
}
