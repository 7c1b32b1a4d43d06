//! The recurrence engine: given a DTSTART anchor plus zero or more
//! RRULE/RDATE/EXRULE/EXDATE instants, produce the sorted de-duplicated
//! occurrence set intersecting a requested `[from, to]` window.
//!
//! Rather than hand-rolling RFC 5545 §3.3.10's FREQ/BY* expansion table,
//! every DTSTART/RRULE/EXRULE/RDATE/EXDATE is rendered back to canonical
//! content-line text and fed to the `rrule` crate's `RRuleSet: FromStr`
//! parser, which implements the expansion order (including WKST and
//! BYSETPOS) faithfully. This module is the validation and
//! window-intersection layer in front of it.

use std::str::FromStr;

use icalx_ical::value_types::date_time::DateTime;
use icalx_ical::value_types::duration::Duration;
use icalx_ical::value_types::recur::Recur;

use crate::error::RecurError;

/// A single materialized occurrence: an absolute start/end instant (UTC
/// epoch seconds), represented as a [`icalx_ical`] `Period` would be once
/// rendered back to text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Occurrence {
    pub start_utc: i64,
    pub end_utc: i64,
}

fn render_dtstart(utc_ts: i64) -> String {
    format!("DTSTART:{}", DateTime::from(utc_ts).render_ical())
}

fn render_rdate(utc_ts: i64) -> String {
    format!("RDATE:{}", DateTime::from(utc_ts).render_ical())
}

/// Renders a bare `Recur` back into a full `RRULE:`/`EXRULE:` content line
/// and feeds the whole set to `rrule`'s parser.
fn build_rrule_set(
    dtstart_utc_ts: i64,
    recur: Option<&Recur>,
    rdates: &[i64],
    exrecur: Option<&Recur>,
    exdates: &[i64],
) -> Result<rrule::RRuleSet, RecurError> {
    let mut parts = vec![render_dtstart(dtstart_utc_ts)];

    if let Some(recur) = recur {
        parts.push(format!("RRULE:{}", recur.render_ical()));
    }

    if let Some(exrecur) = exrecur {
        parts.push(format!("EXRULE:{}", exrecur.render_ical()));
    }

    for rdate in rdates {
        parts.push(render_rdate(*rdate));
    }

    for exdate in exdates {
        parts.push(format!("EXDATE:{}", DateTime::from(*exdate).render_ical()));
    }

    // The `rrule` crate requires at least one RRULE/RDATE to generate
    // occurrences at all; a bare DTSTART with no rule recurs exactly once,
    // at DTSTART itself.
    if recur.is_none() && rdates.is_empty() {
        parts.push(render_rdate(dtstart_utc_ts));
    }

    parts.join("\n").parse::<rrule::RRuleSet>().map_err(|error| RecurError::Engine { reason: error.to_string() })
}

/// Validates COUNT/UNTIL mutual exclusion up front. `Recur::validate`
/// already rejects this combination at parse time; this re-checks at
/// evaluation time since a `Recur` can also arrive already built, bypassing
/// that parse-time check.
fn validate_recur(recur: &Recur) -> Result<(), RecurError> {
    if recur.until.is_some() && recur.count.is_some() {
        return Err(RecurError::ConflictingLimit);
    }

    Ok(())
}

/// Expands a DTSTART anchor plus an optional RRULE/EXRULE and explicit
/// RDATE/EXDATE instant lists into the sorted, de-duplicated set of
/// occurrence start instants intersecting `[from, to]`:
/// `(⋃ RRULE ∪ RDATE) \ (⋃ EXRULE ∪ EXDATE)`, windowed, sorted, deduped.
///
/// `dtstart_utc_ts`/`rdates`/`exdates` are all absolute UTC epoch seconds —
/// zone resolution happens one layer up, in [`crate::model`], before this
/// function ever sees a timestamp.
pub fn expand(
    dtstart_utc_ts: i64,
    recur: Option<&Recur>,
    rdates: &[i64],
    exrecur: Option<&Recur>,
    exdates: &[i64],
    from: i64,
    to: i64,
) -> Result<Vec<i64>, RecurError> {
    if let Some(recur) = recur {
        validate_recur(recur)?;
    }

    if let Some(exrecur) = exrecur {
        validate_recur(exrecur)?;
    }

    let rrule_set = build_rrule_set(dtstart_utc_ts, recur, rdates, exrecur, exdates)?;

    let mut instants: Vec<i64> = Vec::new();

    // `rrule`'s iterator yields occurrences in ascending order; stop as soon
    // as we pass the window's upper bound instead of exhausting an unbounded
    // rule.
    for candidate in rrule_set.into_iter() {
        let ts = candidate.timestamp();

        if ts > to {
            break;
        }

        if ts < dtstart_utc_ts {
            // Step 5: drop candidates earlier than DTSTART. `rrule` itself
            // never yields these, but RDATE text could in principle.
            continue;
        }

        if ts >= from {
            instants.push(ts);
        }
    }

    instants.sort_unstable();
    instants.dedup();

    Ok(instants)
}

/// The occurrence generation policy for a component's end instant: either a
/// fixed `Duration` added to every occurrence's start, or the original
/// DTEND-DTSTART span preserved and re-applied to each occurrence.
#[derive(Debug, Clone, Copy)]
pub enum EndPolicy {
    Duration(i64),
    None,
}

impl EndPolicy {
    pub fn from_duration_seconds(seconds: i64) -> Self {
        Self::Duration(seconds)
    }

    fn end_for(&self, start: i64) -> i64 {
        match self {
            EndPolicy::Duration(seconds) => start + seconds,
            EndPolicy::None => start,
        }
    }
}

/// Builds a component's materialized occurrence list from its already
/// zone-resolved UTC schedule. `icalx-core::model` is responsible for
/// extracting DTSTART/RRULE/etc. from a raw component and resolving their
/// instants to UTC before calling this.
pub fn materialize(
    dtstart_utc_ts: i64,
    recur: Option<&Recur>,
    rdates: &[i64],
    exrecur: Option<&Recur>,
    exdates: &[i64],
    end_policy: EndPolicy,
    from: i64,
    to: i64,
) -> Result<Vec<Occurrence>, RecurError> {
    let starts = expand(dtstart_utc_ts, recur, rdates, exrecur, exdates, from, to)?;

    Ok(starts.into_iter().map(|start| Occurrence { start_utc: start, end_utc: end_policy.end_for(start) }).collect())
}

/// Parses a DURATION property's raw text and returns its signed length in
/// seconds. Kept here (rather than as a bare `FromStr` call at every
/// callsite) because every caller needs the same "absent means zero-length"
/// fallback when neither DURATION nor DTEND is present.
pub fn duration_seconds(raw: &str) -> Result<i64, RecurError> {
    Duration::from_str(raw).map(|duration| duration.get_duration_in_seconds()).map_err(|reason| RecurError::Engine { reason })
}
