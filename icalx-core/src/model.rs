//! The calendar object model: a `VCALENDAR` container with typed
//! collections over its children, cross-component UID resolution, and the
//! `evaluate` entry point that drives the recurrence engine per component.
//!
//! A root container owning typed child collections plus a generic pass for
//! anything it doesn't know about by name — no indexing or storage
//! machinery, which is out of scope here (see DESIGN.md).

use std::collections::HashMap;

use icalx_ical::parser::Component;
use icalx_ical::property::Property;
use icalx_ical::value_types::date_time::DateTime;
use icalx_ical::value_types::period::Period;
use icalx_ical::value_types::recur::Recur;
use icalx_ical::value_types::text;
use icalx_ical::value_types::Value;
use icalx_ical::{registry, ValueError};

use crate::error::{CoreError, Diagnostic, RecurError, ZoneError};
use crate::recurrence::{self, EndPolicy, Occurrence};
use crate::timezone::{Observance, TimeZone};

/// Strict mode fails the whole parse on the first recoverable error; lenient
/// mode collects them as [`Diagnostic`]s on the returned [`Calendar`] instead.
/// Unresolved `TZID`s are never fatal in either mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    Strict,
    #[default]
    Lenient,
}

/// A date-time resolved to an absolute UTC instant, retaining its
/// originating TZID (if any) for diagnostics and `has_time` for rendering
/// DATE vs. DATE-TIME — the instant itself, once resolved, is always UTC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZonedDateTime {
    pub utc: i64,
    pub has_time: bool,
    pub tzid: Option<String>,
}

impl ZonedDateTime {
    /// Renders this instant back as a [`DateTime`]. `utc` is already a real
    /// UTC instant (any TZID offset was subtracted once, by
    /// [`resolve_literal`]/[`resolve_datetime`], to produce it) — rendering
    /// just formats it, it never re-applies the zone's offset.
    pub fn render(&self) -> DateTime {
        DateTime::from(self.utc)
    }
}

/// The raw local-clock reading of a DATE-TIME property, read literally as if
/// it were UTC — the zone's offset is subtracted later, not here.
/// Recurrence and window arithmetic run entirely in this literal space so
/// that a FREQ=DAILY rule crossing a DST transition keeps its local reading
/// and lets the real UTC instant shift underneath it, rather than repeating
/// at a fixed UTC cadence.
fn literal_timestamp(property: &Property) -> Result<i64, CoreError> {
    let Value::DateTime(date_time) = registry::resolve(property, 0, 0)? else {
        return Err(CoreError::Value(ValueError::new(property.name.clone(), 0, 0, "expected a DATE-TIME/DATE value")));
    };

    Ok(date_time.get_utc_timestamp(None))
}

/// The TZID a DATE-TIME property's literal reading should be converted
/// through, or `None` if it's already an explicit UTC ('Z') value (TZID is
/// meaningless there, and RFC 5545 forbids it) or genuinely floating.
fn effective_tzid(property: &Property, diagnostics: &mut Vec<Diagnostic>) -> Result<Option<String>, CoreError> {
    let Value::DateTime(date_time) = registry::resolve(property, 0, 0)? else {
        return Err(CoreError::Value(ValueError::new(property.name.clone(), 0, 0, "expected a DATE-TIME/DATE value")));
    };

    let tzid = property.params.get_first("TZID").map(String::from);

    if matches!(date_time, DateTime::UtcDateTime(_)) {
        if let Some(tzid) = tzid {
            diagnostics.push(Diagnostic::Value(ValueError::new(
                property.name.clone(),
                0,
                0,
                format!("TZID={tzid} present alongside a UTC 'Z' value; TZID ignored"),
            )));
        }

        return Ok(None);
    }

    Ok(tzid)
}

/// Converts a literal local-clock instant to real UTC against `zone`,
/// resolving the offset from the literal reading itself (the same
/// approximation [`crate::timezone::Observance::transitions_before`] makes):
/// close enough that the handful of hours of slop it introduces only ever
/// matters within a DST transition's own narrow window, never across the
/// month/week boundaries a BYMONTH/BYDAY rule actually pivots on.
fn resolve_literal(literal: i64, zone: Option<&TimeZone>) -> Result<i64, RecurError> {
    match zone {
        Some(zone) => {
            let offset = zone.offset_at(literal)?;
            Ok(literal - i64::from(offset))
        }
        None => Ok(literal),
    }
}

fn resolve_datetime(
    property: &Property,
    zones: &HashMap<String, TimeZone>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<ZonedDateTime, CoreError> {
    let value = registry::resolve(property, 0, 0)?;

    let Value::DateTime(date_time) = value else {
        return Err(CoreError::Value(ValueError::new(property.name.clone(), 0, 0, "expected a DATE-TIME/DATE value")));
    };

    let has_time = !matches!(date_time, DateTime::LocalDate(_));
    let tzid = property.params.get_first("TZID").map(String::from);

    if matches!(date_time, DateTime::UtcDateTime(_)) {
        if let Some(tzid) = tzid {
            diagnostics.push(Diagnostic::Value(ValueError::new(
                property.name.clone(),
                0,
                0,
                format!("TZID={tzid} present alongside a UTC 'Z' value; TZID ignored"),
            )));
        }

        return Ok(ZonedDateTime { utc: date_time.get_utc_timestamp(None), has_time, tzid: None });
    }

    let Some(tzid) = tzid else {
        // Floating: no zone information at all. Treated as a literal UTC
        // instant for evaluation purposes, same convention
        // `crate::timezone::Observance` uses for VTIMEZONE's own DTSTART.
        return Ok(ZonedDateTime { utc: date_time.get_utc_timestamp(None), has_time, tzid: None });
    };

    match zones.get(&tzid) {
        Some(zone) => {
            let literal = date_time.get_utc_timestamp(None);
            let offset = zone.offset_at(literal).map_err(CoreError::Recur)?;

            Ok(ZonedDateTime { utc: literal - i64::from(offset), has_time, tzid: Some(tzid) })
        }
        None => {
            diagnostics.push(Diagnostic::Zone(ZoneError { tzid: tzid.clone() }));
            Ok(ZonedDateTime { utc: date_time.get_utc_timestamp(None), has_time, tzid: Some(tzid) })
        }
    }
}

/// Typed accessors over a raw parsed [`Component`], bridging it to the
/// recurrence engine and zone resolver. Kept as a trait over the existing
/// `icalx-ical` type rather than a wrapper struct, so a caller can keep using
/// every `Component` method (`properties`, `components`, `render_ical`, …)
/// unchanged.
pub trait ComponentExt {
    fn uid(&self) -> Option<String>;
    fn recur(&self, name: &str) -> Option<Result<Recur, CoreError>>;
    fn dtstart(&self, zones: &HashMap<String, TimeZone>, diagnostics: &mut Vec<Diagnostic>) -> Result<Option<ZonedDateTime>, CoreError>;
    fn recurrence_id(&self, zones: &HashMap<String, TimeZone>, diagnostics: &mut Vec<Diagnostic>) -> Result<Option<ZonedDateTime>, CoreError>;
    fn rdates(&self, zones: &HashMap<String, TimeZone>, diagnostics: &mut Vec<Diagnostic>) -> Result<Vec<ZonedDateTime>, CoreError>;
    fn exdates(&self, zones: &HashMap<String, TimeZone>, diagnostics: &mut Vec<Diagnostic>) -> Result<Vec<ZonedDateTime>, CoreError>;
    fn end_policy(&self, dtstart: &ZonedDateTime, zones: &HashMap<String, TimeZone>, diagnostics: &mut Vec<Diagnostic>) -> Result<EndPolicy, CoreError>;

    /// The occurrence set intersecting `[from, to]`, rendered back into the
    /// component's DTSTART zone as [`Period`]s.
    fn evaluate(
        &self,
        zones: &HashMap<String, TimeZone>,
        diagnostics: &mut Vec<Diagnostic>,
        from: i64,
        to: i64,
    ) -> Result<Vec<Period>, CoreError>;
}

impl ComponentExt for Component {
    fn uid(&self) -> Option<String> {
        let property = self.property("UID")?;
        let Value::Text(text) = registry::resolve(property, 0, 0).ok()? else { return None };

        Some(text::unescape(&text.0))
    }

    fn recur(&self, name: &str) -> Option<Result<Recur, CoreError>> {
        let property = self.property(name)?;

        Some(match registry::resolve(property, 0, 0) {
            Ok(Value::Recur(recur)) => Ok(recur),
            Ok(_) => Err(CoreError::Value(ValueError::new(name, 0, 0, "expected a RECUR value"))),
            Err(error) => Err(CoreError::Value(error)),
        })
    }

    fn dtstart(&self, zones: &HashMap<String, TimeZone>, diagnostics: &mut Vec<Diagnostic>) -> Result<Option<ZonedDateTime>, CoreError> {
        match self.property("DTSTART") {
            Some(property) => Ok(Some(resolve_datetime(property, zones, diagnostics)?)),
            None => Ok(None),
        }
    }

    fn recurrence_id(&self, zones: &HashMap<String, TimeZone>, diagnostics: &mut Vec<Diagnostic>) -> Result<Option<ZonedDateTime>, CoreError> {
        match self.property("RECURRENCE-ID") {
            Some(property) => Ok(Some(resolve_datetime(property, zones, diagnostics)?)),
            None => Ok(None),
        }
    }

    fn rdates(&self, zones: &HashMap<String, TimeZone>, diagnostics: &mut Vec<Diagnostic>) -> Result<Vec<ZonedDateTime>, CoreError> {
        self.properties("RDATE").iter().map(|property| resolve_datetime(property, zones, diagnostics)).collect()
    }

    fn exdates(&self, zones: &HashMap<String, TimeZone>, diagnostics: &mut Vec<Diagnostic>) -> Result<Vec<ZonedDateTime>, CoreError> {
        self.properties("EXDATE").iter().map(|property| resolve_datetime(property, zones, diagnostics)).collect()
    }

    fn end_policy(&self, dtstart: &ZonedDateTime, zones: &HashMap<String, TimeZone>, diagnostics: &mut Vec<Diagnostic>) -> Result<EndPolicy, CoreError> {
        let duration = self.property("DURATION");
        let dtend = self.property("DTEND").or_else(|| self.property("DUE"));

        match (duration, dtend) {
            (Some(_), Some(_)) => Err(CoreError::Recur(RecurError::MutuallyExclusive)),
            (Some(property), None) => {
                let seconds = recurrence::duration_seconds(&property.value)?;
                Ok(EndPolicy::from_duration_seconds(seconds))
            }
            (None, Some(property)) => {
                let dtend = resolve_datetime(property, zones, diagnostics)?;
                Ok(EndPolicy::from_duration_seconds(dtend.utc - dtstart.utc))
            }
            (None, None) => Ok(EndPolicy::None),
        }
    }

    fn evaluate(
        &self,
        zones: &HashMap<String, TimeZone>,
        diagnostics: &mut Vec<Diagnostic>,
        from: i64,
        to: i64,
    ) -> Result<Vec<Period>, CoreError> {
        let Some(dtstart_property) = self.property("DTSTART") else {
            return Err(CoreError::Recur(RecurError::MissingDtStart));
        };

        let dtstart_literal = literal_timestamp(dtstart_property)?;
        let tzid = effective_tzid(dtstart_property, diagnostics)?;

        let zone = match &tzid {
            Some(tzid) => match zones.get(tzid) {
                Some(zone) => Some(zone),
                None => {
                    diagnostics.push(Diagnostic::Zone(ZoneError { tzid: tzid.clone() }));
                    None
                }
            },
            None => None,
        };

        let recur = self.recur("RRULE").transpose()?;
        let exrecur = self.recur("EXRULE").transpose()?;

        let rdate_literals = self.properties("RDATE").iter().map(literal_timestamp).collect::<Result<Vec<_>, _>>()?;
        let exdate_literals = self.properties("EXDATE").iter().map(literal_timestamp).collect::<Result<Vec<_>, _>>()?;

        let duration = self.property("DURATION");
        let dtend = self.property("DTEND").or_else(|| self.property("DUE"));

        let end_policy = match (duration, dtend) {
            (Some(_), Some(_)) => return Err(CoreError::Recur(RecurError::MutuallyExclusive)),
            (Some(property), None) => EndPolicy::from_duration_seconds(recurrence::duration_seconds(&property.value)?),
            (None, Some(property)) => EndPolicy::from_duration_seconds(literal_timestamp(property)? - dtstart_literal),
            (None, None) => EndPolicy::None,
        };

        // Recurrence/window arithmetic runs in literal local-clock space
        // (see `literal_timestamp`); widen the search window generously
        // before converting each candidate to real UTC and filtering
        // precisely, since the literal-to-UTC mapping isn't known until a
        // candidate's own offset is resolved.
        const ZONE_SKEW_GUARD: i64 = 26 * 3600;
        let literal_from = from.saturating_sub(ZONE_SKEW_GUARD);
        let literal_to = to.saturating_add(ZONE_SKEW_GUARD);

        let occurrences = recurrence::materialize(
            dtstart_literal,
            recur.as_ref(),
            &rdate_literals,
            exrecur.as_ref(),
            &exdate_literals,
            end_policy,
            literal_from,
            literal_to,
        )
        .map_err(CoreError::Recur)?;

        let has_time = !matches!(registry::resolve(dtstart_property, 0, 0)?, Value::DateTime(DateTime::LocalDate(_)));

        occurrences
            .into_iter()
            .filter_map(|occurrence: Occurrence| -> Option<Result<Period, CoreError>> {
                let start_utc = match resolve_literal(occurrence.start_utc, zone) {
                    Ok(utc) => utc,
                    Err(error) => return Some(Err(CoreError::Recur(error))),
                };

                if start_utc < from || start_utc > to {
                    return None;
                }

                let end_utc = start_utc + (occurrence.end_utc - occurrence.start_utc);

                let start = ZonedDateTime { utc: start_utc, has_time, tzid: tzid.clone() };
                let end = ZonedDateTime { utc: end_utc, has_time, tzid: tzid.clone() };

                Some(Ok(Period::Explicit(start.render(), end.render())))
            })
            .collect()
    }
}

fn build_observance(sub_component: &Component, is_daylight: bool, diagnostics: &mut Vec<Diagnostic>) -> Result<Option<Observance>, CoreError> {
    let zones: HashMap<String, TimeZone> = HashMap::new();

    let Some(dtstart) = sub_component.dtstart(&zones, diagnostics)? else {
        return Ok(None);
    };

    let offset_from = sub_component.property("TZOFFSETFROM");
    let offset_to = sub_component.property("TZOFFSETTO");

    let (Some(offset_from), Some(offset_to)) = (offset_from, offset_to) else {
        return Ok(None);
    };

    let Value::UtcOffset(offset_from) = registry::resolve(offset_from, 0, 0)? else {
        return Ok(None);
    };

    let Value::UtcOffset(offset_to) = registry::resolve(offset_to, 0, 0)? else {
        return Ok(None);
    };

    let tzname = sub_component.property("TZNAME").and_then(|property| match registry::resolve(property, 0, 0) {
        Ok(Value::Text(text)) => Some(text::unescape(&text.0)),
        _ => None,
    });

    let recur = sub_component.recur("RRULE").transpose()?;
    let rdates = sub_component
        .properties("RDATE")
        .iter()
        .map(|property| resolve_datetime(property, &zones, diagnostics))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|zoned| DateTime::from(zoned.utc))
        .collect();

    Ok(Some(Observance {
        is_daylight,
        tzname,
        offset_from: crate::timezone::utc_offset_seconds(&offset_from),
        offset_to: crate::timezone::utc_offset_seconds(&offset_to),
        dtstart: DateTime::from(dtstart.utc),
        recur,
        rdates,
    }))
}

fn build_timezone(component: &Component, diagnostics: &mut Vec<Diagnostic>) -> Result<Option<(String, TimeZone)>, CoreError> {
    let Some(tzid_property) = component.property("TZID") else { return Ok(None) };
    let Value::Text(tzid) = registry::resolve(tzid_property, 0, 0)? else { return Ok(None) };
    let tzid = text::unescape(&tzid.0);

    let mut observances = Vec::new();

    for standard in component.components("STANDARD") {
        if let Some(observance) = build_observance(standard, false, diagnostics)? {
            observances.push(observance);
        }
    }

    for daylight in component.components("DAYLIGHT") {
        if let Some(observance) = build_observance(daylight, true, diagnostics)? {
            observances.push(observance);
        }
    }

    observances.sort_by_key(|observance| observance.dtstart.get_utc_timestamp(None));

    Ok(Some((tzid.clone(), TimeZone::new(tzid, observances))))
}

/// The root `VCALENDAR` container. Generic children are kept in their
/// original parse order as the source of truth; the typed accessors
/// (`events`, `todos`, …) are name-filtered views over them.
#[derive(Debug)]
pub struct Calendar {
    pub version: Option<String>,
    pub prodid: Option<String>,
    pub calscale: Option<String>,
    pub method: Option<String>,
    /// Every root-level property, VERSION/PRODID/CALSCALE/METHOD included —
    /// kept verbatim (not just the four scalars above) so `serialize` round-trips
    /// any unrecognized `X-`/IANA property a source document carried at the
    /// `VCALENDAR` level.
    pub properties: HashMap<String, Vec<Property>>,
    pub children: Vec<Component>,
    pub timezones: HashMap<String, TimeZone>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Calendar {
    /// Builds a [`Calendar`] from a parsed `VCALENDAR` root component. Time
    /// zones are registered before anything else, since recurrence expansion
    /// for other components may need to resolve a `TZID` against them.
    pub fn from_component(root: Component, mode: ParseMode) -> Result<Self, CoreError> {
        if !root.name.eq_ignore_ascii_case("VCALENDAR") {
            return Err(CoreError::MissingCalendar);
        }

        let mut diagnostics = Vec::new();
        let mut timezones = HashMap::new();

        validate_values(&root, &mut diagnostics, mode)?;

        for component in root.components("VTIMEZONE") {
            match build_timezone(component, &mut diagnostics) {
                Ok(Some((tzid, timezone))) => {
                    timezones.insert(tzid, timezone);
                }
                Ok(None) => {}
                Err(error) if mode == ParseMode::Lenient => {
                    tracing::warn!(error = %error, "failed to register VTIMEZONE; continuing without it");
                }
                Err(error) => return Err(error),
            }
        }

        for diagnostic in &diagnostics {
            tracing::warn!(%diagnostic, "calendar diagnostic");
        }

        let version = text_property(&root, "VERSION");
        let prodid = text_property(&root, "PRODID");
        let calscale = text_property(&root, "CALSCALE");
        let method = text_property(&root, "METHOD");

        check_uid_uniqueness(&root, &mut diagnostics, mode)?;

        Ok(Calendar {
            version,
            prodid,
            calscale,
            method,
            properties: root.properties,
            children: root.components,
            timezones,
            diagnostics,
        })
    }

    /// Rebuilds the root `VCALENDAR` component and renders it back to
    /// canonical content-line text.
    pub fn serialize(&self) -> Vec<u8> {
        let root = Component { name: String::from("VCALENDAR"), properties: self.properties.clone(), components: self.children.clone() };

        root.render_ical().into_bytes()
    }

    pub fn events(&self) -> impl Iterator<Item = &Component> {
        self.children.iter().filter(|component| component.name.eq_ignore_ascii_case("VEVENT"))
    }

    pub fn todos(&self) -> impl Iterator<Item = &Component> {
        self.children.iter().filter(|component| component.name.eq_ignore_ascii_case("VTODO"))
    }

    pub fn journals(&self) -> impl Iterator<Item = &Component> {
        self.children.iter().filter(|component| component.name.eq_ignore_ascii_case("VJOURNAL"))
    }

    pub fn freebusy(&self) -> impl Iterator<Item = &Component> {
        self.children.iter().filter(|component| component.name.eq_ignore_ascii_case("VFREEBUSY"))
    }

    pub fn timezone_components(&self) -> impl Iterator<Item = &Component> {
        self.children.iter().filter(|component| component.name.eq_ignore_ascii_case("VTIMEZONE"))
    }

    /// The resolved time zone for a given TZID, if this calendar registered one.
    pub fn get_timezone(&self, tzid: &str) -> Option<&TimeZone> {
        self.timezones.get(tzid)
    }

    pub fn add_child(&mut self, component: Component) {
        self.children.push(component);
    }

    /// Re-parents every child from `other` onto `self`, then discards `other`.
    pub fn merge(&mut self, other: Calendar) {
        self.children.extend(other.children);
        self.diagnostics.extend(other.diagnostics);

        for (tzid, timezone) in other.timezones {
            self.timezones.entry(tzid).or_insert(timezone);
        }
    }

    /// Evaluates every recurring component's occurrences intersecting
    /// `[from, to]`. Each component's own occurrences are ascending; the
    /// aggregate across components is left in child order, unmerged.
    pub fn evaluate(&mut self, from: i64, to: i64) -> Result<HashMap<String, Vec<Period>>, CoreError> {
        let mut results = HashMap::new();

        // Iterate the `children` field directly (not through the `events`/
        // `todos` accessor methods) so the borrow checker can see this only
        // touches `children`, leaving `timezones` and `diagnostics` free to
        // borrow separately below.
        for component in self.children.iter().filter(|component| {
            component.name.eq_ignore_ascii_case("VEVENT") || component.name.eq_ignore_ascii_case("VTODO")
        }) {
            let Some(uid) = component.uid() else { continue };

            if component.property("DTSTART").is_none() {
                continue;
            }

            let periods = component.evaluate(&self.timezones, &mut self.diagnostics, from, to)?;
            results.insert(uid, periods);
        }

        Ok(results)
    }

    /// Links `RECURRENCE-ID` overrides to their base component by shared UID.
    /// Returns, for a given UID, the base component (the one with no
    /// `RECURRENCE-ID`) and every override, in child order.
    pub fn resolve_uid<'a>(&'a self, uid: &str) -> (Option<&'a Component>, Vec<&'a Component>) {
        let mut base = None;
        let mut overrides = Vec::new();

        for component in self.children.iter() {
            if component.uid().as_deref() != Some(uid) {
                continue;
            }

            if component.property("RECURRENCE-ID").is_some() {
                overrides.push(component);
            } else if base.is_none() {
                base = Some(component);
            }
        }

        (base, overrides)
    }
}

fn text_property(component: &Component, name: &str) -> Option<String> {
    let property = component.property(name)?;

    match registry::resolve(property, 0, 0).ok()? {
        Value::Text(text) => Some(text::unescape(&text.0)),
        _ => None,
    }
}

/// Resolves every property in the tree against the value registry up front,
/// so a malformed value is caught at parse entry rather than whenever some
/// later accessor happens to touch it. Strict mode fails on the first one;
/// lenient mode collects them all as diagnostics and keeps going.
fn validate_values(component: &Component, diagnostics: &mut Vec<Diagnostic>, mode: ParseMode) -> Result<(), CoreError> {
    for properties in component.properties.values() {
        for property in properties {
            if let Err(error) = registry::resolve(property, 0, 0) {
                if mode == ParseMode::Strict {
                    return Err(CoreError::Value(error));
                }

                diagnostics.push(Diagnostic::Value(error));
            }
        }
    }

    for child in &component.components {
        validate_values(child, diagnostics, mode)?;
    }

    Ok(())
}

fn check_uid_uniqueness(root: &Component, diagnostics: &mut Vec<Diagnostic>, mode: ParseMode) -> Result<(), CoreError> {
    let mut seen: HashMap<&str, HashMap<String, bool>> = HashMap::new();

    for component in &root.components {
        let Some(uid) = component.uid() else { continue };
        let has_recurrence_id = component.property("RECURRENCE-ID").is_some();

        let kind_seen = seen.entry(component.name.as_str()).or_default();

        if !has_recurrence_id {
            if kind_seen.insert(uid.clone(), true).is_some() {
                if mode == ParseMode::Strict {
                    return Err(CoreError::DuplicateUid { uid });
                }

                diagnostics.push(Diagnostic::Value(ValueError::new(
                    component.name.clone(),
                    0,
                    0,
                    format!("duplicate UID {uid:?} within {} components", component.name),
                )));
            }
        }
    }

    Ok(())
}
