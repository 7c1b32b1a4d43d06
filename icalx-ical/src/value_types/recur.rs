//! RECUR value type (RFC 5545 §3.3.10).
//!
//! This only parses and round-trips the rule text; expanding a `Recur` into
//! concrete occurrences is the recurrence engine's job, not this crate's —
//! see `icalx_core::recurrence`.

use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::combinator::{cut, map, map_res, opt};
use nom::error::context;
use nom::multi::separated_list1;
use nom::sequence::{pair, preceded};

use crate::grammar::{comma, semicolon};
use crate::value_types::date_time::DateTime;
use crate::value_types::integer::Integer;
use crate::value_types::list::List;
use crate::{impl_icalendar_entity_traits, ICalendarEntity, ParserError, ParserInput, ParserResult};

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Frequency {
    Secondly,
    Minutely,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl ICalendarEntity for Frequency {
    fn parse_ical(input: ParserInput) -> ParserResult<Self>
    where
        Self: Sized,
    {
        context(
            "FREQ",
            alt((
                map(tag("SECONDLY"), |_| Self::Secondly),
                map(tag("MINUTELY"), |_| Self::Minutely),
                map(tag("HOURLY"), |_| Self::Hourly),
                map(tag("DAILY"), |_| Self::Daily),
                map(tag("WEEKLY"), |_| Self::Weekly),
                map(tag("MONTHLY"), |_| Self::Monthly),
                map(tag("YEARLY"), |_| Self::Yearly),
            )),
        )(input)
    }

    fn render_ical(&self) -> String {
        match self {
            Self::Secondly => "SECONDLY",
            Self::Minutely => "MINUTELY",
            Self::Hourly => "HOURLY",
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        }
        .to_string()
    }
}

impl_icalendar_entity_traits!(Frequency);

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum WeekDay {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl ICalendarEntity for WeekDay {
    fn parse_ical(input: ParserInput) -> ParserResult<Self>
    where
        Self: Sized,
    {
        context(
            "WEEKDAY",
            alt((
                map(tag("SU"), |_| Self::Sunday),
                map(tag("MO"), |_| Self::Monday),
                map(tag("TU"), |_| Self::Tuesday),
                map(tag("WE"), |_| Self::Wednesday),
                map(tag("TH"), |_| Self::Thursday),
                map(tag("FR"), |_| Self::Friday),
                map(tag("SA"), |_| Self::Saturday),
            )),
        )(input)
    }

    fn render_ical(&self) -> String {
        match self {
            Self::Sunday => "SU",
            Self::Monday => "MO",
            Self::Tuesday => "TU",
            Self::Wednesday => "WE",
            Self::Thursday => "TH",
            Self::Friday => "FR",
            Self::Saturday => "SA",
        }
        .to_string()
    }
}

impl_icalendar_entity_traits!(WeekDay);

/// weekdaynum = [[plus / minus] ordwk] weekday
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct WeekDayNum(pub Option<Integer>, pub WeekDay);

impl ICalendarEntity for WeekDayNum {
    fn parse_ical(input: ParserInput) -> ParserResult<Self>
    where
        Self: Sized,
    {
        context(
            "WEEKDAYNUM",
            |input| {
                let (remaining, ordwk) = opt(Integer::parse_signed_m_n(1, 2, 1, 53))(input)?;
                let (remaining, weekday) = WeekDay::parse_ical(remaining)?;

                Ok((remaining, WeekDayNum(ordwk, weekday)))
            },
        )(input)
    }

    fn render_ical(&self) -> String {
        let mut output = String::new();

        if let Some(ordwk) = &self.0 {
            output.push_str(&ordwk.render_ical());
        }

        output.push_str(&self.1.render_ical());
        output
    }
}

impl_icalendar_entity_traits!(WeekDayNum);

fn interval(input: ParserInput) -> ParserResult<Integer> {
    map_res(nom::character::complete::digit1, |value: ParserInput| value.parse::<u64>().map(Integer::from))(input)
}

fn count(input: ParserInput) -> ParserResult<Integer> {
    interval(input)
}

fn enddate(input: ParserInput) -> ParserResult<DateTime> {
    DateTime::parse_ical(input)
}

fn seconds(input: ParserInput) -> ParserResult<Integer> {
    Integer::parse_unsigned_m_n(1, 2, 0, 60)(input)
}

fn minutes(input: ParserInput) -> ParserResult<Integer> {
    Integer::parse_unsigned_m_n(1, 2, 0, 59)(input)
}

fn hour(input: ParserInput) -> ParserResult<Integer> {
    Integer::parse_unsigned_m_n(1, 2, 0, 23)(input)
}

fn monthdaynum(input: ParserInput) -> ParserResult<Integer> {
    Integer::parse_signed_m_n(1, 2, 1, 31)(input)
}

fn yeardaynum(input: ParserInput) -> ParserResult<Integer> {
    Integer::parse_signed_m_n(1, 3, 1, 366)(input)
}

fn weeknum(input: ParserInput) -> ParserResult<Integer> {
    Integer::parse_signed_m_n(1, 2, 1, 53)(input)
}

fn monthnum(input: ParserInput) -> ParserResult<Integer> {
    Integer::parse_unsigned_m_n(1, 2, 1, 12)(input)
}

macro_rules! build_ical_param {
    ($struct_name:ident, $key_str:expr, $value_parser:expr, $value_type:ty $(,)*) => {
        #[derive(Debug, Clone, Eq, PartialEq)]
        pub struct $struct_name(pub $value_type);

        impl ICalendarEntity for $struct_name {
            fn parse_ical(input: ParserInput) -> ParserResult<Self> {
                map(pair(tag($key_str), preceded(tag("="), cut($value_parser))), |(_key, value)| Self(value))(input)
            }

            fn render_ical(&self) -> String {
                format!("{}={}", $key_str, self.0.render_ical())
            }
        }
    };
}

build_ical_param!(FreqParam, "FREQ", Frequency::parse_ical, Frequency);
build_ical_param!(UntilParam, "UNTIL", enddate, DateTime);
build_ical_param!(CountParam, "COUNT", count, Integer);
build_ical_param!(IntervalParam, "INTERVAL", interval, Integer);
build_ical_param!(BysecondParam, "BYSECOND", map(separated_list1(comma, seconds), List::from), List<Integer>);
build_ical_param!(ByminuteParam, "BYMINUTE", map(separated_list1(comma, minutes), List::from), List<Integer>);
build_ical_param!(ByhourParam, "BYHOUR", map(separated_list1(comma, hour), List::from), List<Integer>);
build_ical_param!(BydayParam, "BYDAY", map(separated_list1(comma, WeekDayNum::parse_ical), List::from), List<WeekDayNum>);
build_ical_param!(BymonthdayParam, "BYMONTHDAY", map(separated_list1(comma, monthdaynum), List::from), List<Integer>);
build_ical_param!(ByyeardayParam, "BYYEARDAY", map(separated_list1(comma, yeardaynum), List::from), List<Integer>);
build_ical_param!(ByweeknoParam, "BYWEEKNO", map(separated_list1(comma, weeknum), List::from), List<Integer>);
build_ical_param!(BymonthParam, "BYMONTH", map(separated_list1(comma, monthnum), List::from), List<Integer>);
build_ical_param!(BysetposParam, "BYSETPOS", map(separated_list1(comma, yeardaynum), List::from), List<Integer>);
build_ical_param!(WkstParam, "WKST", WeekDay::parse_ical, WeekDay);

enum RecurRulePart {
    Freq(FreqParam),
    Until(UntilParam),
    Count(CountParam),
    Interval(IntervalParam),
    Bysecond(BysecondParam),
    Byminute(ByminuteParam),
    Byhour(ByhourParam),
    Byday(BydayParam),
    Bymonthday(BymonthdayParam),
    Byyearday(ByyeardayParam),
    Byweekno(ByweeknoParam),
    Bymonth(BymonthParam),
    Bysetpos(BysetposParam),
    Wkst(WkstParam),
}

impl ICalendarEntity for RecurRulePart {
    fn parse_ical(input: ParserInput) -> ParserResult<Self> {
        context(
            "RECUR-RULE-PART",
            alt((
                map(FreqParam::parse_ical, Self::Freq),
                map(UntilParam::parse_ical, Self::Until),
                map(CountParam::parse_ical, Self::Count),
                map(IntervalParam::parse_ical, Self::Interval),
                map(BysecondParam::parse_ical, Self::Bysecond),
                map(ByminuteParam::parse_ical, Self::Byminute),
                map(ByhourParam::parse_ical, Self::Byhour),
                map(BydayParam::parse_ical, Self::Byday),
                map(BymonthdayParam::parse_ical, Self::Bymonthday),
                map(ByyeardayParam::parse_ical, Self::Byyearday),
                map(ByweeknoParam::parse_ical, Self::Byweekno),
                map(BymonthParam::parse_ical, Self::Bymonth),
                map(BysetposParam::parse_ical, Self::Bysetpos),
                map(WkstParam::parse_ical, Self::Wkst),
            )),
        )(input)
    }

    fn render_ical(&self) -> String {
        match self {
            Self::Freq(p) => p.render_ical(),
            Self::Until(p) => p.render_ical(),
            Self::Count(p) => p.render_ical(),
            Self::Interval(p) => p.render_ical(),
            Self::Bysecond(p) => p.render_ical(),
            Self::Byminute(p) => p.render_ical(),
            Self::Byhour(p) => p.render_ical(),
            Self::Byday(p) => p.render_ical(),
            Self::Bymonthday(p) => p.render_ical(),
            Self::Byyearday(p) => p.render_ical(),
            Self::Byweekno(p) => p.render_ical(),
            Self::Bymonth(p) => p.render_ical(),
            Self::Bysetpos(p) => p.render_ical(),
            Self::Wkst(p) => p.render_ical(),
        }
    }
}

/// recur = recur-rule-part *( ";" recur-rule-part )
///
/// FREQ is required and must occur exactly once. UNTIL and COUNT are
/// mutually exclusive. INTERVAL defaults to 1 when absent (RFC 5545 §3.3.10)
/// rather than being required.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct Recur {
    pub freq: Option<FreqParam>,
    pub until: Option<UntilParam>,
    pub count: Option<CountParam>,
    pub interval: Option<IntervalParam>,
    pub bysecond: Option<BysecondParam>,
    pub byminute: Option<ByminuteParam>,
    pub byhour: Option<ByhourParam>,
    pub byday: Option<BydayParam>,
    pub bymonthday: Option<BymonthdayParam>,
    pub byyearday: Option<ByyeardayParam>,
    pub byweekno: Option<ByweeknoParam>,
    pub bymonth: Option<BymonthParam>,
    pub bysetpos: Option<BysetposParam>,
    pub wkst: Option<WkstParam>,
}

impl ICalendarEntity for Recur {
    fn parse_ical(input: ParserInput) -> ParserResult<Self> {
        context(
            "RECUR",
            map_res(separated_list1(semicolon, RecurRulePart::parse_ical), |parts| {
                let mut recur = Recur::default();

                for part in parts {
                    recur.insert(part);
                }

                recur.validate().map_err(|error| ParserError::new(error, input))?;
                Ok(recur)
            }),
        )(input)
    }

    fn render_ical(&self) -> String {
        fn push<T: ICalendarEntity>(property: &Option<T>, parts: &mut Vec<String>) {
            if let Some(property) = property {
                parts.push(property.render_ical());
            }
        }

        let mut parts: Vec<String> = Vec::new();

        push(&self.freq, &mut parts);
        push(&self.until, &mut parts);
        push(&self.count, &mut parts);
        push(&self.interval, &mut parts);
        push(&self.bysecond, &mut parts);
        push(&self.byminute, &mut parts);
        push(&self.byhour, &mut parts);
        push(&self.byday, &mut parts);
        push(&self.bymonthday, &mut parts);
        push(&self.byyearday, &mut parts);
        push(&self.byweekno, &mut parts);
        push(&self.bymonth, &mut parts);
        push(&self.bysetpos, &mut parts);
        push(&self.wkst, &mut parts);

        parts.join(";")
    }

    fn validate(&self) -> Result<(), String> {
        if self.freq.is_none() {
            return Err(String::from("FREQ required"));
        }

        if self.until.is_some() && self.count.is_some() {
            return Err(String::from("UNTIL and COUNT are mutually exclusive"));
        }

        Ok(())
    }
}

impl Recur {
    fn insert(&mut self, part: RecurRulePart) {
        match part {
            RecurRulePart::Freq(p) => self.freq = Some(p),
            RecurRulePart::Until(p) => self.until = Some(p),
            RecurRulePart::Count(p) => self.count = Some(p),
            RecurRulePart::Interval(p) => self.interval = Some(p),
            RecurRulePart::Bysecond(p) => self.bysecond = Some(p),
            RecurRulePart::Byminute(p) => self.byminute = Some(p),
            RecurRulePart::Byhour(p) => self.byhour = Some(p),
            RecurRulePart::Byday(p) => self.byday = Some(p),
            RecurRulePart::Bymonthday(p) => self.bymonthday = Some(p),
            RecurRulePart::Byyearday(p) => self.byyearday = Some(p),
            RecurRulePart::Byweekno(p) => self.byweekno = Some(p),
            RecurRulePart::Bymonth(p) => self.bymonth = Some(p),
            RecurRulePart::Bysetpos(p) => self.bysetpos = Some(p),
            RecurRulePart::Wkst(p) => self.wkst = Some(p),
        }
    }
}

impl_icalendar_entity_traits!(Recur);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::assert_parser_output;

    #[test]
    fn parse_ical_daily_with_count() {
        assert_parser_output!(
            Recur::parse_ical("FREQ=DAILY;COUNT=5".into()),
            (
                "",
                Recur {
                    freq: Some(FreqParam(Frequency::Daily)),
                    count: Some(CountParam(Integer(5))),
                    ..Recur::default()
                },
            ),
        );
    }

    #[test]
    fn parse_ical_requires_freq() {
        assert!(Recur::parse_ical("COUNT=5".into()).is_err());
    }

    #[test]
    fn parse_ical_rejects_until_and_count_together() {
        assert!(Recur::parse_ical("FREQ=DAILY;UNTIL=20250101;COUNT=5".into()).is_err());
    }

    #[test]
    fn render_ical_round_trips_byday() {
        let recur = Recur {
            freq: Some(FreqParam(Frequency::Monthly)),
            byday: Some(BydayParam(List(vec![WeekDayNum(Some(Integer(-1)), WeekDay::Friday)]))),
            ..Recur::default()
        };

        assert_eq!(recur.render_ical(), "FREQ=MONTHLY;BYDAY=-1FR");
    }
}
