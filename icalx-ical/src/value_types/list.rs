//! Comma-separated list combinator shared by several RECUR rule parts.

use std::ops::Deref;

use nom::combinator::map;
use nom::multi::separated_list0;

use crate::grammar::comma;
use crate::{ICalendarEntity, ParserInput, ParserResult};

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct List<T>(pub Vec<T>)
where
    T: std::fmt::Debug + Clone + ICalendarEntity + Eq + PartialEq;

impl<T> Deref for List<T>
where
    T: std::fmt::Debug + Clone + ICalendarEntity + Eq + PartialEq,
{
    type Target = Vec<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> ICalendarEntity for List<T>
where
    T: std::fmt::Debug + Clone + ICalendarEntity + Eq + PartialEq,
{
    fn parse_ical(input: ParserInput) -> ParserResult<Self>
    where
        Self: Sized,
    {
        map(separated_list0(comma, T::parse_ical), List)(input)
    }

    fn render_ical(&self) -> String {
        self.0.iter().map(ICalendarEntity::render_ical).collect::<Vec<_>>().join(",")
    }
}

impl<T> From<Vec<T>> for List<T>
where
    T: std::fmt::Debug + Clone + ICalendarEntity + Eq + PartialEq,
{
    fn from(value: Vec<T>) -> Self {
        List(value)
    }
}

impl<T> IntoIterator for List<T>
where
    T: std::fmt::Debug + Clone + ICalendarEntity + Eq + PartialEq,
{
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::assert_parser_output;
    use crate::value_types::integer::Integer;

    #[test]
    fn parse_ical_multiple_values() {
        assert_parser_output!(
            List::<Integer>::parse_ical("10,20,30 TESTING".into()),
            (" TESTING", List(vec![Integer(10), Integer(20), Integer(30)])),
        );
    }

    #[test]
    fn render_ical_preserves_order() {
        assert_eq!(List(vec![Integer(30), Integer(10), Integer(20)]).render_ical(), "30,10,20");
    }
}
