//! RFC 5545 content-line lexer, parser and typed value-type registry.
//!
//! This crate turns a byte stream into a tree of [`Component`](crate::parser::Component)s
//! and [`Property`](crate::property::Property) values, and resolves each
//! property's raw text against the [`registry`] to produce a typed
//! [`Value`](crate::value_types::Value).

pub mod grammar;
pub mod content_line;
pub mod lexer;
pub mod parser;
pub mod property;
pub mod value_types;
pub mod registry;
pub mod error;

pub use error::{LexError, ParseError, ValueError};

/// Span type threaded through every `nom` combinator in this crate so that
/// parse errors carry a line/column back to the caller.
pub type ParserInput<'a> = nom_locate::LocatedSpan<&'a str>;
pub type ParserResult<'a, O> = nom::IResult<ParserInput<'a>, O, ParserError<'a>>;

#[derive(Clone, Debug, PartialEq)]
pub struct ParserError<'a> {
    span: ParserInput<'a>,
    message: Option<String>,
    context: Vec<String>,
}

impl<'a> std::fmt::Display for ParserError<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = self.message.clone().unwrap_or_else(|| String::from("-"));
        let context = self.context.join(" <- ");

        write!(
            f,
            "{}:{}: {message} in {context}",
            self.line(),
            self.column(),
        )
    }
}

impl<'a> ParserError<'a> {
    pub fn new(message: String, span: ParserInput<'a>) -> Self {
        Self {
            span,
            message: Some(message),
            context: Vec::new(),
        }
    }

    pub fn span(&self) -> &ParserInput {
        &self.span
    }

    pub fn line(&self) -> u32 {
        self.span().location_line()
    }

    pub fn column(&self) -> usize {
        self.span().get_utf8_column()
    }
}

impl<'a> nom::error::ParseError<ParserInput<'a>> for ParserError<'a> {
    fn from_error_kind(input: ParserInput<'a>, kind: nom::error::ErrorKind) -> Self {
        Self::new(format!("parse error {:?}", kind), input)
    }

    fn append(_input: ParserInput<'a>, _kind: nom::error::ErrorKind, other: Self) -> Self {
        other
    }

    fn from_char(input: ParserInput<'a>, unexpected: char) -> Self {
        Self::new(format!("unexpected character '{unexpected}'"), input)
    }
}

impl<'a> nom::error::ContextError<ParserInput<'a>> for ParserError<'a> {
    fn add_context(_input: ParserInput, context: &'static str, mut other: Self) -> Self {
        other.context.push(String::from(context));
        other
    }
}

impl<'a, E> nom::error::FromExternalError<ParserInput<'a>, E> for ParserError<'a>
where
    E: ToString,
{
    fn from_external_error(input: ParserInput<'a>, _kind: nom::error::ErrorKind, error: E) -> Self {
        Self::new(error.to_string(), input)
    }
}

/// A type that can be parsed from and rendered back to iCalendar content-line
/// text, dispatched by an explicit, auditable `match` rather than reflection
/// or a runtime type lookup.
pub trait ICalendarEntity {
    fn parse_ical(input: ParserInput) -> ParserResult<Self>
    where
        Self: Sized;

    fn render_ical(&self) -> String;

    /// Semantic validation beyond what the grammar enforces (numeric ranges,
    /// mutually-exclusive fields, …). Grammar-valid input that fails
    /// `validate` is reported as a `ValueError`/`RecurError` at the layer
    /// that calls it, not at parse time.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

impl<T> ICalendarEntity for Option<T>
where
    T: ICalendarEntity,
{
    fn parse_ical(input: ParserInput) -> ParserResult<Self> {
        T::parse_ical(input).map(|(remaining, parsed)| (remaining, Some(parsed)))
    }

    fn render_ical(&self) -> String {
        self.as_ref().map(ICalendarEntity::render_ical).unwrap_or_default()
    }
}

#[macro_export]
macro_rules! impl_icalendar_entity_traits {
    ($entity:ident) => {
        impl std::str::FromStr for $entity {
            type Err = String;

            fn from_str(input: &str) -> Result<Self, Self::Err> {
                let parser_result = nom::combinator::all_consuming(Self::parse_ical)(input.into());

                match parser_result {
                    Ok((_remaining, value)) => Ok(value),
                    Err(error) => match error {
                        nom::Err::Error(error) | nom::Err::Failure(error) => Err(error.to_string()),
                        nom::Err::Incomplete(_) => Err(String::from("incomplete input")),
                    },
                }
            }
        }

        impl std::fmt::Display for $entity {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.render_ical())
            }
        }
    };
}

#[cfg(test)]
pub(crate) mod tests {
    #[macro_export]
    macro_rules! assert_parser_output {
        ($subject:expr, ($remaining:expr, $expected:expr $(,)*) $(,)*) => {
            let result = $subject;

            let Ok((remaining, parsed_value)) = result else {
                panic!("Expected to be Ok, Actual: {:#?}", result);
            };

            pretty_assertions_sorted::assert_eq!(remaining.to_string(), String::from($remaining));
            pretty_assertions_sorted::assert_eq_sorted!(parsed_value, $expected);
        };
    }

    pub(crate) use assert_parser_output;
}
