//! Byte stream → unfolded, CRLF-normalized text.
//!
//! This is the first of the three tightly coupled parts described by the
//! core: it runs once, ahead of [`crate::parser`], and turns the wire
//! format's folded physical lines back into logical lines. Everything
//! downstream (`grammar::crlf`, `content_line::ContentLine`) assumes a
//! strict `"\r\n"` terminator and no folding whitespace — this module is
//! what makes that assumption true.

use crate::LexError;

/// Strip a leading UTF-8 BOM and any UTF-16 surrogate code points that
/// slipped through mojibake.
fn strip_bom_and_surrogates(input: &str) -> String {
    let without_bom = input.strip_prefix('\u{feff}').unwrap_or(input);

    without_bom
        .chars()
        .filter(|c| !('\u{D800}'..='\u{DFFF}').contains(c))
        .collect()
}

/// Normalize line terminators: accept a bare `LF` as tolerance, but reject a
/// bare `CR` (one not immediately followed by `LF`). Returns text using only
/// `"\r\n"` terminators.
fn normalize_line_endings(input: &str) -> Result<String, LexError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut line = 1u32;
    let mut column = 1usize;

    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                    output.push_str("\r\n");
                    line += 1;
                    column = 1;
                } else {
                    return Err(LexError::BareCarriageReturn { line, column });
                }
            }
            '\n' => {
                output.push_str("\r\n");
                line += 1;
                column = 1;
            }
            _ => {
                output.push(c);
                column += 1;
            }
        }
    }

    Ok(output)
}

/// Undo RFC 5545 §3.1 folding: a CRLF immediately followed by a single SP or
/// HT is a continuation marker, not a line break — drop the CRLF and the
/// single whitespace byte that follows it, joining the two physical lines
/// into one logical line. Folding may occur at arbitrary positions in
/// *octets*, so this operates on the normalized text after line-ending
/// normalization rather than trying to track byte offsets directly; since
/// normalization above only ever widens `\n` to `\r\n`, column positions
/// within a line are unaffected.
fn unfold(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\r' && chars.peek() == Some(&'\n') {
            let mut lookahead = chars.clone();
            lookahead.next(); // consume the peeked '\n'

            match lookahead.peek() {
                Some(&next) if next == ' ' || next == '\t' => {
                    chars.next(); // consume '\n'
                    chars.next(); // consume the folding SP/HT
                }
                _ => {
                    output.push('\r');
                    output.push(chars.next().unwrap()); // consume '\n'
                }
            }
        } else {
            output.push(c);
        }
    }

    output
}

/// Scan each logical line's parameter section — the portion up to the
/// first unquoted colon, where `quoted-string` applies — for a `"` that is
/// never closed before the line ends. The value portion past that colon is
/// free-form TEXT and may contain bare `"` characters, so scanning stops at
/// the first unquoted colon rather than running to the end of the line.
fn check_quoting(input: &str) -> Result<(), LexError> {
    let mut line = 1u32;
    let mut column = 1usize;
    let mut in_param_section = true;
    let mut in_quotes = false;
    let mut quote_start_column = 0usize;

    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\r' if chars.peek() == Some(&'\n') => {
                chars.next();

                if in_quotes {
                    return Err(LexError::UnterminatedQuotedString {
                        line,
                        column: quote_start_column,
                    });
                }

                line += 1;
                column = 1;
                in_param_section = true;
            }
            '"' if in_param_section => {
                if in_quotes {
                    in_quotes = false;
                } else {
                    in_quotes = true;
                    quote_start_column = column;
                }
                column += 1;
            }
            ':' if in_param_section && !in_quotes => {
                in_param_section = false;
                column += 1;
            }
            _ => {
                column += 1;
            }
        }
    }

    if in_quotes {
        return Err(LexError::UnterminatedQuotedString {
            line,
            column: quote_start_column,
        });
    }

    Ok(())
}

/// Runs the full lexical pass: BOM/surrogate stripping, bare-LF tolerance
/// with bare-CR rejection, unfolding, and quoted-parameter-value balance
/// checking. Returns text ready for [`crate::parser::Parser`] — every
/// logical content line terminated by a literal `"\r\n"`.
pub fn tokenize(input: &[u8]) -> Result<String, LexError> {
    let text = std::str::from_utf8(input).map_err(|error| LexError::Malformed {
        line: 1,
        column: error.valid_up_to() + 1,
        reason: format!("input is not valid UTF-8: {error}"),
    })?;

    let text = strip_bom_and_surrogates(text);
    let text = normalize_line_endings(&text)?;
    let text = unfold(&text);

    check_quoting(&text)?;

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unfolds_across_five_physical_lines() {
        // Five physical lines folding into one logical SUMMARY value. Each
        // continuation's single leading SP is the fold marker and is
        // dropped; any further text on the continuation line survives.
        let folded = "SUMMARY:one\r\n two\r\n three\r\n four\r\n five\r\n";
        let unfolded = tokenize(folded.as_bytes()).unwrap();

        assert_eq!(unfolded, "SUMMARY:onetwothreefourfive\r\n");
    }

    #[test]
    fn tolerates_bare_lf() {
        let input = b"BEGIN:VEVENT\nEND:VEVENT\n";
        let result = tokenize(input).unwrap();
        assert_eq!(result, "BEGIN:VEVENT\r\nEND:VEVENT\r\n");
    }

    #[test]
    fn rejects_bare_cr() {
        let input = b"BEGIN:VEVENT\rEND:VEVENT\r\n";
        let error = tokenize(input).unwrap_err();
        assert!(matches!(error, LexError::BareCarriageReturn { .. }));
    }

    #[test]
    fn strips_bom() {
        let mut input = vec![0xEF, 0xBB, 0xBF];
        input.extend_from_slice(b"BEGIN:VEVENT\r\n");
        let result = tokenize(&input).unwrap();
        assert_eq!(result, "BEGIN:VEVENT\r\n");
    }

    #[test]
    fn joins_folded_continuation_exactly_once() {
        let input = b"SUMMARY:Foo\r\n Bar\r\n";
        let result = tokenize(input).unwrap();
        assert_eq!(result, "SUMMARY:FooBar\r\n");
    }

    #[test]
    fn rejects_unterminated_quoted_param_value() {
        let input = b"DTSTART;TZID=\"America/New_York:19970101T100000\r\n";
        let error = tokenize(input).unwrap_err();
        assert!(matches!(error, LexError::UnterminatedQuotedString { .. }));
    }

    #[test]
    fn allows_balanced_quoted_param_value() {
        let input = b"ATTENDEE;CN=\"John Smith\":mailto:jsmith@example.com\r\n";
        let result = tokenize(input).unwrap();
        assert_eq!(
            result,
            "ATTENDEE;CN=\"John Smith\":mailto:jsmith@example.com\r\n"
        );
    }

    #[test]
    fn tolerates_bare_quote_in_value_section() {
        // A literal `"` past the first unquoted colon is ordinary TEXT, not
        // subject to quoted-string balancing.
        let input = b"SUMMARY:He said \"hi\r\n";
        let result = tokenize(input).unwrap();
        assert_eq!(result, "SUMMARY:He said \"hi\r\n");
    }
}
