// printf-style conversions for decoded integer values
//
// Supported directives: %[flags][width][.precision]verb with flags from "-+ #0"
// and verbs d (decimal), x (hex), o (octal) and c (character). "%%" is a
// literal percent sign.

use crate::layout::DecodedValue;
use nom::{
    bytes::complete::{take_till, take_while},
    character::complete::{char, digit0, digit1},
    combinator::{map_res, opt},
    sequence::preceded,
    IResult, Parser,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Print format conversion '%{verb}' not supported (at position {position})")]
    UnsupportedConversion { verb: char, position: usize },

    #[error("Print format ends with an incomplete conversion (at position {position})")]
    DanglingPercent { position: usize },

    #[error("Print format width or precision {value} exceeds {MAX_WIDTH} (at position {position})")]
    WidthTooLarge { value: usize, position: usize },
}

pub type Result<T> = std::result::Result<T, TemplateError>;

const FLAG_CHARS: &str = "-+ #0";

/// Largest width or precision a directive may ask for
pub const MAX_WIDTH: usize = 1_000_000;

/// Conversion letter of a directive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Decimal,
    Hex,
    Octal,
    Char,
}

impl Verb {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'd' => Some(Verb::Decimal),
            'x' => Some(Verb::Hex),
            'o' => Some(Verb::Octal),
            'c' => Some(Verb::Char),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    pub minus: bool,
    pub plus: bool,
    pub space: bool,
    pub zero: bool,
    pub alternate: bool,
}

impl Flags {
    fn parse(flags: &str) -> Self {
        let mut parsed = Flags::default();
        for c in flags.chars() {
            match c {
                '-' => parsed.minus = true,
                '+' => parsed.plus = true,
                ' ' => parsed.space = true,
                '0' => parsed.zero = true,
                '#' => parsed.alternate = true,
                _ => {}
            }
        }
        parsed
    }
}

/// One parsed conversion directive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conversion {
    pub flags: Flags,
    pub width: Option<usize>,
    pub precision: Option<usize>,
    pub verb: Verb,
}

impl Conversion {
    /// Append the formatted value to `out`
    pub fn render(&self, value: &DecodedValue, out: &mut String) {
        let body = match self.verb {
            Verb::Char => value
                .to_char()
                .unwrap_or(char::REPLACEMENT_CHARACTER)
                .to_string(),
            _ => self.format_integer(value),
        };

        let len = body.chars().count();
        let padding = self.width.map_or(0, |w| w.saturating_sub(len));
        if self.flags.minus {
            out.push_str(&body);
            out.extend(std::iter::repeat(' ').take(padding));
        } else {
            out.extend(std::iter::repeat(' ').take(padding));
            out.push_str(&body);
        }
    }

    fn format_integer(&self, value: &DecodedValue) -> String {
        let magnitude = value.magnitude();
        let mut digits = match self.verb {
            Verb::Hex => format!("{:x}", magnitude),
            Verb::Octal => format!("{:o}", magnitude),
            Verb::Decimal | Verb::Char => magnitude.to_string(),
        };

        if let Some(precision) = self.precision {
            if precision == 0 && magnitude == 0 {
                digits.clear();
            } else if digits.len() < precision {
                digits.insert_str(0, &"0".repeat(precision - digits.len()));
            }
        }

        let sign = if value.is_negative() {
            "-"
        } else if self.flags.plus {
            "+"
        } else if self.flags.space {
            " "
        } else {
            ""
        };

        let prefix = match self.verb {
            Verb::Hex if self.flags.alternate => "0x",
            Verb::Octal if self.flags.alternate && !digits.starts_with('0') => "0",
            _ => "",
        };

        let mut body = String::with_capacity(sign.len() + prefix.len() + digits.len());
        body.push_str(sign);
        body.push_str(prefix);

        // Zero padding goes between the sign/prefix and the digits
        if self.flags.zero && !self.flags.minus && self.precision.is_none() {
            let used = sign.len() + prefix.len() + digits.len();
            if let Some(width) = self.width.filter(|&w| w > used) {
                body.push_str(&"0".repeat(width - used));
            }
        }

        body.push_str(&digits);
        body
    }
}

/// One lexical piece of a template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    /// Text without any `%`
    Literal(&'a str),
    /// An escaped `%%`
    Percent,
    Directive(Conversion),
    /// A `%` that does not start a supported conversion; `None` at end of input
    Invalid(Option<char>),
}

fn literal(input: &str) -> IResult<&str, &str> {
    take_till(|c: char| c == '%').parse(input)
}

fn parse_precision(digits: &str) -> std::result::Result<usize, std::num::ParseIntError> {
    if digits.is_empty() {
        Ok(0)
    } else {
        digits.parse::<usize>()
    }
}

/// Flags, width and precision following a `%`
fn conversion_head(input: &str) -> IResult<&str, (Flags, Option<usize>, Option<usize>)> {
    (
        take_while(|c: char| FLAG_CHARS.contains(c)),
        opt(map_res(digit1, str::parse::<usize>)),
        opt(preceded(char('.'), map_res(digit0, parse_precision))),
    )
        .parse(input)
        .map(|(rest, (flags, width, precision))| (rest, (Flags::parse(flags), width, precision)))
}

/// Split the next token off the front of a non-empty template
pub(crate) fn next_token(input: &str) -> (Token<'_>, &str) {
    let Some(after_percent) = input.strip_prefix('%') else {
        return match literal(input) {
            Ok((rest, text)) => (Token::Literal(text), rest),
            Err(_) => (Token::Literal(input), ""),
        };
    };

    if let Some(rest) = after_percent.strip_prefix('%') {
        return (Token::Percent, rest);
    }

    let Ok((rest, (flags, width, precision))) = conversion_head(after_percent) else {
        return (Token::Invalid(after_percent.chars().next()), after_percent);
    };

    let mut chars = rest.chars();
    match chars.next() {
        Some(c) => match Verb::from_char(c) {
            Some(verb) => (
                Token::Directive(Conversion {
                    flags,
                    width,
                    precision,
                    verb,
                }),
                chars.as_str(),
            ),
            None => (Token::Invalid(Some(c)), after_percent),
        },
        None => (Token::Invalid(None), after_percent),
    }
}

/// Iterate over the tokens of a template together with their source text
pub(crate) fn tokens(template: &str) -> impl Iterator<Item = (Token<'_>, &str)> {
    let mut input = template;
    std::iter::from_fn(move || {
        if input.is_empty() {
            return None;
        }
        let (token, rest) = next_token(input);
        let source = &input[..input.len() - rest.len()];
        input = rest;
        Some((token, source))
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Directive(Conversion),
}

/// A template compiled into literal text and conversion directives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Compile an (already expanded) template, rejecting unsupported conversions
    pub fn compile(text: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut position = 0;

        for (token, source) in tokens(text) {
            match token {
                Token::Literal(s) => literal.push_str(s),
                Token::Percent => literal.push('%'),
                Token::Directive(conversion) => {
                    let value = conversion.width.max(conversion.precision).unwrap_or(0);
                    if value > MAX_WIDTH {
                        return Err(TemplateError::WidthTooLarge { value, position });
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Directive(conversion));
                }
                Token::Invalid(Some(verb)) => {
                    return Err(TemplateError::UnsupportedConversion { verb, position });
                }
                Token::Invalid(None) => {
                    return Err(TemplateError::DanglingPercent { position });
                }
            }
            position += source.len();
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    /// Render values positionally into `out`.
    ///
    /// With fewer values than directives, output stops right before the first
    /// directive that has no value, dropping the literal text leading up to it.
    pub fn render(&self, values: &[DecodedValue], out: &mut String) {
        let mut values = values.iter();
        let mut pending: &str = "";

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => pending = text.as_str(),
                Segment::Directive(conversion) => {
                    let Some(value) = values.next() else {
                        return;
                    };
                    out.push_str(pending);
                    pending = "";
                    conversion.render(value, out);
                }
            }
        }
        out.push_str(pending);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use DecodedValue::*;

    fn render_one(template: &str, value: DecodedValue) -> String {
        let mut out = String::new();
        Template::compile(template).unwrap().render(&[value], &mut out);
        out
    }

    #[test]
    fn test_hex() {
        assert_eq!(render_one("%02x", UInt8(0x0a)), "0a");
        assert_eq!(render_one("%x", UInt32(0xdeadbeef)), "deadbeef");
        assert_eq!(render_one("%#06x", UInt16(0xab)), "0x00ab");
        assert_eq!(render_one("%02x", Int8(-1)), "-1");
    }

    #[test]
    fn test_decimal() {
        assert_eq!(render_one("%d", Int32(-42)), "-42");
        assert_eq!(render_one("%5d", UInt16(42)), "   42");
        assert_eq!(render_one("%-5d|", UInt16(42)), "42   |");
        assert_eq!(render_one("%05d", Int16(-42)), "-0042");
        assert_eq!(render_one("%+d", UInt8(7)), "+7");
        assert_eq!(render_one("% d", UInt8(7)), " 7");
        assert_eq!(render_one("%d", Int64(i64::MIN)), "-9223372036854775808");
        assert_eq!(render_one("%d", UInt64(u64::MAX)), "18446744073709551615");
    }

    #[test]
    fn test_precision() {
        assert_eq!(render_one("%.3d", UInt8(5)), "005");
        assert_eq!(render_one("%6.3d", UInt8(5)), "   005");
        // Zero flag is ignored once a precision is given
        assert_eq!(render_one("%06.3d", UInt8(5)), "   005");
        assert_eq!(render_one("[%.0d]", UInt8(0)), "[]");
        assert_eq!(render_one("[%.d]", UInt8(0)), "[]");
    }

    #[test]
    fn test_octal_and_char() {
        assert_eq!(render_one("%o", UInt8(8)), "10");
        assert_eq!(render_one("%#o", UInt8(8)), "010");
        assert_eq!(render_one("%#o", UInt8(0)), "0");
        assert_eq!(render_one("%c", UInt8(b'A')), "A");
        assert_eq!(render_one("%3c", UInt8(b'z')), "  z");
        assert_eq!(render_one("%c", Int8(-1)), "\u{fffd}");
    }

    #[test]
    fn test_escaped_percent() {
        let template = Template::compile("%d%% done").unwrap();
        let mut out = String::new();
        template.render(&[UInt8(50)], &mut out);
        assert_eq!(out, "50% done");
    }

    #[test]
    fn test_partial_render_stops_before_missing_value() {
        let template = Template::compile("<%02x %02x %02x>").unwrap();
        let mut out = String::new();
        template.render(&[UInt8(5)], &mut out);
        assert_eq!(out, "<05");

        out.clear();
        template.render(&[UInt8(1), UInt8(2), UInt8(3)], &mut out);
        assert_eq!(out, "<01 02 03>");
    }

    #[test]
    fn test_unsupported_conversion() {
        assert_eq!(
            Template::compile("ab %s"),
            Err(TemplateError::UnsupportedConversion {
                verb: 's',
                position: 3
            })
        );
        assert_eq!(
            Template::compile("%d %5f"),
            Err(TemplateError::UnsupportedConversion {
                verb: 'f',
                position: 3
            })
        );
        assert_eq!(
            Template::compile("%d %"),
            Err(TemplateError::DanglingPercent { position: 3 })
        );
    }

    #[test]
    fn test_oversized_width_and_precision() {
        assert_eq!(
            Template::compile("%x %99999999999d"),
            Err(TemplateError::WidthTooLarge {
                value: 99999999999,
                position: 3
            })
        );
        assert_eq!(
            Template::compile("%.1000001d"),
            Err(TemplateError::WidthTooLarge {
                value: 1_000_001,
                position: 0
            })
        );
        assert!(Template::compile("%1000000d").is_ok());
    }

    #[test]
    fn test_tokens() {
        let tokens: Vec<_> = tokens("a%%b%02x").map(|(t, _)| t).collect();
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0], Token::Literal("a"));
        assert_eq!(tokens[1], Token::Percent);
        assert_eq!(tokens[2], Token::Literal("b"));
        assert!(matches!(
            tokens[3],
            Token::Directive(Conversion {
                verb: Verb::Hex,
                width: Some(2),
                ..
            })
        ));
    }
}
