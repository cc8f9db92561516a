// Repeat shorthand for print templates
//
// "%02x,3#" expands to "%02x,%02x,%02x": a conversion, an optional separator
// (default one space), a repeat count and a closing '#'.

use super::printf::{next_token, tokens, Template, Token};
use crate::layout::MAX_FIELDS;
use nom::{
    bytes::complete::take_while,
    character::complete::{char, digit1},
    combinator::map_res,
    IResult, Parser,
};

/// Conversion emitted once per field when no template is given
pub const DEFAULT_CONVERSION: &str = "%02x";

const DEFAULT_SEPARATOR: &str = " ";

/// Upper bound on the size of an expanded template in bytes
const MAX_EXPANDED_LEN: usize = 64 * MAX_FIELDS;

/// A fully expanded template and its number of live conversion directives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSpec {
    text: String,
    directive_count: usize,
}

impl TemplateSpec {
    /// Expand repeat shorthand in `template`
    pub fn expand(template: &str) -> Self {
        let text = expand_repeats(template);
        let directive_count = count_directives(&text);
        tracing::debug!(
            "Expanded print format {:?} into {:?} ({} directives)",
            template,
            text,
            directive_count
        );
        Self {
            text,
            directive_count,
        }
    }

    /// The default template for a layout with `field_count` fields
    pub fn default_for(field_count: usize) -> Self {
        Self::expand(&default_template(field_count))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn directive_count(&self) -> usize {
        self.directive_count
    }

    /// Compile the expanded text for rendering
    pub fn compile(&self) -> super::Result<Template> {
        Template::compile(&self.text)
    }
}

/// Expand repeat shorthand in `template`
pub fn expand(template: &str) -> TemplateSpec {
    TemplateSpec::expand(template)
}

/// `%02x` once per field, space separated
pub fn default_template(field_count: usize) -> String {
    repeat_with_separator(DEFAULT_CONVERSION, DEFAULT_SEPARATOR, field_count)
}

/// Number of conversion directives, not counting escaped `%%` sequences
pub fn count_directives(text: &str) -> usize {
    tokens(text)
        .filter(|(token, _)| matches!(token, Token::Directive(_)))
        .count()
}

fn repeat_with_separator(conversion: &str, separator: &str, count: usize) -> String {
    vec![conversion; count].join(separator)
}

/// `<separator><digits>#` following a conversion
fn repeat_suffix(input: &str) -> IResult<&str, (&str, usize)> {
    (
        take_while(|c: char| !c.is_ascii_digit() && c != '%'),
        map_res(digit1, str::parse::<usize>),
        char('#'),
    )
        .parse(input)
        .map(|(rest, (separator, count, _))| (rest, (separator, count)))
}

/// Rewrite every `<conversion><separator>?<count>#` into `count` copies.
///
/// Anything that does not match, including a zero count, is copied through
/// unchanged. So is a group that would take the total number of copies past
/// `MAX_FIELDS` or the expanded text past `MAX_EXPANDED_LEN` bytes.
pub fn expand_repeats(template: &str) -> String {
    let mut out = String::with_capacity(template.len());
    let mut input = template;
    let mut copies = 0usize;

    while !input.is_empty() {
        let (token, rest) = next_token(input);
        let source = &input[..input.len() - rest.len()];
        input = rest;

        if let Token::Directive(_) = token {
            if let Ok((after, (separator, count))) = repeat_suffix(rest) {
                let separator = if separator.is_empty() {
                    DEFAULT_SEPARATOR
                } else {
                    separator
                };
                let len = count.saturating_mul(source.len() + separator.len());
                if count > 0
                    && count <= MAX_FIELDS - copies
                    && len <= MAX_EXPANDED_LEN.saturating_sub(out.len())
                {
                    copies += count;
                    out.push_str(&repeat_with_separator(source, separator, count));
                    input = after;
                    continue;
                }
            }
        }
        out.push_str(source);
    }

    out
}
