// Layout specifier compiler
// Turns a compact specifier such as "sL2c" into a flat list of field types

use super::types::PrimitiveType;
use nom::{
    character::complete::{anychar, digit1},
    combinator::{map_opt, opt},
    IResult, Parser,
};
use std::fmt;
use thiserror::Error;

/// Upper bound on the number of fields a single record may declare
pub const MAX_FIELDS: usize = 1 << 20;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Data specifier '{ch}' not supported (at position {position})")]
    InvalidSpecifier { ch: char, position: usize },

    #[error("Data specifier error: repeat number without previous data specifier (at position {position})")]
    DanglingRepeatCount { position: usize },

    #[error("Repeat count {digits} is too large")]
    RepeatCountOverflow { digits: String },

    #[error("Layout declares {count} fields, the limit is {MAX_FIELDS}")]
    TooManyFields { count: usize },

    #[error("Layout specifier declares no fields")]
    EmptyLayout,
}

pub type Result<T> = std::result::Result<T, LayoutError>;

/// A type code together with its repeat count, e.g. `L2`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRun {
    pub ty: PrimitiveType,
    pub count: usize,
}

fn type_code(input: &str) -> IResult<&str, PrimitiveType> {
    map_opt(anychar, PrimitiveType::from_code).parse(input)
}

fn field_run(input: &str) -> IResult<&str, (PrimitiveType, Option<&str>)> {
    (type_code, opt(digit1)).parse(input)
}

fn parse_count(digits: &str) -> Result<usize> {
    digits
        .parse::<usize>()
        .map_err(|_| LayoutError::RepeatCountOverflow {
            digits: digits.to_string(),
        })
}

/// Parse a specifier into its (type, count) runs without materializing fields.
///
/// A bare letter has an implicit count of one. A digit run binds to the letter
/// right before it, so a digit can only be left over at the very start.
pub fn parse_runs(spec: &str) -> Result<Vec<FieldRun>> {
    let mut runs = Vec::new();
    let mut input = spec;

    while let Some(ch) = input.chars().next() {
        let position = spec.len() - input.len();
        match field_run(input) {
            Ok((rest, (ty, digits))) => {
                let count = match digits {
                    Some(digits) => parse_count(digits)?,
                    None => 1,
                };
                runs.push(FieldRun { ty, count });
                input = rest;
            }
            Err(_) if ch.is_ascii_digit() => {
                return Err(LayoutError::DanglingRepeatCount { position });
            }
            Err(_) => {
                return Err(LayoutError::InvalidSpecifier { ch, position });
            }
        }
    }

    Ok(runs)
}

/// The compiled layout of one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLayout {
    fields: Vec<PrimitiveType>,
    record_size: usize,
}

impl FieldLayout {
    /// Compile a layout specifier
    pub fn compile(spec: &str) -> Result<Self> {
        let runs = parse_runs(spec)?;
        let layout = Self::from_runs(&runs)?;
        tracing::debug!(
            "Compiled layout '{}' into {} fields, {} bytes per record",
            layout,
            layout.len(),
            layout.record_size()
        );
        Ok(layout)
    }

    /// Materialize the flat field list from parsed runs
    pub fn from_runs(runs: &[FieldRun]) -> Result<Self> {
        let count = runs
            .iter()
            .try_fold(0usize, |acc, run| acc.checked_add(run.count))
            .unwrap_or(usize::MAX);
        if count > MAX_FIELDS {
            return Err(LayoutError::TooManyFields { count });
        }
        if count == 0 {
            return Err(LayoutError::EmptyLayout);
        }

        let mut fields = Vec::with_capacity(count);
        let mut record_size = 0;
        for run in runs {
            fields.extend(std::iter::repeat(run.ty).take(run.count));
            record_size += run.ty.width() * run.count;
        }

        Ok(Self {
            fields,
            record_size,
        })
    }

    pub fn fields(&self) -> &[PrimitiveType] {
        &self.fields
    }

    /// Number of fields per record
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Sum of all field widths in bytes
    pub fn record_size(&self) -> usize {
        self.record_size
    }

    /// Collapse consecutive identical fields back into runs
    pub fn runs(&self) -> Vec<FieldRun> {
        let mut runs: Vec<FieldRun> = Vec::new();
        for &ty in &self.fields {
            match runs.last_mut() {
                Some(last) if last.ty == ty => last.count += 1,
                _ => runs.push(FieldRun { ty, count: 1 }),
            }
        }
        runs
    }
}

impl fmt::Display for FieldLayout {
    /// Canonical specifier, e.g. `sL2c`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for run in self.runs() {
            write!(f, "{}", run.ty)?;
            if run.count > 1 {
                write!(f, "{}", run.count)?;
            }
        }
        Ok(())
    }
}

/// Compile a layout specifier into its field layout
pub fn compile(spec: &str) -> Result<FieldLayout> {
    FieldLayout::compile(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use PrimitiveType::*;

    #[test]
    fn test_default_layout() {
        let layout = compile("C16").unwrap();
        assert_eq!(layout.len(), 16);
        assert!(layout.fields().iter().all(|&ty| ty == UInt8));
        assert_eq!(layout.record_size(), 16);
    }

    #[test]
    fn test_mixed_layout() {
        let layout = compile("sL2c").unwrap();
        assert_eq!(layout.fields(), &[Int16, UInt32, UInt32, Int8]);
        assert_eq!(layout.record_size(), 11);
    }

    #[test]
    fn test_signed_and_unsigned_widths() {
        let layout = compile("cCsSlLqQ").unwrap();
        assert_eq!(
            layout.fields(),
            &[Int8, UInt8, Int16, UInt16, Int32, UInt32, Int64, UInt64]
        );
        assert_eq!(layout.record_size(), 2 * (1 + 2 + 4 + 8));
    }

    #[test]
    fn test_trailing_and_multi_digit_counts() {
        let layout = compile("q3").unwrap();
        assert_eq!(layout.fields(), &[Int64, Int64, Int64]);
        assert_eq!(layout.record_size(), 24);

        let layout = compile("S12C").unwrap();
        assert_eq!(layout.len(), 13);
        assert_eq!(layout.record_size(), 12 * 2 + 1);

        // Leading zeros are plain base-10 digits
        assert_eq!(compile("C012").unwrap().len(), 12);
    }

    #[test]
    fn test_size_matches_declared_counts() {
        for spec in ["C", "c2S3", "L10q", "sL2c", "Q4C4s"] {
            let runs = parse_runs(spec).unwrap();
            let layout = FieldLayout::from_runs(&runs).unwrap();
            let declared: usize = runs.iter().map(|r| r.count).sum();
            let size: usize = layout.fields().iter().map(|ty| ty.width()).sum();
            assert_eq!(layout.len(), declared, "{}", spec);
            assert_eq!(layout.record_size(), size, "{}", spec);
        }
    }

    #[test]
    fn test_zero_count_drops_field() {
        let layout = compile("C0s").unwrap();
        assert_eq!(layout.fields(), &[Int16]);
        assert_eq!(compile("C0"), Err(LayoutError::EmptyLayout));
    }

    #[test]
    fn test_dangling_repeat_count() {
        assert_eq!(
            compile("5"),
            Err(LayoutError::DanglingRepeatCount { position: 0 })
        );
        assert_eq!(
            compile("12C"),
            Err(LayoutError::DanglingRepeatCount { position: 0 })
        );
    }

    #[test]
    fn test_invalid_specifier() {
        assert_eq!(
            compile("C2x"),
            Err(LayoutError::InvalidSpecifier { ch: 'x', position: 2 })
        );
        assert_eq!(
            compile("C 2"),
            Err(LayoutError::InvalidSpecifier { ch: ' ', position: 1 })
        );
        assert!(matches!(
            compile("f"),
            Err(LayoutError::InvalidSpecifier { ch: 'f', .. })
        ));
    }

    #[test]
    fn test_empty_and_oversized() {
        assert_eq!(compile(""), Err(LayoutError::EmptyLayout));
        assert!(matches!(
            compile("C99999999999999999999999"),
            Err(LayoutError::RepeatCountOverflow { .. })
        ));
        assert!(matches!(
            compile("C999999999"),
            Err(LayoutError::TooManyFields { .. })
        ));
    }

    #[test]
    fn test_display_canonical_form() {
        assert_eq!(compile("sL2c").unwrap().to_string(), "sL2c");
        assert_eq!(compile("CCCC").unwrap().to_string(), "C4");
        assert_eq!(compile("C2C3s").unwrap().to_string(), "C5s");
    }
}
