// Binary layout specifiers: field types, decoded values and the compiler
pub mod compiler;
pub mod types;

pub use compiler::{compile, parse_runs, FieldLayout, FieldRun, LayoutError, MAX_FIELDS};
pub use types::{DecodedValue, PrimitiveType};
