// Print templates: repeat shorthand expansion and printf-style rendering
pub mod expand;
pub mod printf;

pub use expand::{count_directives, default_template, expand, TemplateSpec};
pub use printf::{Conversion, Flags, Result, Template, TemplateError, Verb, MAX_WIDTH};
