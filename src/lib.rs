// BPRINT-RS: decode fixed-width binary records and print them through
// printf-style templates
// Copyright 2024 - Licensed under GPLv3

pub mod config;
pub mod layout;
pub mod record;
pub mod template;

// Re-export commonly used types
pub use config::{ConfigError, Options, Plan, DEFAULT_LAYOUT};
pub use layout::{compile, DecodedValue, FieldLayout, LayoutError, PrimitiveType};
pub use record::{RecordError, RunSummary, StreamPosition, Termination};
pub use template::{expand, Template, TemplateError, TemplateSpec};

/// BPRINT version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
