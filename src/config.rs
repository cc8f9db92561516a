// Run options and the validated plan built from them

use crate::layout::{FieldLayout, LayoutError};
use crate::record::{self, Printer, RunSummary};
use crate::template::{Template, TemplateError, TemplateSpec};
use std::io::{Read, Write};
use thiserror::Error;

/// Layout used when none is given: 16 unsigned bytes per record
pub const DEFAULT_LAYOUT: &str = "C16";

/// Configuration errors, all detected before any input is read
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("Binary spec has {binary} fields, print fmt has {print} fields. Not match.")]
    FieldCountMismatch { binary: usize, print: usize },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// User-facing options for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Binary layout specifier, e.g. `C16` or `sL2c`
    pub layout: String,

    /// printf-style template; `None` (or empty) derives `%02x` per field
    pub template: Option<String>,

    /// Prefix each line with the record count
    pub show_index: bool,

    /// Prefix each line with the byte offset
    pub show_offset: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            layout: DEFAULT_LAYOUT.to_string(),
            template: None,
            show_index: false,
            show_offset: false,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = layout.into();
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn with_index(mut self, show: bool) -> Self {
        self.show_index = show;
        self
    }

    pub fn with_offset(mut self, show: bool) -> Self {
        self.show_offset = show;
        self
    }

    /// Compile the layout and template and check that they agree
    pub fn prepare(&self) -> Result<Plan> {
        let layout = FieldLayout::compile(&self.layout)?;

        let spec = match self.template.as_deref().filter(|t| !t.is_empty()) {
            Some(template) => TemplateSpec::expand(template),
            None => TemplateSpec::default_for(layout.len()),
        };
        let template = spec.compile()?;

        if spec.directive_count() != layout.len() {
            return Err(ConfigError::FieldCountMismatch {
                binary: layout.len(),
                print: spec.directive_count(),
            });
        }

        Ok(Plan {
            layout,
            spec,
            template,
            show_index: self.show_index,
            show_offset: self.show_offset,
        })
    }
}

/// A validated layout/template pair, ready to process input
#[derive(Debug, Clone)]
pub struct Plan {
    layout: FieldLayout,
    spec: TemplateSpec,
    template: Template,
    show_index: bool,
    show_offset: bool,
}

impl Plan {
    pub fn layout(&self) -> &FieldLayout {
        &self.layout
    }

    pub fn template_spec(&self) -> &TemplateSpec {
        &self.spec
    }

    /// Decode and print every record of `input` to `output`
    pub fn run<R: Read, W: Write>(&self, input: R, output: W) -> record::Result<RunSummary> {
        let mut printer = Printer::new(output)
            .with_offset(self.show_offset)
            .with_index(self.show_index);
        record::run(input, &self.layout, &self.template, &mut printer)
    }
}
