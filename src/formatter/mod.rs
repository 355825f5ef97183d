//! Rendering of group-oriented runs.
//!
//! A group run hands every call to a [`Formatter`] as a [`CallOutcome`]. The
//! engine never looks at what a formatter writes. Built in are
//! [`FancyPrinter`], [`ResultPrinter`], [`TemplateFormatter`] and the silent
//! [`NoFormatter`]. Custom formatters are registered by name in
//! [`Formatters`] and referenced through [`FormatterRef::Named`], so a stored
//! configuration only ever contains the reference.

use std::{borrow::Cow, collections::HashMap, fmt::Debug, io, rc::Rc};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::outcome::CallOutcome;

pub mod template;

mod no;
pub use no::*;

pub trait Formatter {
    fn format(&self, outcome: &CallOutcome<'_>, w: &mut dyn io::Write) -> io::Result<()>;
}

impl<F> Formatter for F
where
    F: Fn(&CallOutcome<'_>, &mut dyn io::Write) -> io::Result<()>,
{
    fn format(&self, outcome: &CallOutcome<'_>, w: &mut dyn io::Write) -> io::Result<()> {
        self(outcome, w)
    }
}

fn return_text(outcome: &CallOutcome<'_>) -> String {
    match outcome.return_value {
        Ok(value) => value.to_string(),
        Err(raised) => raised.to_string(),
    }
}

/// Prints `name(args) -> value`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FancyPrinter;

impl Formatter for FancyPrinter {
    fn format(&self, outcome: &CallOutcome<'_>, w: &mut dyn io::Write) -> io::Result<()> {
        writeln!(
            w,
            "{}({}) -> {}",
            outcome.target.name(),
            outcome.arguments.render().fullargs,
            return_text(outcome)
        )
    }
}

/// Prints only the returned value.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResultPrinter;

impl Formatter for ResultPrinter {
    fn format(&self, outcome: &CallOutcome<'_>, w: &mut dyn io::Write) -> io::Result<()> {
        writeln!(w, "{}", return_text(outcome))
    }
}

/// Renders one template line per call.
///
/// Results fill `{result}`, raised errors fill `{errorname}` and
/// `{errormessage}` as well.
#[derive(Debug, Clone)]
pub struct TemplateFormatter<'t>(pub Cow<'t, str>);

impl<'t> TemplateFormatter<'t> {
    pub fn new(template: impl Into<Cow<'t, str>>) -> Self {
        Self(template.into())
    }
}

impl Formatter for TemplateFormatter<'_> {
    fn format(&self, outcome: &CallOutcome<'_>, w: &mut dyn io::Write) -> io::Result<()> {
        let fields = template::Fields::new(outcome.target, outcome.arguments);
        let fields = match outcome.return_value {
            Ok(value) => fields.with_result(value),
            Err(raised) => fields.with_raised(raised),
        };
        writeln!(w, "{}", template::render(&self.0, &fields))
    }
}

/// Custom formatters by name.
#[derive(Clone, Default)]
pub struct Formatters(HashMap<String, Rc<dyn Formatter>>);

impl Debug for Formatters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.0.keys()).finish()
    }
}

impl Formatters {
    pub fn register(&mut self, name: impl Into<String>, formatter: impl Formatter + 'static) {
        self.0.insert(name.into(), Rc::new(formatter));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Formatter> {
        self.0.get(name).map(|formatter| &**formatter)
    }
}

/// The formatter a group configuration renders its calls with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatterRef {
    #[default]
    Fancy,
    Result,
    Silent,
    Template(String),
    Named(String),
}

impl FormatterRef {
    /// Format `outcome` with the referenced formatter.
    ///
    /// A name missing from `formatters` falls back to [`FancyPrinter`].
    pub fn format(
        &self,
        formatters: &Formatters,
        outcome: &CallOutcome<'_>,
        w: &mut dyn io::Write,
    ) -> io::Result<()> {
        match self {
            FormatterRef::Fancy => FancyPrinter.format(outcome, w),
            FormatterRef::Result => ResultPrinter.format(outcome, w),
            FormatterRef::Silent => NoFormatter.format(outcome, w),
            FormatterRef::Template(template) => TemplateFormatter::new(template.as_str()).format(outcome, w),
            FormatterRef::Named(name) => match formatters.get(name) {
                Some(formatter) => formatter.format(outcome, w),
                None => {
                    warn!(formatter = name.as_str(), "unknown formatter, using the fancy printer");
                    FancyPrinter.format(outcome, w)
                }
            },
        }
    }
}
