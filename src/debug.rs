//! Small helpers for quick debugging output.

use std::{
    fmt::Display,
    io::{self, Write},
    panic::{AssertUnwindSafe, catch_unwind},
};

use crate::target::payload_as_string;

pub const DEFAULT_INDENT_WIDTH: usize = 4;

/// Prints lines indented by the current depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indenter {
    width: usize,
    depth: usize,
}

impl Default for Indenter {
    fn default() -> Self {
        Self::new(DEFAULT_INDENT_WIDTH)
    }
}

impl Indenter {
    pub fn new(width: usize) -> Self {
        Self { width, depth: 0 }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn set_width(&mut self, width: usize) {
        self.width = width;
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn indent(&mut self) {
        self.depth += 1;
    }

    /// Never goes below zero.
    pub fn dedent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn reset(&mut self) {
        self.depth = 0;
    }

    pub fn line(&self, text: impl Display) -> String {
        format!("{:indent$}{text}", "", indent = self.width * self.depth)
    }

    pub fn show(&self, w: &mut impl Write, text: impl Display) -> io::Result<()> {
        writeln!(w, "{}", self.line(text))
    }
}

/// Run `f` and describe how it ended.
///
/// The `Display` text of the returned value or error, or the message of a panic.
pub fn catch<F, T, E>(f: F) -> String
where
    F: FnOnce() -> Result<T, E>,
    T: Display,
    E: Display,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => value.to_string(),
        Ok(Err(err)) => err.to_string(),
        Err(payload) => payload_as_string(payload),
    }
}
