use std::io;

use crate::{formatter::Formatter, outcome::CallOutcome};

/// A formatter that produces no output.
///
/// Calls still happen and are logged, only the rendering is skipped. Useful
/// when a group run is only wanted for the side effects of its targets.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFormatter;

impl Formatter for NoFormatter {
    fn format(&self, _: &CallOutcome<'_>, _: &mut dyn io::Write) -> io::Result<()> {
        Ok(())
    }
}
