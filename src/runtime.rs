//! The runtime context actions execute in.
//!
//! A [`Runtime`] carries everything that is process wide in spirit: the
//! toggles that disable execution, silence output or turn a failed test into
//! an exit, the pass/fail [`Counters`], the [`Bindings`] deferred arguments
//! are evaluated in, and the writer output lines go to.

use std::{
    env,
    fmt::Debug,
    io::{self, Write},
};

use tracing::{info, warn};

use crate::{
    arguments::Bindings,
    error::{Error, Result},
    formatter::{
        Formatter, FormatterRef, Formatters,
        template::{self, Fields},
    },
    outcome::{CallOutcome, Counters, Verdict},
};

pub const DISABLE_VAR: &str = "QUICKDEMO_DISABLE";
pub const DISABLE_OUTPUT_VAR: &str = "QUICKDEMO_DISABLE_OUTPUT";
pub const EXIT_ON_TEST_FAILURE_VAR: &str = "QUICKDEMO_EXIT_ON_TEST_FAILURE";

const TRUTHY_VALUES: [&str; 4] = ["y", "yes", "on", "1"];

/// Status handed to the exit handler when a failed test escalates.
pub const FAILURE_EXIT_CODE: i32 = 1;

/// The three runtime toggles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Settings {
    /// Skip every action entirely.
    pub disable: bool,
    /// Keep executing and counting, but print nothing.
    pub disable_output: bool,
    /// Exit as soon as an expectation fails.
    pub exit_on_test_failure: bool,
}

impl Settings {
    /// Read the toggles from the `QUICKDEMO_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read the toggles through `lookup`, a variable is on if its value is
    /// one of `y`, `yes`, `on` or `1` in any case.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |name: &str| {
            lookup(name)
                .map(|value| TRUTHY_VALUES.contains(&value.trim().to_lowercase().as_str()))
                .unwrap_or(false)
        };
        Self {
            disable: flag(DISABLE_VAR),
            disable_output: flag(DISABLE_OUTPUT_VAR),
            exit_on_test_failure: flag(EXIT_ON_TEST_FAILURE_VAR),
        }
    }
}

type ExitHandler = Box<dyn FnMut(i32)>;

fn exit_process(code: i32) {
    std::process::exit(code)
}

pub struct Runtime {
    settings: Settings,
    counters: Counters,
    bindings: Bindings,
    formatters: Formatters,
    output: Box<dyn Write>,
    exit: ExitHandler,
}

impl Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("settings", &self.settings)
            .field("counters", &self.counters)
            .field("bindings", &self.bindings)
            .field("formatters", &self.formatters)
            .finish_non_exhaustive()
    }
}

impl Default for Runtime {
    /// A runtime with all toggles off, writing to stderr.
    fn default() -> Self {
        Self::with_settings(Settings::default())
    }
}

impl Runtime {
    /// A runtime configured from the environment, writing to stderr.
    pub fn from_env() -> Self {
        Self::with_settings(Settings::from_env())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings,
            counters: Counters::default(),
            bindings: Bindings::default(),
            formatters: Formatters::default(),
            output: Box::new(io::stderr()),
            exit: Box::new(exit_process),
        }
    }

    pub fn with_output<W: Write + 'static>(self, output: W) -> Self {
        Self {
            output: Box::new(output),
            ..self
        }
    }

    pub fn with_bindings(self, bindings: Bindings) -> Self {
        Self { bindings, ..self }
    }

    /// Make `formatter` available to group configurations as [`FormatterRef::Named`].
    pub fn with_formatter(
        mut self,
        name: impl Into<String>,
        formatter: impl Formatter + 'static,
    ) -> Self {
        self.formatters.register(name, formatter);
        self
    }

    /// Replace what happens when a failed test escalates to an exit.
    ///
    /// The default handler terminates the process. If the handler returns,
    /// the current run still stops with [`Error::ExitRequested`].
    pub fn with_exit_handler<F: FnMut(i32) + 'static>(self, handler: F) -> Self {
        Self {
            exit: Box::new(handler),
            ..self
        }
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut Bindings {
        &mut self.bindings
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    pub fn disable(&mut self, state: bool) {
        self.settings.disable = state;
    }

    pub fn disable_output(&mut self, state: bool) {
        self.settings.disable_output = state;
    }

    pub fn exit_on_test_failure(&mut self, state: bool) {
        self.settings.exit_on_test_failure = state;
    }

    pub fn is_disabled(&self) -> bool {
        self.settings.disable
    }

    pub fn is_output_disabled(&self) -> bool {
        self.settings.disable_output
    }

    pub fn reset_test_summary(&mut self) {
        info!(
            passed = self.counters.passed,
            failed = self.counters.failed,
            "resetting test summary"
        );
        self.counters = Counters::default();
    }

    /// Print `"<passed> tests passed, <failed> tests failed."` unless output is disabled.
    pub fn print_test_summary(&mut self) -> Result<()> {
        if self.settings.disable_output {
            return Ok(());
        }
        writeln!(self.output, "{}", self.counters)?;
        Ok(())
    }

    /// Render one output line unless output is disabled.
    pub(crate) fn emit(&mut self, template: &str, fields: &Fields) -> Result<()> {
        if self.settings.disable_output {
            return Ok(());
        }
        writeln!(self.output, "{}", template::render(template, fields))?;
        Ok(())
    }

    /// Format one call of a group run unless output is disabled.
    pub(crate) fn report(&mut self, formatter: &FormatterRef, outcome: &CallOutcome<'_>) -> Result<()> {
        if self.settings.disable_output {
            return Ok(());
        }
        formatter.format(&self.formatters, outcome, &mut *self.output)?;
        Ok(())
    }

    pub(crate) fn record(&mut self, verdict: Verdict) -> Result<()> {
        match verdict {
            Verdict::Passed => {
                self.counters.passed += 1;
                Ok(())
            }
            Verdict::Failed => self.test_failed(),
        }
    }

    fn test_failed(&mut self) -> Result<()> {
        self.counters.failed += 1;
        if !self.settings.exit_on_test_failure {
            return Ok(());
        }
        warn!(
            failed = self.counters.failed,
            "test failed with exit on test failure active"
        );
        if let Err(err) = self.output.flush() {
            warn!(%err, "could not flush output before exiting");
        }
        (self.exit)(FAILURE_EXIT_CODE);
        Err(Error::ExitRequested {
            code: FAILURE_EXIT_CODE,
        })
    }
}
