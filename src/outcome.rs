use std::fmt::Display;

use crate::{arguments::Arguments, target::{CallResult, Target}};

/// Pass and fail tallies of expectation actions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub passed: usize,
    pub failed: usize,
}

impl Counters {
    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

impl Display for Counters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} tests passed, {} tests failed.",
            self.passed, self.failed
        )
    }
}

/// The record a [`Formatter`](crate::formatter::Formatter) receives for each call
/// of a group-oriented run.
#[derive(Debug, Clone, Copy)]
pub struct CallOutcome<'o> {
    pub target: &'o Target,
    pub arguments: &'o Arguments,
    pub return_value: &'o CallResult,
}

/// How an expectation action judged a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Passed,
    Failed,
}

impl Verdict {
    pub fn passed(&self) -> bool {
        matches!(self, Verdict::Passed)
    }

    pub fn failed(&self) -> bool {
        matches!(self, Verdict::Failed)
    }
}
