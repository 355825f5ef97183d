//! Actions a configuration runs against a target.
//!
//! Every action owns one [`Arguments`] container and calls the target with it.
//! What happens with the result depends on the variant:
//! - [`Invoke`] prints the result or the raised error and counts nothing
//! - [`ExpectEqual`] compares the result against an [`Expected`] value
//! - [`ExpectError`] requires the call to raise a given [`Kind`] of error
//!
//! Execution is gated by the runtime: while it is disabled an action does
//! nothing at all, no call, no output and no counting.
//!
//! Implement [`Perform`] to see how a variant turns a call into output.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    arguments::{Arguments, Bindings},
    error::{Error, Result},
    kind::Kind,
    options::Options,
    outcome::Verdict,
    runtime::Runtime,
    target::{CallResult, Raised, Target},
    value::Value,
};

mod invoke;
pub use invoke::*;

mod expect;
pub use expect::*;

mod expect_error;
pub use expect_error::*;

/// How a variant calls the target and reports the result.
pub trait Perform {
    /// Call `target` and render the outcome through `runtime`.
    ///
    /// Returns the verdict for expectation actions, `None` for actions that
    /// only report.
    fn perform(
        &self,
        target: &Target,
        options: &Options,
        runtime: &mut Runtime,
    ) -> Result<Option<Verdict>>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    Invoke(Invoke),
    ExpectEqual(ExpectEqual),
    ExpectError(ExpectError),
}

impl Action {
    pub fn invoke(arguments: Arguments) -> Self {
        Action::Invoke(Invoke::new(arguments))
    }

    pub fn expect(expected: impl Into<Value>, arguments: Arguments) -> Self {
        Action::ExpectEqual(ExpectEqual::new(expected, arguments))
    }

    pub fn expect_any(arguments: Arguments) -> Self {
        Action::ExpectEqual(ExpectEqual::anything(arguments))
    }

    pub fn expect_error(kind: Kind, arguments: Arguments) -> Result<Self> {
        ExpectError::new(kind, arguments).map(Action::ExpectError)
    }

    pub fn arguments(&self) -> &Arguments {
        match self {
            Action::Invoke(action) => &action.arguments,
            Action::ExpectEqual(action) => &action.arguments,
            Action::ExpectError(action) => &action.arguments,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Action::Invoke(_) => "invoke",
            Action::ExpectEqual(_) => "expect_equal",
            Action::ExpectError(_) => "expect_error",
        }
    }

    /// Run this action against `target` unless the runtime is disabled.
    pub fn execute(
        &self,
        target: &Target,
        options: &Options,
        runtime: &mut Runtime,
    ) -> Result<Option<Verdict>> {
        if runtime.is_disabled() {
            return Ok(None);
        }
        debug!(function = target.name(), action = self.label(), "executing action");
        match self {
            Action::Invoke(action) => action.perform(target, options, runtime),
            Action::ExpectEqual(action) => action.perform(target, options, runtime),
            Action::ExpectError(action) => action.perform(target, options, runtime),
        }
    }
}

impl From<Invoke> for Action {
    fn from(action: Invoke) -> Self {
        Action::Invoke(action)
    }
}

impl From<ExpectEqual> for Action {
    fn from(action: ExpectEqual) -> Self {
        Action::ExpectEqual(action)
    }
}

impl From<ExpectError> for Action {
    fn from(action: ExpectError) -> Self {
        Action::ExpectError(action)
    }
}

/// Resolve `arguments` and call `target` with them.
///
/// A deferred argument without binding is raised as a `NameError`, just like
/// an error of the target itself.
pub(crate) fn call(target: &Target, arguments: &Arguments, bindings: &Bindings) -> CallResult {
    match arguments.resolve(bindings) {
        Ok(args) => target.call(args),
        Err(err @ Error::Unbound(_)) => Err(Raised::new(Kind::name_error(), err.to_string())),
        Err(err) => Err(Raised::new(Kind::error(), err.to_string())),
    }
}
