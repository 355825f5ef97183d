use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::{
    action::{Perform, call},
    arguments::Arguments,
    error::Result,
    formatter::template::Fields,
    options::{Options, key},
    outcome::Verdict,
    runtime::Runtime,
    target::Target,
    value::Value,
};

/// The value an [`ExpectEqual`] compares against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expected {
    Literal(Value),
    /// Matches any value, only a raised error fails.
    Anything,
}

impl Expected {
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Expected::Literal(expected) => expected == value,
            Expected::Anything => true,
        }
    }
}

impl From<Value> for Expected {
    fn from(value: Value) -> Self {
        Expected::Literal(value)
    }
}

impl Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Literal(value) => write!(f, "{value}"),
            Expected::Anything => f.write_str("anything"),
        }
    }
}

/// Expect the call to return a value equal to [`ExpectEqual::expected`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectEqual {
    pub expected: Expected,
    pub arguments: Arguments,
}

impl ExpectEqual {
    pub fn new(expected: impl Into<Value>, arguments: Arguments) -> Self {
        Self {
            expected: Expected::Literal(expected.into()),
            arguments,
        }
    }

    pub fn anything(arguments: Arguments) -> Self {
        Self {
            expected: Expected::Anything,
            arguments,
        }
    }
}

impl Perform for ExpectEqual {
    fn perform(
        &self,
        target: &Target,
        options: &Options,
        runtime: &mut Runtime,
    ) -> Result<Option<Verdict>> {
        let result = call(target, &self.arguments, runtime.bindings());
        let fields = Fields::new(target, &self.arguments).with_expected(&self.expected);
        let (template, fields, verdict) = match &result {
            Ok(value) if self.expected.matches(value) => (
                key::EXPECTED_RESULT_FORMAT,
                fields.with_result(value),
                Verdict::Passed,
            ),
            Ok(value) => (
                key::WRONG_RESULT_FORMAT,
                fields.with_result(value),
                Verdict::Failed,
            ),
            Err(raised) => (
                key::UNEXPECTED_ERROR_FORMAT,
                fields.with_raised(raised),
                Verdict::Failed,
            ),
        };
        runtime.emit(options.template(template), &fields)?;
        runtime.record(verdict)?;
        Ok(Some(verdict))
    }
}
