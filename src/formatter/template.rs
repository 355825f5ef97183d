//! Output line templates.
//!
//! Templates use named placeholders in braces, `{{` and `}}` produce literal
//! braces. Placeholders without a known name are left in the line as written.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::{
    arguments::{Arguments, RenderedArgs},
    target::{Raised, Target},
    value::Value,
};

pub const MINIMAL_OUTPUT_FORMAT: &str = "{result}";
pub const SIMPLE_OUTPUT_FORMAT: &str = "{name}({fullargs}) -> {result}";
pub const VERBOSE_OUTPUT_FORMAT: &str = "{name} with arguments ({fullargs}) produced result {result}";
pub const MINIMAL_ERROR_FORMAT: &str = "{errorname}";
pub const SIMPLE_ERROR_FORMAT: &str = "{name}({fullargs}) -> {errorname}";
pub const VERBOSE_ERROR_FORMAT: &str =
    "{name} with arguments ({fullargs}) failed with {errorname}: {errormessage}";

pub const TEST_OUTPUT_RESULT: &str = "Passed: {name}({fullargs}) = {result}";
pub const TEST_OUTPUT_NO_RESULT: &str = "Passed: {name}({fullargs})";
pub const TEST_ERROR_RESULT: &str = "Passed: {name}({fullargs}) raised {errorname}";
pub const TEST_ERROR_NO_RESULT: &str = "Passed: {name}({fullargs})";

pub const WRONG_RESULT_FORMAT: &str = "Failed: {name}({fullargs}) = {result}, expected {expected}";
pub const WRONG_ERROR_FORMAT: &str =
    "Failed: {name}({fullargs}) raised {errorname}, expected {expected}";
pub const UNEXPECTED_RESULT_FORMAT: &str =
    "Failed: {name}({fullargs}) should raise {expected}, but no error was raised";
pub const UNEXPECTED_ERROR_FORMAT: &str =
    "Failed: {name}({fullargs}) raised {errorname}, expected {expected}";

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    // Matches: {{ or }} or {name}
    Regex::new(r"\{\{|\}\}|\{(\w+)\}").expect("placeholder pattern is valid")
});

/// Values for the placeholders of one output line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    pub name: String,
    pub args: RenderedArgs,
    pub result: String,
    pub expected: String,
    pub errorname: String,
    pub errormessage: String,
}

impl Fields {
    pub fn new(target: &Target, arguments: &Arguments) -> Self {
        Self {
            name: target.name().to_string(),
            args: arguments.render(),
            ..Default::default()
        }
    }

    pub fn with_result(self, result: &Value) -> Self {
        Self {
            result: result.to_string(),
            ..self
        }
    }

    /// A raised error fills `errorname` and `errormessage`, its message also
    /// stands in for the result.
    pub fn with_raised(self, raised: &Raised) -> Self {
        Self {
            result: raised.message.clone(),
            errorname: raised.kind.name().to_string(),
            errormessage: raised.message.clone(),
            ..self
        }
    }

    pub fn with_expected(self, expected: impl ToString) -> Self {
        Self {
            expected: expected.to_string(),
            ..self
        }
    }

    pub fn get(&self, placeholder: &str) -> Option<&str> {
        Some(match placeholder {
            "name" => &self.name,
            "args" => &self.args.args,
            "kwargs" => &self.args.kwargs,
            "fullargs" => &self.args.fullargs,
            "result" => &self.result,
            "expected" => &self.expected,
            "errorname" => &self.errorname,
            "errormessage" => &self.errormessage,
            _ => return None,
        })
    }
}

/// Fill the placeholders of `template` from `fields`.
pub fn render(template: &str, fields: &Fields) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| match (&caps[0], caps.get(1)) {
            ("{{", _) => "{".to_string(),
            ("}}", _) => "}".to_string(),
            (whole, Some(name)) => fields.get(name.as_str()).unwrap_or(whole).to_string(),
            (whole, None) => whole.to_string(),
        })
        .into_owned()
}
