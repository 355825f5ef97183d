//! Options of a configuration.
//!
//! Options are plain name/value pairs. The engine itself only looks at
//! [`key::OUTPUT_NONE`] and at the template options below, anything else is carried
//! along for formatters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{formatter::template, value::Value};

/// Names of the options the engine reads.
pub mod key {
    pub const OUTPUT_NONE: &str = "output_none";
    pub const OUTPUT_FORMAT: &str = "output_format";
    pub const ERROR_FORMAT: &str = "error_format";
    pub const EXPECTED_RESULT_FORMAT: &str = "expected_result_format";
    pub const EXPECTED_ERROR_FORMAT: &str = "expected_error_format";
    pub const WRONG_RESULT_FORMAT: &str = "wrong_result_format";
    pub const WRONG_ERROR_FORMAT: &str = "wrong_error_format";
    pub const UNEXPECTED_RESULT_FORMAT: &str = "unexpected_result_format";
    pub const UNEXPECTED_ERROR_FORMAT: &str = "unexpected_error_format";

    pub(super) const TEMPLATES: [&str; 8] = [
        OUTPUT_FORMAT,
        ERROR_FORMAT,
        EXPECTED_RESULT_FORMAT,
        EXPECTED_ERROR_FORMAT,
        WRONG_RESULT_FORMAT,
        WRONG_ERROR_FORMAT,
        UNEXPECTED_RESULT_FORMAT,
        UNEXPECTED_ERROR_FORMAT,
    ];
}

/// The template an option name stands for when it is not set.
pub fn default_template(name: &str) -> Option<&'static str> {
    Some(match name {
        key::OUTPUT_FORMAT => template::SIMPLE_OUTPUT_FORMAT,
        key::ERROR_FORMAT => template::SIMPLE_ERROR_FORMAT,
        key::EXPECTED_RESULT_FORMAT => template::TEST_OUTPUT_NO_RESULT,
        key::EXPECTED_ERROR_FORMAT => template::TEST_ERROR_NO_RESULT,
        key::WRONG_RESULT_FORMAT => template::WRONG_RESULT_FORMAT,
        key::WRONG_ERROR_FORMAT => template::WRONG_ERROR_FORMAT,
        key::UNEXPECTED_RESULT_FORMAT => template::UNEXPECTED_RESULT_FORMAT,
        key::UNEXPECTED_ERROR_FORMAT => template::UNEXPECTED_ERROR_FORMAT,
        _ => return None,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Options(BTreeMap<String, Value>);

impl Default for Options {
    /// `output_none` off and every template option at its simple default.
    fn default() -> Self {
        let mut options = Self::empty();
        options.set(key::OUTPUT_NONE, false);
        for name in key::TEMPLATES {
            if let Some(template) = default_template(name) {
                options.set(name, template);
            }
        }
        options
    }
}

impl Options {
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &Value)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Whether `Value::None` results of plain invocations are printed.
    pub fn output_none(&self) -> bool {
        matches!(self.get(key::OUTPUT_NONE), Some(Value::Bool(true)))
    }

    /// The template stored under `name`.
    ///
    /// Missing or non-string values fall back to the default template.
    pub fn template(&self, name: &str) -> &str {
        match self.get(name) {
            Some(Value::Str(template)) => template,
            _ => default_template(name).unwrap_or_default(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Options {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.set(name, value);
        }
    }
}

impl IntoIterator for Options {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
