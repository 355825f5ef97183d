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
};

/// Call the target and print what it returned or raised.
///
/// `Value::None` results are only printed with the `output_none` option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoke {
    pub arguments: Arguments,
}

impl Invoke {
    pub fn new(arguments: Arguments) -> Self {
        Self { arguments }
    }
}

impl Perform for Invoke {
    fn perform(
        &self,
        target: &Target,
        options: &Options,
        runtime: &mut Runtime,
    ) -> Result<Option<Verdict>> {
        let result = call(target, &self.arguments, runtime.bindings());
        let fields = Fields::new(target, &self.arguments);
        match &result {
            Ok(value) if !value.is_none() || options.output_none() => runtime.emit(
                options.template(key::OUTPUT_FORMAT),
                &fields.with_result(value),
            )?,
            Ok(_) => {}
            Err(raised) => runtime.emit(
                options.template(key::ERROR_FORMAT),
                &fields.with_raised(raised),
            )?,
        }
        Ok(None)
    }
}
