//! One-call entry points for demonstrating a target.
//!
//! Each function builds a single-action configuration (or loads one), runs it
//! against the target right away and hands the target back, so calls can be
//! stacked:
//!
//! ```
//! use quickdemo::{args, runtime::Runtime, shorthand, target::Target, value::Value};
//!
//! # fn main() -> quickdemo::Result<()> {
//! let mut runtime = Runtime::default().with_output(std::io::sink());
//! let double = Target::new("double", |args| -> quickdemo::target::CallResult {
//!     Ok(Value::from(args.get(0)?.as_int()? * 2))
//! });
//! let double = shorthand::expect(shorthand::run(&double, args![2], &mut runtime)?, 8, args![4], &mut runtime)?;
//! assert_eq!(double.name(), "double");
//! assert_eq!(runtime.counters().passed, 1);
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use crate::{
    action::Action,
    arguments::Arguments,
    demo::{Builder, Configuration},
    error::Result,
    kind::Kind,
    runtime::Runtime,
    target::Target,
    value::Value,
};

/// Call `target` with `arguments` and print the result.
pub fn run<'t>(target: &'t Target, arguments: Arguments, runtime: &mut Runtime) -> Result<&'t Target> {
    from_action(target, Action::invoke(arguments), runtime)
}

/// Expect `target` to return `expected` for `arguments`.
pub fn expect<'t>(
    target: &'t Target,
    expected: impl Into<Value>,
    arguments: Arguments,
    runtime: &mut Runtime,
) -> Result<&'t Target> {
    from_action(target, Action::expect(expected, arguments), runtime)
}

/// Expect `target` to return anything at all for `arguments`.
pub fn expect_any<'t>(target: &'t Target, arguments: Arguments, runtime: &mut Runtime) -> Result<&'t Target> {
    from_action(target, Action::expect_any(arguments), runtime)
}

/// Expect `target` to raise an error of `kind` for `arguments`.
pub fn expect_error<'t>(
    target: &'t Target,
    kind: Kind,
    arguments: Arguments,
    runtime: &mut Runtime,
) -> Result<&'t Target> {
    from_action(target, Action::expect_error(kind, arguments)?, runtime)
}

pub fn from_action<'t>(target: &'t Target, action: Action, runtime: &mut Runtime) -> Result<&'t Target> {
    Builder::new()
        .with_action(action)
        .build()
        .run_on(target, runtime)?;
    Ok(target)
}

pub fn from_config<'t>(
    target: &'t Target,
    configuration: &Configuration,
    runtime: &mut Runtime,
) -> Result<&'t Target> {
    configuration.run_on(target, runtime)?;
    Ok(target)
}

/// Load a stored configuration from `path` and run it against `target`.
///
/// A version mismatch is only logged.
pub fn from_file<'t>(target: &'t Target, path: impl AsRef<Path>, runtime: &mut Runtime) -> Result<&'t Target> {
    let configuration = Configuration::load_from(path)?.into_inner();
    from_config(target, &configuration, runtime)
}
