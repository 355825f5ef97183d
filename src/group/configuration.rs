use std::{borrow::Cow, collections::BTreeSet, path::Path};

use tracing::debug;

use crate::{
    action,
    arguments::Arguments,
    codec::{self, Decoded, Persist},
    error::{Error, Result},
    formatter::FormatterRef,
    group::GroupRegistry,
    options::Options,
    outcome::CallOutcome,
    runtime::Runtime,
    target::Target,
    value::Value,
};

#[derive(Debug, Clone, Default)]
pub struct GroupBuilder {
    functions: Vec<Target>,
    groups: BTreeSet<String>,
    arguments: Vec<Arguments>,
    options: Options,
    formatter: FormatterRef,
}

impl GroupBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_function(mut self, target: Target) -> Self {
        self.functions.push(target);
        self
    }

    pub fn with_functions(mut self, targets: impl IntoIterator<Item = Target>) -> Self {
        self.functions.extend(targets);
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.groups.insert(group.into());
        self
    }

    pub fn with_groups<I>(mut self, groups: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.groups.extend(groups.into_iter().map(Into::into));
        self
    }

    /// Add an argument set every target is called with.
    pub fn with_arguments(mut self, arguments: Arguments) -> Self {
        self.arguments.push(arguments);
        self
    }

    pub fn with_argument_sets(mut self, sets: impl IntoIterator<Item = Arguments>) -> Self {
        self.arguments.extend(sets);
        self
    }

    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.set(name, value);
        self
    }

    pub fn with_options<I, K, V>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.options.extend(options);
        self
    }

    pub fn with_formatter(self, formatter: FormatterRef) -> Self {
        Self { formatter, ..self }
    }

    /// Freeze a copy of the current state.
    pub fn build(&self) -> GroupConfiguration {
        GroupConfiguration(self.clone())
    }

    pub fn store(&self) -> Result<Vec<u8>> {
        codec::encode(self)
    }

    pub fn store_to(&self, path: impl AsRef<Path>) -> Result<&Self> {
        codec::store(self, path)?;
        Ok(self)
    }

    pub fn load(bytes: &[u8]) -> Result<Decoded<Self>> {
        codec::decode(bytes)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Decoded<Self>> {
        codec::load(path)
    }
}

/// A frozen set of targets, groups and argument sets.
#[derive(Debug, Clone, Default)]
pub struct GroupConfiguration(GroupBuilder);

impl GroupConfiguration {
    /// Reopen a copy of this configuration for further changes.
    pub fn builder(&self) -> GroupBuilder {
        self.0.clone()
    }

    pub fn functions(&self) -> &[Target] {
        &self.0.functions
    }

    pub fn groups(&self) -> impl ExactSizeIterator<Item = &str> {
        self.0.groups.iter().map(String::as_str)
    }

    pub fn arguments(&self) -> &[Arguments] {
        &self.0.arguments
    }

    pub fn options(&self) -> &Options {
        &self.0.options
    }

    pub fn formatter(&self) -> &FormatterRef {
        &self.0.formatter
    }

    /// The targets a run calls: direct functions first, then the members
    /// of every group. Nothing is deduplicated.
    pub fn targets(&self, registry: &GroupRegistry) -> Vec<Target> {
        let mut targets = self.0.functions.clone();
        targets.extend(registry.resolve(self.groups()));
        targets
    }

    /// Call every target with every argument set and format each call.
    ///
    /// Without argument sets each target is called once without arguments.
    /// Calls returning `Value::None` are only formatted with the `output_none`
    /// option.
    pub fn run(&self, registry: &GroupRegistry, runtime: &mut Runtime) -> Result<&Self> {
        let targets = self.targets(registry);
        if targets.is_empty() {
            return Err(Error::NoTargets);
        }
        if runtime.is_disabled() {
            return Ok(self);
        }

        let argument_sets = match self.0.arguments.is_empty() {
            true => Cow::Owned(vec![Arguments::new()]),
            false => Cow::Borrowed(self.0.arguments.as_slice()),
        };
        for target in &targets {
            for arguments in argument_sets.iter() {
                debug!(function = target.name(), "calling group member");
                let return_value = action::call(target, arguments, runtime.bindings());
                if matches!(return_value, Ok(Value::None)) && !self.0.options.output_none() {
                    continue;
                }
                let outcome = CallOutcome {
                    target,
                    arguments,
                    return_value: &return_value,
                };
                runtime.report(&self.0.formatter, &outcome)?;
            }
        }
        Ok(self)
    }

    pub fn store(&self) -> Result<Vec<u8>> {
        codec::encode(&self.0)
    }

    pub fn store_to(&self, path: impl AsRef<Path>) -> Result<&Self> {
        codec::store(&self.0, path)?;
        Ok(self)
    }

    pub fn load(bytes: &[u8]) -> Result<Decoded<Self>> {
        codec::decode(bytes)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Decoded<Self>> {
        codec::load(path)
    }
}

impl Persist for GroupBuilder {
    type State = (Vec<Arguments>, Options, FormatterRef);

    fn state(&self) -> Self::State {
        (
            self.arguments.clone(),
            self.options.clone(),
            self.formatter.clone(),
        )
    }

    fn restore((arguments, options, formatter): Self::State) -> Self {
        Self::new()
            .with_argument_sets(arguments)
            .with_options(options)
            .with_formatter(formatter)
    }
}

impl Persist for GroupConfiguration {
    type State = <GroupBuilder as Persist>::State;

    fn state(&self) -> Self::State {
        self.0.state()
    }

    fn restore(state: Self::State) -> Self {
        GroupBuilder::restore(state).build()
    }
}
