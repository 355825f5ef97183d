//! Action-oriented configurations.
//!
//! A [`Builder`] collects [`Action`]s and [`Options`], [`Builder::build`]
//! freezes them into a [`Configuration`] that can be run against any
//! [`Target`]. Freezing and reopening copy the whole state, so a
//! configuration never changes after it was built.

use std::path::Path;

use tracing::debug;

use crate::{
    action::Action,
    codec::{self, Decoded, Persist},
    error::Result,
    options::Options,
    runtime::Runtime,
    target::Target,
    value::Value,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Builder {
    pub(crate) actions: Vec<Action>,
    pub(crate) options: Options,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an action, actions run in the order they were added.
    pub fn with_action(mut self, action: impl Into<Action>) -> Self {
        self.actions.push(action.into());
        self
    }

    pub fn with_actions<I>(mut self, actions: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Action>,
    {
        self.actions.extend(actions.into_iter().map(Into::into));
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

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Freeze a copy of the current state.
    pub fn build(&self) -> Configuration {
        Configuration {
            actions: self.actions.clone(),
            options: self.options.clone(),
        }
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

/// A frozen list of actions together with the options they render with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Configuration {
    actions: Vec<Action>,
    options: Options,
}

impl Configuration {
    /// Reopen a copy of this configuration for further changes.
    pub fn builder(&self) -> Builder {
        Builder {
            actions: self.actions.clone(),
            options: self.options.clone(),
        }
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Execute every action against `target`.
    ///
    /// Stops at the first error, most notably [`Error::ExitRequested`](crate::Error::ExitRequested).
    pub fn run_on(&self, target: &Target, runtime: &mut Runtime) -> Result<&Self> {
        debug!(
            function = target.name(),
            actions = self.actions.len(),
            "running configuration"
        );
        for action in &self.actions {
            action.execute(target, &self.options, runtime)?;
        }
        Ok(self)
    }

    pub fn run_on_all<'t, I>(&self, targets: I, runtime: &mut Runtime) -> Result<&Self>
    where
        I: IntoIterator<Item = &'t Target>,
    {
        for target in targets {
            self.run_on(target, runtime)?;
        }
        Ok(self)
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

impl From<Builder> for Configuration {
    fn from(builder: Builder) -> Self {
        Self {
            actions: builder.actions,
            options: builder.options,
        }
    }
}

impl Persist for Builder {
    type State = (Vec<Action>, Options);

    fn state(&self) -> Self::State {
        (self.actions.clone(), self.options.clone())
    }

    fn restore((actions, options): Self::State) -> Self {
        Self::new().with_actions(actions).with_options(options)
    }
}

impl Persist for Configuration {
    type State = (Vec<Action>, Options);

    fn state(&self) -> Self::State {
        (self.actions.clone(), self.options.clone())
    }

    fn restore(state: Self::State) -> Self {
        Builder::restore(state).into()
    }
}
