//! Arguments for a single invocation of a target.
//!
//! An [`Arguments`] container holds positional and keyword values. Each value is
//! either a literal [`Value`] or a [`Deferred`] expression. Deferred expressions
//! name a binding in a [`Bindings`] environment and are evaluated the first time
//! the container is resolved. From then on the container is frozen and every
//! resolve hands out the memoized values.
//!
//! Bindings are the only thing a deferred expression can reach. Nothing is
//! parsed or executed beyond looking up a name and calling the closure bound to
//! it, so the environment is the trust boundary.

use std::{
    cell::OnceCell,
    collections::HashMap,
    fmt::{self, Display},
    rc::Rc,
};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    error::{Error, Result},
    target::Args,
    value::Value,
};

/// An expression evaluated on first resolve.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Deferred {
    expression: String,
}

impl Deferred {
    pub fn expression(&self) -> &str {
        &self.expression
    }
}

/// Create a deferred value for the binding named by `expression`.
pub fn lazy(expression: impl Into<String>) -> Deferred {
    Deferred {
        expression: expression.into(),
    }
}

impl Display for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lazy({:?})", self.expression)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArgValue {
    Literal(Value),
    Deferred(Deferred),
}

impl Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Literal(value) => write!(f, "{value}"),
            ArgValue::Deferred(deferred) => write!(f, "{deferred}"),
        }
    }
}

impl From<Deferred> for ArgValue {
    fn from(deferred: Deferred) -> Self {
        ArgValue::Deferred(deferred)
    }
}

impl From<Value> for ArgValue {
    fn from(value: Value) -> Self {
        ArgValue::Literal(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for ArgValue {
    fn from(items: Vec<T>) -> Self {
        ArgValue::Literal(items.into())
    }
}

macro_rules! impl_literal_from {
    [$($ty:ty),* $(,)?] => {$(
        impl From<$ty> for ArgValue {
            fn from(value: $ty) -> Self {
                ArgValue::Literal(Value::from(value))
            }
        }
    )*};
}

impl_literal_from![bool, i64, i32, u32, f64, f32, String, &str, ()];

/// The environment deferred expressions are evaluated in.
#[derive(Clone, Default)]
pub struct Bindings(HashMap<String, Rc<dyn Fn() -> Value>>);

impl fmt::Debug for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.keys()).finish()
    }
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn() -> Value + 'static,
    {
        self.0.insert(name.into(), Rc::new(f));
        self
    }

    pub fn with<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn() -> Value + 'static,
    {
        self.bind(name, f);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name.trim())
    }

    pub fn evaluate(&self, deferred: &Deferred) -> Result<Value> {
        let name = deferred.expression.trim();
        let binding = self
            .0
            .get(name)
            .ok_or_else(|| Error::Unbound(name.to_string()))?;
        trace!(expression = name, "evaluating deferred value");
        Ok(binding())
    }

    fn resolve(&self, value: &ArgValue) -> Result<Value> {
        match value {
            ArgValue::Literal(value) => Ok(value.clone()),
            ArgValue::Deferred(deferred) => self.evaluate(deferred),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Resolved {
    positional: Vec<Value>,
    keywords: Vec<(String, Value)>,
}

/// Positional and keyword arguments for one invocation.
///
/// Equality (`==`) compares the stored values, deferred values by their
/// expression. Use [`Arguments::resolved_eq`] to compare what a target would
/// actually receive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Arguments {
    positional: Vec<ArgValue>,
    keywords: Vec<(String, ArgValue)>,
    #[serde(skip)]
    resolved: OnceCell<Resolved>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_positional<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ArgValue>,
    {
        values.into_iter().fold(Self::new(), Self::arg)
    }

    /// Append a positional argument.
    pub fn arg(mut self, value: impl Into<ArgValue>) -> Self {
        self.positional.push(value.into());
        self.resolved = OnceCell::new();
        self
    }

    /// Set a keyword argument, replacing an earlier value for the same name.
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.keywords.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => *slot = value,
            None => self.keywords.push((name, value)),
        }
        self.resolved = OnceCell::new();
        self
    }

    pub fn len(&self) -> usize {
        self.positional.len() + self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }

    pub fn has_deferred(&self) -> bool {
        self.positional
            .iter()
            .chain(self.keywords.iter().map(|(_, value)| value))
            .any(|value| matches!(value, ArgValue::Deferred(_)))
    }

    /// Evaluate every deferred value once and freeze the container.
    ///
    /// Later calls return the memoized values without touching `bindings`.
    /// A failed resolve leaves the container unresolved.
    pub fn resolve(&self, bindings: &Bindings) -> Result<Args<'_>> {
        let resolved = match self.resolved.get() {
            Some(resolved) => resolved,
            None => {
                let positional = self
                    .positional
                    .iter()
                    .map(|value| bindings.resolve(value))
                    .collect::<Result<_>>()?;
                let keywords = self
                    .keywords
                    .iter()
                    .map(|(key, value)| Ok((key.clone(), bindings.resolve(value)?)))
                    .collect::<Result<_>>()?;
                self.resolved.get_or_init(|| Resolved {
                    positional,
                    keywords,
                })
            }
        };
        Ok(Args::new(&resolved.positional, &resolved.keywords))
    }

    /// Compare the resolved values of two containers, resolving both if needed.
    pub fn resolved_eq(&self, other: &Arguments, bindings: &Bindings) -> Result<bool> {
        let (this, other) = (self.resolve(bindings)?, other.resolve(bindings)?);
        Ok(this.positional() == other.positional() && this.keywords() == other.keywords())
    }

    /// Render the argument texts used by output templates.
    ///
    /// Resolved values are preferred, unresolved deferred values show their
    /// expression.
    pub fn render(&self) -> RenderedArgs {
        match self.resolved.get() {
            Some(resolved) => RenderedArgs::new(
                resolved.positional.iter(),
                resolved.keywords.iter().map(|(k, v)| (k, v)),
            ),
            None => RenderedArgs::new(
                self.positional.iter(),
                self.keywords.iter().map(|(k, v)| (k, v)),
            ),
        }
    }
}

impl PartialEq for Arguments {
    fn eq(&self, other: &Self) -> bool {
        self.positional == other.positional && self.keywords == other.keywords
    }
}

impl Display for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Arguments({})", self.render().fullargs)
    }
}

/// Argument texts for the `args`, `kwargs` and `fullargs` placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedArgs {
    pub args: String,
    pub kwargs: String,
    pub fullargs: String,
}

impl RenderedArgs {
    fn new<'a, P, K, V>(positional: P, keywords: K) -> Self
    where
        P: Iterator<Item = &'a V>,
        K: Iterator<Item = (&'a String, &'a V)>,
        V: Display + 'a,
    {
        let args: Vec<String> = positional.map(ToString::to_string).collect();
        let kwargs: Vec<String> = keywords.map(|(k, v)| format!("{k}={v}")).collect();
        let fullargs = args.iter().chain(kwargs.iter()).cloned().collect::<Vec<_>>();
        Self {
            args: args.join(", "),
            kwargs: kwargs.join(", "),
            fullargs: fullargs.join(", "),
        }
    }
}

/// Build an [`Arguments`] container.
///
/// Positional values come first, keyword values follow after a `;`:
/// `args![1, vec![2, 3]; step = 4]`.
#[macro_export]
macro_rules! args {
    ($($value:expr),* $(,)?) => {
        $crate::arguments::Arguments::new()$(.arg($value))*
    };
    ($($value:expr),* ; $($key:ident = $kw:expr),* $(,)?) => {
        $crate::arguments::Arguments::new()
            $(.arg($value))*
            $(.kwarg(stringify!($key), $kw))*
    };
}
