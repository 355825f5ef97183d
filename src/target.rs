use std::{
    any::Any,
    borrow::Cow,
    cell::Cell,
    fmt::Debug,
    hash::{Hash, Hasher},
    panic::{self, AssertUnwindSafe, catch_unwind},
    sync::{Arc, Once},
};

use thiserror::Error;

use crate::{kind::Kind, value::Value};

/// An error raised by a demonstrated function.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}: {message}")]
pub struct Raised {
    pub kind: Kind,
    pub message: String,
}

impl Raised {
    pub fn new(kind: Kind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// The plain result of calling a target.
pub type CallResult = Result<Value, Raised>;

/// What calling a target produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Returned(pub CallResult);

impl From<Value> for Returned {
    fn from(value: Value) -> Self {
        Self(Ok(value))
    }
}

impl From<()> for Returned {
    fn from(_: ()) -> Self {
        Self(Ok(Value::None))
    }
}

impl From<Raised> for Returned {
    fn from(raised: Raised) -> Self {
        Self(Err(raised))
    }
}

impl From<CallResult> for Returned {
    fn from(result: CallResult) -> Self {
        Self(result)
    }
}

/// Resolved arguments handed to a target function.
#[derive(Debug, Clone, Copy, Default)]
pub struct Args<'a> {
    positional: &'a [Value],
    keywords: &'a [(String, Value)],
}

impl<'a> Args<'a> {
    pub(crate) fn new(positional: &'a [Value], keywords: &'a [(String, Value)]) -> Self {
        Self {
            positional,
            keywords,
        }
    }

    /// The positional argument at `index`.
    ///
    /// A missing argument raises a `TypeError`, like calling a function with
    /// too few arguments would.
    pub fn get(&self, index: usize) -> Result<&'a Value, Raised> {
        self.positional.get(index).ok_or_else(|| {
            Raised::new(
                Kind::type_error(),
                format!("missing required positional argument {index}"),
            )
        })
    }

    pub fn keyword(&self, name: &str) -> Option<&'a Value> {
        self.keywords
            .iter()
            .find_map(|(key, value)| (key == name).then_some(value))
    }

    /// The keyword argument `name`, falling back to the positional argument at `index`.
    pub fn named(&self, name: &str, index: usize) -> Result<&'a Value, Raised> {
        match self.keyword(name) {
            Some(value) => Ok(value),
            None => self.get(index),
        }
    }

    pub fn positional(&self) -> &'a [Value] {
        self.positional
    }

    pub fn keywords(&self) -> &'a [(String, Value)] {
        self.keywords
    }

    pub fn len(&self) -> usize {
        self.positional.len() + self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub trait TargetFn {
    fn call_target(&self, args: Args<'_>) -> Returned;
}

impl<F, T> TargetFn for F
where
    F: Fn(Args<'_>) -> T,
    T: Into<Returned>,
{
    fn call_target(&self, args: Args<'_>) -> Returned {
        (self)(args).into()
    }
}

#[non_exhaustive]
#[derive(Clone)]
pub enum TargetFnHandle {
    Ptr(fn(Args<'_>) -> Returned),
    Shared(Arc<dyn TargetFn>),
    Static(&'static (dyn TargetFn + Sync)),
}

impl Debug for TargetFnHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ptr(ptr) => f.debug_tuple("Ptr").field(ptr).finish(),
            Self::Shared(_) => write!(f, "Shared(...)"),
            Self::Static(_) => write!(f, "Static(...)"),
        }
    }
}

impl TargetFnHandle {
    pub const fn from_const_fn(f: fn(Args<'_>) -> Returned) -> Self {
        Self::Ptr(f)
    }

    pub fn from_shared<F>(f: F) -> Self
    where
        F: TargetFn + 'static,
    {
        Self::Shared(Arc::new(f))
    }

    pub const fn from_static_obj(f: &'static (dyn TargetFn + Sync)) -> Self {
        Self::Static(f)
    }

    pub fn call(&self, args: Args<'_>) -> Returned {
        match self {
            Self::Ptr(f) => f(args),
            Self::Shared(f) => f.call_target(args),
            Self::Static(f) => f.call_target(args),
        }
    }
}

/// A named function that configurations run against.
///
/// Targets are identified by their name: two targets with the same name
/// are the same member of a group.
#[derive(Debug, Clone)]
pub struct Target {
    name: Cow<'static, str>,
    function: TargetFnHandle,
}

impl Target {
    pub const fn from_handle(name: Cow<'static, str>, function: TargetFnHandle) -> Self {
        Self { name, function }
    }

    pub fn new<F, T>(name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: Fn(Args<'_>) -> T + 'static,
        T: Into<Returned>,
    {
        Self {
            name: name.into(),
            function: TargetFnHandle::from_shared(f),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Call the function, turning a panic into a raised [`Kind::panic`].
    pub fn call(&self, args: Args<'_>) -> CallResult {
        let _hook = SilentPanicHookGuard::install();
        catch_unwind(AssertUnwindSafe(|| self.function.call(args)))
            .unwrap_or_else(|payload| {
                Returned(Err(Raised::new(Kind::panic(), payload_as_string(payload))))
            })
            .0
    }
}

impl PartialEq for Target {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Target {}

impl Hash for Target {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// Convert a panic payload into a string.
///
/// This matches the common payload types produced by `panic!` (`&'static str` and `String`).
/// Other payload types are formatted as a generic placeholder.
pub fn payload_as_string(err: Box<dyn Any + Send + 'static>) -> String {
    err.downcast::<&'static str>()
        .map(|s| s.to_string())
        .or_else(|err| err.downcast::<String>().map(|s| *s))
        .unwrap_or_else(|_| String::from("Box<dyn Any>"))
}

thread_local! {
    static IN_TARGET_CALL: Cell<bool> = const { Cell::new(false) };
}

static SILENT_PANIC_HOOK: Once = Once::new();

/// Keeps the panic hook from printing while a target is called on this thread.
///
/// The hook is installed once per process and forwards every panic outside a
/// target call to the hook it replaced. The panic message of a target is
/// reported through the output templates instead.
struct SilentPanicHookGuard {
    was_in_call: bool,
}

impl SilentPanicHookGuard {
    fn install() -> Self {
        SILENT_PANIC_HOOK.call_once(|| {
            let old_hook = panic::take_hook();
            panic::set_hook(Box::new(move |info| {
                if !IN_TARGET_CALL.get() {
                    old_hook(info);
                }
            }));
        });
        Self {
            was_in_call: IN_TARGET_CALL.replace(true),
        }
    }
}

impl Drop for SilentPanicHookGuard {
    fn drop(&mut self) {
        IN_TARGET_CALL.set(self.was_in_call);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_args() -> Args<'static> {
        Args::default()
    }

    #[test]
    fn closures_become_targets() {
        let target = Target::new("answer", |_| Value::from(42));
        assert_eq!(target.name(), "answer");
        assert_eq!(target.call(no_args()), Ok(Value::Int(42)));
    }

    #[test]
    fn const_fn_targets() {
        fn constant(_: Args<'_>) -> Returned {
            Value::from("const").into()
        }

        let target = Target::from_handle("constant".into(), TargetFnHandle::from_const_fn(constant));
        assert_eq!(target.call(no_args()), Ok(Value::from("const")));
    }

    #[test]
    fn panics_are_raised_as_panic_kind() {
        let target = Target::new("boom", |_| -> Returned { panic!("kaboom") });
        let raised = target.call(no_args()).unwrap_err();
        assert_eq!(raised.kind, Kind::panic());
        assert_eq!(raised.message, "kaboom");
    }

    #[test]
    fn nested_calls_keep_the_outer_call_silent() {
        let inner = Target::new("inner", |_| -> Returned { panic!("inner") });
        let outer = Target::new("outer", move |_| -> Returned {
            let raised = inner.call(no_args()).unwrap_err();
            assert!(IN_TARGET_CALL.get());
            panic!("outer after {}", raised.message)
        });

        let raised = outer.call(no_args()).unwrap_err();
        assert_eq!(raised.message, "outer after inner");
        assert!(!IN_TARGET_CALL.get());
    }

    #[test]
    fn missing_arguments_raise_type_errors() {
        let positional = [Value::from(1)];
        let keywords = [("n".to_string(), Value::from(2))];
        let args = Args::new(&positional, &keywords);

        assert_eq!(args.get(0), Ok(&Value::Int(1)));
        assert_eq!(args.named("n", 1), Ok(&Value::Int(2)));
        assert_eq!(args.get(1).unwrap_err().kind, Kind::type_error());
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn targets_are_identified_by_name() {
        let a = Target::new("same", |_| ());
        let b = Target::new("same", |_| Value::from(1));
        assert_eq!(a, b);
    }
}
