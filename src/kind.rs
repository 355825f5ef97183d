//! Kinds of raised errors.
//!
//! A [`Kind`] is a named category together with its ancestry, so kinds form
//! a tree. Every error kind descends from [`Kind::error`]. Kinds rooted
//! elsewhere exist too, but they can never be raised and expecting one is a
//! construction error.

use std::{borrow::Cow, fmt::Display};

use serde::{Deserialize, Serialize};

/// A kind of error, stored as its lineage from the root down to itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Kind {
    lineage: Vec<Cow<'static, str>>,
}

impl Kind {
    pub const ERROR_ROOT: &'static str = "Error";

    /// The root of all error kinds.
    pub fn error() -> Self {
        Self::root(Self::ERROR_ROOT)
    }

    /// A new root category. Unless the name is [`Kind::ERROR_ROOT`] this is
    /// not an error kind.
    pub fn root(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            lineage: vec![name.into()],
        }
    }

    /// A new kind that is a subkind of `self`.
    pub fn derive(&self, name: impl Into<Cow<'static, str>>) -> Self {
        let mut lineage = self.lineage.clone();
        lineage.push(name.into());
        Self { lineage }
    }

    pub fn name(&self) -> &str {
        self.lineage.last().map_or("", |name| &**name)
    }

    pub fn lineage(&self) -> impl ExactSizeIterator<Item = &str> {
        self.lineage.iter().map(|name| &**name)
    }

    pub fn is_error(&self) -> bool {
        self.lineage.first().is_some_and(|root| root == Self::ERROR_ROOT)
    }

    /// Whether `self` is `other` or descends from it.
    pub fn is_subkind_of(&self, other: &Kind) -> bool {
        self.lineage.starts_with(&other.lineage)
    }

    pub fn value_error() -> Self {
        Self::error().derive("ValueError")
    }

    pub fn type_error() -> Self {
        Self::error().derive("TypeError")
    }

    pub fn name_error() -> Self {
        Self::error().derive("NameError")
    }

    pub fn lookup_error() -> Self {
        Self::error().derive("LookupError")
    }

    pub fn index_error() -> Self {
        Self::lookup_error().derive("IndexError")
    }

    pub fn key_error() -> Self {
        Self::lookup_error().derive("KeyError")
    }

    pub fn arithmetic_error() -> Self {
        Self::error().derive("ArithmeticError")
    }

    pub fn zero_division_error() -> Self {
        Self::arithmetic_error().derive("ZeroDivisionError")
    }

    pub fn overflow_error() -> Self {
        Self::arithmetic_error().derive("OverflowError")
    }

    /// The kind assigned to panics caught while calling a target.
    pub fn panic() -> Self {
        Self::error().derive("Panic")
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
