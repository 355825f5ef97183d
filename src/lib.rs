//! Declarative demos and lightweight regression checks for functions.
//!
//! A [`Configuration`](demo::Configuration) is a frozen list of
//! [`Action`](action::Action)s run against a [`Target`](target::Target): plain
//! invocations that print what the target returns, and expectations that
//! compare the result and count passes and failures on the
//! [`Runtime`](runtime::Runtime). Group configurations call whole groups of
//! targets from a [`GroupRegistry`](group::GroupRegistry) instead.
//! Configurations can be stored and loaded again with a versioned format.

pub mod action;
pub mod arguments;
pub mod codec;
pub mod debug;
pub mod demo;
pub mod formatter;
pub mod group;
pub mod kind;
pub mod options;
pub mod outcome;
pub mod runtime;
pub mod shorthand;
pub mod target;
pub mod value;

mod error;
pub use error::*;

#[cfg(test)]
mod test_support;
