//! Group-oriented configurations.
//!
//! Instead of a list of actions a [`GroupConfiguration`] holds the targets
//! to call, either directly or by group name through a [`GroupRegistry`],
//! and the argument sets to call them with. Every call is handed to the
//! configured formatter.

mod registry;
pub use registry::*;

mod configuration;
pub use configuration::*;
