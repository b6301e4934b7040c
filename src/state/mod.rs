//! Shared state module.
//!
//! Provides the key/value store modules use to communicate with each other.

mod key;
mod store;

pub use key::StateKey;
pub use store::{StateStore, StateValue};
