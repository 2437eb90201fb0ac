//! Run-scoped shared state.

mod identity;
mod store;

pub use identity::RunIdentity;
pub use store::{RunContext, RESERVED_KEYS};
