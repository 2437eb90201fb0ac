//! Core value types shared across the orchestrator.

mod category;
mod input;
mod result;
mod status;

pub use category::{InputCategory, InvocationMode};
pub use input::InputRef;
pub use result::StageResult;
pub use status::InvocationStatus;
