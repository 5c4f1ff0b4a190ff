//! Tool protocol definitions.
//!
//! Tools are how the agent drives the browser: every page interaction is one
//! named request/response operation.

mod context;
mod definition;
mod result;
mod traits;

pub use context::*;
pub use definition::*;
pub use result::*;
pub use traits::*;
