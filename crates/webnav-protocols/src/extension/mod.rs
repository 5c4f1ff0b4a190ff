//! Extension protocol definitions.
//!
//! An extension bundles a set of tools with the prompts and codeblock
//! handlers the chat runtime needs to drive them.

mod context;
mod manifest;
mod traits;

pub use context::*;
pub use manifest::*;
pub use traits::*;
