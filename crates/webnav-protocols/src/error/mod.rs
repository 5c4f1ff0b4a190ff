//! Error types for the webnav protocol layer.

mod extension;
mod generation;
mod retrieval;
mod tool;

pub use extension::*;
pub use generation::*;
pub use retrieval::*;
pub use tool::*;
