//! Common types used across webnav.

mod common;
mod history;

pub use common::*;
pub use history::*;
