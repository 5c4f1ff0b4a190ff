//! CDP session attached to a single page.

mod core;
mod js;
mod navigation;

pub use self::core::PageSession;
