//! Browser session manager and navigation controller.

mod manager_core;
mod manager_types;
mod navigation;

pub use manager_core::BrowserManager;
pub use manager_types::{BrowserError, BrowserManagerConfig, LoadedPage, VisitedContent};

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
