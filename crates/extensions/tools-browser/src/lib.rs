//! Web navigator for webnav agents.
//!
//! Drives one live browser page and exposes it to an agent as a set of
//! page-interaction tools, plus the bookkeeping that keeps fetched pages from
//! flooding the conversation.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  invoke  ┌────────────────┐  FIFO  ┌──────────────────┐  CDP  ┌────────┐
//! │ ToolCatalog  │ ───────► │ BrowserManager │ ─────► │ EngineHost thread│ ────► │ Chrome │
//! └──────────────┘          │ (ScriptBridge) │        │   (CdpEngine)    │       └────────┘
//!                           └────────────────┘        └──────────────────┘
//! ```
//!
//! The engine is single-threaded and lives on its own thread. Every navigation
//! and script goes through the [`bridge::ScriptBridge`], which serializes calls
//! and enforces a per-call timeout whether or not the engine ever answers.
//!
//! ## Lazy start
//!
//! Chrome is not touched when the extension initializes. The first navigation
//! or tool call starts the session.
//!
//! ## Tools
//!
//! `navigate`, `click`, `fillInput`, `submitForm`, `scrollPage`, `getPageText`,
//! `getPageLinks`, `getPageHeadings`, `getPageOutline`,
//! `getInteractiveElements`, `getMainContent`, `searchPageText`, `getTables`,
//! `getImages`, `getPageInfo`, `executeCustomScript`.

pub mod bridge;
pub mod cdp;
pub mod content;
pub mod context;
pub mod engine;
mod extension;
pub mod manager;
pub mod scripts;
pub mod session;
pub mod tools;

#[cfg(test)]
mod test_support;

pub use bridge::{ScriptBridge, ScriptError};
pub use content::{CleanedPage, cleanse};
pub use context::{PageContextManager, RetentionPolicy, VisitedPage, VisitedPages};
pub use engine::{Engine, EngineError, EngineFactory, EngineHost, LoadSignal, LoadingState};
pub use extension::{EXTENSION_ID, OPEN_BROWSER_LANG, OPEN_LINK_LANG, WebNavigatorExtension};
pub use manager::{BrowserError, BrowserManager, BrowserManagerConfig, VisitedContent};
pub use session::BrowserSession;
pub use tools::{ToolCatalog, ToolInvocation, browser_tools, register_browser_tools};
