//! Chrome DevTools Protocol (CDP) engine.
//!
//! Drives a Chrome/Chromium page over the CDP WebSocket and exposes it as an
//! [`Engine`](crate::engine::Engine). Chrome is launched with remote debugging
//! when nothing is listening on the configured port; an already running
//! instance is reused.
//!
//! ```rust,ignore
//! let factory = cdp_engine_factory(BrowserManagerConfig::default());
//! let host = EngineHost::spawn(factory).await?;
//! ```

mod client;
mod engine;
mod error;
mod launcher;
mod protocol;
mod session;

pub use client::CdpClient;
pub use engine::{CdpEngine, cdp_engine_factory};
pub use error::CdpError;
pub use launcher::find_chrome;
pub use protocol::{BrowserVersion, CdpRequest, CdpResponse, PageInfo};
pub use session::PageSession;
