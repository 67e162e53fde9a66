//! Browser adapter for Pathfinder.
//!
//! Drives a real Chrome/Chromium tab over the Chrome DevTools Protocol and
//! exposes it as a [`DocumentPort`](pathfinder_protocols::DocumentPort).
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐    WebSocket     ┌──────────────────┐
//! │  CdpDocument    │ ◄──────────────► │   Chrome/Edge    │
//! │  (this crate)   │       CDP        │  (user's browser)│
//! └─────────────────┘                  └──────────────────┘
//! ```
//!
//! ## Setup
//!
//! Start Chrome with remote debugging enabled:
//!
//! ```bash
//! # macOS
//! /Applications/Google\ Chrome.app/Contents/MacOS/Google\ Chrome --remote-debugging-port=9222
//!
//! # Linux
//! google-chrome --remote-debugging-port=9222
//! ```
//!
//! Elements are addressed by CSS selector. Every selector is re-resolved in
//! the page on each call, so a handle never points at a stale node.

pub mod cdp;
mod document;

pub use cdp::{CdpClient, CdpError, PageSession};
pub use document::CdpDocument;
