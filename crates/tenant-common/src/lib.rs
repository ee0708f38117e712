//! Tenon Common - Shared primitives for the tenant configuration engine
//!
//! This crate provides:
//! - The engine-wide error taxonomy
//! - Epoch-millisecond timestamps and URL cache-busting
//! - The three host capabilities the core consumes, expressed as injected
//!   traits: HTTP transport, session-scoped key/value storage, and a
//!   DOM-like surface (body class list + stylesheet link slot)
//!
//! The core never touches a real browser, network stack, or storage API
//! directly; hosts hand it implementations of these traits. In-memory
//! implementations live here too, used by tests and headless hosts.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dom;
pub mod error;
pub mod http;
pub mod kv;
pub mod time;

pub use dom::{DomError, DomSurface, HeadlessDom};
pub use error::{TenantError, TenantResult};
pub use http::{StaticTransport, Transport, TransportError};
pub use kv::{MemorySessionStore, SessionStore, StorageError};
pub use time::{cache_bust, epoch_ms};
