#![forbid(unsafe_code)]

//! HTTP server, session registry and wire protocol of GWU.
//!
//! # Role in GWU
//! `gwu-server` is the outer layer: it owns the session registry (public
//! plus private sessions), routes incoming requests to windows, dispatches
//! decoded events into the component tree under the session write lock,
//! answers partial-render requests under the read lock, and serves the
//! bundled client runtime and CSS themes.
//!
//! # Primary responsibilities
//! - **[`Server`]**: configuration, routing, the accept loop and the
//!   session reaper.
//! - **Protocol**: the event request decoding and response action encoding
//!   (reload / dirty / focus / no-op), and the per-component render path.
//! - **HTTP plumbing**: a small request parser and response writer
//!   ([`HttpRequest`], [`HttpResponse`]); no HTTP framework.
//! - **Telemetry**: optional JSONL event log ([`telemetry::TelemetrySink`]).
//!
//! # Concurrency model
//! Worker threads handle connections in parallel. Requests of one session
//! serialize on that session's read-write lock: event dispatch writes,
//! rendering reads. The reaper thread scans the registry every 10 seconds
//! and removes private sessions whose last access is older than their
//! timeout, notifying removal handlers exactly once.

pub mod assets;
pub mod error;
pub mod http;
mod proto;
pub mod server;
pub mod telemetry;

pub use error::ServerError;
pub use http::{HttpRequest, HttpResponse};
pub use server::{AppRootHandlerFunc, Server, SessionHandler};
