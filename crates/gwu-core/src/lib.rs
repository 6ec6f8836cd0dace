#![forbid(unsafe_code)]

//! Core primitives for GWU, a server-side web UI toolkit.
//!
//! # Role in GWU
//! `gwu-core` is the leaf crate. It owns the pieces every other layer needs
//! and that need nothing in return:
//!
//! - **Component ids**: a process-wide monotonic allocator and the decimal
//!   wire format ([`Id`], [`next_id`]).
//! - **Render writer**: a byte-oriented output helper with typed value
//!   writers, HTML escaping, and attribute rendering ([`Writer`]).
//! - **Event codes**: the wire-level event type, mouse button, modifier-key
//!   and key-code vocabulary shared by the widget layer, the server and the
//!   client runtime ([`EventType`], [`MouseBtn`], [`ModKeys`], [`Key`]).
//!
//! # How it fits in the system
//! The widget layer (`gwu-widgets`) renders through [`Writer`] and registers
//! handlers keyed by [`EventType`]; the server (`gwu-server`) decodes these
//! same codes off the wire and looks components up by [`Id`].

pub mod event;
pub mod id;
pub mod wire;
pub mod writer;

pub use event::{EventCategory, EventType, Key, ModKeys, MouseBtn};
pub use id::{next_id, Id, ParseIdError};
pub use writer::{escape_html, unescape_html, Writer};

/// Toolkit version, used in versioned static resource names.
pub const GWU_VERSION: &str = "0.9.0";
