#![forbid(unsafe_code)]

//! Component model, sessions, events and the widget library of GWU.
//!
//! # Role in GWU
//! This crate is the middle layer: the server-side component tree the
//! browser page is a projection of.
//!
//! # Primary responsibilities
//! - **Component substrate**: [`Comp`], [`CompCore`], the [`Ref`]/[`CompRef`]
//!   handle types and the [`Container`] protocol.
//! - **Events**: [`Event`] with the shared post-event record (dirty set,
//!   focus target, reload request, session), handler dispatch and internal
//!   event forking.
//! - **Sessions**: [`Session`], public and private, with the per-session
//!   read-write lock the server serializes on.
//! - **Widgets**: windows, panels, tables, tab panels, expanders, links,
//!   and the leaf widgets (labels, buttons, boxes, timers…).
//!
//! # How it fits in the system
//! `gwu-server` resolves components by id in this tree, dispatches decoded
//! events into it under the session write lock, and renders windows or
//! single components out of it under the read lock.

pub mod addons;
pub mod button;
pub mod comp;
pub mod event;
pub mod expander;
pub mod html;
pub mod image;
pub mod label;
pub mod link;
pub mod listbox;
pub mod panel;
pub mod sess_monitor;
pub mod session;
pub mod state_buttons;
pub mod table;
pub mod tabpanel;
pub mod textbox;
pub mod timer;
pub mod window;

pub use addons::CellFmt;
pub use button::Button;
pub use comp::{
    comp_by_id, descendant_of, descendant_of_id, make_orphan, Comp, CompCore, CompRef, Container,
    Ref, WeakCompRef,
};
pub use event::{dispatch_event, Event, EventHandler, SessionRegistry};
pub use expander::Expander;
pub use html::Html;
pub use image::Image;
pub use label::Label;
pub use link::Link;
pub use listbox::ListBox;
pub use panel::{Layout, Panel};
pub use session::{Session, SessionError};
pub use state_buttons::{RadioGroup, StateButton, SwitchButton};
pub use sess_monitor::SessMonitor;
pub use table::Table;
pub use tabpanel::{TabBar, TabBarPlacement, TabPanel};
pub use textbox::TextBox;
pub use timer::Timer;
pub use window::{RenderEnv, Window};
