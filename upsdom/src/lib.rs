//! In-memory document tree for the upscaler overlay.
//!
//! The overlay never owns the host page; it only observes and decorates it.
//! This crate models the slice of the page the overlay cares about: elements
//! with a tag, an optional id, classes, attributes and text, addressable
//! through a small CSS-like selector engine. An embedder mirrors the real
//! page into a [`Document`] and applies the overlay's mutations back.

pub mod errors;
pub mod probe;

mod element;
mod selector;

pub use element::{Document, NodeId};
pub use errors::DomError;
pub use probe::DomProbe;
pub use selector::Selector;
