//! Core domain entities.
//!
//! The engine persists a single entity, [`ShortLink`]. [`LinkSummary`] is a
//! read-only aggregate computed by the store for the dashboard and the
//! admin CLI.

pub mod short_link;

pub use short_link::{LinkSummary, ShortLink};
