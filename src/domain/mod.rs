//! Domain layer containing business entities and logic.
//!
//! This module defines the link record, the store contract, and the click
//! pipeline, independent of any concrete database or cache.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`click_event`] - Click tracking event model
//! - [`click_worker`] - Asynchronous click processing worker
//!
//! # Click Processing Flow
//!
//! 1. [`ResolutionService`](crate::application::services::ResolutionService) resolves a code
//! 2. A [`click_event::ClickEvent`] is handed to the bounded queue
//! 3. [`click_worker::run_click_worker`] applies it with retry logic
//! 4. The counter is bumped via [`repositories::LinkRepository::increment_clicks`]

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
