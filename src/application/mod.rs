//! Application layer services implementing business logic.
//!
//! Services coordinate the code generator, the link store and the cache.
//! They consume the [`LinkRepository`](crate::domain::repositories::LinkRepository)
//! trait and expose a small API to HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::shortening_service::ShorteningService`] - Short link creation
//! - [`services::resolution_service::ResolutionService`] - Code to URL lookup for redirects
//! - [`services::stats_service::StatsService`] - Per-link and store-wide statistics
//! - [`services::expiry_sweeper::ExpirySweeper`] - Periodic removal of expired links

pub mod services;
