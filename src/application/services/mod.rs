//! Business logic services for the application layer.

pub mod expiry_sweeper;
pub mod resolution_service;
pub mod shortening_service;
pub mod stats_service;

pub use expiry_sweeper::{ExpirySweeper, SweepReport};
pub use resolution_service::ResolutionService;
pub use shortening_service::ShorteningService;
pub use stats_service::{Dashboard, StatsService};
