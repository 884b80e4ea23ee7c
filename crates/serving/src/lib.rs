//! Serving layer for the EventRecs recommendation engine.
//!
//! This crate wraps the recommender core for consumption by an external API
//! layer: an event catalog for candidate resolution, and a service object
//! holding the current model snapshot behind a single atomically-swapped
//! reference.

pub mod catalog;
pub mod error;
pub mod service;

pub use catalog::{EventCatalog, EventStats};
pub use error::{Result, ServingError};
pub use service::{HealthStatus, ModelSnapshot, RecommenderService};
