//! Graded public-health events, filtered and projected for a terminal map dashboard.
//!
//! The crate splits in two halves:
//!
//! - [`dataset`] loads the event table (built-in sample, remote CSV or local
//!   CSV) and caches it for a fixed time-to-live.
//! - [`pipeline`] turns the table plus a [`pipeline::FilterCriteria`] into a
//!   [`pipeline::FilteredView`]: metrics, map markers, the recent-signals feed
//!   and the ticker text. Every function there is pure.
//!
//! [`map`] and [`braille`] rasterize markers and basemap outlines for the
//! terminal; the binary owns everything interactive.

pub mod braille;
pub mod dataset;
pub mod error;
pub mod export;
pub mod geo;
pub mod map;
pub mod pipeline;

pub use dataset::{Dataset, Event, Grade, Status};
pub use error::LoadError;
pub use pipeline::{filter, FilterCriteria, FilteredView};
