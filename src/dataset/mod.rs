//! Event table loading and caching

mod cache;
mod event;
mod parse;
mod sample;
mod source;

pub use cache::{DatasetCache, DEFAULT_TTL};
pub use event::{Event, Grade, Status};
pub use parse::{extract_year, parse_csv, parse_date};
pub use sample::sample_events;
pub use source::{CsvFileSource, DatasetSource, RemoteCsvSource, StaticSource};

use chrono::{DateTime, Local};

/// An immutable, fully loaded event table
#[derive(Debug, Clone)]
pub struct Dataset {
    pub events: Vec<Event>,
    /// Human-readable origin (URL, path or "built-in sample")
    pub source: String,
    pub loaded_at: DateTime<Local>,
    /// Canonical names of optional columns the source did not provide
    pub missing_columns: Vec<&'static str>,
}

impl Dataset {
    pub fn new(events: Vec<Event>, source: impl Into<String>) -> Self {
        Self {
            events,
            source: source.into(),
            loaded_at: Local::now(),
            missing_columns: Vec::new(),
        }
    }

    /// Empty table, shown while a load error is displayed
    pub fn empty(source: impl Into<String>) -> Self {
        Self::new(Vec::new(), source)
    }

    pub fn with_missing_columns(mut self, missing: Vec<&'static str>) -> Self {
        self.missing_columns = missing;
        self
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
