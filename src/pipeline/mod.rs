//! Pure transformations from the event table to everything the dashboard
//! draws. Nothing here does I/O or holds state between calls.

mod analytics;
mod feed;
mod filter;
mod markers;
mod metrics;
mod options;

pub use analytics::{
    case_fatality_rate, disease_burden, disease_distribution, related_events, DiseaseBurden,
    BURDEN_LEN, DISEASE_CHART_LEN, RELATED_LEN,
};
pub use feed::{
    by_recency, recent_signals, truncate, Signal, Ticker, DESCRIPTION_BUDGET, ELLIPSIS, FEED_LEN,
    TICKER_LEN,
};
pub use filter::{FilterCriteria, MIN_SEARCH_CHARS};
pub use markers::{
    grade_color, marker_radius_m, MapMarker, MapView, Rgba, GRADE1_COLOR, GRADE2_COLOR,
    GRADE3_COLOR, RADIUS_BASE_M, RADIUS_PER_EVENT_M, UNGRADED_COLOR,
};
pub use metrics::{GradeSummary, Metrics};
pub use options::{Dimension, FilterOptions, FilterValue};

use crate::dataset::Event;

/// Everything derived from one filter pass. Rows borrow from the table.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    /// Matching rows in table order
    pub rows: Vec<&'a Event>,
    pub metrics: Metrics,
    pub map: MapView,
    pub feed: Vec<Signal>,
    pub ticker: Ticker,
}

impl FilteredView<'_> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Apply `criteria` to `events` and derive every dashboard view from the
/// result
pub fn filter<'a>(events: &'a [Event], criteria: &FilterCriteria) -> FilteredView<'a> {
    let rows = criteria.apply(events);
    let recent = by_recency(rows.iter().copied());

    FilteredView {
        metrics: Metrics::tally(rows.iter().copied()),
        map: MapView::project(rows.iter().copied()),
        feed: recent_signals(&recent, FEED_LEN),
        ticker: Ticker::from_recent(&recent),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{sample_events, Grade};

    #[test]
    fn test_unfiltered_view_of_sample() {
        let events = sample_events();
        let view = filter(&events, &FilterCriteria::default());
        assert_eq!(view.rows.len(), 20);
        assert_eq!(view.metrics.total, 20);
        assert_eq!(view.map.markers().len(), 20);
        assert_eq!(view.feed.len(), FEED_LEN);
        assert_eq!(view.ticker.items.len(), TICKER_LEN);
        // DRC has the latest report date
        assert_eq!(view.feed[0].country, "Democratic Republic of the Congo");
    }

    #[test]
    fn test_filtered_view_is_consistent() {
        let events = sample_events();
        let mut criteria = FilterCriteria::default();
        criteria.toggle(FilterValue::Grade(Grade::Grade3));
        let view = filter(&events, &criteria);
        assert_eq!(view.metrics.total, 5);
        assert_eq!(view.map.markers().len(), 5);
        assert_eq!(view.feed.len(), 5);
        assert!(view.feed.iter().all(|s| s.grade == Grade::Grade3));
        assert!(view.map.markers().iter().all(|m| m.color == GRADE3_COLOR));
    }

    #[test]
    fn test_no_match_yields_empty_everything() {
        let events = sample_events();
        let mut criteria = FilterCriteria::default();
        criteria.toggle(FilterValue::Country("Atlantis".into()));
        let view = filter(&events, &criteria);
        assert!(view.is_empty());
        assert_eq!(view.metrics, Metrics::default());
        assert_eq!(view.map, MapView::NoData);
        assert!(view.feed.is_empty());
        assert!(view.ticker.text.is_empty());
    }

    #[test]
    fn test_empty_table() {
        let view = filter(&[], &FilterCriteria::default());
        assert!(view.is_empty());
        assert!(view.map.is_empty());
    }
}
