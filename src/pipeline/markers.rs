use crate::dataset::{Event, Grade};
use crate::geo::mean_center;

pub type Rgba = [u8; 4];

pub const GRADE3_COLOR: Rgba = [255, 51, 85, 200];
pub const GRADE2_COLOR: Rgba = [255, 153, 51, 200];
pub const GRADE1_COLOR: Rgba = [255, 204, 0, 200];
pub const UNGRADED_COLOR: Rgba = [160, 160, 176, 180];

/// Marker radius in meters: linear in event count plus a fixed offset
pub const RADIUS_BASE_M: f64 = 25_000.0;
pub const RADIUS_PER_EVENT_M: f64 = 5_000.0;

pub fn grade_color(grade: Grade) -> Rgba {
    match grade {
        Grade::Grade3 => GRADE3_COLOR,
        Grade::Grade2 => GRADE2_COLOR,
        Grade::Grade1 => GRADE1_COLOR,
        Grade::Ungraded => UNGRADED_COLOR,
    }
}

/// A missing count sizes the marker as a single event
pub fn marker_radius_m(event_count: Option<u64>) -> f64 {
    event_count.unwrap_or(1) as f64 * RADIUS_PER_EVENT_M + RADIUS_BASE_M
}

/// A located event with its derived visual attributes
#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub lon: f64,
    pub lat: f64,
    pub grade: Grade,
    pub color: Rgba,
    pub radius_m: f64,
    pub country: String,
    pub disease: String,
    pub location: String,
    pub cases: Option<u64>,
    pub deaths: Option<u64>,
}

impl MapMarker {
    /// `None` unless the event has both coordinates
    pub fn from_event(event: &Event) -> Option<Self> {
        let (lon, lat) = event.position()?;
        Some(Self {
            lon,
            lat,
            grade: event.grade,
            color: grade_color(event.grade),
            radius_m: marker_radius_m(event.event_count),
            country: event.country.clone(),
            disease: event.disease.clone(),
            location: event.location.clone(),
            cases: event.cases,
            deaths: event.deaths,
        })
    }

    /// Whether this marker was projected from `event`
    pub fn describes(&self, event: &Event) -> bool {
        event.position() == Some((self.lon, self.lat))
            && event.country == self.country
            && event.disease == self.disease
            && event.location == self.location
    }
}

/// Markers for the map, or an explicit "nothing to show"
#[derive(Debug, Clone, PartialEq)]
pub enum MapView {
    NoData,
    Markers(Vec<MapMarker>),
}

impl MapView {
    pub fn project<'a>(rows: impl IntoIterator<Item = &'a Event>) -> Self {
        let markers: Vec<MapMarker> = rows.into_iter().filter_map(MapMarker::from_event).collect();
        if markers.is_empty() {
            MapView::NoData
        } else {
            MapView::Markers(markers)
        }
    }

    pub fn markers(&self) -> &[MapMarker] {
        match self {
            MapView::NoData => &[],
            MapView::Markers(markers) => markers,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, MapView::NoData)
    }

    /// Mean marker position, used to center the initial view
    pub fn center(&self) -> Option<(f64, f64)> {
        mean_center(self.markers().iter().map(|m| (m.lon, m.lat)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::sample_events;

    #[test]
    fn test_colors_by_grade() {
        assert_eq!(grade_color(Grade::Grade3), [255, 51, 85, 200]);
        assert_eq!(grade_color(Grade::Grade1), [255, 204, 0, 200]);
        assert_eq!(grade_color(Grade::Ungraded), [160, 160, 176, 180]);
    }

    #[test]
    fn test_radius_is_monotonic_with_offset() {
        assert_eq!(marker_radius_m(None), 30_000.0);
        assert_eq!(marker_radius_m(Some(0)), 25_000.0);
        assert_eq!(marker_radius_m(Some(10)), 75_000.0);
        assert!(marker_radius_m(Some(11)) > marker_radius_m(Some(10)));
    }

    #[test]
    fn test_rows_without_coordinates_are_dropped() {
        let events = vec![
            Event {
                lat: Some(1.0),
                lon: Some(2.0),
                ..Default::default()
            },
            Event {
                lat: Some(1.0),
                ..Default::default()
            },
            Event::default(),
        ];
        let view = MapView::project(&events);
        assert_eq!(view.markers().len(), 1);
    }

    #[test]
    fn test_marker_describes_its_event() {
        let events = sample_events();
        let view = MapView::project(&events);
        let first = &view.markers()[0];
        assert!(first.describes(&events[0]));
        assert!(!first.describes(&events[1]));
    }

    #[test]
    fn test_all_located_rows_project() {
        let events = sample_events();
        let view = MapView::project(&events);
        assert_eq!(view.markers().len(), events.len());
    }

    #[test]
    fn test_empty_signals_no_data() {
        let view = MapView::project(std::iter::empty());
        assert!(view.is_empty());
        assert_eq!(view.center(), None);
        assert_eq!(MapView::project(&[Event::default()]), MapView::NoData);
    }
}
