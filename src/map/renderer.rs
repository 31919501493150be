use crate::braille::{BrailleCanvas, Tint};
use crate::map::geometry::{draw_line, fill_disc};
use crate::map::projection::Viewport;
use crate::pipeline::MapMarker;

/// A geographic line as (lon, lat) pairs
pub type LineString = Vec<(f64, f64)>;

/// Marker disc radius bounds in braille pixels
pub const MIN_MARKER_PX: f64 = 1.0;
pub const MAX_MARKER_PX: f64 = 8.0;
/// Country labels appear from this zoom on
pub const LABEL_ZOOM: f64 = 4.0;

/// Level of detail for basemap lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lod {
    Low,    // 110m - continent view
    Medium, // 50m - regional
    High,   // 10m - country
}

impl Lod {
    pub fn from_zoom(zoom: f64) -> Self {
        if zoom < 2.0 {
            Lod::Low
        } else if zoom < 8.0 {
            Lod::Medium
        } else {
            Lod::High
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Lod::Low => "110m",
            Lod::Medium => "50m",
            Lod::High => "10m",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DisplaySettings {
    pub show_coastlines: bool,
    pub show_borders: bool,
    pub show_labels: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_coastlines: true,
            show_borders: true,
            show_labels: true,
        }
    }
}

/// Rasterized layers for one frame, back to front
pub struct MapLayers {
    pub coastlines: BrailleCanvas,
    pub borders: BrailleCanvas,
    pub markers: BrailleCanvas,
    /// (column, row, text) in character cells
    pub labels: Vec<(u16, u16, String)>,
}

/// Disc radius in braille pixels for a marker of `radius_m` at `lat`
pub fn marker_radius_px(viewport: &Viewport, radius_m: f64, lat: f64) -> f64 {
    let mpp = viewport.meters_per_pixel(lat);
    let px = if mpp > 0.0 { radius_m / mpp } else { MAX_MARKER_PX };
    px.clamp(MIN_MARKER_PX, MAX_MARKER_PX)
}

/// Basemap outlines at several resolutions plus layer toggles
#[derive(Default)]
pub struct MapRenderer {
    coastlines_low: Vec<LineString>,
    coastlines_medium: Vec<LineString>,
    coastlines_high: Vec<LineString>,
    borders_medium: Vec<LineString>,
    borders_high: Vec<LineString>,
    pub settings: DisplaySettings,
}

impl MapRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Best available coastlines at or below `lod`
    fn coastlines(&self, lod: Lod) -> &[LineString] {
        let ladder = match lod {
            Lod::High => [&self.coastlines_high, &self.coastlines_medium, &self.coastlines_low],
            Lod::Medium => [&self.coastlines_medium, &self.coastlines_low, &self.coastlines_high],
            Lod::Low => [&self.coastlines_low, &self.coastlines_medium, &self.coastlines_high],
        };
        ladder
            .into_iter()
            .find(|set| !set.is_empty())
            .map(|set| set.as_slice())
            .unwrap_or_default()
    }

    fn borders(&self, lod: Lod) -> &[LineString] {
        match lod {
            Lod::High if !self.borders_high.is_empty() => &self.borders_high,
            _ => &self.borders_medium,
        }
    }

    pub fn add_coastline(&mut self, line: LineString, lod: Lod) {
        match lod {
            Lod::Low => self.coastlines_low.push(line),
            Lod::Medium => self.coastlines_medium.push(line),
            Lod::High => self.coastlines_high.push(line),
        }
    }

    pub fn add_border(&mut self, line: LineString, lod: Lod) {
        match lod {
            Lod::High => self.borders_high.push(line),
            Lod::Low | Lod::Medium => self.borders_medium.push(line),
        }
    }

    pub fn has_data(&self) -> bool {
        !self.coastlines_low.is_empty()
            || !self.coastlines_medium.is_empty()
            || !self.coastlines_high.is_empty()
    }

    pub fn toggle_borders(&mut self) {
        self.settings.show_borders = !self.settings.show_borders;
    }

    pub fn toggle_labels(&mut self) {
        self.settings.show_labels = !self.settings.show_labels;
    }

    /// Rasterize basemap and markers for a `width` x `height` character area.
    /// The two halves are independent and run in parallel.
    pub fn render(&self, width: usize, height: usize, viewport: &Viewport, markers: &[MapMarker]) -> MapLayers {
        let ((coastlines, borders), (marker_canvas, labels)) = rayon::join(
            || self.render_basemap(width, height, viewport),
            || self.render_markers(width, height, viewport, markers),
        );
        MapLayers {
            coastlines,
            borders,
            markers: marker_canvas,
            labels,
        }
    }

    fn render_basemap(&self, width: usize, height: usize, viewport: &Viewport) -> (BrailleCanvas, BrailleCanvas) {
        let lod = Lod::from_zoom(viewport.zoom);
        let mut coastlines = BrailleCanvas::new(width, height);
        let mut borders = BrailleCanvas::new(width, height);

        if self.settings.show_coastlines {
            for line in self.coastlines(lod) {
                draw_linestring(&mut coastlines, line, viewport);
            }
        }
        if self.settings.show_borders {
            for line in self.borders(lod) {
                draw_linestring(&mut borders, line, viewport);
            }
        }
        (coastlines, borders)
    }

    /// Markers are drawn least severe first, and the canvas keeps the
    /// highest-ranked tint per cell, so overlaps show the worst grade.
    fn render_markers(
        &self,
        width: usize,
        height: usize,
        viewport: &Viewport,
        markers: &[MapMarker],
    ) -> (BrailleCanvas, Vec<(u16, u16, String)>) {
        let mut canvas = BrailleCanvas::new(width, height);
        let mut labels: Vec<(u16, u16, String)> = Vec::new();
        let show_labels = self.settings.show_labels && viewport.zoom >= LABEL_ZOOM;

        let mut order: Vec<&MapMarker> = markers.iter().collect();
        order.sort_by_key(|m| m.grade);

        for marker in order {
            let (px, py) = viewport.project(marker.lon, marker.lat);
            if !viewport.is_visible(px, py) {
                continue;
            }
            let radius = marker_radius_px(viewport, marker.radius_m, marker.lat).round() as i32;
            let [r, g, b, _] = marker.color;
            let tint = Tint {
                rank: marker.grade.severity(),
                rgb: [r, g, b],
            };
            fill_disc(&mut canvas, px, py, radius, tint);

            if show_labels && px >= 0 && py >= 0 {
                let col = ((px + radius) / 2 + 1) as u16;
                let row = (py / 4) as u16;
                if !labels.iter().any(|(_, at, text)| *at == row && *text == marker.country) {
                    labels.push((col, row, marker.country.clone()));
                }
            }
        }
        (canvas, labels)
    }
}

/// Draw a polyline, skipping segments that wrap the antimeridian or sit
/// entirely off screen
fn draw_linestring(canvas: &mut BrailleCanvas, line: &[(f64, f64)], viewport: &Viewport) {
    let mut prev: Option<(i32, i32)> = None;
    for &(lon, lat) in line {
        let p = viewport.project(lon, lat);
        if let Some(q) = prev {
            let span = ((p.0 - q.0).abs() + (p.1 - q.1).abs()) as usize;
            if span < viewport.width && viewport.line_might_be_visible(q, p) {
                draw_line(canvas, q, p);
            }
        }
        prev = Some(p);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{sample_events, Grade};
    use crate::pipeline::MapView;

    fn view(zoom: f64) -> Viewport {
        Viewport::new(20.0, 0.0, zoom, 160, 96)
    }

    #[test]
    fn test_lod_from_zoom() {
        assert_eq!(Lod::from_zoom(1.0), Lod::Low);
        assert_eq!(Lod::from_zoom(3.0), Lod::Medium);
        assert_eq!(Lod::from_zoom(9.0), Lod::High);
    }

    #[test]
    fn test_marker_radius_is_clamped() {
        let wide = view(0.5);
        assert_eq!(marker_radius_px(&wide, 30_000.0, 0.0), MIN_MARKER_PX);
        let close = view(100.0);
        assert_eq!(marker_radius_px(&close, 10_000_000.0, 0.0), MAX_MARKER_PX);
        let mid = view(20.0);
        let small = marker_radius_px(&mid, 30_000.0, 0.0);
        let large = marker_radius_px(&mid, 75_000.0, 0.0);
        assert!(small < large);
    }

    #[test]
    fn test_coastline_fallback_ladder() {
        let mut renderer = MapRenderer::new();
        assert!(!renderer.has_data());
        renderer.add_coastline(vec![(0.0, 0.0), (10.0, 0.0)], Lod::Low);
        assert!(renderer.has_data());
        assert_eq!(renderer.coastlines(Lod::High).len(), 1);
    }

    #[test]
    fn test_render_layers() {
        let mut renderer = MapRenderer::new();
        renderer.add_coastline(vec![(0.0, 0.0), (40.0, 0.0)], Lod::Low);
        let events = sample_events();
        let markers = MapView::project(&events);
        let layers = renderer.render(80, 24, &view(2.0), markers.markers());

        assert!(!layers.coastlines.is_blank());
        assert!(layers.borders.is_blank());
        assert!(!layers.markers.is_blank());
        assert!(layers.labels.is_empty());
    }

    #[test]
    fn test_labels_when_zoomed_in() {
        let renderer = MapRenderer::new();
        let marker = MapMarker {
            lon: 20.0,
            lat: 0.0,
            grade: Grade::Grade3,
            color: [255, 51, 85, 200],
            radius_m: 30_000.0,
            country: "Chad".into(),
            disease: String::new(),
            location: String::new(),
            cases: None,
            deaths: None,
        };
        let layers = renderer.render(80, 24, &view(LABEL_ZOOM), std::slice::from_ref(&marker));
        assert_eq!(layers.labels.len(), 1);
        assert_eq!(layers.labels[0].2, "Chad");

        let (col, row) = (40usize, 12usize);
        let (_, tint) = layers.markers.cell(col, row).unwrap();
        assert_eq!(tint.map(|t| t.rank), Some(3));
    }

    #[test]
    fn test_severe_marker_wins_overlap() {
        let renderer = MapRenderer::new();
        let base = MapMarker {
            lon: 20.0,
            lat: 0.0,
            grade: Grade::Grade3,
            color: [255, 51, 85, 200],
            radius_m: 30_000.0,
            country: "A".into(),
            disease: String::new(),
            location: String::new(),
            cases: None,
            deaths: None,
        };
        let mild = MapMarker {
            grade: Grade::Grade1,
            color: [255, 204, 0, 200],
            ..base.clone()
        };
        let layers = renderer.render(80, 24, &view(2.0), &[base, mild]);
        let (_, tint) = layers.markers.cell(40, 12).unwrap();
        assert_eq!(tint.map(|t| t.rgb), Some([255, 51, 85]));
    }
}
