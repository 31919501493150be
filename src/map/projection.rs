use crate::geo::{wrap_lon, EARTH_CIRCUMFERENCE_M};
use std::f64::consts::PI;

pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 100.0;
const ZOOM_STEP: f64 = 1.5;
/// Mercator blows up at the poles
const LAT_LIMIT: f64 = 85.0;
/// Share of the viewport a fitted marker cloud may fill
const FIT_MARGIN: f64 = 0.8;
/// Zoom used when fitting a single point
const FIT_SINGLE_ZOOM: f64 = 8.0;

/// Default view framing the African region
pub const AFRICA_CENTER: (f64, f64) = (20.0, 0.0);
pub const AFRICA_ZOOM: f64 = 2.4;

/// Normalized Web Mercator coordinates in [0, 1]
#[inline(always)]
fn mercator(lon: f64, lat: f64) -> (f64, f64) {
    let lat_rad = lat.clamp(-LAT_LIMIT, LAT_LIMIT).to_radians();
    let x = (lon + 180.0) / 360.0;
    let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0;
    (x, y)
}

#[inline(always)]
fn inverse_mercator(x: f64, y: f64) -> (f64, f64) {
    let lon = x * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * y)).sinh().atan().to_degrees();
    (lon, lat)
}

/// Visible map area in braille pixels. `zoom` 1.0 fits the whole world
/// across `width`.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub center_lon: f64,
    pub center_lat: f64,
    pub zoom: f64,
    pub width: usize,
    pub height: usize,
}

impl Viewport {
    pub fn new(center_lon: f64, center_lat: f64, zoom: f64, width: usize, height: usize) -> Self {
        Self {
            center_lon,
            center_lat,
            zoom,
            width,
            height,
        }
    }

    pub fn africa(width: usize, height: usize) -> Self {
        Self::new(AFRICA_CENTER.0, AFRICA_CENTER.1, AFRICA_ZOOM, width, height)
    }

    #[inline(always)]
    fn scale(&self) -> f64 {
        self.zoom * self.width.max(1) as f64
    }

    /// Pan by a pixel delta
    pub fn pan(&mut self, dx: i32, dy: i32) {
        let scale = self.scale();
        let (cx, cy) = mercator(self.center_lon, self.center_lat);
        let (lon, lat) = inverse_mercator(cx + dx as f64 / scale, cy + dy as f64 / scale);
        self.center_lon = wrap_lon(lon);
        self.center_lat = lat.clamp(-LAT_LIMIT, LAT_LIMIT);
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * ZOOM_STEP).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / ZOOM_STEP).max(MIN_ZOOM);
    }

    pub fn zoom_in_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, ZOOM_STEP);
    }

    pub fn zoom_out_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, 1.0 / ZOOM_STEP);
    }

    /// Zoom by `factor` keeping the point under (`px`, `py`) in place
    fn zoom_at(&mut self, px: i32, py: i32, factor: f64) {
        let (lon, lat) = self.unproject(px, py);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let (new_px, new_py) = self.project(lon, lat);
        self.pan(new_px - px, new_py - py);
    }

    /// Pixel coordinates back to (lon, lat)
    pub fn unproject(&self, px: i32, py: i32) -> (f64, f64) {
        let scale = self.scale();
        let (cx, cy) = mercator(self.center_lon, self.center_lat);
        let x = (px as f64 - self.width as f64 / 2.0) / scale + cx;
        let y = (py as f64 - self.height as f64 / 2.0) / scale + cy;
        inverse_mercator(x, y)
    }

    /// (lon, lat) to pixel coordinates
    pub fn project(&self, lon: f64, lat: f64) -> (i32, i32) {
        let scale = self.scale();
        let (x, y) = mercator(lon, lat);
        let (cx, cy) = mercator(self.center_lon, self.center_lat);
        let px = ((x - cx) * scale + self.width as f64 / 2.0) as i32;
        let py = ((y - cy) * scale + self.height as f64 / 2.0) as i32;
        (px, py)
    }

    /// Ground meters covered by one pixel at `lat`
    pub fn meters_per_pixel(&self, lat: f64) -> f64 {
        EARTH_CIRCUMFERENCE_M * lat.clamp(-LAT_LIMIT, LAT_LIMIT).to_radians().cos() / self.scale()
    }

    /// Projected point within the viewport plus a small margin
    pub fn is_visible(&self, px: i32, py: i32) -> bool {
        px >= -10 && px < self.width as i32 + 10 && py >= -10 && py < self.height as i32 + 10
    }

    /// Rough bounding box test for a segment
    pub fn line_might_be_visible(&self, p1: (i32, i32), p2: (i32, i32)) -> bool {
        p1.0.max(p2.0) >= 0
            && p1.0.min(p2.0) < self.width as i32
            && p1.1.max(p2.1) >= 0
            && p1.1.min(p2.1) < self.height as i32
    }

    /// Center on the points and zoom so they fill most of the view.
    /// Returns false (leaving the view alone) when there are no points.
    pub fn fit(&mut self, points: impl IntoIterator<Item = (f64, f64)>) -> bool {
        let mut bounds: Option<(f64, f64, f64, f64)> = None;
        for (lon, lat) in points {
            let (x, y) = mercator(lon, lat);
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
        let Some((x0, y0, x1, y1)) = bounds else {
            return false;
        };

        let (lon, lat) = inverse_mercator((x0 + x1) / 2.0, (y0 + y1) / 2.0);
        self.center_lon = lon;
        self.center_lat = lat.clamp(-LAT_LIMIT, LAT_LIMIT);

        let (span_x, span_y) = (x1 - x0, y1 - y0);
        let zoom = if span_x <= f64::EPSILON && span_y <= f64::EPSILON {
            FIT_SINGLE_ZOOM
        } else {
            let aspect = self.height as f64 / self.width.max(1) as f64;
            let by_x = if span_x > 0.0 { FIT_MARGIN / span_x } else { MAX_ZOOM };
            let by_y = if span_y > 0.0 { FIT_MARGIN * aspect / span_y } else { MAX_ZOOM };
            by_x.min(by_y)
        };
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_center() {
        let vp = Viewport::new(0.0, 0.0, 1.0, 100, 100);
        assert_eq!(vp.project(0.0, 0.0), (50, 50));
    }

    #[test]
    fn test_unproject_inverts_project() {
        let vp = Viewport::africa(400, 200);
        let (px, py) = vp.project(36.8, -1.3);
        let (lon, lat) = vp.unproject(px, py);
        let tolerance = vp.meters_per_pixel(lat) / 111_000.0 * 2.0;
        assert!((lon - 36.8).abs() < tolerance.max(0.5));
        assert!((lat + 1.3).abs() < tolerance.max(0.5));
    }

    #[test]
    fn test_pan_wraps_and_clamps() {
        let mut vp = Viewport::new(179.0, 84.0, 1.0, 100, 100);
        vp.pan(10, -100);
        assert!(vp.center_lon < 0.0);
        assert_eq!(vp.center_lat, LAT_LIMIT);
    }

    #[test]
    fn test_zoom_bounds() {
        let mut vp = Viewport::new(0.0, 0.0, MAX_ZOOM, 100, 100);
        vp.zoom_in();
        assert_eq!(vp.zoom, MAX_ZOOM);
        vp.zoom = MIN_ZOOM;
        vp.zoom_out();
        assert_eq!(vp.zoom, MIN_ZOOM);
    }

    #[test]
    fn test_zoom_at_keeps_point_under_cursor() {
        let mut vp = Viewport::new(0.0, 0.0, 2.0, 400, 200);
        let before = vp.unproject(300, 50);
        vp.zoom_in_at(300, 50);
        let after = vp.unproject(300, 50);
        assert!((before.0 - after.0).abs() < 1.0);
        assert!((before.1 - after.1).abs() < 1.0);
    }

    #[test]
    fn test_meters_per_pixel_shrinks_with_zoom() {
        let mut vp = Viewport::new(0.0, 0.0, 1.0, 400, 200);
        let wide = vp.meters_per_pixel(0.0);
        assert!((wide - EARTH_CIRCUMFERENCE_M / 400.0).abs() < 1.0);
        vp.zoom_in();
        assert!(vp.meters_per_pixel(0.0) < wide);
        assert!(vp.meters_per_pixel(60.0) < vp.meters_per_pixel(0.0));
    }

    #[test]
    fn test_fit_frames_points() {
        let mut vp = Viewport::new(-100.0, 40.0, 1.0, 400, 200);
        assert!(!vp.fit(std::iter::empty()));
        assert_eq!(vp.center_lon, -100.0);

        let points = [(-17.4, 14.7), (45.3, 2.0), (22.9, -30.6)];
        assert!(vp.fit(points));
        for (lon, lat) in points {
            let (px, py) = vp.project(lon, lat);
            assert!((0..400).contains(&px) && (0..200).contains(&py), "{lon},{lat}");
        }
    }

    #[test]
    fn test_fit_single_point() {
        let mut vp = Viewport::africa(400, 200);
        vp.fit([(36.8, -1.3)]);
        assert_eq!(vp.zoom, FIT_SINGLE_ZOOM);
        assert!((vp.center_lon - 36.8).abs() < 1e-6);
    }
}
