//! Natural Earth basemap loading with a built-in coarse outline as fallback

use crate::map::renderer::{LineString, Lod, MapRenderer};
use anyhow::{Context, Result};
use geojson::{GeoJson, Geometry, Value};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Coastline files by resolution, in the layout Natural Earth ships them
const COASTLINE_FILES: [(&str, Lod); 3] = [
    ("ne_110m_coastline.json", Lod::Low),
    ("ne_50m_coastline.json", Lod::Medium),
    ("ne_10m_coastline.json", Lod::High),
];

const BORDER_FILES: [(&str, Lod); 3] = [
    ("ne_110m_admin_0_boundary_lines_land.json", Lod::Low),
    ("ne_50m_admin_0_boundary_lines_land.json", Lod::Medium),
    ("ne_10m_admin_0_boundary_lines_land.json", Lod::High),
];

/// Load every basemap file present in `dir`, falling back to the built-in
/// outline when no coastline could be read. Returns how many files loaded.
pub fn load_basemap(renderer: &mut MapRenderer, dir: &Path) -> usize {
    let mut loaded = 0;

    for (name, lod) in COASTLINE_FILES {
        loaded += load_into(dir, name, |line| renderer.add_coastline(line, lod));
    }
    for (name, lod) in BORDER_FILES {
        loaded += load_into(dir, name, |line| renderer.add_border(line, lod));
    }

    if !renderer.has_data() {
        info!(dir = %dir.display(), "no basemap files found, using built-in outline");
        add_builtin_outline(renderer);
    }
    loaded
}

fn load_into(dir: &Path, name: &str, add: impl FnMut(LineString)) -> usize {
    let path = dir.join(name);
    if !path.exists() {
        debug!(path = %path.display(), "basemap file absent");
        return 0;
    }
    match read_lines(&path) {
        Ok(lines) => {
            debug!(path = %path.display(), lines = lines.len(), "basemap file loaded");
            lines.into_iter().for_each(add);
            1
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to load basemap file");
            0
        }
    }
}

/// Parse a GeoJSON file into polylines
pub fn read_lines(path: &Path) -> Result<Vec<LineString>> {
    let mut bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let geojson: GeoJson = simd_json::serde::from_slice(&mut bytes)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(line_strings(&geojson))
}

/// Every line-like geometry as a polyline. Polygons contribute their
/// exterior ring.
pub fn line_strings(geojson: &GeoJson) -> Vec<LineString> {
    let mut out = Vec::new();
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for geometry in fc.features.iter().filter_map(|f| f.geometry.as_ref()) {
                collect_geometry(geometry, &mut out);
            }
        }
        GeoJson::Feature(f) => {
            if let Some(geometry) = &f.geometry {
                collect_geometry(geometry, &mut out);
            }
        }
        GeoJson::Geometry(geometry) => collect_geometry(geometry, &mut out),
    }
    out
}

fn to_line(coords: &[Vec<f64>]) -> LineString {
    coords
        .iter()
        .filter(|c| c.len() >= 2)
        .map(|c| (c[0], c[1]))
        .collect()
}

fn collect_geometry(geometry: &Geometry, out: &mut Vec<LineString>) {
    match &geometry.value {
        Value::LineString(coords) => out.push(to_line(coords)),
        Value::MultiLineString(lines) => out.extend(lines.iter().map(|l| to_line(l))),
        Value::Polygon(rings) => out.extend(rings.first().map(|r| to_line(r))),
        Value::MultiPolygon(polygons) => {
            out.extend(polygons.iter().filter_map(|rings| rings.first()).map(|r| to_line(r)))
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                collect_geometry(g, out);
            }
        }
        _ => {}
    }
}

const AFRICA: &[(f64, f64)] = &[
    (-17.1, 14.7), (-16.8, 12.5), (-15.0, 10.8), (-13.2, 8.9), (-11.5, 6.9),
    (-7.5, 4.4), (-4.0, 5.2), (1.0, 6.0), (4.5, 6.3), (8.5, 4.5),
    (9.6, 3.0), (9.4, 0.5), (11.8, -3.8), (13.2, -8.8), (12.5, -13.5),
    (11.8, -17.3), (14.5, -22.9), (16.5, -28.6), (18.4, -33.9), (20.0, -34.8),
    (25.6, -33.9), (28.0, -32.5), (32.9, -26.0), (35.5, -24.0), (34.8, -19.8),
    (40.5, -15.0), (40.2, -10.3), (39.3, -6.8), (40.9, -2.2), (43.0, 1.0),
    (46.0, 2.9), (49.0, 6.0), (51.2, 10.4), (49.0, 11.3), (43.3, 11.6),
    (41.0, 14.8), (38.5, 18.0), (37.2, 21.0), (35.6, 23.9), (34.0, 27.0),
    (32.3, 31.3), (29.9, 31.2), (25.0, 31.6), (20.1, 32.1), (19.0, 30.3),
    (15.3, 32.3), (11.1, 33.3), (10.2, 36.8), (8.6, 36.9), (3.0, 36.8),
    (-2.0, 35.1), (-5.9, 35.8), (-9.2, 32.5), (-9.8, 29.9), (-13.2, 27.6),
    (-16.0, 23.7), (-17.0, 21.0), (-16.3, 19.4), (-16.5, 16.1), (-17.1, 14.7),
];

const MADAGASCAR: &[(f64, f64)] = &[
    (49.3, -12.0), (50.5, -15.5), (49.8, -17.1), (47.3, -24.9), (45.1, -25.5),
    (43.6, -23.5), (44.0, -20.0), (44.4, -16.2), (46.5, -15.7), (49.3, -12.0),
];

const ARABIA: &[(f64, f64)] = &[
    (34.9, 29.5), (38.0, 24.1), (39.1, 21.5), (42.8, 16.0), (43.5, 12.7),
    (45.0, 12.8), (52.2, 15.6), (55.0, 17.0), (57.8, 19.0), (59.8, 22.5),
    (56.4, 26.2), (51.6, 24.3), (50.1, 26.7), (48.0, 29.9),
];

const NORTH_MEDITERRANEAN: &[(f64, f64)] = &[
    (-9.5, 38.7), (-6.3, 36.5), (-5.6, 36.0), (-0.5, 38.3), (3.2, 41.9),
    (6.0, 43.1), (8.8, 44.4), (12.3, 41.7), (15.6, 38.2), (16.6, 40.5),
    (12.3, 45.4), (13.7, 45.6), (19.4, 41.8), (21.1, 38.3), (23.0, 36.5),
    (26.0, 40.5), (29.0, 41.0), (36.2, 36.6), (35.9, 35.0), (34.5, 31.6),
];

/// Coarse African-region outline used when no basemap data is present
pub fn add_builtin_outline(renderer: &mut MapRenderer) {
    for outline in [AFRICA, MADAGASCAR, ARABIA, NORTH_MEDITERRANEAN] {
        renderer.add_coastline(outline.to_vec(), Lod::Low);
    }
}
