use std::collections::HashMap;

/// Hash grid over (lon, lat) for hover picking
pub struct SpatialGrid<T> {
    cells: HashMap<(i32, i32), Vec<usize>>,
    items: Vec<(f64, f64, T)>,
    /// Cell size in degrees
    cell_size: f64,
}

impl<T> SpatialGrid<T> {
    pub fn new(cell_size: f64) -> Self {
        Self {
            cells: HashMap::new(),
            items: Vec::new(),
            cell_size,
        }
    }

    #[inline(always)]
    fn to_cell(&self, lon: f64, lat: f64) -> (i32, i32) {
        (
            (lon / self.cell_size).floor() as i32,
            (lat / self.cell_size).floor() as i32,
        )
    }

    pub fn insert(&mut self, lon: f64, lat: f64, item: T) {
        let idx = self.items.len();
        self.items.push((lon, lat, item));
        let cell = self.to_cell(lon, lat);
        self.cells.entry(cell).or_default().push(idx);
    }

    /// Indices of items in cells overlapping a square of `radius` degrees
    fn query_radius(&self, lon: f64, lat: f64, radius: f64) -> Vec<usize> {
        let (cx, cy) = self.to_cell(lon, lat);
        let reach = (radius / self.cell_size).ceil() as i32;

        let mut results = Vec::new();
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                if let Some(indices) = self.cells.get(&(cx + dx, cy + dy)) {
                    results.extend_from_slice(indices);
                }
            }
        }
        results
    }

    /// Closest item within `radius` degrees. Ties go to the earlier insert.
    pub fn nearest(&self, lon: f64, lat: f64, radius: f64) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        let cos_lat = lat.to_radians().cos().max(0.01);
        self.query_radius(lon, lat, radius)
            .into_iter()
            .filter_map(|idx| {
                let (ilon, ilat, _) = &self.items[idx];
                let dx = (ilon - lon) * cos_lat;
                let dy = ilat - lat;
                let d2 = dx * dx + dy * dy;
                (d2 <= radius * radius).then_some((idx, d2))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
            .map(|(idx, _)| &self.items[idx].2)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
