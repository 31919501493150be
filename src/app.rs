use crate::theme::Theme;
use crate::ui;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use ratatui::layout::Rect;
use signal_map::dataset::DatasetCache;
use signal_map::export::{export_file_name, write_csv};
use signal_map::map::{Lod, MapRenderer, SpatialGrid, Viewport, AFRICA_ZOOM};
use signal_map::pipeline::{
    by_recency, filter, Dimension, FilterCriteria, FilterOptions, FilteredView, GradeSummary, MapMarker,
};
use signal_map::{Dataset, Event};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Hover pick radius in braille pixels
const HOVER_PX: f64 = 4.0;
/// Frames per ticker character at ~60fps
const TICKER_FRAMES_PER_CHAR: u64 = 6;
const METERS_PER_DEGREE: f64 = 111_320.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
}

/// What fills the space right of the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Map,
    Analytics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailTab {
    Details,
    Related,
}

/// Event shown in the detail popup
#[derive(Debug, Clone)]
pub struct Detail {
    pub event: Event,
    /// Index into the filtered rows, newest first
    pub position: usize,
    pub tab: DetailTab,
}

/// Application state
pub struct App {
    cache: DatasetCache,
    pub dataset: Arc<Dataset>,
    /// Last load failure, shown until a refresh succeeds
    pub load_error: Option<String>,
    pub criteria: FilterCriteria,
    pub options: FilterOptions,
    /// Grade counts over the whole table
    pub grade_summary: GradeSummary,
    pub focus: Dimension,
    cursors: [usize; Dimension::COUNT],
    pub mode: InputMode,
    pub screen: Screen,
    pub detail: Option<Detail>,
    pub search_input: String,
    pub theme: Theme,
    /// One-line message for the status bar
    pub notice: Option<String>,
    export_dir: PathBuf,
    pub viewport: Viewport,
    pub map_renderer: MapRenderer,
    /// Map drawing area in terminal cells
    pub map_area: Rect,
    hover_grid: SpatialGrid<MapMarker>,
    pub hovered: Option<MapMarker>,
    pub should_quit: bool,
    /// Last mouse position for drag tracking
    pub last_mouse: Option<(u16, u16)>,
    /// Whether the held button has moved since it went down
    dragged: bool,
    pub mouse_pos: Option<(u16, u16)>,
    pub frame: u64,
}

impl App {
    pub fn new(
        cache: DatasetCache,
        map_renderer: MapRenderer,
        theme: Theme,
        export_dir: PathBuf,
        width: u16,
        height: u16,
    ) -> Self {
        let source = cache.describe();
        let mut app = Self {
            cache,
            dataset: Arc::new(Dataset::empty(source)),
            load_error: None,
            criteria: FilterCriteria::default(),
            options: FilterOptions::default(),
            grade_summary: GradeSummary::default(),
            focus: Dimension::Grade,
            cursors: [0; Dimension::COUNT],
            mode: InputMode::Normal,
            screen: Screen::Map,
            detail: None,
            search_input: String::new(),
            theme,
            notice: None,
            export_dir,
            viewport: Viewport::africa(0, 0),
            map_renderer,
            map_area: Rect::default(),
            hover_grid: SpatialGrid::new(1.0),
            hovered: None,
            should_quit: false,
            last_mouse: None,
            dragged: false,
            mouse_pos: None,
            frame: 0,
        };
        app.resize(width, height);
        app.sync_dataset(Instant::now());
        app.center_on_markers();
        app
    }

    /// Derived views for the current table and criteria
    pub fn view(&self) -> FilteredView<'_> {
        filter(&self.dataset.events, &self.criteria)
    }

    /// Pick up a reloaded or failed table from the cache. Cheap when nothing
    /// changed, so it runs every frame and doubles as the TTL check.
    pub fn sync_dataset(&mut self, now: Instant) {
        match self.cache.get(now).map_err(|e| e.to_string()) {
            Ok(dataset) => {
                if self.load_error.is_none() && Arc::ptr_eq(&dataset, &self.dataset) {
                    return;
                }
                info!(rows = dataset.len(), source = %dataset.source, "dataset swapped in");
                self.load_error = None;
                self.install(dataset);
            }
            Err(message) => {
                if self.load_error.as_deref() == Some(message.as_str()) {
                    return;
                }
                self.load_error = Some(message);
                self.install(Arc::new(Dataset::empty(self.cache.describe())));
            }
        }
    }

    fn install(&mut self, dataset: Arc<Dataset>) {
        self.options = FilterOptions::from_dataset(&dataset);
        self.grade_summary = GradeSummary::tally(&dataset.events);
        self.dataset = dataset;
        for dim in Dimension::ALL {
            self.clamp_cursor(dim);
        }
        self.refilter();
    }

    /// Force a reload, clearing any remembered failure
    pub fn refresh(&mut self, now: Instant) {
        self.cache.invalidate();
        self.sync_dataset(now);
        self.notice = Some(match &self.load_error {
            None => format!("Refreshed: {} events", self.dataset.len()),
            Some(_) => "Refresh failed".to_string(),
        });
    }

    /// Rebuild hover lookup after the criteria or table change
    fn refilter(&mut self) {
        let view = self.view();
        let mut grid = SpatialGrid::new(1.0);
        for marker in view.map.markers() {
            grid.insert(marker.lon, marker.lat, marker.clone());
        }
        self.hover_grid = grid;
        self.update_hover();
    }

    // Filter sidebar

    pub fn cursor(&self, dimension: Dimension) -> usize {
        self.cursors[dimension.index()]
    }

    fn clamp_cursor(&mut self, dimension: Dimension) {
        let len = self.options.len(dimension);
        let cursor = &mut self.cursors[dimension.index()];
        *cursor = (*cursor).min(len.saturating_sub(1));
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn cursor_down(&mut self) {
        let len = self.options.len(self.focus);
        let cursor = &mut self.cursors[self.focus.index()];
        if *cursor + 1 < len {
            *cursor += 1;
        }
    }

    pub fn cursor_up(&mut self) {
        let cursor = &mut self.cursors[self.focus.index()];
        *cursor = cursor.saturating_sub(1);
    }

    /// Select or deselect the value under the focused cursor
    pub fn toggle_selected(&mut self) {
        if let Some(value) = self.options.value(self.focus, self.cursor(self.focus)) {
            self.criteria.toggle(value);
            self.refilter();
        }
    }

    pub fn clear_focused(&mut self) {
        self.criteria.clear_dimension(self.focus);
        self.refilter();
    }

    pub fn clear_all(&mut self) {
        self.criteria.clear();
        self.search_input.clear();
        self.refilter();
    }

    // Search

    pub fn begin_search(&mut self) {
        self.mode = InputMode::Search;
    }

    pub fn search_push(&mut self, ch: char) {
        self.search_input.push(ch);
        self.apply_search();
    }

    pub fn search_pop(&mut self) {
        self.search_input.pop();
        self.apply_search();
    }

    /// Keep the query and leave search mode
    pub fn end_search(&mut self) {
        self.mode = InputMode::Normal;
    }

    /// Drop the query and leave search mode
    pub fn cancel_search(&mut self) {
        self.search_input.clear();
        self.apply_search();
        self.mode = InputMode::Normal;
    }

    fn apply_search(&mut self) {
        let query = self.search_input.trim();
        self.criteria.search = (!query.is_empty()).then(|| query.to_string());
        self.refilter();
    }

    pub fn toggle_screen(&mut self) {
        self.screen = match self.screen {
            Screen::Map => Screen::Analytics,
            Screen::Analytics => Screen::Map,
        };
        self.hovered = None;
        self.end_drag();
    }

    // Event detail

    /// Filtered rows, newest first
    fn recent(&self) -> Vec<&Event> {
        by_recency(self.view().rows)
    }

    /// Show the newest filtered signal
    pub fn open_detail(&mut self) {
        self.show_detail_at(0);
    }

    fn show_detail_at(&mut self, position: usize) {
        let tab = self.detail.as_ref().map_or(DetailTab::Details, |d| d.tab);
        let event = self.recent().get(position).map(|&e| e.clone());
        match event {
            Some(event) => self.detail = Some(Detail { event, position, tab }),
            None => self.notice = Some("No signals to show".to_string()),
        }
    }

    /// Step to the next older signal
    pub fn detail_next(&mut self) {
        if let Some(position) = self.detail.as_ref().map(|d| d.position + 1) {
            if position < self.recent().len() {
                self.show_detail_at(position);
            }
        }
    }

    pub fn detail_prev(&mut self) {
        if let Some(position) = self.detail.as_ref().and_then(|d| d.position.checked_sub(1)) {
            self.show_detail_at(position);
        }
    }

    pub fn toggle_detail_tab(&mut self) {
        if let Some(detail) = &mut self.detail {
            detail.tab = match detail.tab {
                DetailTab::Details => DetailTab::Related,
                DetailTab::Related => DetailTab::Details,
            };
        }
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    /// Close the popup and frame the event on the map
    pub fn locate_detail(&mut self) {
        let Some(detail) = &self.detail else {
            return;
        };
        match detail.event.position() {
            Some(point) => {
                self.viewport.fit([point]);
                self.detail = None;
                self.screen = Screen::Map;
                self.update_hover();
            }
            None => self.notice = Some("Event has no location".to_string()),
        }
    }

    /// Open the popup for the marker under the mouse. False when there is
    /// none.
    pub fn open_hovered_detail(&mut self) -> bool {
        let Some(marker) = &self.hovered else {
            return false;
        };
        let position = self.recent().iter().position(|e| marker.describes(e));
        match position {
            Some(position) => {
                self.show_detail_at(position);
                true
            }
            None => false,
        }
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        self.notice = Some(format!("Theme: {}", self.theme.label()));
    }

    /// Write the filtered rows to `signals-<today>.csv` in the export dir
    pub fn export(&mut self, today: NaiveDate) -> Result<PathBuf> {
        let path = self.export_dir.join(export_file_name(today));
        match self.write_export(&path) {
            Ok(rows) => {
                info!(path = %path.display(), rows, "exported filtered rows");
                self.notice = Some(format!("Exported {rows} rows to {}", path.display()));
                Ok(path)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "export failed");
                self.notice = Some(format!("Export failed: {e}"));
                Err(e)
            }
        }
    }

    fn write_export(&self, path: &Path) -> Result<usize> {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        let view = self.view();
        Ok(write_csv(view.rows.iter().copied(), BufWriter::new(file))?)
    }

    // Map

    /// Recompute pane geometry for a terminal of `width` x `height` cells
    pub fn resize(&mut self, width: u16, height: u16) {
        let panes = ui::layout(Rect::new(0, 0, width, height));
        self.map_area = panes.map_inner();
        // Braille gives 2x4 resolution per character
        self.viewport.width = self.map_area.width as usize * 2;
        self.viewport.height = self.map_area.height as usize * 4;
    }

    /// Initial framing: the mean marker position at the regional zoom
    fn center_on_markers(&mut self) {
        if let Some((lon, lat)) = self.view().map.center() {
            self.viewport.center_lon = lon;
            self.viewport.center_lat = lat;
            self.viewport.zoom = AFRICA_ZOOM;
        }
    }

    pub fn fit_to_markers(&mut self) {
        let points: Vec<(f64, f64)> = self.view().map.markers().iter().map(|m| (m.lon, m.lat)).collect();
        if !self.viewport.fit(points) {
            self.notice = Some("No events with location data to fit".to_string());
        }
        self.update_hover();
    }

    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.viewport.pan(dx, dy);
        self.update_hover();
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
        self.update_hover();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
        self.update_hover();
    }

    /// Terminal cell to braille pixel within the map, `None` outside it
    pub fn pixel_at(&self, col: u16, row: u16) -> Option<(i32, i32)> {
        if self.screen != Screen::Map {
            return None;
        }
        let area = self.map_area;
        let inside = col >= area.x && col < area.x + area.width && row >= area.y && row < area.y + area.height;
        inside.then(|| (((col - area.x) as i32) * 2, ((row - area.y) as i32) * 4))
    }

    pub fn zoom_in_at(&mut self, col: u16, row: u16) {
        if let Some((px, py)) = self.pixel_at(col, row) {
            self.viewport.zoom_in_at(px, py);
            self.update_hover();
        }
    }

    pub fn zoom_out_at(&mut self, col: u16, row: u16) {
        if let Some((px, py)) = self.pixel_at(col, row) {
            self.viewport.zoom_out_at(px, py);
            self.update_hover();
        }
    }

    pub fn press(&mut self, x: u16, y: u16) {
        self.last_mouse = Some((x, y));
        self.dragged = false;
    }

    pub fn handle_drag(&mut self, x: u16, y: u16) {
        if let Some((last_x, last_y)) = self.last_mouse {
            if (last_x, last_y) == (x, y) {
                return;
            }
            self.dragged = true;
            let dx = (last_x as i32 - x as i32) * 2;
            let dy = (last_y as i32 - y as i32) * 4;
            self.pan(dx, dy);
        }
        self.last_mouse = Some((x, y));
    }

    /// A press and release without movement over a marker opens its detail
    pub fn release(&mut self) {
        if self.last_mouse.is_some() && !self.dragged {
            self.open_hovered_detail();
        }
        self.end_drag();
    }

    pub fn end_drag(&mut self) {
        self.last_mouse = None;
        self.dragged = false;
    }

    pub fn set_mouse_pos(&mut self, col: u16, row: u16) {
        self.mouse_pos = Some((col, row));
        self.update_hover();
    }

    /// Marker under the mouse cursor, if any
    fn update_hover(&mut self) {
        self.hovered = self
            .mouse_pos
            .and_then(|(col, row)| self.pixel_at(col, row))
            .and_then(|(px, py)| {
                let (lon, lat) = self.viewport.unproject(px, py);
                let radius = HOVER_PX * self.viewport.meters_per_pixel(lat) / METERS_PER_DEGREE;
                self.hover_grid.nearest(lon, lat, radius).cloned()
            });
    }

    /// Mouse position relative to the map, in character cells
    pub fn cursor_cell(&self) -> Option<(u16, u16)> {
        let (col, row) = self.mouse_pos?;
        self.pixel_at(col, row)?;
        Some((col - self.map_area.x, row - self.map_area.y))
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Advance animation state by one frame
    pub fn tick(&mut self) {
        self.frame = self.frame.wrapping_add(1);
    }

    pub fn ticker_offset(&self) -> usize {
        (self.frame / TICKER_FRAMES_PER_CHAR) as usize
    }

    pub fn zoom_level(&self) -> String {
        format!("{:.1}x", self.viewport.zoom)
    }

    pub fn center_coords(&self) -> String {
        format!(
            "{:.1}°{}, {:.1}°{}",
            self.viewport.center_lat.abs(),
            if self.viewport.center_lat >= 0.0 { "N" } else { "S" },
            self.viewport.center_lon.abs(),
            if self.viewport.center_lon >= 0.0 { "E" } else { "W" }
        )
    }

    pub fn lod_level(&self) -> &'static str {
        Lod::from_zoom(self.viewport.zoom).label()
    }
}
