use crate::app::{App, Detail, DetailTab, InputMode, Screen};
use crate::theme::{Palette, Theme, CHART_COLORS};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Bar, BarChart, BarGroup, Block, Borders, Clear, List, ListItem, ListState, Paragraph, Row,
        Table, Widget, Wrap,
    },
    Frame,
};
use signal_map::braille::{BrailleCanvas, BRAILLE_BLANK};
use signal_map::map::MapLayers;
use signal_map::pipeline::{
    case_fatality_rate, disease_burden, disease_distribution, related_events, Dimension,
    FilterValue, GradeSummary, MapMarker, Metrics, Signal, BURDEN_LEN, DISEASE_CHART_LEN,
    RELATED_LEN,
};
use signal_map::{Event, FilteredView, Grade};

const TITLE: &str = "WHO Signal Intelligence Dashboard";
const SUBTITLE: &str = "Live tracking of graded events in the African region";
const NO_LOCATIONS: &str = "No events with location data to display";
const SIDEBAR_WIDTH: u16 = 32;
const FEED_WIDTH: u16 = 46;

/// Screen regions, computed the same way for drawing and hit testing
pub struct Panes {
    pub header: Rect,
    pub metrics: Rect,
    pub sidebar: Rect,
    pub map: Rect,
    pub feed: Rect,
    pub ticker: Rect,
    pub status: Rect,
}

impl Panes {
    /// Map area inside its border
    pub fn map_inner(&self) -> Rect {
        self.map.inner(Margin::new(1, 1))
    }
}

pub fn layout(area: Rect) -> Panes {
    let [header, metrics, body, ticker, status] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(4),
        Constraint::Min(6),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    let [sidebar, map, feed] = Layout::horizontal([
        Constraint::Length(SIDEBAR_WIDTH),
        Constraint::Min(20),
        Constraint::Length(FEED_WIDTH),
    ])
    .areas(body);

    Panes {
        header,
        metrics,
        sidebar,
        map,
        feed,
        ticker,
        status,
    }
}

/// Draw the whole dashboard with `theme`'s palette
pub fn render(frame: &mut Frame, app: &App, theme: Theme) {
    let palette = theme.palette();
    let area = frame.area();
    frame.render_widget(Block::new().style(Style::new().bg(palette.background)), area);

    let panes = layout(area);
    let view = app.view();

    render_header(frame, app, &palette, panes.header);
    render_metrics(frame, &view.metrics, &palette, panes.metrics);
    render_sidebar(frame, app, &palette, panes.sidebar);
    match app.screen {
        Screen::Map => {
            render_map(frame, app, view.map.markers(), &palette, panes.map);
            render_feed(frame, &view.feed, &palette, panes.feed);
        }
        Screen::Analytics => render_analytics(frame, &view, &palette, panes.map.union(panes.feed)),
    }

    let window = view.ticker.window(app.ticker_offset(), panes.ticker.width as usize);
    render_ticker(frame, app, &window, &palette, panes.ticker);
    render_status_bar(frame, app, &palette, panes.status);

    if let Some(message) = &app.load_error {
        render_error(frame, message, &palette, panes.map);
    }
    if let Some(detail) = &app.detail {
        render_detail(frame, detail, &view.rows, &palette, panes.map.union(panes.feed));
    }
}

fn count_text(value: Option<u64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |n| n.to_string())
}

fn percent_text(rate: Option<f64>) -> String {
    rate.map_or_else(|| "N/A".to_string(), |r| format!("{r:.1}%"))
}

fn panel<'a>(title: &'a str, palette: &Palette, focused: bool) -> Block<'a> {
    let border = if focused { palette.accent } else { palette.border };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::new().fg(border))
        .style(Style::new().bg(palette.panel).fg(palette.text))
        .title(Span::styled(
            format!(" {title} "),
            Style::new().fg(palette.title).add_modifier(Modifier::BOLD),
        ))
}

fn render_header(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let muted = Style::new().fg(palette.muted);
    let updated = app.dataset.loaded_at.format("%Y-%m-%d %H:%M").to_string();

    let lines = vec![
        Line::from(vec![
            Span::styled(TITLE, Style::new().fg(palette.title).add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled("● LIVE", Style::new().fg(palette.live).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled(SUBTITLE, muted),
            Span::styled("  |  source: ", muted),
            Span::styled(app.dataset.source.clone(), Style::new().fg(palette.text)),
            Span::styled("  |  updated: ", muted),
            Span::styled(updated, Style::new().fg(palette.text)),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::new().fg(palette.border))
        .style(Style::new().bg(palette.background));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_metrics(frame: &mut Frame, metrics: &Metrics, palette: &Palette, area: Rect) {
    let cards = [
        ("Total Events", metrics.total.to_string(), palette.accent),
        ("New", metrics.new.to_string(), palette.grade2),
        ("Ongoing", metrics.ongoing.to_string(), palette.grade1),
        ("Outbreaks", metrics.outbreaks.to_string(), palette.grade3),
        ("Countries", metrics.distinct_countries.to_string(), palette.title),
        (
            "Cases / Deaths",
            format!("{} / {}", metrics.total_cases, metrics.total_deaths),
            palette.text,
        ),
    ];
    let slots = Layout::horizontal(cards.iter().map(|_| Constraint::Ratio(1, cards.len() as u32))).split(area);

    for ((label, value, color), slot) in cards.into_iter().zip(slots.iter()) {
        let card = Paragraph::new(vec![
            Line::from(Span::styled(value, Style::new().fg(color).add_modifier(Modifier::BOLD))),
            Line::from(Span::styled(label, Style::new().fg(palette.muted))),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::new().fg(palette.border))
                .style(Style::new().bg(palette.panel)),
        );
        frame.render_widget(card, *slot);
    }
}

fn render_sidebar(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let [grade, country, disease, event_type, year, search, summary] = Layout::vertical([
        Constraint::Length(Grade::ALL.len() as u16 + 2),
        Constraint::Min(4),
        Constraint::Min(4),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(3),
        Constraint::Length(Grade::ALL.len() as u16 + 2),
    ])
    .areas(area);

    for (dimension, slot) in Dimension::ALL.into_iter().zip([grade, country, disease, event_type, year]) {
        render_filter_list(frame, app, dimension, palette, slot);
    }
    render_search(frame, app, palette, search);
    render_grade_summary(frame, app, palette, summary);
}

fn render_filter_list(frame: &mut Frame, app: &App, dimension: Dimension, palette: &Palette, area: Rect) {
    let focused = app.focus == dimension && app.mode == InputMode::Normal;
    let selected = app.criteria.selected_count(dimension);
    let title = if selected > 0 {
        format!("{} ({selected})", dimension.title())
    } else {
        dimension.title().to_string()
    };

    let items: Vec<ListItem> = app
        .options
        .values(dimension)
        .into_iter()
        .map(|value| {
            let checked = app.criteria.is_selected(&value);
            let mark = if checked { "[x] " } else { "[ ] " };
            let color = match &value {
                FilterValue::Grade(g) => palette.grade(*g),
                _ => palette.text,
            };
            ListItem::new(Line::from(vec![
                Span::styled(mark, Style::new().fg(if checked { palette.accent } else { palette.muted })),
                Span::styled(value.label(), Style::new().fg(color)),
            ]))
        })
        .collect();

    let mut list = List::new(items).block(panel(&title, palette, focused));
    if focused {
        list = list.highlight_style(Style::new().bg(palette.border).add_modifier(Modifier::BOLD));
    }
    let mut state = ListState::default().with_selected(Some(app.cursor(dimension)));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_search(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let searching = app.mode == InputMode::Search;
    let line = if app.search_input.is_empty() && !searching {
        Line::from(Span::styled("/ to search", Style::new().fg(palette.muted)))
    } else {
        let cursor = if searching { "_" } else { "" };
        Line::from(Span::styled(format!("{}{cursor}", app.search_input), Style::new().fg(palette.text)))
    };
    frame.render_widget(Paragraph::new(line).block(panel("Search", palette, searching)), area);
}

fn render_grade_summary(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let lines: Vec<Line> = Grade::ALL
        .into_iter()
        .map(|grade| {
            Line::from(vec![
                Span::styled("● ", Style::new().fg(palette.grade(grade))),
                Span::styled(format!("{:<10}", grade.label()), Style::new().fg(palette.text)),
                Span::styled(
                    app.grade_summary.count(grade).to_string(),
                    Style::new().fg(palette.title).add_modifier(Modifier::BOLD),
                ),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).block(panel("Grade Summary", palette, false)), area);
}

fn render_map(frame: &mut Frame, app: &App, markers: &[MapMarker], palette: &Palette, area: Rect) {
    let block = panel("Event Map", palette, false);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Braille gives 2x4 resolution per character
    let mut viewport = app.viewport.clone();
    viewport.width = inner.width as usize * 2;
    viewport.height = inner.height as usize * 4;

    let layers = app
        .map_renderer
        .render(inner.width as usize, inner.height as usize, &viewport, markers);

    frame.render_widget(
        MapWidget {
            layers,
            palette: *palette,
            cursor: app.cursor_cell(),
        },
        inner,
    );

    if markers.is_empty() && app.load_error.is_none() {
        let y = inner.y + inner.height / 2;
        let message = Paragraph::new(Span::styled(NO_LOCATIONS, Style::new().fg(palette.muted)))
            .alignment(Alignment::Center);
        frame.render_widget(message, Rect::new(inner.x, y, inner.width, inner.height.min(1)));
    }

    if let (Some(marker), Some((cx, cy))) = (&app.hovered, app.cursor_cell()) {
        render_tooltip(frame, marker, palette, inner, cx, cy);
    }
}

/// Braille layers with per-cell marker colors and text overlays
struct MapWidget {
    layers: MapLayers,
    palette: Palette,
    cursor: Option<(u16, u16)>,
}

impl MapWidget {
    fn render_layer(canvas: &BrailleCanvas, color: Color, area: Rect, buf: &mut Buffer) {
        if canvas.is_blank() {
            return;
        }
        let rows = canvas.height().min(area.height as usize);
        let cols = canvas.width().min(area.width as usize);
        for row in 0..rows {
            for col in 0..cols {
                let Some((ch, tint)) = canvas.cell(col, row) else {
                    continue;
                };
                if ch == BRAILLE_BLANK {
                    continue;
                }
                let fg = tint.map_or(color, |t| Color::Rgb(t.rgb[0], t.rgb[1], t.rgb[2]));
                buf[(area.x + col as u16, area.y + row as u16)].set_char(ch).set_fg(fg);
            }
        }
    }
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Self::render_layer(&self.layers.coastlines, self.palette.coastline, area, buf);
        Self::render_layer(&self.layers.borders, self.palette.borders, area, buf);
        Self::render_layer(&self.layers.markers, self.palette.text, area, buf);

        let label_style = Style::new().fg(self.palette.text).add_modifier(Modifier::BOLD);
        for (lx, ly, text) in &self.layers.labels {
            if *ly >= area.height || *lx >= area.width {
                continue;
            }
            let room = (area.width - *lx) as usize;
            for (i, ch) in text.chars().take(room.min(24)).enumerate() {
                buf[(area.x + *lx + i as u16, area.y + *ly)].set_char(ch).set_style(label_style);
            }
        }

        if let Some((cx, cy)) = self.cursor {
            if cx < area.width && cy < area.height {
                buf[(area.x + cx, area.y + cy)].set_char('╋').set_fg(self.palette.cursor);
            }
        }
    }
}

fn render_tooltip(frame: &mut Frame, marker: &MapMarker, palette: &Palette, inner: Rect, cx: u16, cy: u16) {
    let count = count_text;
    let lines = vec![
        Line::from(Span::styled(
            marker.country.clone(),
            Style::new().fg(palette.title).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(marker.disease.clone(), Style::new().fg(palette.text)),
            Span::raw(" "),
            Span::styled(format!("({})", marker.grade), Style::new().fg(palette.grade(marker.grade))),
        ]),
        Line::from(Span::styled(marker.location.clone(), Style::new().fg(palette.muted))),
        Line::from(Span::styled(
            format!("Cases: {}  Deaths: {}", count(marker.cases), count(marker.deaths)),
            Style::new().fg(palette.text),
        )),
    ];

    let width = lines.iter().map(Line::width).max().unwrap_or(0) as u16 + 2;
    let height = lines.len() as u16 + 2;
    let width = width.min(inner.width);
    let height = height.min(inner.height);

    // Prefer right of and below the cursor, flip when it would overflow
    let mut x = inner.x + cx + 2;
    if x + width > inner.x + inner.width {
        x = (inner.x + cx).saturating_sub(width + 1).max(inner.x);
    }
    let mut y = inner.y + cy + 1;
    if y + height > inner.y + inner.height {
        y = (inner.y + cy).saturating_sub(height).max(inner.y);
    }

    let area = Rect::new(x, y, width, height);
    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(panel("Event", palette, true)), area);
}

fn render_feed(frame: &mut Frame, feed: &[Signal], palette: &Palette, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();
    if feed.is_empty() {
        lines.push(Line::from(Span::styled("No matching signals", Style::new().fg(palette.muted))));
    }

    for signal in feed {
        let count = count_text;
        let date = signal
            .report_date
            .map_or_else(|| "undated".to_string(), |d| d.format("%d %b %Y").to_string());

        lines.push(Line::from(vec![
            Span::styled(format!("#{} ", signal.rank), Style::new().fg(palette.muted)),
            Span::styled(
                signal.country.clone(),
                Style::new().fg(palette.title).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(
                format!("[{}]", signal.grade),
                Style::new().fg(palette.grade(signal.grade)).add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::from(vec![
            Span::styled(signal.disease.clone(), Style::new().fg(palette.text)),
            Span::styled(
                format!(" · {} · {}", signal.status, signal.event_type),
                Style::new().fg(palette.muted),
            ),
        ]));
        lines.push(Line::from(Span::styled(
            format!("Cases: {}  Deaths: {}  {date}", count(signal.cases), count(signal.deaths)),
            Style::new().fg(palette.muted),
        )));
        if !signal.description.is_empty() {
            lines.push(Line::from(Span::styled(signal.description.clone(), Style::new().fg(palette.text))));
        }
        lines.push(Line::default());
    }

    let feed = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(panel("Recent Signals", palette, false));
    frame.render_widget(feed, area);
}

fn render_ticker(frame: &mut Frame, app: &App, window: &str, palette: &Palette, area: Rect) {
    let text = if window.is_empty() {
        if app.load_error.is_some() { "Feed unavailable" } else { "No recent signals" }.to_string()
    } else {
        window.to_string()
    };
    let line = Line::from(Span::styled(text, Style::new().fg(palette.text)));
    frame.render_widget(Paragraph::new(line).style(Style::new().bg(palette.panel)), area);
}

fn render_error(frame: &mut Frame, message: &str, palette: &Palette, map: Rect) {
    let width = map.width.saturating_sub(8).clamp(10, 72).min(map.width);
    let height = map.height.min(6);
    let area = Rect::new(
        map.x + (map.width - width) / 2,
        map.y + (map.height - height) / 2,
        width,
        height,
    );

    let body = vec![
        Line::from(Span::styled(message.to_string(), Style::new().fg(palette.text))),
        Line::default(),
        Line::from(Span::styled("Press r to retry", Style::new().fg(palette.muted))),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::new().fg(palette.error))
        .style(Style::new().bg(palette.panel))
        .title(Span::styled(
            " Data source unavailable ",
            Style::new().fg(palette.error).add_modifier(Modifier::BOLD),
        ));

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(body).wrap(Wrap { trim: true }).block(block), area);
}

fn render_detail(frame: &mut Frame, detail: &Detail, rows: &[&Event], palette: &Palette, over: Rect) {
    let width = over.width.saturating_sub(6).min(76);
    let height = over.height.saturating_sub(2).min(24);
    let area = Rect::new(
        over.x + (over.width - width) / 2,
        over.y + (over.height - height) / 2,
        width,
        height,
    );

    let event = &detail.event;
    let related = related_events(event, rows, RELATED_LEN);
    let tab_style = |tab: DetailTab| {
        if detail.tab == tab {
            Style::new().fg(palette.accent).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::new().fg(palette.muted)
        }
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!("[{}] ", event.grade),
                Style::new().fg(palette.grade(event.grade)).add_modifier(Modifier::BOLD),
            ),
            Span::styled(event.disease.clone(), Style::new().fg(palette.title).add_modifier(Modifier::BOLD)),
            Span::styled(format!(" in {}", event.country), Style::new().fg(palette.text)),
        ]),
        Line::from(vec![
            Span::styled("Details", tab_style(DetailTab::Details)),
            Span::raw("   "),
            Span::styled(format!("Related ({})", related.len()), tab_style(DetailTab::Related)),
        ]),
        Line::default(),
    ];
    match detail.tab {
        DetailTab::Details => lines.extend(detail_lines(event, palette)),
        DetailTab::Related => lines.extend(related_lines(&related, palette)),
    }

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(panel("Event Detail", palette, true)),
        area,
    );
}

fn field(label: &'static str, value: String, palette: &Palette) -> Vec<Span<'static>> {
    vec![
        Span::styled(format!("{label}: "), Style::new().fg(palette.muted)),
        Span::styled(value, Style::new().fg(palette.text)),
    ]
}

fn field_pair(left: Vec<Span<'static>>, right: Vec<Span<'static>>) -> Line<'static> {
    let mut spans = left;
    spans.push(Span::raw("   "));
    spans.extend(right);
    Line::from(spans)
}

fn detail_lines(event: &Event, palette: &Palette) -> Vec<Line<'static>> {
    let fatality = event
        .cases
        .zip(event.deaths)
        .and_then(|(cases, deaths)| case_fatality_rate(cases, deaths));
    let reported = event
        .report_date
        .map_or_else(|| "undated".to_string(), |d| d.format("%d %b %Y").to_string());
    let year = event.year.map_or_else(|| "n/a".to_string(), |y| y.to_string());
    let coordinates = match event.position() {
        Some((lon, lat)) => format!("{lat:.4}, {lon:.4}"),
        None => "not located".to_string(),
    };
    let description = if event.description.is_empty() {
        "No description provided".to_string()
    } else {
        event.description.clone()
    };

    vec![
        field_pair(
            field("Status", event.status.to_string(), palette),
            field("Type", event.event_type.clone(), palette),
        ),
        field_pair(
            field("Cases", count_text(event.cases), palette),
            field("Deaths", count_text(event.deaths), palette),
        ),
        Line::from(field("Case fatality", percent_text(fatality), palette)),
        field_pair(field("Reported", reported, palette), field("Year", year, palette)),
        Line::from(field("Location", event.location.clone(), palette)),
        Line::from(field("Coordinates", coordinates, palette)),
        Line::default(),
        Line::from(Span::styled(
            "Description",
            Style::new().fg(palette.title).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(description, Style::new().fg(palette.text))),
    ]
}

fn related_lines(related: &[&Event], palette: &Palette) -> Vec<Line<'static>> {
    if related.is_empty() {
        return vec![Line::from(Span::styled(
            "No related events in the current view",
            Style::new().fg(palette.muted),
        ))];
    }
    related
        .iter()
        .map(|event| {
            let date = event
                .report_date
                .map_or_else(|| "undated   ".to_string(), |d| d.format("%Y-%m-%d").to_string());
            Line::from(vec![
                Span::styled(format!("{date}  "), Style::new().fg(palette.muted)),
                Span::styled(format!("[{}] ", event.grade), Style::new().fg(palette.grade(event.grade))),
                Span::styled(event.country.clone(), Style::new().fg(palette.title)),
                Span::styled(format!(" · {}", event.disease), Style::new().fg(palette.text)),
            ])
        })
        .collect()
}

/// Charts and a burden table over the filtered rows, in place of map and feed
fn render_analytics(frame: &mut Frame, view: &FilteredView, palette: &Palette, area: Rect) {
    let [summary, charts, table] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(8),
        Constraint::Length(BURDEN_LEN as u16 + 3),
    ])
    .areas(area);
    let [diseases, grades] =
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(charts);

    let metrics = &view.metrics;
    let grade_counts = GradeSummary::tally(view.rows.iter().copied());
    let per_event = metrics
        .cases_per_event()
        .map_or_else(|| "N/A".to_string(), |n| n.to_string());

    let mut spans = Vec::new();
    for (label, value) in [
        ("Events", metrics.total.to_string()),
        ("Cases", metrics.total_cases.to_string()),
        ("Deaths", metrics.total_deaths.to_string()),
        ("CFR", percent_text(metrics.case_fatality_rate())),
        ("Cases/event", per_event),
        ("Grade 3", grade_counts.grade3.to_string()),
    ] {
        spans.extend(field(label, value, palette));
        spans.push(Span::raw("   "));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(panel("Analytics", palette, false)),
        summary,
    );

    render_disease_chart(frame, &view.rows, palette, diseases);
    render_grade_chart(frame, &grade_counts, palette, grades);
    render_burden_table(frame, &view.rows, palette, table);
}

fn render_disease_chart(frame: &mut Frame, rows: &[&Event], palette: &Palette, area: Rect) {
    let block = panel("Disease Distribution", palette, false);
    let distribution = disease_distribution(rows.iter().copied(), DISEASE_CHART_LEN);
    if distribution.is_empty() {
        let empty = Paragraph::new(Span::styled("No events", Style::new().fg(palette.muted)));
        frame.render_widget(empty.block(block), area);
        return;
    }

    let bars: Vec<Bar> = distribution
        .iter()
        .enumerate()
        .map(|(i, (disease, count))| {
            let color = CHART_COLORS[i % CHART_COLORS.len()];
            Bar::default()
                .value(*count)
                .label(Line::from(disease.clone()))
                .style(Style::new().fg(color))
                .value_style(Style::new().fg(palette.panel).bg(color))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(1)
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, area);
}

fn render_grade_chart(frame: &mut Frame, grades: &GradeSummary, palette: &Palette, area: Rect) {
    let slots = Grade::ALL.len() as u16;
    let bar_width = (area.width.saturating_sub(2) / slots).saturating_sub(1).max(1);

    let bars: Vec<Bar> = Grade::ALL
        .into_iter()
        .map(|grade| {
            let count = grades.count(grade);
            let color = palette.grade(grade);
            Bar::default()
                .value(count as u64)
                .text_value(format!("{count} ({:.0}%)", grades.share(grade)))
                .label(Line::from(grade.label()))
                .style(Style::new().fg(color))
                .value_style(Style::new().fg(palette.panel).bg(color))
        })
        .collect();

    let chart = BarChart::default()
        .block(panel("Grade Severity", palette, false))
        .bar_width(bar_width)
        .bar_gap(1)
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, area);
}

fn render_burden_table(frame: &mut Frame, rows: &[&Event], palette: &Palette, area: Rect) {
    let header = Row::new(["Disease", "Events", "Cases", "Deaths", "CFR"])
        .style(Style::new().fg(palette.muted).add_modifier(Modifier::BOLD));
    let body: Vec<Row> = disease_burden(rows.iter().copied(), BURDEN_LEN)
        .into_iter()
        .map(|burden| {
            let fatality = percent_text(burden.case_fatality_rate());
            Row::new([
                burden.disease,
                burden.events.to_string(),
                burden.cases.to_string(),
                burden.deaths.to_string(),
                fatality,
            ])
            .style(Style::new().fg(palette.text))
        })
        .collect();

    let widths = [
        Constraint::Min(18),
        Constraint::Length(8),
        Constraint::Length(10),
        Constraint::Length(8),
        Constraint::Length(8),
    ];
    let table = Table::new(body, widths)
        .header(header)
        .block(panel("Top Diseases by Cases", palette, false));
    frame.render_widget(table, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let muted = Style::new().fg(palette.muted);
    let mut spans = vec![
        Span::styled(" Zoom: ", muted),
        Span::styled(app.zoom_level(), Style::new().fg(palette.accent)),
        Span::styled(" (", muted),
        Span::styled(app.lod_level(), Style::new().fg(palette.title)),
        Span::styled(") | ", muted),
        Span::styled(app.center_coords(), Style::new().fg(palette.text)),
        Span::styled(" | ", muted),
    ];

    if let Some(notice) = &app.notice {
        spans.push(Span::styled(notice.clone(), Style::new().fg(palette.accent)));
        spans.push(Span::styled(" | ", muted));
    }

    let hints = if app.detail.is_some() {
        "↑↓:prev/next Tab:related m:show on map Esc:close"
    } else if app.mode == InputMode::Search {
        "type to search  Enter:keep  Esc:cancel"
    } else {
        "Tab:filter ↑↓:move Space:toggle /:search d:details a:analytics t:theme r:refresh e:export f:fit q:quit"
    };
    spans.push(Span::styled(hints, muted));

    frame.render_widget(Paragraph::new(Line::from(spans)).style(Style::new().bg(palette.background)), area);
}
