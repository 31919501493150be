//! CSV decoding with header normalization

use super::event::{Event, Grade, Status};
use super::Dataset;
use crate::error::LoadError;
use crate::geo::{is_valid_latitude, is_valid_longitude};
use chrono::{Datelike, NaiveDate};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;
use tracing::{debug, info, warn};

/// Date layouts tried in order; ISO first, then day-first variants
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];

/// Resolved column positions for one CSV header row
struct Columns {
    country: Option<usize>,
    disease: Option<usize>,
    grade: Option<usize>,
    status: Option<usize>,
    event_type: Option<usize>,
    lat: Option<usize>,
    lon: Option<usize>,
    event_count: Option<usize>,
    location: Option<usize>,
    description: Option<usize>,
    cases: Option<usize>,
    deaths: Option<usize>,
    report_date: Option<usize>,
    year: Option<usize>,
    weekline: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Self {
        let names: Vec<String> = headers.iter().map(normalize_header).collect();
        let find = |aliases: &[&str]| {
            aliases
                .iter()
                .find_map(|alias| names.iter().position(|name| name == alias))
        };

        Self {
            country: find(&["country", "country_name"]),
            disease: find(&["disease", "disease_name", "pathogen"]),
            grade: find(&["grade", "grading"]),
            status: find(&["status"]),
            event_type: find(&["event_type", "eventtype", "type"]),
            lat: find(&["lat", "latitude"]),
            lon: find(&["lon", "lng", "long", "longitude"]),
            event_count: find(&["event_count", "count"]),
            location: find(&["location"]),
            description: find(&["description"]),
            cases: find(&["cases", "total_cases"]),
            deaths: find(&["deaths", "total_deaths"]),
            report_date: find(&["report_date", "reportdate", "date"]),
            year: find(&["year"]),
            weekline: find(&["weekline"]),
        }
    }

    /// Optional columns the dependent views need but the header lacks
    fn missing(&self) -> Vec<&'static str> {
        [
            ("country", self.country),
            ("disease", self.disease),
            ("grade", self.grade),
            ("status", self.status),
            ("event_type", self.event_type),
            ("lat", self.lat),
            ("lon", self.lon),
            ("event_count", self.event_count),
            ("location", self.location),
            ("description", self.description),
            ("cases", self.cases),
            ("deaths", self.deaths),
            ("report_date", self.report_date),
        ]
        .into_iter()
        .filter_map(|(name, idx)| idx.is_none().then_some(name))
        .collect()
    }

    fn event(&self, record: &StringRecord) -> Event {
        let text = |idx: Option<usize>| idx.and_then(|i| record.get(i)).unwrap_or("");

        let report_date = parse_date(text(self.report_date));
        let year = parse_year(text(self.year))
            .or_else(|| extract_year(text(self.weekline)))
            .or_else(|| report_date.map(|d| d.year()));

        Event {
            country: text(self.country).to_string(),
            disease: text(self.disease).to_string(),
            grade: Grade::parse(text(self.grade)),
            status: Status::parse(text(self.status)),
            event_type: text(self.event_type).to_string(),
            lat: parse_number(text(self.lat)).filter(|&v| is_valid_latitude(v)),
            lon: parse_number(text(self.lon)).filter(|&v| is_valid_longitude(v)),
            event_count: parse_count(text(self.event_count)),
            location: text(self.location).to_string(),
            description: text(self.description).to_string(),
            cases: parse_count(text(self.cases)),
            deaths: parse_count(text(self.deaths)),
            report_date,
            year,
        }
    }
}

/// "Report Date" -> "report_date"
fn normalize_header(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw.trim().chars().filter(|&c| c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Whole positive years only; anything else falls through to weekline
fn parse_year(raw: &str) -> Option<i32> {
    raw.trim().parse::<i32>().ok().filter(|&y| y > 0)
}

fn parse_count(raw: &str) -> Option<u64> {
    parse_number(raw).filter(|&v| v >= 0.0).map(|v| v.round() as u64)
}

/// Parse a calendar date, ignoring any time-of-day suffix
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let head = raw.trim().split(&['T', ' '][..]).next()?;
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(head, fmt).ok())
}

/// First run of four ASCII digits, e.g. "2024-W12" -> 2024
pub fn extract_year(text: &str) -> Option<i32> {
    text.as_bytes()
        .windows(4)
        .find(|w| w.iter().all(u8::is_ascii_digit))
        .and_then(|w| std::str::from_utf8(w).ok())
        .and_then(|digits| digits.parse().ok())
}

/// Decode an event table from CSV text. `source` labels the dataset and the
/// log lines.
pub fn parse_csv<R: Read>(reader: R, source: &str) -> Result<Dataset, LoadError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let columns = Columns::resolve(rdr.headers()?);
    if columns.country.is_none() && columns.disease.is_none() {
        return Err(LoadError::Malformed(format!(
            "{source}: neither a country nor a disease column"
        )));
    }

    let missing = columns.missing();
    for column in &missing {
        warn!(source, column, "column absent, dependent views will degrade");
    }

    let mut events = Vec::new();
    let mut dropped = 0usize;
    for record in rdr.records() {
        let event = columns.event(&record?);
        if event.country.is_empty() && event.disease.is_empty() {
            dropped += 1;
            continue;
        }
        events.push(event);
    }

    if dropped > 0 {
        debug!(source, dropped, "skipped rows without country or disease");
    }
    info!(source, rows = events.len(), "parsed event table");

    Ok(Dataset::new(events, source).with_missing_columns(missing))
}
