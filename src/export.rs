//! CSV export of the filtered rows

use crate::dataset::Event;
use chrono::NaiveDate;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "Country")]
    country: &'a str,
    #[serde(rename = "Disease")]
    disease: &'a str,
    #[serde(rename = "Grade")]
    grade: &'static str,
    #[serde(rename = "Event Type")]
    event_type: &'a str,
    #[serde(rename = "Status")]
    status: &'a str,
    #[serde(rename = "Cases")]
    cases: Option<u64>,
    #[serde(rename = "Deaths")]
    deaths: Option<u64>,
    #[serde(rename = "Description")]
    description: &'a str,
    #[serde(rename = "Report Date")]
    report_date: Option<String>,
    #[serde(rename = "Latitude")]
    latitude: Option<f64>,
    #[serde(rename = "Longitude")]
    longitude: Option<f64>,
}

impl<'a> From<&'a Event> for ExportRow<'a> {
    fn from(e: &'a Event) -> Self {
        Self {
            country: &e.country,
            disease: &e.disease,
            grade: e.grade.label(),
            event_type: &e.event_type,
            status: e.status.label(),
            cases: e.cases,
            deaths: e.deaths,
            description: &e.description,
            report_date: e.report_date.map(|d| d.format("%Y-%m-%d").to_string()),
            latitude: e.lat,
            longitude: e.lon,
        }
    }
}

/// Header row written even when there are no rows
const HEADERS: [&str; 11] = [
    "Country",
    "Disease",
    "Grade",
    "Event Type",
    "Status",
    "Cases",
    "Deaths",
    "Description",
    "Report Date",
    "Latitude",
    "Longitude",
];

/// Write `rows` as CSV, returning how many data rows went out
pub fn write_csv<'a, W: Write>(
    rows: impl IntoIterator<Item = &'a Event>,
    writer: W,
) -> Result<usize, csv::Error> {
    let mut out = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    out.write_record(HEADERS)?;

    let mut written = 0;
    for event in rows {
        out.serialize(ExportRow::from(event))?;
        written += 1;
    }
    out.flush()?;
    Ok(written)
}

/// `signals-YYYY-MM-DD.csv`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("signals-{}.csv", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::sample_events;

    #[test]
    fn test_headers_and_row_count() {
        let events = sample_events();
        let mut buf = Vec::new();
        let n = write_csv(events.iter().take(3), &mut buf).unwrap();
        assert_eq!(n, 3);

        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Country,Disease,Grade,Event Type,Status,Cases,Deaths,Description,Report Date,Latitude,Longitude")
        );
        let first = lines.next().unwrap();
        assert!(first.starts_with("Malawi,Cholera,Grade 2,Outbreak,Ongoing,26,0,"));
        assert!(first.contains(",2025-12-19,-13.9626,33.7741"));
        assert_eq!(text.lines().count(), 4);
    }

    #[test]
    fn test_empty_export_still_has_headers() {
        let mut buf = Vec::new();
        assert_eq!(write_csv(std::iter::empty(), &mut buf).unwrap(), 0);
        assert_eq!(String::from_utf8(buf).unwrap().lines().count(), 1);
    }

    #[test]
    fn test_missing_values_are_blank() {
        let event = Event {
            country: "Chad".into(),
            disease: "Hepatitis E".into(),
            ..Default::default()
        };
        let mut buf = Vec::new();
        write_csv([&event], &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().nth(1), Some("Chad,Hepatitis E,Ungraded,,,,,,,,"));
    }

    #[test]
    fn test_file_name() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(export_file_name(date), "signals-2025-03-07.csv");
    }
}
