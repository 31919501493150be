//! Aggregates for the analytics screen and the event detail popup

use super::feed::by_recency;
use crate::dataset::Event;
use std::collections::BTreeMap;

/// Bars in the disease distribution chart
pub const DISEASE_CHART_LEN: usize = 8;
/// Rows in the disease burden table
pub const BURDEN_LEN: usize = 5;
/// Entries on the detail popup's related tab
pub const RELATED_LEN: usize = 8;

/// Deaths per hundred cases. `None` without any cases.
pub fn case_fatality_rate(cases: u64, deaths: u64) -> Option<f64> {
    (cases > 0).then(|| deaths as f64 / cases as f64 * 100.0)
}

/// Rows per disease, most frequent first. Ties go alphabetically.
pub fn disease_distribution<'a>(
    rows: impl IntoIterator<Item = &'a Event>,
    limit: usize,
) -> Vec<(String, u64)> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for event in rows {
        if !event.disease.is_empty() {
            *counts.entry(event.disease.as_str()).or_default() += 1;
        }
    }

    let mut out: Vec<(String, u64)> = counts
        .into_iter()
        .map(|(disease, count)| (disease.to_string(), count))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out.truncate(limit);
    out
}

/// Case and death totals for one disease
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiseaseBurden {
    pub disease: String,
    pub events: usize,
    pub cases: u64,
    pub deaths: u64,
}

impl DiseaseBurden {
    pub fn case_fatality_rate(&self) -> Option<f64> {
        case_fatality_rate(self.cases, self.deaths)
    }
}

/// Diseases ranked by total cases, highest first
pub fn disease_burden<'a>(rows: impl IntoIterator<Item = &'a Event>, limit: usize) -> Vec<DiseaseBurden> {
    let mut by_disease: BTreeMap<&str, DiseaseBurden> = BTreeMap::new();
    for event in rows {
        if event.disease.is_empty() {
            continue;
        }
        let entry = by_disease
            .entry(event.disease.as_str())
            .or_insert_with(|| DiseaseBurden {
                disease: event.disease.clone(),
                events: 0,
                cases: 0,
                deaths: 0,
            });
        entry.events += 1;
        entry.cases = entry.cases.saturating_add(event.cases.unwrap_or(0));
        entry.deaths = entry.deaths.saturating_add(event.deaths.unwrap_or(0));
    }

    let mut out: Vec<DiseaseBurden> = by_disease.into_values().collect();
    out.sort_by(|a, b| b.cases.cmp(&a.cases));
    out.truncate(limit);
    out
}

/// Other rows sharing the event's country or disease, most recent first
pub fn related_events<'a>(event: &Event, rows: &[&'a Event], limit: usize) -> Vec<&'a Event> {
    let related = rows.iter().copied().filter(|other| {
        **other != *event
            && ((!event.country.is_empty() && other.country == event.country)
                || (!event.disease.is_empty() && other.disease == event.disease))
    });
    let mut sorted = by_recency(related);
    sorted.truncate(limit);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::sample_events;
    use chrono::NaiveDate;

    fn event(country: &str, disease: &str, cases: u64, deaths: u64, day: u32) -> Event {
        Event {
            country: country.into(),
            disease: disease.into(),
            cases: Some(cases),
            deaths: Some(deaths),
            report_date: NaiveDate::from_ymd_opt(2025, 1, day),
            ..Default::default()
        }
    }

    #[test]
    fn test_case_fatality_rate() {
        assert_eq!(case_fatality_rate(200, 5), Some(2.5));
        assert_eq!(case_fatality_rate(10, 0), Some(0.0));
        assert_eq!(case_fatality_rate(0, 3), None);
    }

    #[test]
    fn test_disease_distribution_orders_and_limits() {
        let events = vec![
            event("A", "Mpox", 1, 0, 1),
            event("B", "Cholera", 1, 0, 1),
            event("C", "Mpox", 1, 0, 1),
            event("D", "Anthrax", 1, 0, 1),
            event("E", "", 1, 0, 1),
        ];
        let dist = disease_distribution(&events, 2);
        assert_eq!(dist, [("Mpox".to_string(), 2), ("Anthrax".to_string(), 1)]);
    }

    #[test]
    fn test_distribution_covers_sample() {
        let events = sample_events();
        let dist = disease_distribution(&events, usize::MAX);
        assert_eq!(dist.iter().map(|(_, n)| n).sum::<u64>(), 20);
        assert!(dist.windows(2).all(|w| w[0].1 >= w[1].1));
        assert!(disease_distribution(&events, DISEASE_CHART_LEN).len() <= DISEASE_CHART_LEN);
    }

    #[test]
    fn test_disease_burden_sums_and_ranks() {
        let events = vec![
            event("A", "Cholera", 100, 4, 1),
            event("B", "Cholera", 50, 2, 2),
            event("C", "Mpox", 400, 0, 3),
            event("D", "Measles", 10, 1, 4),
        ];
        let burden = disease_burden(&events, BURDEN_LEN);
        assert_eq!(burden.len(), 3);
        assert_eq!(burden[0].disease, "Mpox");
        assert_eq!((burden[1].events, burden[1].cases, burden[1].deaths), (2, 150, 6));
        assert_eq!(burden[1].case_fatality_rate(), Some(4.0));
        assert_eq!(burden[2].disease, "Measles");
    }

    #[test]
    fn test_burden_saturates() {
        let events = vec![event("A", "Cholera", u64::MAX, 0, 1), event("B", "Cholera", 5, 0, 1)];
        assert_eq!(disease_burden(&events, 1)[0].cases, u64::MAX);
    }

    #[test]
    fn test_related_shares_country_or_disease() {
        let events = vec![
            event("Kenya", "Cholera", 1, 0, 5),
            event("Kenya", "Measles", 1, 0, 3),
            event("Ghana", "Cholera", 1, 0, 9),
            event("Chad", "Mpox", 1, 0, 7),
        ];
        let rows: Vec<&Event> = events.iter().collect();
        let related = related_events(&events[0], &rows, RELATED_LEN);
        let names: Vec<_> = related.iter().map(|e| e.country.as_str()).collect();
        assert_eq!(names, ["Ghana", "Kenya"]);
        assert_eq!(related_events(&events[0], &rows, 1).len(), 1);
    }

    #[test]
    fn test_related_skips_a_copy_of_the_event() {
        let events = vec![event("Kenya", "Cholera", 1, 0, 5)];
        let rows: Vec<&Event> = events.iter().collect();
        let copy = events[0].clone();
        assert!(related_events(&copy, &rows, RELATED_LEN).is_empty());
    }
}
