use super::options::{Dimension, FilterValue};
use crate::dataset::{Event, Grade};
use std::collections::BTreeSet;

/// Search queries shorter than this (after trimming) match everything
pub const MIN_SEARCH_CHARS: usize = 2;

/// User-selected filter state. Each set is a membership test for its
/// dimension; an empty set passes every row. Dimensions combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub grades: BTreeSet<Grade>,
    pub countries: BTreeSet<String>,
    pub diseases: BTreeSet<String>,
    pub event_types: BTreeSet<String>,
    pub years: BTreeSet<i32>,
    /// Free-text query over country, disease, description, type and grade
    pub search: Option<String>,
}

#[inline]
fn admits<T: Ord>(selected: &BTreeSet<T>, value: &T) -> bool {
    selected.is_empty() || selected.contains(value)
}

fn flip<T: Ord>(set: &mut BTreeSet<T>, value: T) {
    if !set.remove(&value) {
        set.insert(value);
    }
}

impl FilterCriteria {
    /// No dimension constrained and no effective search
    pub fn is_empty(&self) -> bool {
        self.grades.is_empty()
            && self.countries.is_empty()
            && self.diseases.is_empty()
            && self.event_types.is_empty()
            && self.years.is_empty()
            && self.search_needle().is_none()
    }

    /// Lower-cased query, if long enough to constrain anything
    fn search_needle(&self) -> Option<String> {
        let query = self.search.as_deref()?.trim();
        (query.chars().count() >= MIN_SEARCH_CHARS).then(|| query.to_lowercase())
    }

    pub fn matches(&self, event: &Event) -> bool {
        self.matches_with(event, self.search_needle().as_deref())
    }

    fn matches_with(&self, event: &Event, needle: Option<&str>) -> bool {
        admits(&self.grades, &event.grade)
            && admits(&self.countries, &event.country)
            && admits(&self.diseases, &event.disease)
            && admits(&self.event_types, &event.event_type)
            && (self.years.is_empty() || event.year.is_some_and(|y| self.years.contains(&y)))
            && needle.map_or(true, |n| text_matches(event, n))
    }

    /// Rows passing every constraint, in input order
    pub fn apply<'a, I>(&self, rows: I) -> Vec<&'a Event>
    where
        I: IntoIterator<Item = &'a Event>,
    {
        let needle = self.search_needle();
        rows.into_iter()
            .filter(|event| self.matches_with(event, needle.as_deref()))
            .collect()
    }

    pub fn is_selected(&self, value: &FilterValue) -> bool {
        match value {
            FilterValue::Grade(g) => self.grades.contains(g),
            FilterValue::Country(s) => self.countries.contains(s),
            FilterValue::Disease(s) => self.diseases.contains(s),
            FilterValue::EventType(s) => self.event_types.contains(s),
            FilterValue::Year(y) => self.years.contains(y),
        }
    }

    /// Add the value to its dimension, or remove it if already selected
    pub fn toggle(&mut self, value: FilterValue) {
        match value {
            FilterValue::Grade(g) => flip(&mut self.grades, g),
            FilterValue::Country(s) => flip(&mut self.countries, s),
            FilterValue::Disease(s) => flip(&mut self.diseases, s),
            FilterValue::EventType(s) => flip(&mut self.event_types, s),
            FilterValue::Year(y) => flip(&mut self.years, y),
        }
    }

    pub fn selected_count(&self, dimension: Dimension) -> usize {
        match dimension {
            Dimension::Grade => self.grades.len(),
            Dimension::Country => self.countries.len(),
            Dimension::Disease => self.diseases.len(),
            Dimension::EventType => self.event_types.len(),
            Dimension::Year => self.years.len(),
        }
    }

    pub fn clear_dimension(&mut self, dimension: Dimension) {
        match dimension {
            Dimension::Grade => self.grades.clear(),
            Dimension::Country => self.countries.clear(),
            Dimension::Disease => self.diseases.clear(),
            Dimension::EventType => self.event_types.clear(),
            Dimension::Year => self.years.clear(),
        }
    }

    /// Reset every dimension and the search
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

fn text_matches(event: &Event, needle: &str) -> bool {
    [
        event.country.as_str(),
        event.disease.as_str(),
        event.description.as_str(),
        event.event_type.as_str(),
        event.grade.label(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{sample_events, Status};

    fn event(country: &str, disease: &str, grade: Grade) -> Event {
        Event {
            country: country.into(),
            disease: disease.into(),
            grade,
            status: Status::Ongoing,
            event_type: "Outbreak".into(),
            year: Some(2025),
            ..Default::default()
        }
    }

    fn three() -> Vec<Event> {
        vec![
            event("Kenya", "Cholera", Grade::Grade3),
            event("Nigeria", "Ebola", Grade::Grade3),
            event("Ghana", "Measles", Grade::Grade1),
        ]
    }

    #[test]
    fn test_empty_criteria_returns_everything_in_order() {
        let events = sample_events();
        let criteria = FilterCriteria::default();
        assert!(criteria.is_empty());
        let rows = criteria.apply(&events);
        assert_eq!(rows.len(), events.len());
        assert!(rows.iter().zip(&events).all(|(a, b)| std::ptr::eq(*a, b)));
    }

    #[test]
    fn test_grade_membership() {
        let events = three();
        let mut criteria = FilterCriteria::default();
        criteria.toggle(FilterValue::Grade(Grade::Grade3));
        let rows = criteria.apply(&events);
        let countries: Vec<_> = rows.iter().map(|e| e.country.as_str()).collect();
        assert_eq!(countries, ["Kenya", "Nigeria"]);
    }

    #[test]
    fn test_multiple_values_or_within_dimension_and_across() {
        let events = three();
        let mut criteria = FilterCriteria::default();
        criteria.toggle(FilterValue::Country("Kenya".into()));
        criteria.toggle(FilterValue::Country("Ghana".into()));
        assert_eq!(criteria.apply(&events).len(), 2);

        criteria.toggle(FilterValue::Grade(Grade::Grade1));
        let rows = criteria.apply(&events);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].country, "Ghana");
    }

    #[test]
    fn test_unknown_country_yields_empty() {
        let events = three();
        let mut criteria = FilterCriteria::default();
        criteria.toggle(FilterValue::Country("Atlantis".into()));
        assert!(criteria.apply(&events).is_empty());
    }

    #[test]
    fn test_idempotent_and_subset() {
        let events = sample_events();
        let mut criteria = FilterCriteria::default();
        criteria.toggle(FilterValue::Disease("Cholera".into()));
        criteria.toggle(FilterValue::Grade(Grade::Grade2));
        let once = criteria.apply(&events);
        let twice = criteria.apply(once.iter().copied());
        assert_eq!(once, twice);
        assert!(once.len() <= events.len());
        assert!(once.iter().all(|e| events.iter().any(|x| std::ptr::eq(x, *e))));
    }

    #[test]
    fn test_year_excludes_rows_without_year() {
        let mut events = three();
        events[1].year = None;
        let mut criteria = FilterCriteria::default();
        criteria.toggle(FilterValue::Year(2025));
        assert_eq!(criteria.apply(&events).len(), 2);
    }

    #[test]
    fn test_toggle_twice_deselects() {
        let mut criteria = FilterCriteria::default();
        criteria.toggle(FilterValue::EventType("Outbreak".into()));
        assert!(criteria.is_selected(&FilterValue::EventType("Outbreak".into())));
        criteria.toggle(FilterValue::EventType("Outbreak".into()));
        assert!(criteria.is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive_and_needs_two_chars() {
        let events = three();
        let mut criteria = FilterCriteria {
            search: Some("e".into()),
            ..Default::default()
        };
        assert!(criteria.is_empty());
        assert_eq!(criteria.apply(&events).len(), 3);

        criteria.search = Some("  EBO ".into());
        let rows = criteria.apply(&events);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].country, "Nigeria");

        criteria.search = Some("grade 1".into());
        assert_eq!(criteria.apply(&events)[0].country, "Ghana");
    }

    #[test]
    fn test_clear_dimension_leaves_others() {
        let mut criteria = FilterCriteria::default();
        criteria.toggle(FilterValue::Grade(Grade::Grade3));
        criteria.toggle(FilterValue::Year(2024));
        criteria.clear_dimension(Dimension::Grade);
        assert_eq!(criteria.selected_count(Dimension::Grade), 0);
        assert_eq!(criteria.selected_count(Dimension::Year), 1);
        criteria.clear();
        assert!(criteria.is_empty());
    }
}
