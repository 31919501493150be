use crate::dataset::{Dataset, Event, Grade};
use std::collections::BTreeSet;

/// One filterable column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Grade,
    Country,
    Disease,
    EventType,
    Year,
}

impl Dimension {
    pub const COUNT: usize = 5;
    pub const ALL: [Dimension; Self::COUNT] = [
        Dimension::Grade,
        Dimension::Country,
        Dimension::Disease,
        Dimension::EventType,
        Dimension::Year,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Dimension::Grade => "Grade",
            Dimension::Country => "Country",
            Dimension::Disease => "Disease",
            Dimension::EventType => "Event Type",
            Dimension::Year => "Year",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// A single selectable value, tagged with its dimension
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Grade(Grade),
    Country(String),
    Disease(String),
    EventType(String),
    Year(i32),
}

impl FilterValue {
    pub fn dimension(&self) -> Dimension {
        match self {
            FilterValue::Grade(_) => Dimension::Grade,
            FilterValue::Country(_) => Dimension::Country,
            FilterValue::Disease(_) => Dimension::Disease,
            FilterValue::EventType(_) => Dimension::EventType,
            FilterValue::Year(_) => Dimension::Year,
        }
    }

    pub fn label(&self) -> String {
        match self {
            FilterValue::Grade(g) => g.label().to_string(),
            FilterValue::Country(s) | FilterValue::Disease(s) | FilterValue::EventType(s) => s.clone(),
            FilterValue::Year(y) => y.to_string(),
        }
    }
}

/// Distinct values offered per dimension, taken from the whole table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub grades: Vec<Grade>,
    pub countries: Vec<String>,
    pub diseases: Vec<String>,
    pub event_types: Vec<String>,
    /// Most recent first
    pub years: Vec<i32>,
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

impl FilterOptions {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        Self::from_events(&dataset.events)
    }

    pub fn from_events(events: &[Event]) -> Self {
        let years: Vec<i32> = events
            .iter()
            .filter_map(|e| e.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .rev()
            .collect();

        Self {
            grades: Grade::ALL.to_vec(),
            countries: distinct(events.iter().map(|e| e.country.as_str())),
            diseases: distinct(events.iter().map(|e| e.disease.as_str())),
            event_types: distinct(events.iter().map(|e| e.event_type.as_str())),
            years,
        }
    }

    pub fn len(&self, dimension: Dimension) -> usize {
        match dimension {
            Dimension::Grade => self.grades.len(),
            Dimension::Country => self.countries.len(),
            Dimension::Disease => self.diseases.len(),
            Dimension::EventType => self.event_types.len(),
            Dimension::Year => self.years.len(),
        }
    }

    /// Value at `index` within a dimension's list
    pub fn value(&self, dimension: Dimension, index: usize) -> Option<FilterValue> {
        match dimension {
            Dimension::Grade => self.grades.get(index).copied().map(FilterValue::Grade),
            Dimension::Country => self.countries.get(index).cloned().map(FilterValue::Country),
            Dimension::Disease => self.diseases.get(index).cloned().map(FilterValue::Disease),
            Dimension::EventType => self.event_types.get(index).cloned().map(FilterValue::EventType),
            Dimension::Year => self.years.get(index).copied().map(FilterValue::Year),
        }
    }

    pub fn values(&self, dimension: Dimension) -> Vec<FilterValue> {
        (0..self.len(dimension))
            .filter_map(|i| self.value(dimension, i))
            .collect()
    }
}
