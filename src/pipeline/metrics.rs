use crate::dataset::{Event, Grade, Status};
use std::collections::HashSet;

/// Summary tallies over a set of rows. All zero for an empty set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Metrics {
    pub total: usize,
    pub new: usize,
    pub ongoing: usize,
    pub outbreaks: usize,
    pub distinct_countries: usize,
    pub total_cases: u64,
    pub total_deaths: u64,
}

impl Metrics {
    pub fn tally<'a>(rows: impl IntoIterator<Item = &'a Event>) -> Self {
        let mut metrics = Metrics::default();
        let mut countries = HashSet::new();

        for event in rows {
            metrics.total += 1;
            match event.status {
                Status::New => metrics.new += 1,
                Status::Ongoing => metrics.ongoing += 1,
                _ => {}
            }
            if event.is_outbreak() {
                metrics.outbreaks += 1;
            }
            if !event.country.is_empty() {
                countries.insert(event.country.as_str());
            }
            metrics.total_cases = metrics.total_cases.saturating_add(event.cases.unwrap_or(0));
            metrics.total_deaths = metrics.total_deaths.saturating_add(event.deaths.unwrap_or(0));
        }

        metrics.distinct_countries = countries.len();
        metrics
    }

    /// Deaths per hundred cases over every row
    pub fn case_fatality_rate(&self) -> Option<f64> {
        super::case_fatality_rate(self.total_cases, self.total_deaths)
    }

    pub fn cases_per_event(&self) -> Option<u64> {
        (self.total > 0).then(|| self.total_cases / self.total as u64)
    }
}

/// Row counts per grade
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GradeSummary {
    pub grade3: usize,
    pub grade2: usize,
    pub grade1: usize,
    pub ungraded: usize,
}

impl GradeSummary {
    pub fn tally<'a>(rows: impl IntoIterator<Item = &'a Event>) -> Self {
        let mut summary = GradeSummary::default();
        for event in rows {
            match event.grade {
                Grade::Grade3 => summary.grade3 += 1,
                Grade::Grade2 => summary.grade2 += 1,
                Grade::Grade1 => summary.grade1 += 1,
                Grade::Ungraded => summary.ungraded += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.grade3 + self.grade2 + self.grade1 + self.ungraded
    }

    /// Percentage of rows with `grade`, 0 for an empty set
    pub fn share(&self, grade: Grade) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.count(grade) as f64 / total as f64 * 100.0,
        }
    }

    pub fn count(&self, grade: Grade) -> usize {
        match grade {
            Grade::Grade3 => self.grade3,
            Grade::Grade2 => self.grade2,
            Grade::Grade1 => self.grade1,
            Grade::Ungraded => self.ungraded,
        }
    }
}
