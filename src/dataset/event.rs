use chrono::NaiveDate;
use std::fmt;

/// Severity grade of a health event. Declaration order is severity order,
/// so the derived `Ord` ranks `Grade3` highest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Grade {
    #[default]
    Ungraded,
    Grade1,
    Grade2,
    Grade3,
}

impl Grade {
    /// Display order for filter lists and summaries (most severe first)
    pub const ALL: [Grade; 4] = [Grade::Grade3, Grade::Grade2, Grade::Grade1, Grade::Ungraded];

    /// Lenient parse: "Grade 3", "grade3", "G3" and "3" all map to `Grade3`.
    /// Anything unrecognised is `Ungraded`.
    pub fn parse(raw: &str) -> Self {
        let lowered = raw.trim().to_ascii_lowercase();
        let rest = lowered
            .strip_prefix("grade")
            .or_else(|| lowered.strip_prefix('g'))
            .unwrap_or(&lowered)
            .trim();
        match rest {
            "1" => Grade::Grade1,
            "2" => Grade::Grade2,
            "3" => Grade::Grade3,
            _ => Grade::Ungraded,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Grade::Grade3 => "Grade 3",
            Grade::Grade2 => "Grade 2",
            Grade::Grade1 => "Grade 1",
            Grade::Ungraded => "Ungraded",
        }
    }

    /// 0 for ungraded up to 3
    pub fn severity(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Event status. Unknown values are kept verbatim so they never count as
/// new or ongoing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Status {
    New,
    Ongoing,
    #[default]
    Unknown,
    Other(String),
}

impl Status {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Status::Unknown
        } else if trimmed.eq_ignore_ascii_case("new") {
            Status::New
        } else if trimmed.eq_ignore_ascii_case("ongoing") {
            Status::Ongoing
        } else {
            Status::Other(trimmed.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Status::New => "New",
            Status::Ongoing => "Ongoing",
            Status::Unknown => "",
            Status::Other(s) => s,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the event table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    pub country: String,
    pub disease: String,
    pub grade: Grade,
    pub status: Status,
    pub event_type: String,
    /// `None` when absent or outside WGS84 range
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub event_count: Option<u64>,
    pub location: String,
    pub description: String,
    pub cases: Option<u64>,
    pub deaths: Option<u64>,
    pub report_date: Option<NaiveDate>,
    pub year: Option<i32>,
}

impl Event {
    /// Both coordinates, if present
    pub fn position(&self) -> Option<(f64, f64)> {
        Some((self.lon?, self.lat?))
    }

    pub fn is_outbreak(&self) -> bool {
        self.event_type.trim().eq_ignore_ascii_case("outbreak")
    }
}
