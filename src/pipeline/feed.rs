use crate::dataset::{Event, Grade};
use chrono::NaiveDate;
use std::borrow::Cow;
use std::cmp::Reverse;

pub const FEED_LEN: usize = 10;
pub const TICKER_LEN: usize = 8;
/// Characters of description kept in a feed entry
pub const DESCRIPTION_BUDGET: usize = 130;
pub const ELLIPSIS: &str = "...";

const TICKER_SEPARATOR: &str = "  •  ";
const TICKER_PREFIX: &str = "LIVE UPDATES: ";

/// Most recent first. Stable, so ties keep input order; rows without a
/// report date go after every dated row.
pub fn by_recency<'a>(rows: impl IntoIterator<Item = &'a Event>) -> Vec<&'a Event> {
    let mut sorted: Vec<&Event> = rows.into_iter().collect();
    // None < Some(_), so under Reverse undated rows sort last
    sorted.sort_by_key(|e| Reverse(e.report_date));
    sorted
}

/// Keep at most `budget` characters, appending an ellipsis when cut
pub fn truncate(text: &str, budget: usize) -> Cow<'_, str> {
    match text.char_indices().nth(budget) {
        Some((cut, _)) => Cow::Owned(format!("{}{ELLIPSIS}", &text[..cut])),
        None => Cow::Borrowed(text),
    }
}

/// One feed entry
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    /// 1-based position in the feed
    pub rank: usize,
    pub country: String,
    pub disease: String,
    pub status: String,
    pub event_type: String,
    pub grade: Grade,
    pub cases: Option<u64>,
    pub deaths: Option<u64>,
    pub description: String,
    pub report_date: Option<NaiveDate>,
}

/// First `limit` rows of an already recency-sorted slice
pub fn recent_signals(sorted: &[&Event], limit: usize) -> Vec<Signal> {
    sorted
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, e)| Signal {
            rank: i + 1,
            country: e.country.clone(),
            disease: e.disease.clone(),
            status: e.status.label().to_string(),
            event_type: e.event_type.clone(),
            grade: e.grade,
            cases: e.cases,
            deaths: e.deaths,
            description: truncate(&e.description, DESCRIPTION_BUDGET).into_owned(),
            report_date: e.report_date,
        })
        .collect()
}

/// Scrolling headline text. One loop is the prefix, the items and a
/// trailing separator; `text` holds two loops so any window up to one loop
/// wide reads straight through the seam.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ticker {
    pub items: Vec<String>,
    pub text: String,
}

impl Ticker {
    pub fn from_recent(sorted: &[&Event]) -> Self {
        let items: Vec<String> = sorted
            .iter()
            .take(TICKER_LEN)
            .map(|e| format!("{}: {} ({})", e.country, e.disease, e.grade))
            .collect();
        if items.is_empty() {
            return Self::default();
        }
        let unit = format!("{TICKER_PREFIX}{}{TICKER_SEPARATOR}", items.join(TICKER_SEPARATOR));
        let text = unit.repeat(2);
        Self { items, text }
    }

    /// Length in chars of one loop
    pub fn period(&self) -> usize {
        self.text.chars().count() / 2
    }

    /// `width` chars of the text starting `offset` chars in, wrapping within
    /// the loop period
    pub fn window(&self, offset: usize, width: usize) -> String {
        let period = self.period();
        if period == 0 {
            return String::new();
        }
        self.text.chars().cycle().skip(offset % period).take(width).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Status;

    fn dated(country: &str, date: Option<(i32, u32, u32)>) -> Event {
        Event {
            country: country.into(),
            disease: "Cholera".into(),
            grade: Grade::Grade3,
            status: Status::New,
            report_date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            ..Default::default()
        }
    }

    #[test]
    fn test_truncate_long_description() {
        let long = "x".repeat(200);
        let cut = truncate(&long, 120);
        assert_eq!(cut.len(), 120 + ELLIPSIS.len());
        assert!(cut.ends_with(ELLIPSIS));
        assert_eq!(cut.chars().filter(|&c| c == 'x').count(), 120);
    }

    #[test]
    fn test_truncate_short_and_exact() {
        let short = "y".repeat(100);
        assert_eq!(truncate(&short, 120), short.as_str());
        let exact = "z".repeat(120);
        assert!(matches!(truncate(&exact, 120), Cow::Borrowed(_)));
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        let text = "é".repeat(10);
        assert_eq!(truncate(&text, 4), "éééé...");
    }

    #[test]
    fn test_recency_orders_desc_with_undated_last() {
        let events = vec![
            dated("A", None),
            dated("B", Some((2025, 1, 20))),
            dated("C", Some((2025, 1, 22))),
            dated("D", None),
            dated("E", Some((2025, 1, 20))),
        ];
        let order: Vec<_> = by_recency(&events).iter().map(|e| e.country.as_str()).collect();
        assert_eq!(order, ["C", "B", "E", "A", "D"]);
    }

    #[test]
    fn test_feed_limits_and_ranks() {
        let events: Vec<Event> = (1..=12).map(|d| dated("X", Some((2025, 1, d)))).collect();
        let sorted = by_recency(&events);
        let feed = recent_signals(&sorted, FEED_LEN);
        assert_eq!(feed.len(), 10);
        assert_eq!(feed[0].rank, 1);
        assert_eq!(feed[0].report_date, NaiveDate::from_ymd_opt(2025, 1, 12));
        assert_eq!(feed[0].status, "New");
    }

    #[test]
    fn test_ticker_text_is_doubled() {
        let events = vec![dated("Kenya", Some((2025, 1, 2))), dated("Nigeria", Some((2025, 1, 1)))];
        let ticker = Ticker::from_recent(&by_recency(&events));
        assert_eq!(ticker.items, ["Kenya: Cholera (Grade 3)", "Nigeria: Cholera (Grade 3)"]);
        let once = "LIVE UPDATES: Kenya: Cholera (Grade 3)  •  Nigeria: Cholera (Grade 3)  •  ";
        assert_eq!(ticker.text, format!("{once}{once}"));
        assert_eq!(ticker.period(), once.chars().count());
    }

    #[test]
    fn test_ticker_caps_items_and_handles_empty() {
        let events: Vec<Event> = (1..=10).map(|d| dated("X", Some((2025, 1, d)))).collect();
        assert_eq!(Ticker::from_recent(&by_recency(&events)).items.len(), TICKER_LEN);
        let empty = Ticker::from_recent(&[]);
        assert!(empty.text.is_empty());
        assert_eq!(empty.window(5, 10), "");
    }

    #[test]
    fn test_ticker_window_wraps() {
        let events = vec![dated("Kenya", Some((2025, 1, 2)))];
        let ticker = Ticker::from_recent(&by_recency(&events));
        let period = ticker.period();
        assert_eq!(ticker.window(0, 6), "LIVE U");
        assert_eq!(ticker.window(period, 6), "LIVE U");
        assert_eq!(ticker.window(0, 400).chars().count(), 400);
    }

    #[test]
    fn test_ticker_scrolls_through_the_seam() {
        let events = vec![dated("Kenya", Some((2025, 1, 2))), dated("Ghana", Some((2025, 1, 1)))];
        let ticker = Ticker::from_recent(&by_recency(&events));
        let period = ticker.period();
        let width = 20;

        // Each step drops the first char and appends exactly one
        for offset in period - width..period + width {
            let here = ticker.window(offset, width);
            let next = ticker.window(offset + 1, width);
            assert_eq!(here.chars().skip(1).collect::<String>(), next.chars().take(width - 1).collect::<String>());
        }
        let tail = ticker.window(period - 8, 8 + "LIVE".len());
        assert_eq!(tail, " 3)  •  LIVE");

        // Wider than the text, the loop repeats with its separator intact
        let wide = ticker.window(0, period * 3);
        assert_eq!(wide.matches("  •  LIVE UPDATES: ").count(), 2);
    }
}
