//! Free-text symptom duration normalization.
//!
//! Turns strings such as "3 days", "2-3 weeks", "several months" or
//! "chronic, worsening" into a canonical number of weeks plus a temporal
//! pattern. Normalization never fails: text that cannot be read comes back
//! as `weeks = 0`, [`DurationPattern::Unknown`], [`ParseConfidence::Low`].

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

pub const DAYS_PER_WEEK: f64 = 7.0;
pub const WEEKS_PER_MONTH: f64 = 4.33;
pub const WEEKS_PER_YEAR: f64 = 52.0;
const HOURS_PER_WEEK: f64 = 168.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationPattern {
    Constant,
    Intermittent,
    Progressive,
    Improving,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseConfidence {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedDuration {
    pub weeks: f64,
    pub pattern: DurationPattern,
    pub interpretation: String,
    pub confidence: ParseConfidence,
}

impl NormalizedDuration {
    /// Whether a magnitude was recovered. Scorers skip duration rules otherwise.
    pub fn is_known(&self) -> bool {
        self.weeks > 0.0
    }
}

const PATTERN_KEYWORDS: &[(DurationPattern, &[&str])] = &[
    (
        DurationPattern::Intermittent,
        &[
            "intermittent",
            "on and off",
            "on-and-off",
            "off and on",
            "comes and goes",
            "episodic",
            "recurrent",
        ],
    ),
    (
        DurationPattern::Progressive,
        &["progressive", "worsening", "getting worse", "increasing"],
    ),
    (
        DurationPattern::Improving,
        &["improving", "getting better", "resolving", "improved"],
    ),
];

const RELATIVE_PHRASES: &[(&str, f64, &str)] = &[
    ("yesterday", 1.0 / DAYS_PER_WEEK, "about 1 day"),
    ("last night", 1.0 / DAYS_PER_WEEK, "about 1 day"),
    ("today", 0.5 / DAYS_PER_WEEK, "less than a day"),
    ("this morning", 0.5 / DAYS_PER_WEEK, "less than a day"),
    ("this afternoon", 0.5 / DAYS_PER_WEEK, "less than a day"),
    ("this evening", 0.5 / DAYS_PER_WEEK, "less than a day"),
    ("tonight", 0.5 / DAYS_PER_WEEK, "less than a day"),
    ("last week", 1.0, "about 1 week"),
    ("last month", WEEKS_PER_MONTH, "about 1 month"),
];

const VAGUE_QUANTIFIERS: &[(&str, f64)] = &[
    ("couple", 2.0),
    ("few", 3.0),
    ("several", 5.0),
    ("many", 8.0),
];

// "subacute" must precede "acute"
const QUALITATIVE_TERMS: &[(&str, f64)] = &[
    ("chronic", 26.0),
    ("long-standing", 26.0),
    ("longstanding", 26.0),
    ("long standing", 26.0),
    ("subacute", 9.0),
    ("sudden onset", 0.5),
    ("acute", 0.5),
];

const NUMBER_WORDS: &[(&str, f64)] = &[
    ("a", 1.0),
    ("an", 1.0),
    ("one", 1.0),
    ("two", 2.0),
    ("three", 3.0),
    ("four", 4.0),
    ("five", 5.0),
    ("six", 6.0),
    ("seven", 7.0),
    ("eight", 8.0),
    ("nine", 9.0),
    ("ten", 10.0),
    ("eleven", 11.0),
    ("twelve", 12.0),
];

const NUMBER: &str = r"\d+(?:\.\d+)?|(?:an?|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve)\b";
const UNIT: &str = r"hours?|hrs?|h|days?|d|weeks?|wks?|w|months?|mths?|mos?|years?|yrs?|y";

// "2 weeks", "2-3 weeks", "2 to 4 days", "6wks", "a week"
static EXPLICIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b(?P<first>{NUMBER})(?:\s*(?:-|\x{{2013}}|to\b|or\b)\s*(?P<second>{NUMBER}))?\s*(?P<unit>{UNIT})\b"
    ))
    .expect("explicit duration pattern is valid")
});

// "a few weeks", "couple of months"
static VAGUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b(?P<quantifier>couple|few|several|many)\s+(?:of\s+)?(?P<unit>{UNIT})\b"
    ))
    .expect("vague duration pattern is valid")
});

static BARE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("bare number pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl Unit {
    fn parse(word: &str) -> Option<Self> {
        match word {
            "h" | "hr" | "hrs" | "hour" | "hours" => Some(Unit::Hour),
            "d" | "day" | "days" => Some(Unit::Day),
            "w" | "wk" | "wks" | "week" | "weeks" => Some(Unit::Week),
            "mo" | "mos" | "mth" | "mths" | "month" | "months" => Some(Unit::Month),
            "y" | "yr" | "yrs" | "year" | "years" => Some(Unit::Year),
            _ => None,
        }
    }

    fn weeks(self) -> f64 {
        match self {
            Unit::Hour => 1.0 / HOURS_PER_WEEK,
            Unit::Day => 1.0 / DAYS_PER_WEEK,
            Unit::Week => 1.0,
            Unit::Month => WEEKS_PER_MONTH,
            Unit::Year => WEEKS_PER_YEAR,
        }
    }

    fn name(self, value: f64) -> &'static str {
        let singular = (value - 1.0).abs() < f64::EPSILON;
        match (self, singular) {
            (Unit::Hour, true) => "hour",
            (Unit::Hour, false) => "hours",
            (Unit::Day, true) => "day",
            (Unit::Day, false) => "days",
            (Unit::Week, true) => "week",
            (Unit::Week, false) => "weeks",
            (Unit::Month, true) => "month",
            (Unit::Month, false) => "months",
            (Unit::Year, true) => "year",
            (Unit::Year, false) => "years",
        }
    }
}

fn parse_number(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().or_else(|| {
        NUMBER_WORDS
            .iter()
            .find(|(name, _)| *name == text)
            .map(|(_, n)| *n)
    })
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{:.0}", n)
    } else {
        format!("{:.1}", n)
    }
}

fn format_weeks(weeks: f64) -> String {
    if weeks < 1.0 {
        format!("{:.2} weeks", weeks)
    } else {
        format!("{:.1} weeks", weeks)
    }
}

fn detect_pattern(text: &str) -> Option<DurationPattern> {
    PATTERN_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(pattern, _)| *pattern)
}

fn parse_relative(text: &str) -> Option<(f64, String)> {
    RELATIVE_PHRASES
        .iter()
        .find(|(phrase, _, _)| text.contains(phrase))
        .map(|(phrase, weeks, reading)| (*weeks, format!("'{}' read as {}", phrase, reading)))
}

fn parse_vague(text: &str) -> Option<(f64, String)> {
    let caps = VAGUE_RE.captures(text)?;
    let quantifier = caps.name("quantifier")?.as_str();
    let unit = Unit::parse(caps.name("unit")?.as_str())?;
    let count = VAGUE_QUANTIFIERS
        .iter()
        .find(|(q, _)| *q == quantifier)
        .map(|(_, n)| *n)?;

    let weeks = count * unit.weeks();
    let reading = format!(
        "'{} {}' estimated as {} {} ({})",
        quantifier,
        unit.name(count),
        format_number(count),
        unit.name(count),
        format_weeks(weeks)
    );
    Some((weeks, reading))
}

fn parse_qualitative(text: &str) -> Option<(f64, String)> {
    QUALITATIVE_TERMS
        .iter()
        .find(|(term, _)| text.contains(term))
        .map(|(term, weeks)| (*weeks, format!("'{}' estimated as {}", term, format_weeks(*weeks))))
}

fn parse_explicit(text: &str) -> Option<(f64, String)> {
    let caps = EXPLICIT_RE.captures(text)?;
    let first = parse_number(caps.name("first")?.as_str())?;
    let unit = Unit::parse(caps.name("unit")?.as_str())?;

    let (value, label) = match caps.name("second").and_then(|m| parse_number(m.as_str())) {
        Some(second) => (
            (first + second) / 2.0,
            format!("{}-{}", format_number(first), format_number(second)),
        ),
        None => (first, format_number(first)),
    };

    let weeks = value * unit.weeks();
    let reading = format!("{} {} = {}", label, unit.name(value), format_weeks(weeks));
    Some((weeks, reading))
}

fn parse_bare_number(text: &str) -> Option<(f64, String)> {
    BARE_NUMBER_RE
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .find(|n| *n > 0.0)
        .map(|n| (n, format!("bare number {} assumed to be weeks", format_number(n))))
}

/// Weeks from an explicit "N unit" phrase only, ignoring qualitative terms.
///
/// Used to spot durations that contradict themselves ("chronic, 3 days").
pub(crate) fn explicit_weeks(text: &str) -> Option<f64> {
    let text = text.trim().to_lowercase();
    parse_explicit(&text).map(|(weeks, _)| weeks)
}

/// Normalize a free-text duration into weeks, pattern and confidence.
pub fn normalize_duration(raw: &str) -> NormalizedDuration {
    let text = raw.trim().to_lowercase();
    if text.is_empty() {
        return NormalizedDuration {
            weeks: 0.0,
            pattern: DurationPattern::Unknown,
            interpretation: "no duration provided".to_string(),
            confidence: ParseConfidence::Low,
        };
    }

    let keyword_pattern = detect_pattern(&text);

    let parsed = parse_relative(&text)
        .map(|r| (r, ParseConfidence::High))
        .or_else(|| parse_vague(&text).map(|r| (r, ParseConfidence::Medium)))
        .or_else(|| parse_qualitative(&text).map(|r| (r, ParseConfidence::Medium)))
        .or_else(|| parse_explicit(&text).map(|r| (r, ParseConfidence::High)))
        .or_else(|| parse_bare_number(&text).map(|r| (r, ParseConfidence::Low)));

    match parsed {
        Some(((weeks, interpretation), confidence)) => NormalizedDuration {
            weeks,
            pattern: keyword_pattern.unwrap_or(DurationPattern::Constant),
            interpretation,
            confidence,
        },
        None => NormalizedDuration {
            weeks: 0.0,
            pattern: keyword_pattern.unwrap_or(DurationPattern::Unknown),
            interpretation: format!("could not interpret '{}'", raw.trim()),
            confidence: ParseConfidence::Low,
        },
    }
}
