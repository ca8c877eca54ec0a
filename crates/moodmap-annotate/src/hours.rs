//! Opening-hours evaluation.
//!
//! [`OpeningHoursEvaluator`] is the seam to a full `opening_hours` engine.
//! [`BasicOpeningHours`] is the built-in implementation and covers the
//! subset of the OSM syntax most map data actually uses:
//!
//! - `24/7`
//! - `;`-separated rules, later rules replacing earlier ones for their days
//! - weekday selectors: `Mo`, `Mo-Fr`, `Fr-Mo`, `Mo,We,Fr`, `Mo-Fr,Su`
//! - comma-separated time spans `HH:MM-HH:MM`, including `24:00` ends and
//!   spans that run past midnight (`18:00-02:00`)
//! - `off` / `closed`, and the `open` modifier
//! - `PH` / `SH` holiday selectors, which select no day: there is no holiday
//!   calendar, so `PH off` leaves ordinary days alone and `Su,PH off` only
//!   closes Sundays
//!
//! Anything else (months, sunrise, week numbers, comments) is rejected with
//! [`HoursError::Unsupported`].

use chrono::{Datelike, Duration, NaiveDateTime, Timelike};
use moodmap_core::Coordinates;
use thiserror::Error;

const MINUTES_PER_DAY: i64 = 1_440;
/// How far ahead the next open/close transition is searched for.
const HORIZON_DAYS: i64 = 8;
const WEEKDAYS: [&str; 7] = ["mo", "tu", "we", "th", "fr", "sa", "su"];
const HOLIDAYS: [&str; 2] = ["ph", "sh"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HoursError {
    #[error("opening hours expression is empty")]
    Empty,

    #[error("unsupported opening hours token \"{0}\"")]
    Unsupported(String),

    #[error("invalid time span \"{0}\"")]
    InvalidTimeSpan(String),
}

/// Open/closed state at an instant plus the next transition, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoursState {
    pub is_open: bool,
    pub next_change: Option<NaiveDateTime>,
}

/// Evaluates an opening-hours expression at a local wall-clock instant.
///
/// `location` is passed through for engines that need it (sunrise/sunset,
/// regional holidays).
pub trait OpeningHoursEvaluator: Send + Sync {
    /// # Errors
    ///
    /// Returns [`HoursError`] when the expression cannot be parsed.
    fn evaluate(
        &self,
        expr: &str,
        location: Option<Coordinates>,
        now: NaiveDateTime,
    ) -> Result<HoursState, HoursError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BasicOpeningHours;

impl OpeningHoursEvaluator for BasicOpeningHours {
    fn evaluate(
        &self,
        expr: &str,
        _location: Option<Coordinates>,
        now: NaiveDateTime,
    ) -> Result<HoursState, HoursError> {
        let week = parse_week(expr)?;
        Ok(evaluate_week(&week, now))
    }
}

/// Open spans per weekday (Monday first), in minutes after that day's midnight.
/// An end past 1440 spills into the following day.
type Week = [Vec<(i64, i64)>; 7];

#[derive(Debug, Default)]
struct Rule {
    days: Option<[bool; 7]>,
    spans: Option<Vec<(i64, i64)>>,
}

impl Rule {
    fn is_empty(&self) -> bool {
        self.days.is_none() && self.spans.is_none()
    }
}

fn parse_week(expr: &str) -> Result<Week, HoursError> {
    let mut rules = Vec::new();
    for raw_rule in expr.split(';').map(str::trim).filter(|r| !r.is_empty()) {
        parse_rule(raw_rule, &mut rules)?;
    }
    if rules.is_empty() {
        return Err(HoursError::Empty);
    }

    let mut week: Week = Default::default();
    for rule in rules {
        let days = rule.days.unwrap_or([true; 7]);
        let spans = rule.spans.unwrap_or_else(|| vec![(0, MINUTES_PER_DAY)]);
        for (day, selected) in days.iter().enumerate() {
            if *selected {
                week[day].clone_from(&spans);
            }
        }
    }
    Ok(week)
}

/// Parses one `;`-separated rule. A weekday selector that follows a time
/// selector (`Mo-Fr 09:00-18:00, Sa 10:00-14:00`) starts a new rule.
fn parse_rule(raw: &str, rules: &mut Vec<Rule>) -> Result<(), HoursError> {
    let mut current = Rule::default();

    for token in raw
        .split_whitespace()
        .map(|t| t.trim_matches(','))
        .filter(|t| !t.is_empty())
    {
        let lower = token.to_ascii_lowercase();
        if lower == "24/7" {
            current.spans = Some(vec![(0, MINUTES_PER_DAY)]);
        } else if lower == "off" || lower == "closed" {
            current.spans = Some(Vec::new());
        } else if lower == "open" {
            current
                .spans
                .get_or_insert_with(|| vec![(0, MINUTES_PER_DAY)]);
        } else if lower.starts_with(|c: char| c.is_ascii_digit()) {
            let spans = current.spans.get_or_insert_with(Vec::new);
            for part in lower.split(',').filter(|p| !p.is_empty()) {
                spans.push(parse_span(part)?);
            }
        } else if let Some(days) = parse_days(&lower) {
            if current.spans.is_some() || current.days.is_some() {
                rules.push(std::mem::take(&mut current));
            }
            current.days = Some(days);
        } else {
            return Err(HoursError::Unsupported(token.to_string()));
        }
    }

    if !current.is_empty() {
        rules.push(current);
    }
    Ok(())
}

/// Weekday selector. Holiday parts are accepted but select nothing, so a
/// holiday-only selector yields a rule that applies to no day.
fn parse_days(token: &str) -> Option<[bool; 7]> {
    let mut days = [false; 7];
    for part in token.split(',').filter(|p| !p.is_empty()) {
        if HOLIDAYS.contains(&part) {
            continue;
        }
        match part.split_once('-') {
            Some((from, to)) => {
                let start = weekday_index(from)?;
                let end = weekday_index(to)?;
                let mut day = start;
                loop {
                    days[day] = true;
                    if day == end {
                        break;
                    }
                    day = (day + 1) % 7;
                }
            }
            None => days[weekday_index(part)?] = true,
        }
    }
    Some(days)
}

fn weekday_index(token: &str) -> Option<usize> {
    WEEKDAYS.iter().position(|d| *d == token)
}

fn parse_span(part: &str) -> Result<(i64, i64), HoursError> {
    let invalid = || HoursError::InvalidTimeSpan(part.to_string());
    let (from, to) = part.trim_end_matches('+').split_once('-').ok_or_else(invalid)?;
    let start = parse_clock(from).ok_or_else(invalid)?;
    let mut end = parse_clock(to).ok_or_else(invalid)?;
    if start >= MINUTES_PER_DAY {
        return Err(invalid());
    }
    if end <= start {
        end += MINUTES_PER_DAY;
    }
    Ok((start, end))
}

/// `HH:MM` as minutes after midnight; hours up to 48 for extended ends.
fn parse_clock(raw: &str) -> Option<i64> {
    let (hours, minutes) = raw.split_once(':')?;
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(hours) || hours.len() > 2 || minutes.len() != 2 || !digits(minutes) {
        return None;
    }
    let hours: i64 = hours.parse().ok()?;
    let minutes: i64 = minutes.parse().ok()?;
    (hours <= 48 && minutes <= 59).then_some(hours * 60 + minutes)
}

fn evaluate_week(week: &Week, now: NaiveDateTime) -> HoursState {
    // Day offset 0 is yesterday so spans spilling past its midnight count.
    let today = i64::from(now.weekday().num_days_from_monday());
    let mut intervals: Vec<(i64, i64)> = Vec::new();
    for offset in 0..=HORIZON_DAYS + 1 {
        let weekday = usize::try_from((today + offset - 1).rem_euclid(7)).unwrap_or(0);
        let base = offset * MINUTES_PER_DAY;
        intervals.extend(week[weekday].iter().map(|(s, e)| (base + s, base + e)));
    }
    let merged = merge(intervals);

    let now_min = MINUTES_PER_DAY + i64::from(now.hour() * 60 + now.minute());
    let horizon = now_min + HORIZON_DAYS * MINUTES_PER_DAY;
    let origin = (now.date() - Duration::days(1))
        .and_hms_opt(0, 0, 0)
        .unwrap_or(now);
    let at = |minute: i64| origin + Duration::minutes(minute);

    if let Some(&(_, end)) = merged.iter().find(|(s, e)| *s <= now_min && now_min < *e) {
        return HoursState {
            is_open: true,
            next_change: (end < horizon).then(|| at(end)),
        };
    }

    HoursState {
        is_open: false,
        next_change: merged
            .iter()
            .map(|(s, _)| *s)
            .find(|s| *s > now_min && *s < horizon)
            .map(at),
    }
}

fn merge(mut intervals: Vec<(i64, i64)>) -> Vec<(i64, i64)> {
    intervals.sort_unstable();
    let mut merged: Vec<(i64, i64)> = Vec::with_capacity(intervals.len());
    for (start, end) in intervals {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}
