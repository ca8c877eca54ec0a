//! Mood-conditioned "why this place" sentences.
//!
//! Output is a pure function of mood, name, category and distance. Each mood
//! has an ordered table of reason rules; the first two that match are used,
//! and a per-mood fallback covers the case where none do.

use moodmap_core::{category_label, Mood, Place};

/// Coarse character of a place guessed from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vibe {
    Work,
    Date,
    Budget,
    Neutral,
}

const WORK_NAMES: &[&str] = &[
    "starbucks",
    "ccd",
    "cafe coffee day",
    "third wave",
    "thirdwave",
    "coffee",
    "book",
    "library",
    "study",
    "irani",
];

const DATE_NAMES: &[&str] = &["bistro", "lounge", "rooftop", "terrace", "garden", "cafe", "coffee"];

const BUDGET_NAMES: &[&str] = &[
    "misal",
    "vada pav",
    "wada pav",
    "poha",
    "upma",
    "chai",
    "tea",
    "tapri",
    "momos",
    "roll",
    "frankie",
    "sandwich",
    "chinese",
    "noodles",
    "fried rice",
    "biryani",
    "thali",
    "bhojanalay",
    "mess",
    "canteen",
    "snacks",
    "hotel",
];

/// Vibe buckets in priority order.
const VIBES: &[(Vibe, &[&str])] = &[
    (Vibe::Work, WORK_NAMES),
    (Vibe::Date, DATE_NAMES),
    (Vibe::Budget, BUDGET_NAMES),
];

#[derive(Debug, Clone, Copy)]
enum Matcher {
    Vibe(Vibe),
    NameContainsAny(&'static [&'static str]),
    CategoryContains(&'static str),
}

#[derive(Debug, Clone, Copy)]
struct ReasonRule {
    matcher: Matcher,
    reason: &'static str,
}

#[derive(Debug)]
struct MoodRules {
    lead: &'static str,
    rules: &'static [ReasonRule],
    fallback: &'static str,
}

const fn rule(matcher: Matcher, reason: &'static str) -> ReasonRule {
    ReasonRule { matcher, reason }
}

static WORK_RULES: MoodRules = MoodRules {
    lead: "Great for",
    rules: &[
        rule(Matcher::Vibe(Vibe::Work), "work-friendly vibe"),
        rule(
            Matcher::NameContainsAny(&["cowork", "co-work", "workspace", "workhub", "incubator"]),
            "coworking-style place",
        ),
        rule(
            Matcher::NameContainsAny(&["starbucks", "third wave", "thirdwave", "ccd", "cafe coffee day"]),
            "reliable coffee spot",
        ),
        rule(
            Matcher::NameContainsAny(&["book", "library", "study", "reading"]),
            "quiet study energy",
        ),
    ],
    fallback: "calm seating + laptop-friendly vibes",
};

static DATE_RULES: MoodRules = MoodRules {
    lead: "Perfect for",
    rules: &[
        rule(Matcher::Vibe(Vibe::Date), "aesthetic cafe vibes"),
        rule(
            Matcher::NameContainsAny(&["rooftop", "terrace", "garden", "bistro", "lounge"]),
            "cute ambience",
        ),
        rule(
            Matcher::NameContainsAny(&["coffee", "cafe", "bistro"]),
            "usually less chaotic",
        ),
    ],
    fallback: "cozy place with good vibe",
};

static QUICK_BITE_RULES: MoodRules = MoodRules {
    lead: "Best for",
    rules: &[
        rule(Matcher::CategoryContains("fast"), "fast food category"),
        rule(
            Matcher::NameContainsAny(&["burger", "pizza", "fries", "wrap", "roll", "shawarma", "sub"]),
            "quick menu",
        ),
    ],
    fallback: "quick service + easy food",
};

static BUDGET_RULES: MoodRules = MoodRules {
    lead: "Good for",
    rules: &[
        rule(Matcher::Vibe(Vibe::Budget), "pocket-friendly local food"),
        rule(
            Matcher::NameContainsAny(&["misal", "vada pav", "wada pav", "poha", "chai", "tapri"]),
            "cheap snacks energy",
        ),
        rule(
            Matcher::NameContainsAny(&["chinese", "noodles", "fried rice", "momos", "roll", "sandwich"]),
            "budget comfort food",
        ),
    ],
    fallback: "low-cost chill spot",
};

const MAX_REASONS: usize = 2;

fn rules_for(mood: Mood) -> &'static MoodRules {
    match mood {
        Mood::Work => &WORK_RULES,
        Mood::Date => &DATE_RULES,
        Mood::QuickBite => &QUICK_BITE_RULES,
        Mood::Budget => &BUDGET_RULES,
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Buckets a place name by case-insensitive keyword match.
#[must_use]
pub fn classify_vibe(name: &str) -> Vibe {
    let name = name.trim().to_lowercase();
    VIBES
        .iter()
        .find(|(_, words)| contains_any(&name, words))
        .map_or(Vibe::Neutral, |(vibe, _)| *vibe)
}

/// Qualitative distance phrase; unknown distances read as a short ride.
#[must_use]
pub fn nearness(distance_km: Option<f64>) -> &'static str {
    match distance_km {
        Some(d) if d < 1.0 => "super close",
        Some(d) if d < 2.5 => "nearby",
        _ => "worth the short ride",
    }
}

/// Explanation for a place recommended under `mood`.
#[must_use]
pub fn explain(mood: Mood, place: &Place) -> String {
    let category = category_label(place.category.as_deref());
    let category_lower = category.to_lowercase();
    let name = place.name.trim().to_lowercase();
    let vibe = classify_vibe(&name);
    let table = rules_for(mood);

    let mut reasons: Vec<&str> = table
        .rules
        .iter()
        .filter(|r| match r.matcher {
            Matcher::Vibe(wanted) => vibe == wanted,
            Matcher::NameContainsAny(words) => contains_any(&name, words),
            Matcher::CategoryContains(word) => category_lower.contains(word),
        })
        .map(|r| r.reason)
        .take(MAX_REASONS)
        .collect();
    if reasons.is_empty() {
        reasons.push(table.fallback);
    }

    format!(
        "{} <b>{}</b>: {} + {} + <b>{}</b>.",
        table.lead,
        mood.label(),
        reasons.join(" + "),
        nearness(place.distance_km),
        category
    )
}

/// Explanation for a raw mood value; unrecognised moods get a generic sentence.
#[must_use]
pub fn explain_why(mood: &str, place: &Place) -> String {
    match mood.parse::<Mood>() {
        Ok(mood) => explain(mood, place),
        Err(_) => format!(
            "Recommended because it\u{2019}s {} and matches <b>{}</b>.",
            nearness(place.distance_km),
            category_label(place.category.as_deref())
        ),
    }
}
