//! Theme extraction - keyword clusters ranked by a composite depth score,
//! cross-theme tension metrics, and time-windowed undercurrents.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use thought_store::{Thought, ThoughtId};

use crate::similarity::text_similarity;

/// Weights of the composite depth score.
const FREQUENCY_WEIGHT: f32 = 0.3;
const CONSISTENCY_WEIGHT: f32 = 0.4;
const SPREAD_WEIGHT: f32 = 0.3;

/// Opposite-pole keyword pairs checked for cross-currents. A deliberately
/// small, explicit lexicon; this is not general antonym detection.
const OPPOSITE_POLES: &[(&str, &str)] = &[
    ("stillness", "movement"),
    ("certainty", "doubt"),
    ("fear", "courage"),
    ("holding", "releasing"),
    ("past", "future"),
    ("alone", "together"),
];

/// An aggregated, ranked keyword cluster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub occurrence_count: usize,

    /// Sum of the member thoughts' depth-level weights.
    pub total_depth: f32,

    /// `total_depth / occurrence_count`.
    pub average_depth: f32,

    /// Occurrence count scaled by average depth; always >= 0.
    pub strength_score: f32,

    /// Composite depth in [0, 1] used for ranking.
    pub depth: f32,

    pub member_thought_ids: Vec<ThoughtId>,
}

/// Tension between two antonymic themes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossCurrent {
    pub theme_a: String,
    pub theme_b: String,
    /// Absolute difference of the two strength scores.
    pub tension: f32,
    /// Ratio of the weaker to the stronger strength, in [0, 1].
    pub balance: f32,
}

/// Time window for undercurrent queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Day,
    Week,
    Month,
    All,
}

impl Timeframe {
    /// Window length, or `None` for unbounded.
    pub fn window(&self) -> Option<Duration> {
        match self {
            Timeframe::Day => Some(Duration::hours(24)),
            Timeframe::Week => Some(Duration::days(7)),
            Timeframe::Month => Some(Duration::days(30)),
            Timeframe::All => None,
        }
    }
}

impl std::str::FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "day" => Ok(Timeframe::Day),
            "week" => Ok(Timeframe::Week),
            "month" => Ok(Timeframe::Month),
            "all" => Ok(Timeframe::All),
            other => Err(format!("unknown timeframe '{other}'")),
        }
    }
}

/// Group thoughts by keyword and score each cluster.
///
/// Composite depth per theme:
/// `0.3 * normalized_frequency + 0.4 * consistency + 0.3 * evolution_spread`
/// where consistency reflects how regular the inter-arrival gaps are and
/// evolution spread is how far the latest occurrence has drifted from the
/// first. Sorted descending by depth, theme name as tiebreak.
pub fn extract_themes(thoughts: &[&Thought]) -> Vec<Theme> {
    let mut groups: HashMap<&str, Vec<&Thought>> = HashMap::new();
    for &thought in thoughts {
        for keyword in &thought.keywords {
            groups.entry(keyword).or_default().push(thought);
        }
    }

    let max_count = groups.values().map(Vec::len).max().unwrap_or(1) as f32;

    let mut themes: Vec<Theme> = groups
        .into_iter()
        .map(|(name, mut members)| {
            members.sort_by_key(|t| t.created_at);

            let occurrence_count = members.len();
            let total_depth: f32 = members.iter().map(|t| t.depth_level.weight()).sum();
            let average_depth = total_depth / occurrence_count as f32;

            let normalized_frequency = occurrence_count as f32 / max_count;
            let consistency = gap_consistency(&members);
            let spread = evolution_spread(&members);

            let depth = (FREQUENCY_WEIGHT * normalized_frequency
                + CONSISTENCY_WEIGHT * consistency
                + SPREAD_WEIGHT * spread)
                .clamp(0.0, 1.0);

            Theme {
                name: name.to_string(),
                occurrence_count,
                total_depth,
                average_depth,
                strength_score: occurrence_count as f32 * average_depth,
                depth,
                member_thought_ids: members.iter().map(|t| t.id).collect(),
            }
        })
        .collect();

    themes.sort_by(|a, b| {
        b.depth
            .partial_cmp(&a.depth)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
    themes
}

/// `1 / (1 + variance(gaps) / mean(gaps))` over inter-arrival gaps in
/// seconds. A single occurrence has no gaps and counts as fully consistent.
fn gap_consistency(members: &[&Thought]) -> f32 {
    if members.len() < 2 {
        return 1.0;
    }

    let gaps: Vec<f32> = members
        .windows(2)
        .map(|pair| {
            (pair[1].created_at - pair[0].created_at).num_seconds() as f32
        })
        .collect();

    let mean = gaps.iter().sum::<f32>() / gaps.len() as f32;
    if mean <= 0.0 {
        return 1.0;
    }
    let variance =
        gaps.iter().map(|g| (g - mean).powi(2)).sum::<f32>() / gaps.len() as f32;

    1.0 / (1.0 + variance / mean)
}

/// How far the latest occurrence drifted from the first.
fn evolution_spread(members: &[&Thought]) -> f32 {
    match (members.first(), members.last()) {
        (Some(first), Some(last)) if members.len() > 1 => {
            1.0 - text_similarity(&first.text, &last.text)
        }
        _ => 0.0,
    }
}

/// Emit tension/balance entries for antonym pairs where both poles are
/// present among the extracted theme names.
pub fn find_cross_currents(themes: &[Theme]) -> Vec<CrossCurrent> {
    let by_name: HashMap<&str, &Theme> =
        themes.iter().map(|t| (t.name.as_str(), t)).collect();

    OPPOSITE_POLES
        .iter()
        .filter_map(|(pole_a, pole_b)| {
            let a = by_name.get(pole_a)?;
            let b = by_name.get(pole_b)?;
            let (low, high) = if a.strength_score <= b.strength_score {
                (a.strength_score, b.strength_score)
            } else {
                (b.strength_score, a.strength_score)
            };
            Some(CrossCurrent {
                theme_a: a.name.clone(),
                theme_b: b.name.clone(),
                tension: high - low,
                balance: if high > 0.0 { low / high } else { 1.0 },
            })
        })
        .collect()
}

/// Restrict thoughts to the timeframe window ending at `now`.
pub fn within_timeframe<'a>(
    thoughts: &[&'a Thought],
    timeframe: Timeframe,
    now: DateTime<Utc>,
) -> Vec<&'a Thought> {
    match timeframe.window() {
        None => thoughts.to_vec(),
        Some(window) => {
            let start = now - window;
            thoughts
                .iter()
                .filter(|t| t.created_at >= start && t.created_at <= now)
                .copied()
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thought_store::DepthLevel;

    fn thought(text: &str, depth: DepthLevel, at: DateTime<Utc>) -> Thought {
        Thought::new(text)
            .with_depth(depth)
            .with_created_at(at)
            .with_keywords(crate::lexicon::extract_keywords(text))
    }

    fn at(hours: i64) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z").unwrap().with_timezone(&Utc)
            + Duration::hours(hours)
    }

    #[test]
    fn test_single_occurrence_theme() {
        let t = thought("change arrives", DepthLevel::Deep, at(0));
        let themes = extract_themes(&[&t]);

        let theme = themes.iter().find(|t| t.name == "change").unwrap();
        assert_eq!(theme.occurrence_count, 1);
        assert_eq!(theme.average_depth, 2.0);
        assert_eq!(theme.strength_score, 2.0);
        // One occurrence: full frequency and consistency, zero spread.
        assert!((theme.depth - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_depth_bounded() {
        let thoughts: Vec<Thought> = (0..8)
            .map(|i| {
                thought(
                    &format!("change and fear number {i}"),
                    DepthLevel::Abyss,
                    at(i * 7),
                )
            })
            .collect();
        let refs: Vec<&Thought> = thoughts.iter().collect();

        for theme in extract_themes(&refs) {
            assert!(theme.depth >= 0.0 && theme.depth <= 1.0, "{:?}", theme);
            assert!(theme.strength_score >= 0.0);
            assert!(
                (theme.average_depth - theme.total_depth / theme.occurrence_count as f32)
                    .abs()
                    < 1e-6
            );
        }
    }

    #[test]
    fn test_regular_gaps_are_more_consistent() {
        let regular: Vec<Thought> = [0, 10, 20, 30]
            .iter()
            .map(|h| thought("steady practice", DepthLevel::Surface, at(*h)))
            .collect();
        let bursty: Vec<Thought> = [0, 1, 2, 90]
            .iter()
            .map(|h| thought("sudden practice", DepthLevel::Surface, at(*h)))
            .collect();

        let regular_refs: Vec<&Thought> = regular.iter().collect();
        let bursty_refs: Vec<&Thought> = bursty.iter().collect();

        let steady = extract_themes(&regular_refs)
            .into_iter()
            .find(|t| t.name == "practice")
            .unwrap();
        let sudden = extract_themes(&bursty_refs)
            .into_iter()
            .find(|t| t.name == "practice")
            .unwrap();

        assert!(steady.depth > sudden.depth);
    }

    #[test]
    fn test_evolution_spread_rewards_drift() {
        let drifting = [
            thought("change feels scary", DepthLevel::Surface, at(0)),
            thought("change brought peace somehow", DepthLevel::Surface, at(10)),
        ];
        let repeated = [
            thought("change feels scary", DepthLevel::Surface, at(0)),
            thought("change feels scary", DepthLevel::Surface, at(10)),
        ];

        let drifting_refs: Vec<&Thought> = drifting.iter().collect();
        let repeated_refs: Vec<&Thought> = repeated.iter().collect();

        let drifted = extract_themes(&drifting_refs)
            .into_iter()
            .find(|t| t.name == "change")
            .unwrap();
        let same = extract_themes(&repeated_refs)
            .into_iter()
            .find(|t| t.name == "change")
            .unwrap();

        assert!(drifted.depth > same.depth);
    }

    #[test]
    fn test_cross_currents_require_both_poles() {
        let thoughts = [
            thought("fear keeps returning", DepthLevel::Deep, at(0)),
            thought("fear of the dark", DepthLevel::Deep, at(5)),
            thought("courage shows up quietly", DepthLevel::Surface, at(10)),
        ];
        let refs: Vec<&Thought> = thoughts.iter().collect();
        let themes = extract_themes(&refs);

        let currents = find_cross_currents(&themes);
        assert_eq!(currents.len(), 1);

        let current = &currents[0];
        assert_eq!(current.theme_a, "fear");
        assert_eq!(current.theme_b, "courage");
        // fear: 2 occurrences * depth 2.0 = 4.0; courage: 1 * 1.0 = 1.0.
        assert!((current.tension - 3.0).abs() < 1e-6);
        assert!((current.balance - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_cross_currents_absent_pole_emits_nothing() {
        let t = thought("stillness in the house", DepthLevel::Surface, at(0));
        let themes = extract_themes(&[&t]);
        assert!(find_cross_currents(&themes).is_empty());
    }

    #[test]
    fn test_within_timeframe_week_window() {
        let day0 = thought("river day zero", DepthLevel::Surface, at(0));
        let day1 = thought("river day one", DepthLevel::Surface, at(24));
        let day8 = thought("river day eight", DepthLevel::Surface, at(24 * 8));
        let refs = vec![&day0, &day1, &day8];

        // "Now" sits six days in: the week window covers day 0 and day 1 but
        // not day 8.
        let now = at(24 * 6);
        let windowed = within_timeframe(&refs, Timeframe::Week, now);
        assert_eq!(windowed.len(), 2);
        assert!(windowed.iter().all(|t| t.created_at <= now));

        let all = within_timeframe(&refs, Timeframe::All, now);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_timeframe_parsing() {
        assert_eq!("week".parse::<Timeframe>().unwrap(), Timeframe::Week);
        assert_eq!("ALL".parse::<Timeframe>().unwrap(), Timeframe::All);
        assert!("fortnight".parse::<Timeframe>().is_err());
    }
}
