//! Approximate place lookup, used after the provider reports "not found".

use serde::{Deserialize, Serialize};

use crate::places::LocationCandidate;

pub const DEFAULT_CUTOFF: f64 = 0.7;

fn default_cutoff() -> f64 {
    DEFAULT_CUTOFF
}

/// How candidates are matched against the user's text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ResolverStrategy {
    /// Single closest name by similarity ratio, if it reaches `cutoff`.
    BestMatch {
        #[serde(default = "default_cutoff")]
        cutoff: f64,
    },
    /// Every name containing the query, in reference order.
    Substring,
}

impl Default for ResolverStrategy {
    fn default() -> Self {
        ResolverStrategy::BestMatch { cutoff: DEFAULT_CUTOFF }
    }
}

impl TryFrom<&str> for ResolverStrategy {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "best" | "best_match" => Ok(ResolverStrategy::default()),
            "substring" => Ok(ResolverStrategy::Substring),
            _ => Err(anyhow::anyhow!(
                "Unknown resolver mode '{value}'. Supported modes: best_match, substring."
            )),
        }
    }
}

/// A candidate together with how well it matched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    pub candidate: LocationCandidate,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Resolver {
    strategy: ResolverStrategy,
}

impl Resolver {
    pub fn new(strategy: ResolverStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> ResolverStrategy {
        self.strategy
    }

    /// Rank `candidates` against `query`. An empty query never matches.
    pub fn resolve(&self, query: &str, candidates: &[LocationCandidate]) -> Vec<Match> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        match self.strategy {
            ResolverStrategy::BestMatch { cutoff } => best_match(query, candidates, cutoff)
                .into_iter()
                .collect(),
            ResolverStrategy::Substring => substring_matches(query, candidates),
        }
    }
}

fn best_match(query: &str, candidates: &[LocationCandidate], cutoff: f64) -> Option<Match> {
    let query = query.to_lowercase();
    let mut best: Option<Match> = None;

    for candidate in candidates {
        let score = similarity(&query, &candidate.name.to_lowercase());
        if score < cutoff {
            continue;
        }
        // Strictly greater keeps the earliest candidate on ties.
        if best.as_ref().is_none_or(|b| score > b.score) {
            best = Some(Match { candidate: candidate.clone(), score });
        }
    }

    best
}

fn substring_matches(query: &str, candidates: &[LocationCandidate]) -> Vec<Match> {
    let needle = query.to_lowercase();
    candidates
        .iter()
        .filter(|c| c.name.to_lowercase().contains(&needle))
        .map(|c| Match { candidate: c.clone(), score: 1.0 })
        .collect()
}

/// Matching-block similarity ratio in `0.0..=1.0`.
///
/// `2 * M / (|a| + |b|)`, where `M` counts the characters in the longest
/// common block plus, recursively, the longest blocks to its left and right.
/// Two empty strings are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, k) = longest_block(a, b, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        matched += k;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            pending.push((i + k, ahi, j + k, bhi));
        }
    }

    matched
}

/// Longest common run within `a[alo..ahi]` and `b[blo..bhi]`, as
/// `(start_in_a, start_in_b, len)`. Earliest run wins ties.
fn longest_block(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let width = bhi - blo + 1;
    let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0);
    let mut prev = vec![0usize; width];
    let mut cur = vec![0usize; width];

    for i in alo..ahi {
        for j in blo..bhi {
            let k = if a[i] == b[j] { prev[j - blo] + 1 } else { 0 };
            cur[j - blo + 1] = k;
            if k > best_k {
                best_i = i + 1 - k;
                best_j = j + 1 - k;
                best_k = k;
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    (best_i, best_j, best_k)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cities() -> Vec<LocationCandidate> {
        vec![
            LocationCandidate::new("San Francisco", "United States"),
            LocationCandidate::new("Santiago", "Chile"),
            LocationCandidate::new("Boston", "United States"),
            LocationCandidate::new("London", "United Kingdom"),
        ]
    }

    #[test]
    fn similarity_of_identical_and_disjoint() {
        assert_eq!(similarity("london", "london"), 1.0);
        assert_eq!(similarity("abc", "xyz"), 0.0);
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("abc", ""), 0.0);
    }

    #[test]
    fn similarity_counts_blocks_on_both_sides() {
        // "lond" + "n" out of 5 + 6 characters.
        let ratio = similarity("londn", "london");
        assert!((ratio - 10.0 / 11.0).abs() < 1e-9, "ratio = {ratio}");

        // "ab" + "cd" on either side of the stray "x".
        let ratio = similarity("abxcd", "abcd");
        assert!((ratio - 8.0 / 9.0).abs() < 1e-9, "ratio = {ratio}");
    }

    #[test]
    fn best_match_finds_misspelling() {
        let resolver = Resolver::default();
        let out = resolver.resolve("Londn", &cities());

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].candidate, LocationCandidate::new("London", "United Kingdom"));
        assert!(out[0].score >= DEFAULT_CUTOFF);
    }

    #[test]
    fn best_match_ignores_case() {
        let out = Resolver::default().resolve("bOsTon", &cities());
        assert_eq!(out[0].candidate.name, "Boston");
        assert_eq!(out[0].score, 1.0);
    }

    #[test]
    fn best_match_below_cutoff_is_empty() {
        assert!(Resolver::default().resolve("xyzxyz", &cities()).is_empty());
    }

    #[test]
    fn best_match_keeps_first_of_equal_scores() {
        let candidates = vec![
            LocationCandidate::new("Alma", "A"),
            LocationCandidate::new("Alma", "B"),
        ];
        let out = Resolver::default().resolve("Alma", &candidates);
        assert_eq!(out[0].candidate.parent_region, "A");
    }

    #[test]
    fn substring_keeps_reference_order() {
        let resolver = Resolver::new(ResolverStrategy::Substring);
        let out = resolver.resolve("san", &cities());

        let names: Vec<_> = out.iter().map(|m| m.candidate.name.as_str()).collect();
        assert_eq!(names, ["San Francisco", "Santiago"]);
        assert_eq!(out[1].candidate.parent_region, "Chile");
    }

    #[test]
    fn empty_query_never_matches() {
        for strategy in [ResolverStrategy::default(), ResolverStrategy::Substring] {
            let resolver = Resolver::new(strategy);
            assert!(resolver.resolve("", &cities()).is_empty());
            assert!(resolver.resolve("  ", &cities()).is_empty());
        }
    }

    #[test]
    fn resolution_is_stable() {
        let resolver = Resolver::new(ResolverStrategy::Substring);
        assert_eq!(resolver.resolve("o", &cities()), resolver.resolve("o", &cities()));
    }

    #[test]
    fn strategy_from_str() {
        assert_eq!(
            ResolverStrategy::try_from("best_match").unwrap(),
            ResolverStrategy::BestMatch { cutoff: DEFAULT_CUTOFF }
        );
        assert_eq!(ResolverStrategy::try_from("Substring").unwrap(), ResolverStrategy::Substring);
        let err = ResolverStrategy::try_from("regex").unwrap_err();
        assert!(err.to_string().contains("Unknown resolver mode"));
    }

    #[test]
    fn strategy_deserializes_with_default_cutoff() {
        let s: ResolverStrategy = toml::from_str(r#"mode = "best_match""#).unwrap();
        assert_eq!(s, ResolverStrategy::BestMatch { cutoff: DEFAULT_CUTOFF });

        let s: ResolverStrategy = toml::from_str("mode = \"best_match\"\ncutoff = 0.5").unwrap();
        assert_eq!(s, ResolverStrategy::BestMatch { cutoff: 0.5 });
    }
}
