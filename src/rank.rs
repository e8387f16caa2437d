// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tiered fuzzy ranking of catalog names against a partial search term.
//!
//! Four tiers, first hit wins: exact, prefix, substring, subsequence. The fuzzy
//! weights are empirical product constants; do not re-derive them.

use smol_str::SmolStr;

/// Maximum number of suggestions returned when the caller does not ask otherwise.
pub const DEFAULT_LIMIT: usize = 10;

/// Minimum pre-scaling subsequence score for a candidate to be listed at all.
pub const FUZZY_ACCEPT_THRESHOLD: f64 = 0.3;
/// Scale applied to an accepted subsequence score.
pub const FUZZY_SCALE: f64 = 700.0;
/// Weight of the longest-consecutive-run bonus.
pub const CONSECUTIVE_WEIGHT: f64 = 0.3;
/// Weight of the target-longer-than-query penalty.
pub const LENGTH_PENALTY_WEIGHT: f64 = 0.2;

const EXACT_SCORE: i64 = 1000;
const PREFIX_BASE: i64 = 900;
const SUBSTRING_BASE: i64 = 800;
const SUBSTRING_OFFSET_WEIGHT: i64 = 10;

/// One ranked candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedMatch {
    pub name: SmolStr,
    pub score: i64,
}

/// Ranks `candidates` against `query`, best first.
///
/// Scores of zero are dropped, ties keep input order (the sort is stable and
/// compares nothing but the score), and the list is truncated to `limit`.
pub fn rank<I, S>(query: &str, candidates: I, limit: usize) -> Vec<RankedMatch>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let query_lower = query.to_lowercase();

    let mut scored: Vec<RankedMatch> = candidates
        .into_iter()
        .filter_map(|name| {
            let score = score(&query_lower, name.as_ref());
            (score > 0).then(|| RankedMatch {
                name: SmolStr::new(name.as_ref()),
                score,
            })
        })
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(limit);
    scored
}

/// Tiered score of one candidate against an already-lowercased query.
pub fn score(query_lower: &str, name: &str) -> i64 {
    let name_lower = name.to_lowercase();

    if name_lower == query_lower {
        return EXACT_SCORE;
    }

    let query_len = query_lower.chars().count() as i64;
    if name_lower.starts_with(query_lower) {
        return PREFIX_BASE - query_len;
    }

    if let Some(at) = name_lower.find(query_lower) {
        let char_offset = name_lower[..at].chars().count() as i64;
        return SUBSTRING_BASE - SUBSTRING_OFFSET_WEIGHT * char_offset;
    }

    let fuzzy = subsequence_score(query_lower, &name_lower);
    if fuzzy > FUZZY_ACCEPT_THRESHOLD {
        (fuzzy * FUZZY_SCALE).floor() as i64
    } else {
        0
    }
}

/// Pre-scaling subsequence score in `[0, 1.3]`-ish territory, 0 when the query
/// is not an in-order subsequence of the target.
fn subsequence_score(query: &str, target: &str) -> f64 {
    let query: Vec<char> = query.chars().collect();
    let target_len = target.chars().count();
    if query.is_empty() || query.len() > target_len {
        return 0.0;
    }

    let mut wanted = 0usize;
    let mut matched = 0usize;
    let mut run = 0usize;
    let mut longest_run = 0usize;

    for ch in target.chars() {
        if wanted == query.len() {
            break;
        }
        if ch == query[wanted] {
            matched += 1;
            run += 1;
            longest_run = longest_run.max(run);
            wanted += 1;
        } else {
            run = 0;
        }
    }

    if wanted < query.len() {
        return 0.0;
    }

    let query_len = query.len() as f64;
    let ratio = matched as f64 / query_len;
    let consecutive_bonus = (longest_run as f64 / query_len) * CONSECUTIVE_WEIGHT;
    let length_penalty =
        ((target_len - query.len()) as f64 / target_len as f64) * LENGTH_PENALTY_WEIGHT;

    (ratio + consecutive_bonus - length_penalty).max(0.0)
}
