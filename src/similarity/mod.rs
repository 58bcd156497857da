//! Character n-gram Jaccard similarity used by the uniqueness gate.

use std::collections::HashSet;

pub const DEFAULT_NGRAM_SIZE: usize = 3;

/// Result of checking a candidate against the comparison window.
#[derive(Debug, Clone, PartialEq)]
pub struct UniquenessReport {
    pub unique: bool,
    /// Highest score over the whole window, even when `unique` is false.
    pub max_similarity: f64,
    pub closest_match: Option<String>,
}

/// Lowercase and drop everything outside `[a-z0-9\s]`.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect()
}

/// Set of contiguous character n-grams of the normalized text.
///
/// Text shorter than `n` (but not empty) yields itself as the only gram, so
/// short identical strings still compare as identical.
pub fn ngrams(text: &str, n: usize) -> HashSet<String> {
    let n = n.max(1);
    let chars: Vec<char> = normalize(text).chars().collect();
    if chars.is_empty() {
        return HashSet::new();
    }
    if chars.len() < n {
        return HashSet::from([chars.into_iter().collect()]);
    }
    chars.windows(n).map(|w| w.iter().collect()).collect()
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    #[allow(clippy::cast_precision_loss)]
    let score = 100.0 * intersection as f64 / union as f64;
    score
}

/// Jaccard similarity of the n-gram sets, as a percentage in `[0, 100]`.
pub fn similarity(a: &str, b: &str, n: usize) -> f64 {
    jaccard(&ngrams(a, n), &ngrams(b, n))
}

/// Compare `candidate` against every window member.
///
/// `unique` is false as soon as one score is strictly greater than
/// `threshold`; the scan still runs to the end so `max_similarity` is exact.
pub fn is_unique<S: AsRef<str>>(
    candidate: &str,
    window: &[S],
    threshold: f64,
    n: usize,
) -> UniquenessReport {
    let candidate_grams = ngrams(candidate, n);
    let mut report = UniquenessReport {
        unique: true,
        max_similarity: 0.0,
        closest_match: None,
    };

    for member in window {
        let member = member.as_ref();
        let score = jaccard(&candidate_grams, &ngrams(member, n));
        if score > threshold {
            report.unique = false;
        }
        if report.closest_match.is_none() || score > report.max_similarity {
            report.max_similarity = score;
            report.closest_match = Some(member.to_string());
        }
    }

    report
}
