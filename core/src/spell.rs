//! Edit-distance suggestion over the term dictionary, for "did you mean"
//! corrections of query tokens that match nothing.

use crate::index::SearchIndex;

/// Candidates further than this from the query token are never suggested.
pub const MAX_EDIT_DISTANCE: u32 = 2;

/// Levenshtein distance with an upper bound: returns `None` as soon as the
/// distance provably exceeds `bound`, so dictionary scans stay cheap.
pub fn bounded_edit_distance(a: &str, b: &str, bound: u32) -> Option<u32> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (n, m) = (a.len(), b.len());
    if n.abs_diff(m) > bound as usize {
        return None;
    }

    let mut prev: Vec<u32> = (0..=m as u32).collect();
    let mut cur = vec![0u32; m + 1];
    for i in 1..=n {
        cur[0] = i as u32;
        let mut row_min = cur[0];
        for j in 1..=m {
            let cost = u32::from(a[i - 1] != b[j - 1]);
            cur[j] = (prev[j] + 1).min(cur[j - 1] + 1).min(prev[j - 1] + cost);
            row_min = row_min.min(cur[j]);
        }
        if row_min > bound {
            return None;
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    (prev[m] <= bound).then_some(prev[m])
}

/// Nearest dictionary term within `MAX_EDIT_DISTANCE` of `token`, or `None`.
/// Ties break on smaller distance first, then lexicographically smallest
/// term, so suggestions are deterministic across runs.
pub fn suggest(index: &SearchIndex, token: &str) -> Option<String> {
    let mut best: Option<(u32, &str)> = None;
    for term in index.terms() {
        let Some(dist) = bounded_edit_distance(token, term, MAX_EDIT_DISTANCE) else {
            continue;
        };
        let better = match best {
            None => true,
            Some((bd, bt)) => dist < bd || (dist == bd && term < bt),
        };
        if better {
            best = Some((dist, term));
        }
    }
    best.map(|(_, term)| term.to_string())
}
