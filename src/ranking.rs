//! Ranking of nodes by externally computed scores.
//!
//! Centrality measures (degree, closeness, betweenness, eigenvector, ...) are computed elsewhere;
//! these helpers only consume their output as `(node, score)` pairs.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::hash::Hash;

/// Returns the `top_k` highest scoring nodes, best first.
///
/// Equal scores keep their input order. NaN scores rank below every number.
///
/// ```
/// use kakehashi::ranking::top_nodes;
///
/// let scores = vec![("a", 0.2), ("b", 0.9), ("c", f64::NAN), ("d", 0.5)];
///
/// assert_eq!(top_nodes(scores, 3), vec!["b", "d", "a"]);
/// ```
pub fn top_nodes<N, I>(scores: I, top_k: usize) -> Vec<N>
where
    I: IntoIterator<Item = (N, f64)>,
{
    let mut ranked: Vec<(N, f64)> = scores.into_iter().collect();
    ranked.sort_by(|(_, a), (_, b)| descending(*a, *b));

    ranked
        .into_iter()
        .take(top_k)
        .map(|(node, _)| node)
        .collect()
}

/// Unions the `top_k` nodes of several measures, in first-seen order and without duplicates.
pub fn influencers<N, M, I>(measures: I, top_k: usize) -> Vec<N>
where
    I: IntoIterator<Item = M>,
    M: IntoIterator<Item = (N, f64)>,
    N: Clone + Eq + Hash,
{
    let mut seen = HashSet::new();
    let mut found = vec![];

    for scores in measures {
        for node in top_nodes(scores, top_k) {
            if seen.insert(node.clone()) {
                found.push(node);
            }
        }
    }

    found
}

fn descending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.total_cmp(&a),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_nodes_ties_keep_input_order() {
        let scores = vec![(1, 0.5), (2, 0.7), (3, 0.5), (4, 0.5)];

        assert_eq!(top_nodes(scores.clone(), 3), vec![2, 1, 3]);
        assert_eq!(top_nodes(scores.clone(), 10), vec![2, 1, 3, 4]);
        assert!(top_nodes(scores, 0).is_empty());
    }

    #[test]
    fn top_nodes_nan_last() {
        let scores = vec![("x", f64::NAN), ("y", -1.0), ("z", f64::NAN)];

        assert_eq!(top_nodes(scores, 3), vec!["y", "x", "z"]);
    }

    #[test]
    fn influencers_are_deduplicated() {
        let degree = vec![("a", 3.0), ("b", 2.0), ("c", 1.0)];
        let betweenness = vec![("c", 0.9), ("a", 0.8), ("b", 0.1)];

        assert_eq!(influencers([degree, betweenness], 2), vec!["a", "b", "c"]);
    }

    #[test]
    fn influencers_of_nothing() {
        let none: Vec<Vec<(&str, f64)>> = vec![];

        assert!(influencers(none, 3).is_empty());
    }
}
