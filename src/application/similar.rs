//! Related-entry ranking by shared categories and tags.
//!
//! A candidate is scored once for overlapping the current entry's categories
//! and once for overlapping its tags. Only candidates that score on both axes
//! are returned, strongest first, each id at most once.

use std::collections::{HashMap, HashSet};

use metrics::counter;
use tracing::debug;

use crate::domain::entities::Taxonomy;

/// Rank `pool` entries related to `current`.
///
/// The result borrows from `pool`. Equal scores keep pool order.
pub fn similar_items<'a, T>(current: &T, pool: &'a [T]) -> Vec<&'a T>
where
    T: Taxonomy,
{
    counter!("chongyan_similar_queries_total").increment(1);

    let categories = current.categories();
    let tags = current.tags();

    let by_category = pool
        .iter()
        .filter(|item| shares_label(categories, item.categories()));
    let by_tag = pool.iter().filter(|item| shares_label(tags, item.tags()));

    let mut merged: Vec<&'a T> = by_category
        .chain(by_tag)
        .filter(|item| item.id() != current.id())
        .collect();

    let mut scores: HashMap<&str, usize> = HashMap::new();
    for item in merged.iter().copied() {
        *scores.entry(item.id()).or_insert(0) += 1;
    }

    let score_of = |item: &&'a T| scores.get(item.id()).copied().unwrap_or(0);
    merged.sort_by(|a, b| score_of(b).cmp(&score_of(a)));

    let mut seen = HashSet::new();
    let mut related: Vec<&'a T> = Vec::new();
    for item in merged {
        if score_of(&item) > 1 && seen.insert(item.id()) {
            related.push(item);
        }
    }

    debug!(
        target = "chongyan::similar",
        current = current.id(),
        pool = pool.len(),
        related = related.len(),
        "ranked related entries"
    );

    related
}

fn shares_label(wanted: &[String], labels: &[String]) -> bool {
    wanted.iter().any(|label| labels.contains(label))
}
