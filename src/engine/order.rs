//! Document order and deduplication for node-sets.
//!
//! Ordering uses the navigator's [`document_order_hint`] when every node in
//! the set carries one. Otherwise ranks come from a single depth-first walk
//! of the document: each visited position is compared against the still
//! unresolved set members with `is_same_position`, so the walk resolves the
//! whole set in one pass instead of pairwise scans. Attributes rank directly
//! after their owning element (before its namespaces and children); relative
//! order among one element's attributes is the navigator's attribute-move
//! order, stable within an evaluation.
//!
//! [`document_order_hint`]: crate::model::Navigator::document_order_hint

use crate::model::Navigator;

/// Sorts `nodes` into document order and removes duplicate positions.
pub fn doc_order_distinct<N: Navigator>(nodes: Vec<N>) -> Vec<N> {
    if nodes.len() <= 1 {
        return nodes;
    }
    let ranks = match hint_ranks(&nodes) {
        Some(ranks) => ranks,
        None => walk_ranks(&nodes),
    };
    let mut keyed: Vec<(u64, N)> = ranks.into_iter().zip(nodes).collect();
    keyed.sort_by_key(|(rank, _)| *rank);
    keyed.dedup_by(|a, b| a.0 == b.0 && a.0 != u64::MAX);
    keyed.into_iter().map(|(_, node)| node).collect()
}

fn hint_ranks<N: Navigator>(nodes: &[N]) -> Option<Vec<u64>> {
    nodes.iter().map(Navigator::document_order_hint).collect()
}

/// Ranks set members by walking the document once from the root: node, its
/// attributes, its namespaces, then children. Members the walk never reaches
/// (foreign trees) keep `u64::MAX` and sort last in their incoming order.
fn walk_ranks<N: Navigator>(nodes: &[N]) -> Vec<u64> {
    let mut ranks = vec![u64::MAX; nodes.len()];
    let mut pending: Vec<usize> = (0..nodes.len()).collect();
    let mut counter: u64 = 0;

    let mut walker = nodes[0].clone();
    walker.move_to_root();
    let mut depth = 0usize;

    'walk: loop {
        counter += 1;
        resolve(&walker, counter, nodes, &mut pending, &mut ranks);
        {
            let mut attr = walker.clone();
            if attr.move_to_first_attribute() {
                loop {
                    counter += 1;
                    resolve(&attr, counter, nodes, &mut pending, &mut ranks);
                    if !attr.move_to_next_attribute() {
                        break;
                    }
                }
            }
        }
        {
            let mut ns = walker.clone();
            if ns.move_to_first_namespace() {
                loop {
                    counter += 1;
                    resolve(&ns, counter, nodes, &mut pending, &mut ranks);
                    if !ns.move_to_next_namespace() {
                        break;
                    }
                }
            }
        }
        if pending.is_empty() {
            break;
        }
        if walker.move_to_first_child() {
            depth += 1;
            continue;
        }
        loop {
            if walker.move_to_next_sibling() {
                continue 'walk;
            }
            if depth == 0 {
                break 'walk;
            }
            walker.move_to_parent();
            depth -= 1;
        }
    }
    ranks
}

fn resolve<N: Navigator>(
    at: &N,
    rank: u64,
    nodes: &[N],
    pending: &mut Vec<usize>,
    ranks: &mut [u64],
) {
    pending.retain(|&i| {
        if nodes[i].is_same_position(at) {
            ranks[i] = rank;
            false
        } else {
            true
        }
    });
}
