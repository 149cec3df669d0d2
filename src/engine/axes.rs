//! Lazy per-axis node enumeration.
//!
//! Each axis is a small state machine over cloned navigators, yielding
//! positions in the axis's natural order: document order for forward axes,
//! reverse document order for `ancestor`, `ancestor-or-self`, `preceding`,
//! and `preceding-sibling`. Streams never mutate state outside their own
//! clones, and a fresh stream over the same start node replays the same
//! nodes, so `[1]` can stop pulling after one hit while `[last()]` drains
//! the stream.

use crate::model::{Navigator, NodeKind};
use crate::parser::ast::Axis;

/// Builds the stream for `axis` from `start`. The start navigator is cloned;
/// the caller's position is untouched.
pub fn axis_stream<N: Navigator>(start: &N, axis: Axis) -> AxisStream<N> {
    let state = match axis {
        Axis::SelfAxis => State::Pending(start.clone()),
        Axis::Parent => {
            let mut nav = start.clone();
            if nav.move_to_parent() {
                State::Pending(nav)
            } else {
                State::Done
            }
        }
        Axis::Child => {
            let mut nav = start.clone();
            if nav.move_to_first_child() {
                State::Siblings {
                    cur: nav,
                    forward: true,
                }
            } else {
                State::Done
            }
        }
        Axis::FollowingSibling => {
            let mut nav = start.clone();
            if nav.move_to_next_sibling() {
                State::Siblings {
                    cur: nav,
                    forward: true,
                }
            } else {
                State::Done
            }
        }
        Axis::PrecedingSibling => {
            let mut nav = start.clone();
            if nav.move_to_previous_sibling() {
                State::Siblings {
                    cur: nav,
                    forward: false,
                }
            } else {
                State::Done
            }
        }
        Axis::Ancestor => {
            let mut nav = start.clone();
            if nav.move_to_parent() {
                State::Ancestors(nav)
            } else {
                State::Done
            }
        }
        Axis::AncestorOrSelf => State::Ancestors(start.clone()),
        Axis::Descendant => State::Descend {
            cur: start.clone(),
            depth: 0,
        },
        Axis::DescendantOrSelf => State::DescendFrom(start.clone()),
        Axis::Following => {
            let mut nav = start.clone();
            // An attribute has no subtree of its own; the owning element's
            // children are the first following nodes.
            let from_attribute =
                matches!(nav.node_kind(), NodeKind::Attribute | NodeKind::Namespace);
            if from_attribute && !nav.move_to_parent() {
                State::Done
            } else {
                State::Follow {
                    cur: nav,
                    allow_descend: from_attribute,
                }
            }
        }
        Axis::Preceding => {
            let mut nav = start.clone();
            let from_attribute =
                matches!(nav.node_kind(), NodeKind::Attribute | NodeKind::Namespace);
            if from_attribute && !nav.move_to_parent() {
                State::Done
            } else {
                State::Precede { cur: nav, depth: 0 }
            }
        }
        Axis::Attribute => {
            let mut nav = start.clone();
            if nav.move_to_first_attribute() {
                State::Attributes(nav)
            } else {
                State::Done
            }
        }
        Axis::Namespace => {
            let mut nav = start.clone();
            if nav.move_to_first_namespace() {
                State::Namespaces(nav)
            } else {
                State::Done
            }
        }
    };
    AxisStream { state }
}

pub struct AxisStream<N> {
    state: State<N>,
}

enum State<N> {
    Done,
    /// Yields one node, then ends (`self`, `parent`).
    Pending(N),
    /// `child` and the sibling axes: `cur` is the next node to yield.
    Siblings { cur: N, forward: bool },
    /// Root-ward chain; `cur` is the next node to yield.
    Ancestors(N),
    /// Depth-first pre-order below `cur`; `depth` is the distance from the
    /// start node.
    Descend { cur: N, depth: usize },
    /// `descendant-or-self`: yield the start, then switch to `Descend`.
    DescendFrom(N),
    /// Everything after the start in document order, minus its subtree.
    Follow { cur: N, allow_descend: bool },
    /// Everything before the start in reverse document order, minus the
    /// ancestors. `depth` > 0 means the walk is inside a preceding subtree,
    /// where climbing to a parent yields it; at depth 0 a parent is an
    /// ancestor of the start and is skipped.
    Precede { cur: N, depth: usize },
    Attributes(N),
    Namespaces(N),
}

impl<N: Navigator> Iterator for AxisStream<N> {
    type Item = N;

    fn next(&mut self) -> Option<N> {
        let state = std::mem::replace(&mut self.state, State::Done);
        let (out, next_state) = step(state);
        self.state = next_state;
        out
    }
}

fn step<N: Navigator>(state: State<N>) -> (Option<N>, State<N>) {
    match state {
        State::Done => (None, State::Done),
        State::Pending(nav) => (Some(nav), State::Done),
        State::Siblings { mut cur, forward } => {
            let out = cur.clone();
            let moved = if forward {
                cur.move_to_next_sibling()
            } else {
                cur.move_to_previous_sibling()
            };
            let next = if moved {
                State::Siblings { cur, forward }
            } else {
                State::Done
            };
            (Some(out), next)
        }
        State::Ancestors(mut cur) => {
            let out = cur.clone();
            let next = if cur.move_to_parent() {
                State::Ancestors(cur)
            } else {
                State::Done
            };
            (Some(out), next)
        }
        State::Descend { mut cur, mut depth } => {
            if cur.move_to_first_child() {
                depth += 1;
                let out = cur.clone();
                return (Some(out), State::Descend { cur, depth });
            }
            while depth > 0 {
                if cur.move_to_next_sibling() {
                    let out = cur.clone();
                    return (Some(out), State::Descend { cur, depth });
                }
                if !cur.move_to_parent() {
                    break;
                }
                depth -= 1;
            }
            (None, State::Done)
        }
        State::DescendFrom(cur) => {
            let out = cur.clone();
            (Some(out), State::Descend { cur, depth: 0 })
        }
        State::Follow {
            mut cur,
            allow_descend,
        } => {
            if allow_descend && cur.move_to_first_child() {
                let out = cur.clone();
                return (
                    Some(out),
                    State::Follow {
                        cur,
                        allow_descend: true,
                    },
                );
            }
            loop {
                if cur.move_to_next_sibling() {
                    let out = cur.clone();
                    return (
                        Some(out),
                        State::Follow {
                            cur,
                            allow_descend: true,
                        },
                    );
                }
                if !cur.move_to_parent() {
                    return (None, State::Done);
                }
            }
        }
        State::Precede { mut cur, mut depth } => loop {
            if cur.move_to_previous_sibling() {
                // Enter the preceding subtree at its last, deepest node:
                // that is the document-order predecessor.
                while cur.move_to_first_child() {
                    depth += 1;
                    while cur.move_to_next_sibling() {}
                }
                let out = cur.clone();
                return (Some(out), State::Precede { cur, depth });
            }
            if depth > 0 {
                cur.move_to_parent();
                depth -= 1;
                let out = cur.clone();
                return (Some(out), State::Precede { cur, depth });
            }
            if !cur.move_to_parent() {
                return (None, State::Done);
            }
        },
        State::Attributes(mut cur) => {
            let out = cur.clone();
            let next = if cur.move_to_next_attribute() {
                State::Attributes(cur)
            } else {
                State::Done
            };
            (Some(out), next)
        }
        State::Namespaces(mut cur) => {
            let out = cur.clone();
            let next = if cur.move_to_next_namespace() {
                State::Namespaces(cur)
            } else {
                State::Done
            };
            (Some(out), next)
        }
    }
}
