// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Branch generation shared by the engines.
//!
//! Every relocation of a top item is a branch, except
//! - moves out of the stack that received the previous relocation (undoing
//!   or chaining the same item is never needed),
//! - moves onto a full stack or onto the source itself,
//! - moves onto an empty stack once an earlier empty stack already produced
//!   a child for the same source (empty stacks are interchangeable).
//!
//! A branch is kept only if its lookahead bound
//! `relocations + 1 + lb1 + from_diff + to_diff` stays below the incumbent,
//! where `from_diff` is `-1` when the moved item is badly placed at the
//! source and `to_diff` is `+1` when it becomes badly placed at the
//! destination.

use crate::stats::SearchStatistics;
use smallvec::SmallVec;
use stackyard_model::state::BayState;

/// A relocation together with its lookahead bound. Orders by bound, then
/// source, then destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Branch {
    pub bound: usize,
    pub from: usize,
    pub to: usize,
}

impl std::fmt::Display for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Branch({} -> {}, bound: {})", self.from, self.to, self.bound)
    }
}

pub type Branches = SmallVec<[Branch; 32]>;

/// Collects the branches of `state` whose lookahead bound is below
/// `upper_bound`, in source-major order.
pub fn candidate_branches(
    state: &BayState,
    upper_bound: usize,
    stats: &mut SearchStatistics,
) -> Branches {
    let mut branches = Branches::new();
    let base = state.relocation_count() + 1 + state.lb1();
    let last = state.last_relocated_to();

    for from in 0..state.num_stacks() {
        if Some(from) == last {
            continue;
        }
        let Some(item) = state.top(from) else {
            continue;
        };
        let leaves_badly_placed = usize::from(state.low(from) < item);

        let mut relocated_to_empty = false;
        for to in 0..state.num_stacks() {
            if to == from || state.remaining_slots(to) == 0 {
                continue;
            }
            let to_empty = state.height(to) == 0;
            if to_empty && relocated_to_empty {
                continue;
            }
            let becomes_badly_placed = usize::from(state.low(to) < item);
            let bound = base + becomes_badly_placed - leaves_badly_placed;
            if bound < upper_bound {
                branches.push(Branch { bound, from, to });
                stats.on_child_generated();
                if to_empty {
                    relocated_to_empty = true;
                }
            } else {
                stats.on_pruning_bound();
            }
        }
    }

    branches
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackyard_model::instance::{HeightLimit, Instance};

    fn branch(bound: usize, from: usize, to: usize) -> Branch {
        Branch { bound, from, to }
    }

    #[test]
    fn test_only_first_empty_destination_is_used() {
        let instance =
            Instance::new(vec![vec![1, 2], vec![], vec![]], HeightLimit::Fixed(2)).unwrap();
        let state = BayState::new(&instance);
        let mut stats = SearchStatistics::default();
        let branches = candidate_branches(&state, usize::MAX, &mut stats);
        assert_eq!(branches.as_slice(), &[branch(1, 0, 1)]);
        assert_eq!(stats.children_generated, 1);
    }

    #[test]
    fn test_lookahead_bound() {
        // stack 0: 1 3 2 (3 badly placed above 1; 2 above 1 as well)
        let instance =
            Instance::new(vec![vec![1, 3, 2], vec![4]], HeightLimit::Fixed(3)).unwrap();
        let state = BayState::new(&instance);
        assert_eq!(state.lb1(), 2);
        let mut stats = SearchStatistics::default();
        let branches = candidate_branches(&state, usize::MAX, &mut stats);
        // moving 2 out of stack 0 fixes it; 4 is larger, so no new badly placed item
        // moving 4 onto stack 0 is impossible, the stack is full
        assert_eq!(branches.as_slice(), &[branch(2, 0, 1)]);
    }

    #[test]
    fn test_bound_filters_and_counts_prunings() {
        let instance =
            Instance::new(vec![vec![1, 3], vec![2], vec![4]], HeightLimit::Fixed(3)).unwrap();
        let state = BayState::new(&instance);
        assert_eq!(state.lb1(), 1);
        let mut stats = SearchStatistics::default();
        let all = candidate_branches(&state, usize::MAX, &mut stats);
        assert_eq!(
            all.as_slice(),
            &[
                branch(2, 0, 1),
                branch(1, 0, 2),
                branch(3, 1, 0),
                branch(2, 1, 2),
                branch(3, 2, 0),
                branch(3, 2, 1),
            ]
        );

        let mut stats = SearchStatistics::default();
        let tight = candidate_branches(&state, 2, &mut stats);
        assert_eq!(tight.as_slice(), &[branch(1, 0, 2)]);
        assert_eq!(stats.prunings_bound, 5);
    }

    #[test]
    fn test_previous_destination_is_not_a_source() {
        let instance =
            Instance::new(vec![vec![1, 3], vec![2], vec![]], HeightLimit::Fixed(3)).unwrap();
        let mut state = BayState::new(&instance);
        state.relocate(0, 2).unwrap();
        let mut stats = SearchStatistics::default();
        let branches = candidate_branches(&state, usize::MAX, &mut stats);
        assert!(branches.iter().all(|b| b.from != 2));
        assert!(!branches.is_empty());
    }

    #[test]
    fn test_ordering_is_bound_then_stacks() {
        let mut branches = vec![branch(3, 0, 1), branch(2, 1, 0), branch(2, 0, 2)];
        branches.sort();
        assert_eq!(branches, vec![branch(2, 0, 2), branch(2, 1, 0), branch(3, 0, 1)]);
    }
}
