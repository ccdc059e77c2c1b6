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

//! The look-ahead policy `LA-N` of Petering and Hussein.
//!
//! Before falling back to moving the item that blocks the next retrieval,
//! the policy looks at the stacks holding the next `N` items and considers
//! their top items from the largest down. The first badly placed one that can
//! be put on a stack whose items are all larger is relocated there. The
//! blocking item itself is always a candidate, so a move is made every time.

use crate::policy::{RetrievalPolicy, look_ahead_relocate};
use stackyard_model::{err::BayError, state::BayState};

/// `LA-N`: voluntary relocations among the stacks of the next `N` items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookAheadPolicy {
    lookahead: usize,
    name: String,
}

impl LookAheadPolicy {
    /// Creates the policy looking at the next `lookahead` items.
    ///
    /// # Panics
    ///
    /// Panics if `lookahead` is zero.
    #[inline]
    pub fn new(lookahead: usize) -> Self {
        assert!(
            lookahead > 0,
            "called `LookAheadPolicy::new` with a lookahead of zero"
        );

        Self {
            lookahead,
            name: format!("LA-{}", lookahead),
        }
    }

    #[inline]
    pub fn lookahead(&self) -> usize {
        self.lookahead
    }
}

impl RetrievalPolicy for LookAheadPolicy {
    #[inline]
    fn name(&self) -> &str {
        &self.name
    }

    fn voluntary_move(&self, state: &mut BayState) -> Result<bool, BayError> {
        let num_stacks = state.num_stacks();

        // shrink the window until some stack outside of it has room
        let mut window = self.lookahead.min(state.num_remaining());
        let watched = loop {
            if window == 0 {
                return Ok(false);
            }
            let watched = state.stacks_for_lowest_items(window);
            let room_elsewhere =
                (0..num_stacks).any(|s| !watched.contains(&s) && state.remaining_slots(s) > 0);
            if room_elsewhere {
                break watched;
            }
            window -= 1;
        };

        let blocking = state
            .stack_for_item(state.next())
            .and_then(|s| state.top(s));

        let mut tops = state.tops(&watched);
        tops.sort_unstable();

        let chosen = tops.iter().rev().copied().find(|&item| {
            if Some(item) == blocking {
                return true;
            }
            let has_safe_destination =
                (0..num_stacks).any(|s| state.low(s) > item && state.remaining_slots(s) > 0);
            state.must_be_moved(item) && has_safe_destination
        });

        match chosen {
            Some(item) => {
                look_ahead_relocate(state, item)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{ForcedMovePolicy, HeuristicProvider};
    use stackyard_model::{
        generator::InstanceGenerator, instance::Instance, state::Operation,
    };

    fn state_of(stacks: Vec<Vec<usize>>, max_height: usize) -> BayState {
        BayState::new(&Instance::with_max_height(stacks, max_height).unwrap())
    }

    #[test]
    fn test_name_carries_lookahead() {
        let policy = LookAheadPolicy::new(3);
        assert_eq!(RetrievalPolicy::name(&policy), "LA-3");
        assert_eq!(policy.lookahead(), 3);
    }

    #[test]
    #[should_panic]
    fn test_zero_lookahead_panics() {
        let _ = LookAheadPolicy::new(0);
    }

    #[test]
    fn test_single_lookahead_moves_blocking_item() {
        let state = state_of(vec![vec![1, 3], vec![2, 4]], 3);
        let solved = LookAheadPolicy::new(1).solve(&state).unwrap();
        assert!(solved.is_empty());
        assert_eq!(solved.relocation_count(), 4);
    }

    #[test]
    fn test_lookahead_clears_item_above_second_next() {
        // 4 blocks 1, 6 blocks 2 and fits on 7
        let state = state_of(vec![vec![1, 4], vec![2, 6], vec![7], vec![3, 5]], 3);

        assert_eq!(
            LookAheadPolicy::new(2).solve_only_one(&state),
            Ok(Some(Operation::relocation(1, 2)))
        );
        assert_eq!(
            ForcedMovePolicy::new().solve_only_one(&state),
            Ok(Some(Operation::relocation(0, 2)))
        );
    }

    #[test]
    fn test_solutions_replay_on_random_instances() {
        for seed in 0..10 {
            let inst = InstanceGenerator::new(5, 4).seed(seed).generate().unwrap();
            let root = BayState::new(&inst);
            for lookahead in [1, 2, 4] {
                let solved = LookAheadPolicy::new(lookahead).solve(&root).unwrap();
                assert!(solved.is_empty());
                assert!(solved.relocation_count() >= root.lb3());

                let replayed = BayState::replay(&inst, solved.operations()).unwrap();
                assert_eq!(replayed, solved);
            }
        }
    }
}
