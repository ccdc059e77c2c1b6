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

//! Greedy retrieval policies.
//!
//! A `HeuristicProvider` turns a bay state into a completed one and is used
//! by the exact search to obtain its first incumbent. Most policies share the
//! same loop: retrieve while possible, otherwise let the policy make a
//! voluntary move, and fall back to a forced move of the item blocking the
//! next one. That loop is the `RetrievalPolicy` template; implementing it
//! yields a `HeuristicProvider` for free.

use stackyard_model::{
    err::{BayError, RelocationFault},
    state::{BayState, Operation},
};

/// A policy producing a complete retrieval plan.
pub trait HeuristicProvider {
    fn name(&self) -> &str;

    /// Returns a copy of `state` with every item retrieved.
    fn solve(&self, state: &BayState) -> Result<BayState, BayError>;

    /// Returns the relocation the policy would perform next from `state`
    /// after retrieving what can be retrieved, or `None` if that empties the
    /// bay.
    fn solve_only_one(&self, state: &BayState) -> Result<Option<Operation>, BayError>;
}

/// The retrieve / voluntary / forced template.
pub trait RetrievalPolicy {
    fn name(&self) -> &str;

    /// Performs a move chosen by the policy. Returns `false` if it declines,
    /// in which case a forced move follows.
    #[inline]
    fn voluntary_move(&self, _state: &mut BayState) -> Result<bool, BayError> {
        Ok(false)
    }

    /// Relocates the item directly above the next one.
    fn forced_move(&self, state: &mut BayState) -> Result<(), BayError> {
        let next = state.next();
        let top = state
            .stack_for_item(next)
            .and_then(|s| state.top(s))
            .ok_or_else(|| {
                BayError::InternalInconsistency(format!("item {} is due but not stored", next))
            })?;
        look_ahead_relocate(state, top)
    }
}

impl<P> HeuristicProvider for P
where
    P: RetrievalPolicy,
{
    #[inline]
    fn name(&self) -> &str {
        RetrievalPolicy::name(self)
    }

    fn solve(&self, state: &BayState) -> Result<BayState, BayError> {
        let mut state = state.clone();
        while !state.is_empty() {
            if !state.retrieve_next()? {
                step(self, &mut state)?;
            }
        }
        Ok(state)
    }

    fn solve_only_one(&self, state: &BayState) -> Result<Option<Operation>, BayError> {
        let mut state = state.clone();
        state.retrieve_all()?;
        if state.is_empty() {
            return Ok(None);
        }
        step(self, &mut state)?;
        Ok(state.operations().last().copied())
    }
}

#[inline]
fn step<P: RetrievalPolicy + ?Sized>(policy: &P, state: &mut BayState) -> Result<(), BayError> {
    if !policy.voluntary_move(state)? {
        policy.forced_move(state)?;
    }
    Ok(())
}

/// Chooses where to relocate `item`: the stack whose minimum exceeds `item`
/// by the least, or, if no stack can hold it well placed, the stack with the
/// largest minimum. Full stacks and the stack of `item` are skipped.
pub fn best_destination(state: &BayState, item: usize) -> Option<usize> {
    let origin = state.stack_for_item(item);
    let mut best: Option<usize> = None;

    for s in 0..state.num_stacks() {
        if Some(s) == origin || state.remaining_slots(s) == 0 {
            continue;
        }

        let Some(b) = best else {
            best = Some(s);
            continue;
        };

        let (low, best_low) = (state.low(s), state.low(b));
        let better = if low > item {
            best_low < item || low < best_low
        } else {
            best_low < item && low > best_low
        };
        if better {
            best = Some(s);
        }
    }

    best
}

/// Relocates `item`, which must be on top of its stack, to
/// `best_destination`.
pub fn look_ahead_relocate(state: &mut BayState, item: usize) -> Result<(), BayError> {
    let from = state.stack_for_item(item).ok_or_else(|| {
        BayError::InternalInconsistency(format!("item {} is not stored in any stack", item))
    })?;
    debug_assert_eq!(
        state.top(from),
        Some(item),
        "called `look_ahead_relocate` with an item that is not on top of its stack"
    );

    let to = best_destination(state, item).ok_or(BayError::InvalidRelocation {
        from,
        to: from,
        fault: RelocationFault::NoDestination,
    })?;
    state.relocate(from, to)
}

/// The bare template: retrieve when possible, otherwise move the item that
/// blocks the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ForcedMovePolicy;

impl ForcedMovePolicy {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl RetrievalPolicy for ForcedMovePolicy {
    #[inline]
    fn name(&self) -> &str {
        "base"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackyard_model::instance::Instance;

    fn state_of(stacks: Vec<Vec<usize>>, max_height: usize) -> BayState {
        BayState::new(&Instance::with_max_height(stacks, max_height).unwrap())
    }

    #[test]
    fn test_best_destination_prefers_tightest_well_placed_stack() {
        // item 4 on stack 0; stacks 1, 2, 3 have minimums 6, 5, 2
        let state = state_of(vec![vec![1, 4], vec![6], vec![5, 7], vec![2, 3]], 3);
        assert_eq!(best_destination(&state, 4), Some(2));
    }

    #[test]
    fn test_best_destination_falls_back_to_largest_minimum() {
        // every other minimum is below 7
        let state = state_of(vec![vec![5, 7], vec![2], vec![3, 6], vec![1, 4]], 3);
        assert_eq!(best_destination(&state, 7), Some(2));
    }

    #[test]
    fn test_best_destination_skips_full_stacks() {
        let state = state_of(vec![vec![1, 4], vec![5, 3], vec![2]], 2);
        assert_eq!(best_destination(&state, 4), Some(2));

        let state = state_of(vec![vec![1, 2], vec![3, 4]], 2);
        assert_eq!(best_destination(&state, 2), None);
    }

    #[test]
    fn test_forced_policy_solves_two_stacks() {
        let state = state_of(vec![vec![1, 3], vec![2, 4]], 3);
        let solved = ForcedMovePolicy::new().solve(&state).unwrap();
        assert!(solved.is_empty());
        assert_eq!(solved.relocation_count(), 4);
        // input is left untouched
        assert_eq!(state.relocation_count(), 0);
        assert_eq!(state.next(), 1);
    }

    #[test]
    fn test_solve_only_one_returns_next_relocation() {
        let policy = ForcedMovePolicy::new();
        let state = state_of(vec![vec![1, 3], vec![2, 4]], 3);
        assert_eq!(
            policy.solve_only_one(&state),
            Ok(Some(Operation::relocation(0, 1)))
        );

        let solved = state_of(vec![vec![2, 1], vec![]], 2);
        assert_eq!(policy.solve_only_one(&solved), Ok(None));
    }

    #[test]
    fn test_no_room_is_reported() {
        let state = state_of(vec![vec![1, 2], vec![3, 4]], 2);
        assert_eq!(
            ForcedMovePolicy::new().solve(&state),
            Err(BayError::InvalidRelocation {
                from: 0,
                to: 0,
                fault: RelocationFault::NoDestination
            })
        );
    }

    #[test]
    fn test_solved_state_is_returned_as_is() {
        let mut state = state_of(vec![vec![1]], 1);
        state.retrieve_all().unwrap();
        let solved = ForcedMovePolicy::new().solve(&state).unwrap();
        assert_eq!(solved, state);
    }
}
