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

//! Mutable bay state for the block relocation problem.
//!
//! `BayState` holds one arrangement of items across the stacks of a bay and
//! keeps enough bookkeeping up to date on every move to answer the cheap
//! lower bound in constant time:
//! - `low[s]`: the smallest item in stack `s` (`n + 1` when empty).
//! - `must_be_moved`: bitset of items sitting above a smaller item.
//! - `lb`: the number of such badly placed items.
//!
//! Every relocation and retrieval is appended to an operation log. The log is
//! the audit trail of a solution and at the same time the undo stack used by
//! the recursive search: `undo_last_move` is the exact inverse of the last
//! logged operation, including the bookkeeping above.

use crate::{
    err::{BayError, RelocationFault},
    instance::Instance,
};
use fixedbitset::FixedBitSet;

/// A logged move. A relocation moves the top item of `from` onto `to`; a
/// retrieval is stored with `from == to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Operation {
    pub from: usize,
    pub to: usize,
}

impl Operation {
    /// Creates a relocation from `from` to `to`.
    #[inline]
    pub const fn relocation(from: usize, to: usize) -> Self {
        Self { from, to }
    }

    /// Creates a retrieval from `stack`.
    #[inline]
    pub const fn retrieval(stack: usize) -> Self {
        Self {
            from: stack,
            to: stack,
        }
    }

    /// Returns `true` if this operation retrieves an item.
    #[inline]
    pub const fn is_retrieval(&self) -> bool {
        self.from == self.to
    }

    /// Returns `true` if this operation relocates an item.
    #[inline]
    pub const fn is_relocation(&self) -> bool {
        self.from != self.to
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_retrieval() {
            write!(f, "Retrieve(from: {})", self.from)
        } else {
            write!(f, "Relocate(from: {}, to: {})", self.from, self.to)
        }
    }
}

/// One configuration of the bay.
///
/// Invariants:
/// - Every item in `next..=n` is stored in exactly one stack, exactly once,
///   and `stack_for_item` points at that stack.
/// - No stack holds more than `max_height` items.
/// - `low[s]` is the minimum of stack `s`, or `n + 1` if it is empty.
/// - `must_be_moved[i]` holds for a stored item `i` iff some item below it is
///   smaller; `lb` is the number of such items.
/// - `relocation_count` equals the number of relocations in `operations`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BayState {
    stacks: Vec<Vec<usize>>,
    stack_for_item: Vec<Option<usize>>,
    low: Vec<usize>,
    must_be_moved: FixedBitSet,
    operations: Vec<Operation>,
    max_height: usize,
    num_items: usize,
    next: usize,
    num_remaining: usize,
    lb: usize,
    relocation_count: usize,
}

impl BayState {
    /// Creates the initial state of `instance`, pushing every stack bottom-up.
    pub fn new(instance: &Instance) -> Self {
        let num_items = instance.num_items();
        let max_height = instance.max_height();
        let num_stacks = instance.num_stacks();

        let mut state = Self {
            stacks: (0..num_stacks)
                .map(|_| Vec::with_capacity(max_height))
                .collect(),
            stack_for_item: vec![None; num_items + 1],
            low: vec![num_items + 1; num_stacks],
            must_be_moved: FixedBitSet::with_capacity(num_items + 1),
            operations: Vec::new(),
            max_height,
            num_items,
            next: 1,
            num_remaining: 0,
            lb: 0,
            relocation_count: 0,
        };

        for (s, stack) in instance.stacks().iter().enumerate() {
            for &item in stack {
                state.push(s, item);
            }
        }

        state
    }

    /// Rebuilds the state reached by applying `operations` to the initial
    /// state of `instance`, validating every step.
    pub fn replay(instance: &Instance, operations: &[Operation]) -> Result<Self, BayError> {
        let mut state = Self::new(instance);
        for &op in operations {
            state.apply(op)?;
        }
        Ok(state)
    }

    /// Returns the number of stacks `W`.
    #[inline]
    pub fn num_stacks(&self) -> usize {
        self.stacks.len()
    }

    /// Returns the height capacity `H`.
    #[inline]
    pub fn max_height(&self) -> usize {
        self.max_height
    }

    /// Returns the number of items `n` of the instance.
    #[inline]
    pub fn num_items(&self) -> usize {
        self.num_items
    }

    /// Returns the smallest item not yet retrieved (`n + 1` once empty).
    #[inline]
    pub fn next(&self) -> usize {
        self.next
    }

    /// Returns the number of items still stored in the bay.
    #[inline]
    pub fn num_remaining(&self) -> usize {
        self.num_remaining
    }

    /// Returns the number of relocations performed so far.
    #[inline]
    pub fn relocation_count(&self) -> usize {
        self.relocation_count
    }

    /// Returns the number of badly placed items.
    #[inline]
    pub fn badly_placed(&self) -> usize {
        self.lb
    }

    /// Returns the operation log.
    #[inline]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Returns the target of the most recent relocation, or `None` if the log
    /// is empty or ends with a retrieval.
    #[inline]
    pub fn last_relocated_to(&self) -> Option<usize> {
        self.operations
            .last()
            .filter(|op| op.is_relocation())
            .map(|op| op.to)
    }

    /// Returns `true` once every item has been retrieved.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.next > self.num_items
    }

    /// Returns all stacks, bottom to top.
    #[inline]
    pub fn stacks(&self) -> &[Vec<usize>] {
        &self.stacks
    }

    /// Returns stack `s`, bottom to top.
    ///
    /// # Panics
    ///
    /// Panics if `s` is out of bounds `0..num_stacks`.
    #[inline]
    pub fn stack(&self, s: usize) -> &[usize] {
        &self.stacks[s]
    }

    /// Returns the item on top of stack `s`, or `None` if it is empty or out
    /// of bounds.
    #[inline]
    pub fn top(&self, s: usize) -> Option<usize> {
        self.stacks.get(s).and_then(|stack| stack.last().copied())
    }

    /// Returns the height of stack `s`.
    ///
    /// # Panics
    ///
    /// Panics if `s` is out of bounds `0..num_stacks`.
    #[inline]
    pub fn height(&self, s: usize) -> usize {
        self.stacks[s].len()
    }

    /// Returns the smallest item of stack `s`, `n + 1` if it is empty.
    ///
    /// # Panics
    ///
    /// Panics if `s` is out of bounds `0..num_stacks`.
    #[inline]
    pub fn low(&self, s: usize) -> usize {
        self.low[s]
    }

    /// Returns the item of stack `s` at tier `tier` (0 is the bottom).
    ///
    /// # Panics
    ///
    /// Panics if `s` or `tier` is out of bounds.
    #[inline]
    pub fn item_at(&self, s: usize, tier: usize) -> usize {
        debug_assert!(
            tier < self.stacks[s].len(),
            "called `BayState::item_at` with tier out of bounds: the height is {} but the tier is {}",
            self.stacks[s].len(),
            tier
        );

        self.stacks[s][tier]
    }

    /// Returns how many more items stack `s` can take.
    ///
    /// # Panics
    ///
    /// Panics if `s` is out of bounds `0..num_stacks`.
    #[inline]
    pub fn remaining_slots(&self, s: usize) -> usize {
        self.max_height - self.stacks[s].len()
    }

    /// Returns the stack currently holding `item`, `None` once retrieved.
    #[inline]
    pub fn stack_for_item(&self, item: usize) -> Option<usize> {
        self.stack_for_item.get(item).copied().flatten()
    }

    /// Returns `true` if `item` sits above a smaller item.
    #[inline]
    pub fn must_be_moved(&self, item: usize) -> bool {
        self.must_be_moved.contains(item)
    }

    /// Returns the distinct stacks holding the next `a` items to be
    /// retrieved, in ascending order.
    pub fn stacks_for_lowest_items(&self, a: usize) -> Vec<usize> {
        let end = (self.next + a).min(self.num_items + 1);
        let mut result: Vec<usize> = (self.next..end)
            .filter_map(|item| self.stack_for_item(item))
            .collect();
        result.sort_unstable();
        result.dedup();
        result
    }

    /// Returns the top items of the given stacks, skipping empty ones.
    pub fn tops(&self, stacks: &[usize]) -> Vec<usize> {
        stacks.iter().filter_map(|&s| self.top(s)).collect()
    }

    /// Returns the smallest item stacked above `item`, or `None` if `item` is
    /// on top of its stack or no longer stored.
    pub fn smallest_above(&self, item: usize) -> Option<usize> {
        let s = self.stack_for_item(item)?;
        self.stacks[s]
            .iter()
            .rev()
            .take_while(|&&above| above != item)
            .copied()
            .min()
    }

    /// Returns `true` if both states hold the same arrangement and this one
    /// needed no more relocations to reach it.
    #[inline]
    pub fn dominates(&self, other: &BayState) -> bool {
        self.stacks == other.stacks && self.relocation_count <= other.relocation_count
    }

    /// Relocates the top item of `from` onto `to`.
    ///
    /// The state is unchanged on error.
    pub fn relocate(&mut self, from: usize, to: usize) -> Result<(), BayError> {
        let num_stacks = self.stacks.len();
        let fault = if from >= num_stacks || to >= num_stacks {
            Some(RelocationFault::OutOfBounds)
        } else if from == to {
            Some(RelocationFault::SameStack)
        } else if self.stacks[from].is_empty() {
            Some(RelocationFault::SourceEmpty)
        } else if self.stacks[to].len() >= self.max_height {
            Some(RelocationFault::DestinationFull)
        } else {
            None
        };

        if let Some(fault) = fault {
            return Err(BayError::InvalidRelocation { from, to, fault });
        }

        self.move_top(from, to);
        self.relocation_count += 1;
        self.operations.push(Operation::relocation(from, to));
        Ok(())
    }

    /// Retrieves the next item from the top of stack `s`.
    ///
    /// Fails with `InvalidRetrieval` if the top of `s` is not the next item.
    pub fn retrieve_from(&mut self, s: usize) -> Result<(), BayError> {
        match self.top(s) {
            Some(item) if item == self.next => {}
            found => {
                return Err(BayError::InvalidRetrieval {
                    stack: s,
                    expected: self.next,
                    found,
                });
            }
        }

        self.take_top(s);
        self.next += 1;
        self.operations.push(Operation::retrieval(s));
        Ok(())
    }

    /// Retrieves the next item if it is on top of its stack.
    ///
    /// Returns `Ok(false)` when nothing can be retrieved.
    pub fn retrieve_next(&mut self) -> Result<bool, BayError> {
        if self.is_empty() {
            return Ok(false);
        }

        let Some(s) = self.stack_for_item(self.next) else {
            return Err(BayError::InternalInconsistency(format!(
                "item {} is due but not stored in any stack",
                self.next
            )));
        };

        if self.top(s) != Some(self.next) {
            return Ok(false);
        }

        self.retrieve_from(s)?;
        Ok(true)
    }

    /// Retrieves items for as long as the next one is on top of its stack.
    /// Returns the number of retrievals.
    pub fn retrieve_all(&mut self) -> Result<usize, BayError> {
        let mut count = 0;
        while self.retrieve_next()? {
            count += 1;
        }
        Ok(count)
    }

    /// Applies a logged operation.
    #[inline]
    pub fn apply(&mut self, op: Operation) -> Result<(), BayError> {
        if op.is_retrieval() {
            self.retrieve_from(op.from)
        } else {
            self.relocate(op.from, op.to)
        }
    }

    /// Reverts the most recent operation and returns it, or `None` if the log
    /// is empty.
    pub fn undo_last_move(&mut self) -> Option<Operation> {
        let op = self.operations.pop()?;
        if op.is_retrieval() {
            self.next -= 1;
            self.push(op.from, self.next);
        } else {
            self.move_top(op.to, op.from);
            self.relocation_count -= 1;
        }
        Some(op)
    }

    #[inline]
    fn move_top(&mut self, from: usize, to: usize) {
        if let Some(item) = self.take_top(from) {
            self.push(to, item);
        }
    }

    fn push(&mut self, s: usize, item: usize) {
        debug_assert!(
            self.stacks[s].len() < self.max_height,
            "called `BayState::push` on a full stack: the height limit is {} but stack {} already holds {} items",
            self.max_height,
            s,
            self.stacks[s].len()
        );
        debug_assert!(
            self.stack_for_item[item].is_none(),
            "called `BayState::push` with item {} that is already stored in stack {:?}",
            item,
            self.stack_for_item[item]
        );

        self.stacks[s].push(item);
        self.stack_for_item[item] = Some(s);
        self.num_remaining += 1;
        if item < self.low[s] {
            self.low[s] = item;
            self.must_be_moved.set(item, false);
        } else {
            self.must_be_moved.insert(item);
            self.lb += 1;
        }
    }

    fn take_top(&mut self, s: usize) -> Option<usize> {
        let item = self.stacks[s].pop()?;
        debug_assert_eq!(
            self.stack_for_item[item],
            Some(s),
            "called `BayState::take_top` on stack {} but item {} is recorded elsewhere",
            s,
            item
        );

        self.stack_for_item[item] = None;
        self.num_remaining -= 1;
        if self.must_be_moved.contains(item) {
            self.must_be_moved.set(item, false);
            self.lb -= 1;
        } else {
            // a well placed top item is the minimum of its stack
            self.low[s] = self.stacks[s]
                .iter()
                .copied()
                .min()
                .unwrap_or(self.num_items + 1);
        }
        Some(item)
    }
}

impl std::fmt::Display for BayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let width = self.stacks.len();
        for s in 0..width {
            write!(f, " - {} -", s)?;
        }
        writeln!(f)?;
        writeln!(f, "{}", "_".repeat(6 * width))?;
        for tier in (0..self.max_height).rev() {
            for stack in &self.stacks {
                match stack.get(tier) {
                    Some(item) => write!(f, " [{:>3}]", item)?,
                    None => write!(f, "      ")?,
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "{}", "*".repeat(6 * width))?;
        for low in &self.low {
            write!(f, " ({:>3})", low)?;
        }
        writeln!(f)
    }
}
