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

//! Lower bounds on the number of relocations a bay state still needs.
//!
//! Three bounds of increasing strength and cost are provided:
//! - `lb1`: the number of badly placed items, maintained incrementally.
//! - `lb2`: `lb1` plus one when every stack is occupied, the next item is
//!   buried, and every blocking top item is larger than every stack minimum.
//!   Whatever is relocated first then either is well placed (an extra move)
//!   or lands on a smaller item and has to be moved again.
//! - `lb3`: the same argument repeated layer by layer from the top, for as
//!   long as every stack still holds an item at that depth.
//!
//! `LB1 <= LB2 <= LB3` holds on every state, and all three are admissible.

use crate::{err::ConfigurationError, state::BayState};
use rustc_hash::FxHashMap;
use std::{str::FromStr, time::Duration, time::Instant};

/// Selects the lower bound used by the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BoundVersion {
    /// Number of badly placed items.
    #[default]
    Lb1,
    /// `Lb1` with the one-layer extension.
    Lb2,
    /// `Lb1` with the multi-layer extension.
    Lb3,
    /// Computes all three, records timings and the `Lb3 - Lb1` gap, and
    /// returns `Lb3`.
    Diagnostic,
}

impl std::fmt::Display for BoundVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoundVersion::Lb1 => write!(f, "1"),
            BoundVersion::Lb2 => write!(f, "2"),
            BoundVersion::Lb3 => write!(f, "3"),
            BoundVersion::Diagnostic => write!(f, "diagnostic"),
        }
    }
}

impl FromStr for BoundVersion {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" => Ok(BoundVersion::Lb1),
            "2" => Ok(BoundVersion::Lb2),
            "3" => Ok(BoundVersion::Lb3),
            "-1" | "diagnostic" => Ok(BoundVersion::Diagnostic),
            other => Err(ConfigurationError::BoundVersion(other.to_owned())),
        }
    }
}

/// Instrumentation collected by `BoundVersion::Diagnostic`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoundStatistics {
    /// Time spent computing `lb1`.
    pub time_in_lb1: Duration,
    /// Time spent computing `lb2`.
    pub time_in_lb2: Duration,
    /// Time spent computing `lb3`.
    pub time_in_lb3: Duration,
    gap_counts: FxHashMap<usize, u64>,
    evaluations: u64,
}

impl BoundStatistics {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one evaluation whose `lb3 - lb1` gap was `gap`.
    #[inline]
    pub fn on_gap(&mut self, gap: usize) {
        *self.gap_counts.entry(gap).or_insert(0) += 1;
        self.evaluations = self.evaluations.saturating_add(1);
    }

    /// Number of states evaluated in diagnostic mode.
    #[inline]
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// Number of evaluations that observed `gap`.
    #[inline]
    pub fn gap_count(&self, gap: usize) -> u64 {
        self.gap_counts.get(&gap).copied().unwrap_or(0)
    }

    /// The gap histogram as `(gap, count)` pairs in ascending gap order.
    pub fn gap_histogram(&self) -> Vec<(usize, u64)> {
        let mut histogram: Vec<(usize, u64)> =
            self.gap_counts.iter().map(|(&g, &c)| (g, c)).collect();
        histogram.sort_unstable();
        histogram
    }
}

impl std::fmt::Display for BoundStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Lower Bound Statistics:")?;
        writeln!(f, "  Time in LB1:          {:.2?}", self.time_in_lb1)?;
        writeln!(f, "  Time in LB2:          {:.2?}", self.time_in_lb2)?;
        writeln!(f, "  Time in LB3:          {:.2?}", self.time_in_lb3)?;
        writeln!(f, "  Nodes evaluated:      {}", self.evaluations)?;
        for (gap, count) in self.gap_histogram() {
            let share = if self.evaluations == 0 {
                0.0
            } else {
                100.0 * count as f64 / self.evaluations as f64
            };
            writeln!(f, "  gap = {}:  {} nodes ({:.2} %)", gap, count, share)?;
        }
        Ok(())
    }
}

impl BayState {
    /// Number of badly placed items.
    #[inline]
    pub fn lb1(&self) -> usize {
        self.badly_placed()
    }

    /// `lb1`, plus one if no stack is empty, the next item is buried and the
    /// smallest blocking top item exceeds the largest stack minimum.
    pub fn lb2(&self) -> usize {
        let lb = self.badly_placed();
        let mut min_top = self.num_items() + 1;
        let mut max_min = 0;
        for s in 0..self.num_stacks() {
            let Some(top) = self.top(s) else {
                return lb;
            };
            if top == self.next() {
                return lb;
            }
            let low = self.low(s);
            if top > low && top < min_top {
                min_top = top;
            }
            max_min = max_min.max(low);
        }

        if min_top > max_min { lb + 1 } else { lb }
    }

    /// `lb1`, plus the number of consecutive layers from the top, bounded by
    /// the shortest stack, in which the smallest blocking item exceeds every
    /// stack minimum below that layer.
    pub fn lb3(&self) -> usize {
        let num_stacks = self.num_stacks();
        let shortest = (0..num_stacks).map(|s| self.height(s)).min().unwrap_or(0);

        let mut k = 0;
        while k < shortest {
            let max_min = (0..num_stacks)
                .map(|s| self.lowest_except_top_k(s, k))
                .max()
                .unwrap_or(0);

            let mut min_top = self.num_items() + 1;
            for s in 0..num_stacks {
                let item = self.item_at(s, self.height(s) - 1 - k);
                if item == self.next() {
                    min_top = item;
                    break;
                }
                if item > self.low(s) && item < min_top {
                    min_top = item;
                }
            }

            if min_top > max_min {
                k += 1;
            } else {
                break;
            }
        }

        self.badly_placed() + k
    }

    /// Computes the bound selected by `version`. Diagnostic mode records into
    /// `stats` when a collector is supplied.
    pub fn lower_bound(&self, version: BoundVersion, stats: Option<&mut BoundStatistics>) -> usize {
        match version {
            BoundVersion::Lb1 => self.lb1(),
            BoundVersion::Lb2 => self.lb2(),
            BoundVersion::Lb3 => self.lb3(),
            BoundVersion::Diagnostic => match stats {
                Some(stats) => {
                    let start = Instant::now();
                    let lb1 = self.lb1();
                    stats.time_in_lb1 += start.elapsed();

                    let start = Instant::now();
                    let lb2 = self.lb2();
                    stats.time_in_lb2 += start.elapsed();

                    let start = Instant::now();
                    let lb3 = self.lb3();
                    stats.time_in_lb3 += start.elapsed();

                    debug_assert!(
                        lb1 <= lb2 && lb2 <= lb3,
                        "called `BayState::lower_bound` on a state with unordered bounds: {} {} {}",
                        lb1,
                        lb2,
                        lb3
                    );

                    stats.on_gap(lb3 - lb1);
                    lb3
                }
                None => self.lb3(),
            },
        }
    }

    /// Relocations performed so far plus the lower bound on those still
    /// needed.
    #[inline]
    pub fn promise(&self, version: BoundVersion) -> usize {
        self.relocation_count() + self.lower_bound(version, None)
    }

    /// Smallest item of stack `s` once its top `k` items are ignored.
    ///
    /// # Panics
    ///
    /// Panics if `s` is out of bounds or `k` is not below the height of `s`.
    pub fn lowest_except_top_k(&self, s: usize, k: usize) -> usize {
        let stack = self.stack(s);
        assert!(
            k < stack.len(),
            "called `BayState::lowest_except_top_k` with k out of bounds: the height is {} but k is {}",
            stack.len(),
            k
        );

        let low = self.low(s);
        let remaining = stack.len() - k;
        if stack[remaining..].contains(&low) {
            stack[..remaining].iter().copied().min().unwrap_or(low)
        } else {
            low
        }
    }
}
