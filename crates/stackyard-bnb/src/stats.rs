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

use stackyard_model::bounds::BoundStatistics;
use std::time::Duration;

/// Statistics collected during one search.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchStatistics {
    /// Nodes taken from the queue or entered recursively.
    pub nodes_explored: u64,
    /// Recursive returns after a subtree was exhausted.
    pub backtracks: u64,
    /// Children enqueued or branches tried.
    pub children_generated: u64,
    /// Nodes and candidate moves discarded against the incumbent.
    pub prunings_bound: u64,
    /// Items retrieved during the search, over all nodes.
    pub retrievals: u64,
    /// Incumbent improvements made by the search itself.
    pub solutions_found: u64,
    /// The largest number of relocations on a path from the root.
    pub max_depth: usize,
    /// Relocations of the heuristic plan, if it ran.
    pub heuristic_relocations: Option<usize>,
    /// Lower bound at the root node.
    pub root_lower_bound: usize,
    /// Smallest bound over the unexplored queue when the worklist search
    /// was aborted.
    pub open_lower_bound: Option<usize>,
    /// Targets attempted by iterative deepening.
    pub deepening_rounds: u64,
    /// Total time spent in the search, heuristic included.
    pub time_total: Duration,
    /// Bound instrumentation, filled by `BoundVersion::Diagnostic`.
    pub bounds: BoundStatistics,
}

impl SearchStatistics {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn on_node_explored(&mut self) {
        self.nodes_explored = self.nodes_explored.saturating_add(1);
    }

    #[inline]
    pub fn on_backtrack(&mut self) {
        self.backtracks = self.backtracks.saturating_add(1);
    }

    #[inline]
    pub fn on_child_generated(&mut self) {
        self.children_generated = self.children_generated.saturating_add(1);
    }

    #[inline]
    pub fn on_pruning_bound(&mut self) {
        self.prunings_bound = self.prunings_bound.saturating_add(1);
    }

    #[inline]
    pub fn on_retrievals(&mut self, count: usize) {
        self.retrievals = self.retrievals.saturating_add(count as u64);
    }

    #[inline]
    pub fn on_solution_found(&mut self) {
        self.solutions_found = self.solutions_found.saturating_add(1);
    }

    #[inline]
    pub fn on_depth_update(&mut self, depth: usize) {
        self.max_depth = self.max_depth.max(depth);
    }

    #[inline]
    pub fn on_deepening_round(&mut self) {
        self.deepening_rounds = self.deepening_rounds.saturating_add(1);
    }

    #[inline]
    pub fn set_heuristic_relocations(&mut self, relocations: usize) {
        self.heuristic_relocations = Some(relocations);
    }

    #[inline]
    pub fn set_root_lower_bound(&mut self, bound: usize) {
        self.root_lower_bound = bound;
    }

    #[inline]
    pub fn set_open_lower_bound(&mut self, bound: Option<usize>) {
        self.open_lower_bound = bound;
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }
}

impl std::fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Stackyard Search Statistics:")?;
        writeln!(f, "  Nodes explored:       {}", self.nodes_explored)?;
        writeln!(f, "  Backtracks:           {}", self.backtracks)?;
        writeln!(f, "  Max depth reached:    {}", self.max_depth)?;
        writeln!(f, "  Children generated:   {}", self.children_generated)?;
        writeln!(f, "  Prunings (bound):     {}", self.prunings_bound)?;
        writeln!(f, "  Retrievals:           {}", self.retrievals)?;
        writeln!(f, "  Solutions found:      {}", self.solutions_found)?;
        writeln!(f, "  Deepening rounds:     {}", self.deepening_rounds)?;
        match self.heuristic_relocations {
            Some(h) => writeln!(f, "  Heuristic plan:       {}", h)?,
            None => writeln!(f, "  Heuristic plan:       -")?,
        }
        writeln!(f, "  Root Lower Bound:     {}", self.root_lower_bound)?;
        if let Some(open) = self.open_lower_bound {
            writeln!(f, "  Open Lower Bound:     {}", open)?;
        }
        writeln!(f, "  Total time:           {:.2?}", self.time_total)?;
        if self.bounds.evaluations() > 0 {
            write!(f, "{}", self.bounds)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let mut stats = SearchStatistics::new();
        stats.on_node_explored();
        stats.on_node_explored();
        stats.on_backtrack();
        stats.on_child_generated();
        stats.on_pruning_bound();
        stats.on_retrievals(3);
        stats.on_solution_found();
        stats.on_depth_update(4);
        stats.on_depth_update(2);
        stats.on_deepening_round();
        assert_eq!(stats.nodes_explored, 2);
        assert_eq!(stats.backtracks, 1);
        assert_eq!(stats.children_generated, 1);
        assert_eq!(stats.prunings_bound, 1);
        assert_eq!(stats.retrievals, 3);
        assert_eq!(stats.solutions_found, 1);
        assert_eq!(stats.max_depth, 4);
        assert_eq!(stats.deepening_rounds, 1);
    }

    #[test]
    fn test_display_mentions_open_bound_only_when_set() {
        let mut stats = SearchStatistics::new();
        assert!(!stats.to_string().contains("Open Lower Bound"));
        stats.set_open_lower_bound(Some(7));
        let text = stats.to_string();
        assert!(text.starts_with("Stackyard Search Statistics:"));
        assert!(text.contains("Open Lower Bound:     7"));
    }
}
