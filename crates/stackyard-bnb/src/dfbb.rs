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

//! Recursive depth-first branch-and-bound.
//!
//! The search mutates a single `BayState`: every branch is applied with
//! `relocate` and taken back with `undo_last_move`, and the retrievals a node
//! performs on entry are undone before it returns, so the caller always gets
//! its state back unchanged. Branches are tried in ascending order of their
//! lookahead bound.

use crate::{
    branching::candidate_branches,
    config::SearchConfig,
    engine::{SearchEngine, SearchRun, seed_incumbent},
    incumbent::Incumbent,
    monitor::tree_search_monitor::{SearchCommand, TreeSearchMonitor},
    stats::SearchStatistics,
};
use stackyard_heuristics::policy::HeuristicProvider;
use stackyard_model::{bounds::BoundVersion, err::BayError, state::BayState};
use tracing::debug;

/// Depth-first branch-and-bound with in-place moves and undo.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DepthFirstBnb {
    config: SearchConfig,
}

impl DepthFirstBnb {
    #[inline]
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }
}

impl SearchEngine for DepthFirstBnb {
    fn name(&self) -> &str {
        "DepthFirstBnb"
    }

    #[inline]
    fn config(&self) -> &SearchConfig {
        &self.config
    }

    fn search(
        &self,
        root: &BayState,
        heuristic: &dyn HeuristicProvider,
        monitor: &mut dyn TreeSearchMonitor,
        stats: &mut SearchStatistics,
    ) -> Result<SearchRun, BayError> {
        let version = self.config.get_bound_version();
        let mut incumbent = seed_incumbent(&self.config, root, heuristic, stats)?;
        let root_bound = root.lower_bound(version, Some(&mut stats.bounds));
        stats.set_root_lower_bound(root_bound);
        debug!(
            lb = root_bound,
            ub = incumbent.upper_bound(),
            "starting depth-first branch-and-bound"
        );

        let mut state = root.clone();
        let mut descent = Descent::new(version, monitor, stats);
        descent.explore(&mut state, &mut incumbent)?;

        match descent.into_abort_reason() {
            Some(reason) => Ok(SearchRun::aborted(incumbent, reason)),
            None => Ok(SearchRun::finished(incumbent)),
        }
    }
}

/// One recursive descent, shared with iterative deepening.
pub(crate) struct Descent<'a, 'm> {
    version: BoundVersion,
    monitor: &'a mut (dyn TreeSearchMonitor + 'm),
    stats: &'a mut SearchStatistics,
    abort_reason: Option<String>,
}

impl<'a, 'm> Descent<'a, 'm> {
    #[inline]
    pub(crate) fn new(
        version: BoundVersion,
        monitor: &'a mut (dyn TreeSearchMonitor + 'm),
        stats: &'a mut SearchStatistics,
    ) -> Self {
        Self {
            version,
            monitor,
            stats,
            abort_reason: None,
        }
    }

    #[inline]
    pub(crate) fn into_abort_reason(self) -> Option<String> {
        self.abort_reason
    }

    /// Searches the subtree below `state`, installing every improving plan
    /// into `incumbent`. Returns `false` if a monitor stopped the search.
    /// `state` is restored before returning `Ok`.
    pub(crate) fn explore(
        &mut self,
        state: &mut BayState,
        incumbent: &mut Incumbent,
    ) -> Result<bool, BayError> {
        if let SearchCommand::Terminate(reason) = self.monitor.search_command(state, self.stats) {
            self.abort_reason = Some(reason);
            return Ok(false);
        }
        self.stats.on_node_explored();

        let retrieved = state.retrieve_all()?;
        self.stats.on_retrievals(retrieved);
        self.stats.on_depth_update(state.relocation_count());

        let finished = if state.is_empty() {
            if incumbent.try_install(state) {
                self.stats.on_solution_found();
                self.monitor.on_solution_found(state, self.stats);
            }
            true
        } else if state.relocation_count()
            + state.lower_bound(self.version, Some(&mut self.stats.bounds))
            >= incumbent.upper_bound()
        {
            self.stats.on_pruning_bound();
            self.monitor.on_prune(state, self.stats);
            true
        } else {
            self.branch(state, incumbent)?
        };

        for _ in 0..retrieved {
            state.undo_last_move();
        }
        Ok(finished)
    }

    fn branch(&mut self, state: &mut BayState, incumbent: &mut Incumbent) -> Result<bool, BayError> {
        let mut branches = candidate_branches(state, incumbent.upper_bound(), self.stats);
        branches.sort_unstable();

        for branch in branches {
            state.relocate(branch.from, branch.to)?;
            let keep_going = self.explore(state, incumbent)?;
            state.undo_last_move();
            if !keep_going {
                return Ok(false);
            }
        }

        self.stats.on_backtrack();
        Ok(true)
    }
}
