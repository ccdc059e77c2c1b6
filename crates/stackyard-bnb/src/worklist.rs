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

//! Worklist branch-and-bound.
//!
//! Nodes are owned clones kept in a `VecDeque`; the exploration strategy
//! decides whether the oldest (breadth-first) or the newest (depth-first)
//! node is expanded next. A node is fathomed before its retrievals are
//! performed, so the bound it is judged by is the one it was enqueued with.
//! When a monitor stops the search, the smallest `relocations + bound` over
//! the nodes left in the queue, capped by the incumbent, is recorded as the
//! open lower bound.

use crate::{
    branching::candidate_branches,
    config::{ExplorationStrategy, SearchConfig},
    engine::{SearchEngine, SearchRun, seed_incumbent},
    monitor::tree_search_monitor::{SearchCommand, TreeSearchMonitor},
    stats::SearchStatistics,
};
use stackyard_heuristics::policy::HeuristicProvider;
use stackyard_model::{err::BayError, state::BayState};
use std::collections::VecDeque;
use tracing::debug;

/// Branch-and-bound over an explicit queue of states.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BranchAndBound {
    config: SearchConfig,
}

impl BranchAndBound {
    #[inline]
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }
}

impl SearchEngine for BranchAndBound {
    fn name(&self) -> &str {
        match self.config.get_exploration_strategy() {
            ExplorationStrategy::Breadth => "BranchAndBound(breadth)",
            ExplorationStrategy::Depth => "BranchAndBound(depth)",
        }
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
        let strategy = self.config.get_exploration_strategy();

        let mut incumbent = seed_incumbent(&self.config, root, heuristic, stats)?;
        let root_bound = root.lower_bound(version, Some(&mut stats.bounds));
        stats.set_root_lower_bound(root_bound);
        debug!(
            %strategy,
            lb = stats.root_lower_bound,
            ub = incumbent.upper_bound(),
            "starting worklist branch-and-bound"
        );

        let mut queue = VecDeque::new();
        queue.push_back(root.clone());

        loop {
            let peeked = match strategy {
                ExplorationStrategy::Breadth => queue.front(),
                ExplorationStrategy::Depth => queue.back(),
            };
            let Some(peeked) = peeked else {
                break;
            };
            if let SearchCommand::Terminate(reason) = monitor.search_command(peeked, stats) {
                let open = queue
                    .iter()
                    .map(|state| state.relocation_count() + state.lower_bound(version, None))
                    .min()
                    .map(|bound| bound.min(incumbent.upper_bound()));
                stats.set_open_lower_bound(open);
                debug!(open = ?open, remaining = queue.len(), "worklist search stopped");
                return Ok(SearchRun::aborted(incumbent, reason));
            }

            let popped = match strategy {
                ExplorationStrategy::Breadth => queue.pop_front(),
                ExplorationStrategy::Depth => queue.pop_back(),
            };
            let Some(mut state) = popped else {
                break;
            };
            stats.on_node_explored();
            stats.on_depth_update(state.relocation_count());

            let bound = state.lower_bound(version, Some(&mut stats.bounds));
            if state.relocation_count() + bound >= incumbent.upper_bound() {
                stats.on_pruning_bound();
                monitor.on_prune(&state, stats);
                continue;
            }

            let retrieved = state.retrieve_all()?;
            stats.on_retrievals(retrieved);

            if state.is_empty() {
                if incumbent.try_install(&state) {
                    stats.on_solution_found();
                    monitor.on_solution_found(&state, stats);
                }
                continue;
            }

            for branch in candidate_branches(&state, incumbent.upper_bound(), stats) {
                let mut child = state.clone();
                child.relocate(branch.from, branch.to)?;
                queue.push_back(child);
            }
        }

        Ok(SearchRun::finished(incumbent))
    }
}
