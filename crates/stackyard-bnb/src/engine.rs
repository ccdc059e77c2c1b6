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

//! The common driver of all search engines.
//!
//! An engine only implements `search`, which starts from the root and an
//! incumbent seeded by the heuristic. The provided `solve_with_monitor`
//! attaches the configured time limit, runs the monitor lifecycle, measures
//! the total time and turns the run into a `SearchOutcome`.

use crate::{
    config::SearchConfig,
    incumbent::Incumbent,
    monitor::{no_op::NoOperationMonitor, tree_search_monitor::TreeSearchMonitor},
    result::SearchOutcome,
    stats::SearchStatistics,
};
use stackyard_heuristics::policy::HeuristicProvider;
use stackyard_model::{err::BayError, state::BayState};
use std::time::Instant;

/// What an engine hands back to the driver.
#[derive(Debug, Clone)]
pub struct SearchRun {
    /// The incumbent at the end of the search.
    pub incumbent: Incumbent,
    /// Set when a monitor stopped the search.
    pub abort_reason: Option<String>,
}

impl SearchRun {
    #[inline]
    pub fn finished(incumbent: Incumbent) -> Self {
        Self {
            incumbent,
            abort_reason: None,
        }
    }

    #[inline]
    pub fn aborted(incumbent: Incumbent, reason: String) -> Self {
        Self {
            incumbent,
            abort_reason: Some(reason),
        }
    }
}

/// An exact search over relocation plans.
pub trait SearchEngine {
    fn name(&self) -> &str;

    fn config(&self) -> &SearchConfig;

    /// Runs the search from `root`. The monitor has already been entered and
    /// carries the configured time limit.
    fn search(
        &self,
        root: &BayState,
        heuristic: &dyn HeuristicProvider,
        monitor: &mut dyn TreeSearchMonitor,
        stats: &mut SearchStatistics,
    ) -> Result<SearchRun, BayError>;

    /// Solves `root` to optimality or until `monitor` or the configured time
    /// limit stops the search.
    fn solve_with_monitor(
        &self,
        root: &BayState,
        heuristic: &dyn HeuristicProvider,
        monitor: &mut dyn TreeSearchMonitor,
    ) -> Result<SearchOutcome, BayError> {
        let start_time = Instant::now();
        let mut stats = SearchStatistics::new();
        let mut monitor = self.config().attach_time_limit(monitor);

        monitor.on_enter_search(root, &stats);
        let run = self.search(root, heuristic, &mut monitor, &mut stats);
        stats.set_total_time(start_time.elapsed());
        monitor.on_exit_search(&stats);

        let run = run?;
        Ok(SearchOutcome::conclude(
            run.incumbent.into_best(),
            run.abort_reason,
            stats,
        ))
    }

    /// Solves `root` without an external monitor.
    fn solve(
        &self,
        root: &BayState,
        heuristic: &dyn HeuristicProvider,
    ) -> Result<SearchOutcome, BayError> {
        self.solve_with_monitor(root, heuristic, &mut NoOperationMonitor::new())
    }
}

impl std::fmt::Debug for dyn SearchEngine + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SearchEngine({}, {})", self.name(), self.config())
    }
}

/// Seeds the incumbent for `root` from `heuristic` under the configured cap.
#[inline]
pub(crate) fn seed_incumbent(
    config: &SearchConfig,
    root: &BayState,
    heuristic: &dyn HeuristicProvider,
    stats: &mut SearchStatistics,
) -> Result<Incumbent, BayError> {
    Incumbent::from_heuristic(root, heuristic, config.ceiling(), stats)
}
