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

//! Iterative deepening on the objective.
//!
//! Starting at the root's `lb3`, each round runs a fresh depth-first descent
//! that only accepts plans with at most `target` relocations. The first
//! round that finds a plan proves it optimal, since every smaller target has
//! already been refuted. The heuristic plan (under the cap) is kept when no
//! round below its relocation count succeeds.

use crate::{
    config::SearchConfig,
    dfbb::Descent,
    engine::{SearchEngine, SearchRun, seed_incumbent},
    incumbent::Incumbent,
    monitor::tree_search_monitor::TreeSearchMonitor,
    stats::SearchStatistics,
};
use stackyard_heuristics::policy::HeuristicProvider;
use stackyard_model::{err::BayError, state::BayState};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IterativeDeepeningBnb {
    config: SearchConfig,
}

impl IterativeDeepeningBnb {
    #[inline]
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }
}

impl SearchEngine for IterativeDeepeningBnb {
    fn name(&self) -> &str {
        "IterativeDeepeningBnb"
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
        let mut incumbent = seed_incumbent(&self.config, root, heuristic, stats)?;
        let root_bound = root.lb3();
        stats.set_root_lower_bound(root_bound);
        debug!(
            lb = root_bound,
            ub = incumbent.upper_bound(),
            "starting iterative deepening"
        );

        let version = self.config.get_bound_version();
        let mut target = root_bound;
        while target < incumbent.upper_bound() {
            stats.on_deepening_round();
            debug!(target, ub = incumbent.upper_bound(), "deepening round");

            let mut round = Incumbent::new(target + 1);
            let mut state = root.clone();
            let mut descent = Descent::new(version, &mut *monitor, stats);
            let finished = descent.explore(&mut state, &mut round)?;
            let abort_reason = descent.into_abort_reason();

            if let Some(found) = round.best() {
                incumbent.try_install(found);
            }
            if !finished {
                // every smaller target was refuted
                stats.set_open_lower_bound(Some(target.min(incumbent.upper_bound())));
                let reason = abort_reason.unwrap_or_else(|| "search stopped".to_string());
                return Ok(SearchRun::aborted(incumbent, reason));
            }
            target += 1;
        }

        Ok(SearchRun::finished(incumbent))
    }
}
