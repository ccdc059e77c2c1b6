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

use crate::monitor::tree_search_monitor::{SearchCommand, TreeSearchMonitor};
use crate::stats::SearchStatistics;
use stackyard_model::state::BayState;
use std::time::{Duration, Instant};
use tracing::info;

/// Reports search progress through `tracing` at `info` level.
///
/// A progress event is emitted at most once per `log_interval`; the clock is
/// only read when the node counter matches `clock_check_mask`.
#[derive(Debug, Clone)]
pub struct LogMonitor {
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    clock_check_mask: u64,
    best_relocations: Option<usize>,
}

impl LogMonitor {
    pub fn new(log_interval: Duration, clock_check_mask: u64) -> Self {
        Self {
            start_time: Instant::now(),
            last_log_time: Instant::now(),
            log_interval,
            clock_check_mask,
            best_relocations: None,
        }
    }

    #[inline]
    pub fn best_relocations(&self) -> Option<usize> {
        self.best_relocations
    }

    fn log_progress(&mut self, state: &BayState, stats: &SearchStatistics) {
        let now = Instant::now();
        info!(
            elapsed = ?now.duration_since(self.start_time),
            nodes = stats.nodes_explored,
            depth = state.relocation_count(),
            remaining = state.num_remaining(),
            best = ?self.best_relocations,
            pruned = stats.prunings_bound,
            "search progress"
        );
        self.last_log_time = now;
    }
}

impl Default for LogMonitor {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 4095)
    }
}

impl std::fmt::Display for LogMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogMonitor(log_interval: {}s, clock_check_mask: {})",
            self.log_interval.as_secs(),
            self.clock_check_mask
        )
    }
}

impl TreeSearchMonitor for LogMonitor {
    fn name(&self) -> &str {
        "LogMonitor"
    }

    fn on_enter_search(&mut self, root: &BayState, _stats: &SearchStatistics) {
        self.start_time = Instant::now();
        self.last_log_time = self.start_time;
        self.best_relocations = None;
        info!(
            stacks = root.num_stacks(),
            max_height = root.max_height(),
            items = root.num_items(),
            lb1 = root.lb1(),
            "search started"
        );
    }

    fn search_command(&mut self, state: &BayState, stats: &SearchStatistics) -> SearchCommand {
        if (stats.nodes_explored & self.clock_check_mask) == 0
            && self.last_log_time.elapsed() >= self.log_interval
        {
            self.log_progress(state, stats);
        }
        SearchCommand::Continue
    }

    fn on_solution_found(&mut self, solution: &BayState, stats: &SearchStatistics) {
        self.best_relocations = Some(solution.relocation_count());
        info!(
            relocations = solution.relocation_count(),
            nodes = stats.nodes_explored,
            elapsed = ?self.start_time.elapsed(),
            "new incumbent"
        );
    }

    fn on_exit_search(&mut self, stats: &SearchStatistics) {
        info!(
            nodes = stats.nodes_explored,
            solutions = stats.solutions_found,
            best = ?self.best_relocations,
            elapsed = ?self.start_time.elapsed(),
            "search finished"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackyard_model::instance::{HeightLimit, Instance};

    #[test]
    fn test_tracks_best_and_never_stops() {
        let instance = Instance::new(vec![vec![1, 2], vec![]], HeightLimit::Fixed(2)).unwrap();
        let root = BayState::new(&instance);
        let mut solved = root.clone();
        solved.relocate(0, 1).unwrap();
        solved.retrieve_all().unwrap();
        let stats = SearchStatistics::default();

        let mut monitor = LogMonitor::new(Duration::ZERO, 0);
        monitor.on_enter_search(&root, &stats);
        assert_eq!(monitor.best_relocations(), None);
        assert_eq!(monitor.search_command(&root, &stats), SearchCommand::Continue);
        monitor.on_solution_found(&solved, &stats);
        assert_eq!(monitor.best_relocations(), Some(1));
        monitor.on_exit_search(&stats);
    }

    #[test]
    fn test_display() {
        let monitor = LogMonitor::default();
        assert_eq!(
            monitor.to_string(),
            "LogMonitor(log_interval: 1s, clock_check_mask: 4095)"
        );
    }
}
