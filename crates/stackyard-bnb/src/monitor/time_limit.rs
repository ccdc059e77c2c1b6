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
use tracing::warn;

/// A monitor that terminates the search after a specified duration.
///
/// Checks the clock only every `check_interval` polls. The clock starts when
/// the search is entered.
#[derive(Debug, Clone)]
pub struct TimeLimitMonitor {
    time_limit: Duration,
    start_time: Option<Instant>,
    check_interval: u64,
    polls_since_last_check: u64,
    expired: bool,
}

impl TimeLimitMonitor {
    /// Creates a new `TimeLimitMonitor`. A `check_interval` of zero is
    /// treated as one.
    pub fn new(time_limit: Duration, check_interval: u64) -> Self {
        Self {
            time_limit,
            start_time: None,
            check_interval: check_interval.max(1),
            polls_since_last_check: 0,
            expired: false,
        }
    }

    /// Creates a new `TimeLimitMonitor` that reads the clock on every poll.
    pub fn every_poll(time_limit: Duration) -> Self {
        Self::new(time_limit, 1)
    }

    #[inline]
    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }

    /// Returns `true` once the limit has been observed to pass.
    #[inline]
    pub fn expired(&self) -> bool {
        self.expired
    }
}

impl TreeSearchMonitor for TimeLimitMonitor {
    fn name(&self) -> &str {
        "TimeLimitMonitor"
    }

    fn on_enter_search(&mut self, _root: &BayState, _statistics: &SearchStatistics) {
        self.start_time = Some(Instant::now());
        self.polls_since_last_check = 0;
        self.expired = false;
    }

    fn search_command(&mut self, _state: &BayState, _statistics: &SearchStatistics) -> SearchCommand {
        if self.expired {
            return SearchCommand::Terminate(self.reason());
        }

        self.polls_since_last_check = self.polls_since_last_check.saturating_add(1);
        if self.polls_since_last_check >= self.check_interval {
            self.polls_since_last_check = 0;

            if let Some(start) = self.start_time
                && start.elapsed() > self.time_limit
            {
                self.expired = true;
                warn!(limit = ?self.time_limit, "time limit reached");
                return SearchCommand::Terminate(self.reason());
            }
        }

        SearchCommand::Continue
    }

    fn on_solution_found(&mut self, _solution: &BayState, _statistics: &SearchStatistics) {}

    fn on_exit_search(&mut self, _statistics: &SearchStatistics) {
        self.start_time = None;
    }
}

impl TimeLimitMonitor {
    fn reason(&self) -> String {
        format!("time limit of {:.2?} exceeded", self.time_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackyard_model::instance::{HeightLimit, Instance};

    fn state() -> BayState {
        BayState::new(&Instance::new(vec![vec![1]], HeightLimit::Highest).unwrap())
    }

    #[test]
    fn test_continues_before_limit() {
        let state = state();
        let stats = SearchStatistics::default();
        let mut monitor = TimeLimitMonitor::every_poll(Duration::from_secs(60));
        monitor.on_enter_search(&state, &stats);
        assert_eq!(monitor.search_command(&state, &stats), SearchCommand::Continue);
        assert!(!monitor.expired());
    }

    #[test]
    fn test_terminates_after_limit() {
        let state = state();
        let stats = SearchStatistics::default();
        let mut monitor = TimeLimitMonitor::every_poll(Duration::ZERO);
        monitor.on_enter_search(&state, &stats);
        std::thread::sleep(Duration::from_millis(2));
        assert!(matches!(
            monitor.search_command(&state, &stats),
            SearchCommand::Terminate(_)
        ));
        assert!(monitor.expired());
        // stays terminated
        assert!(matches!(
            monitor.search_command(&state, &stats),
            SearchCommand::Terminate(_)
        ));
    }

    #[test]
    fn test_check_interval_skips_clock_reads() {
        let state = state();
        let stats = SearchStatistics::default();
        let mut monitor = TimeLimitMonitor::new(Duration::ZERO, 3);
        monitor.on_enter_search(&state, &stats);
        std::thread::sleep(Duration::from_millis(2));
        assert_eq!(monitor.search_command(&state, &stats), SearchCommand::Continue);
        assert_eq!(monitor.search_command(&state, &stats), SearchCommand::Continue);
        assert!(matches!(
            monitor.search_command(&state, &stats),
            SearchCommand::Terminate(_)
        ));
    }

    #[test]
    fn test_not_started_never_expires() {
        let state = state();
        let stats = SearchStatistics::default();
        let mut monitor = TimeLimitMonitor::every_poll(Duration::ZERO);
        assert_eq!(monitor.search_command(&state, &stats), SearchCommand::Continue);
    }
}
