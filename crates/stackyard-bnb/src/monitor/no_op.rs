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

use crate::{monitor::tree_search_monitor::TreeSearchMonitor, stats::SearchStatistics};
use stackyard_model::state::BayState;

/// A monitor that ignores every event and never stops the search.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct NoOperationMonitor;

impl NoOperationMonitor {
    /// Creates a new `NoOperationMonitor`.
    #[inline(always)]
    pub fn new() -> Self {
        Self
    }
}

impl TreeSearchMonitor for NoOperationMonitor {
    #[inline(always)]
    fn name(&self) -> &str {
        "NoOperationMonitor"
    }

    #[inline(always)]
    fn on_enter_search(&mut self, _root: &BayState, _statistics: &SearchStatistics) {}

    #[inline(always)]
    fn on_solution_found(&mut self, _solution: &BayState, _statistics: &SearchStatistics) {}

    #[inline(always)]
    fn on_exit_search(&mut self, _statistics: &SearchStatistics) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::tree_search_monitor::SearchCommand;
    use stackyard_model::instance::{HeightLimit, Instance};

    #[test]
    fn test_no_op_always_continues() {
        let instance = Instance::new(vec![vec![2, 1]], HeightLimit::Highest).unwrap();
        let state = BayState::new(&instance);
        let stats = SearchStatistics::default();
        let mut monitor = NoOperationMonitor::new();
        monitor.on_enter_search(&state, &stats);
        for _ in 0..100 {
            assert_eq!(monitor.search_command(&state, &stats), SearchCommand::Continue);
        }
        monitor.on_exit_search(&stats);
        assert_eq!(monitor.name(), "NoOperationMonitor");
    }
}
