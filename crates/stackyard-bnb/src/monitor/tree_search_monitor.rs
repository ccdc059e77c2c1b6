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

//! Tree search monitoring interface
//!
//! Declares the `TreeSearchMonitor` trait and the `SearchCommand` a monitor
//! uses to stop a search. Every engine reports the same lifecycle:
//!
//! - enter → {command → prune | solution}* → exit
//! - `SearchStatistics` is handed to every callback.
//!
//! Methods take `&mut self`; monitors are single-threaded. Callbacks sit on
//! the hot path of the search and should stay cheap.

use crate::stats::SearchStatistics;
use stackyard_model::state::BayState;

/// Command returned by a monitor to control the search.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SearchCommand {
    /// Keep searching.
    Continue,
    /// Stop and report the incumbent, with the reason.
    Terminate(String),
}

impl std::fmt::Display for SearchCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchCommand::Continue => write!(f, "Continue"),
            SearchCommand::Terminate(reason) => write!(f, "Terminate({})", reason),
        }
    }
}

/// Trait for monitoring and controlling a search.
pub trait TreeSearchMonitor {
    /// Returns the name of the monitor.
    fn name(&self) -> &str;

    /// Called once before the root is processed.
    fn on_enter_search(&mut self, root: &BayState, statistics: &SearchStatistics);

    /// Polled once per worklist iteration and once per recursive call.
    fn search_command(
        &mut self,
        _state: &BayState,
        _statistics: &SearchStatistics,
    ) -> SearchCommand {
        SearchCommand::Continue
    }

    /// Called when a node is discarded because its bound reaches the
    /// incumbent.
    fn on_prune(&mut self, _state: &BayState, _statistics: &SearchStatistics) {}

    /// Called when a completed state improves the incumbent.
    fn on_solution_found(&mut self, solution: &BayState, statistics: &SearchStatistics);

    /// Called once when the search ends, finished or not.
    fn on_exit_search(&mut self, statistics: &SearchStatistics);
}

impl<M> TreeSearchMonitor for &mut M
where
    M: TreeSearchMonitor + ?Sized,
{
    #[inline]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline]
    fn on_enter_search(&mut self, root: &BayState, statistics: &SearchStatistics) {
        (**self).on_enter_search(root, statistics)
    }

    #[inline]
    fn search_command(&mut self, state: &BayState, statistics: &SearchStatistics) -> SearchCommand {
        (**self).search_command(state, statistics)
    }

    #[inline]
    fn on_prune(&mut self, state: &BayState, statistics: &SearchStatistics) {
        (**self).on_prune(state, statistics)
    }

    #[inline]
    fn on_solution_found(&mut self, solution: &BayState, statistics: &SearchStatistics) {
        (**self).on_solution_found(solution, statistics)
    }

    #[inline]
    fn on_exit_search(&mut self, statistics: &SearchStatistics) {
        (**self).on_exit_search(statistics)
    }
}

impl std::fmt::Debug for dyn TreeSearchMonitor + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}

impl std::fmt::Display for dyn TreeSearchMonitor + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackyard_model::instance::{HeightLimit, Instance};

    struct Counting {
        polls: usize,
        solutions: usize,
    }

    impl TreeSearchMonitor for Counting {
        fn name(&self) -> &str {
            "Counting"
        }

        fn on_enter_search(&mut self, _root: &BayState, _statistics: &SearchStatistics) {}

        fn search_command(&mut self, _state: &BayState, _statistics: &SearchStatistics) -> SearchCommand {
            self.polls += 1;
            if self.polls > 2 {
                SearchCommand::Terminate("enough".to_string())
            } else {
                SearchCommand::Continue
            }
        }

        fn on_solution_found(&mut self, _solution: &BayState, _statistics: &SearchStatistics) {
            self.solutions += 1;
        }

        fn on_exit_search(&mut self, _statistics: &SearchStatistics) {}
    }

    fn drive<M: TreeSearchMonitor>(mut monitor: M, state: &BayState) -> Vec<SearchCommand> {
        let stats = SearchStatistics::default();
        monitor.on_enter_search(state, &stats);
        let commands = (0..3).map(|_| monitor.search_command(state, &stats)).collect();
        monitor.on_solution_found(state, &stats);
        monitor.on_exit_search(&stats);
        commands
    }

    #[test]
    fn test_mutable_reference_forwards_to_monitor() {
        let instance = Instance::new(vec![vec![1]], HeightLimit::Highest).unwrap();
        let state = BayState::new(&instance);
        let mut inner = Counting {
            polls: 0,
            solutions: 0,
        };
        let commands = drive(&mut inner, &state);
        assert_eq!(
            commands,
            vec![
                SearchCommand::Continue,
                SearchCommand::Continue,
                SearchCommand::Terminate("enough".to_string())
            ]
        );
        assert_eq!(inner.polls, 3);
        assert_eq!(inner.solutions, 1);
    }

    #[test]
    fn test_command_display() {
        assert_eq!(SearchCommand::Continue.to_string(), "Continue");
        assert_eq!(
            SearchCommand::Terminate("time".to_string()).to_string(),
            "Terminate(time)"
        );
    }
}
