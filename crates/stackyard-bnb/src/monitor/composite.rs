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

//! Monitoring combinators for tree search
//!
//! Provides `CompositeTreeSearchMonitor`, a fan-out monitor that forwards every
//! event to its children, so that a time limit and a progress log can watch
//! the same search.
//!
//! Behavior
//! - Events are dispatched to child monitors in insertion order.
//! - `search_command` short-circuits on the first non-`Continue` response;
//!   put stricter stop conditions first.
//! - Other callbacks always fan out to all children.

use crate::{
    monitor::tree_search_monitor::{SearchCommand, TreeSearchMonitor},
    stats::SearchStatistics,
};
use stackyard_model::state::BayState;

/// A tree search monitor that forwards events to a list of monitors.
#[derive(Default)]
pub struct CompositeTreeSearchMonitor<'a> {
    monitors: Vec<Box<dyn TreeSearchMonitor + 'a>>,
}

impl<'a> CompositeTreeSearchMonitor<'a> {
    /// Creates a new empty `CompositeTreeSearchMonitor`.
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    #[inline(always)]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            monitors: Vec::with_capacity(capacity),
        }
    }

    /// Adds a new monitor to the composite monitor.
    #[inline(always)]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: TreeSearchMonitor + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    #[inline(always)]
    pub fn add_monitor_boxed(&mut self, monitor: Box<dyn TreeSearchMonitor + 'a>) {
        self.monitors.push(monitor);
    }

    #[inline(always)]
    pub fn monitors(&self) -> &[Box<dyn TreeSearchMonitor + 'a>] {
        &self.monitors
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl std::fmt::Debug for CompositeTreeSearchMonitor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeTreeSearchMonitor")
            .field("monitors", &self.monitors)
            .finish()
    }
}

impl TreeSearchMonitor for CompositeTreeSearchMonitor<'_> {
    fn name(&self) -> &str {
        "CompositeTreeSearchMonitor"
    }

    fn on_enter_search(&mut self, root: &BayState, statistics: &SearchStatistics) {
        for monitor in self.monitors.iter_mut() {
            monitor.on_enter_search(root, statistics);
        }
    }

    fn search_command(&mut self, state: &BayState, statistics: &SearchStatistics) -> SearchCommand {
        for monitor in self.monitors.iter_mut() {
            let command = monitor.search_command(state, statistics);
            if command != SearchCommand::Continue {
                return command;
            }
        }
        SearchCommand::Continue
    }

    fn on_prune(&mut self, state: &BayState, statistics: &SearchStatistics) {
        for monitor in self.monitors.iter_mut() {
            monitor.on_prune(state, statistics);
        }
    }

    fn on_solution_found(&mut self, solution: &BayState, statistics: &SearchStatistics) {
        for monitor in self.monitors.iter_mut() {
            monitor.on_solution_found(solution, statistics);
        }
    }

    fn on_exit_search(&mut self, statistics: &SearchStatistics) {
        for monitor in self.monitors.iter_mut() {
            monitor.on_exit_search(statistics);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackyard_model::instance::{HeightLimit, Instance};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder {
        label: &'static str,
        stop: bool,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl TreeSearchMonitor for Recorder {
        fn name(&self) -> &str {
            self.label
        }

        fn on_enter_search(&mut self, _root: &BayState, _statistics: &SearchStatistics) {
            self.log.borrow_mut().push(format!("{}:enter", self.label));
        }

        fn search_command(&mut self, _state: &BayState, _statistics: &SearchStatistics) -> SearchCommand {
            self.log.borrow_mut().push(format!("{}:command", self.label));
            if self.stop {
                SearchCommand::Terminate(self.label.to_string())
            } else {
                SearchCommand::Continue
            }
        }

        fn on_solution_found(&mut self, _solution: &BayState, _statistics: &SearchStatistics) {
            self.log.borrow_mut().push(format!("{}:solution", self.label));
        }

        fn on_exit_search(&mut self, _statistics: &SearchStatistics) {
            self.log.borrow_mut().push(format!("{}:exit", self.label));
        }
    }

    fn recorder(label: &'static str, stop: bool, log: &Rc<RefCell<Vec<String>>>) -> Recorder {
        Recorder {
            label,
            stop,
            log: Rc::clone(log),
        }
    }

    #[test]
    fn test_fans_out_in_insertion_order() {
        let state = BayState::new(&Instance::new(vec![vec![1]], HeightLimit::Highest).unwrap());
        let stats = SearchStatistics::default();
        let log = Rc::new(RefCell::new(Vec::new()));

        let mut composite = CompositeTreeSearchMonitor::new();
        composite.add_monitor(recorder("a", false, &log));
        composite.add_monitor(recorder("b", false, &log));
        assert_eq!(composite.len(), 2);

        composite.on_enter_search(&state, &stats);
        assert_eq!(composite.search_command(&state, &stats), SearchCommand::Continue);
        composite.on_solution_found(&state, &stats);
        composite.on_exit_search(&stats);

        assert_eq!(
            *log.borrow(),
            vec![
                "a:enter", "b:enter", "a:command", "b:command", "a:solution", "b:solution",
                "a:exit", "b:exit"
            ]
        );
    }

    #[test]
    fn test_command_short_circuits() {
        let state = BayState::new(&Instance::new(vec![vec![1]], HeightLimit::Highest).unwrap());
        let stats = SearchStatistics::default();
        let log = Rc::new(RefCell::new(Vec::new()));

        let mut composite = CompositeTreeSearchMonitor::new();
        composite.add_monitor(recorder("first", true, &log));
        composite.add_monitor(recorder("second", false, &log));

        assert_eq!(
            composite.search_command(&state, &stats),
            SearchCommand::Terminate("first".to_string())
        );
        assert_eq!(*log.borrow(), vec!["first:command"]);
    }

    #[test]
    fn test_empty_composite_continues() {
        let state = BayState::new(&Instance::new(vec![vec![1]], HeightLimit::Highest).unwrap());
        let stats = SearchStatistics::default();
        let mut composite = CompositeTreeSearchMonitor::new();
        assert!(composite.is_empty());
        assert_eq!(composite.search_command(&state, &stats), SearchCommand::Continue);
    }
}
