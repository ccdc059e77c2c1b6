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

//! Search configuration.
//!
//! `SearchConfig` collects everything the engines need besides the root
//! state and the heuristic: which lower bound to evaluate at each node, the
//! order in which the worklist engine explores its queue, an optional ceiling
//! on the number of relocations, and the cooperative time limit.

use crate::monitor::{
    composite::CompositeTreeSearchMonitor, time_limit::TimeLimitMonitor,
    tree_search_monitor::TreeSearchMonitor,
};
use stackyard_model::{bounds::BoundVersion, err::ConfigurationError};
use std::{str::FromStr, time::Duration};

/// Order in which the worklist engine takes states from its queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExplorationStrategy {
    /// Oldest state first.
    Breadth,
    /// Newest state first.
    #[default]
    Depth,
}

impl std::fmt::Display for ExplorationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExplorationStrategy::Breadth => write!(f, "breadth"),
            ExplorationStrategy::Depth => write!(f, "depth"),
        }
    }
}

impl FromStr for ExplorationStrategy {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "breadth" => Ok(ExplorationStrategy::Breadth),
            "depth" => Ok(ExplorationStrategy::Depth),
            other => Err(ConfigurationError::ExplorationStrategy(other.to_string())),
        }
    }
}

/// Parameters shared by all search engines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    bound_version: BoundVersion,
    exploration_strategy: ExplorationStrategy,
    relocation_cap: Option<usize>,
    time_limit: Option<Duration>,
    check_interval: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchConfig {
    /// LB1, depth-first, no cap, no time limit, clock checked on every call.
    #[inline]
    pub fn new() -> Self {
        Self {
            bound_version: BoundVersion::default(),
            exploration_strategy: ExplorationStrategy::default(),
            relocation_cap: None,
            time_limit: None,
            check_interval: 1,
        }
    }

    #[inline]
    pub fn bound_version(mut self, version: BoundVersion) -> Self {
        self.bound_version = version;
        self
    }

    #[inline]
    pub fn exploration_strategy(mut self, strategy: ExplorationStrategy) -> Self {
        self.exploration_strategy = strategy;
        self
    }

    /// Only plans with strictly fewer than `cap` relocations are sought.
    #[inline]
    pub fn relocation_cap(mut self, cap: usize) -> Self {
        self.relocation_cap = Some(cap);
        self
    }

    #[inline]
    pub fn time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Number of monitor polls between two clock readings. Values below one
    /// are raised to one.
    #[inline]
    pub fn check_interval(mut self, interval: u64) -> Self {
        self.check_interval = interval.max(1);
        self
    }

    #[inline]
    pub fn get_bound_version(&self) -> BoundVersion {
        self.bound_version
    }

    #[inline]
    pub fn get_exploration_strategy(&self) -> ExplorationStrategy {
        self.exploration_strategy
    }

    #[inline]
    pub fn get_relocation_cap(&self) -> Option<usize> {
        self.relocation_cap
    }

    #[inline]
    pub fn get_time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    #[inline]
    pub fn get_check_interval(&self) -> u64 {
        self.check_interval
    }

    /// Exclusive ceiling on relocations implied by the cap.
    #[inline]
    pub(crate) fn ceiling(&self) -> usize {
        self.relocation_cap.unwrap_or(usize::MAX)
    }

    /// Wraps `monitor` so that the configured time limit, if any, is polled
    /// before it.
    pub(crate) fn attach_time_limit<'a, M>(&self, monitor: &'a mut M) -> CompositeTreeSearchMonitor<'a>
    where
        M: TreeSearchMonitor + ?Sized,
    {
        let mut composite = CompositeTreeSearchMonitor::with_capacity(2);
        if let Some(limit) = self.time_limit {
            composite.add_monitor(TimeLimitMonitor::new(limit, self.check_interval));
        }
        composite.add_monitor(monitor);
        composite
    }
}

impl std::fmt::Display for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchConfig(bound: {}, strategy: {}, cap: ",
            self.bound_version, self.exploration_strategy
        )?;
        match self.relocation_cap {
            Some(cap) => write!(f, "{}", cap)?,
            None => write!(f, "none")?,
        }
        match self.time_limit {
            Some(limit) => write!(f, ", time limit: {:.2?})", limit),
            None => write!(f, ", time limit: none)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_parsing() {
        assert_eq!(
            "breadth".parse::<ExplorationStrategy>().unwrap(),
            ExplorationStrategy::Breadth
        );
        assert_eq!(
            "depth".parse::<ExplorationStrategy>().unwrap(),
            ExplorationStrategy::Depth
        );
        assert_eq!(
            "best".parse::<ExplorationStrategy>(),
            Err(ConfigurationError::ExplorationStrategy("best".to_string()))
        );
    }

    #[test]
    fn test_strategy_display_round_trips() {
        for strategy in [ExplorationStrategy::Breadth, ExplorationStrategy::Depth] {
            assert_eq!(strategy.to_string().parse::<ExplorationStrategy>(), Ok(strategy));
        }
    }

    #[test]
    fn test_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.get_bound_version(), BoundVersion::Lb1);
        assert_eq!(config.get_exploration_strategy(), ExplorationStrategy::Depth);
        assert_eq!(config.get_relocation_cap(), None);
        assert_eq!(config.get_time_limit(), None);
        assert_eq!(config.get_check_interval(), 1);
        assert_eq!(config.ceiling(), usize::MAX);
    }

    #[test]
    fn test_builder() {
        let config = SearchConfig::new()
            .bound_version(BoundVersion::Lb3)
            .exploration_strategy(ExplorationStrategy::Breadth)
            .relocation_cap(12)
            .time_limit(Duration::from_millis(250))
            .check_interval(0);
        assert_eq!(config.get_bound_version(), BoundVersion::Lb3);
        assert_eq!(config.get_exploration_strategy(), ExplorationStrategy::Breadth);
        assert_eq!(config.ceiling(), 12);
        assert_eq!(config.get_time_limit(), Some(Duration::from_millis(250)));
        assert_eq!(config.get_check_interval(), 1);
    }
}
