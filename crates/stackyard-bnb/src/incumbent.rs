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

//! Incumbent management
//!
//! `Incumbent` holds the best completed state known so far together with the
//! exclusive upper bound that every new plan has to beat. The bound starts at
//! the configured relocation cap and is tightened by the heuristic plan and
//! by every improvement the search finds.

use crate::stats::SearchStatistics;
use stackyard_heuristics::policy::HeuristicProvider;
use stackyard_model::{err::BayError, state::BayState};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Incumbent {
    upper_bound: usize,
    best: Option<BayState>,
}

impl Incumbent {
    /// An empty incumbent accepting plans with fewer than `ceiling`
    /// relocations.
    #[inline]
    pub fn new(ceiling: usize) -> Self {
        Self {
            upper_bound: ceiling,
            best: None,
        }
    }

    /// Runs `heuristic` on `root` and installs its plan if it beats
    /// `ceiling`. The upper bound is `min(ceiling, heuristic relocations)`.
    pub fn from_heuristic<H>(
        root: &BayState,
        heuristic: &H,
        ceiling: usize,
        stats: &mut SearchStatistics,
    ) -> Result<Self, BayError>
    where
        H: HeuristicProvider + ?Sized,
    {
        let plan = heuristic.solve(root)?;
        debug_assert!(plan.is_empty(), "heuristic `{}` left items in the bay", heuristic.name());

        stats.set_heuristic_relocations(plan.relocation_count());
        debug!(
            heuristic = heuristic.name(),
            relocations = plan.relocation_count(),
            "heuristic incumbent"
        );

        let mut incumbent = Self::new(ceiling);
        incumbent.try_install(&plan);
        Ok(incumbent)
    }

    /// Exclusive bound on the relocations of any plan still worth finding.
    #[inline]
    pub fn upper_bound(&self) -> usize {
        self.upper_bound
    }

    #[inline]
    pub fn best(&self) -> Option<&BayState> {
        self.best.as_ref()
    }

    #[inline]
    pub fn into_best(self) -> Option<BayState> {
        self.best
    }

    #[inline]
    pub fn accepts(&self, relocations: usize) -> bool {
        relocations < self.upper_bound
    }

    /// Installs `state` if it is completed and beats the bound.
    pub fn try_install(&mut self, state: &BayState) -> bool {
        if !state.is_empty() || !self.accepts(state.relocation_count()) {
            return false;
        }
        self.upper_bound = state.relocation_count();
        self.best = Some(state.clone());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackyard_heuristics::policy::ForcedMovePolicy;
    use stackyard_model::instance::{HeightLimit, Instance};

    fn instance() -> Instance {
        Instance::new(vec![vec![1, 3], vec![2, 4]], HeightLimit::Fixed(3)).unwrap()
    }

    #[test]
    fn test_install_requires_improvement() {
        let root = BayState::new(&instance());
        let plan = ForcedMovePolicy::new().solve(&root).unwrap();
        let relocations = plan.relocation_count();

        let mut incumbent = Incumbent::new(relocations);
        assert!(!incumbent.try_install(&plan));
        assert!(incumbent.best().is_none());

        let mut incumbent = Incumbent::new(relocations + 1);
        assert!(incumbent.try_install(&plan));
        assert_eq!(incumbent.upper_bound(), relocations);
        assert!(!incumbent.try_install(&plan));
    }

    #[test]
    fn test_unfinished_state_is_rejected() {
        let root = BayState::new(&instance());
        let mut incumbent = Incumbent::new(usize::MAX);
        assert!(!incumbent.try_install(&root));
    }

    #[test]
    fn test_from_heuristic_respects_ceiling() {
        let root = BayState::new(&instance());
        let policy = ForcedMovePolicy::new();
        let mut stats = SearchStatistics::default();

        let seeded = Incumbent::from_heuristic(&root, &policy, usize::MAX, &mut stats).unwrap();
        let relocations = stats.heuristic_relocations.unwrap();
        assert_eq!(seeded.upper_bound(), relocations);
        assert!(seeded.best().is_some());

        let capped = Incumbent::from_heuristic(&root, &policy, relocations, &mut stats).unwrap();
        assert_eq!(capped.upper_bound(), relocations);
        assert!(capped.best().is_none());
    }
}
