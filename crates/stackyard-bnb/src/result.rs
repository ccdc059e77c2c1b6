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

use crate::stats::SearchStatistics;
use stackyard_model::state::BayState;

/// Why a search stopped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TerminationReason {
    /// The tree was exhausted; the best plan is optimal.
    OptimalityProven,
    /// The tree was exhausted without a plan below the relocation cap.
    InfeasibilityProven,
    /// A monitor stopped the search; the best plan is only an upper bound.
    Aborted(String),
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::OptimalityProven => write!(f, "optimality proven"),
            TerminationReason::InfeasibilityProven => write!(f, "infeasibility proven"),
            TerminationReason::Aborted(reason) => write!(f, "aborted: {}", reason),
        }
    }
}

/// Result of a search after termination.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    best: Option<BayState>,
    termination_reason: TerminationReason,
    statistics: SearchStatistics,
}

impl SearchOutcome {
    #[inline]
    pub fn optimal(best: BayState, statistics: SearchStatistics) -> Self {
        debug_assert!(
            best.is_empty(),
            "called `SearchOutcome::optimal` with a state that still holds {} items",
            best.num_remaining()
        );

        Self {
            best: Some(best),
            termination_reason: TerminationReason::OptimalityProven,
            statistics,
        }
    }

    #[inline]
    pub fn infeasible(statistics: SearchStatistics) -> Self {
        Self {
            best: None,
            termination_reason: TerminationReason::InfeasibilityProven,
            statistics,
        }
    }

    #[inline]
    pub fn aborted<R>(best: Option<BayState>, reason: R, statistics: SearchStatistics) -> Self
    where
        R: Into<String>,
    {
        Self {
            best,
            termination_reason: TerminationReason::Aborted(reason.into()),
            statistics,
        }
    }

    /// Builds the outcome of a finished run: aborted if `abort_reason` is
    /// set, otherwise optimal or infeasible depending on `best`.
    pub(crate) fn conclude(
        best: Option<BayState>,
        abort_reason: Option<String>,
        statistics: SearchStatistics,
    ) -> Self {
        match (abort_reason, best) {
            (Some(reason), best) => Self::aborted(best, reason, statistics),
            (None, Some(best)) => Self::optimal(best, statistics),
            (None, None) => Self::infeasible(statistics),
        }
    }

    /// Returns the best completed state found, if any.
    #[inline]
    pub fn best(&self) -> Option<&BayState> {
        self.best.as_ref()
    }

    #[inline]
    pub fn into_best(self) -> Option<BayState> {
        self.best
    }

    /// Returns the relocation count of the best plan.
    #[inline]
    pub fn relocations(&self) -> Option<usize> {
        self.best.as_ref().map(BayState::relocation_count)
    }

    #[inline]
    pub fn is_optimal(&self) -> bool {
        self.termination_reason == TerminationReason::OptimalityProven
    }

    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
    }

    #[inline]
    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }
}

impl std::fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.relocations() {
            Some(r) => write!(f, "SearchOutcome(relocations: {}, {})", r, self.termination_reason),
            None => write!(f, "SearchOutcome(no plan, {})", self.termination_reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackyard_model::instance::{HeightLimit, Instance};

    fn solved() -> BayState {
        let instance = Instance::new(vec![vec![1, 2], vec![]], HeightLimit::Fixed(2)).unwrap();
        let mut state = BayState::new(&instance);
        state.relocate(0, 1).unwrap();
        state.retrieve_all().unwrap();
        state
    }

    #[test]
    fn test_optimal() {
        let outcome = SearchOutcome::optimal(solved(), SearchStatistics::default());
        assert!(outcome.is_optimal());
        assert_eq!(outcome.relocations(), Some(1));
        assert_eq!(outcome.to_string(), "SearchOutcome(relocations: 1, optimality proven)");
    }

    #[test]
    fn test_aborted_keeps_reason_and_plan() {
        let outcome =
            SearchOutcome::aborted(Some(solved()), "time limit", SearchStatistics::default());
        assert!(!outcome.is_optimal());
        assert_eq!(
            outcome.termination_reason(),
            &TerminationReason::Aborted("time limit".to_string())
        );
        assert_eq!(outcome.into_best().map(|s| s.relocation_count()), Some(1));
    }

    #[test]
    fn test_infeasible_has_no_plan() {
        let outcome = SearchOutcome::infeasible(SearchStatistics::default());
        assert!(outcome.best().is_none());
        assert_eq!(outcome.relocations(), None);
        assert_eq!(outcome.to_string(), "SearchOutcome(no plan, infeasibility proven)");
    }
}
