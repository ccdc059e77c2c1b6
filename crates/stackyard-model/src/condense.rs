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

//! Post-hoc condensation of relocation logs.
//!
//! A solution often relocates some item `C` from `s1` to `s2` and later from
//! `s2` to `s3`. When nothing in between depends on `C` sitting on `s2`, the
//! pair is equivalent to a single relocation `s1 -> s3`, or to no relocation
//! at all if `s1 == s3`. The condenser finds such pairs and rewrites them,
//! repeating full passes until a pass changes nothing.
//!
//! Whether `C` may wait on `s3` instead of `s2` is decided by one of two
//! rules:
//! - `Jin`: no operation in between touches `s3`.
//! - `Tricoire`: items put onto `s3` in between are removed again before `C`
//!   arrives, nothing originally on `s3` leaves it, and `s3` never exceeds the
//!   height limit with `C` on it.
//!
//! The rewritten log is verified by replaying it on the instance.

use crate::{
    err::{BayError, ConfigurationError},
    instance::Instance,
    state::{BayState, Operation},
};
use std::str::FromStr;
use tracing::debug;

/// The rule deciding whether the destination of a merged relocation is free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CondenseVariant {
    /// Jin et al. (2015): the destination must be untouched in between.
    Jin,
    /// Permits temporary use of the destination within the height limit.
    #[default]
    Tricoire,
}

impl std::fmt::Display for CondenseVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CondenseVariant::Jin => write!(f, "jin"),
            CondenseVariant::Tricoire => write!(f, "tricoire"),
        }
    }
}

impl FromStr for CondenseVariant {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jin" => Ok(CondenseVariant::Jin),
            "tricoire" => Ok(CondenseVariant::Tricoire),
            other => Err(ConfigurationError::Condensation(other.to_owned())),
        }
    }
}

/// Merges pairs of relocations of the same item in an operation log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Condenser {
    variant: CondenseVariant,
}

impl Condenser {
    #[inline]
    pub fn new(variant: CondenseVariant) -> Self {
        Self { variant }
    }

    #[inline]
    pub fn variant(&self) -> CondenseVariant {
        self.variant
    }

    /// Condenses the log of `state`, replacing it with the replayed result.
    /// Returns the number of relocations removed.
    pub fn condense(&self, state: &mut BayState, instance: &Instance) -> Result<usize, BayError> {
        let (_, condensed) = self.condense_verified(state.operations(), instance)?;
        if condensed.stacks() != state.stacks() {
            return Err(BayError::InternalInconsistency(
                "condensed log ends in a different layout".to_string(),
            ));
        }

        let removed = state.relocation_count() - condensed.relocation_count();
        *state = condensed;
        Ok(removed)
    }

    /// Condenses a bare operation log of `instance`.
    pub fn condense_operations(
        &self,
        operations: &[Operation],
        instance: &Instance,
    ) -> Result<Vec<Operation>, BayError> {
        self.condense_verified(operations, instance)
            .map(|(operations, _)| operations)
    }

    fn condense_verified(
        &self,
        operations: &[Operation],
        instance: &Instance,
    ) -> Result<(Vec<Operation>, BayState), BayError> {
        let mut operations = operations.to_vec();
        let mut pass = 0;
        loop {
            pass += 1;
            let removed = self.condense_pass(&mut operations, instance)?;
            debug!(pass, removed, variant = %self.variant, "condensation pass");
            if removed == 0 {
                break;
            }
        }

        let replayed = BayState::replay(instance, &operations).map_err(|e| {
            BayError::InternalInconsistency(format!("condensed log does not replay: {}", e))
        })?;
        Ok((operations, replayed))
    }

    /// One scan over the log. Returns the number of relocations removed.
    fn condense_pass(
        &self,
        operations: &mut Vec<Operation>,
        instance: &Instance,
    ) -> Result<usize, BayError> {
        let max_height = instance.max_height();
        let mut heights = height_table(operations, instance)?;
        let mut removed = 0;

        let mut first = 0;
        while first < operations.len() {
            let Operation { from: s1, to: s2 } = operations[first];
            if s1 == s2 {
                first += 1;
                continue;
            }

            let Some(second) = next_move_of_moved_item(operations, first) else {
                first += 1;
                continue;
            };
            let s3 = operations[second].to;

            let free = match self.variant {
                CondenseVariant::Jin => untouched_between(operations, first, second, s3),
                CondenseVariant::Tricoire => fits_between(
                    operations, &heights, first, second, s1, s3, max_height,
                ),
            };
            if !free {
                first += 1;
                continue;
            }

            operations.remove(second);
            if s1 == s3 {
                operations.remove(first);
                removed += 2;
            } else {
                operations[first].to = s3;
                removed += 1;
            }
            heights = height_table(operations, instance)?;
        }

        Ok(removed)
    }
}

/// `table[i][s]` is the height of stack `s` before operation `i`.
fn height_table(
    operations: &[Operation],
    instance: &Instance,
) -> Result<Vec<Vec<usize>>, BayError> {
    let num_stacks = instance.num_stacks();
    let mut table = Vec::with_capacity(operations.len() + 1);
    let mut current: Vec<usize> = (0..num_stacks).map(|s| instance.initial_height(s)).collect();

    for (i, op) in operations.iter().enumerate() {
        if op.from >= num_stacks || op.to >= num_stacks {
            return Err(BayError::InternalInconsistency(format!(
                "operation {} ({}) refers to a stack outside of 0..{}",
                i, op, num_stacks
            )));
        }

        table.push(current.clone());
        current[op.from] = current[op.from].checked_sub(1).ok_or_else(|| {
            BayError::InternalInconsistency(format!(
                "operation {} ({}) takes from an empty stack",
                i, op
            ))
        })?;
        if op.is_relocation() {
            current[op.to] += 1;
        }
    }

    table.push(current);
    Ok(table)
}

/// Finds the next operation taking the item relocated by `operations[first]`
/// off its destination. Returns it only if it is a relocation.
fn next_move_of_moved_item(operations: &[Operation], first: usize) -> Option<usize> {
    let s2 = operations[first].to;
    let mut above = 0usize;
    for (i, op) in operations.iter().enumerate().skip(first + 1) {
        if op.from == s2 {
            if above == 0 {
                return op.is_relocation().then_some(i);
            }
            above -= 1;
        } else if op.to == s2 {
            above += 1;
        }
    }
    None
}

fn untouched_between(operations: &[Operation], first: usize, second: usize, s3: usize) -> bool {
    operations[first + 1..second]
        .iter()
        .all(|op| op.from != s3 && op.to != s3)
}

fn fits_between(
    operations: &[Operation],
    heights: &[Vec<usize>],
    first: usize,
    second: usize,
    s1: usize,
    s3: usize,
    max_height: usize,
) -> bool {
    if s1 != s3 && heights[first][s3] + 1 > max_height {
        return false;
    }

    let mut above = 0usize;
    for (i, op) in operations.iter().enumerate().take(second).skip(first + 1) {
        if op.from == s3 {
            if above == 0 {
                return false;
            }
            above -= 1;
        } else if op.to == s3 {
            above += 1;
        }

        if heights[i + 1][s3] + 1 > max_height {
            return false;
        }
    }

    above == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::InstanceGenerator;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    fn ops(list: &[(usize, usize)]) -> Vec<Operation> {
        list.iter().map(|&(from, to)| Operation { from, to }).collect()
    }

    fn completed_state(instance: &Instance, log: &[(usize, usize)]) -> BayState {
        let state = BayState::replay(instance, &ops(log)).unwrap();
        assert!(state.is_empty());
        state
    }

    fn retrievals(operations: &[Operation]) -> Vec<usize> {
        operations
            .iter()
            .filter(|op| op.is_retrieval())
            .map(|op| op.from)
            .collect()
    }

    #[test]
    fn test_variant_parses() {
        assert_eq!("jin".parse::<CondenseVariant>(), Ok(CondenseVariant::Jin));
        assert_eq!(
            "tricoire".parse::<CondenseVariant>(),
            Ok(CondenseVariant::Tricoire)
        );
        assert!("none".parse::<CondenseVariant>().is_err());
    }

    #[test]
    fn test_merges_consecutive_moves_of_same_item() {
        let inst = Instance::with_max_height(vec![vec![2, 3], vec![1], vec![]], 3).unwrap();
        let log = [(0, 1), (1, 2), (1, 1), (0, 0), (2, 2)];

        for variant in [CondenseVariant::Jin, CondenseVariant::Tricoire] {
            let mut state = completed_state(&inst, &log);
            assert_eq!(Condenser::new(variant).condense(&mut state, &inst), Ok(1));
            assert_eq!(
                state.operations(),
                ops(&[(0, 2), (1, 1), (0, 0), (2, 2)]).as_slice()
            );
            assert_eq!(state.relocation_count(), 1);
        }
    }

    #[test]
    fn test_move_and_move_back_cancels() {
        let inst = Instance::with_max_height(vec![vec![3, 1], vec![2]], 3).unwrap();
        let mut state = completed_state(&inst, &[(0, 1), (1, 0), (0, 0), (1, 1), (0, 0)]);

        let removed = Condenser::new(CondenseVariant::Jin)
            .condense(&mut state, &inst)
            .unwrap();
        assert_eq!(removed, 2);
        assert_eq!(state.relocation_count(), 0);
        assert_eq!(state.operations(), ops(&[(0, 0), (1, 1), (0, 0)]).as_slice());
    }

    #[test]
    fn test_tricoire_allows_temporary_use_of_destination() {
        // 1 is parked on stack 2 and retrieved before 5 arrives there
        let inst = Instance::with_max_height(
            vec![vec![3, 5], vec![], vec![], vec![4, 2, 1]],
            3,
        )
        .unwrap();
        let log = [
            (0, 1),
            (3, 2),
            (2, 2),
            (1, 2),
            (3, 3),
            (0, 0),
            (3, 3),
            (2, 2),
        ];

        let mut jin = completed_state(&inst, &log);
        assert_eq!(
            Condenser::new(CondenseVariant::Jin).condense(&mut jin, &inst),
            Ok(0)
        );
        assert_eq!(jin.relocation_count(), 3);

        let mut tricoire = completed_state(&inst, &log);
        assert_eq!(
            Condenser::new(CondenseVariant::Tricoire).condense(&mut tricoire, &inst),
            Ok(1)
        );
        assert_eq!(tricoire.operations()[0], Operation::relocation(0, 2));
        assert_eq!(retrievals(tricoire.operations()), retrievals(jin.operations()));
    }

    #[test]
    fn test_tricoire_respects_height_limit() {
        let stacks = vec![vec![3, 5], vec![4], vec![6], vec![2, 1]];
        let log = [
            (0, 1),
            (3, 2),
            (2, 2),
            (1, 2),
            (3, 3),
            (0, 0),
            (1, 1),
            (2, 2),
            (2, 2),
        ];
        let condenser = Condenser::new(CondenseVariant::Tricoire);

        let tight = Instance::with_max_height(stacks.clone(), 2).unwrap();
        let mut state = completed_state(&tight, &log);
        assert_eq!(condenser.condense(&mut state, &tight), Ok(0));

        let roomy = Instance::with_max_height(stacks, 3).unwrap();
        let mut state = completed_state(&roomy, &log);
        assert_eq!(condenser.condense(&mut state, &roomy), Ok(1));
    }

    #[test]
    fn test_invalid_log_is_reported() {
        let inst = Instance::with_max_height(vec![vec![1], vec![]], 2).unwrap();
        let res = Condenser::default().condense_operations(&ops(&[(1, 0)]), &inst);
        assert!(matches!(res, Err(BayError::InternalInconsistency(_))));
    }

    #[test]
    fn test_random_logs_condense_to_fixed_point() {
        for seed in 0..20 {
            let inst = InstanceGenerator::new(4, 3).seed(seed).generate().unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            let mut state = BayState::new(&inst);

            // dig out the next item, with the occasional random move
            loop {
                state.retrieve_all().unwrap();
                if state.is_empty() {
                    break;
                }
                let from = if rng.gen_bool(0.2) {
                    rng.gen_range(0..state.num_stacks())
                } else {
                    state.stack_for_item(state.next()).unwrap()
                };
                let to = rng.gen_range(0..state.num_stacks());
                let _ = state.relocate(from, to);
            }

            for variant in [CondenseVariant::Jin, CondenseVariant::Tricoire] {
                let condenser = Condenser::new(variant);
                let mut condensed = state.clone();
                let removed = condenser.condense(&mut condensed, &inst).unwrap();

                assert_eq!(
                    condensed.relocation_count() + removed,
                    state.relocation_count()
                );
                assert!(condensed.is_empty());
                assert_eq!(
                    retrievals(condensed.operations()).len(),
                    inst.num_items()
                );
                assert_eq!(condenser.condense(&mut condensed.clone(), &inst), Ok(0));
            }
        }
    }
}
