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

//! Immutable problem data for the block relocation problem.
//!
//! An `Instance` stores the initial layout of the bay (stacks listed bottom to
//! top) together with the resolved height capacity `H`. It is validated once
//! at construction so that every `BayState` built from it starts out
//! consistent: item ids are exactly `1..=n`, each appears once, and no stack
//! exceeds the height limit.

use crate::err::ConfigurationError;
use std::str::FromStr;

/// How the per-stack height capacity is derived from the initial layout.
///
/// `h` denotes the height of the highest initial stack and `n` the number of
/// items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HeightLimit {
    /// `H = n`, i.e. no practical limit.
    Unlimited,
    /// `H = h + 2`.
    PlusTwo,
    /// `H = 2h - 1`.
    TwiceMinusOne,
    /// `H = h`.
    #[default]
    Highest,
    /// An explicit capacity.
    Fixed(usize),
}

impl HeightLimit {
    /// Resolves the capacity for a bay whose highest stack holds `highest`
    /// items and which contains `num_items` items overall.
    #[inline]
    pub fn resolve(&self, highest: usize, num_items: usize) -> usize {
        match *self {
            HeightLimit::Unlimited => num_items,
            HeightLimit::PlusTwo => highest + 2,
            HeightLimit::TwiceMinusOne => (2 * highest).saturating_sub(1),
            HeightLimit::Highest => highest,
            HeightLimit::Fixed(h) => h,
        }
    }
}

impl std::fmt::Display for HeightLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeightLimit::Unlimited => write!(f, "unlimited"),
            HeightLimit::PlusTwo => write!(f, "H+2"),
            HeightLimit::TwiceMinusOne => write!(f, "2H-1"),
            HeightLimit::Highest => write!(f, "highest"),
            HeightLimit::Fixed(h) => write!(f, "{}", h),
        }
    }
}

impl FromStr for HeightLimit {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unlimited" => Ok(HeightLimit::Unlimited),
            "H+2" => Ok(HeightLimit::PlusTwo),
            "2H-1" => Ok(HeightLimit::TwiceMinusOne),
            "highest" => Ok(HeightLimit::Highest),
            other => other
                .parse::<usize>()
                .map(HeightLimit::Fixed)
                .map_err(|_| ConfigurationError::HeightLimit(other.to_owned())),
        }
    }
}

/// A layout violation found while building an `Instance`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceError {
    /// The bay has no stacks.
    NoStacks,
    /// An item id outside `1..=n`.
    ItemOutOfRange { item: usize, num_items: usize },
    /// An item id listed more than once.
    DuplicateItem { item: usize },
    /// A stack holds more items than the resolved capacity.
    StackTooHigh {
        stack: usize,
        height: usize,
        max_height: usize,
    },
}

impl std::fmt::Display for InstanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstanceError::NoStacks => write!(f, "the bay must have at least one stack"),
            InstanceError::ItemOutOfRange { item, num_items } => {
                write!(f, "item {} is outside of 1..={}", item, num_items)
            }
            InstanceError::DuplicateItem { item } => write!(f, "item {} appears twice", item),
            InstanceError::StackTooHigh {
                stack,
                height,
                max_height,
            } => write!(
                f,
                "stack {} holds {} items but the height limit is {}",
                stack, height, max_height
            ),
        }
    }
}

impl std::error::Error for InstanceError {}

/// The initial layout of a bay and its height capacity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Instance {
    stacks: Vec<Vec<usize>>,
    max_height: usize,
    num_items: usize,
}

impl Instance {
    /// Creates an instance from stacks listed bottom to top. The number of
    /// items is the total number of ids listed, and they must be exactly
    /// `1..=n`.
    pub fn new(stacks: Vec<Vec<usize>>, height_limit: HeightLimit) -> Result<Self, InstanceError> {
        if stacks.is_empty() {
            return Err(InstanceError::NoStacks);
        }

        let num_items: usize = stacks.iter().map(Vec::len).sum();
        let highest = stacks.iter().map(Vec::len).max().unwrap_or(0);
        let max_height = height_limit.resolve(highest, num_items);

        let mut seen = vec![false; num_items + 1];
        for (s, stack) in stacks.iter().enumerate() {
            if stack.len() > max_height {
                return Err(InstanceError::StackTooHigh {
                    stack: s,
                    height: stack.len(),
                    max_height,
                });
            }
            for &item in stack {
                if item == 0 || item > num_items {
                    return Err(InstanceError::ItemOutOfRange { item, num_items });
                }
                if seen[item] {
                    return Err(InstanceError::DuplicateItem { item });
                }
                seen[item] = true;
            }
        }

        Ok(Self {
            stacks,
            max_height,
            num_items,
        })
    }

    /// Creates an instance with an explicit height capacity.
    #[inline]
    pub fn with_max_height(stacks: Vec<Vec<usize>>, max_height: usize) -> Result<Self, InstanceError> {
        Self::new(stacks, HeightLimit::Fixed(max_height))
    }

    /// Number of stacks `W`.
    #[inline]
    pub fn num_stacks(&self) -> usize {
        self.stacks.len()
    }

    /// Height capacity `H` of every stack.
    #[inline]
    pub fn max_height(&self) -> usize {
        self.max_height
    }

    /// Number of items `n`.
    #[inline]
    pub fn num_items(&self) -> usize {
        self.num_items
    }

    /// The initial stacks, bottom to top.
    #[inline]
    pub fn stacks(&self) -> &[Vec<usize>] {
        &self.stacks
    }

    /// The initial height of stack `s`.
    ///
    /// # Panics
    ///
    /// Panics if `s` is out of bounds `0..num_stacks`.
    #[inline]
    pub fn initial_height(&self, s: usize) -> usize {
        self.stacks[s].len()
    }
}

impl std::fmt::Display for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Instance(W: {}, H: {}, n: {})",
            self.num_stacks(),
            self.max_height,
            self.num_items
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_limit_rules() {
        assert_eq!(HeightLimit::Unlimited.resolve(3, 12), 12);
        assert_eq!(HeightLimit::PlusTwo.resolve(3, 12), 5);
        assert_eq!(HeightLimit::TwiceMinusOne.resolve(3, 12), 5);
        assert_eq!(HeightLimit::Highest.resolve(3, 12), 3);
        assert_eq!(HeightLimit::Fixed(7).resolve(3, 12), 7);
        assert_eq!(HeightLimit::TwiceMinusOne.resolve(0, 0), 0);
    }

    #[test]
    fn test_height_limit_parses_names() {
        assert_eq!("H+2".parse::<HeightLimit>(), Ok(HeightLimit::PlusTwo));
        assert_eq!("2H-1".parse::<HeightLimit>(), Ok(HeightLimit::TwiceMinusOne));
        assert_eq!("unlimited".parse::<HeightLimit>(), Ok(HeightLimit::Unlimited));
        assert_eq!("4".parse::<HeightLimit>(), Ok(HeightLimit::Fixed(4)));
        assert_eq!(
            "H+3".parse::<HeightLimit>(),
            Err(ConfigurationError::HeightLimit("H+3".to_string()))
        );
    }

    #[test]
    fn test_new_validates_layout() {
        let inst = Instance::new(vec![vec![3, 1], vec![2]], HeightLimit::PlusTwo).unwrap();
        assert_eq!(inst.num_stacks(), 2);
        assert_eq!(inst.num_items(), 3);
        assert_eq!(inst.max_height(), 4);
        assert_eq!(inst.initial_height(0), 2);

        assert_eq!(
            Instance::new(vec![vec![1, 1]], HeightLimit::Unlimited),
            Err(InstanceError::DuplicateItem { item: 1 })
        );
        assert_eq!(
            Instance::new(vec![vec![1, 4]], HeightLimit::Unlimited),
            Err(InstanceError::ItemOutOfRange {
                item: 4,
                num_items: 2
            })
        );
        assert_eq!(
            Instance::with_max_height(vec![vec![1, 2, 3]], 2),
            Err(InstanceError::StackTooHigh {
                stack: 0,
                height: 3,
                max_height: 2
            })
        );
        assert_eq!(
            Instance::new(Vec::new(), HeightLimit::Unlimited),
            Err(InstanceError::NoStacks)
        );
    }
}
