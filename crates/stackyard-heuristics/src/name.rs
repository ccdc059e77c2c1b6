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

use crate::{
    look_ahead::LookAheadPolicy,
    policy::{ForcedMovePolicy, HeuristicProvider},
};
use stackyard_model::err::ConfigurationError;
use std::str::FromStr;

/// A policy selected by name.
///
/// Recognized names are `base`, `LA-N` for a positive `N`, and `LA-S-1`,
/// which looks ahead `W - 1` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyName {
    Base,
    LookAhead(usize),
    LookAheadStacksMinusOne,
}

impl std::fmt::Display for PolicyName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyName::Base => write!(f, "base"),
            PolicyName::LookAhead(n) => write!(f, "LA-{}", n),
            PolicyName::LookAheadStacksMinusOne => write!(f, "LA-S-1"),
        }
    }
}

impl FromStr for PolicyName {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base" => Ok(PolicyName::Base),
            "LA-S-1" => Ok(PolicyName::LookAheadStacksMinusOne),
            other => other
                .strip_prefix("LA-")
                .and_then(|n| n.parse::<usize>().ok())
                .filter(|&n| n > 0)
                .map(PolicyName::LookAhead)
                .ok_or_else(|| ConfigurationError::Policy(other.to_owned())),
        }
    }
}

impl PolicyName {
    /// Instantiates the policy for a bay of `num_stacks` stacks.
    pub fn build(&self, num_stacks: usize) -> Box<dyn HeuristicProvider> {
        match *self {
            PolicyName::Base => Box::new(ForcedMovePolicy::new()),
            PolicyName::LookAhead(n) => Box::new(LookAheadPolicy::new(n)),
            PolicyName::LookAheadStacksMinusOne => {
                Box::new(LookAheadPolicy::new(num_stacks.saturating_sub(1).max(1)))
            }
        }
    }
}
