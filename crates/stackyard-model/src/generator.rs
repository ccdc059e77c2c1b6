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

//! Seeded random bay layouts.
//!
//! Produces instances in the style of the Caserta benchmark family: `W`
//! stacks of `T` tiers each, holding the items `1..=W*T` in a uniformly
//! random order. The same seed always yields the same layout.

use crate::instance::{HeightLimit, Instance, InstanceError};
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

/// Builder for random instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceGenerator {
    num_stacks: usize,
    num_tiers: usize,
    height_limit: HeightLimit,
    seed: u64,
}

impl InstanceGenerator {
    /// Creates a generator for `num_stacks` stacks filled to `num_tiers`
    /// tiers, with capacity `H = T + 2` and seed 0.
    #[inline]
    pub fn new(num_stacks: usize, num_tiers: usize) -> Self {
        Self {
            num_stacks,
            num_tiers,
            height_limit: HeightLimit::PlusTwo,
            seed: 0,
        }
    }

    /// Sets the rule used to derive the height capacity.
    #[inline]
    pub fn height_limit(mut self, height_limit: HeightLimit) -> Self {
        self.height_limit = height_limit;
        self
    }

    /// Sets the seed of the random number generator.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Generates the instance.
    pub fn generate(&self) -> Result<Instance, InstanceError> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut items: Vec<usize> = (1..=self.num_stacks * self.num_tiers).collect();
        items.shuffle(&mut rng);

        let stacks = if self.num_tiers == 0 {
            vec![Vec::new(); self.num_stacks]
        } else {
            items
                .chunks(self.num_tiers)
                .map(<[usize]>::to_vec)
                .collect()
        };

        Instance::new(stacks, self.height_limit)
    }
}
