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

use yard_plan_model::mission::DEFAULT_BASE_TIME;

/// Knobs of the per-step beam search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Candidate states retained between expansion steps.
    pub beam_width: usize,
    /// Expansion rounds per retrieval step before the step is declared
    /// infeasible.
    pub depth_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            beam_width: 1,
            depth_limit: 30,
        }
    }
}

/// Knobs of the evolutionary sequence search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvolveConfig {
    pub population_size: usize,
    pub generations: usize,
    /// Probability that a bred child undergoes a swap mutation.
    pub mutation_rate: f64,
    /// Fraction of the population carried over unchanged, at least one.
    pub elite_fraction: f64,
    /// RNG seed; derived from the wall clock when unset.
    pub seed: Option<u64>,
}

impl Default for EvolveConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 30,
            mutation_rate: 0.2,
            elite_fraction: 0.1,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    pub search: SearchConfig,
    pub evolve: EvolveConfig,
    pub base_time: i64,
}

impl SolverConfig {
    pub fn new() -> Self {
        Self {
            search: SearchConfig::default(),
            evolve: EvolveConfig::default(),
            base_time: DEFAULT_BASE_TIME,
        }
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::new()
    }
}
