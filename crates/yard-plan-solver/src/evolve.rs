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

use crate::{beam::Simulator, config::SolverConfig};
use rand::{Rng, SeedableRng, seq::SliceRandom};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};
use yard_plan_core::cost::Cost;
use yard_plan_model::{id::ContainerId, problem::Problem};

/// Result of an optimisation run: the cheapest retrieval order found
/// and its simulated reshuffle cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvolveOutcome {
    sequence: Vec<ContainerId>,
    cost: Cost,
}

impl EvolveOutcome {
    #[inline]
    pub fn sequence(&self) -> &[ContainerId] {
        &self.sequence
    }

    #[inline]
    pub fn cost(&self) -> Cost {
        self.cost
    }
}

#[derive(Debug, Clone)]
struct Individual {
    sequence: Vec<ContainerId>,
    /// Cached simulation cost; `None` marks a sequence that changed
    /// since its last evaluation. Elite copies keep their cache.
    fitness: Option<Cost>,
}

impl Individual {
    fn shuffled(targets: &[ContainerId], rng: &mut ChaCha8Rng) -> Self {
        let mut sequence = targets.to_vec();
        sequence.shuffle(rng);
        Individual {
            sequence,
            fitness: None,
        }
    }

    #[inline]
    fn fitness(&self) -> Cost {
        self.fitness.expect("population was evaluated before ranking")
    }
}

/// Permutation search over the retrieval order: a population of
/// sequences scored by the beam simulator and evolved by elitism plus
/// swap mutation. There is deliberately no crossover; the scheme is a
/// (mu + lambda) hill-climber that never loses its incumbent.
#[derive(Debug, Clone, Copy)]
pub struct EvolveEngine<'a> {
    config: &'a SolverConfig,
}

impl<'a> EvolveEngine<'a> {
    pub fn new(config: &'a SolverConfig) -> Self {
        EvolveEngine { config }
    }

    pub fn solve(&self, problem: &Problem) -> EvolveOutcome {
        let targets = problem.targets();
        if targets.is_empty() {
            return EvolveOutcome {
                sequence: Vec::new(),
                cost: Cost::ZERO,
            };
        }

        let evolve = &self.config.evolve;
        let simulator = Simulator::new(
            &self.config.search,
            problem.batch_id(),
            self.config.base_time,
        );

        let seed = evolve.seed.unwrap_or_else(seed_from_clock);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let population_size = evolve.population_size.max(1);
        debug!(seed, population_size, "initialising population");

        let mut population: Vec<Individual> = (0..population_size)
            .map(|_| Individual::shuffled(targets, &mut rng))
            .collect();

        for generation in 0..evolve.generations {
            evaluate_pending(&simulator, problem, &mut population);
            population.sort_by_key(Individual::fitness);

            let best = population[0].fitness();
            if generation % 10 == 0 || generation + 1 == evolve.generations {
                info!(generation, best = %best, "generation evaluated");
            } else {
                debug!(generation, best = %best, "generation evaluated");
            }

            population = self.breed(population, &mut rng);
        }

        evaluate_pending(&simulator, problem, &mut population);
        population.sort_by_key(Individual::fitness);

        let best = population
            .into_iter()
            .next()
            .expect("population is never empty");
        EvolveOutcome {
            cost: best.fitness(),
            sequence: best.sequence,
        }
    }

    fn breed(&self, population: Vec<Individual>, rng: &mut ChaCha8Rng) -> Vec<Individual> {
        let evolve = &self.config.evolve;
        let size = population.len();
        let elite = ((size as f64 * evolve.elite_fraction) as usize).max(1);
        let parent_pool = (size / 2).max(1);

        let mut next = Vec::with_capacity(size);
        next.extend_from_slice(&population[..elite.min(size)]);

        while next.len() < size {
            let parent = &population[rng.random_range(0..parent_pool)];
            let mut child = parent.clone();
            if rng.random::<f64>() < evolve.mutation_rate {
                let a = rng.random_range(0..child.sequence.len());
                let b = rng.random_range(0..child.sequence.len());
                child.sequence.swap(a, b);
                child.fitness = None;
            }
            next.push(child);
        }
        next
    }
}

/// Scores every not-yet-evaluated individual. Each evaluation works on
/// its own clone of the initial yard, so the population can be scored
/// in parallel; results land in population order, keeping runs with a
/// fixed seed deterministic.
fn evaluate_pending(simulator: &Simulator<'_>, problem: &Problem, population: &mut [Individual]) {
    population.par_iter_mut().for_each(|individual| {
        if individual.fitness.is_none() {
            individual.fitness =
                Some(simulator.evaluate(problem.initial_yard(), &individual.sequence));
        }
    });
}

fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EvolveConfig, SolverConfig};
    use static_assertions::assert_impl_all;
    use yard_plan_core::slot::SlotPosition;
    use yard_plan_model::{problem::ProblemBuilder, yard::YardLayout};

    assert_impl_all!(EvolveEngine<'static>: Send, Sync);
    assert_impl_all!(Individual: Send);

    fn seeded_config(seed: u64) -> SolverConfig {
        SolverConfig {
            evolve: EvolveConfig {
                seed: Some(seed),
                ..EvolveConfig::default()
            },
            ..SolverConfig::new()
        }
    }

    /// Two containers stacked in one of two columns; retrieving the top
    /// one first avoids every reshuffle while the reverse order pays.
    fn order_matters_problem() -> Problem {
        let mut builder = ProblemBuilder::new(YardLayout::new(1, 2, 2, 4).unwrap());
        builder
            .add_container(ContainerId::new(1), SlotPosition::new(0, 0, 0))
            .unwrap();
        builder
            .add_container(ContainerId::new(2), SlotPosition::new(0, 0, 1))
            .unwrap();
        assert!(builder.add_target(ContainerId::new(1)));
        assert!(builder.add_target(ContainerId::new(2)));
        builder.build()
    }

    #[test]
    fn finds_the_reshuffle_free_order() {
        let config = seeded_config(7);
        let problem = order_matters_problem();

        let baseline = Simulator::new(&config.search, problem.batch_id(), config.base_time)
            .evaluate(problem.initial_yard(), problem.targets());
        assert!(baseline >= Cost::new(1), "baseline order pays a reshuffle");

        let outcome = EvolveEngine::new(&config).solve(&problem);
        assert_eq!(outcome.cost(), Cost::ZERO);
        assert_eq!(outcome.sequence(), &[ContainerId::new(2), ContainerId::new(1)]);
    }

    #[test]
    fn fixed_seeds_reproduce_the_outcome() {
        let config = seeded_config(1234);
        let problem = order_matters_problem();

        let a = EvolveEngine::new(&config).solve(&problem);
        let b = EvolveEngine::new(&config).solve(&problem);
        assert_eq!(a, b);
    }

    #[test]
    fn more_generations_never_lose_ground() {
        // Elitism carries the incumbent, so the best cost after a
        // longer run with the same seed cannot be worse: the shorter
        // run is a prefix of the longer one.
        let problem = order_matters_problem();

        let outcome_at = |generations: usize| {
            let mut config = seeded_config(99);
            config.evolve.generations = generations;
            EvolveEngine::new(&config).solve(&problem)
        };

        assert!(outcome_at(8).cost() <= outcome_at(2).cost());
    }

    #[test]
    fn empty_target_sets_are_a_trivial_outcome() {
        let builder = ProblemBuilder::new(YardLayout::new(1, 1, 1, 1).unwrap());
        let problem = builder.build();

        let config = seeded_config(1);
        let outcome = EvolveEngine::new(&config).solve(&problem);
        assert!(outcome.sequence().is_empty());
        assert_eq!(outcome.cost(), Cost::ZERO);
    }
}
