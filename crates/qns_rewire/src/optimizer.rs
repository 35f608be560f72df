//! The `(mu, lambda)` evolutionary search over reversible circuits.

use crate::mutation::MutationStrategy;
use qns_core::reg::Reg;
use qns_core::target::TargetFunction;
use qns_simulator::Circuit;
use rand::seq::SliceRandom;
use rand::Rng;

/// Runs `(mu, lambda)` search for one target function at a fixed wire count
/// and depth.
///
/// The population is `num_survivors * num_offspring` circuits laid out as
/// `num_survivors` contiguous families of size `num_offspring`; each
/// generation, every family picks one survivor and repopulates itself with
/// mutated copies. A pool of inputs the current survivors still get wrong
/// (`fails`) is folded into each family's evaluation batch so the search
/// keeps pressure on the hardest cases instead of drifting on easy ones.
pub struct Optimizer<'a> {
    target: &'a dyn TargetFunction,
    mutation: MutationStrategy,
    num_survivors: usize,
    num_offspring: usize,
    population: Vec<Circuit>,
    fails: Vec<Reg>,
}

impl<'a> Optimizer<'a> {
    /// Builds a population of `num_survivors * num_offspring` circuits over
    /// `l` wires and depth `d`, each independently randomized by the
    /// mutation strategy.
    ///
    /// Randomizing here (rather than at the start of `optimize`) matters:
    /// it lets a caller overwrite the population with `seed_population`
    /// after construction and have that seed actually survive into the
    /// generation loop.
    pub fn new(
        target: &'a dyn TargetFunction,
        l: usize,
        d: usize,
        num_survivors: usize,
        num_offspring: usize,
        rng: &mut impl Rng,
    ) -> Self {
        assert!(num_survivors >= 1, "need at least one survivor family");
        assert!(num_offspring >= 2, "a family of one can't produce mutated offspring");
        let mutation = MutationStrategy::new(l);
        let mut population: Vec<Circuit> =
            (0..num_survivors * num_offspring).map(|_| Circuit::new(l, d)).collect();
        for c in population.iter_mut() {
            mutation.randomize(rng, c);
        }
        Self {
            target,
            mutation,
            num_survivors,
            num_offspring,
            population,
            fails: Vec::new(),
        }
    }

    pub fn population(&self) -> &[Circuit] {
        &self.population
    }

    /// Overwrites every population member with `seed` (used to carry a
    /// circuit found at a shallower depth into the next depth's search).
    pub fn seed_population(&mut self, seed: &Circuit) {
        for c in self.population.iter_mut() {
            *c = seed.clone();
        }
    }

    /// Runs `generations` rounds of family selection and mutation.
    ///
    /// `ds` (0 to 1) is the dilution of the hard-input pool in each
    /// generation's evaluation batch: a family's batch draws up to
    /// `(1 - ds) * b` inputs from the current `fails` pool (without
    /// replacement) and fills the rest with fresh random inputs.
    pub fn optimize(&mut self, rng: &mut impl Rng, generations: usize, ds: f64, b: usize) {
        let n = self.target.input_size();
        let m = self.target.output_size();
        let input_space: u32 = 1 << n;

        for _ in 0..generations {
            let mut next_fails: Vec<Reg> = Vec::new();

            for family in 0..self.num_survivors {
                let start = family * self.num_offspring;
                let end = start + self.num_offspring;

                let hard_count = (((1.0 - ds) * b as f64).floor() as usize).min(self.fails.len());
                let fresh_count = b.saturating_sub(hard_count);

                let mut batch = sample_without_replacement(&self.fails, hard_count, rng);
                batch.extend((0..fresh_count).map(|_| rng.gen_range(0..input_space) as Reg));

                let mut best_idx = start;
                let mut best_fitness = f64::NEG_INFINITY;
                let mut best_cost = u64::MAX;

                for idx in start..end {
                    let fitness = batch_fitness_and_fails(
                        &self.population[idx],
                        self.target,
                        &batch,
                        m,
                        &mut next_fails,
                    );
                    if fitness > best_fitness {
                        best_fitness = fitness;
                        best_cost = self.population[idx].simplify(m).quantum_cost();
                        best_idx = idx;
                    } else if fitness == best_fitness {
                        let cost = self.population[idx].simplify(m).quantum_cost();
                        if cost < best_cost {
                            best_cost = cost;
                            best_idx = idx;
                        }
                    }
                }

                let survivor = self.population[best_idx].clone();

                self.population[start] = survivor.clone();
                for idx in (start + 1)..end {
                    let mut offspring = survivor.clone();
                    self.mutation.mutate(rng, &mut offspring);
                    self.population[idx] = offspring;
                }
            }

            self.fails = next_fails;
            self.population.shuffle(rng);
        }
    }

    /// Picks the population member with the lowest exhaustive error rate,
    /// tie-broken by simplified quantum cost.
    pub fn compute_best(&self) -> Circuit {
        let m = self.target.output_size();
        let mut best_idx = 0;
        let mut best_e = f64::INFINITY;
        let mut best_cost = u64::MAX;

        for (idx, c) in self.population.iter().enumerate() {
            let e = c.errors(self.target).e;
            if e < best_e {
                best_e = e;
                best_cost = c.simplify(m).quantum_cost();
                best_idx = idx;
            } else if e == best_e {
                let cost = c.simplify(m).quantum_cost();
                if cost < best_cost {
                    best_cost = cost;
                    best_idx = idx;
                }
            }
        }

        self.population[best_idx].clone()
    }
}

/// Scores one circuit against `batch` and records every mismatched output
/// bit into `fails` — the same input can be pushed up to `m` times if it
/// misses on more than one output bit, matching the spec's no-dedup
/// fails-pool semantics. Runs for every circuit in a family, not just the
/// eventual survivor, since the pool is meant to reflect everything the
/// whole family got wrong this generation.
fn batch_fitness_and_fails(
    circuit: &Circuit,
    target: &dyn TargetFunction,
    batch: &[Reg],
    m: usize,
    fails: &mut Vec<Reg>,
) -> f64 {
    if batch.is_empty() {
        return 0.0;
    }
    let mut matching_bits: u64 = 0;
    for &x in batch {
        let mut regs = [x];
        circuit.run(&mut regs);
        let out = circuit.project(regs[0], m);
        let truth = target.eval(x);
        for j in 0..m {
            if (out >> j) & 1 == (truth >> j) & 1 {
                matching_bits += 1;
            } else {
                fails.push(x);
            }
        }
    }
    matching_bits as f64 / (batch.len() as u64 * m as u64) as f64
}

/// Picks up to `k` elements from `pool` without replacement via partial
/// Fisher-Yates: swap each chosen element to the front of a shrinking
/// window instead of shuffling the whole pool.
fn sample_without_replacement(pool: &[Reg], k: usize, rng: &mut impl Rng) -> Vec<Reg> {
    if k == 0 || pool.is_empty() {
        return Vec::new();
    }
    let mut scratch = pool.to_vec();
    let k = k.min(scratch.len());
    let len = scratch.len();
    for i in 0..k {
        let j = rng.gen_range(i..len);
        scratch.swap(i, j);
    }
    scratch.truncate(k);
    scratch
}

#[cfg(test)]
mod tests {
    use super::*;
    use qns_core::target;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_sample_without_replacement_is_distinct_indices() {
        let pool: Vec<Reg> = (0..20).collect();
        let mut rng = StdRng::seed_from_u64(1);
        let sample = sample_without_replacement(&pool, 5, &mut rng);
        assert_eq!(sample.len(), 5);
    }

    #[test]
    fn test_sample_caps_at_pool_size() {
        let pool: Vec<Reg> = vec![1, 2, 3];
        let mut rng = StdRng::seed_from_u64(2);
        let sample = sample_without_replacement(&pool, 10, &mut rng);
        assert_eq!(sample.len(), 3);
    }

    #[test]
    fn test_optimize_improves_fitness_on_trivial_target() {
        let f = target::by_name("Id").unwrap();
        let mut rng = StdRng::seed_from_u64(123);
        let mut opt = Optimizer::new(f, 2, 4, 2, 4, &mut rng);
        opt.optimize(&mut rng, 40, 0.5, 8);
        let best = opt.compute_best();
        let metrics = best.errors(f);
        assert!(metrics.e <= 1.0);
    }

    #[test]
    fn test_seed_population_overwrites_every_member() {
        let f = target::by_name("2of5").unwrap();
        let opt_target_wires = 6;
        let mut rng = StdRng::seed_from_u64(7);
        let mut opt = Optimizer::new(f, opt_target_wires, 3, 2, 3, &mut rng);
        let mut seed = Circuit::new(opt_target_wires, 3);
        seed.set_instruction(0, qns_core::instruction::Instruction::x(0));
        opt.seed_population(&seed);
        for c in opt.population() {
            assert_eq!(*c, seed);
        }
    }

    #[test]
    fn test_compute_best_picks_lowest_error() {
        let f = target::by_name("Id").unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let mut opt = Optimizer::new(f, 2, 2, 1, 2, &mut rng);
        // Force one member to be exact: wire 1 carries the input bit (low bit of a 2-wire register).
        let mut exact = Circuit::new(2, 2);
        exact.set_instruction(0, qns_core::instruction::Instruction::cx(1, 0));
        opt.seed_population(&exact);
        let best = opt.compute_best();
        assert_eq!(best.errors(f).e, 0.0);
    }
}
