//! Instruction sampling: enumeration over a fixed wire count, plus the
//! `randomize`/`mutate` operators the optimizer uses to seed and perturb
//! circuits.

use qns_core::instruction::Instruction;
use qns_simulator::Circuit;
use rand::Rng;

/// Samples instructions over a fixed wire count `l`.
///
/// All instruction *instances* over `l` wires are enumerated once at
/// construction (`Id`/`X` over single wires; `cX`/`Swap` over ordered pairs
/// when `l >= 2`; `ccX`/`cSwap` over ordered triples when `l >= 3`). Sampling
/// draws uniformly within a gate kind, but splits total mass evenly *across
/// kinds* first — a 9-wire register has far more `ccX` instances than `Id`
/// instances, and without this equalization the sampler would almost never
/// propose an `Id` or an `X`.
pub struct MutationStrategy {
    l: usize,
    instances: Vec<Instruction>,
    cumulative: Vec<f64>,
}

impl MutationStrategy {
    /// Builds the enumeration and kind-equalized CDF for `l` wires.
    ///
    /// Panics if `l == 0`: every run needs at least one wire.
    pub fn new(l: usize) -> Self {
        assert!(l > 0, "MutationStrategy requires at least one wire");

        let mut groups: Vec<Vec<Instruction>> = Vec::new();

        groups.push((0..l).map(Instruction::id).collect());
        groups.push((0..l).map(Instruction::x).collect());

        if l >= 2 {
            let mut cx = Vec::new();
            for target in 0..l {
                for control in 0..l {
                    if target != control {
                        cx.push(Instruction::cx(target, control));
                    }
                }
            }
            groups.push(cx);
        }

        if l >= 2 {
            let mut swap = Vec::new();
            for a in 0..l {
                for b in 0..l {
                    if a != b {
                        swap.push(Instruction::swap(a, b));
                    }
                }
            }
            groups.push(swap);
        }

        if l >= 3 {
            let mut ccx = Vec::new();
            for target in 0..l {
                for c0 in 0..l {
                    for c1 in 0..l {
                        if target != c0 && target != c1 && c0 != c1 {
                            ccx.push(Instruction::ccx(target, c0, c1));
                        }
                    }
                }
            }
            groups.push(ccx);
        }

        if l >= 3 {
            let mut cswap = Vec::new();
            for a in 0..l {
                for b in 0..l {
                    for control in 0..l {
                        if a != b && a != control && b != control {
                            cswap.push(Instruction::cswap(a, b, control));
                        }
                    }
                }
            }
            groups.push(cswap);
        }

        let num_kinds = groups.len() as f64;
        let mut instances = Vec::new();
        let mut cumulative = Vec::new();
        let mut running = 0.0;
        for group in &groups {
            let mass_per_instance = 1.0 / num_kinds / group.len() as f64;
            for inst in group {
                running += mass_per_instance;
                instances.push(*inst);
                cumulative.push(running);
            }
        }
        if let Some(last) = cumulative.last_mut() {
            *last = 1.0;
        }

        Self { l, instances, cumulative }
    }

    pub fn wires(&self) -> usize {
        self.l
    }

    /// Total number of enumerated instruction instances.
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Draws one instruction from the kind-equalized distribution.
    pub fn sample(&self, rng: &mut impl Rng) -> Instruction {
        let u: f64 = rng.gen_range(0.0..1.0);
        let idx = self.cumulative.partition_point(|&c| c <= u);
        self.instances[idx.min(self.instances.len() - 1)]
    }

    /// Replaces every instruction in `circuit` with an independent sample.
    pub fn randomize(&self, rng: &mut impl Rng, circuit: &mut Circuit) {
        for i in 0..circuit.depth() {
            circuit.set_instruction(i, self.sample(rng));
        }
    }

    /// Replaces the instruction at one randomly chosen position.
    pub fn mutate(&self, rng: &mut impl Rng, circuit: &mut Circuit) {
        if circuit.depth() == 0 {
            return;
        }
        let i = rng.gen_range(0..circuit.depth());
        circuit.set_instruction(i, self.sample(rng));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qns_core::instruction::GateKind;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_enumeration_count_single_wire() {
        let m = MutationStrategy::new(1);
        assert_eq!(m.instance_count(), 2); // Id, X only
    }

    #[test]
    fn test_enumeration_count_two_wires() {
        let m = MutationStrategy::new(2);
        // Id(2) + X(2) + cX(2) + Swap(2), no ccX/cSwap yet.
        assert_eq!(m.instance_count(), 8);
    }

    #[test]
    fn test_enumeration_count_three_wires() {
        let m = MutationStrategy::new(3);
        // Id(3) + X(3) + cX(6) + Swap(6) + ccX(6) + cSwap(6)
        assert_eq!(m.instance_count(), 30);
    }

    #[test]
    fn test_sampling_is_kind_equalized() {
        let m = MutationStrategy::new(5);
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts = [0u32; 6];
        let trials = 60_000;
        for _ in 0..trials {
            let inst = m.sample(&mut rng);
            let idx = match inst.kind {
                GateKind::Id => 0,
                GateKind::X => 1,
                GateKind::CX => 2,
                GateKind::CcX => 3,
                GateKind::Swap => 4,
                GateKind::CSwap => 5,
            };
            counts[idx] += 1;
        }
        let expected = trials as f64 / 6.0;
        for c in counts {
            let ratio = c as f64 / expected;
            assert!((0.85..1.15).contains(&ratio), "kind mass not equalized: counts={counts:?}");
        }
    }

    #[test]
    fn test_mutate_changes_exactly_one_position() {
        let m = MutationStrategy::new(4);
        let mut rng = StdRng::seed_from_u64(7);
        let mut c = Circuit::new(4, 10);
        for i in 0..c.depth() {
            c.set_instruction(i, Instruction::id(i % 4));
        }
        let before = c.clone();
        m.mutate(&mut rng, &mut c);
        let diffs: usize = (0..c.depth())
            .filter(|&i| c.instruction(i) != before.instruction(i))
            .count();
        assert!(diffs <= 1);
    }

    #[test]
    fn test_randomize_preserves_depth_and_wires() {
        let m = MutationStrategy::new(5);
        let mut rng = StdRng::seed_from_u64(3);
        let mut c = Circuit::new(5, 12);
        m.randomize(&mut rng, &mut c);
        assert_eq!(c.depth(), 12);
        for i in 0..c.depth() {
            assert!(c.instruction(i).wires().iter().all(|&w| w < 5));
        }
    }
}
