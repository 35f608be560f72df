//! The circuit: an ordered instruction sequence with batch simulation.

use qns_core::error::{QnsError, Result};
use qns_core::instruction::{GateKind, Instruction};
use qns_core::reg::Reg;
use qns_core::target::TargetFunction;
use std::io::{BufRead, Write};

/// Exhaustive error metrics returned by [`Circuit::errors`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorMetrics {
    /// Fraction of mismatched output bits over the whole truth table.
    pub e: f64,
    /// False-negative rate: truth bit 1, circuit bit 0, over positive bits.
    pub false_negative: f64,
    /// False-positive rate: truth bit 0, circuit bit 1, over negative bits.
    pub false_positive: f64,
}

/// An ordered sequence of reversible gates over `l` wires.
///
/// Constructed at a fixed `l` and depth `d`; individual instructions are
/// mutated in place by index, and depth only grows via [`Circuit::extend`].
#[derive(Debug, Clone, PartialEq)]
pub struct Circuit {
    wires: usize,
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Constructs a circuit of `d` `Id` instructions on `l` wires.
    ///
    /// Panics if `l` doesn't fit a [`qns_core::reg::Reg`] — this is a
    /// programmer error from the driver's own CLI validation, not a
    /// recoverable condition.
    pub fn new(l: usize, d: usize) -> Self {
        assert!(l <= qns_core::reg::REG_WIDTH, "l={l} exceeds the register width");
        let instructions = (0..d).map(|_| Instruction::id(0)).collect();
        Self { wires: l, instructions }
    }

    pub fn depth(&self) -> usize {
        self.instructions.len()
    }

    pub fn wires(&self) -> usize {
        self.wires
    }

    pub fn quantum_cost(&self) -> u64 {
        self.instructions.iter().map(|i| i.quantum_cost() as u64).sum()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn instruction(&self, i: usize) -> Instruction {
        self.instructions[i]
    }

    /// Replaces the instruction at `i` in place.
    pub fn set_instruction(&mut self, i: usize, inst: Instruction) {
        self.instructions[i] = inst;
    }

    /// Applies every instruction, in order, to every register in `regs`, in place.
    pub fn run(&self, regs: &mut [Reg]) {
        for inst in &self.instructions {
            inst.apply_batch(regs);
        }
    }

    /// Projects the top `m` wires of a post-simulation register as output.
    pub fn project(&self, r: Reg, m: usize) -> Reg {
        if m == 0 {
            return 0;
        }
        (r >> (self.wires - m)) & (((1u32 << m) - 1) as Reg)
    }

    /// Appends `n` `Id` instructions, leaving the circuit's behavior unchanged.
    pub fn extend(&mut self, n: usize) {
        self.instructions.extend((0..n).map(|_| Instruction::id(0)));
    }

    /// Exhaustively evaluates this circuit against `f` over every input.
    ///
    /// Input `x` is placed in the low `f.input_size()` bits of an
    /// otherwise-zero register; output is the top-`f.output_size()` wires
    /// after simulation.
    pub fn errors(&self, f: &dyn TargetFunction) -> ErrorMetrics {
        let n = f.input_size();
        let m = f.output_size();
        let total_inputs: u32 = 1 << n;

        let mut regs: Vec<Reg> = (0..total_inputs).map(|x| x as Reg).collect();
        self.run(&mut regs);

        let mut mismatches: u64 = 0;
        let mut false_negatives: u64 = 0;
        let mut false_positives: u64 = 0;
        let mut positive_bits: u64 = 0;
        let mut negative_bits: u64 = 0;

        for (x, &r) in regs.iter().enumerate() {
            let truth = f.eval(x as Reg);
            let out = self.project(r, m);
            for j in 0..m {
                let t = (truth >> j) & 1;
                let o = (out >> j) & 1;
                if t == 1 {
                    positive_bits += 1;
                } else {
                    negative_bits += 1;
                }
                if t != o {
                    mismatches += 1;
                    if t == 0 {
                        false_positives += 1;
                    } else {
                        false_negatives += 1;
                    }
                }
            }
        }

        let denom = m as u64 * total_inputs as u64;
        ErrorMetrics {
            e: ratio(mismatches, denom),
            false_negative: ratio(false_negatives, positive_bits),
            false_positive: ratio(false_positives, negative_bits),
        }
    }

    /// Dead-gate elimination by reverse dataflow: sweeps instructions from
    /// last to first, removing any instruction whose target cannot
    /// influence the top-`m` projected output, and restarting the sweep
    /// after each removal. `O(d^2)` worst case, acceptable since `d` is
    /// small in practice.
    pub fn simplify(&self, output_size: usize) -> Circuit {
        let m = output_size.max(1);
        let mut instructions = self.instructions.clone();

        loop {
            let mut used_bits: Reg = (((1u32 << m) - 1) as Reg) << (self.wires - m);
            let mut dead_at = None;

            for i in (0..instructions.len()).rev() {
                let inst = instructions[i];
                let dead = match inst.kind {
                    GateKind::Id => true,
                    GateKind::X | GateKind::CX | GateKind::CcX => inst.a0 & used_bits == 0,
                    GateKind::Swap | GateKind::CSwap => {
                        inst.a0 & used_bits == 0 && inst.a1 & used_bits == 0
                    }
                };
                if dead {
                    dead_at = Some(i);
                    break;
                }
                match inst.kind {
                    GateKind::CX => used_bits |= inst.a1,
                    GateKind::CcX => used_bits |= inst.a1 | inst.a2,
                    GateKind::Swap => used_bits |= inst.a0 | inst.a1,
                    GateKind::CSwap => used_bits |= inst.a0 | inst.a1 | inst.a2,
                    GateKind::X | GateKind::Id => {}
                }
            }

            match dead_at {
                Some(i) => {
                    instructions.remove(i);
                }
                None => break,
            }
        }

        tracing::debug!(
            before = self.instructions.len(),
            after = instructions.len(),
            "simplified circuit"
        );
        Circuit { wires: self.wires, instructions }
    }

    /// Writes `"<l> <d>\n"` followed by one serialized instruction per line.
    pub fn serialize(&self, out: &mut impl Write) -> std::io::Result<()> {
        writeln!(out, "{} {}", self.wires, self.instructions.len())?;
        for inst in &self.instructions {
            writeln!(out, "{}", inst.serialize())?;
        }
        Ok(())
    }

    /// Inverse of [`Circuit::serialize`].
    pub fn deserialize(input: &mut impl BufRead) -> Result<Circuit> {
        let mut header = String::new();
        input.read_line(&mut header)?;
        let mut parts = header.split_whitespace();
        let l: usize = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| QnsError::MalformedHeader(header.clone()))?;
        let d: usize = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| QnsError::MalformedHeader(header.clone()))?;

        let mut instructions = Vec::with_capacity(d);
        for _ in 0..d {
            let mut line = String::new();
            let bytes = input.read_line(&mut line)?;
            if bytes == 0 {
                return Err(QnsError::TruncatedCircuit(d, instructions.len()));
            }
            instructions.push(Instruction::deserialize(&line)?);
        }

        Ok(Circuit { wires: l, instructions })
    }
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qns_core::target;

    #[test]
    fn test_x_x_is_identity() {
        let mut c = Circuit::new(5, 2);
        c.set_instruction(0, Instruction::x(0));
        c.set_instruction(1, Instruction::x(0));
        for r in 0u16..32 {
            assert_eq!(c.run_one(r), r);
        }
    }

    #[test]
    fn test_errors_exact_match_is_zero() {
        // l = n + m = 5 + 1, wiring the Xor5 parity directly onto the output wire.
        let mut c = Circuit::new(6, 4);
        c.set_instruction(0, Instruction::cx(5, 0));
        c.set_instruction(1, Instruction::cx(5, 1));
        c.set_instruction(2, Instruction::cx(5, 2));
        c.set_instruction(3, Instruction::cx(5, 3));
        // Deliberately omits wire 4's contribution, so this is an approximation, not exact.
        let f = target::by_name("Xor5").unwrap();
        let metrics = c.errors(f);
        assert!(metrics.e > 0.0);
    }

    #[test]
    fn test_swap_projection() {
        let mut c = Circuit::new(3, 1);
        c.set_instruction(0, Instruction::swap(0, 2));
        let mut regs = vec![0b001u16, 0b100, 0b010, 0b111];
        c.run(&mut regs);
        assert_eq!(regs, vec![0b100, 0b001, 0b010, 0b111]);
    }

    #[test]
    fn test_simplify_removes_dead_gates() {
        // l=3, m=1 (top wire = wire 2). X(0), X(1), X(0) never touch wire 2.
        let mut c = Circuit::new(3, 3);
        c.set_instruction(0, Instruction::x(0));
        c.set_instruction(1, Instruction::x(1));
        c.set_instruction(2, Instruction::x(0));

        let simplified = c.simplify(1);
        assert_eq!(simplified.depth(), 0);

        // Projected output (top 1 wire) is unaffected by simplification.
        for r in 0u16..8 {
            assert_eq!(c.project(c.run_one(r), 1), simplified.project(simplified.run_one(r), 1));
        }
    }

    #[test]
    fn test_simplify_preserves_live_gates() {
        let mut c = Circuit::new(3, 2);
        c.set_instruction(0, Instruction::x(0));
        c.set_instruction(1, Instruction::cx(2, 0)); // target is the projected wire
        let simplified = c.simplify(1);
        assert_eq!(simplified.depth(), 2);
    }

    #[test]
    fn test_extend_preserves_behavior() {
        let mut c = Circuit::new(4, 2);
        c.set_instruction(0, Instruction::x(0));
        c.set_instruction(1, Instruction::cx(1, 0));
        let mut extended = c.clone();
        extended.extend(3);
        assert_eq!(extended.depth(), 5);
        for r in 0u16..16 {
            assert_eq!(c.project(c.run_one(r), 2), extended.project(extended.run_one(r), 2));
        }
    }

    #[test]
    fn test_serialize_deserialize_roundtrip() {
        let mut c = Circuit::new(5, 3);
        c.set_instruction(0, Instruction::x(1));
        c.set_instruction(1, Instruction::cx(0, 4));
        c.set_instruction(2, Instruction::ccx(2, 0, 1));

        let mut buf = Vec::new();
        c.serialize(&mut buf).unwrap();
        let mut cursor = std::io::Cursor::new(buf);
        let parsed = Circuit::deserialize(&mut cursor).unwrap();
        assert_eq!(c, parsed);
    }

    #[test]
    fn test_deserialize_truncated() {
        let text = "2 3\nX  0\n";
        let mut cursor = std::io::Cursor::new(text.as_bytes());
        assert!(matches!(Circuit::deserialize(&mut cursor), Err(QnsError::TruncatedCircuit(3, 1))));
    }

    #[test]
    fn test_errors_bounds() {
        let c = Circuit::new(5, 4);
        let f = target::by_name("2of5").unwrap();
        let m = c.errors(f);
        assert!((0.0..=1.0).contains(&m.e));
        assert!((0.0..=1.0).contains(&m.false_negative));
        assert!((0.0..=1.0).contains(&m.false_positive));
    }

    // Test-only convenience: run a circuit on a single register.
    impl Circuit {
        fn run_one(&self, r: Reg) -> Reg {
            let mut regs = [r];
            self.run(&mut regs);
            regs[0]
        }
    }
}
