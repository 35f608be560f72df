//! Reversible gate instructions over a wire register.
//!
//! An [`Instruction`] is a single reversible gate: a tagged [`GateKind`]
//! plus up to three wire-mask arguments. Storing masks (not indices) keeps
//! [`Instruction::apply`] a handful of bitwise operations with no
//! per-instruction branching beyond the kind dispatch.

use crate::error::{QnsError, Result};
use crate::reg::{mask_wire, wire_mask, Reg};
use std::fmt;

/// A reversible gate kind. Six disjoint cases, each with a fixed arity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateKind {
    /// Identity; `r` unchanged. Arity 1 (the argument is unused but kept
    /// for a uniform instruction layout).
    Id,
    /// Flip the target bit. Arity 1.
    X,
    /// Controlled flip: flip the target iff the control bit is set. Arity 2.
    CX,
    /// Toffoli: flip the target iff both controls are set. Arity 3.
    CcX,
    /// Exchange two bits. Arity 2.
    Swap,
    /// Fredkin: exchange two bits iff the control is set. Arity 3.
    CSwap,
}

impl GateKind {
    /// Number of meaningful wire arguments for this kind.
    pub fn arity(self) -> usize {
        match self {
            GateKind::Id | GateKind::X => 1,
            GateKind::CX | GateKind::Swap => 2,
            GateKind::CcX | GateKind::CSwap => 3,
        }
    }

    /// Quantum cost weight used for tie-breaking between circuits of equal fitness.
    pub fn quantum_cost(self) -> u32 {
        match self {
            GateKind::Id => 0,
            GateKind::X => 1,
            GateKind::CX => 1,
            GateKind::CcX => 5,
            GateKind::Swap => 3,
            GateKind::CSwap => 7,
        }
    }

    /// Textual token used in the serialized form.
    pub fn name(self) -> &'static str {
        match self {
            GateKind::Id => "Id",
            GateKind::X => "X",
            GateKind::CX => "cX",
            GateKind::CcX => "ccX",
            GateKind::Swap => "Swap",
            GateKind::CSwap => "cSwap",
        }
    }

    /// Parses the textual token produced by [`GateKind::name`].
    pub fn from_name(name: &str) -> Option<GateKind> {
        match name {
            "Id" => Some(GateKind::Id),
            "X" => Some(GateKind::X),
            "cX" => Some(GateKind::CX),
            "ccX" => Some(GateKind::CcX),
            "Swap" => Some(GateKind::Swap),
            "cSwap" => Some(GateKind::CSwap),
            _ => None,
        }
    }

    /// All six kinds, in the fixed order enumeration/serialization rely on.
    pub const ALL: [GateKind; 6] = [
        GateKind::Id,
        GateKind::X,
        GateKind::CX,
        GateKind::CcX,
        GateKind::Swap,
        GateKind::CSwap,
    ];
}

/// A single reversible gate instance: `(kind, a0, a1, a2)` where each `a_k`
/// is either a single-bit wire mask or `0` for an unused slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub kind: GateKind,
    pub a0: Reg,
    pub a1: Reg,
    pub a2: Reg,
}

impl Instruction {
    /// Builds an `Id` instruction (the argument is cosmetic: it records
    /// which wire the identity "sits" on for diagram rendering).
    pub fn id(w: usize) -> Self {
        Self { kind: GateKind::Id, a0: wire_mask(w), a1: 0, a2: 0 }
    }

    /// Builds an `X` instruction flipping wire `w`.
    pub fn x(w: usize) -> Self {
        Self { kind: GateKind::X, a0: wire_mask(w), a1: 0, a2: 0 }
    }

    /// Builds a `cX` instruction: flip `target` iff `control` is set.
    /// Panics if `target == control` (wires must be distinct).
    pub fn cx(target: usize, control: usize) -> Self {
        assert_ne!(target, control, "cX target and control must be distinct wires");
        Self { kind: GateKind::CX, a0: wire_mask(target), a1: wire_mask(control), a2: 0 }
    }

    /// Builds a `ccX` (Toffoli) instruction: flip `target` iff both controls are set.
    pub fn ccx(target: usize, c0: usize, c1: usize) -> Self {
        assert!(target != c0 && target != c1 && c0 != c1, "ccX wires must be pairwise distinct");
        Self { kind: GateKind::CcX, a0: wire_mask(target), a1: wire_mask(c0), a2: wire_mask(c1) }
    }

    /// Builds a `Swap` instruction exchanging `a` and `b`.
    pub fn swap(a: usize, b: usize) -> Self {
        assert_ne!(a, b, "Swap wires must be distinct");
        Self { kind: GateKind::Swap, a0: wire_mask(a), a1: wire_mask(b), a2: 0 }
    }

    /// Builds a `cSwap` (Fredkin) instruction: exchange `a` and `b` iff `control` is set.
    pub fn cswap(a: usize, b: usize, control: usize) -> Self {
        assert!(a != b && a != control && b != control, "cSwap wires must be pairwise distinct");
        Self { kind: GateKind::CSwap, a0: wire_mask(a), a1: wire_mask(b), a2: wire_mask(control) }
    }

    /// Applies this instruction to a single register word.
    #[inline]
    pub fn apply(&self, r: Reg) -> Reg {
        match self.kind {
            GateKind::Id => r,
            GateKind::X => r ^ self.a0,
            GateKind::CX => {
                if r & self.a1 != 0 {
                    r ^ self.a0
                } else {
                    r
                }
            }
            GateKind::CcX => {
                if r & self.a2 != 0 {
                    if r & self.a1 != 0 {
                        r ^ self.a0
                    } else {
                        r
                    }
                } else {
                    r
                }
            }
            GateKind::Swap => {
                let bit0 = (r & self.a0 != 0) as Reg;
                let bit1 = (r & self.a1 != 0) as Reg;
                if bit0 == bit1 {
                    r
                } else {
                    r ^ self.a0 ^ self.a1
                }
            }
            GateKind::CSwap => {
                if r & self.a2 != 0 {
                    let bit0 = (r & self.a0 != 0) as Reg;
                    let bit1 = (r & self.a1 != 0) as Reg;
                    if bit0 == bit1 {
                        r
                    } else {
                        r ^ self.a0 ^ self.a1
                    }
                } else {
                    r
                }
            }
        }
    }

    /// Applies this instruction to every register in the batch, in place.
    pub fn apply_batch(&self, regs: &mut [Reg]) {
        for r in regs.iter_mut() {
            *r = self.apply(*r);
        }
    }

    /// Quantum cost of this instruction.
    pub fn quantum_cost(&self) -> u32 {
        self.kind.quantum_cost()
    }

    /// Wire indices used by this instruction, in `a0, a1, a2` order,
    /// truncated to its kind's arity.
    pub fn wires(&self) -> Vec<usize> {
        let masks = [self.a0, self.a1, self.a2];
        masks[..self.kind.arity()].iter().map(|&m| mask_wire(m)).collect()
    }

    /// Serializes this instruction as `"<name> <a0>[ <a1>[ <a2>]]"`, with
    /// wire indices padded to two-character width.
    pub fn serialize(&self) -> String {
        let mut s = self.kind.name().to_string();
        for w in self.wires() {
            s.push(' ');
            s.push_str(&format!("{w:2}"));
        }
        s
    }

    /// Parses the textual form produced by [`Instruction::serialize`].
    pub fn deserialize(line: &str) -> Result<Self> {
        let mut tokens = line.split_whitespace();
        let name = tokens.next().ok_or_else(|| QnsError::MalformedInstruction(line.to_string()))?;
        let kind = GateKind::from_name(name).ok_or_else(|| QnsError::UnknownGate(name.to_string()))?;

        let mut wires = [0usize; 3];
        let mut count = 0;
        for slot in wires.iter_mut().take(kind.arity()) {
            let tok = tokens.next().ok_or_else(|| QnsError::MalformedInstruction(line.to_string()))?;
            *slot = tok
                .trim()
                .parse::<usize>()
                .map_err(|_| QnsError::MalformedInstruction(line.to_string()))?;
            count += 1;
        }
        if tokens.next().is_some() {
            return Err(QnsError::MalformedInstruction(line.to_string()));
        }

        Ok(match (kind, count) {
            (GateKind::Id, 1) => Instruction::id(wires[0]),
            (GateKind::X, 1) => Instruction::x(wires[0]),
            (GateKind::CX, 2) => Instruction::cx(wires[0], wires[1]),
            (GateKind::CcX, 3) => Instruction::ccx(wires[0], wires[1], wires[2]),
            (GateKind::Swap, 2) => Instruction::swap(wires[0], wires[1]),
            (GateKind::CSwap, 3) => Instruction::cswap(wires[0], wires[1], wires[2]),
            _ => return Err(QnsError::MalformedInstruction(line.to_string())),
        })
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.serialize())
    }
}
