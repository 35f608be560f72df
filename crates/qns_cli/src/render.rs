//! Box-drawing diagram renderer for a [`Circuit`].
//!
//! Wire-by-wire, top to bottom. Each instruction occupies a column whose
//! width depends on its kind (`Id` is the widest, since it draws as a bare
//! wire with no glyph to anchor a narrower column against); wires the
//! instruction doesn't touch just continue as a dash, and wires strictly
//! between the lowest and highest wire it touches get a connector.

use qns_core::instruction::{GateKind, Instruction};
use qns_core::reg::mask_wire;
use qns_simulator::Circuit;

#[derive(Clone, Copy)]
enum Role {
    Target,
    Control,
    SwapEnd,
}

fn column_width(kind: GateKind) -> usize {
    match kind {
        GateKind::Id => 6,
        GateKind::X | GateKind::CX | GateKind::CcX => 5,
        GateKind::Swap | GateKind::CSwap => 3,
    }
}

fn roles(inst: &Instruction) -> Vec<(usize, Role)> {
    match inst.kind {
        GateKind::Id => Vec::new(),
        GateKind::X => vec![(mask_wire(inst.a0), Role::Target)],
        GateKind::CX => {
            vec![(mask_wire(inst.a0), Role::Target), (mask_wire(inst.a1), Role::Control)]
        }
        GateKind::CcX => vec![
            (mask_wire(inst.a0), Role::Target),
            (mask_wire(inst.a1), Role::Control),
            (mask_wire(inst.a2), Role::Control),
        ],
        GateKind::Swap => {
            vec![(mask_wire(inst.a0), Role::SwapEnd), (mask_wire(inst.a1), Role::SwapEnd)]
        }
        GateKind::CSwap => vec![
            (mask_wire(inst.a0), Role::SwapEnd),
            (mask_wire(inst.a1), Role::SwapEnd),
            (mask_wire(inst.a2), Role::Control),
        ],
    }
}

fn center(glyph: &str, width: usize) -> String {
    let dashes = width.saturating_sub(glyph.chars().count());
    let left = dashes / 2;
    let right = dashes - left;
    format!("{}{}{}", "─".repeat(left), glyph, "─".repeat(right))
}

/// Renders a full-width diagram: one text row per wire.
pub fn diagram(circuit: &Circuit) -> String {
    let wires = circuit.wires();
    let mut rows: Vec<String> = (0..wires).map(|w| format!("w{w:<2}")).collect();

    for col in 0..circuit.depth() {
        let inst = circuit.instruction(col);
        let width = column_width(inst.kind);
        let marks = roles(&inst);

        if marks.is_empty() {
            for row in rows.iter_mut() {
                row.push_str(&"─".repeat(width));
            }
            continue;
        }

        let lo = marks.iter().map(|&(w, _)| w).min().unwrap();
        let hi = marks.iter().map(|&(w, _)| w).max().unwrap();

        for w in 0..wires {
            let cell = match marks.iter().find(|&&(mw, _)| mw == w) {
                Some(&(_, Role::Target)) => center("⊣X⊢", width),
                Some(&(_, Role::Control)) => center("o", width),
                Some(&(_, Role::SwapEnd)) => center("╳", width),
                None if w > lo && w < hi => center("│", width),
                None => "─".repeat(width),
            };
            rows[w].push_str(&cell);
        }
    }

    rows.join("\n")
}
