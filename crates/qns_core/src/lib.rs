//! # QNS Core
//!
//! Core types for QNS reversible-circuit synthesis.
//!
//! This crate provides:
//! - [`Reg`]: the bit-packed wire register simulating one circuit state.
//! - [`GateKind`] / [`Instruction`]: the six reversible gate kinds and a
//!   single addressable instance of one, with `apply`/`apply_batch` and
//!   text serialization.
//! - [`TargetFunction`]: the `{input_size, output_size, eval}` capability
//!   the optimizer searches against, plus the built-in [`target::CATALOG`].
//! - [`QnsError`]: unified error type for the boundary (file/CLI) failures.
//! - [`RunConfig`]: the driver's run parameters, serializable for reproducibility.
//!
//! ## Example
//!
//! ```rust
//! use qns_core::prelude::*;
//!
//! let cx = Instruction::cx(0, 1);
//! assert_eq!(cx.apply(0b10), 0b11);
//! assert_eq!(cx.quantum_cost(), 1);
//! ```

pub mod config;
pub mod error;
pub mod instruction;
pub mod prelude;
pub mod reg;
pub mod target;

pub use config::RunConfig;
pub use error::{QnsError, Result};
pub use instruction::{GateKind, Instruction};
pub use reg::{wire_mask, Reg, REG_WIDTH};
pub use target::{Function, TargetFunction};
