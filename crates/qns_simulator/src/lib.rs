//! # QNS Simulator
//!
//! Bit-packed batch simulator for reversible circuits.
//!
//! ## Modules
//! - [`circuit`]: [`Circuit`], the ordered instruction sequence with batch
//!   simulation, exhaustive error metrics, dead-gate simplification, and
//!   the text serialization format.

pub mod circuit;

pub use circuit::{Circuit, ErrorMetrics};
