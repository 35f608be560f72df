//! Prelude module for convenient imports.
//!
//! # Usage
//!
//! ```rust
//! use qns_core::prelude::*;
//! ```

pub use crate::config::RunConfig;
pub use crate::error::{QnsError, Result};
pub use crate::instruction::{GateKind, Instruction};
pub use crate::reg::{wire_mask, Reg, REG_WIDTH};
pub use crate::target::{self, Function, TargetFunction};
