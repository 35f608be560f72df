//! # QNS Rewire
//!
//! Mutation strategy and evolutionary optimizer for reversible-circuit synthesis.
//!
//! ## Modules
//! - [`mutation`]: [`mutation::MutationStrategy`], the instruction enumeration
//!   and kind-equalized sampler backing `randomize`/`mutate`.
//! - [`optimizer`]: [`optimizer::Optimizer`], the `(mu, lambda)` search loop
//!   with its persistent hard-input pool.

pub mod mutation;
pub mod optimizer;

pub use mutation::MutationStrategy;
pub use optimizer::Optimizer;
