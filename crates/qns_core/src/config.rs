//! Run configuration for the synthesis driver.
//!
//! This mirrors the target function/circuit/optimizer parameters the CLI
//! accepts, kept as a plain serializable struct so a run can be dumped
//! alongside its output circuit for reproducibility.

use serde::{Deserialize, Serialize};

/// Parameters of one depth-sweep synthesis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Target function name (see `qns_core::target::CATALOG`).
    pub function: String,
    /// Wire count `l`.
    pub num_lines: usize,
    /// First depth in the sweep.
    pub min_num_gates: usize,
    /// Last depth in the sweep (inclusive).
    pub max_num_gates: usize,
    /// Depth increment between sweep steps.
    pub num_gates_increment: usize,
    /// Survivor count `S`.
    pub num_survivors: usize,
    /// Offspring-per-survivor count `F`.
    pub num_offspring: usize,
    /// Evaluation batch size `b`.
    pub batch_size: usize,
    /// Independent replicates run per depth, `N`.
    pub optimizations_per_circuit: usize,
    /// RNG seed; replicate `t` uses `seed + t`.
    pub seed: u64,
}

impl RunConfig {
    /// Serializes this configuration to a pretty JSON string.
    pub fn to_json(&self) -> crate::Result<String> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }

    /// Checks the structural preconditions from the error-handling design:
    /// `S >= 1`, `F >= 2`, `b >= 1`, depths well-formed. Returns a
    /// human-readable message on violation; callers treat this as fatal.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.num_survivors < 1 {
            return Err("--num_survivors must be >= 1".to_string());
        }
        if self.num_offspring < 2 {
            return Err("--num_offspring must be >= 2 (so mutated offspring exist)".to_string());
        }
        if self.batch_size < 1 {
            return Err("--batch_size must be >= 1".to_string());
        }
        if self.num_gates_increment < 1 {
            return Err("--num_gates_increment must be >= 1".to_string());
        }
        if self.max_num_gates < self.min_num_gates {
            return Err("--max_num_gates must be >= --min_num_gates".to_string());
        }
        if self.optimizations_per_circuit < 1 {
            return Err("--optimizations_per_circuit must be >= 1".to_string());
        }
        tracing::debug!(function = %self.function, num_lines = self.num_lines, "run config validated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RunConfig {
        RunConfig {
            function: "2of5".to_string(),
            num_lines: 9,
            min_num_gates: 16,
            max_num_gates: 16,
            num_gates_increment: 4,
            num_survivors: 4,
            num_offspring: 8,
            batch_size: 16,
            optimizations_per_circuit: 1,
            seed: 0,
        }
    }

    #[test]
    fn test_json_roundtrip() {
        let cfg = sample();
        let json = cfg.to_json().unwrap();
        let parsed: RunConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.function, cfg.function);
        assert_eq!(parsed.num_lines, cfg.num_lines);
    }

    #[test]
    fn test_validate_rejects_small_offspring() {
        let mut cfg = sample();
        cfg.num_offspring = 1;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_sample() {
        assert!(sample().validate().is_ok());
    }
}
