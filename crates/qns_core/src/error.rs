//! Error types for QNS.

use thiserror::Error;

/// Unified error type for QNS operations.
///
/// Only boundary failures (malformed files, bad CLI input) are represented
/// here. Internal invariant violations (out-of-range wires, `l` wider than
/// the register, `F < 2`, ...) are programmer errors and panic instead of
/// returning an error; see the preconditions in the top-level design notes.
#[derive(Error, Debug)]
pub enum QnsError {
    /// Unknown gate name encountered while deserializing an instruction line.
    #[error("unknown gate name '{0}'")]
    UnknownGate(String),

    /// An instruction line did not have the expected token count for its gate kind.
    #[error("malformed instruction line: '{0}'")]
    MalformedInstruction(String),

    /// The circuit header line (`<l> <d>`) could not be parsed.
    #[error("malformed circuit header: '{0}'")]
    MalformedHeader(String),

    /// Fewer instruction lines were present than the header's declared depth.
    #[error("truncated circuit: expected {0} instructions, found {1}")]
    TruncatedCircuit(usize, usize),

    /// Unknown target function name passed via `--function`.
    #[error("unknown target function '{0}'")]
    UnknownFunction(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error (used for the run-config dump).
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for QNS operations.
pub type Result<T> = std::result::Result<T, QnsError>;
