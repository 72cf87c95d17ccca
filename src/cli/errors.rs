//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero exit code.

use std::fmt;
use std::io;

use crate::config::ConfigError;
use crate::hierarchy::HierarchyError;
use crate::validator::ClaimError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    ConfigError,
    /// I/O error (files, stdout)
    IoError,
    /// Hierarchy document could not be applied
    HierarchyError,
    /// A claims line is not a usable claim
    InvalidClaim,
    /// `check` rejected at least one claim
    ClaimsRejected,
    /// `audit` found at least one unhealthy run
    UnhealthyRuns,
    /// The engine failed internally (poisoned lock)
    EngineError,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "PROOF_CLI_CONFIG_ERROR",
            Self::IoError => "PROOF_CLI_IO_ERROR",
            Self::HierarchyError => "PROOF_CLI_HIERARCHY_ERROR",
            Self::InvalidClaim => "PROOF_CLI_INVALID_CLAIM",
            Self::ClaimsRejected => "PROOF_CLI_CLAIMS_REJECTED",
            Self::UnhealthyRuns => "PROOF_CLI_UNHEALTHY_RUNS",
            Self::EngineError => "PROOF_CLI_ENGINE_ERROR",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn invalid_claim(line: usize, msg: impl fmt::Display) -> Self {
        Self::new(CliErrorCode::InvalidClaim, format!("line {}: {}", line, msg))
    }

    pub fn claims_rejected(count: usize) -> Self {
        Self::new(
            CliErrorCode::ClaimsRejected,
            format!("{} claim(s) rejected", count),
        )
    }

    pub fn unhealthy_runs(count: usize) -> Self {
        Self::new(
            CliErrorCode::UnhealthyRuns,
            format!("{} run(s) with orphaned claims", count),
        )
    }

    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(CliErrorCode::ConfigError, e.to_string())
    }
}

impl From<HierarchyError> for CliError {
    fn from(e: HierarchyError) -> Self {
        Self::new(CliErrorCode::HierarchyError, e.to_string())
    }
}

impl From<ClaimError> for CliError {
    fn from(e: ClaimError) -> Self {
        let code = match e {
            ClaimError::Internal(_) => CliErrorCode::EngineError,
            ClaimError::Schema(_) | ClaimError::Hierarchy(_) => CliErrorCode::InvalidClaim,
        };
        Self::new(code, e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
