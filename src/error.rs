use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UubuError {
    #[error("Message catalog error: {0}")]
    Catalog(String),

    #[error("Command `{command}` failed: {reason}")]
    Command {
        command: String,
        reason: String,
        output: String,
    },

    #[error("Network check failed: {0}")]
    Network(String),

    #[error("Running as root is not allowed")]
    PrivilegedUser,

    #[error("Run aborted at step '{step}'")]
    Aborted {
        step: StepId,
        #[source]
        source: Box<StepFailure>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, UubuError>;

/// Pipeline stage a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepId {
    Privilege,
    Network,
    Snapshot,
    PackageUpdate,
    Snap,
    Flatpak,
    RebootCheck,
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StepId::Privilege => "privilege",
            StepId::Network => "network",
            StepId::Snapshot => "snapshot",
            StepId::PackageUpdate => "package-update",
            StepId::Snap => "snap",
            StepId::Flatpak => "flatpak",
            StepId::RebootCheck => "reboot-check",
        };
        f.write_str(label)
    }
}

/// How the orchestrator reacts to a failed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Abort the run with a non-zero exit.
    Fatal,
    /// Report a warning and move on.
    Advisory,
    /// Expected condition, nothing to report beyond the step's own output.
    Informational,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Fatal => "fatal",
            Severity::Advisory => "advisory",
            Severity::Informational => "informational",
        };
        f.write_str(label)
    }
}

/// Structured result of a failed step; rendered to text by the orchestrator.
#[derive(Error, Debug)]
#[error("{step} step failed ({severity})")]
pub struct StepFailure {
    pub step: StepId,
    pub severity: Severity,
    #[source]
    pub cause: Option<UubuError>,
}

impl StepFailure {
    pub fn fatal(step: StepId, cause: UubuError) -> Self {
        Self {
            step,
            severity: Severity::Fatal,
            cause: Some(cause),
        }
    }

    pub fn advisory(step: StepId, cause: UubuError) -> Self {
        Self {
            step,
            severity: Severity::Advisory,
            cause: Some(cause),
        }
    }

    /// Optional tool not installed; the step already told the user.
    pub fn skipped(step: StepId) -> Self {
        Self {
            step,
            severity: Severity::Informational,
            cause: None,
        }
    }

    /// Text of the underlying cause, or an empty string.
    pub fn cause_text(&self) -> String {
        self.cause
            .as_ref()
            .map(|cause| cause.to_string())
            .unwrap_or_default()
    }
}

pub type StepOutcome = std::result::Result<(), StepFailure>;
