//! Engine error types
//!
//! Runtime failures inside the engine (missing anchors, stale callbacks) are
//! absorbed silently. Only caller-facing requests that can be refused carry
//! an error.

use thiserror::Error;

use crate::catalog::ProjectId;
use crate::modal::ModalState;

/// Why an open-request was ignored
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OpenRejected {
    /// No project with this id in the catalog
    #[error("unknown project: {0}")]
    UnknownProject(ProjectId),

    /// The same project is already open or opening
    #[error("project {0} is already open")]
    AlreadyOpen(ProjectId),

    /// Another session is still alive
    #[error("a modal session for {project} is active ({state:?})")]
    SessionActive { project: ProjectId, state: ModalState },
}

/// Invalid tunables
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a positive finite number, got {value}")]
    NonPositive { name: &'static str, value: f32 },

    #[error("restore_delay_ms must be at most {max}, got {value}")]
    RestoreDelayTooLong { value: u64, max: u64 },
}

/// Result type for configuration
pub type Result<T> = std::result::Result<T, ConfigError>;
