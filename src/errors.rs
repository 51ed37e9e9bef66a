use thiserror::Error;

use crate::entity::action::Action;
use crate::entity::stage::StageActions;

/// Why a drive was rejected by the partition table check
#[derive(Debug, Error)]
pub enum TableCause {
    #[error("partition table is {0:?}, only gpt is supported")]
    NotGpt(String),

    #[error("no partition table found")]
    NoTable,

    #[error("blkid failed: {0}")]
    Query(String),
}

#[derive(Debug, Error)]
pub enum OctError {
    #[error("file error: {1}")]
    FileError(std::io::Error, String),

    #[error("bad manifest: {0}")]
    BadManifest(String),

    #[error("bad cli arguments: {0}")]
    BadArgs(String),

    #[error("command failed: {context}")]
    CmdFailed {
        error: Option<std::io::Error>,
        context: String,
    },

    #[error("validation error: {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("incompatible partition table on {device}: {cause}")]
    IncompatibleTable { device: String, cause: TableCause },

    #[error("partitioning {device} failed: {context}: {stderr}")]
    Partitioning {
        device: String,
        context: String,
        stderr: String,
    },

    /// sfdisk reported existing partitions differently after partitioning
    #[error("partition table of {device} changed unexpectedly: {reason}")]
    SnapshotMismatch { device: String, reason: String },

    #[error("requested {requested} partitions, but {created} were created")]
    CountMismatch { requested: usize, created: usize },

    #[error("failed to format {node}: {stderr}")]
    Format { node: String, stderr: String },

    #[error("failed to mount {node} on {target}: {stderr}")]
    Mount {
        node: String,
        target: String,
        stderr: String,
    },

    #[error("arch-chroot failed: {stderr}")]
    ChrootFailed { command: String, stderr: String },

    #[error("october-rs bug: {0}")]
    OctoberBug(String),

    #[error("error applying action {action_failed:?}: {error}")]
    ApplyError {
        error: Box<OctError>,
        action_failed: Box<Action>,
        actions_performed: Vec<Action>,
    },

    #[error("installation error: {error}")]
    InstallError {
        error: Box<OctError>,
        stages_performed: Box<StageActions>,
    },
}

impl OctError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Returns the innermost error, skipping the apply/install wrappers
    pub fn root_cause(&self) -> &OctError {
        match self {
            Self::ApplyError { error, .. } | Self::InstallError { error, .. } => {
                error.root_cause()
            }
            _ => self,
        }
    }

    /// Prefixes the field of a validation error, e.g. `size` -> `partitions[1].size`
    pub(crate) fn in_field(self, prefix: &str) -> Self {
        match self {
            Self::Validation { field, reason } => Self::Validation {
                field: format!("{prefix}.{field}"),
                reason,
            },
            err => err,
        }
    }
}
