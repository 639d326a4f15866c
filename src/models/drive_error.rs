//! This module provides the error type returned by drive name parsing and
//! drive queries.
//!
//! `DriveError` separates failures the caller can act on differently: a
//! malformed drive name, a letter with no drive behind it, a drive that
//! exists but could not be read, and a label write that was refused.

use thiserror::Error;

use crate::HostError;

/// Represents a failed drive name parse or drive query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriveError {
    /// No drive name was supplied at all.
    #[error("drive name must not be null")]
    NullArgument,

    /// The supplied string is not a drive letter in any accepted form.
    #[error("invalid drive name {input:?}: expected a drive letter such as \"C\", \"C:\" or \"C:\\\"")]
    InvalidFormat { input: String },

    /// The letter is well formed but the host does not report a drive for it.
    #[error("could not find drive {root}: the drive does not exist")]
    DriveNotFound { root: String },

    /// The drive exists but the host query for it failed.
    #[error("I/O failure on drive {root}: {source}")]
    Io {
        root: String,
        #[source]
        source: HostError,
    },

    /// The host refused to change the volume label.
    #[error("access to drive {root} is denied")]
    PermissionDenied { root: String },

    /// The host rejected the text of a new volume label.
    #[error("invalid volume label {label:?}")]
    InvalidLabel { label: String },

    /// The set of present drives could not be read.
    #[error("failed to enumerate logical drives: {0}")]
    Enumeration(#[source] HostError),

    /// A WMI query failed.
    #[error("WMI query failed: {0}")]
    Wmi(String),
}

impl DriveError {
    /// Returns the canonical root the error refers to, if any.
    pub fn root(&self) -> Option<&str> {
        match self {
            DriveError::DriveNotFound { root }
            | DriveError::Io { root, .. }
            | DriveError::PermissionDenied { root } => Some(root),
            _ => None,
        }
    }
}

/// Automatic conversion from `WMIError` to `DriveError`.
#[cfg(windows)]
impl From<wmi::WMIError> for DriveError {
    fn from(value: wmi::WMIError) -> Self {
        DriveError::Wmi(value.to_string())
    }
}
