//! Error taxonomy
//!
//! Every failure in this workspace is non-fatal: the worst case is a missing
//! visual effect, never a crashed host. Missing target elements and
//! zero-height documents are therefore *not* errors: the sampler no-ops and
//! the progress derivation yields 0. What remains is the small set of
//! boundary failures a host may want to report.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The content API never delivered data; the readiness gate stays closed
    /// and scroll-linked effects remain dormant.
    #[error("content unavailable: {reason}")]
    ContentUnavailable { reason: String },

    /// A lead-capture backend rejected a submission as a duplicate (HTTP
    /// 409). Surfaced to the user by the host; never retried automatically.
    #[error("duplicate submission")]
    DuplicateSubmission,

    /// Configuration failed to parse; callers fall back to defaults.
    #[error("invalid configuration: {reason}")]
    Config { reason: String },
}

/// Workspace-wide result alias
pub type Result<T> = std::result::Result<T, Error>;
