//! Progress reporting for long-running fetch operations
//!
//! Callers that want feedback (a CLI spinner, a UI progress bar) pass a
//! callback into [`crate::services::FuzzworkClient::fetch`]. The callback
//! is invoked synchronously at coarse phase boundaries and must be cheap:
//! it is a pure notification sink with no effect on control flow.

/// Phases of an async operation for progress tracking
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgressPhase {
    Starting,
    Fetching,
    Processing,
    Saving,
    Complete,
    Error,
}

/// Structured progress information for async operations
#[derive(Clone, Debug)]
pub struct ProgressUpdate {
    /// Name of the operation being performed
    pub operation: String,
    /// Current phase of the operation
    pub phase: ProgressPhase,
    /// Current progress value (0 for indeterminate phases)
    pub current: u64,
    /// Total expected items (0 if indeterminate)
    pub total: u64,
    /// Human-readable status message
    pub message: String,
    /// Optional additional detail string
    pub detail: Option<String>,
}

/// Progress handler signature accepted by fetch operations
pub type ProgressCallback<'a> = &'a (dyn Fn(ProgressUpdate) + Send + Sync);
