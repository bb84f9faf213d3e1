//! Freshness Policy
//!
//! Pure decision logic over "now" and the stored cache metadata. No I/O
//! happens here; the orchestrator performs whatever action is decided.
//!
//! Two fixed windows gate remote traffic:
//! - the 31-minute ETag wait window after the recorded `Last-Modified`
//!   (or `last_updated` fallback) anchor, matching the roughly hourly
//!   upstream regeneration cadence;
//! - the 5-minute throttle between probe attempts, counted from
//!   `last_checked` regardless of the probe's outcome.

use chrono::{DateTime, Duration, Utc};

use crate::constants::{ETAG_WAIT_MINUTES, MIN_FETCH_INTERVAL_SECONDS};
use crate::models::CacheMetadata;

/// Next action for a fetch call, decided before any network traffic
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchAction {
    /// Download the full payload unconditionally
    FullDownload,
    /// Return the locally cached CSV without touching the network
    UseCached,
    /// Perform a conditional HEAD probe for the remote ETag
    ProbeEtag,
}

/// Resolution of a completed (successful) ETag probe
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProbeResolution {
    /// No cached ETag to compare, or the remote value differs: refetch
    Download,
    /// Remote matches the cached value, or sent no ETag at all
    UseCached,
}

/// Decide the next action for a fetch call.
///
/// Evaluated strictly in order: force/cold-start, fresh window, caller
/// opt-out, probe throttle. Both window comparisons are non-strict, so a
/// timestamp landing exactly on the boundary still counts as fresh.
pub fn decide(
    now: DateTime<Utc>,
    metadata: Option<&CacheMetadata>,
    has_local_csv: bool,
    force: bool,
    check_etag: bool,
) -> FetchAction {
    if force || !has_local_csv {
        return FetchAction::FullDownload;
    }

    // Anchor on last_modified, falling back to last_updated, falling back
    // to "now". The final fallback makes the fresh-window test pass on
    // this call when metadata carries no usable anchor at all; preserved
    // from the original client behavior.
    let anchor = metadata
        .and_then(|m| m.last_modified_time())
        .or_else(|| metadata.and_then(|m| m.last_updated_time()))
        .unwrap_or(now);

    if now <= anchor + Duration::minutes(ETAG_WAIT_MINUTES) {
        return FetchAction::UseCached;
    }

    if !check_etag {
        return FetchAction::UseCached;
    }

    // Missing or unparsable last_checked is permissive: probe allowed.
    if let Some(last_checked) = metadata.and_then(|m| m.last_checked_time()) {
        if now <= last_checked + Duration::seconds(MIN_FETCH_INTERVAL_SECONDS) {
            return FetchAction::UseCached;
        }
    }

    FetchAction::ProbeEtag
}

/// Resolve the outcome of a successful HEAD probe.
///
/// A missing cached ETag means first-download or cleared-cache: nothing
/// to compare against, so trust nothing and refetch. A missing remote
/// ETag cannot disprove freshness, so the cached copy stands.
pub fn resolve_probe(remote_etag: Option<&str>, cached_etag: Option<&str>) -> ProbeResolution {
    match (remote_etag, cached_etag) {
        (_, None) => ProbeResolution::Download,
        (Some(remote), Some(cached)) if remote != cached => ProbeResolution::Download,
        _ => ProbeResolution::UseCached,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata_with(
        last_modified: Option<DateTime<Utc>>,
        last_updated: Option<DateTime<Utc>>,
        last_checked: Option<DateTime<Utc>>,
    ) -> CacheMetadata {
        CacheMetadata {
            etag: Some("\"abc\"".to_string()),
            last_modified: last_modified.map(|t| t.to_rfc3339()),
            last_updated: last_updated.map(|t| t.to_rfc3339()),
            last_checked: last_checked.map(|t| t.to_rfc3339()),
            ..Default::default()
        }
    }

    #[test]
    fn test_force_always_downloads() {
        let now = Utc::now();
        let meta = metadata_with(Some(now), Some(now), Some(now));
        assert_eq!(
            decide(now, Some(&meta), true, true, true),
            FetchAction::FullDownload
        );
    }

    #[test]
    fn test_missing_local_csv_downloads_without_probe() {
        let now = Utc::now();
        assert_eq!(
            decide(now, None, false, false, true),
            FetchAction::FullDownload
        );
    }

    #[test]
    fn test_fresh_window_uses_cache() {
        let now = Utc::now();
        let meta = metadata_with(Some(now - Duration::minutes(10)), None, None);
        assert_eq!(
            decide(now, Some(&meta), true, false, true),
            FetchAction::UseCached
        );
    }

    #[test]
    fn test_fresh_window_boundary_is_inclusive() {
        let now = Utc::now();
        let meta = metadata_with(Some(now - Duration::minutes(ETAG_WAIT_MINUTES)), None, None);
        assert_eq!(
            decide(now, Some(&meta), true, false, true),
            FetchAction::UseCached
        );

        let meta = metadata_with(
            Some(now - Duration::minutes(ETAG_WAIT_MINUTES) - Duration::seconds(1)),
            None,
            None,
        );
        assert_eq!(
            decide(now, Some(&meta), true, false, true),
            FetchAction::ProbeEtag
        );
    }

    #[test]
    fn test_stale_without_check_etag_uses_cache() {
        let now = Utc::now();
        let meta = metadata_with(Some(now - Duration::minutes(40)), None, None);
        assert_eq!(
            decide(now, Some(&meta), true, false, false),
            FetchAction::UseCached
        );
    }

    #[test]
    fn test_recent_probe_is_throttled() {
        let now = Utc::now();
        let meta = metadata_with(
            Some(now - Duration::minutes(40)),
            None,
            Some(now - Duration::minutes(1)),
        );
        assert_eq!(
            decide(now, Some(&meta), true, false, true),
            FetchAction::UseCached
        );
    }

    #[test]
    fn test_throttle_boundary_is_inclusive() {
        let now = Utc::now();
        let meta = metadata_with(
            Some(now - Duration::minutes(40)),
            None,
            Some(now - Duration::seconds(MIN_FETCH_INTERVAL_SECONDS)),
        );
        assert_eq!(
            decide(now, Some(&meta), true, false, true),
            FetchAction::UseCached
        );

        let meta = metadata_with(
            Some(now - Duration::minutes(40)),
            None,
            Some(now - Duration::seconds(MIN_FETCH_INTERVAL_SECONDS + 1)),
        );
        assert_eq!(
            decide(now, Some(&meta), true, false, true),
            FetchAction::ProbeEtag
        );
    }

    #[test]
    fn test_stale_anchor_and_old_probe_triggers_probe() {
        let now = Utc::now();
        let meta = metadata_with(
            Some(now - Duration::minutes(40)),
            None,
            Some(now - Duration::minutes(10)),
        );
        assert_eq!(
            decide(now, Some(&meta), true, false, true),
            FetchAction::ProbeEtag
        );
    }

    #[test]
    fn test_missing_last_checked_is_permissive() {
        let now = Utc::now();
        let meta = metadata_with(Some(now - Duration::minutes(40)), None, None);
        assert_eq!(
            decide(now, Some(&meta), true, false, true),
            FetchAction::ProbeEtag
        );
    }

    #[test]
    fn test_corrupt_last_checked_is_permissive() {
        let now = Utc::now();
        let mut meta = metadata_with(Some(now - Duration::minutes(40)), None, None);
        meta.last_checked = Some("not a timestamp".to_string());
        assert_eq!(
            decide(now, Some(&meta), true, false, true),
            FetchAction::ProbeEtag
        );
    }

    #[test]
    fn test_unparsable_last_modified_falls_back_to_last_updated() {
        let now = Utc::now();
        let mut meta = metadata_with(None, Some(now - Duration::minutes(5)), None);
        meta.last_modified = Some("garbage".to_string());
        assert_eq!(
            decide(now, Some(&meta), true, false, true),
            FetchAction::UseCached
        );

        let mut meta = metadata_with(None, Some(now - Duration::minutes(45)), None);
        meta.last_modified = Some("garbage".to_string());
        assert_eq!(
            decide(now, Some(&meta), true, false, true),
            FetchAction::ProbeEtag
        );
    }

    #[test]
    fn test_no_anchors_at_all_falls_back_to_now() {
        // Both anchors absent: the anchor defaults to "now", which keeps
        // the fresh-window branch true for this call.
        let now = Utc::now();
        let meta = metadata_with(None, None, None);
        assert_eq!(
            decide(now, Some(&meta), true, false, true),
            FetchAction::UseCached
        );
    }

    #[test]
    fn test_missing_metadata_with_local_csv_uses_cache() {
        // Same fallback-to-now path as above, with no sidecar at all.
        let now = Utc::now();
        assert_eq!(decide(now, None, true, false, true), FetchAction::UseCached);
    }

    #[test]
    fn test_resolve_probe_no_cached_etag_downloads() {
        assert_eq!(
            resolve_probe(Some("\"xyz\""), None),
            ProbeResolution::Download
        );
        assert_eq!(resolve_probe(None, None), ProbeResolution::Download);
    }

    #[test]
    fn test_resolve_probe_changed_etag_downloads() {
        assert_eq!(
            resolve_probe(Some("\"xyz\""), Some("\"abc\"")),
            ProbeResolution::Download
        );
    }

    #[test]
    fn test_resolve_probe_matching_etag_uses_cache() {
        assert_eq!(
            resolve_probe(Some("\"abc\""), Some("\"abc\"")),
            ProbeResolution::UseCached
        );
    }

    #[test]
    fn test_resolve_probe_missing_remote_etag_uses_cache() {
        assert_eq!(
            resolve_probe(None, Some("\"abc\"")),
            ProbeResolution::UseCached
        );
    }
}
