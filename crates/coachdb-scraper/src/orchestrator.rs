//! Hybrid acquisition orchestrator.
//!
//! Per-target state machine:
//!
//! ```text
//! Pending → TryingPrimary → (Success | TryingFallback) → (Success | Failed)
//! ```
//!
//! Known-difficult targets (and targets for which remote extraction is not
//! configured) skip `TryingPrimary` and go straight to the stealth browser.
//! A remote result is accepted only when it reaches the configured minimum
//! record count; anything less escalates. Strategy failures never escape as
//! errors — they become failed [`ScrapeAttemptResult`]s so a batch can keep
//! moving.

use std::time::Instant;

use coachdb_core::DifficultTargets;

use crate::strategy::{RemoteExtractionClient, StealthScraper, StrategyYield};
use crate::types::{AcquisitionMethod, ScrapeAttemptResult, Target};

/// Per-target acquisition state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    Pending,
    TryingPrimary,
    TryingFallback,
    Success,
    Failed,
}

/// Which acquisition route a batch requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeMethod {
    /// Remote extraction first, stealth browser on under-delivery.
    Hybrid,
    /// Remote extraction only; no browser fallback.
    Remote,
    /// Stealth browser only.
    Stealth,
}

impl ScrapeMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ScrapeMethod::Hybrid => "hybrid",
            ScrapeMethod::Remote => "remote",
            ScrapeMethod::Stealth => "stealth",
        }
    }
}

impl std::fmt::Display for ScrapeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct HybridOrchestrator {
    remote: Option<RemoteExtractionClient>,
    stealth: StealthScraper,
    difficult: DifficultTargets,
    fallback_min_records: usize,
}

impl HybridOrchestrator {
    #[must_use]
    pub fn new(
        remote: Option<RemoteExtractionClient>,
        stealth: StealthScraper,
        difficult: DifficultTargets,
        fallback_min_records: usize,
    ) -> Self {
        Self {
            remote,
            stealth,
            difficult,
            fallback_min_records,
        }
    }

    /// The state a target enters after `Pending`: `TryingPrimary` when remote
    /// extraction is configured and worth attempting, `TryingFallback` when
    /// the target is known-difficult, the method forces the browser, or no
    /// remote client exists.
    #[must_use]
    pub fn initial_state(&self, target: &Target, method: ScrapeMethod) -> TargetState {
        match method {
            ScrapeMethod::Stealth => TargetState::TryingFallback,
            ScrapeMethod::Remote | ScrapeMethod::Hybrid => {
                if self.remote.is_none() {
                    return TargetState::TryingFallback;
                }
                if method == ScrapeMethod::Hybrid && self.difficult.is_difficult(&target.name) {
                    return TargetState::TryingFallback;
                }
                TargetState::TryingPrimary
            }
        }
    }

    /// Whether a primary-strategy yield is accepted without escalating.
    ///
    /// Hybrid runs demand the configured minimum; a forced remote-only run
    /// accepts anything non-empty since there is nothing to escalate to.
    #[must_use]
    pub fn accepts_primary(&self, record_count: usize, method: ScrapeMethod) -> bool {
        record_count >= self.fallback_min_records
            || (method == ScrapeMethod::Remote && record_count > 0)
    }

    /// Run the state machine for one target. Never returns an error: every
    /// failure mode is folded into a failed [`ScrapeAttemptResult`].
    pub async fn scrape_target(
        &self,
        target: &Target,
        method: ScrapeMethod,
    ) -> ScrapeAttemptResult {
        let started = Instant::now();
        let mut state = self.initial_state(target, method);

        if state == TargetState::TryingPrimary {
            tracing::debug!(target = %target.slug, state = ?state, "attempting remote extraction");
            // initial_state only returns TryingPrimary when a client exists.
            if let Some(client) = self.remote.as_ref() {
                match client.extract_staff(target).await {
                    Ok(yielded) if self.accepts_primary(yielded.records.len(), method) => {
                        state = TargetState::Success;
                        tracing::info!(
                            target = %target.slug,
                            count = yielded.records.len(),
                            state = ?state,
                            "remote extraction accepted"
                        );
                        return success_result(
                            target,
                            AcquisitionMethod::RemoteExtraction,
                            yielded,
                            started,
                        );
                    }
                    Ok(yielded) => {
                        if method == ScrapeMethod::Remote {
                            return failed_result(
                                target,
                                AcquisitionMethod::RemoteExtraction,
                                started,
                                format!(
                                    "remote extraction produced {} records",
                                    yielded.records.len()
                                ),
                            );
                        }
                        tracing::info!(
                            target = %target.slug,
                            count = yielded.records.len(),
                            min = self.fallback_min_records,
                            "remote extraction under-delivered — escalating to stealth browser"
                        );
                    }
                    Err(e) => {
                        if method == ScrapeMethod::Remote {
                            return failed_result(
                                target,
                                AcquisitionMethod::RemoteExtraction,
                                started,
                                e.to_string(),
                            );
                        }
                        tracing::warn!(
                            target = %target.slug,
                            error = %e,
                            "remote extraction failed — escalating to stealth browser"
                        );
                    }
                }
            }
            state = TargetState::TryingFallback;
        } else if method == ScrapeMethod::Remote {
            return failed_result(
                target,
                AcquisitionMethod::RemoteExtraction,
                started,
                "remote extraction is not configured".to_owned(),
            );
        }

        tracing::debug!(target = %target.slug, state = ?state, "attempting stealth browser");
        match self.stealth.extract_staff(target).await {
            Ok(yielded) => {
                tracing::info!(
                    target = %target.slug,
                    count = yielded.records.len(),
                    state = ?TargetState::Success,
                    "stealth extraction accepted"
                );
                success_result(target, AcquisitionMethod::StealthBrowser, yielded, started)
            }
            Err(e) => {
                tracing::warn!(
                    target = %target.slug,
                    error = %e,
                    state = ?TargetState::Failed,
                    "target failed on both strategies"
                );
                failed_result(
                    target,
                    AcquisitionMethod::StealthBrowser,
                    started,
                    e.to_string(),
                )
            }
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

fn success_result(
    target: &Target,
    method: AcquisitionMethod,
    yielded: StrategyYield,
    started: Instant,
) -> ScrapeAttemptResult {
    let success = !yielded.records.is_empty();
    ScrapeAttemptResult {
        target_slug: target.slug.clone(),
        method,
        success,
        records: yielded.records,
        source_url: Some(yielded.source_url),
        elapsed_ms: elapsed_ms(started),
        error: None,
    }
}

fn failed_result(
    target: &Target,
    method: AcquisitionMethod,
    started: Instant,
    error: String,
) -> ScrapeAttemptResult {
    ScrapeAttemptResult {
        target_slug: target.slug.clone(),
        method,
        success: false,
        records: Vec::new(),
        source_url: None,
        elapsed_ms: elapsed_ms(started),
        error: Some(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pacing::Pacer;

    fn target(name: &str) -> Target {
        Target {
            name: name.to_string(),
            slug: name.to_lowercase().replace(' ', "-"),
            base_url: "https://athletics.test".to_string(),
        }
    }

    fn orchestrator(with_remote: bool, min_records: usize) -> HybridOrchestrator {
        let remote = with_remote.then(|| {
            RemoteExtractionClient::with_base_url(
                "test-key",
                5,
                "coachdb-test/0.1",
                0,
                0,
                "http://127.0.0.1:1",
            )
            .expect("test client")
        });
        let stealth = StealthScraper::new("coachdb-test/0.1", 5, 0, 0, Pacer::zero());
        HybridOrchestrator::new(remote, stealth, DifficultTargets::default(), min_records)
    }

    #[test]
    fn two_records_trigger_fallback_three_do_not() {
        let orch = orchestrator(true, 3);
        assert!(
            !orch.accepts_primary(2, ScrapeMethod::Hybrid),
            "2 records must escalate to the stealth browser"
        );
        assert!(
            orch.accepts_primary(3, ScrapeMethod::Hybrid),
            "3 records must be accepted without fallback"
        );
        assert!(orch.accepts_primary(4, ScrapeMethod::Hybrid));
    }

    #[test]
    fn threshold_is_tunable() {
        let orch = orchestrator(true, 5);
        assert!(!orch.accepts_primary(4, ScrapeMethod::Hybrid));
        assert!(orch.accepts_primary(5, ScrapeMethod::Hybrid));
    }

    #[test]
    fn forced_remote_accepts_any_nonempty_yield() {
        let orch = orchestrator(true, 3);
        assert!(orch.accepts_primary(1, ScrapeMethod::Remote));
        assert!(!orch.accepts_primary(0, ScrapeMethod::Remote));
    }

    #[test]
    fn known_difficult_target_bypasses_remote() {
        let orch = orchestrator(true, 3);
        assert_eq!(
            orch.initial_state(&target("University of Alabama"), ScrapeMethod::Hybrid),
            TargetState::TryingFallback,
            "denylisted substring must route straight to the stealth browser"
        );
        assert_eq!(
            orch.initial_state(&target("Lincoln High School"), ScrapeMethod::Hybrid),
            TargetState::TryingPrimary
        );
    }

    #[test]
    fn missing_remote_client_routes_to_fallback() {
        let orch = orchestrator(false, 3);
        assert_eq!(
            orch.initial_state(&target("Lincoln High School"), ScrapeMethod::Hybrid),
            TargetState::TryingFallback
        );
    }

    #[test]
    fn forced_stealth_skips_remote_even_when_configured() {
        let orch = orchestrator(true, 3);
        assert_eq!(
            orch.initial_state(&target("Lincoln High School"), ScrapeMethod::Stealth),
            TargetState::TryingFallback
        );
    }

    #[test]
    fn forced_remote_still_routes_primary_for_difficult_targets() {
        // The difficult list is a hybrid heuristic; an explicit remote-only
        // run means the caller wants the remote attempt regardless.
        let orch = orchestrator(true, 3);
        assert_eq!(
            orch.initial_state(&target("University of Alabama"), ScrapeMethod::Remote),
            TargetState::TryingPrimary
        );
    }

    #[tokio::test]
    async fn remote_only_without_client_is_a_failed_attempt() {
        let orch = orchestrator(false, 3);
        let result = orch
            .scrape_target(&target("Lincoln High School"), ScrapeMethod::Remote)
            .await;
        assert!(!result.success);
        assert!(result.records.is_empty());
        assert!(result
            .error
            .as_deref()
            .unwrap()
            .contains("not configured"));
    }
}
