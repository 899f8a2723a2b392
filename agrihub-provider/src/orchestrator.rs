//! Concurrent refresh of a provider's sub-resources.
//!
//! All sub-fetches are started together and awaited to completion; one
//! failure never cancels the others. The combined result is reduced to a
//! single notification:
//!
//! | failures      | notification                                   |
//! |---------------|------------------------------------------------|
//! | 0             | fetched successfully, or no records found      |
//! | 1 ..= N-1     | partially fetched: k of N failed               |
//! | N             | all failed, the service may be offline         |

use crate::notify::{Notification, Notifier};
use agrihub_api::ApiResult;
use futures::future::{BoxFuture, join_all};
use std::sync::Arc;
use tracing::{debug, warn};

/// One named sub-fetch resolving to the number of records it loaded.
pub struct SubFetch<'a> {
    pub name: &'static str,
    pub future: BoxFuture<'a, ApiResult<usize>>,
}

impl<'a> SubFetch<'a> {
    pub fn new(name: &'static str, future: BoxFuture<'a, ApiResult<usize>>) -> Self {
        Self { name, future }
    }
}

/// How a single sub-fetch settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub name: &'static str,
    /// Record count on success, error message on failure.
    pub result: Result<usize, String>,
}

impl FetchOutcome {
    pub fn is_failure(&self) -> bool {
        self.result.is_err()
    }
}

/// Classification of a whole refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshSummary {
    /// Every sub-fetch succeeded and at least one returned records.
    Fetched { total: usize },
    /// Every sub-fetch succeeded and all of them were empty.
    NoRecords { total: usize },
    /// Some, but not all, sub-fetches failed.
    Partial { failed: usize, total: usize },
    /// Every sub-fetch failed.
    AllFailed { total: usize },
}

impl RefreshSummary {
    pub fn classify(outcomes: &[FetchOutcome]) -> Self {
        let total = outcomes.len();
        let failed = outcomes.iter().filter(|o| o.is_failure()).count();
        let any_records = outcomes
            .iter()
            .any(|o| matches!(o.result, Ok(count) if count > 0));

        match failed {
            0 if any_records => RefreshSummary::Fetched { total },
            0 => RefreshSummary::NoRecords { total },
            f if f == total => RefreshSummary::AllFailed { total },
            f => RefreshSummary::Partial { failed: f, total },
        }
    }

    /// Toast text for a refresh of `label` (e.g. "crops").
    pub fn message(&self, label: &str) -> String {
        match self {
            RefreshSummary::Fetched { .. } => format!("{} fetched successfully", capitalize(label)),
            RefreshSummary::NoRecords { .. } => format!("No {label} records found"),
            RefreshSummary::Partial { failed, total } => {
                format!("{} partially fetched: {failed} of {total} failed", capitalize(label))
            }
            RefreshSummary::AllFailed { total } => format!(
                "Failed to fetch {label}: all {total} requests failed, the service may be offline"
            ),
        }
    }

    pub fn notification(&self, label: &str) -> Notification {
        let message = self.message(label);
        match self {
            RefreshSummary::Fetched { .. } => Notification::success(message),
            RefreshSummary::NoRecords { .. } => Notification::info(message),
            RefreshSummary::Partial { .. } | RefreshSummary::AllFailed { .. } => {
                Notification::failure(message)
            }
        }
    }

    /// True when no sub-fetch failed.
    pub fn is_complete(&self) -> bool {
        matches!(
            self,
            RefreshSummary::Fetched { .. } | RefreshSummary::NoRecords { .. }
        )
    }
}

/// Outcome of [`RefreshOrchestrator::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshReport {
    pub summary: RefreshSummary,
    pub outcomes: Vec<FetchOutcome>,
}

impl RefreshReport {
    pub fn outcome(&self, name: &str) -> Option<&FetchOutcome> {
        self.outcomes.iter().find(|o| o.name == name)
    }
}

/// Runs sub-fetches concurrently and emits exactly one summary notification.
#[derive(Clone)]
pub struct RefreshOrchestrator {
    notifier: Arc<dyn Notifier>,
}

impl RefreshOrchestrator {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    pub async fn run(&self, label: &str, fetches: Vec<SubFetch<'_>>) -> RefreshReport {
        let (names, futures): (Vec<_>, Vec<_>) =
            fetches.into_iter().map(|f| (f.name, f.future)).unzip();

        debug!("Refreshing {} ({} sub-fetches)", label, names.len());
        let results = join_all(futures).await;

        let outcomes: Vec<FetchOutcome> = names
            .into_iter()
            .zip(results)
            .map(|(name, result)| FetchOutcome {
                name,
                result: result.map_err(|e| {
                    warn!("Refresh of {} failed at {}: {}", label, name, e);
                    e.user_message()
                }),
            })
            .collect();

        let summary = RefreshSummary::classify(&outcomes);
        self.notifier.notify(summary.notification(label));

        RefreshReport { summary, outcomes }
    }
}

pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(name: &'static str, n: usize) -> FetchOutcome {
        FetchOutcome { name, result: Ok(n) }
    }

    fn err(name: &'static str) -> FetchOutcome {
        FetchOutcome {
            name,
            result: Err("down".to_string()),
        }
    }

    #[test]
    fn classify_all_paths() {
        assert_eq!(
            RefreshSummary::classify(&[ok("a", 2), ok("b", 0)]),
            RefreshSummary::Fetched { total: 2 }
        );
        assert_eq!(
            RefreshSummary::classify(&[ok("a", 0), ok("b", 0)]),
            RefreshSummary::NoRecords { total: 2 }
        );
        assert_eq!(
            RefreshSummary::classify(&[ok("a", 5), err("b"), ok("c", 1)]),
            RefreshSummary::Partial { failed: 1, total: 3 }
        );
        assert_eq!(
            RefreshSummary::classify(&[err("a"), err("b")]),
            RefreshSummary::AllFailed { total: 2 }
        );
    }

    #[test]
    fn empty_refresh_has_no_records() {
        assert_eq!(RefreshSummary::classify(&[]), RefreshSummary::NoRecords { total: 0 });
    }

    #[test]
    fn messages() {
        assert_eq!(
            RefreshSummary::Fetched { total: 3 }.message("crops"),
            "Crops fetched successfully"
        );
        assert_eq!(
            RefreshSummary::Partial { failed: 1, total: 3 }.message("crops"),
            "Crops partially fetched: 1 of 3 failed"
        );
        assert!(
            RefreshSummary::AllFailed { total: 3 }
                .message("crops")
                .contains("may be offline")
        );
    }

    #[test]
    fn capitalize_handles_empty() {
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("fisheries"), "Fisheries");
    }
}
