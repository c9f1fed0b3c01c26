//! Batch mode: replays a stream of queries the way an interactive host
//! would, applying each compiled filter only when it differs from the one
//! currently applied.

use serde::Serialize;
use sift_query::{FilterSet, QueryMetrics, SearchCompiler, SiftError, TargetRef};

/// Outcome of one submitted query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    /// A new filter was compiled and applied.
    Applied,
    /// Compiled to the filter already applied.
    Unchanged,
    /// Blank query: the filter was removed.
    Cleared,
    /// Refused by the guard.
    Rejected,
    /// Syntax or internal error.
    Error,
}

/// One output line of `sift batch`.
#[derive(Debug, Clone, Serialize)]
pub struct BatchRecord {
    pub query: String,
    pub status: BatchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<FilterSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<QueryMetrics>,
}

impl BatchRecord {
    fn new(query: &str, status: BatchStatus) -> Self {
        BatchRecord {
            query: query.to_string(),
            status,
            fingerprint: None,
            filters: None,
            reason: None,
            metrics: None,
        }
    }

    fn failed(query: &str, err: &SiftError) -> Self {
        let status = match err {
            SiftError::GuardRejected(_) => BatchStatus::Rejected,
            _ => BatchStatus::Error,
        };
        BatchRecord {
            reason: Some(err.to_string()),
            ..BatchRecord::new(query, status)
        }
    }
}

/// Holds the currently applied filter for one target column.
#[derive(Debug)]
pub struct FilterHost {
    compiler: SearchCompiler,
    target: TargetRef,
    applied: Option<String>,
}

impl FilterHost {
    pub fn new(compiler: SearchCompiler, target: TargetRef) -> Self {
        FilterHost {
            compiler,
            target,
            applied: None,
        }
    }

    /// Fingerprint of the applied filter, if any.
    pub fn applied(&self) -> Option<&str> {
        self.applied.as_deref()
    }

    /// Compiles `raw` and updates the applied filter.
    ///
    /// The guard sees `raw` as submitted, surrounding whitespace included.
    /// Records echo the trimmed text. A failed query leaves the applied
    /// filter untouched.
    pub fn submit(&mut self, raw: &str) -> BatchRecord {
        let query = raw.trim();
        if query.is_empty() {
            self.applied = None;
            return BatchRecord::new(query, BatchStatus::Cleared);
        }

        let compiled = match self.compiler.compile(raw, &self.target) {
            Ok(compiled) => compiled,
            Err(err) => {
                tracing::info!(query, error = %err, "query not applied");
                return BatchRecord::failed(query, &err);
            }
        };
        let fingerprint = match compiled.filters.fingerprint() {
            Ok(fp) => fp,
            Err(err) => return BatchRecord::failed(query, &err),
        };

        if self.applied.as_deref() == Some(fingerprint.as_str()) {
            return BatchRecord {
                fingerprint: Some(fingerprint),
                metrics: compiled.metrics,
                ..BatchRecord::new(query, BatchStatus::Unchanged)
            };
        }

        self.applied = Some(fingerprint.clone());
        BatchRecord {
            fingerprint: Some(fingerprint),
            filters: Some(compiled.filters),
            metrics: compiled.metrics,
            ..BatchRecord::new(query, BatchStatus::Applied)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_query::GuardPolicy;

    fn host() -> FilterHost {
        FilterHost::new(SearchCompiler::new(), TargetRef::new("Tickets", "Priority"))
    }

    #[test]
    fn first_query_is_applied() {
        let mut host = host();
        let record = host.submit("urgent OR high");
        assert_eq!(record.status, BatchStatus::Applied);
        assert!(record.filters.is_some());
        assert_eq!(host.applied(), record.fingerprint.as_deref());
    }

    #[test]
    fn equivalent_query_is_unchanged() {
        let mut host = host();
        host.submit("urgent OR high");
        // Same tree after parsing, different spelling.
        let record = host.submit("  urgent  or  high ");
        assert_eq!(record.status, BatchStatus::Unchanged);
        assert!(record.filters.is_none());
        assert!(record.fingerprint.is_some());
    }

    #[test]
    fn blank_query_clears() {
        let mut host = host();
        host.submit("urgent");
        let record = host.submit("   ");
        assert_eq!(record.status, BatchStatus::Cleared);
        assert!(host.applied().is_none());

        assert_eq!(host.submit("urgent").status, BatchStatus::Applied);
    }

    #[test]
    fn failures_keep_the_applied_filter() {
        let mut host = host();
        host.submit("urgent");
        let before = host.applied().map(str::to_string);

        let record = host.submit("urgent AND");
        assert_eq!(record.status, BatchStatus::Error);
        assert!(record.reason.as_deref().is_some_and(|r| r.contains("syntax")));
        assert_eq!(host.applied().map(str::to_string), before);
    }

    #[test]
    fn guard_refusal_is_rejected() {
        let policy = GuardPolicy {
            max_token_count: 2,
            ..GuardPolicy::default()
        };
        let mut host = FilterHost::new(
            SearchCompiler::with_policy(policy),
            TargetRef::new("Tickets", "Priority"),
        );
        let record = host.submit("a b c");
        assert_eq!(record.status, BatchStatus::Rejected);
        assert!(record.reason.as_deref().is_some_and(|r| r.contains("tokens")));
    }

    #[test]
    fn length_guard_counts_surrounding_whitespace() {
        let policy = GuardPolicy {
            max_query_length: 3,
            ..GuardPolicy::default()
        };
        let mut host = FilterHost::new(
            SearchCompiler::with_policy(policy),
            TargetRef::new("Tickets", "Priority"),
        );
        assert_eq!(host.submit("abc").status, BatchStatus::Applied);

        let record = host.submit("ab  ");
        assert_eq!(record.status, BatchStatus::Rejected);
        assert_eq!(record.query, "ab");
        assert!(record.reason.as_deref().is_some_and(|r| r.contains("characters")));
    }

    #[test]
    fn record_serializes_lowercase_status() {
        let record = host().submit("");
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value, serde_json::json!({"query": "", "status": "cleared"}));
    }
}
