//! Curriculum analysis via an external text-generation model.
//!
//! The analysis path is the only asynchronous, long-running operation in the
//! system. It reads a [`Snapshot`] of the store up front and never touches the
//! store again, so area/course/association mutations stay fully available
//! while a request is in flight.
//!
//! Overlapping requests are ordered by a monotonic sequence number: only the
//! result of the most recently issued request becomes the board's "latest"
//! analysis. A late-arriving older result is still returned to its own
//! caller, flagged stale, but never overwrites a newer one.

mod gemini;

pub use gemini::{GeminiClient, GeminiError};

use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{BooleanAssociationMap, CoreArea, Course};
use crate::store::Store;

/// Returned instead of an error whenever the upstream call fails for any
/// reason (missing key, network, malformed response).
pub const FALLBACK_MESSAGE: &str =
    "Curriculum analysis failed. Check the API key configuration and your network connection.";

/// Point-in-time input for one analysis request: ranked areas, sorted courses
/// and the professor-anonymous association matrix.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub areas: Vec<CoreArea>,
    pub courses: Vec<Course>,
    pub matrix: BooleanAssociationMap,
}

impl Snapshot {
    pub fn capture(store: &Store) -> Self {
        Self {
            areas: store.ranked_areas(),
            courses: store.sorted_courses(),
            matrix: store.boolean_view(),
        }
    }

    fn related_area_names(&self, course: &Course) -> String {
        let names: Vec<&str> = self
            .areas
            .iter()
            .filter(|area| {
                self.matrix
                    .get(&course.id)
                    .and_then(|row| row.get(&area.id))
                    .copied()
                    .unwrap_or(false)
            })
            .map(|area| area.name.as_str())
            .collect();
        if names.is_empty() {
            "none".to_string()
        } else {
            names.join(", ")
        }
    }

    /// Render the natural-language prompt sent to the model.
    pub fn build_prompt(&self) -> String {
        let mut prompt = String::from("Department curriculum analysis request:\n\n");

        prompt.push_str("Defined student career areas:\n");
        for area in &self.areas {
            let _ = writeln!(prompt, "- {} ({} votes)", area.name, area.votes);
        }

        prompt.push_str("\nProposed curriculum:\n");
        for course in &self.courses {
            let _ = writeln!(
                prompt,
                "- Year {}, Semester {}: {} (related career areas: {})",
                course.year,
                course.semester,
                course.name,
                self.related_area_names(course)
            );
        }

        prompt.push_str(
            "\nBased on the information above, provide a detailed expert assessment of:\n\
             1. Strengths: how well does the curriculum cover the defined career areas, \
             and where are course/area connections strongest?\n\
             2. Gaps: which career areas are underserved or weakly connected? Suggest \
             concrete courses or topics that would strengthen them.\n\
             3. Overall: an assessment of the curriculum's balance and progression, with \
             recommendations for its direction.\n",
        );

        prompt
    }
}

/// A completed, accepted analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Sequence number of the request that produced this text.
    pub seq: u64,
    pub text: String,
    pub completed_at: DateTime<Utc>,
}

/// What one analysis call produced.
///
/// `stale` means a newer request was issued while this one was in flight; the
/// text is still this caller's answer but it did not become the latest result.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    pub text: String,
    pub stale: bool,
}

struct Shared {
    /// Highest sequence number issued so far. 0 = no request yet.
    issued: AtomicU64,
    latest: Mutex<Option<AnalysisResult>>,
}

/// Runs analysis requests and tracks the latest accepted result.
#[derive(Clone)]
pub struct AnalysisService {
    client: GeminiClient,
    shared: Arc<Shared>,
}

impl AnalysisService {
    pub fn new(client: GeminiClient) -> Self {
        Self {
            client,
            shared: Arc::new(Shared {
                issued: AtomicU64::new(0),
                latest: Mutex::new(None),
            }),
        }
    }

    /// Run one analysis over a snapshot. Infallible by contract: upstream
    /// failures are logged and come back as [`FALLBACK_MESSAGE`].
    pub async fn analyze(&self, snapshot: Snapshot) -> AnalysisOutcome {
        let seq = self.begin_request();
        let prompt = snapshot.build_prompt();

        let text = match self.client.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Analysis request {} failed: {}", seq, e);
                FALLBACK_MESSAGE.to_string()
            }
        };

        self.finish_request(seq, text)
    }

    /// Issue a sequence number for a new request. Every call to `analyze`
    /// is one issue/finish pair; the split is public so the two halves can
    /// straddle an externally managed await.
    pub fn begin_request(&self) -> u64 {
        self.shared.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Record a finished request. The result becomes the latest only when no
    /// newer request was issued while this one ran.
    pub fn finish_request(&self, seq: u64, text: String) -> AnalysisOutcome {
        let mut latest = self.shared.latest.lock().expect("analysis lock poisoned");

        let stale = seq != self.shared.issued.load(Ordering::SeqCst)
            || latest.as_ref().is_some_and(|r| r.seq >= seq);
        if stale {
            tracing::debug!("Discarding stale analysis result for request {}", seq);
        } else {
            *latest = Some(AnalysisResult {
                seq,
                text: text.clone(),
                completed_at: Utc::now(),
            });
        }

        AnalysisOutcome { text, stale }
    }

    /// The most recently accepted result, if any request has completed.
    pub fn latest(&self) -> Option<AnalysisResult> {
        self.shared
            .latest
            .lock()
            .expect("analysis lock poisoned")
            .clone()
    }
}
