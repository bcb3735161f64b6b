//! Editable regions ("user code guards") in generated documents.
//!
//! A previous implementation document is first validated; only when every
//! marker is balanced and no region encloses another marker are the region
//! bodies extracted. After emission the
//! bodies are merged back into the new document by region id.

pub mod marker;
mod merge;

use std::fmt;

use indexmap::IndexMap;

pub use marker::{begin_marker, end_marker, INIT_REGION};
pub use merge::{merge_guards, DroppedRegion, MergeOutcome};

use marker::MarkerKind;

/// Preserved region bodies keyed by region id, in document order.
pub type GuardBlocks = IndexMap<String, String>;

/// What is wrong with a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardIssue {
    /// A BEGIN with no END of the same id after it.
    MissingEnd,
    /// An END with no BEGIN of the same id before it.
    MissingBegin,
    /// A region with another marker between its BEGIN and END.
    Overlapping,
}

/// A malformed marker found in a previous document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardDiagnostic {
    pub id: String,
    pub issue: GuardIssue,
    /// Line of the first offending marker.
    pub line: usize,
}

impl fmt::Display for GuardDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.issue {
            GuardIssue::MissingEnd => write!(
                f,
                "USER CODE BEGIN {} has no matching END (line {})",
                self.id, self.line
            ),
            GuardIssue::MissingBegin => write!(
                f,
                "USER CODE END {} has no matching BEGIN (line {})",
                self.id, self.line
            ),
            GuardIssue::Overlapping => write!(
                f,
                "USER CODE BEGIN {} encloses another USER CODE marker (line {})",
                self.id, self.line
            ),
        }
    }
}

/// Report unbalanced and interleaved markers.
///
/// Each id is reported at most once per issue: first every BEGIN lacking a
/// later END, then every END lacking an earlier BEGIN, then every paired
/// region that encloses another marker. An empty result means the document
/// is safe to extract from.
pub fn validate_guards(text: &str) -> Vec<GuardDiagnostic> {
    let markers = marker::scan(text);
    let mut diagnostics = Vec::new();

    let report = |m: &marker::Marker<'_>, issue: GuardIssue, out: &mut Vec<GuardDiagnostic>| {
        if !out.iter().any(|d| d.id == m.id && d.issue == issue) {
            out.push(GuardDiagnostic {
                id: m.id.to_string(),
                issue,
                line: m.line(text),
            });
        }
    };

    for (i, m) in markers.iter().enumerate() {
        if m.kind != MarkerKind::Begin {
            continue;
        }
        let closed = markers[i + 1..]
            .iter()
            .any(|e| e.kind == MarkerKind::End && e.id == m.id);
        if !closed {
            report(m, GuardIssue::MissingEnd, &mut diagnostics);
        }
    }

    for (i, m) in markers.iter().enumerate() {
        if m.kind != MarkerKind::End {
            continue;
        }
        let opened = markers[..i]
            .iter()
            .any(|b| b.kind == MarkerKind::Begin && b.id == m.id);
        if !opened {
            report(m, GuardIssue::MissingBegin, &mut diagnostics);
        }
    }

    let regions = marker::regions(&markers);
    for region in &regions {
        if markers.iter().any(|m| region.contains(m)) {
            report(&region.begin, GuardIssue::Overlapping, &mut diagnostics);
        }
    }

    diagnostics
}

/// Capture the body of every paired region, trailing whitespace trimmed.
pub fn extract_guards(text: &str) -> GuardBlocks {
    let markers = marker::scan(text);
    marker::regions(&markers)
        .into_iter()
        .map(|region| (region.id().to_string(), region.body(text).trim_end().to_string()))
        .collect()
}
