//! Re-injection of preserved region bodies.

use tracing::debug;

use super::marker;
use super::GuardBlocks;

/// A preserved region that has no location in the new document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedRegion {
    pub id: String,
    /// The preserved body that will not be written back.
    pub content: String,
}

impl DroppedRegion {
    /// Whether any user code is lost with this region.
    pub fn has_user_code(&self) -> bool {
        !self.content.trim().is_empty()
    }
}

/// Result of merging preserved bodies into a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub document: String,
    /// Region ids whose preserved body was written back.
    pub applied: Vec<String>,
    /// Preserved regions missing from the new document, in preserved order.
    pub dropped: Vec<DroppedRegion>,
}

/// Splice preserved bodies into `document`.
///
/// Each paired region whose id is in `blocks` gets its body replaced by the
/// preserved text followed by a newline and the END marker's own indentation.
/// An empty preserved body reproduces the freshly emitted layout exactly.
pub fn merge_guards(document: &str, blocks: &GuardBlocks) -> MergeOutcome {
    let markers = marker::scan(document);
    let regions = marker::regions(&markers);

    let mut merged = String::with_capacity(document.len());
    let mut applied = Vec::new();
    let mut cursor = 0;

    for region in &regions {
        let Some(content) = blocks.get(region.id()) else {
            continue;
        };
        // Overlaps an earlier spliced region; its block is reported as dropped.
        if region.begin.start < cursor {
            continue;
        }
        merged.push_str(&document[cursor..region.begin.end]);
        merged.push_str(content);
        merged.push('\n');
        merged.push_str(region.end.indent(document));
        cursor = region.end.start;
        applied.push(region.id().to_string());
    }
    merged.push_str(&document[cursor..]);

    let dropped: Vec<DroppedRegion> = blocks
        .iter()
        .filter(|(id, _)| !applied.iter().any(|a| a == *id))
        .map(|(id, content)| DroppedRegion {
            id: id.clone(),
            content: content.clone(),
        })
        .collect();

    debug!(applied = applied.len(), dropped = dropped.len(), "merged guard blocks");

    MergeOutcome {
        document: merged,
        applied,
        dropped,
    }
}
