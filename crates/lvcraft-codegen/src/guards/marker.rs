//! Marker grammar for editable regions.
//!
//! ```text
//! /* USER CODE BEGIN <id> */
//! /* USER CODE END <id> */
//! ```
//!
//! Emission always writes the canonical form above. Scanning accepts any
//! whitespace inside the comment so hand-reformatted markers still pair up.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{CodegenError, Result};

/// Region id of the editable block at the end of the initializer.
pub const INIT_REGION: &str = "init";

const MARKER_PATTERN: &str = r"/\*\s*USER\s+CODE\s+(BEGIN|END)\s+([A-Za-z0-9_]+)\s*\*/";

fn marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(MARKER_PATTERN).expect("marker pattern is valid"))
}

/// Whether `id` can be written inside a marker.
pub fn is_region_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Canonical BEGIN marker.
pub fn begin_marker(id: &str) -> String {
    format!("/* USER CODE BEGIN {id} */")
}

/// Canonical END marker.
pub fn end_marker(id: &str) -> String {
    format!("/* USER CODE END {id} */")
}

/// An empty editable region as emitted: BEGIN and END on consecutive lines.
pub fn region_lines(id: &str, indent: &str) -> Result<[String; 2]> {
    if !is_region_id(id) {
        return Err(CodegenError::InvalidRegionId(id.to_string()));
    }
    Ok([
        format!("{indent}{}", begin_marker(id)),
        format!("{indent}{}", end_marker(id)),
    ])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Begin,
    End,
}

/// A marker occurrence in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker<'a> {
    pub kind: MarkerKind,
    pub id: &'a str,
    /// Byte offset of the opening `/*`.
    pub start: usize,
    /// Byte offset just past the closing `*/`.
    pub end: usize,
}

impl Marker<'_> {
    /// 1-based line number of the marker in `text`.
    pub fn line(&self, text: &str) -> usize {
        text[..self.start].matches('\n').count() + 1
    }

    /// Whitespace preceding the marker on its line.
    pub fn indent<'t>(&self, text: &'t str) -> &'t str {
        let line_start = text[..self.start].rfind('\n').map_or(0, |i| i + 1);
        let prefix = &text[line_start..self.start];
        let width = prefix
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(prefix.len());
        &prefix[..width]
    }
}

/// All markers in `text`, in document order.
pub fn scan(text: &str) -> Vec<Marker<'_>> {
    marker_regex()
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let kind = match caps.get(1)?.as_str() {
                "BEGIN" => MarkerKind::Begin,
                _ => MarkerKind::End,
            };
            Some(Marker {
                kind,
                id: caps.get(2)?.as_str(),
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}

/// A BEGIN marker paired with its END marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region<'a> {
    pub begin: Marker<'a>,
    pub end: Marker<'a>,
}

impl<'a> Region<'a> {
    pub fn id(&self) -> &'a str {
        self.begin.id
    }

    /// Text strictly between the two markers.
    pub fn body<'t>(&self, text: &'t str) -> &'t str {
        &text[self.begin.end..self.end.start]
    }

    /// Whether `marker` lies strictly between this region's markers.
    pub fn contains(&self, marker: &Marker<'_>) -> bool {
        marker.start >= self.begin.end && marker.end <= self.end.start
    }
}

/// Pair markers into regions.
///
/// For each id the first BEGIN is paired with the first END of the same id
/// that follows it. Later BEGINs for an id that is already paired are ignored.
/// Regions may overlap when markers are interleaved; validation reports that.
pub fn regions<'a>(markers: &[Marker<'a>]) -> Vec<Region<'a>> {
    let mut out: Vec<Region<'a>> = Vec::new();

    for (i, begin) in markers.iter().enumerate() {
        if begin.kind != MarkerKind::Begin || out.iter().any(|r| r.id() == begin.id) {
            continue;
        }
        let end = markers[i + 1..]
            .iter()
            .find(|m| m.kind == MarkerKind::End && m.id == begin.id);
        if let Some(end) = end {
            out.push(Region {
                begin: *begin,
                end: *end,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_canonical_and_loose_markers() {
        let text = "a\n  /* USER CODE BEGIN init */\n/*USER  CODE   END init*/\n";
        let markers = scan(text);

        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].kind, MarkerKind::Begin);
        assert_eq!(markers[0].id, "init");
        assert_eq!(markers[0].line(text), 2);
        assert_eq!(markers[0].indent(text), "  ");
        assert_eq!(markers[1].kind, MarkerKind::End);
        assert_eq!(markers[1].indent(text), "");
    }

    #[test]
    fn test_scan_ignores_non_word_ids() {
        assert!(scan("/* USER CODE BEGIN foo-bar */").is_empty());
        assert!(scan("// USER CODE BEGIN foo").is_empty());
    }

    #[test]
    fn test_region_lines() {
        let [begin, end] = region_lines("ui_ok_click", "  ").unwrap();
        assert_eq!(begin, "  /* USER CODE BEGIN ui_ok_click */");
        assert_eq!(end, "  /* USER CODE END ui_ok_click */");
        assert!(region_lines("no spaces", "").is_err());
    }

    #[test]
    fn test_first_begin_pairs_with_first_following_end() {
        let text = "/* USER CODE END a */ /* USER CODE BEGIN a */ x /* USER CODE END a */ \
                    /* USER CODE BEGIN a */ y /* USER CODE END a */";
        let markers = scan(text);
        let regions = regions(&markers);

        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].body(text), " x ");
    }

    #[test]
    fn test_interleaved_markers_pair_every_id() {
        let text = "/* USER CODE BEGIN a */ 1 /* USER CODE BEGIN b */ 2 \
                    /* USER CODE END a */ 3 /* USER CODE END b */";
        let markers = scan(text);
        let regions = regions(&markers);

        let ids: Vec<_> = regions.iter().map(Region::id).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(regions[0].contains(&regions[1].begin));
        assert!(regions[1].contains(&regions[0].end));
    }
}
