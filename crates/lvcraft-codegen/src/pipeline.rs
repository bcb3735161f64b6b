//! One generation pass: validate, extract, emit, merge.

use lvcraft_core::{Layout, Styles};
use tracing::{debug, info, warn};

use crate::emitter::{EmitOptions, Emitter};
use crate::error::Result;
use crate::guards::{
    extract_guards, merge_guards, validate_guards, DroppedRegion, GuardBlocks, GuardDiagnostic,
};

/// A generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// File name relative to the output directory.
    pub path: String,
    /// File content.
    pub content: String,
}

/// Everything a caller needs to decide whether and what to write.
#[derive(Debug, Clone)]
pub struct GenerationOutput {
    /// Declarations document.
    pub header: GeneratedFile,
    /// Implementation document with preserved regions merged in.
    pub source: GeneratedFile,
    /// Malformed markers in the previous document. When non-empty nothing
    /// was preserved and the caller must confirm before overwriting.
    pub diagnostics: Vec<GuardDiagnostic>,
    /// Region ids whose previous body was carried over.
    pub preserved: Vec<String>,
    /// Previous regions with no place in the new document.
    pub dropped: Vec<DroppedRegion>,
}

impl GenerationOutput {
    /// Whether writing would overwrite a document with corrupted markers.
    pub fn needs_confirmation(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Dropped regions that held user code.
    pub fn lost_user_code(&self) -> impl Iterator<Item = &DroppedRegion> {
        self.dropped.iter().filter(|d| d.has_user_code())
    }

    /// Both documents, header first.
    pub fn files(&self) -> [&GeneratedFile; 2] {
        [&self.header, &self.source]
    }
}

/// Runs complete generation passes. Holds no state between passes.
pub struct Generator<'a> {
    emitter: Emitter<'a>,
}

impl<'a> Generator<'a> {
    /// Create a generator.
    pub fn new(options: EmitOptions) -> Result<Self> {
        Ok(Self {
            emitter: Emitter::new(options)?,
        })
    }

    /// Generate both documents.
    ///
    /// `previous` is the current implementation document, if one exists.
    pub fn generate(
        &self,
        layout: &Layout,
        styles: &Styles,
        previous: Option<&str>,
    ) -> Result<GenerationOutput> {
        let (diagnostics, blocks) = match previous {
            Some(text) => {
                let diagnostics = validate_guards(text);
                if diagnostics.is_empty() {
                    (diagnostics, extract_guards(text))
                } else {
                    for d in &diagnostics {
                        warn!("{d}");
                    }
                    (diagnostics, GuardBlocks::new())
                }
            }
            None => (Vec::new(), GuardBlocks::new()),
        };
        debug!(blocks = blocks.len(), "previous regions extracted");

        let emitted = self.emitter.emit(layout, styles)?;
        let merged = merge_guards(&emitted.source, &blocks);

        for region in merged.dropped.iter().filter(|d| d.has_user_code()) {
            warn!(region = %region.id, "preserved user code has no region in the new document");
        }
        info!(
            widgets = emitted.identifiers.len(),
            preserved = merged.applied.len(),
            dropped = merged.dropped.len(),
            "generation pass complete"
        );

        let options = self.emitter.options();
        Ok(GenerationOutput {
            header: GeneratedFile {
                path: options.header_name.clone(),
                content: emitted.header,
            },
            source: GeneratedFile {
                path: options.source_name.clone(),
                content: merged.document,
            },
            diagnostics,
            preserved: merged.applied,
            dropped: merged.dropped,
        })
    }
}

/// Run a pass with default options.
pub fn generate(
    layout: &Layout,
    styles: &Styles,
    previous: Option<&str>,
) -> Result<GenerationOutput> {
    Generator::new(EmitOptions::default())?.generate(layout, styles, previous)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lvcraft_core::{EventBinding, WidgetNode};

    fn layout() -> Layout {
        Layout::new(Some(
            WidgetNode::new("obj").with_child(
                WidgetNode::new("button")
                    .with_id("ok")
                    .with_event("onClick", EventBinding::Stub),
            ),
        ))
    }

    #[test]
    fn test_first_pass_without_previous() {
        let out = generate(&layout(), &Styles::default(), None).unwrap();

        assert_eq!(out.header.path, "ui.h");
        assert_eq!(out.source.path, "ui.c");
        assert!(out.diagnostics.is_empty());
        assert!(out.preserved.is_empty());
        assert!(out.dropped.is_empty());
        assert!(!out.needs_confirmation());
    }

    #[test]
    fn test_corrupted_previous_preserves_nothing() {
        let previous = "/* USER CODE BEGIN ui_ok_click */\n  keep();\n";
        let out = generate(&layout(), &Styles::default(), Some(previous)).unwrap();

        assert!(out.needs_confirmation());
        assert_eq!(out.diagnostics.len(), 1);
        assert!(!out.source.content.contains("keep();"));
        assert!(out.preserved.is_empty());
    }

    #[test]
    fn test_interleaved_previous_preserves_nothing() {
        let previous = "\
static void ui_ok_click(lv_event_t * e) {
  /* USER CODE BEGIN ui_ok_click */
  click();
  /* USER CODE BEGIN init */
  start();
  /* USER CODE END ui_ok_click */
}
  /* USER CODE END init */
";
        let out = generate(&layout(), &Styles::default(), Some(previous)).unwrap();

        assert!(out.needs_confirmation());
        assert_eq!(out.diagnostics.len(), 2);
        assert!(out.preserved.is_empty());
        assert!(!out.source.content.contains("click();"));
        assert!(!out.source.content.contains("start();"));
    }

    #[test]
    fn test_removed_handler_is_reported() {
        let first = generate(&layout(), &Styles::default(), None).unwrap();
        let edited = first.source.content.replace(
            "/* USER CODE BEGIN ui_ok_click */\n",
            "/* USER CODE BEGIN ui_ok_click */\n  beep();\n",
        );

        let without_event = Layout::new(Some(
            WidgetNode::new("obj").with_child(WidgetNode::new("button").with_id("ok")),
        ));
        let out = generate(&without_event, &Styles::default(), Some(&edited)).unwrap();

        let lost: Vec<_> = out.lost_user_code().map(|d| d.id.as_str()).collect();
        assert_eq!(lost, vec!["ui_ok_click"]);
        assert_eq!(out.preserved, vec!["init".to_string()]);
        assert!(!out.source.content.contains("beep();"));
    }
}
