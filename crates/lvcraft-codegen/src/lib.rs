//! Guarded LVGL code generation from LVCraft layouts.
//!
//! This crate compiles a widget tree and its shared styles into a C
//! declarations document (`ui.h`) and implementation document (`ui.c`).
//! Generated stubs and the initializer contain editable regions delimited by
//!
//! ```text
//! /* USER CODE BEGIN <id> */
//! /* USER CODE END <id> */
//! ```
//!
//! whose contents survive regeneration. A pass is a pure function of the
//! layout, the styles and the previous implementation document.
//!
//! # Example
//!
//! ```ignore
//! use lvcraft_codegen::generate;
//!
//! let previous = std::fs::read_to_string("generated/ui/ui.c").ok();
//! let out = generate(&project.layout, &project.styles, previous.as_deref())?;
//! if out.needs_confirmation() {
//!     // ask before overwriting a document with broken markers
//! }
//! ```

pub mod emitter;
pub mod error;
pub mod events;
pub mod guards;
pub mod ids;
pub mod pipeline;
pub mod templates;

pub use emitter::{EmitOptions, EmittedDocuments, Emitter, WidgetKind};
pub use error::{CodegenError, Result};
pub use events::{resolve_bindings, HandlerKind, ResolvedEvent, StubSet};
pub use guards::{
    extract_guards, merge_guards, validate_guards, DroppedRegion, GuardBlocks, GuardDiagnostic,
    GuardIssue, MergeOutcome,
};
pub use ids::{assign_ids, c_identifier, IdentifierMap};
pub use pipeline::{generate, GeneratedFile, GenerationOutput, Generator};
pub use templates::TemplateEngine;
