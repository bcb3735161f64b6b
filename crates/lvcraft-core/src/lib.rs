//! Core types for LVCraft projects.
//!
//! This crate holds the declarative UI model consumed by the code
//! generator: the widget tree (`layout.json`), the shared style
//! collection (`styles.json`) and the project manifest (`lvproj.json`),
//! together with the helpers that locate and load them from disk.
//!
//! # Example
//!
//! ```ignore
//! use lvcraft_core::Project;
//!
//! let project = Project::open(Path::new("."))?;
//! println!("{} widgets", project.layout.root.map_or(0, |r| r.node_count()));
//! ```

pub mod error;
pub mod manifest;
pub mod model;
pub mod project;

pub use error::{ProjectError, Result};
pub use manifest::{GeneratorConfig, LvProj, MemoryProfile, Resolution};
pub use model::{EventBinding, Layout, PropertyValue, SharedStyle, Styles, WidgetNode};
pub use project::{find_project_root, read_layout, read_manifest, read_styles, Project};
