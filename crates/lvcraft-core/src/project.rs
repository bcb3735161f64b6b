//! Project store: locating a project and reading its configuration files.
//!
//! A project is a directory holding `lvproj.json`, `layout.json` and
//! `styles.json`. Generated code lives under `generated/ui/`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{ProjectError, Result};
use crate::manifest::LvProj;
use crate::model::{Layout, Styles};

pub const LVPROJ_FILENAME: &str = "lvproj.json";
pub const LAYOUT_FILENAME: &str = "layout.json";
pub const STYLES_FILENAME: &str = "styles.json";
pub const DIR_GENERATED: &str = "generated";
pub const DIR_UI: &str = "ui";
pub const UI_SOURCE: &str = "ui.c";
pub const UI_HEADER: &str = "ui.h";

/// Whether `dir` directly contains a project manifest.
pub fn is_project_dir(dir: &Path) -> bool {
    dir.join(LVPROJ_FILENAME).is_file()
}

/// Find the project root by walking up from a file or directory.
pub fn find_project_root(start: &Path) -> Result<PathBuf> {
    let start = if start.is_absolute() {
        start.to_path_buf()
    } else {
        std::env::current_dir()?.join(start)
    };

    start
        .ancestors()
        .find(|dir| is_project_dir(dir))
        .map(Path::to_path_buf)
        .ok_or(ProjectError::NotFound(start))
}

/// Read and validate `lvproj.json`.
pub fn read_manifest(root: &Path) -> Result<LvProj> {
    let path = root.join(LVPROJ_FILENAME);
    let raw = fs::read_to_string(&path)?;
    let manifest: LvProj = serde_json::from_str(&raw).map_err(|e| ProjectError::InvalidManifest {
        path: path.clone(),
        message: e.to_string(),
    })?;
    manifest
        .validate()
        .map_err(|message| ProjectError::InvalidManifest { path, message })?;
    Ok(manifest)
}

/// Read `layout.json`, falling back to an empty layout.
pub fn read_layout(root: &Path) -> Layout {
    read_versioned(&root.join(LAYOUT_FILENAME), |l: &Layout| l.version).unwrap_or_default()
}

/// Read `styles.json`, falling back to an empty style collection.
pub fn read_styles(root: &Path) -> Styles {
    read_versioned(&root.join(STYLES_FILENAME), |s: &Styles| s.version).unwrap_or_default()
}

fn read_versioned<T, F>(path: &Path, version: F) -> Option<T>
where
    T: DeserializeOwned,
    F: Fn(&T) -> u32,
{
    let parsed = fs::read_to_string(path)
        .map_err(ProjectError::from)
        .and_then(|raw| serde_json::from_str::<T>(&raw).map_err(ProjectError::from));

    match parsed {
        Ok(value) if version(&value) == 1 => Some(value),
        Ok(value) => {
            warn!(
                path = %path.display(),
                version = version(&value),
                "unsupported file version, using defaults"
            );
            None
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "failed to read project file, using defaults"
            );
            None
        }
    }
}

/// A loaded project snapshot.
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub manifest: LvProj,
    pub layout: Layout,
    pub styles: Styles,
}

impl Project {
    /// Locate the project containing `start` and load it.
    pub fn open(start: &Path) -> Result<Self> {
        let root = find_project_root(start)?;
        Self::load(root)
    }

    /// Load the project rooted at `root`.
    pub fn load(root: PathBuf) -> Result<Self> {
        let manifest = read_manifest(&root)?;
        let layout = read_layout(&root);
        let styles = read_styles(&root);
        debug!(
            root = %root.display(),
            nodes = layout.root.as_ref().map_or(0, |r| r.node_count()),
            styles = styles.shared.len(),
            "project loaded"
        );

        Ok(Self {
            root,
            manifest,
            layout,
            styles,
        })
    }

    /// `generated/` directory.
    pub fn generated_dir(&self) -> PathBuf {
        self.root.join(DIR_GENERATED)
    }

    /// Directory holding `ui.c` and `ui.h`.
    pub fn ui_dir(&self) -> PathBuf {
        self.generated_dir().join(DIR_UI)
    }

    /// Path of the implementation document.
    pub fn source_path(&self) -> PathBuf {
        self.ui_dir().join(UI_SOURCE)
    }

    /// Path of the declarations document.
    pub fn header_path(&self) -> PathBuf {
        self.ui_dir().join(UI_HEADER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_json(dir: &Path, name: &str, value: serde_json::Value) {
        fs::write(dir.join(name), serde_json::to_string_pretty(&value).unwrap()).unwrap();
    }

    fn sample_project() -> TempDir {
        let dir = TempDir::new().unwrap();
        write_json(dir.path(), LVPROJ_FILENAME, serde_json::to_value(LvProj::default()).unwrap());
        write_json(
            dir.path(),
            LAYOUT_FILENAME,
            json!({ "version": 1, "root": { "type": "obj", "children": [{ "type": "label" }] } }),
        );
        write_json(
            dir.path(),
            STYLES_FILENAME,
            json!({ "version": 1, "shared": [{ "id": "card", "radius": 6 }] }),
        );
        dir
    }

    #[test]
    fn test_find_project_root_walks_up() {
        let dir = sample_project();
        let nested = dir.path().join("generated").join("ui");
        fs::create_dir_all(&nested).unwrap();

        let root = find_project_root(&nested).unwrap();
        assert_eq!(root, dir.path());
    }

    #[test]
    fn test_find_project_root_missing() {
        let dir = TempDir::new().unwrap();
        let err = find_project_root(dir.path()).unwrap_err();
        assert!(matches!(err, ProjectError::NotFound(_)));
    }

    #[test]
    fn test_open_project() {
        let dir = sample_project();
        let project = Project::open(dir.path()).unwrap();

        assert_eq!(project.manifest.lvgl_version, "9.0.0");
        assert_eq!(project.layout.root.as_ref().unwrap().node_count(), 2);
        assert_eq!(project.styles.shared.len(), 1);
        assert_eq!(project.source_path(), dir.path().join("generated/ui/ui.c"));
        assert_eq!(project.header_path(), dir.path().join("generated/ui/ui.h"));
    }

    #[test]
    fn test_invalid_manifest_is_blocking() {
        let dir = TempDir::new().unwrap();
        write_json(dir.path(), LVPROJ_FILENAME, json!({ "version": 1 }));

        let err = Project::open(dir.path()).unwrap_err();
        assert!(matches!(err, ProjectError::InvalidManifest { .. }));
    }

    #[test]
    fn test_broken_layout_falls_back_to_default() {
        let dir = sample_project();
        fs::write(dir.path().join(LAYOUT_FILENAME), "{ not json").unwrap();
        write_json(dir.path(), STYLES_FILENAME, json!({ "version": 7, "shared": [] }));

        let project = Project::open(dir.path()).unwrap();
        assert!(project.layout.root.is_none());
        assert_eq!(project.styles, Styles::default());
    }

    #[test]
    fn test_missing_layout_falls_back_to_default() {
        let dir = sample_project();
        fs::remove_file(dir.path().join(LAYOUT_FILENAME)).unwrap();

        assert_eq!(read_layout(dir.path()), Layout::default());
    }
}
