//! Project manifest (`lvproj.json`) handling.

use serde::{Deserialize, Serialize};

/// Top-level LVCraft project manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LvProj {
    pub version: u32,
    #[serde(default)]
    pub lvgl_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_mcu: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<Resolution>,
    #[serde(default = "default_color_depth")]
    pub color_depth: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_profile: Option<MemoryProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_manifest_hash: Option<String>,
}

fn default_color_depth() -> u8 {
    16
}

impl LvProj {
    /// Check the fields a usable manifest must carry.
    ///
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.version != 1 {
            return Err(format!("unsupported version {}", self.version));
        }
        if self.lvgl_version.trim().is_empty() {
            return Err("missing lvglVersion".to_string());
        }
        if self.resolution.is_none() {
            return Err("missing resolution".to_string());
        }
        Ok(())
    }
}

impl Default for LvProj {
    fn default() -> Self {
        Self {
            version: 1,
            lvgl_version: "9.0.0".to_string(),
            target_mcu: None,
            resolution: Some(Resolution {
                width: 320,
                height: 240,
            }),
            color_depth: default_color_depth(),
            memory_profile: Some(MemoryProfile::Default),
            theme: Some("default".to_string()),
            generator: GeneratorConfig::default(),
            asset_manifest_hash: None,
        }
    }
}

/// Display resolution in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

/// Memory footprint preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryProfile {
    Minimal,
    Default,
    Large,
}

/// Code generator settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorConfig {
    /// Naming convention requested by the designer. Informational.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub naming_convention: Option<String>,
    /// Split output per screen. Informational.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modular_splitting: Option<bool>,
    /// Ask before a regeneration discards preserved code of removed regions.
    #[serde(default)]
    pub confirm_dropped_regions: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_manifest() {
        let proj: LvProj = serde_json::from_value(json!({
            "version": 1,
            "lvglVersion": "9.1.0",
            "resolution": { "width": 480, "height": 272 },
            "colorDepth": 32,
            "memoryProfile": "large",
            "generator": { "namingConvention": "snake_case", "confirmDroppedRegions": true }
        }))
        .unwrap();

        assert!(proj.validate().is_ok());
        assert_eq!(proj.lvgl_version, "9.1.0");
        assert_eq!(proj.color_depth, 32);
        assert_eq!(proj.memory_profile, Some(MemoryProfile::Large));
        assert!(proj.generator.confirm_dropped_regions);
    }

    #[test]
    fn test_validate_rejects_incomplete_manifest() {
        let proj: LvProj =
            serde_json::from_value(json!({ "version": 1, "lvglVersion": "9.0.0" })).unwrap();
        assert_eq!(proj.validate(), Err("missing resolution".to_string()));

        let proj: LvProj = serde_json::from_value(json!({
            "version": 2,
            "lvglVersion": "9.0.0",
            "resolution": { "width": 1, "height": 1 }
        }))
        .unwrap();
        assert!(proj.validate().is_err());
    }

    #[test]
    fn test_default_manifest_is_valid() {
        let proj = LvProj::default();
        assert!(proj.validate().is_ok());
        assert!(!proj.generator.confirm_dropped_regions);
    }
}
