//! Lightbox configuration.
//!
//! Handles loading and validating `lightbox.toml`. Stock defaults match the
//! widget's historical behaviour, so a page without a config file gets the
//! usual 100px cut-off and a 0.5×–3× zoom range.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [gallery]
//! content_selector = ".content img"  # Which images are gallery candidates
//! min_dimension = 100                # Both natural sides must exceed this
//!
//! [zoom]
//! min = 0.5                          # Smallest zoom factor
//! max = 3.0                          # Largest zoom factor
//! wheel_step = 0.1                   # Per ctrl+wheel notch
//! button_step = 0.2                  # Per +/- button click
//!
//! [theme]
//! backdrop = "rgba(0, 0, 0, 0.9)"
//! control_color = "#ffffff"
//! z_index = 1000
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse: override just the values you want:
//!
//! ```toml
//! [zoom]
//! max = 5.0
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::viewer::ZoomLimits;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the config directory.
pub const CONFIG_FILE: &str = "lightbox.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Lightbox configuration loaded from `lightbox.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LightboxConfig {
    /// Which page images are collected into the gallery.
    pub gallery: GalleryConfig,
    /// Zoom range and step sizes.
    pub zoom: ZoomConfig,
    /// Overlay colours and stacking.
    pub theme: ThemeConfig,
}

impl LightboxConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let zoom = &self.zoom;
        if !is_positive(zoom.min) || !is_positive(zoom.max) {
            return Err(ConfigError::Validation(
                "zoom.min and zoom.max must be finite and positive".into(),
            ));
        }
        if zoom.min > 1.0 || zoom.max < 1.0 {
            return Err(ConfigError::Validation(
                "zoom range must include 1.0 (min <= 1 <= max)".into(),
            ));
        }
        if !is_positive(zoom.wheel_step) || !is_positive(zoom.button_step) {
            return Err(ConfigError::Validation(
                "zoom.wheel_step and zoom.button_step must be positive".into(),
            ));
        }
        if self.gallery.content_selector.trim().is_empty() {
            return Err(ConfigError::Validation(
                "gallery.content_selector must not be empty".into(),
            ));
        }
        Ok(())
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Gallery capture settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// CSS selector for candidate images.
    pub content_selector: String,
    /// Images whose natural width or height is at or below this are skipped.
    pub min_dimension: u32,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            content_selector: ".content img".to_string(),
            min_dimension: 100,
        }
    }
}

/// Zoom settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ZoomConfig {
    pub min: f64,
    pub max: f64,
    /// Zoom change per ctrl+wheel event.
    pub wheel_step: f64,
    /// Zoom change per zoom button click.
    pub button_step: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        let limits = ZoomLimits::default();
        Self {
            min: limits.min,
            max: limits.max,
            wheel_step: 0.1,
            button_step: 0.2,
        }
    }
}

impl ZoomConfig {
    pub fn limits(&self) -> ZoomLimits {
        ZoomLimits {
            min: self.min,
            max: self.max,
        }
    }
}

/// Overlay appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Backdrop colour behind the enlarged image (any CSS colour).
    pub backdrop: String,
    /// Colour of close, arrow and zoom controls.
    pub control_color: String,
    /// Stacking order of the overlay.
    pub z_index: i32,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            backdrop: "rgba(0, 0, 0, 0.9)".to_string(),
            control_color: "#ffffff".to_string(),
            z_index: 1000,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(LightboxConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `lightbox.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no config file.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<LightboxConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: LightboxConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `lightbox.toml` in the given directory, falling back to
/// stock defaults when there is none.
pub fn load_config(dir: &Path) -> Result<LightboxConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `lightbox.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Lightbox Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Gallery capture
# ---------------------------------------------------------------------------
[gallery]
# CSS selector for images that can be opened in the lightbox.
content_selector = ".content img"
# Images are skipped unless BOTH natural width and height exceed this
# (keeps icons and avatars out of the gallery).
min_dimension = 100

# ---------------------------------------------------------------------------
# Zoom
# ---------------------------------------------------------------------------
[zoom]
# Zoom range. Must include 1.0.
min = 0.5
max = 3.0
# Change per ctrl+wheel (or trackpad pinch) event.
wheel_step = 0.1
# Change per +/- button click.
button_step = 0.2

# ---------------------------------------------------------------------------
# Theme
# ---------------------------------------------------------------------------
[theme]
backdrop = "rgba(0, 0, 0, 0.9)"
control_color = "#ffffff"
z_index = 1000
"##
}

/// Generate CSS custom properties from theme config.
pub fn generate_theme_css(theme: &ThemeConfig) -> String {
    format!(
        r#":root {{
    --lightbox-backdrop: {backdrop};
    --lightbox-control-color: {control_color};
    --lightbox-z-index: {z_index};
}}"#,
        backdrop = theme.backdrop,
        control_color = theme.control_color,
        z_index = theme.z_index,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_widget_behaviour() {
        let config = LightboxConfig::default();
        assert_eq!(config.gallery.content_selector, ".content img");
        assert_eq!(config.gallery.min_dimension, 100);
        assert_eq!(config.zoom.min, 0.5);
        assert_eq!(config.zoom.max, 3.0);
        assert_eq!(config.zoom.wheel_step, 0.1);
        assert_eq!(config.zoom.button_step, 0.2);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[zoom]
max = 5.0
"#;
        let config: LightboxConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.zoom.max, 5.0);
        // Defaults preserved
        assert_eq!(config.zoom.min, 0.5);
        assert_eq!(config.gallery.min_dimension, 100);
    }

    #[test]
    fn zoom_limits_from_config() {
        let config = LightboxConfig::default();
        assert_eq!(config.zoom.limits(), ZoomLimits { min: 0.5, max: 3.0 });
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let config: LightboxConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, LightboxConfig::default());
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, LightboxConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r##"
[gallery]
min_dimension = 240

[theme]
backdrop = "#111"
"##,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.gallery.min_dimension, 240);
        assert_eq!(config.theme.backdrop, "#111");
        // Unspecified values should be defaults
        assert_eq!(config.gallery.content_selector, ".content img");
        assert_eq!(config.theme.z_index, 1000);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "this is not valid toml [[[").unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
[zoom]
maximum = 4.0
"#,
        )
        .unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validation_rejects_range_excluding_one() {
        let mut config = LightboxConfig::default();
        config.zoom.min = 1.5;
        config.zoom.max = 3.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));

        let mut config = LightboxConfig::default();
        config.zoom.max = 0.8;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validation_rejects_non_positive_min() {
        let mut config = LightboxConfig::default();
        config.zoom.min = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validation_rejects_non_finite_limits() {
        let mut config = LightboxConfig::default();
        config.zoom.max = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = LightboxConfig::default();
        config.zoom.max = f64::INFINITY;
        assert!(config.validate().is_err());

        let mut config = LightboxConfig::default();
        config.zoom.min = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_config_rejects_nan_max() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[zoom]\nmax = nan\n").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn validation_rejects_non_positive_steps() {
        let mut config = LightboxConfig::default();
        config.zoom.wheel_step = 0.0;
        assert!(config.validate().is_err());

        let mut config = LightboxConfig::default();
        config.zoom.button_step = -0.2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validation_rejects_blank_selector() {
        let mut config = LightboxConfig::default();
        config.gallery.content_selector = "  ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_config_validates() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
[zoom]
min = 2.0
"#,
        )
        .unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str(
            r#"
[zoom]
min = 0.5
max = 3.0
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[zoom]
max = 4.0
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let zoom = merged.get("zoom").unwrap();
        assert_eq!(zoom.get("max").unwrap().as_float(), Some(4.0));
        assert_eq!(zoom.get("min").unwrap().as_float(), Some(0.5));
    }

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("z_index = 10").unwrap();
        let overlay: toml::Value = toml::from_str("z_index = 20").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("z_index").unwrap().as_integer(), Some(20));
    }

    // =========================================================================
    // CSS generation tests
    // =========================================================================

    #[test]
    fn theme_css_includes_all_variables() {
        let css = generate_theme_css(&ThemeConfig::default());
        assert!(css.contains("--lightbox-backdrop: rgba(0, 0, 0, 0.9)"));
        assert!(css.contains("--lightbox-control-color: #ffffff"));
        assert!(css.contains("--lightbox-z-index: 1000"));
    }
}
