// Application settings
// Loaded from ~/.config/sheetclean/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use sheetclean_engine::grouping::WidthPolicy;
use sheetclean_engine::TransformOptions;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Output file naming
    #[serde(rename = "output.suffix")]
    pub output_suffix: String,

    /// None = current working directory
    #[serde(rename = "output.directory")]
    pub output_directory: Option<PathBuf>,

    // Sheet names
    #[serde(rename = "sheets.cleaned")]
    pub cleaned_sheet: String,

    #[serde(rename = "sheets.summary")]
    pub summary_sheet: String,

    // Cleaned sheet column sizing (characters)
    #[serde(rename = "autosize.minWidth")]
    pub min_width: usize,

    #[serde(rename = "autosize.maxWidth")]
    pub max_width: usize,

    #[serde(rename = "autosize.padding")]
    pub padding: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_suffix: "_cleaned".to_string(),
            output_directory: None,
            cleaned_sheet: "Cleaned".to_string(),
            summary_sheet: "Summary".to_string(),
            min_width: 8,
            max_width: 80,
            padding: 2,
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sheetclean");
        config_dir.join("settings.json")
    }

    /// Load settings from the default location, falling back to defaults
    pub fn load() -> Self {
        let path = Self::config_path();

        if !path.exists() {
            let settings = Self::default();
            settings.create_default_file(&path);
            return settings;
        }

        Self::load_from(&path)
    }

    /// Load settings from an explicit file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!("Error parsing {}: {}; using default settings", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Error reading {}: {}; using default settings", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse settings JSON. Lines starting with `//` are comments.
    pub fn parse(contents: &str) -> Result<Self, String> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        let settings: Settings = serde_json::from_str(&cleaned).map_err(|e| e.to_string())?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.min_width > self.max_width {
            return Err(format!(
                "autosize.minWidth ({}) exceeds autosize.maxWidth ({})",
                self.min_width, self.max_width
            ));
        }
        if self.cleaned_sheet.trim().is_empty() || self.summary_sheet.trim().is_empty() {
            return Err("sheet names must not be empty".to_string());
        }
        if self.cleaned_sheet == self.summary_sheet {
            return Err(format!("sheet names must differ (both '{}')", self.cleaned_sheet));
        }
        Ok(())
    }

    /// Engine options derived from these settings
    pub fn transform_options(&self) -> TransformOptions {
        TransformOptions {
            cleaned_sheet: self.cleaned_sheet.clone(),
            summary_sheet: self.summary_sheet.clone(),
            widths: WidthPolicy {
                min: self.min_width,
                max: self.max_width,
                padding: self.padding,
            },
        }
    }

    /// Write these settings as JSON to `path`, creating parent directories.
    /// An existing file is only replaced when `overwrite` is set.
    pub fn save_to(&self, path: &Path, overwrite: bool) -> Result<(), String> {
        if path.exists() && !overwrite {
            return Err(format!("{} already exists", path.display()));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| format!("cannot create {}: {}", parent.display(), e))?;
        }
        let mut json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        json.push('\n');
        fs::write(path, json).map_err(|e| format!("cannot write {}: {}", path.display(), e))
    }

    /// Create default settings file with comments
    fn create_default_file(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                log::warn!("Error creating config directory: {}", e);
                return;
            }
        }

        let default_config = r#"{
    // Output file: <input stem><suffix>.xlsx
    "output.suffix": "_cleaned",
    // null = current directory
    "output.directory": null,

    // Sheet names
    "sheets.cleaned": "Cleaned",
    "sheets.summary": "Summary",

    // Cleaned sheet column widths (characters)
    "autosize.minWidth": 8,
    "autosize.maxWidth": 80,
    "autosize.padding": 2
}
"#;

        if let Err(e) = fs::write(path, default_config) {
            log::warn!("Error writing default settings.json: {}", e);
        }
    }

    /// Get the config file path for display/opening
    pub fn config_path_display() -> String {
        Self::config_path().to_string_lossy().to_string()
    }
}
