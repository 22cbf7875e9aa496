// Application settings
// Loaded from ~/.config/clvchat/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Data source
    #[serde(rename = "data.csvPath")]
    pub csv_path: PathBuf,

    /// Single character, "tab", or "auto" to sniff
    #[serde(rename = "data.delimiter")]
    pub delimiter: String,

    // Chat
    #[serde(rename = "chat.intentsFile")]
    pub intents_file: Option<PathBuf>,

    #[serde(rename = "chat.userLabel")]
    pub user_label: String,

    #[serde(rename = "chat.botLabel")]
    pub bot_label: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("CLV.csv"),
            delimiter: ";".to_string(),
            intents_file: None,
            user_label: "Tú".to_string(),
            bot_label: "Bot".to_string(),
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("clvchat")
            .join("settings.json")
    }

    /// Load settings from the default location, falling back to defaults
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from `path`. A missing file yields defaults silently;
    /// an unreadable or malformed file yields defaults with a warning.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!("Error parsing {}: {}; using default settings", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Error reading {}: {}", path.display(), e);
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

        serde_json::from_str(&cleaned).map_err(|e| e.to_string())
    }

    /// Save current settings to `path`
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(path, json).map_err(|e| e.to_string())
    }

    /// Commented template written by `clvchat config init`
    pub fn default_file_contents() -> &'static str {
        r#"{
    // Records file, semicolon separated
    "data.csvPath": "CLV.csv",

    // Field delimiter: a single character, "tab", or "auto" to detect
    "data.delimiter": ";",

    // Optional TOML file replacing the built-in trigger phrases
    "chat.intentsFile": null,

    // Speaker labels used when printing the transcript
    "chat.userLabel": "Tú",
    "chat.botLabel": "Bot"
}
"#
    }

    /// Delimiter byte, `None` for auto-detection.
    pub fn delimiter_byte(&self) -> Result<Option<u8>, String> {
        parse_delimiter(&self.delimiter)
    }
}

/// Parse a delimiter spec: one ASCII character, `tab`/`\t`, or `auto`.
pub fn parse_delimiter(spec: &str) -> Result<Option<u8>, String> {
    match spec {
        "auto" => Ok(None),
        "tab" | "\\t" | "\t" => Ok(Some(b'\t')),
        s if s.len() == 1 && s.is_ascii() => Ok(Some(s.as_bytes()[0])),
        other => Err(format!("invalid delimiter {other:?} (expected one ASCII character, \"tab\" or \"auto\")")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_template_parses_to_defaults() {
        let parsed = Settings::parse(Settings::default_file_contents()).unwrap();
        assert_eq!(parsed, Settings::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let parsed = Settings::parse(r#"{ "data.csvPath": "/data/clv.csv" }"#).unwrap();
        assert_eq!(parsed.csv_path, PathBuf::from("/data/clv.csv"));
        assert_eq!(parsed.delimiter, ";");
        assert_eq!(parsed.bot_label, "Bot");
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        assert_eq!(Settings::load_from(&dir.path().join("settings.json")), Settings::default());
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            intents_file: Some(PathBuf::from("intents.toml")),
            delimiter: "auto".into(),
            ..Settings::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path), settings);
    }

    #[test]
    fn delimiter_specs() {
        assert_eq!(parse_delimiter(";"), Ok(Some(b';')));
        assert_eq!(parse_delimiter(","), Ok(Some(b',')));
        assert_eq!(parse_delimiter("tab"), Ok(Some(b'\t')));
        assert_eq!(parse_delimiter("auto"), Ok(None));
        assert!(parse_delimiter(";;").is_err());
        assert!(parse_delimiter("é").is_err());
        assert!(parse_delimiter("").is_err());
    }
}
